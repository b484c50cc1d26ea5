use std::fmt;

use super::{CalloutTone, ContentBlock};

/// Markdown rendering of a block sequence, one blank line between blocks.
pub struct Markdown<'a>(pub &'a [ContentBlock]);

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}

impl fmt::Display for ContentBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentBlock::Heading { level, text, id } => {
                for _ in 0..*level {
                    write!(f, "#")?;
                }
                write!(f, " {}", text)?;
                if let Some(id) = id {
                    write!(f, " {{#{}}}", id)?;
                }
                writeln!(f)
            }
            ContentBlock::Paragraph { text } => writeln!(f, "{}", text),
            ContentBlock::Note { text } => {
                writeln!(f, "> [!NOTE]")?;
                quoted(f, text)
            }
            ContentBlock::Callout {
                text, title, tone, ..
            } => {
                if let Some(marker) = tone.and_then(alert_marker) {
                    writeln!(f, "> [!{}]", marker)?;
                }
                if let Some(title) = title {
                    writeln!(f, "> **{}**", title)?;
                    writeln!(f, ">")?;
                }
                quoted(f, text)
            }
            ContentBlock::List { items } => {
                for item in items {
                    writeln!(f, "- {}", item)?;
                }
                Ok(())
            }
            ContentBlock::NumberList { items } => {
                for (i, item) in items.iter().enumerate() {
                    writeln!(f, "{}. {}", i + 1, item)?;
                }
                Ok(())
            }
            ContentBlock::Image { src, alt, caption } => match caption {
                Some(caption) => writeln!(f, "![{}]({} \"{}\")", alt, src, caption.replace('"', "\\\"")),
                None => writeln!(f, "![{}]({})", alt, src),
            },
            ContentBlock::Extension { kind, .. } => writeln!(f, "<!-- {} -->", kind),
        }
    }
}

fn quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for line in text.lines() {
        if line.is_empty() {
            writeln!(f, ">")?;
        } else {
            writeln!(f, "> {}", line)?;
        }
    }
    Ok(())
}

/// GitHub alert marker for a tone. `success` has none.
fn alert_marker(tone: CalloutTone) -> Option<&'static str> {
    match tone {
        CalloutTone::Tip => Some("TIP"),
        CalloutTone::Info => Some("IMPORTANT"),
        CalloutTone::Warn => Some("WARNING"),
        CalloutTone::Danger => Some("CAUTION"),
        CalloutTone::Success => None,
    }
}
