pub mod decode;
mod display;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use decode::{DecodeError, DecodeWarning, Decoded, decode_blocks, decode_str};
pub use display::Markdown;

/// Heading level that delimits sections.
pub const SECTION_LEVEL: u8 = 2;

/// Deepest heading level a guide may carry (`h4`).
pub const MAX_HEADING_LEVEL: u8 = 4;

/// One unit of guide content, tagged by the JSON `type` field.
/// Document order is meaningful: it defines section boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// `h1` … `h4`. Level 2 starts a section.
    Heading {
        level: u8,
        text: String,
        /// Explicit anchor, overriding the slug of `text` in tables of contents.
        id: Option<String>,
    },
    Paragraph {
        text: String,
    },
    Note {
        text: String,
    },
    Callout {
        text: String,
        title: Option<String>,
        tone: Option<CalloutTone>,
        icon: Option<String>,
    },
    List {
        items: Vec<String>,
    },
    NumberList {
        items: Vec<String>,
    },
    Image {
        src: String,
        alt: String,
        caption: Option<String>,
    },
    /// Any block whose `type` is not recognised. Carried verbatim.
    Extension {
        kind: String,
        fields: Map<String, Value>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutTone {
    Info,
    Success,
    Warn,
    Danger,
    Tip,
}

impl ContentBlock {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        ContentBlock::Heading {
            level,
            text: text.into(),
            id: None,
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    /// The JSON `type` tag of this block.
    pub fn kind(&self) -> &str {
        match self {
            ContentBlock::Heading { level, .. } => heading_kind(*level),
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::Note { .. } => "note",
            ContentBlock::Callout { .. } => "callout",
            ContentBlock::List { .. } => "list",
            ContentBlock::NumberList { .. } => "number-list",
            ContentBlock::Image { .. } => "image",
            ContentBlock::Extension { kind, .. } => kind,
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self {
            ContentBlock::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// True for the headings that open a section.
    pub fn is_section_heading(&self) -> bool {
        self.heading_level() == Some(SECTION_LEVEL)
    }

    /// The `text` field of text-carrying blocks.
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentBlock::Heading { text, .. }
            | ContentBlock::Paragraph { text }
            | ContentBlock::Note { text }
            | ContentBlock::Callout { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn is_extension(&self) -> bool {
        matches!(self, ContentBlock::Extension { .. })
    }
}

pub(crate) fn heading_kind(level: u8) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        3 => "h3",
        _ => "h4",
    }
}

pub(crate) fn heading_level_of(kind: &str) -> Option<u8> {
    match kind {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        _ => None,
    }
}
