use std::ops::Range;

use pulldown_cmark::{
    BlockQuoteKind, CodeBlockKind, Event, HeadingLevel, Options, Parser as CmarkParser, Tag,
    TagEnd,
};
use serde_json::{Map, Value};

use crate::block::{CalloutTone, ContentBlock, MAX_HEADING_LEVEL};
use crate::import::Imported;
use crate::import::error::ImportError;

type Events<'a> = [(Event<'a>, Range<usize>)];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Import Markdown source text into a flat block sequence.
pub fn import_blocks(source: &str, file_id: usize) -> Result<Imported, Vec<ImportError>> {
    let options = Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_GFM
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = CmarkParser::new_ext(source, options);
    let events: Vec<(Event<'_>, Range<usize>)> = parser.into_offset_iter().collect();

    let mut state = ImportState::new(file_id);
    state.process_events(&events);
    state.finalize()
}

// ---------------------------------------------------------------------------
// Import state
// ---------------------------------------------------------------------------

struct ImportState {
    file_id: usize,
    blocks: Vec<ContentBlock>,
    /// Errors and warnings, in source order.
    diagnostics: Vec<ImportError>,
}

impl ImportState {
    fn new(file_id: usize) -> Self {
        ImportState {
            file_id,
            blocks: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn process_events(&mut self, events: &Events<'_>) {
        let mut i = 0;

        while i < events.len() {
            let (ref ev, ref range) = events[i];

            match ev {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    let level = heading_level_to_u8(level);
                    let id = id.as_ref().map(|id| id.to_string());
                    i += 1;
                    let text = normalize_whitespace(&collect_inline_text(events, &mut i, |e| {
                        matches!(e, TagEnd::Heading(_))
                    }));

                    if text.is_empty() {
                        self.diagnostics.push(
                            ImportError::error("empty heading", range.clone(), self.file_id)
                                .with_note("section slugs are derived from heading text"),
                        );
                        continue;
                    }

                    let level = if level > MAX_HEADING_LEVEL {
                        self.diagnostics.push(ImportError::warning(
                            format!("heading level {} is deeper than h{}", level, MAX_HEADING_LEVEL),
                            range.clone(),
                            self.file_id,
                        ));
                        MAX_HEADING_LEVEL
                    } else {
                        level
                    };

                    self.blocks.push(ContentBlock::Heading { level, text, id });
                }

                Event::Start(Tag::Paragraph) => {
                    i += 1;
                    if let Some(block) = collect_paragraph(events, &mut i) {
                        self.blocks.push(block);
                    }
                }

                Event::Start(Tag::List(start)) => {
                    let ordered = start.is_some();
                    i += 1;
                    let items = self.collect_list_items(events, &mut i);
                    self.blocks.push(if ordered {
                        ContentBlock::NumberList { items }
                    } else {
                        ContentBlock::List { items }
                    });
                }

                Event::Start(Tag::BlockQuote(kind)) => {
                    i += 1;
                    let text = collect_blockquote(events, &mut i);
                    self.blocks.push(quote_block(*kind, text));
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    i += 1;
                    let content = collect_inline_text(events, &mut i, |e| {
                        matches!(e, TagEnd::CodeBlock)
                    });

                    let mut fields = Map::new();
                    if let Some(language) = language {
                        fields.insert("language".into(), Value::String(language));
                    }
                    fields.insert("content".into(), Value::String(content));
                    self.blocks.push(ContentBlock::Extension {
                        kind: "code".into(),
                        fields,
                    });
                }

                Event::Start(Tag::Table(_)) => {
                    self.skipped("table", range.clone());
                    i += 1;
                    skip_until(events, &mut i, |e| matches!(e, TagEnd::Table));
                }

                Event::Start(Tag::HtmlBlock) => {
                    self.skipped("raw HTML", range.clone());
                    i += 1;
                    skip_until(events, &mut i, |e| matches!(e, TagEnd::HtmlBlock));
                }

                Event::Rule => {
                    self.skipped("horizontal rule", range.clone());
                    i += 1;
                }

                _ => {
                    i += 1;
                }
            }
        }
    }

    /// Collect the items of a list until its end. Nested lists are flattened
    /// into the text of their parent item.
    fn collect_list_items(&mut self, events: &Events<'_>, i: &mut usize) -> Vec<String> {
        let mut items = Vec::new();
        let mut current: Option<String> = None;
        let mut depth = 0u32;

        while *i < events.len() {
            let (ref ev, ref range) = events[*i];
            *i += 1;
            match ev {
                Event::End(TagEnd::List(_)) if depth == 0 => break,
                Event::Start(Tag::List(_)) => {
                    depth += 1;
                    if depth == 1 {
                        self.diagnostics.push(ImportError::warning(
                            "nested list flattened into its parent item",
                            range.clone(),
                            self.file_id,
                        ));
                    }
                }
                Event::End(TagEnd::List(_)) => depth -= 1,
                Event::Start(Tag::Item) if depth == 0 => current = Some(String::new()),
                Event::End(TagEnd::Item) if depth == 0 => {
                    if let Some(item) = current.take() {
                        items.push(normalize_whitespace(&item));
                    }
                }
                Event::Text(s) | Event::Code(s) => {
                    if let Some(item) = current.as_mut() {
                        item.push_str(s);
                    }
                }
                Event::SoftBreak
                | Event::HardBreak
                | Event::Start(Tag::Item)
                | Event::End(TagEnd::Paragraph) => {
                    if let Some(item) = current.as_mut() {
                        item.push(' ');
                    }
                }
                _ => {}
            }
        }

        items
    }

    fn skipped(&mut self, what: &str, span: Range<usize>) {
        self.diagnostics.push(
            ImportError::warning(format!("{} skipped", what), span, self.file_id)
                .with_note("guides hold headings, paragraphs, lists, quotes, images and code"),
        );
    }

    fn finalize(self) -> Result<Imported, Vec<ImportError>> {
        if self.diagnostics.iter().any(ImportError::is_error) {
            Err(self.diagnostics)
        } else {
            Ok(Imported {
                blocks: self.blocks,
                warnings: self.diagnostics,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// A paragraph holding a single image becomes an `Image` block, the image
/// title serving as caption. Anything else is flattened to plain text.
fn collect_paragraph(events: &Events<'_>, i: &mut usize) -> Option<ContentBlock> {
    let mut text = String::new();
    let mut images: Vec<(String, String, String)> = Vec::new();
    let mut has_text = false;

    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(TagEnd::Paragraph) => {
                *i += 1;
                break;
            }
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                let src = dest_url.to_string();
                let title = title.to_string();
                *i += 1;
                let alt = collect_inline_text(events, i, |e| matches!(e, TagEnd::Image));
                text.push_str(&alt);
                images.push((src, alt, title));
            }
            Event::Text(s) | Event::Code(s) => {
                has_text |= !s.trim().is_empty();
                text.push_str(s);
                *i += 1;
            }
            Event::SoftBreak => {
                text.push(' ');
                *i += 1;
            }
            Event::HardBreak => {
                text.push('\n');
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }

    if !has_text && images.len() == 1 {
        let (src, alt, title) = images.remove(0);
        return Some(ContentBlock::Image {
            src,
            alt,
            caption: (!title.is_empty()).then_some(title),
        });
    }

    let text = text.trim();
    (!text.is_empty()).then(|| ContentBlock::Paragraph {
        text: text.to_string(),
    })
}

/// Paragraphs of a blockquote, one per line.
fn collect_blockquote(events: &Events<'_>, i: &mut usize) -> String {
    let mut paragraphs = Vec::new();
    let mut depth = 0u32;

    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(TagEnd::BlockQuote(_)) if depth == 0 => {
                *i += 1;
                break;
            }
            Event::Start(Tag::BlockQuote(_)) => {
                depth += 1;
                *i += 1;
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                depth -= 1;
                *i += 1;
            }
            Event::Start(Tag::Paragraph) => {
                *i += 1;
                let text = collect_inline_text(events, i, |e| matches!(e, TagEnd::Paragraph));
                paragraphs.push(normalize_whitespace(&text));
            }
            _ => {
                *i += 1;
            }
        }
    }

    paragraphs.join("\n")
}

fn quote_block(kind: Option<BlockQuoteKind>, text: String) -> ContentBlock {
    let tone = match kind {
        Some(BlockQuoteKind::Note) => return ContentBlock::Note { text },
        Some(BlockQuoteKind::Tip) => Some(CalloutTone::Tip),
        Some(BlockQuoteKind::Important) => Some(CalloutTone::Info),
        Some(BlockQuoteKind::Warning) => Some(CalloutTone::Warn),
        Some(BlockQuoteKind::Caution) => Some(CalloutTone::Danger),
        None => None,
    };
    ContentBlock::Callout {
        text,
        title: None,
        tone,
        icon: None,
    }
}

/// Collect text content until a matching End tag. Markup is dropped.
fn collect_inline_text(
    events: &Events<'_>,
    i: &mut usize,
    is_end: impl Fn(&TagEnd) -> bool,
) -> String {
    let mut text = String::new();
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        *i += 1;
        match ev {
            Event::End(tag_end) if is_end(tag_end) => break,
            Event::Text(s) | Event::Code(s) => text.push_str(s),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            _ => {}
        }
    }
    text
}

fn skip_until(events: &Events<'_>, i: &mut usize, is_end: impl Fn(&TagEnd) -> bool) {
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        *i += 1;
        if let Event::End(tag_end) = ev {
            if is_end(tag_end) {
                break;
            }
        }
    }
}

/// Strip leading/trailing whitespace and collapse interior whitespace.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
