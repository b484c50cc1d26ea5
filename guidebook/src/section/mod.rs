//! Sections of a guide.
//!
//! A section is a maximal run of blocks starting at a level-2 heading and
//! ending just before the next one, or at the end of the sequence. Blocks
//! before the first level-2 heading belong to no section.

mod ordinal;

use std::ops::Range;

use serde::Serialize;

use crate::block::ContentBlock;
use crate::slug::slugify;

pub use ordinal::{ordinal_label, ordinal_letters};

/// One section located in a block sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// 0-based position among all sections.
    pub ordinal: usize,
    /// Index of the defining heading.
    pub heading: usize,
    /// End of the section, exclusive.
    pub end: usize,
    /// Trimmed heading text, or `Section <n>` when blank.
    pub title: String,
    /// Slug of the title, or `section-<n>` when the title has no letters
    /// or digits.
    pub slug: String,
}

impl Partition {
    /// The body blocks, excluding the heading.
    pub fn body_range(&self) -> Range<usize> {
        self.heading + 1..self.end
    }

    pub fn body<'a>(&self, blocks: &'a [ContentBlock]) -> &'a [ContentBlock] {
        &blocks[self.body_range()]
    }

    pub fn ordinal_label(&self) -> String {
        ordinal_label(self.ordinal)
    }

    /// Text of the first paragraph in the body, if any.
    pub fn description<'a>(&self, blocks: &'a [ContentBlock]) -> Option<&'a str> {
        self.body(blocks).iter().find_map(|block| match block {
            ContentBlock::Paragraph { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Index-view projection of a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ordinal_label: String,
}

/// Detail-view projection of a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionBody {
    pub title: String,
    pub body: Vec<ContentBlock>,
}

/// Result of looking a section up by slug.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(SectionBody),
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn into_option(self) -> Option<SectionBody> {
        match self {
            Resolution::Found(body) => Some(body),
            Resolution::NotFound => None,
        }
    }
}

/// Locate every section in one left-to-right pass.
pub fn partition(blocks: &[ContentBlock]) -> Vec<Partition> {
    let headings: Vec<(usize, &str)> = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.is_section_heading())
        .map(|(i, block)| (i, block.text().unwrap_or_default()))
        .collect();

    headings
        .iter()
        .enumerate()
        .map(|(ordinal, &(heading, text))| {
            let end = headings
                .get(ordinal + 1)
                .map_or(blocks.len(), |&(next, _)| next);
            let title = section_title(text, ordinal);
            let slug = section_slug(&title, ordinal);
            Partition {
                ordinal,
                heading,
                end,
                title,
                slug,
            }
        })
        .collect()
}

/// Summaries of every section, in document order.
pub fn list_sections(blocks: &[ContentBlock]) -> Vec<SectionSummary> {
    partition(blocks)
        .into_iter()
        .map(|part| SectionSummary {
            description: part.description(blocks).map(str::to_string),
            ordinal_label: part.ordinal_label(),
            title: part.title,
            slug: part.slug,
        })
        .collect()
}

/// The first section whose slug equals `slug`.
///
/// An empty sequence or an empty slug never matches.
pub fn resolve_section(blocks: &[ContentBlock], slug: &str) -> Resolution {
    if blocks.is_empty() || slug.is_empty() {
        return Resolution::NotFound;
    }
    match partition(blocks).into_iter().find(|part| part.slug == slug) {
        Some(part) => Resolution::Found(SectionBody {
            body: part.body(blocks).to_vec(),
            title: part.title,
        }),
        None => Resolution::NotFound,
    }
}

/// [`resolve_section`] over a sequence that may be absent.
pub fn resolve_in(blocks: Option<&[ContentBlock]>, slug: &str) -> Resolution {
    blocks.map_or(Resolution::NotFound, |blocks| resolve_section(blocks, slug))
}

fn section_title(text: &str, ordinal: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        format!("Section {}", ordinal + 1)
    } else {
        trimmed.to_string()
    }
}

fn section_slug(title: &str, ordinal: usize) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        format!("section-{}", ordinal + 1)
    } else {
        slug
    }
}
