//! Content model of the Content Server help center.
//!
//! Guides arrive as flat JSON arrays of typed blocks. This crate decodes
//! them, cuts them into sections at level-2 headings, derives stable slugs
//! for those sections, and builds tables of contents. It can also import
//! guides written in Markdown.

pub mod block;
pub mod import;
pub mod manifest;
pub mod section;
pub mod slug;
pub mod toc;

pub use block::{CalloutTone, ContentBlock};
pub use section::{Resolution, SectionBody, SectionSummary, list_sections, resolve_section};
pub use slug::slugify;
