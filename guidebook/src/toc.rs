//! Table of contents built from the headings of a guide.

use serde::Serialize;

use crate::block::ContentBlock;
use crate::slug::slugify;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocItem {
    /// Explicit heading id, or the slug of its text.
    pub id: String,
    pub text: String,
    pub level: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocItem>,
}

impl TocItem {
    /// Depth-first walk over this entry and its descendants.
    pub fn walk(&self) -> Vec<&TocItem> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// Nest every non-blank heading under the closest shallower one before it.
pub fn build_toc(blocks: &[ContentBlock]) -> Vec<TocItem> {
    let mut stack: Vec<TocItem> = Vec::new();
    let mut roots = Vec::new();

    for block in blocks {
        let ContentBlock::Heading { level, text, id } = block else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        close_to_level(&mut stack, &mut roots, *level);
        stack.push(TocItem {
            id: id.clone().unwrap_or_else(|| slugify(text)),
            text: text.to_string(),
            level: *level,
            children: Vec::new(),
        });
    }

    close_to_level(&mut stack, &mut roots, 0);
    roots
}

/// Pop entries at the same or deeper level than `level`.
fn close_to_level(stack: &mut Vec<TocItem>, roots: &mut Vec<TocItem>, level: u8) {
    while stack.last().is_some_and(|top| top.level >= level) {
        let Some(item) = stack.pop() else { break };
        match stack.last_mut() {
            Some(parent) => parent.children.push(item),
            None => roots.push(item),
        }
    }
}
