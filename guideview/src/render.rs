//! Plain-text rendering of views.

use std::io::{self, Write};

use guidebook::block::Markdown;
use guidebook::section::{SectionBody, SectionSummary};
use guidebook::toc::TocItem;

use crate::view::ViewState;

/// Route of the section index; section pages live at `<index>/<slug>`.
pub const INDEX_ROUTE: &str = "/overview";

/// Render any view state, delegating the ready case to `ready`.
pub fn render_state<T>(
    out: &mut dyn Write,
    state: &ViewState<T>,
    ready: impl FnOnce(&mut dyn Write, &T) -> io::Result<()>,
) -> io::Result<()> {
    match state {
        ViewState::Loading => writeln!(out, "Loading…"),
        ViewState::Ready(value) => ready(out, value),
        ViewState::Failed(err) => writeln!(out, "{}", err.user_message()),
        ViewState::NotFound { slug } => {
            writeln!(out, "Section not found: {}", slug)?;
            writeln!(out, "Check the slug or the content of the guide file.")?;
            writeln!(out, "← Back to the overview: {}", INDEX_ROUTE)
        }
    }
}

/// Section cards, in document order.
pub fn render_index(out: &mut dyn Write, sections: &[SectionSummary]) -> io::Result<()> {
    if sections.is_empty() {
        return writeln!(out, "No sections in this guide.");
    }
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}", section.ordinal_label.to_uppercase())?;
        writeln!(out, "{}", section.title)?;
        writeln!(out, "  {}/{}", INDEX_ROUTE, section.slug)?;
        writeln!(
            out,
            "  {}",
            section.description.as_deref().unwrap_or("Open the section →")
        )?;
    }
    Ok(())
}

/// A section page: title, breadcrumb, then the body.
pub fn render_section(out: &mut dyn Write, section: &SectionBody) -> io::Result<()> {
    writeln!(out, "{}", section.title)?;
    writeln!(out, "Overview / {}", section.title)?;
    writeln!(out)?;
    if section.body.is_empty() {
        return writeln!(out, "No content for this section.");
    }
    write!(out, "{}", Markdown(&section.body))
}

pub fn render_toc(out: &mut dyn Write, items: &[TocItem]) -> io::Result<()> {
    fn render_items(out: &mut dyn Write, items: &[TocItem], indent: usize) -> io::Result<()> {
        for item in items {
            writeln!(out, "{}- {} (#{})", "  ".repeat(indent), item.text, item.id)?;
            render_items(out, &item.children, indent + 1)?;
        }
        Ok(())
    }
    render_items(out, items, 0)
}
