//! Views over help-center guides.
//!
//! Fetches guide documents from a [`ContentSource`], guards each load with a
//! [`CancellationToken`], and turns the result into a [`ViewState`] that a
//! renderer can show.

pub mod cancel;
pub mod error;
pub mod render;
pub mod source;
pub mod view;

pub use cancel::{CancellationToken, Navigator};
pub use error::{FailureKind, ViewError};
pub use source::{AnySource, ContentSource, FileSource, HttpSource};
pub use view::{Outcome, View, ViewState, load_document, load_index, load_section, load_toc};
