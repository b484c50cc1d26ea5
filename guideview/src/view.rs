//! Views over fetched guides and the loads that fill them.
//!
//! Each load fetches once, decodes, and projects the blocks for one view.
//! A load whose token is cancelled before it can commit yields
//! [`Outcome::Stale`], which callers drop without showing anything.

use guidebook::block::{ContentBlock, decode_blocks};
use guidebook::section::{Resolution, SectionBody, SectionSummary, list_sections, resolve_section};
use guidebook::toc::{TocItem, build_toc};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cancel::CancellationToken;
use crate::error::ViewError;
use crate::source::ContentSource;

/// What a view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Failed(ViewError),
    NotFound { slug: String },
}

/// Result of a load.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Commit(ViewState<T>),
    /// The view went away while the load was running.
    Stale,
}

impl<T> Outcome<T> {
    pub fn is_stale(&self) -> bool {
        matches!(self, Outcome::Stale)
    }
}

/// The state of one mounted view.
#[derive(Debug)]
pub struct View<T> {
    state: ViewState<T>,
    token: CancellationToken,
}

impl<T> View<T> {
    pub fn new(token: CancellationToken) -> Self {
        View {
            state: ViewState::Loading,
            token,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Commit a load result. Stale results, and any result arriving after
    /// the view was torn down, leave the state untouched.
    pub fn apply(&mut self, outcome: Outcome<T>) -> bool {
        match outcome {
            Outcome::Commit(state) if self.is_mounted() => {
                self.state = state;
                true
            }
            _ => {
                debug!("stale load result dropped");
                false
            }
        }
    }

    pub fn into_state(self) -> ViewState<T> {
        self.state
    }
}

/// Index view: one summary per section.
pub async fn load_index<S: ContentSource>(
    source: &S,
    location: &str,
    token: &CancellationToken,
) -> Outcome<Vec<SectionSummary>> {
    match fetch_blocks(source, location, token).await {
        None => Outcome::Stale,
        Some(Err(err)) => Outcome::Commit(ViewState::Failed(err)),
        Some(Ok(blocks)) => Outcome::Commit(ViewState::Ready(list_sections(&blocks))),
    }
}

/// Detail view: the section addressed by `slug`.
pub async fn load_section<S: ContentSource>(
    source: &S,
    location: &str,
    slug: &str,
    token: &CancellationToken,
) -> Outcome<SectionBody> {
    match fetch_blocks(source, location, token).await {
        None => Outcome::Stale,
        Some(Err(err)) => Outcome::Commit(ViewState::Failed(err)),
        Some(Ok(blocks)) => match resolve_section(&blocks, slug) {
            Resolution::Found(section) => Outcome::Commit(ViewState::Ready(section)),
            Resolution::NotFound => {
                debug!(location, slug, "no section with this slug");
                Outcome::Commit(ViewState::NotFound {
                    slug: slug.to_string(),
                })
            }
        },
    }
}

/// Table of contents of a whole guide.
pub async fn load_toc<S: ContentSource>(
    source: &S,
    location: &str,
    token: &CancellationToken,
) -> Outcome<Vec<TocItem>> {
    match fetch_blocks(source, location, token).await {
        None => Outcome::Stale,
        Some(Err(err)) => Outcome::Commit(ViewState::Failed(err)),
        Some(Ok(blocks)) => Outcome::Commit(ViewState::Ready(build_toc(&blocks))),
    }
}

/// Any other JSON document, such as a manifest.
pub async fn load_document<S: ContentSource, T: DeserializeOwned>(
    source: &S,
    location: &str,
    token: &CancellationToken,
) -> Outcome<T> {
    let Some(fetched) = fetch_guarded(source, location, token).await else {
        return Outcome::Stale;
    };
    let state = match fetched.and_then(|value| {
        serde_json::from_value(value).map_err(|err| ViewError::parse(location, err))
    }) {
        Ok(document) => ViewState::Ready(document),
        Err(err) => ViewState::Failed(err),
    };
    Outcome::Commit(state)
}

/// Fetch and decode a block sequence. `None` means the token was cancelled.
pub async fn fetch_blocks<S: ContentSource>(
    source: &S,
    location: &str,
    token: &CancellationToken,
) -> Option<Result<Vec<ContentBlock>, ViewError>> {
    let fetched = fetch_guarded(source, location, token).await?;
    Some(fetched.and_then(|value| {
        let decoded = decode_blocks(value).map_err(|err| ViewError::parse(location, err))?;
        for warning in &decoded.warnings {
            warn!(location, %warning, "malformed block");
        }
        Ok(decoded.blocks)
    }))
}

async fn fetch_guarded<S: ContentSource>(
    source: &S,
    location: &str,
    token: &CancellationToken,
) -> Option<Result<serde_json::Value, ViewError>> {
    let fetched = tokio::select! {
        biased;
        _ = token.cancelled() => None,
        result = source.fetch(location) => Some(result),
    };
    match fetched {
        Some(result) if !token.is_cancelled() => Some(result),
        _ => {
            debug!(location, "load abandoned, result discarded");
            None
        }
    }
}
