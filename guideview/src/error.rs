use thiserror::Error;

/// Why a view could not be filled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("cannot fetch {location}: {reason}")]
    Fetch { location: String, reason: String },
    #[error("{location} answered with status {status}")]
    Status { location: String, status: u16 },
    #[error("cannot parse {location}: {reason}")]
    Parse { location: String, reason: String },
}

/// Display category of a [`ViewError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport error or non-success status.
    Fetch,
    /// The payload is not the expected shape.
    Parse,
}

impl ViewError {
    pub fn fetch(location: &str, reason: impl ToString) -> Self {
        ViewError::Fetch {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(location: &str, reason: impl ToString) -> Self {
        ViewError::Parse {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ViewError::Fetch { .. } | ViewError::Status { .. } => FailureKind::Fetch,
            ViewError::Parse { .. } => FailureKind::Parse,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            ViewError::Fetch { location, .. }
            | ViewError::Status { location, .. }
            | ViewError::Parse { location, .. } => location,
        }
    }

    /// Short message for readers of the help center.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            FailureKind::Fetch => "The content could not be loaded. Navigate again to retry.",
            FailureKind::Parse => "The content is unreadable. Check the guide file.",
        }
    }
}
