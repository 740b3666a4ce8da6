//! Error types for the `backbone` crate.
use std::error::Error as StdError;
use std::fmt;

/// Errors raised by backbone operations.
///
/// Like the other layered errors in this workspace, the root type carries the
/// originating error in `source` and a categorized `error_kind`. The `web` layer
/// only looks at `error_kind` when choosing an HTTP status.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: BackboneErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackboneErrorKind {
    /// A bounded wait elapsed (poll window or request deadline).
    Timeout,
    /// A request subject had zero active subscribers.
    NoResponders,
    /// Bucket or key does not exist.
    NotFound,
    /// Subscription or connection is gone for good.
    Closed,
    /// Connecting to the backbone failed.
    Connection,
    Other(String),
}

impl Error {
    pub fn new(error_kind: BackboneErrorKind) -> Self {
        Self {
            source: None,
            error_kind,
        }
    }

    pub fn with_source<E>(error_kind: BackboneErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self {
            source: Some(source.into()),
            error_kind,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.error_kind == BackboneErrorKind::Timeout
    }
}

impl From<BackboneErrorKind> for Error {
    fn from(error_kind: BackboneErrorKind) -> Self {
        Self::new(error_kind)
    }
}

impl fmt::Display for BackboneErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BackboneErrorKind::Timeout => write!(f, "timeout"),
            BackboneErrorKind::NoResponders => write!(f, "no responders available for request"),
            BackboneErrorKind::NotFound => write!(f, "not found"),
            BackboneErrorKind::Closed => write!(f, "subscription closed"),
            BackboneErrorKind::Connection => write!(f, "connection failure"),
            BackboneErrorKind::Other(details) => write!(f, "{details}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source}", self.error_kind),
            None => write!(f, "{}", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
