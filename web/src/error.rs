use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use backbone::{BackboneErrorKind, Error as BackboneError};
use serde_json::json;

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Caller misuse. Answered with the status and a `{"error": details}` body.
    Client { status: StatusCode, details: String },
    /// Anything the caller could not have caused.
    Internal(Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub fn client(status: StatusCode, details: impl Into<String>) -> Self {
        Self::Client {
            status,
            details: details.into(),
        }
    }

    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::client(StatusCode::BAD_REQUEST, details)
    }

    pub fn unauthorized() -> Self {
        Self::client(StatusCode::UNAUTHORIZED, status_text(StatusCode::UNAUTHORIZED))
    }

    pub fn not_found() -> Self {
        Self::client(StatusCode::NOT_FOUND, status_text(StatusCode::NOT_FOUND))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Client { status, .. } => *status,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub(crate) fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Client { .. } => None,
            Error::Internal(source) => Some(source.as_ref()),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        match self {
            Error::Client { status, details } => write!(fmt, "{status}: {details}"),
            Error::Internal(source) => write!(fmt, "internal error: {source}"),
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Client { status, details } => {
                debug!("Rejecting request with {status}: {details}");
                (status, Json(json!({ "error": details }))).into_response()
            }
            Error::Internal(source) => {
                error!("Internal error while handling request: {source}");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, status_text(status)).into_response()
            }
        }
    }
}

impl From<BackboneError> for Error {
    fn from(err: BackboneError) -> Self {
        match err.error_kind {
            BackboneErrorKind::NotFound | BackboneErrorKind::NoResponders => Self::not_found(),
            _ => Self::Internal(Box::new(err)),
        }
    }
}

impl From<axum::Error> for Error {
    fn from(err: axum::Error) -> Self {
        Self::Internal(Box::new(err))
    }
}
