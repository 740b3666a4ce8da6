use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::convert::Infallible;

/// The raw `Authorization` header value, empty when absent or not valid UTF-8.
///
/// The gateway never interprets it. It is handed to the authorization gate as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Credential(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let credential = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        Ok(Credential(credential.to_string()))
    }
}
