use crate::extractors::credential::Credential;
use crate::params::subject::{to_subject, SubjectParams};
use crate::{AppState, Error};
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use log::*;

/// A subject the caller has been cleared to use.
///
/// Resolved from the wildcard path tail when the route has one (mapped `/` to `.`),
/// otherwise from the `subject` query parameter (literal). The authorization gate is
/// consulted before the handler runs, so a rejected request never reaches the backbone.
#[derive(Debug)]
pub(crate) struct AuthorizedSubject(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthorizedSubject {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let subject = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(path)) => to_subject(&path),
            Err(_) => Query::<SubjectParams>::from_request_parts(parts, state)
                .await
                .ok()
                .and_then(|Query(params)| params.subject())
                .ok_or_else(|| Error::bad_request("subject must be defined"))?,
        };

        let Credential(credential) = Credential::from_request_parts(parts, state)
            .await
            .unwrap_or_default();

        if !state.authorizer.authorize(&credential, &subject) {
            debug!("Denied {} on subject {subject}", parts.uri.path());
            return Err(Error::unauthorized());
        }

        Ok(AuthorizedSubject(subject))
    }
}
