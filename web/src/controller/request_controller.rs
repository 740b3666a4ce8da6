use crate::extractors::authorized_subject::AuthorizedSubject;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use backbone::{Headers, Message};
use bytes::Bytes;
use log::*;

/// Reply header through which a service reports an application-level status.
pub(crate) const SERVICE_ERROR_CODE: &str = "Nats-Service-Error-Code";

/// POST send the request body to a subject and answer with its single reply
#[utoipa::path(
    post,
    path = "/request",
    params(crate::params::subject::SubjectParams),
    request_body(content = String, description = "Opaque request payload", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Reply body of the responding service"),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No service is listening on the subject"),
        (status = 500, description = "The reply deadline passed or the backbone failed")
    ),
    security(
        ("authorization" = [])
    )
)]
pub async fn request(
    State(app_state): State<AppState>,
    AuthorizedSubject(subject): AuthorizedSubject,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, Error> {
    debug!("POST request on {subject}");

    let message = Message::new(subject, body).with_headers(forwarded_headers(&headers));
    let reply = app_state
        .backbone_ref()
        .request(message, app_state.config.request_timeout())
        .await?;

    into_response(reply)
}

/// HTTP request headers as message headers. Values that are not UTF-8 are dropped.
fn forwarded_headers(headers: &HeaderMap) -> Headers {
    let mut forwarded = Headers::new();
    for (name, value) in headers {
        match value.to_str() {
            Ok(value) => forwarded.append(name.as_str(), value),
            Err(_) => trace!("Dropping non UTF-8 value of header {name}"),
        }
    }
    forwarded
}

/// Translate a reply into the HTTP answer.
///
/// A service error code other than 200 becomes the response status with the reply body
/// verbatim. An unusable code is an internal error. Otherwise the reply body is returned
/// with 200 and the reply headers, minus content-length.
fn into_response(reply: Message) -> Result<Response, Error> {
    if let Some(code) = reply.headers.get(SERVICE_ERROR_CODE) {
        if code != "200" {
            let status = code
                .parse::<u16>()
                .ok()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .ok_or_else(|| {
                    Error::Internal(format!("unusable service error code {code:?}").into())
                })?;
            debug!("Service on {} answered with {status}", reply.subject);
            return Ok((status, reply.data).into_response());
        }
    }

    let mut response = (StatusCode::OK, reply.data).into_response();
    let response_headers = response.headers_mut();
    for (name, values) in reply.headers.without("content-length").iter() {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            trace!("Dropping reply header with invalid name {name:?}");
            continue;
        };
        for value in values {
            if let Ok(value) = HeaderValue::from_str(value) {
                response_headers.append(name.clone(), value);
            }
        }
    }
    Ok(response)
}
