use crate::extractors::authorized_subject::AuthorizedSubject;
use async_stream::stream;
use axum::extract::State;
use axum::http::header::CONNECTION;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use futures::Stream;
use log::*;
use service::AppState;
use std::convert::Infallible;
use ::sse::message::EventType;

/// GET stream every message published on a subject as Server-Sent Events
///
/// One stream session per request. It lives exactly as long as the response body:
/// when the client goes away the body is dropped and the session with it.
#[utoipa::path(
    get,
    path = "/subscribe",
    params(crate::params::subject::SubjectParams),
    responses(
        (status = 200, description = "Event stream of `{subject, headers, data}` frames", content_type = "text/event-stream"),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("authorization" = [])
    )
)]
pub(crate) async fn subscribe(
    State(app_state): State<AppState>,
    AuthorizedSubject(subject): AuthorizedSubject,
) -> impl IntoResponse {
    let session = ::sse::Session::open(
        app_state.backbone.clone(),
        subject,
        &app_state.config.session_config(),
        app_state.sse_manager.clone(),
    );
    debug!(
        "Established event stream {} on {}",
        session.id(),
        session.subject()
    );

    ([(CONNECTION, "keep-alive")], Sse::new(event_stream(session)))
}

fn event_stream(
    mut session: ::sse::Session,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream! {
        while let Some(event) = session.recv().await {
            match event.to_frame() {
                Ok(frame) => {
                    trace!(
                        "Writing {} frame for {} on stream {}",
                        event.event_type(),
                        event.subject(),
                        session.id()
                    );
                    yield Ok::<Event, Infallible>(frame);
                }
                Err(e) => warn!("Dropping event on stream {} that failed to encode: {e}", session.id()),
            }
        }

        debug!("Event stream {} on {} ended", session.id(), session.subject());
    }
}
