use crate::extractors::authorized_subject::AuthorizedSubject;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use backbone::Message;
use bytes::Bytes;
use log::*;

/// POST publish the request body on a subject without waiting for any acknowledgement
#[utoipa::path(
    post,
    path = "/publish",
    params(crate::params::subject::SubjectParams),
    request_body(content = String, description = "Opaque message payload", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Message handed to the backbone"),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal Server Error")
    ),
    security(
        ("authorization" = [])
    )
)]
pub async fn publish(
    State(app_state): State<AppState>,
    AuthorizedSubject(subject): AuthorizedSubject,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    debug!("POST publish {} bytes on {subject}", body.len());

    app_state
        .backbone_ref()
        .publish(Message::new(subject, body))
        .await?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use axum::http::StatusCode;
    use backbone::Backbone;
    use std::time::Duration;

    #[tokio::test]
    async fn path_subject_is_mapped_and_published() {
        let memory = MemoryBackbone::new();
        let mut subscription = memory.subscribe("orders.created").await.unwrap();
        let app = router(memory.clone(), allow_all());

        let response = send(&app, post("/publish/orders/created", "order-1")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let message = subscription
            .next_message(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(message.data, "order-1");
    }

    #[tokio::test]
    async fn query_subject_is_taken_literally() {
        let memory = MemoryBackbone::new();
        let mut subscription = memory.subscribe("a/b").await.unwrap();
        let app = router(memory.clone(), allow_all());

        let response = send(&app, post("/publish?subject=a/b", "x")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let message = subscription
            .next_message(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(message.subject, "a/b");
    }

    #[tokio::test]
    async fn denied_publish_never_touches_the_backbone() {
        let counting = CountingBackbone::default();
        let app = router_with(counting.clone(), deny_all());

        let response = send(&app, post("/publish/orders/created", "order-1")).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(counting.calls(), 0);
    }

    #[tokio::test]
    async fn missing_subject_is_a_bad_request() {
        let app = router(MemoryBackbone::new(), allow_all());

        let response = send(&app, post("/publish", "x")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"error": "subject must be defined"})
        );
    }

    #[tokio::test]
    async fn backbone_failure_is_an_internal_error() {
        let app = router(MemoryBackbone::new(), allow_all());

        // The in-memory broker refuses to publish on wildcard subjects.
        let response = send(&app, post("/publish?subject=orders.*", "x")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
