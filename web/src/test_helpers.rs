//! Shared fixtures for the router tests.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use backbone::{Backbone, KeyValue, Message, Subscription};
use clap::Parser;
use http_body_util::BodyExt;
use service::auth::{Authorize, DenyAll};
use service::config::Config;
use service::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub(crate) use backbone::memory::MemoryBackbone;

pub(crate) fn app_state(backbone: Arc<dyn Backbone>, authorizer: Arc<dyn Authorize>) -> AppState {
    let config = Config::parse_from(["natssse_gateway"]);
    AppState::new(config, backbone, authorizer)
}

pub(crate) fn router(memory: MemoryBackbone, authorizer: Arc<dyn Authorize>) -> Router {
    crate::router::define_routes(app_state(Arc::new(memory), authorizer))
}

pub(crate) fn router_with(backbone: impl Backbone + 'static, authorizer: Arc<dyn Authorize>) -> Router {
    crate::router::define_routes(app_state(Arc::new(backbone), authorizer))
}

pub(crate) fn allow_all() -> Arc<dyn Authorize> {
    gate(|_, _| true)
}

pub(crate) fn deny_all() -> Arc<dyn Authorize> {
    Arc::new(DenyAll)
}

pub(crate) fn gate(policy: impl Fn(&str, &str) -> bool + Send + Sync + 'static) -> Arc<dyn Authorize> {
    Arc::new(policy)
}

pub(crate) async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn with_body(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap()
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    with_body("GET", uri, Body::empty())
}

pub(crate) fn delete(uri: &str) -> Request<Body> {
    with_body("DELETE", uri, Body::empty())
}

pub(crate) fn post(uri: &str, body: &'static str) -> Request<Body> {
    with_body("POST", uri, body)
}

pub(crate) fn put(uri: &str, body: &'static str) -> Request<Body> {
    with_body("PUT", uri, body)
}

pub(crate) async fn string_body(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub(crate) async fn json_body(response: Response) -> serde_json::Value {
    serde_json::from_str(&string_body(response).await).unwrap()
}

/// Backbone that counts every call before delegating to an in-memory broker.
#[derive(Clone, Default)]
pub(crate) struct CountingBackbone {
    inner: MemoryBackbone,
    calls: Arc<AtomicUsize>,
}

impl CountingBackbone {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Backbone for CountingBackbone {
    async fn publish(&self, message: Message) -> backbone::Result<()> {
        self.count();
        self.inner.publish(message).await
    }

    async fn subscribe(&self, subject: &str) -> backbone::Result<Box<dyn Subscription>> {
        self.count();
        self.inner.subscribe(subject).await
    }

    async fn request(&self, message: Message, timeout: Duration) -> backbone::Result<Message> {
        self.count();
        self.inner.request(message, timeout).await
    }

    async fn key_value(&self, bucket: &str) -> backbone::Result<Box<dyn KeyValue>> {
        self.count();
        self.inner.key_value(bucket).await
    }
}
