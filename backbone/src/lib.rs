//! Publish/subscribe backbone capability consumed by the gateway.
//!
//! The gateway never talks to a concrete messaging client directly. Everything it
//! needs from the backbone is expressed by three traits:
//!
//! - [`Backbone`]: publish, subscribe, correlated request/reply and key-value bucket lookup
//! - [`Subscription`]: a pollable cursor over one subscription with a bounded wait
//! - [`KeyValue`]: get/put/delete on a single bucket
//!
//! Two implementations ship with this crate:
//!
//! - [`nats::NatsBackbone`]: backed by `async-nats` and its JetStream key-value store
//! - [`memory::MemoryBackbone`]: an in-process broker used for local development and tests
//!
//! All implementations must be safe for concurrent use by many stream sessions.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

pub mod error;
pub mod memory;
pub mod message;
pub mod nats;
pub mod subject;

pub use error::{BackboneErrorKind, Error};
pub use message::{Headers, Message};

pub type Result<T> = core::result::Result<T, Error>;

#[async_trait]
pub trait Backbone: Send + Sync {
    /// Fire-and-forget publish. No acknowledgement is awaited.
    async fn publish(&self, message: Message) -> Result<()>;

    /// Open one subscription on `subject`.
    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>>;

    /// Send one correlated request and wait up to `timeout` for its single reply.
    ///
    /// Fails with [`BackboneErrorKind::NoResponders`] when nothing is subscribed to the
    /// request subject and with [`BackboneErrorKind::Timeout`] when the deadline passes.
    async fn request(&self, message: Message, timeout: Duration) -> Result<Message>;

    /// Look up an existing key-value bucket. Unknown buckets fail with
    /// [`BackboneErrorKind::NotFound`].
    async fn key_value(&self, bucket: &str) -> Result<Box<dyn KeyValue>>;
}

#[async_trait]
pub trait Subscription: Send {
    /// Wait at most `wait` for the next message.
    ///
    /// An elapsed wait is reported as [`BackboneErrorKind::Timeout`] and is routine.
    /// [`BackboneErrorKind::Closed`] means the subscription will never deliver again.
    async fn next_message(&mut self, wait: Duration) -> Result<Message>;

    /// Release the subscription. Dropping it has the same effect, minus the error report.
    async fn unsubscribe(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait KeyValue: Send + Sync {
    async fn get(&self, key: &str) -> Result<Bytes>;
    async fn put(&self, key: &str, value: Bytes) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}
