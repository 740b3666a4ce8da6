//! In-process backbone.
//!
//! Subscriptions live in a `DashMap` keyed by a server-generated id, each with its
//! own unbounded channel. Delivery walks the map and sends a clone of the message to
//! every subscription whose subject collides with the published one. Requests use a
//! private `_INBOX.<uuid>` reply subject, the same way a NATS client correlates replies.

use crate::error::{BackboneErrorKind, Error};
use crate::message::Message;
use crate::{subject, Backbone, KeyValue, Result, Subscription};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use log::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

const INBOX_PREFIX: &str = "_INBOX";

struct SubscriptionEntry {
    subject: String,
    sender: UnboundedSender<Message>,
}

#[derive(Default)]
struct Inner {
    subscriptions: DashMap<u64, SubscriptionEntry>,
    next_id: AtomicU64,
    buckets: DashMap<String, Arc<MemoryBucket>>,
}

impl Inner {
    fn register(&self, subject: &str) -> (u64, UnboundedReceiver<Message>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscriptions.insert(
            id,
            SubscriptionEntry {
                subject: subject.to_string(),
                sender,
            },
        );
        (id, receiver)
    }

    fn interested(&self, subject: &str) -> usize {
        self.subscriptions
            .iter()
            .filter(|entry| subject::collide(&entry.subject, subject))
            .count()
    }

    fn deliver(&self, message: &Message) -> usize {
        let mut delivered = 0;
        for entry in self.subscriptions.iter() {
            if !subject::collide(&entry.subject, &message.subject) {
                continue;
            }
            if entry.sender.send(message.clone()).is_ok() {
                delivered += 1;
            } else {
                trace!("Subscription {} dropped before delivery", entry.key());
            }
        }
        delivered
    }
}

/// Cloneable handle to a shared in-process broker.
#[derive(Clone, Default)]
pub struct MemoryBackbone {
    inner: Arc<Inner>,
}

impl MemoryBackbone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `name` if it does not exist yet. Buckets must exist before use.
    pub fn create_bucket(&self, name: &str) {
        self.inner
            .buckets
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryBucket::default()));
    }

    /// Number of live subscriptions, reply inboxes included.
    pub fn subscription_count(&self) -> usize {
        self.inner.subscriptions.len()
    }

    /// Drop every subscription, as a lost connection would.
    pub fn close_subscriptions(&self) {
        self.inner.subscriptions.clear();
    }
}

#[async_trait]
impl Backbone for MemoryBackbone {
    async fn publish(&self, message: Message) -> Result<()> {
        if !subject::is_literal(&message.subject) || message.subject.is_empty() {
            return Err(Error::new(BackboneErrorKind::Other(format!(
                "invalid publish subject: {:?}",
                message.subject
            ))));
        }
        let delivered = self.inner.deliver(&message);
        trace!("Published to {} ({delivered} subscriber(s))", message.subject);
        Ok(())
    }

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>> {
        if subject.is_empty() {
            return Err(Error::new(BackboneErrorKind::Other(
                "invalid subscription subject".to_string(),
            )));
        }
        let (id, receiver) = self.inner.register(subject);
        debug!("Subscription {id} opened on {subject}");
        Ok(Box::new(MemorySubscription {
            id,
            receiver,
            inner: Arc::clone(&self.inner),
        }))
    }

    async fn request(&self, message: Message, timeout: Duration) -> Result<Message> {
        if self.inner.interested(&message.subject) == 0 {
            return Err(Error::new(BackboneErrorKind::NoResponders));
        }

        let inbox = format!("{INBOX_PREFIX}.{}", uuid::Uuid::new_v4().simple());
        let (id, receiver) = self.inner.register(&inbox);
        let mut reply_subscription = MemorySubscription {
            id,
            receiver,
            inner: Arc::clone(&self.inner),
        };

        self.inner.deliver(&message.with_reply(inbox));
        reply_subscription.next_message(timeout).await
    }

    async fn key_value(&self, bucket: &str) -> Result<Box<dyn KeyValue>> {
        match self.inner.buckets.get(bucket) {
            Some(entry) => Ok(Box::new(MemoryKeyValue(Arc::clone(entry.value())))),
            None => Err(Error::new(BackboneErrorKind::NotFound)),
        }
    }
}

pub struct MemorySubscription {
    id: u64,
    receiver: UnboundedReceiver<Message>,
    inner: Arc<Inner>,
}

#[async_trait]
impl Subscription for MemorySubscription {
    async fn next_message(&mut self, wait: Duration) -> Result<Message> {
        match tokio::time::timeout(wait, self.receiver.recv()).await {
            Ok(Some(message)) => Ok(message),
            Ok(None) => Err(Error::new(BackboneErrorKind::Closed)),
            Err(_) => Err(Error::new(BackboneErrorKind::Timeout)),
        }
    }

    async fn unsubscribe(self: Box<Self>) -> Result<()> {
        // Removal happens in Drop.
        Ok(())
    }
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        if self.inner.subscriptions.remove(&self.id).is_some() {
            debug!("Subscription {} released", self.id);
        }
    }
}

#[derive(Default)]
struct MemoryBucket {
    entries: DashMap<String, Bytes>,
}

struct MemoryKeyValue(Arc<MemoryBucket>);

#[async_trait]
impl KeyValue for MemoryKeyValue {
    async fn get(&self, key: &str) -> Result<Bytes> {
        self.0
            .entries
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::new(BackboneErrorKind::NotFound))
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<()> {
        self.0.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.0.entries.remove(key);
        Ok(())
    }
}
