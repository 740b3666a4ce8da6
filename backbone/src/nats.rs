//! NATS backed implementation of the backbone traits.

use crate::error::{BackboneErrorKind, Error};
use crate::message::{Headers, Message};
use crate::{Backbone, KeyValue, Result, Subscription};
use async_nats::jetstream::{self, context::KeyValueErrorKind, kv};
use async_nats::client::RequestErrorKind;
use async_nats::HeaderMap;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use log::*;
use std::time::Duration;

/// Shared NATS connection plus its JetStream context.
///
/// `async_nats::Client` is cheap to clone and safe to use from many tasks, so a single
/// instance serves every stream session.
#[derive(Clone)]
pub struct NatsBackbone {
    client: async_nats::Client,
    jetstream: jetstream::Context,
}

impl NatsBackbone {
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {url}");
        let client = async_nats::connect(url)
            .await
            .map_err(|e| Error::with_source(BackboneErrorKind::Connection, e))?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: async_nats::Client) -> Self {
        let jetstream = jetstream::new(client.clone());
        Self { client, jetstream }
    }
}

fn to_header_map(headers: &Headers) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, values) in headers.iter() {
        for value in values {
            map.append(name, value.as_str());
        }
    }
    map
}

fn from_nats(message: async_nats::Message) -> Message {
    let mut headers = Headers::new();
    if let Some(map) = &message.headers {
        for (name, values) in map.iter() {
            for value in values {
                headers.append(name.to_string(), value.to_string());
            }
        }
    }

    Message {
        subject: message.subject.to_string(),
        reply: message.reply.map(|reply| reply.to_string()),
        headers,
        data: message.payload,
    }
}

#[async_trait]
impl Backbone for NatsBackbone {
    async fn publish(&self, message: Message) -> Result<()> {
        let headers = to_header_map(&message.headers);
        let result = match message.reply {
            Some(reply) => {
                self.client
                    .publish_with_reply_and_headers(message.subject, reply, headers, message.data)
                    .await
            }
            None => {
                self.client
                    .publish_with_headers(message.subject, headers, message.data)
                    .await
            }
        };
        result.map_err(|e| Error::with_source(BackboneErrorKind::Other("publish failed".into()), e))
    }

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| {
                Error::with_source(BackboneErrorKind::Other("subscribe failed".into()), e)
            })?;
        Ok(Box::new(NatsSubscription { subscriber }))
    }

    async fn request(&self, message: Message, timeout: Duration) -> Result<Message> {
        let request = async_nats::Request::new()
            .headers(to_header_map(&message.headers))
            .payload(message.data)
            .timeout(Some(timeout));

        match self.client.send_request(message.subject, request).await {
            Ok(reply) => Ok(from_nats(reply)),
            Err(e) => {
                let kind = match e.kind() {
                    RequestErrorKind::NoResponders => BackboneErrorKind::NoResponders,
                    RequestErrorKind::TimedOut => BackboneErrorKind::Timeout,
                    _ => BackboneErrorKind::Other("request failed".into()),
                };
                Err(Error::with_source(kind, e))
            }
        }
    }

    async fn key_value(&self, bucket: &str) -> Result<Box<dyn KeyValue>> {
        match self.jetstream.get_key_value(bucket).await {
            Ok(store) => Ok(Box::new(NatsKeyValue(store))),
            Err(e) => {
                let kind = match e.kind() {
                    KeyValueErrorKind::GetBucket => BackboneErrorKind::NotFound,
                    KeyValueErrorKind::InvalidStoreName => {
                        BackboneErrorKind::Other("invalid bucket name".into())
                    }
                    _ => BackboneErrorKind::Other("key-value lookup failed".into()),
                };
                Err(Error::with_source(kind, e))
            }
        }
    }
}

struct NatsSubscription {
    subscriber: async_nats::Subscriber,
}

#[async_trait]
impl Subscription for NatsSubscription {
    async fn next_message(&mut self, wait: Duration) -> Result<Message> {
        match tokio::time::timeout(wait, self.subscriber.next()).await {
            Ok(Some(message)) => Ok(from_nats(message)),
            Ok(None) => Err(Error::new(BackboneErrorKind::Closed)),
            Err(_) => Err(Error::new(BackboneErrorKind::Timeout)),
        }
    }

    async fn unsubscribe(mut self: Box<Self>) -> Result<()> {
        self.subscriber
            .unsubscribe()
            .await
            .map_err(|e| Error::with_source(BackboneErrorKind::Closed, e))
    }
}

struct NatsKeyValue(kv::Store);

#[async_trait]
impl KeyValue for NatsKeyValue {
    async fn get(&self, key: &str) -> Result<Bytes> {
        match self.0.get(key).await {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(Error::new(BackboneErrorKind::NotFound)),
            Err(e) => Err(Error::with_source(
                BackboneErrorKind::Other("key-value get failed".into()),
                e,
            )),
        }
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<()> {
        self.0.put(key, value).await.map(|_revision| ()).map_err(|e| {
            Error::with_source(BackboneErrorKind::Other("key-value put failed".into()), e)
        })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.0.delete(key).await.map_err(|e| {
            Error::with_source(BackboneErrorKind::Other("key-value delete failed".into()), e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_map_carries_names_and_values() {
        let mut headers = Headers::new();
        headers.append("x-trace", "a");
        headers.append("x-trace", "b");
        headers.insert("Nats-Service-Error-Code", "404");

        let map = to_header_map(&headers);
        assert_eq!(
            map.get("Nats-Service-Error-Code").map(|v| v.to_string()),
            Some("404".to_string())
        );
        assert_eq!(map.get("x-trace").map(|v| v.to_string()), Some("a".to_string()));
    }
}
