use crate::message::Event;
use crate::session::forward;
use backbone::{Backbone, BackboneErrorKind};
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;

/// Own one backbone subscription for the lifetime of a session and forward whatever
/// it yields onto the session channel.
///
/// Each poll waits at most `poll_timeout`; an elapsed wait is silently retried. Read
/// failures become [`Event::Error`] and polling continues. Failing to subscribe, or
/// losing the subscription for good, sends one error event and cancels the session.
pub(crate) async fn run(
    backbone: Arc<dyn Backbone>,
    subject: String,
    sender: Sender<Event>,
    poll_timeout: Duration,
    cancel: CancellationToken,
) {
    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        opened = backbone.subscribe(&subject) => opened,
    };

    let mut subscription = match opened {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!("Failed to subscribe to {subject}: {e}");
            forward(&sender, Event::Error(e.to_string()), &cancel).await;
            cancel.cancel();
            return;
        }
    };
    debug!("Polling subscription on {subject}");

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = subscription.next_message(poll_timeout) => next,
        };

        match next {
            Ok(message) => {
                if !forward(&sender, Event::Message(message), &cancel).await {
                    break;
                }
            }
            Err(e) if e.is_timeout() => continue,
            Err(e) if e.error_kind == BackboneErrorKind::Closed => {
                warn!("Subscription on {subject} closed: {e}");
                forward(&sender, Event::Error(e.to_string()), &cancel).await;
                cancel.cancel();
                break;
            }
            Err(e) => {
                warn!("Failed to read from subscription on {subject}: {e}");
                if !forward(&sender, Event::Error(e.to_string()), &cancel).await {
                    break;
                }
            }
        }
    }

    if let Err(e) = subscription.unsubscribe().await {
        warn!("Failed to unsubscribe from {subject}: {e}");
    }
    debug!("Stopped polling {subject}");
}
