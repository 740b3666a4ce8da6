use crate::connection::SessionId;
use crate::message::Event;
use crate::{keepalive, poller, Manager};
use backbone::Backbone;
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Time between synthetic pings.
    pub keepalive_interval: Duration,
    /// Upper bound of one subscription poll, and so of shutdown latency.
    pub poll_timeout: Duration,
    pub channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Send `event` unless the session is cancelled first. Returns false when the event
/// was not delivered and the producer should stop.
pub(crate) async fn forward(
    sender: &mpsc::Sender<Event>,
    event: Event,
    cancel: &CancellationToken,
) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = sender.send(event) => sent.is_ok(),
    }
}

/// One streaming subscription bound to one HTTP request.
///
/// Opening a session spawns a keepalive emitter and a subscription poller that share
/// a bounded channel. The owner drains it with [`Session::recv`]. Dropping the session
/// cancels both producers; [`Session::shutdown`] additionally waits for them to exit.
pub struct Session {
    id: SessionId,
    subject: String,
    cancel: CancellationToken,
    receiver: mpsc::Receiver<Event>,
    tasks: Vec<JoinHandle<()>>,
    manager: Arc<Manager>,
}

impl Session {
    /// Must be called from within a tokio runtime.
    pub fn open(
        backbone: Arc<dyn Backbone>,
        subject: impl Into<String>,
        config: &SessionConfig,
        manager: Arc<Manager>,
    ) -> Self {
        let subject = subject.into();
        let id = manager.register_session(subject.clone());
        let cancel = CancellationToken::new();
        let (sender, receiver) = mpsc::channel(config.channel_capacity.max(1));

        let tasks = vec![
            tokio::spawn(keepalive::run(
                sender.clone(),
                config.keepalive_interval,
                cancel.clone(),
            )),
            tokio::spawn(poller::run(
                backbone,
                subject.clone(),
                sender,
                config.poll_timeout,
                cancel.clone(),
            )),
        ];

        Self {
            id,
            subject,
            cancel,
            receiver,
            tasks,
            manager,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Next event for the stream writer.
    ///
    /// Events already queued are handed out before cancellation is observed, so an
    /// error that ended the session still reaches the client. Returns `None` once the
    /// session is cancelled and drained.
    pub async fn recv(&mut self) -> Option<Event> {
        tokio::select! {
            biased;
            event = self.receiver.recv() => event,
            _ = self.cancel.cancelled() => None,
        }
    }

    /// Cancel the session and wait for both producers to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                error!("Stream session {} task failed: {e}", self.id);
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.manager.unregister_session(&self.id);
    }
}
