use crate::message::Event;
use crate::session::forward;
use log::*;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Push one [`Event::Ping`] per `period` until `cancel` fires.
///
/// The first ping goes out one full period after start. A slow consumer delays the
/// following tick instead of producing a burst of pings.
pub(crate) async fn run(sender: Sender<Event>, period: Duration, cancel: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        trace!("Sending keepalive ping");
        if !forward(&sender, Event::Ping, &cancel).await {
            break;
        }
    }

    trace!("Keepalive stopped");
}
