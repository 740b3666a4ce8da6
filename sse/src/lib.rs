//! Streaming subscription bridge: turns one backbone subscription into a continuous,
//! cancellable Server-Sent Events feed.
//!
//! # Architecture
//!
//! - **One session per HTTP request**: a [`Session`] owns exactly one backbone
//!   subscription and one bounded output channel. Nothing is shared across sessions.
//! - **Two producers, one consumer**: the subscription poller and the keepalive
//!   emitter run as independent tasks feeding the channel; the HTTP handler drains it.
//! - **Single cancellation source**: every task races a `CancellationToken` at each
//!   suspension point. Dropping the session (the client went away) cancels it, so no
//!   task outlives the request.
//! - **Bounded polling**: each subscription poll waits at most the configured poll
//!   timeout, which caps shutdown latency even for backbones that ignore cancellation.
//!
//! # Event Flow
//!
//! 1. Client connects to `/subscribe` and passes authorization
//! 2. Handler calls [`Session::open`], which registers the session with the [`Manager`]
//! 3. Poller forwards each backbone message as [`message::Event::Message`]; read
//!    failures become [`message::Event::Error`]
//! 4. Keepalive pushes [`message::Event::Ping`] on every interval
//! 5. Handler turns each event into one SSE frame (`{subject, headers, data}`) and
//!    the transport flushes it
//! 6. Client disconnects, the response stream and with it the session are dropped
//!
//! # Example
//!
//! ```rust,ignore
//! let mut session = Session::open(backbone, "users.john", &SessionConfig::default(), manager);
//! while let Some(event) = session.recv().await {
//!     let frame = event.to_frame()?;
//!     // write frame
//! }
//! ```
//!
//! # Modules
//!
//! - `connection`: SessionRegistry with a subject index and type-safe SessionId
//! - `manager`: process-wide session bookkeeping (delegates to SessionRegistry)
//! - `message`: Event variants and their JSON envelope
//! - `session`: Session lifecycle and configuration

pub mod connection;
mod keepalive;
pub mod manager;
pub mod message;
mod poller;
pub mod session;

pub use manager::Manager;
pub use session::{Session, SessionConfig};
