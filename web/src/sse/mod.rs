//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the subscribe endpoints.
//! The core streaming infrastructure (Session, Manager, Event envelope)
//! lives in the `sse` crate.

pub mod handler;
