//! This module holds typed parameters for various endpoint inputs.
//!
//! The purpose of this module is to define and manage the parameters that are used as inputs
//! for different endpoints in the web application. By using typed parameters, we can ensure
//! that the inputs are validated (by type) and correctly formatted before they are processed by the
//! application logic.
//!
//! Subjects arrive either as a `subject` query parameter, taken literally, or as the tail
//! of the request path, which is mapped into subject syntax by [`subject::to_subject`].

pub(crate) mod kv;
pub(crate) mod subject;
