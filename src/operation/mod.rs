//! Operation module
//!
//! The single-call collaborators driven by the pagination invoker.
//!
//! # Overview
//!
//! - [`Operation`] - one remote call, with an optional page-size capability
//! - [`FnOperation`] - wraps a closure returning a boxed future
//! - [`HttpOperation`] - an operation described by a service definition
//! - [`JsonRequest`] / [`JsonPage`] - generic envelopes for described operations

mod http;
mod json;
mod types;

pub use http::HttpOperation;
pub use json::{JsonPage, JsonRequest};
pub use types::{FnOperation, Operation, OperationFuture};
