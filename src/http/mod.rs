//! HTTP client module
//!
//! Provides the HTTP transport used by service-defined operations.
//!
//! Retries, rate limiting and request signing are left to the service or a
//! proxy in front of it; each call here is one request.

mod client;

pub use client::{Call, HttpClient, HttpClientConfig};
