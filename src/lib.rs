// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # autopage
//!
//! Auto-pagination for token-based list and search web APIs.
//!
//! Many APIs return a result set a page at a time, handing back an opaque
//! continuation token with each page. [`PaginatedInvoker`] wraps a single-page
//! [`Operation`] and keeps calling it, threading each token into the next
//! request, until the server runs out of pages, an item limit is met, or the
//! caller asked for one page only.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use autopage::{
//!     load_service, CollectSink, HttpOperation, PaginatedInvoker, PagingOptions, SelectExpr,
//! };
//!
//! #[tokio::main]
//! async fn main() -> autopage::Result<()> {
//!     let service = load_service("contact-center")?;
//!     let operation = HttpOperation::from_service(&service, "SearchQueues")?;
//!
//!     let mut params = serde_json::Map::new();
//!     params.insert("InstanceId".into(), "my-instance".into());
//!     let request = operation.request(params)?;
//!
//!     let select = SelectExpr::parse("Queues")?;
//!     let invoker = PaginatedInvoker::new(operation)
//!         .with_options(PagingOptions::new().with_item_limit(Some(250)));
//!
//!     let mut sink = CollectSink::new();
//!     let outcome = invoker.invoke(request, &mut sink, &select).await?;
//!     println!("{} pages, resume with {:?}", outcome.pages_fetched, outcome.next_token);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    PaginatedInvoker                      │
//! │  token threading · page-size negotiation · item limit    │
//! └──────────────────────────────────────────────────────────┘
//!          │                    │                    │
//! ┌────────┴───────┐  ┌─────────┴────────┐  ┌────────┴───────┐
//! │   Operation    │  │ResponseProjector │  │   ResultSink   │
//! ├────────────────┤  ├──────────────────┤  ├────────────────┤
//! │ HttpOperation  │  │ SelectExpr       │  │ CollectSink    │
//! │ FnOperation    │  │ FnProjector      │  │ JsonLinesSink  │
//! └────────────────┘  └──────────────────┘  └────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Paginated invoker and paging state
pub mod pagination;

/// Operations driven by the invoker
pub mod operation;

/// Response projection
pub mod select;

/// Result sinks
pub mod output;

/// HTTP client
pub mod http;

/// YAML loader for service definitions
pub mod loader;

/// Built-in service definitions
pub mod services;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use loader::{load_service, load_service_from_str, ServiceDefinition};
pub use operation::{FnOperation, HttpOperation, Operation};
pub use output::{CollectSink, JsonLinesSink, ResultSink};
pub use pagination::{
    FinalSelection, InvocationContext, InvocationOutcome, PageRequest, PageResponse,
    PaginatedInvoker, PagingOptions, SelectionMode,
};
pub use select::{FnProjector, ResponseProjector, SelectExpr};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
