//! Pagination module
//!
//! Token-based auto-pagination for list and search operations.
//!
//! # Overview
//!
//! [`PaginatedInvoker`] calls an [`Operation`](crate::operation::Operation)
//! repeatedly, threading each response's continuation token into the next
//! request. It stops when:
//! - the server returns no token,
//! - the caller asked for a single page (manual paging), or
//! - a caller-imposed item limit has been met.
//!
//! With an item limit active, a failure after at least one item was received
//! ends the run successfully with the partial result instead of an error.

mod invoker;
mod types;

pub use invoker::PaginatedInvoker;
pub use types::{
    negotiate_page_size, FinalSelection, InvocationContext, InvocationOutcome, PageRequest,
    PageResponse, PaginationState, PagingOptions, SelectionMode, DEFAULT_MAX_PAGE_SIZE,
};
