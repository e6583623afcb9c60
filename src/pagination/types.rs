//! Pagination types and traits
//!
//! Defines the request/response capabilities the invoker relies on, the
//! caller-facing paging options, and the per-invocation state.

use crate::types::{JsonObject, JsonValue, PageToken};

/// Page size the server is documented to accept at most, for operations that
/// expose a page-size request field
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Request / Response Capabilities
// ============================================================================

/// A request that carries a continuation token
///
/// The invoker overwrites the token (and, when the operation negotiates page
/// sizes, the page size) before every call. Every other field must stay
/// untouched for the whole pagination run.
pub trait PageRequest: Send + Sync {
    /// Replace the continuation token; `None` clears it
    fn set_next_token(&mut self, token: Option<&PageToken>);

    /// Token currently carried by the request
    fn next_token(&self) -> Option<PageToken>;

    /// Set the requested page size
    ///
    /// Requests without a page-size field ignore this.
    fn set_page_size(&mut self, _size: u32) {}
}

/// One page returned by a list/search operation
pub trait PageResponse: Send + Sync {
    /// Token for the next page; `None` means the result set is exhausted
    fn next_token(&self) -> Option<PageToken>;

    /// Number of result items carried by this page
    fn item_count(&self) -> usize;
}

// ============================================================================
// Paging Options
// ============================================================================

/// Caller-supplied controls for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingOptions {
    /// Token to present on the first call (resume a previous run)
    pub initial_token: Option<PageToken>,
    /// Fetch exactly one page, whatever token comes back
    pub manual_paging_requested: bool,
    /// Cap on items across all pages (`None` = until exhausted)
    pub item_limit: Option<u64>,
}

impl PagingOptions {
    /// Auto-iterate from the first page with no item limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from the two independent CLI signals
    ///
    /// Either an explicit "no auto-iteration" switch or an explicitly bound
    /// token puts the caller in control of paging. Binding an empty token
    /// still counts as binding one; it just starts from the first page.
    pub fn from_bindings(
        no_auto_iteration: bool,
        token_bound: bool,
        token: Option<PageToken>,
    ) -> Self {
        Self {
            manual_paging_requested: no_auto_iteration || token_bound,
            initial_token: token,
            item_limit: None,
        }
    }

    /// Start from a previously returned token
    #[must_use]
    pub fn with_initial_token(mut self, token: Option<PageToken>) -> Self {
        self.initial_token = token;
        self
    }

    /// Fetch a single page only
    #[must_use]
    pub fn with_manual_paging(mut self, manual: bool) -> Self {
        self.manual_paging_requested = manual;
        self
    }

    /// Cap the total number of items
    #[must_use]
    pub fn with_item_limit(mut self, limit: Option<u64>) -> Self {
        self.item_limit = limit;
        self
    }

    /// Whether an item limit is active
    pub fn is_bounded(&self) -> bool {
        self.item_limit.is_some()
    }
}

/// How the invocation's result reaches the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Project every page and emit it to the sink as it arrives
    #[default]
    Stream,
    /// Emit nothing per page; project the most recent response once at the end
    LastResponse,
    /// Emit nothing per page; call the projector once with no response at the end
    EndOfStream,
}

impl SelectionMode {
    /// Whether pages are emitted to the sink while paging
    pub fn is_streaming(self) -> bool {
        matches!(self, Self::Stream)
    }
}

// ============================================================================
// Pagination State
// ============================================================================

/// Mutable state of one pagination run
///
/// Owned by a single invocation and dropped when it ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Token to present on the next call
    pub current_token: Option<PageToken>,
    /// Items received so far
    pub items_emitted: u64,
    /// Items still wanted (`None` = unbounded)
    pub remaining_limit: Option<u64>,
    /// Exactly one page is fetched when set
    pub user_controlling_paging: bool,
    /// Calls that returned a page
    pub pages_fetched: usize,
}

impl PaginationState {
    /// Initial state for the given options
    pub fn from_options(options: &PagingOptions) -> Self {
        Self {
            current_token: options.initial_token.clone(),
            items_emitted: 0,
            remaining_limit: options.item_limit,
            user_controlling_paging: options.manual_paging_requested,
            pages_fetched: 0,
        }
    }

    /// Page size to request next, given the server maximum
    ///
    /// `None` when no limit is active.
    pub fn page_size_request(&self, server_max: u32) -> Option<u32> {
        self.remaining_limit
            .map(|remaining| negotiate_page_size(server_max, remaining))
    }

    /// Account for a fetched page and adopt its continuation token
    pub fn record_page(&mut self, item_count: usize, next_token: Option<PageToken>) {
        let count = item_count as u64;
        self.pages_fetched += 1;
        self.items_emitted += count;
        if let Some(remaining) = self.remaining_limit.as_mut() {
            *remaining = remaining.saturating_sub(count);
        }
        self.current_token = next_token;
    }

    /// Whether a transport failure at this point may be swallowed in favour
    /// of the partial result already produced
    pub fn can_suppress_failure(&self) -> bool {
        self.remaining_limit.is_some() && self.items_emitted > 0
    }

    /// Whether the loop must stop after the page just recorded
    pub fn is_finished(&self) -> bool {
        self.user_controlling_paging
            || self.current_token.is_none()
            || self.remaining_limit == Some(0)
    }
}

/// Page size for the next request: the server maximum, or fewer when fewer
/// items are still wanted
pub fn negotiate_page_size(server_max: u32, remaining: u64) -> u32 {
    u64::from(server_max).min(remaining) as u32
}

// ============================================================================
// Outcome
// ============================================================================

/// Value returned to the caller once paging ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalSelection<T> {
    /// Every page already went to the sink
    Streamed,
    /// A single projected value
    Selected(T),
}

impl<T> FinalSelection<T> {
    /// Check if the output was streamed
    pub fn is_streamed(&self) -> bool {
        matches!(self, Self::Streamed)
    }

    /// Take the selected value, if any
    pub fn into_selected(self) -> Option<T> {
        match self {
            Self::Selected(value) => Some(value),
            Self::Streamed => None,
        }
    }
}

/// Result of one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationOutcome<T> {
    /// What the caller asked to get back
    pub selection: FinalSelection<T>,
    /// Token left over when paging stopped early; pass it back to resume
    pub next_token: Option<PageToken>,
    /// Number of pages fetched
    pub pages_fetched: usize,
    /// Items received across all pages
    pub items_emitted: u64,
    /// Failure swallowed after partial results in a bounded run
    pub suppressed_error: Option<String>,
}

impl<T> InvocationOutcome<T> {
    /// Whether the server reported the result set as exhausted
    pub fn is_exhausted(&self) -> bool {
        self.next_token.is_none()
    }
}

// ============================================================================
// Invocation Context
// ============================================================================

/// What a projector may know about the invocation it serves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationContext {
    /// Operation name
    pub operation: String,
    /// Inputs bound by the caller, available for echo selection
    pub params: JsonObject,
    /// Pages fetched so far
    pub pages_fetched: usize,
    /// Items received so far
    pub items_emitted: u64,
    /// Token the next call would present
    pub next_token: Option<PageToken>,
}

impl InvocationContext {
    /// Create a context for the named operation
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Default::default()
        }
    }

    /// Attach the caller's bound inputs
    #[must_use]
    pub fn with_params(mut self, params: JsonObject) -> Self {
        self.params = params;
        self
    }

    /// Look up a bound input by name
    pub fn param(&self, name: &str) -> Option<&JsonValue> {
        self.params.get(name)
    }

    /// Refresh progress counters from the pagination state
    pub fn sync(&mut self, state: &PaginationState) {
        self.pages_fetched = state.pages_fetched;
        self.items_emitted = state.items_emitted;
        self.next_token = state.current_token.clone();
    }
}
