//! Paginated invoker
//!
//! Drives a single-page operation repeatedly, following continuation tokens
//! until the server runs out of pages, the caller's item limit is met, or the
//! caller asked for a single page.

use super::types::{
    FinalSelection, InvocationContext, InvocationOutcome, PageRequest, PageResponse,
    PaginationState, PagingOptions, SelectionMode,
};
use crate::error::{Error, Result};
use crate::operation::Operation;
use crate::output::ResultSink;
use crate::select::ResponseProjector;
use crate::types::JsonObject;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs one list/search operation to completion, page by page
///
/// Calls are strictly sequential: each request carries the token returned by
/// the previous response. A server that never stops handing out tokens keeps
/// an unbounded run going forever; set an item limit or manual paging when the
/// service cannot be trusted to terminate.
pub struct PaginatedInvoker<O> {
    operation: O,
    options: PagingOptions,
    selection: SelectionMode,
    params: JsonObject,
    cancellation: Option<CancellationToken>,
}

impl<O: Operation> PaginatedInvoker<O> {
    /// Create an invoker that auto-iterates with no limit
    pub fn new(operation: O) -> Self {
        Self {
            operation,
            options: PagingOptions::default(),
            selection: SelectionMode::default(),
            params: JsonObject::new(),
            cancellation: None,
        }
    }

    /// Set paging options
    #[must_use]
    pub fn with_options(mut self, options: PagingOptions) -> Self {
        self.options = options;
        self
    }

    /// Set how results reach the caller
    #[must_use]
    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }

    /// Expose the caller's bound inputs to the projector
    #[must_use]
    pub fn with_params(mut self, params: JsonObject) -> Self {
        self.params = params;
        self
    }

    /// Abort the in-flight call when the token is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The wrapped operation
    pub fn operation(&self) -> &O {
        &self.operation
    }

    /// Paging options in effect
    pub fn options(&self) -> &PagingOptions {
        &self.options
    }

    /// Fetch pages until done, emitting to `sink` as they arrive
    pub async fn invoke<S, P>(
        &self,
        mut request: O::Request,
        sink: &mut S,
        projector: &P,
    ) -> Result<InvocationOutcome<P::Output>>
    where
        P: ResponseProjector<O::Response>,
        S: ResultSink<P::Output>,
    {
        let mut context =
            InvocationContext::new(self.operation.name()).with_params(self.params.clone());
        self.validate(projector, &context)?;

        let mut state = PaginationState::from_options(&self.options);
        let server_max = self.operation.max_page_size();
        let mut last_response: Option<O::Response> = None;
        let mut suppressed_error = None;

        loop {
            request.set_next_token(state.current_token.as_ref());

            let requested_size = server_max.and_then(|max| state.page_size_request(max));
            if let Some(size) = requested_size {
                request.set_page_size(size);
            }

            debug!(
                operation = self.operation.name(),
                page = state.pages_fetched + 1,
                has_token = state.current_token.is_some(),
                page_size = ?requested_size,
                "Fetching page"
            );

            let response = match self.call(&request).await {
                Ok(response) => response,
                Err(e) if e.is_transport() && state.can_suppress_failure() => {
                    warn!(
                        operation = self.operation.name(),
                        items = state.items_emitted,
                        "Stopping with partial results: {e}"
                    );
                    suppressed_error = Some(e.to_string());
                    break;
                }
                Err(e) => return Err(e),
            };

            let item_count = response.item_count();
            if let Some(size) = requested_size {
                if item_count > size as usize {
                    warn!(
                        operation = self.operation.name(),
                        requested = size,
                        received = item_count,
                        "Server returned more items than the negotiated page size"
                    );
                }
            }

            state.record_page(item_count, response.next_token());
            context.sync(&state);

            debug!(
                operation = self.operation.name(),
                page = state.pages_fetched,
                items = item_count,
                more = state.current_token.is_some(),
                "Received page"
            );

            match self.selection {
                SelectionMode::Stream => {
                    let value = projector.project(Some(&response), &context)?;
                    sink.emit(value)?;
                }
                SelectionMode::LastResponse => last_response = Some(response),
                SelectionMode::EndOfStream => {}
            }

            if state.is_finished() {
                break;
            }
        }

        let selection = match self.selection {
            SelectionMode::Stream => FinalSelection::Streamed,
            SelectionMode::LastResponse => {
                FinalSelection::Selected(projector.project(last_response.as_ref(), &context)?)
            }
            SelectionMode::EndOfStream => {
                FinalSelection::Selected(projector.project(None, &context)?)
            }
        };

        info!(
            operation = self.operation.name(),
            pages = state.pages_fetched,
            items = state.items_emitted,
            exhausted = state.current_token.is_none(),
            "Invocation complete"
        );

        Ok(InvocationOutcome {
            selection,
            next_token: state.current_token,
            pages_fetched: state.pages_fetched,
            items_emitted: state.items_emitted,
            suppressed_error,
        })
    }

    /// Reject contradictory inputs before any remote call
    fn validate<P>(&self, projector: &P, context: &InvocationContext) -> Result<()>
    where
        P: ResponseProjector<O::Response>,
    {
        if self.options.item_limit == Some(0) {
            return Err(Error::invalid_configuration(
                "item limit must be at least 1",
            ));
        }
        if self.operation.max_page_size() == Some(0) {
            return Err(Error::invalid_configuration(format!(
                "operation '{}' advertises a maximum page size of 0",
                self.operation.name()
            )));
        }
        if self.selection == SelectionMode::EndOfStream && !projector.can_echo() {
            return Err(Error::invalid_configuration(
                "end-of-stream selection requires a projector that echoes bound inputs",
            ));
        }
        projector.validate(context)
    }

    async fn call(&self, request: &O::Request) -> Result<O::Response> {
        let Some(token) = &self.cancellation else {
            return self.operation.call(request).await;
        };
        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            biased;
            () = token.cancelled() => Err(Error::Cancelled),
            result = self.operation.call(request) => result,
        }
    }
}

impl<O: Operation> std::fmt::Debug for PaginatedInvoker<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedInvoker")
            .field("operation", &self.operation.name())
            .field("options", &self.options)
            .field("selection", &self.selection)
            .field("has_cancellation", &self.cancellation.is_some())
            .finish_non_exhaustive()
    }
}
