//! Operation trait and closure adapter

use crate::error::Result;
use crate::pagination::{PageRequest, PageResponse};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::marker::PhantomData;

/// One remote list/search call
///
/// Each call to [`Operation::call`] performs exactly one request. Retries,
/// signing and transport concerns belong to the implementation, never to the
/// invoker driving it.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Request envelope carrying the continuation token
    type Request: PageRequest;
    /// Page returned by one call
    type Response: PageResponse;

    /// Operation name, used in logs and error messages
    fn name(&self) -> &str;

    /// Largest page size the request may ask for
    ///
    /// `None` for operations whose page size is chosen by the server.
    fn max_page_size(&self) -> Option<u32> {
        None
    }

    /// Perform one call
    async fn call(&self, request: &Self::Request) -> Result<Self::Response>;
}

/// Boxed future returned by closures wrapped in [`FnOperation`]
pub type OperationFuture<T> = BoxFuture<'static, Result<T>>;

/// Operation backed by a closure
///
/// ```rust,ignore
/// let op = FnOperation::new("ListItems", |req: &MyRequest| {
///     let req = req.clone();
///     Box::pin(async move { fetch(req).await })
/// });
/// ```
pub struct FnOperation<Req, Resp, F> {
    name: String,
    max_page_size: Option<u32>,
    f: F,
    _marker: PhantomData<fn(&Req) -> Resp>,
}

impl<Req, Resp, F> FnOperation<Req, Resp, F>
where
    F: Fn(&Req) -> OperationFuture<Resp> + Send + Sync,
{
    /// Wrap a closure as a named operation
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            max_page_size: None,
            f,
            _marker: PhantomData,
        }
    }

    /// Advertise a page-size field capped at `max`
    #[must_use]
    pub fn with_max_page_size(mut self, max: u32) -> Self {
        self.max_page_size = Some(max);
        self
    }
}

#[async_trait]
impl<Req, Resp, F> Operation for FnOperation<Req, Resp, F>
where
    Req: PageRequest + 'static,
    Resp: PageResponse + 'static,
    F: Fn(&Req) -> OperationFuture<Resp> + Send + Sync,
{
    type Request = Req;
    type Response = Resp;

    fn name(&self) -> &str {
        &self.name
    }

    fn max_page_size(&self) -> Option<u32> {
        self.max_page_size
    }

    async fn call(&self, request: &Req) -> Result<Resp> {
        (self.f)(request).await
    }
}

impl<Req, Resp, F> std::fmt::Debug for FnOperation<Req, Resp, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnOperation")
            .field("name", &self.name)
            .field("max_page_size", &self.max_page_size)
            .finish_non_exhaustive()
    }
}
