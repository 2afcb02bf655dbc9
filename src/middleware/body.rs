//! Response body that keeps the request id in scope while it streams.
//!
//! The server polls a response body after the service future has resolved,
//! so the task-local set around that future is gone by then. Each
//! `poll_frame` re-enters the scope.

use std::pin::Pin;
use std::task::{Context, Poll};

use hyper::body::{Body, Frame, SizeHint};

use crate::context;

/// Body returned by [`RequestIdService`](super::RequestIdService).
///
/// For decorated responses every poll of the inner body runs with the
/// resolved id as the current request id. Passed-through responses are
/// polled as they are.
#[derive(Debug)]
pub struct RequestIdBody<B> {
    inner: Pin<Box<B>>,
    id: Option<String>,
}

impl<B> RequestIdBody<B> {
    pub(crate) fn scoped(inner: B, id: String) -> Self {
        Self { inner: Box::pin(inner), id: Some(id) }
    }

    pub(crate) fn passthrough(inner: B) -> Self {
        Self { inner: Box::pin(inner), id: None }
    }
}

impl<B: Body> Body for RequestIdBody<B> {
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let Self { inner, id } = self.get_mut();
        match id {
            Some(id) => context::sync_scope(id.clone(), || inner.as_mut().poll_frame(cx)),
            None => inner.as_mut().poll_frame(cx),
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
