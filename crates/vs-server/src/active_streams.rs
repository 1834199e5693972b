//! Live byte-stream accounting.
//!
//! Each streamed response body holds a [`StreamGuard`]. The count drops when
//! the body is dropped, whether it finished or the client went away.

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;

/// Counter of response bodies currently streaming file bytes.
#[derive(Debug, Clone, Default)]
pub struct ActiveStreams(Arc<AtomicUsize>);

impl ActiveStreams {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn acquire(&self) -> StreamGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        StreamGuard(self.0.clone())
    }
}

/// Decrements the counter when dropped.
#[derive(Debug)]
pub struct StreamGuard(Arc<AtomicUsize>);

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A stream that keeps a [`StreamGuard`] alive for as long as it exists.
pub struct GuardedStream<S> {
    inner: S,
    _guard: StreamGuard,
}

impl<S> GuardedStream<S> {
    pub fn new(inner: S, guard: StreamGuard) -> Self {
        Self {
            inner,
            _guard: guard,
        }
    }
}

impl<S: Stream + Unpin> Stream for GuardedStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
