use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use futures::Stream;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::debug;

use crate::application::error::ApplicationError;

/// Change feed for one collection. Every mutation bumps a revision;
/// listeners turn each revision into a fresh view of the collection.
#[derive(Clone)]
pub struct ChangeFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    sender: broadcast::Sender<u64>,
    revision: AtomicU64,
}

struct ListenState<F> {
    feed: ChangeFeed,
    receiver: broadcast::Receiver<u64>,
    pending: Option<u64>,
    load: F,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(FeedInner {
                sender,
                revision: AtomicU64::new(0),
            }),
        }
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::SeqCst)
    }

    pub fn notify(&self) -> u64 {
        let revision = self.inner.revision.fetch_add(1, Ordering::SeqCst) + 1;
        // No listeners is not an error.
        let _ = self.inner.sender.send(revision);
        revision
    }

    /// Lazy stream of `(revision, view)` pairs built by `load`. The first
    /// item reflects the current state; later items follow each change.
    /// Queued changes are coalesced, so a slow consumer only sees the
    /// newest view.
    pub fn listen<T, F, Fut>(
        &self,
        load: F,
    ) -> impl Stream<Item = Result<(u64, T), ApplicationError>> + Send + 'static
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApplicationError>> + Send + 'static,
    {
        let state = ListenState {
            feed: self.clone(),
            receiver: self.inner.sender.subscribe(),
            pending: Some(self.revision()),
            load,
        };

        futures::stream::unfold(state, |mut state| async move {
            let mut revision = match state.pending.take() {
                Some(revision) => revision,
                None => match state.receiver.recv().await {
                    Ok(revision) => revision,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Listener lagged by {} revisions", skipped);
                        state.feed.revision()
                    }
                    Err(RecvError::Closed) => return None,
                },
            };

            loop {
                match state.receiver.try_recv() {
                    Ok(newer) => revision = revision.max(newer),
                    Err(TryRecvError::Lagged(_)) => revision = state.feed.revision(),
                    Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                }
            }

            let view = (state.load)().await.map(|value| (revision, value));
            Some((view, state))
        })
    }
}
