//! Live query subscriptions.
//!
//! Stores publish a full collection snapshot through a `tokio::sync::watch`
//! channel on every committed write. A [`Subscription`] re-evaluates its query
//! against the newest snapshot, so observers always see the current matching
//! set without polling.

use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Immutable view of a whole collection.
pub type Snapshot<T> = Arc<Vec<T>>;

type View<T, U> = Arc<dyn Fn(&[T]) -> Vec<U> + Send + Sync>;

/// Query result that follows a collection as it changes.
///
/// # Examples
///
/// ```
/// use portfoliohub_interface::Subscription;
/// use std::sync::Arc;
/// use tokio::sync::watch;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, rx) = watch::channel(Arc::new(vec![1, 2, 3]));
/// let mut evens = Subscription::new(rx, |all: &[i32]| {
///     all.iter().copied().filter(|n| n % 2 == 0).collect()
/// });
/// assert_eq!(evens.current(), vec![2]);
///
/// tx.send(Arc::new(vec![2, 4, 5])).unwrap();
/// assert_eq!(evens.changed().await, Some(vec![2, 4]));
/// # }
/// ```
pub struct Subscription<T, U = T> {
    rx: watch::Receiver<Snapshot<T>>,
    view: View<T, U>,
}

impl<T, U> Subscription<T, U>
where
    T: Clone + Send + Sync + 'static,
    U: Send + 'static,
{
    /// Subscribe `view` to a snapshot channel.
    pub fn new<F>(rx: watch::Receiver<Snapshot<T>>, view: F) -> Self
    where
        F: Fn(&[T]) -> Vec<U> + Send + Sync + 'static,
    {
        Self {
            rx,
            view: Arc::new(view),
        }
    }

    /// Evaluate the query against the latest snapshot.
    pub fn current(&self) -> Vec<U> {
        let snapshot = Arc::clone(&*self.rx.borrow());
        (self.view)(&snapshot[..])
    }

    /// Wait for the next committed write and return the re-evaluated result.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Vec<U>> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }

    /// Stream of results, starting with the current one.
    pub fn into_stream(self) -> impl Stream<Item = Vec<U>> + Send {
        let view = self.view;
        WatchStream::new(self.rx).map(move |snapshot| view(&snapshot[..]))
    }
}

impl<T, U> std::fmt::Debug for Subscription<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
