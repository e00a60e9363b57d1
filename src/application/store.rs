//! StateStore - Observable snapshot container.
//!
//! Wraps a `tokio::sync::watch` channel so there is exactly one writer (the
//! owner of the store) and any number of readers. Every `update` runs its
//! closure under the channel lock and notifies subscribers once, so readers
//! only ever observe complete transitions.

use tokio::sync::watch;

/// Receiver half handed to observers; yields on every published snapshot.
pub type StateWatcher<S> = watch::Receiver<S>;

/// Single-writer, multi-reader holder of the current snapshot.
#[derive(Debug)]
pub struct StateStore<S> {
    sender: watch::Sender<S>,
}

impl<S: Clone> StateStore<S> {
    /// Creates a store publishing `initial`.
    pub fn new(initial: S) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self { sender }
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> S {
        self.sender.borrow().clone()
    }

    /// Subscribes to future snapshots. The receiver starts at the current one.
    pub fn subscribe(&self) -> StateWatcher<S> {
        self.sender.subscribe()
    }

    /// Applies `f` atomically and notifies subscribers, even when nobody is
    /// currently subscribed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut S),
    {
        self.sender.send_modify(f);
    }

    /// Reads a value out of the current snapshot without cloning all of it.
    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&self.sender.borrow())
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<S: Clone + Default> Default for StateStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
