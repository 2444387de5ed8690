//! Loading indicator shared with the UI shell.
//!
//! Busy while at least one network fetch is in flight. Purely observational.

use std::sync::Arc;

use tokio::sync::watch;

/// Process-wide "loading" flag.
///
/// Cheap to clone; all clones observe the same flag.
#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    tx: Arc<watch::Sender<usize>>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Whether any fetch is currently in flight.
    pub fn is_loading(&self) -> bool {
        *self.tx.borrow() > 0
    }

    /// Number of fetches currently in flight.
    pub fn in_flight(&self) -> usize {
        *self.tx.borrow()
    }

    /// Receiver notified on every change of the in-flight count.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.tx.subscribe()
    }

    /// Mark a fetch as started. The flag is released when the guard drops.
    pub fn begin(&self) -> LoadingGuard {
        self.tx.send_modify(|count| *count += 1);
        LoadingGuard {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears its share of the loading flag on drop, whether the fetch
/// succeeded, failed or unwound.
#[derive(Debug)]
pub struct LoadingGuard {
    tx: Arc<watch::Sender<usize>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.tx.send_modify(|count| *count = count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_toggles_flag() {
        let loading = LoadingIndicator::new();
        assert!(!loading.is_loading());

        let guard = loading.begin();
        assert!(loading.is_loading());

        drop(guard);
        assert!(!loading.is_loading());
    }

    #[test]
    fn test_overlapping_fetches_keep_flag_set() {
        let loading = LoadingIndicator::new();
        let first = loading.begin();
        let second = loading.clone().begin();
        assert_eq!(loading.in_flight(), 2);

        drop(first);
        assert!(loading.is_loading());
        drop(second);
        assert!(!loading.is_loading());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let loading = LoadingIndicator::new();
        let mut rx = loading.subscribe();

        let guard = loading.begin();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);

        drop(guard);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 0);
    }
}
