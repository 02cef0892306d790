/// Post-mutation stale-view notification
///
/// After every successful mutation the handler marks a fixed set of named
/// views as stale. Any cache or incremental-rendering layer can subscribe
/// to the broadcast and refresh the affected views; with no subscribers the
/// signal is a no-op beyond a debug log.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// The named views a mutation can invalidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// The landing dashboard (stats cards, recent activity, upcoming tasks)
    Dashboard,

    /// The cleaning schedule
    Cleaning,

    /// The roommates list and contribution stats
    Roommates,

    /// The groceries list
    Groceries,
}

impl View {
    /// View name as used in the invalidation signal
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Cleaning => "cleaning",
            View::Roommates => "roommates",
            View::Groceries => "groceries",
        }
    }
}

/// Broadcasts view invalidations to interested subscribers
///
/// Cloneable; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct ViewNotifier {
    tx: broadcast::Sender<View>,
}

impl ViewNotifier {
    /// Creates a notifier with a bounded broadcast buffer
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Marks the given views stale
    ///
    /// Lagging or absent subscribers never fail the mutation that
    /// triggered the signal.
    pub fn invalidate(&self, views: &[View]) {
        for view in views {
            tracing::debug!(view = view.as_str(), "View marked stale");
            let _ = self.tx.send(*view);
        }
    }

    /// Subscribes to invalidation events
    pub fn subscribe(&self) -> broadcast::Receiver<View> {
        self.tx.subscribe()
    }
}

impl Default for ViewNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_invalidations() {
        let notifier = ViewNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.invalidate(&[View::Cleaning, View::Dashboard]);

        assert_eq!(rx.recv().await.unwrap(), View::Cleaning);
        assert_eq!(rx.recv().await.unwrap(), View::Dashboard);
    }

    #[test]
    fn test_invalidate_without_subscribers_is_noop() {
        let notifier = ViewNotifier::new();
        notifier.invalidate(&[View::Groceries]);
    }

    #[test]
    fn test_view_names() {
        assert_eq!(View::Dashboard.as_str(), "dashboard");
        assert_eq!(View::Cleaning.as_str(), "cleaning");
        assert_eq!(View::Roommates.as_str(), "roommates");
        assert_eq!(View::Groceries.as_str(), "groceries");
    }
}
