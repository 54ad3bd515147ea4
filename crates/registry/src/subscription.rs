//! Subscription handles and key filters.

use parking_lot::Mutex;
use rumble_core::{EventKind, Reaction};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Process-unique identifier for one registered listener.
pub type SubscriptionId = Uuid;

/// Closure type for reaction listeners.
pub type Listener = Arc<dyn Fn(&Reaction) + Send + Sync>;

/// Which keys a subscription matches for its event kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyFilter {
    /// Match one literal key
    Exact(String),
    /// Wildcard - match every key (and keyless events like clear)
    Any,
}

impl KeyFilter {
    /// Whether a reaction key matches this filter.
    ///
    /// `Any` matches everything, including the `None` key of a clear
    /// reaction. An `Exact` filter only matches the same literal key.
    pub fn matches(&self, key: Option<&str>) -> bool {
        match self {
            KeyFilter::Any => true,
            KeyFilter::Exact(k) => key == Some(k.as_str()),
        }
    }
}

/// `"*"` is the conventional wildcard spelling; any other string is an
/// exact key.
impl From<&str> for KeyFilter {
    fn from(s: &str) -> Self {
        if s == "*" {
            KeyFilter::Any
        } else {
            KeyFilter::Exact(s.to_string())
        }
    }
}

impl From<String> for KeyFilter {
    fn from(s: String) -> Self {
        KeyFilter::from(s.as_str())
    }
}

type Canceller = Box<dyn FnOnce() + Send>;

/// A cancellable registration of a listener against an event kind and key.
///
/// The registry owns the listener slot; the caller owns this handle and is
/// responsible for eventually cancelling it to avoid leaks. Dropping the
/// handle does NOT cancel the subscription - cancellation is explicit.
pub struct Subscription {
    id: SubscriptionId,
    event: EventKind,
    key: KeyFilter,
    canceller: Mutex<Option<Canceller>>,
}

impl Subscription {
    /// Build a handle around a one-shot de-registration closure.
    pub fn new(id: SubscriptionId, event: EventKind, key: KeyFilter, cancel: Canceller) -> Self {
        Self {
            id,
            event,
            key,
            canceller: Mutex::new(Some(cancel)),
        }
    }

    /// The process-unique id of this subscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The event kind this subscription was registered for.
    pub fn event(&self) -> EventKind {
        self.event
    }

    /// The key filter this subscription was registered with.
    pub fn key(&self) -> &KeyFilter {
        &self.key
    }

    /// Remove the listener from future dispatches.
    ///
    /// Idempotent: the second and later calls are no-ops. An in-flight
    /// dispatch that already snapshotted the listener list still completes.
    pub fn cancel(&self) {
        if let Some(cancel) = self.canceller.lock().take() {
            cancel();
        }
    }

    /// Whether `cancel` has already run.
    pub fn is_cancelled(&self) -> bool {
        self.canceller.lock().is_none()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("event", &self.event)
            .field("key", &self.key)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn wildcard_matches_everything() {
        assert!(KeyFilter::Any.matches(Some("a")));
        assert!(KeyFilter::Any.matches(None));
    }

    #[test]
    fn exact_matches_only_its_key() {
        let f = KeyFilter::Exact("a".to_string());
        assert!(f.matches(Some("a")));
        assert!(!f.matches(Some("b")));
        assert!(!f.matches(None));
    }

    #[test]
    fn star_string_is_wildcard() {
        assert_eq!(KeyFilter::from("*"), KeyFilter::Any);
        assert_eq!(KeyFilter::from("a"), KeyFilter::Exact("a".to_string()));
    }

    #[test]
    fn cancel_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        let sub = Subscription::new(
            Uuid::new_v4(),
            EventKind::Set,
            KeyFilter::Any,
            Box::new(move || {
                calls2.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(!sub.is_cancelled());
        sub.cancel();
        sub.cancel();
        assert!(sub.is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
