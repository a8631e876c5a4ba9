use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// A toast lives for 5 seconds after being posted.
pub const TOAST_TTL: Duration = Duration::from_millis(5_000);
/// Clients start the fade-out once a toast is this old.
pub const FADE_AFTER: Duration = Duration::from_millis(4_500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Wire representation of an active toast.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Toast {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub message: String,
    pub fading: bool,
}

struct ActiveToast {
    id: u64,
    kind: ToastKind,
    message: String,
    posted_at: Instant,
}

struct BusState {
    toasts: Vec<ActiveToast>,
    last_id: u64,
}

/// Process-wide queue of transient user-facing messages. Toasts appear in
/// post order and disappear on their own once the TTL elapses; an explicit
/// dismissal removes them earlier. Expired entries are pruned on every bus
/// access, so a poll after the TTL never sees them.
pub struct ToastBus {
    ttl: Duration,
    fade_after: Duration,
    inner: Mutex<BusState>,
}

impl ToastBus {
    pub fn new() -> Self {
        Self::with_ttl(TOAST_TTL, FADE_AFTER)
    }

    pub fn with_ttl(ttl: Duration, fade_after: Duration) -> Self {
        Self {
            ttl,
            fade_after,
            inner: Mutex::new(BusState { toasts: Vec::new(), last_id: 0 }),
        }
    }

    /// Append a toast and return its id. Ids are derived from the current
    /// time in epoch milliseconds, bumped past the last issued id so two
    /// posts in the same millisecond stay distinct.
    pub fn post(&self, message: impl Into<String>, kind: ToastKind) -> u64 {
        let message = message.into();
        match kind {
            ToastKind::Error => error!("toast: {message}"),
            ToastKind::Warning => warn!("toast: {message}"),
            ToastKind::Success | ToastKind::Info => info!("toast: {message}"),
        }

        let mut state = self.inner.lock();
        prune(&mut state.toasts, self.ttl);
        let id = (Utc::now().timestamp_millis() as u64).max(state.last_id + 1);
        state.last_id = id;
        state.toasts.push(ActiveToast { id, kind, message, posted_at: Instant::now() });
        id
    }

    /// Remove the toast with that id. No-op when it already expired or was
    /// never posted.
    pub fn dismiss(&self, id: u64) {
        let mut state = self.inner.lock();
        prune(&mut state.toasts, self.ttl);
        state.toasts.retain(|t| t.id != id);
    }

    /// Snapshot of the active toasts in post order.
    pub fn active(&self) -> Vec<Toast> {
        let mut state = self.inner.lock();
        prune(&mut state.toasts, self.ttl);
        state
            .toasts
            .iter()
            .map(|t| Toast {
                id: t.id,
                kind: t.kind,
                message: t.message.clone(),
                fading: t.posted_at.elapsed() >= self.fade_after,
            })
            .collect()
    }
}

impl Default for ToastBus {
    fn default() -> Self {
        Self::new()
    }
}

fn prune(toasts: &mut Vec<ActiveToast>, ttl: Duration) {
    toasts.retain(|t| t.posted_at.elapsed() < ttl);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::thread::sleep;

    #[test]
    fn posted_toast_is_immediately_active() {
        let bus = ToastBus::new();
        let id = bus.post("Strategy generated successfully!", ToastKind::Success);
        let active = bus.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, id);
        assert_eq!(active[0].kind, ToastKind::Success);
        assert!(!active[0].fading);
    }

    #[test]
    fn toast_expires_after_ttl() {
        let bus = ToastBus::with_ttl(Duration::from_millis(20), Duration::from_millis(15));
        bus.post("soon gone", ToastKind::Info);
        sleep(Duration::from_millis(30));
        assert!(bus.active().is_empty());
    }

    #[test]
    fn dismissal_removes_before_ttl() {
        let bus = ToastBus::new();
        let id = bus.post("dismiss me", ToastKind::Warning);
        bus.dismiss(id);
        assert!(bus.active().is_empty());
        // Dismissing again is a no-op.
        bus.dismiss(id);
    }

    #[test]
    fn dismissal_leaves_other_toasts_alone() {
        let bus = ToastBus::new();
        let first = bus.post("first", ToastKind::Info);
        let second = bus.post("second", ToastKind::Info);
        bus.dismiss(first);
        let active = bus.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second);
    }

    #[test]
    fn ids_are_unique_and_increasing_within_one_millisecond() {
        let bus = ToastBus::new();
        let ids: Vec<u64> = (0..50).map(|_| bus.post("burst", ToastKind::Info)).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(deduped, ids);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn active_preserves_post_order() {
        let bus = ToastBus::new();
        bus.post("one", ToastKind::Info);
        bus.post("two", ToastKind::Error);
        bus.post("three", ToastKind::Success);
        let messages: Vec<_> = bus.active().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
    }

    #[test]
    fn old_toast_reports_fading_before_removal() {
        let bus = ToastBus::with_ttl(Duration::from_millis(60), Duration::from_millis(10));
        bus.post("fading", ToastKind::Info);
        sleep(Duration::from_millis(20));
        let active = bus.active();
        assert_eq!(active.len(), 1);
        assert!(active[0].fading);
    }

    #[test]
    fn toast_serializes_with_type_key() {
        let bus = ToastBus::new();
        bus.post("hello", ToastKind::Error);
        let value = serde_json::to_value(bus.active()).unwrap();
        assert_eq!(value[0]["type"], "error");
        assert_eq!(value[0]["message"], "hello");
    }
}
