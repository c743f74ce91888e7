//! Pointer/keyboard event model and the subscription routing table.
//!
//! Events originate in the host's dispatcher and are processed strictly
//! in dispatch order; the overlay never reorders or batches. Instead of
//! storing handler closures, the [`EventBus`] is an id-indexed routing
//! table: widgets subscribe a [`WidgetId`] to an [`EventKind`] and the
//! dispatcher looks the targets up per event. This keeps routing free
//! of object identity comparisons and makes subscription leaks
//! observable (a widget still routed after teardown is a bug).

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event delivered by the host, positions in device pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

impl PointerEvent {
    /// Device-space position carried by the event.
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => *position,
        }
    }
}

/// Keyboard event delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Event categories a widget can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    KeyPress,
}

/// Identity of a routable widget.
///
/// Every draggable or pickable entity is tagged with a `WidgetId` at
/// construction and registered in the routing table; event handlers
/// look the id up rather than comparing object references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId(Uuid);

impl WidgetId {
    /// Mint a fresh widget id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Disposer token for one routing-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
struct Entry {
    id: SubscriptionId,
    kind: EventKind,
    widget: WidgetId,
}

/// Id-indexed subscription table.
#[derive(Debug, Default)]
pub struct EventBus {
    next: u64,
    entries: Vec<Entry>,
}

impl EventBus {
    /// Create an empty routing table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route events of `kind` to `widget`. Returns the disposer token
    /// the owning widget must release on teardown.
    pub fn subscribe(&mut self, kind: EventKind, widget: WidgetId) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next += 1;
        self.entries.push(Entry { id, kind, widget });
        id
    }

    /// Remove one routing entry. Idempotent; returns whether an entry
    /// was actually removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Widgets currently routed for `kind`, in subscription order.
    pub fn targets(&self, kind: EventKind) -> impl Iterator<Item = WidgetId> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.kind == kind)
            .map(|e| e.widget)
    }

    /// Whether `widget` is currently routed for `kind`.
    pub fn is_subscribed(&self, widget: WidgetId, kind: EventKind) -> bool {
        self.entries
            .iter()
            .any(|e| e.widget == widget && e.kind == kind)
    }

    /// Total number of live routing entries.
    pub fn subscription_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_and_route() {
        let mut bus = EventBus::new();
        let widget = WidgetId::new();
        bus.subscribe(EventKind::PointerMove, widget);

        assert!(bus.is_subscribed(widget, EventKind::PointerMove));
        assert!(!bus.is_subscribed(widget, EventKind::PointerUp));
        assert_eq!(bus.targets(EventKind::PointerMove).count(), 1);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let mut bus = EventBus::new();
        let widget = WidgetId::new();
        let sub = bus.subscribe(EventKind::PointerUp, widget);

        assert!(bus.unsubscribe(sub));
        assert!(!bus.unsubscribe(sub));
        assert_eq!(bus.subscription_count(), 0);
    }

    #[test]
    fn test_targets_preserve_subscription_order() {
        let mut bus = EventBus::new();
        let first = WidgetId::new();
        let second = WidgetId::new();
        bus.subscribe(EventKind::PointerDown, first);
        bus.subscribe(EventKind::PointerDown, second);

        let targets: Vec<WidgetId> = bus.targets(EventKind::PointerDown).collect();
        assert_eq!(targets, vec![first, second]);
    }
}
