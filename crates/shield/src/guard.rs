//! Capture-phase input filtering.
//!
//! Many hijack techniques fire on the very first user gesture anywhere on
//! the page. The guard registers capture-phase listeners at the document
//! root, so it runs before any listener installed by embedded content, and
//! suppresses every activation gesture whose propagation path does not
//! touch the host's designated safe zone while a shield phase is active.

use crate::telemetry::{BlockReason, TelemetryCounter};
use crate::timer::Generation;
use page::events::{Event, EventDispatcher, EventType, ListenerId};
use page::node::NodeId;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Default)]
struct GuardState {
    active: bool,
    generation: Generation,
    safe_zone: HashSet<NodeId>,
}

/// Filters input events during an active shield.
pub struct InputEventGuard {
    telemetry: Arc<TelemetryCounter>,
    state: Arc<RwLock<GuardState>>,
    listeners: Vec<ListenerId>,
}

impl InputEventGuard {
    pub fn new(telemetry: Arc<TelemetryCounter>) -> Self {
        Self {
            telemetry,
            state: Arc::new(RwLock::new(GuardState::default())),
            listeners: Vec::new(),
        }
    }

    /// Register capture-phase listeners at the document root. Idempotent.
    pub fn install(&mut self, dispatcher: &mut EventDispatcher, document_root: NodeId) {
        if !self.listeners.is_empty() {
            return;
        }
        for event_type in [
            EventType::PointerDown,
            EventType::PointerUp,
            EventType::Click,
            EventType::TouchStart,
        ] {
            let state = self.state.clone();
            let telemetry = self.telemetry.clone();
            let callback = Arc::new(move |event: &mut Event| {
                let (suppress, generation) = {
                    let state = state.read();
                    if !state.active {
                        return;
                    }
                    let in_safe_zone = event.path.iter().any(|n| state.safe_zone.contains(n));
                    (!in_safe_zone, state.generation)
                };
                if suppress {
                    event.prevent_default();
                    event.stop_immediate_propagation();
                    telemetry.increment(BlockReason::Interaction);
                    tracing::debug!(
                        generation,
                        event_type = event.event_type.as_str(),
                        "suppressed out-of-zone interaction"
                    );
                }
            });
            let id = dispatcher.add_listener(document_root, event_type, callback, true);
            self.listeners.push(id);
        }
        tracing::debug!("input guard listeners installed");
    }

    /// Remove the document-root listeners.
    pub fn uninstall(&mut self, dispatcher: &mut EventDispatcher) {
        for id in self.listeners.drain(..) {
            dispatcher.remove_listener(id);
        }
        tracing::debug!("input guard listeners removed");
    }

    /// Start filtering for a session.
    pub fn activate(&self, generation: Generation) {
        let mut state = self.state.write();
        state.active = true;
        state.generation = generation;
    }

    /// Stop filtering. Events pass through untouched afterwards.
    pub fn deactivate(&self) {
        self.state.write().active = false;
    }

    pub fn is_active(&self) -> bool {
        self.state.read().active
    }

    /// Mark a host-owned element as exempt from suppression. Descendants
    /// are exempt too, since they share its propagation path.
    pub fn designate(&self, node: NodeId) {
        self.state.write().safe_zone.insert(node);
    }

    /// Remove a safe-zone designation.
    pub fn revoke(&self, node: NodeId) {
        self.state.write().safe_zone.remove(&node);
    }

    /// Drop every designation.
    pub fn clear_safe_zone(&self) {
        self.state.write().safe_zone.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page::tree::PageTree;

    struct Fixture {
        tree: PageTree,
        dispatcher: EventDispatcher,
        guard: InputEventGuard,
        telemetry: Arc<TelemetryCounter>,
        overlay: NodeId,
        back_button: NodeId,
        embed: NodeId,
    }

    fn fixture() -> Fixture {
        let mut tree = PageTree::new();
        let overlay = tree.create_labeled("div", "controls-overlay");
        let back_button = tree.create_labeled("button", "back");
        let embed = tree.create_labeled("iframe", "embed");
        tree.append_child(tree.root(), overlay).unwrap();
        tree.append_child(overlay, back_button).unwrap();
        tree.append_child(tree.root(), embed).unwrap();

        let telemetry = Arc::new(TelemetryCounter::new());
        let mut dispatcher = EventDispatcher::new();
        let mut guard = InputEventGuard::new(telemetry.clone());
        guard.install(&mut dispatcher, tree.root());
        guard.designate(overlay);

        Fixture {
            tree,
            dispatcher,
            guard,
            telemetry,
            overlay,
            back_button,
            embed,
        }
    }

    #[test]
    fn test_out_of_zone_click_suppressed() {
        let f = fixture();
        f.guard.activate(1);

        let mut event = Event::new(EventType::Click, f.embed);
        let default_allowed = f.dispatcher.dispatch(&f.tree, &mut event);
        assert!(!default_allowed);
        assert!(event.immediate_propagation_stopped);

        let snapshot = f.telemetry.current();
        assert_eq!(snapshot.count, 1);
        assert_eq!(snapshot.last_reason, Some(BlockReason::Interaction));
    }

    #[test]
    fn test_safe_zone_click_delivered() {
        let f = fixture();
        f.guard.activate(1);

        // The button is a descendant of the designated overlay.
        let mut event = Event::new(EventType::Click, f.back_button);
        let default_allowed = f.dispatcher.dispatch(&f.tree, &mut event);
        assert!(default_allowed);
        assert!(!event.propagation_stopped);
        assert_eq!(f.telemetry.current().count, 0);
    }

    #[test]
    fn test_inactive_guard_passes_everything() {
        let f = fixture();

        let mut event = Event::new(EventType::PointerDown, f.embed);
        assert!(f.dispatcher.dispatch(&f.tree, &mut event));
        assert_eq!(f.telemetry.current().count, 0);
    }

    #[test]
    fn test_deactivate_stops_filtering() {
        let f = fixture();
        f.guard.activate(1);
        f.guard.deactivate();

        let mut event = Event::new(EventType::TouchStart, f.embed);
        assert!(f.dispatcher.dispatch(&f.tree, &mut event));
        assert_eq!(f.telemetry.current().count, 0);
    }

    #[test]
    fn test_revoke_designation() {
        let f = fixture();
        f.guard.activate(1);
        f.guard.revoke(f.overlay);

        let mut event = Event::new(EventType::Click, f.back_button);
        assert!(!f.dispatcher.dispatch(&f.tree, &mut event));
        assert_eq!(f.telemetry.current().count, 1);
    }

    #[test]
    fn test_uninstall_removes_listeners() {
        let mut f = fixture();
        f.guard.activate(1);
        f.guard.uninstall(&mut f.dispatcher);

        let mut event = Event::new(EventType::Click, f.embed);
        assert!(f.dispatcher.dispatch(&f.tree, &mut event));
        assert_eq!(f.telemetry.current().count, 0);
    }
}
