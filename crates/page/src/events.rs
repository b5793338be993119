//! Input event dispatch.
//!
//! Events propagate capture → target → bubble, DOM-style. Capture listeners
//! on the document root run before anything else on the page, which is what
//! lets the shield filter input ahead of listeners installed by embedded
//! content.

use crate::node::NodeId;
use crate::tree::PageTree;
use std::collections::HashMap;
use std::sync::Arc;

/// Input event types routed through the host pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    PointerDown,
    PointerUp,
    Click,
    TouchStart,
    ContextMenu,
    Custom(String),
}

impl EventType {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pointerdown" => EventType::PointerDown,
            "pointerup" => EventType::PointerUp,
            "click" => EventType::Click,
            "touchstart" => EventType::TouchStart,
            "contextmenu" => EventType::ContextMenu,
            other => EventType::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventType::PointerDown => "pointerdown",
            EventType::PointerUp => "pointerup",
            EventType::Click => "click",
            EventType::TouchStart => "touchstart",
            EventType::ContextMenu => "contextmenu",
            EventType::Custom(s) => s,
        }
    }

    /// The gesture types a first-click hijack rides on.
    pub fn is_activation(&self) -> bool {
        matches!(
            self,
            EventType::PointerDown | EventType::PointerUp | EventType::Click | EventType::TouchStart
        )
    }
}

/// Event phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// An input event.
#[derive(Clone, Debug)]
pub struct Event {
    /// Event type.
    pub event_type: EventType,
    /// Target node.
    pub target: NodeId,
    /// Current node during propagation.
    pub current_target: Option<NodeId>,
    /// Propagation path: target first, root last.
    pub path: Vec<NodeId>,
    /// Event phase.
    pub phase: EventPhase,
    /// Whether default was prevented.
    pub default_prevented: bool,
    /// Whether propagation was stopped.
    pub propagation_stopped: bool,
    /// Whether immediate propagation was stopped.
    pub immediate_propagation_stopped: bool,
}

impl Event {
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            current_target: None,
            path: Vec::new(),
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Prevent the default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop propagation to further nodes.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation entirely, including remaining listeners on the
    /// current node.
    pub fn stop_immediate_propagation(&mut self) {
        self.immediate_propagation_stopped = true;
        self.propagation_stopped = true;
    }
}

/// Event listener callback.
pub type EventCallback = Arc<dyn Fn(&mut Event) + Send + Sync>;

/// Handle for removing a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    callback: EventCallback,
    capture: bool,
}

/// Dispatches events across the page tree.
pub struct EventDispatcher {
    /// Listeners by node and event type.
    listeners: HashMap<NodeId, HashMap<EventType, Vec<Listener>>>,
    next_listener_id: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_listener_id: 1,
        }
    }

    /// Register a listener; `capture` runs it in the capture phase.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        event_type: EventType,
        callback: EventCallback,
        capture: bool,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners
            .entry(node)
            .or_default()
            .entry(event_type)
            .or_default()
            .push(Listener { id, callback, capture });
        id
    }

    /// Remove a listener by id.
    pub fn remove_listener(&mut self, id: ListenerId) {
        for node_listeners in self.listeners.values_mut() {
            for type_listeners in node_listeners.values_mut() {
                type_listeners.retain(|l| l.id != id);
            }
        }
    }

    /// Remove all listeners for a node.
    pub fn remove_all(&mut self, node: NodeId) {
        self.listeners.remove(&node);
    }

    /// Dispatch an event to a target.
    ///
    /// Returns `true` if the default action should proceed.
    pub fn dispatch(&self, tree: &PageTree, event: &mut Event) -> bool {
        let path = tree.propagation_path(event.target);
        if path.is_empty() {
            return true;
        }
        event.path = path.clone();

        // Capture phase: root towards the target's parent.
        event.phase = EventPhase::Capturing;
        for &node in path.iter().rev() {
            if node == event.target {
                break;
            }
            event.current_target = Some(node);
            self.invoke(node, event, true);
            if event.propagation_stopped {
                event.phase = EventPhase::None;
                return !event.default_prevented;
            }
        }

        // Target phase.
        event.phase = EventPhase::AtTarget;
        event.current_target = Some(event.target);
        self.invoke(event.target, event, false);
        if event.propagation_stopped {
            event.phase = EventPhase::None;
            return !event.default_prevented;
        }

        // Bubble phase: target's parent towards the root.
        event.phase = EventPhase::Bubbling;
        for &node in path.iter().skip(1) {
            event.current_target = Some(node);
            self.invoke(node, event, false);
            if event.propagation_stopped {
                break;
            }
        }

        event.phase = EventPhase::None;
        !event.default_prevented
    }

    fn invoke(&self, node: NodeId, event: &mut Event, capture: bool) {
        let Some(type_listeners) = self
            .listeners
            .get(&node)
            .and_then(|n| n.get(&event.event_type))
        else {
            return;
        };

        for listener in type_listeners {
            let at_target = event.phase == EventPhase::AtTarget;
            if listener.capture == capture || at_target {
                (listener.callback)(event);
                if event.immediate_propagation_stopped {
                    break;
                }
            }
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
