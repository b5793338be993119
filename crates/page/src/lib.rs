//! Host-page model.
//!
//! A reduced page abstraction for the player host: a node tree for the
//! control surface and embed container, a capture-phase event dispatch
//! pipeline, and the page-global capability table (window opening, dialogs,
//! leave warning) that the shield layer temporarily owns.

pub mod capabilities;
pub mod events;
pub mod node;
pub mod tree;

pub use capabilities::{AlertFn, Capabilities, ConfirmFn, LeaveGuardFn, OpenFn, PromptFn};
pub use events::{Event, EventCallback, EventDispatcher, EventPhase, EventType, ListenerId};
pub use node::{Node, NodeId};
pub use tree::PageTree;
