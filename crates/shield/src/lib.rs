//! Hijack-mitigation shield.
//!
//! This crate implements the defense layer that guards the host page while
//! untrusted embedded content initializes:
//! - Provider-tuned shield timing policy
//! - Scoped interception of page-global capabilities
//! - Capture-phase input filtering outside a designated safe zone
//! - The phased, timer-driven shield state machine
//! - Blocked-attempt telemetry for the presentation layer
//!
//! This is best-effort heuristic mitigation layered above normal
//! sandboxing, not a security boundary: it reduces nuisance interruptions
//! during the untrusted initialization window and nothing more.

pub mod classifier;
pub mod controller;
pub mod guard;
pub mod interceptor;
pub mod policy;
pub mod telemetry;
pub mod timer;

pub use classifier::{DialogClassifier, KeywordClassifier};
pub use controller::{ShieldController, ShieldPhase, ShieldSnapshot};
pub use guard::InputEventGuard;
pub use interceptor::CapabilityInterceptor;
pub use policy::{resolve, PolicyEntry, ResolvedPolicy};
pub use telemetry::{BlockReason, TelemetryCounter, TelemetrySnapshot};
pub use timer::{Generation, TimerKind, TimerQueue};
