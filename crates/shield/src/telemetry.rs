//! Blocked-attempt telemetry.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Why an attempt was blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockReason {
    /// Programmatic window-open attempt.
    Popup,
    /// Dialog matching a social-engineering pattern.
    Dialog,
    /// Input-prompt attempt.
    Prompt,
    /// Page-leave warning arming attempt.
    Navigation,
    /// Input outside the safe zone during an active shield.
    Interaction,
}

impl BlockReason {
    pub fn name(&self) -> &'static str {
        match self {
            BlockReason::Popup => "popup",
            BlockReason::Dialog => "dialog",
            BlockReason::Prompt => "prompt",
            BlockReason::Navigation => "navigation",
            BlockReason::Interaction => "interaction",
        }
    }
}

/// Read-only view of the counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub count: u64,
    pub last_reason: Option<BlockReason>,
}

#[derive(Default)]
struct Inner {
    count: u64,
    last_reason: Option<BlockReason>,
}

/// Monotonic blocked-attempt counter with the most recent reason.
///
/// Purely observational: nothing reads it to make decisions. The
/// presentation layer renders it as a threat-count badge.
#[derive(Default)]
pub struct TelemetryCounter {
    inner: RwLock<Inner>,
}

impl TelemetryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one blocked attempt.
    pub fn increment(&self, reason: BlockReason) {
        let mut inner = self.inner.write();
        inner.count += 1;
        inner.last_reason = Some(reason);
    }

    /// Reset for a new session.
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        inner.count = 0;
        inner.last_reason = None;
    }

    /// Current count and last reason.
    pub fn current(&self) -> TelemetrySnapshot {
        let inner = self.inner.read();
        TelemetrySnapshot {
            count: inner.count,
            last_reason: inner.last_reason,
        }
    }
}
