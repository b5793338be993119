//! Scoped capability interception.
//!
//! Replaces the page-global capabilities with guarded versions for the
//! duration of a shield session and restores the originals on release.
//! Acquire/release is reference-counted: a nested acquire never re-captures
//! already-patched slots as "originals", and only the outermost release
//! actually restores, otherwise a double install would corrupt the page
//! permanently.

use crate::classifier::{DialogClassifier, KeywordClassifier};
use crate::telemetry::{BlockReason, TelemetryCounter};
use crate::timer::Generation;
use page::capabilities::{AlertFn, Capabilities, ConfirmFn, LeaveGuardFn, OpenFn, PromptFn};
use parking_lot::Mutex;
use std::sync::Arc;

/// Original capability references captured at install time.
struct Originals {
    open: OpenFn,
    confirm: ConfirmFn,
    alert: AlertFn,
    prompt: PromptFn,
    leave_guard: LeaveGuardFn,
}

/// The guarded references we installed, kept for identity verification on
/// release.
struct Installed {
    open: OpenFn,
    confirm: ConfirmFn,
    alert: AlertFn,
    prompt: PromptFn,
    leave_guard: LeaveGuardFn,
}

#[derive(Default)]
struct InstallState {
    depth: u32,
    captured: Option<(Originals, Installed)>,
}

/// Intercepts page-global capabilities for the lifetime of a session.
pub struct CapabilityInterceptor {
    capabilities: Arc<Capabilities>,
    telemetry: Arc<TelemetryCounter>,
    confirm_classifier: Arc<dyn DialogClassifier>,
    alert_classifier: Arc<dyn DialogClassifier>,
    state: Mutex<InstallState>,
}

impl CapabilityInterceptor {
    pub fn new(capabilities: Arc<Capabilities>, telemetry: Arc<TelemetryCounter>) -> Self {
        Self {
            capabilities,
            telemetry,
            confirm_classifier: Arc::new(KeywordClassifier::confirm_scams()),
            alert_classifier: Arc::new(KeywordClassifier::alert_nags()),
            state: Mutex::new(InstallState::default()),
        }
    }

    /// Replace the classifiers, for hosts that tune the keyword lists.
    pub fn with_classifiers(
        mut self,
        confirm: Arc<dyn DialogClassifier>,
        alert: Arc<dyn DialogClassifier>,
    ) -> Self {
        self.confirm_classifier = confirm;
        self.alert_classifier = alert;
        self
    }

    /// Current reentrancy depth.
    pub fn depth(&self) -> u32 {
        self.state.lock().depth
    }

    /// Whether guards are currently installed.
    pub fn is_active(&self) -> bool {
        self.depth() > 0
    }

    /// Install guarded capabilities. Reentrant: only the first call in a
    /// chain captures originals.
    pub fn acquire(&self, generation: Generation) {
        let mut state = self.state.lock();
        state.depth += 1;
        if state.depth > 1 {
            tracing::debug!(generation, depth = state.depth, "nested capability acquire");
            return;
        }

        let telemetry = self.telemetry.clone();
        let guarded_open: OpenFn = Arc::new(move |url: &str| {
            telemetry.increment(BlockReason::Popup);
            tracing::debug!(url, "blocked window-open attempt");
            None
        });

        let telemetry = self.telemetry.clone();
        let original_confirm = self.capabilities.current_confirm();
        let classifier = self.confirm_classifier.clone();
        let guarded_confirm: ConfirmFn = Arc::new(move |message: &str| {
            if classifier.matches(message) {
                telemetry.increment(BlockReason::Dialog);
                tracing::debug!(text = message, "blocked confirm dialog");
                false
            } else {
                original_confirm(message)
            }
        });

        let telemetry = self.telemetry.clone();
        let original_alert = self.capabilities.current_alert();
        let classifier = self.alert_classifier.clone();
        let guarded_alert: AlertFn = Arc::new(move |message: &str| {
            if classifier.matches(message) {
                telemetry.increment(BlockReason::Dialog);
                tracing::debug!(text = message, "blocked alert dialog");
            } else {
                original_alert(message)
            }
        });

        let telemetry = self.telemetry.clone();
        let guarded_prompt: PromptFn = Arc::new(move |message: &str| {
            // No legitimate use case inside an embedded player.
            telemetry.increment(BlockReason::Prompt);
            tracing::debug!(text = message, "blocked prompt attempt");
            None
        });

        let telemetry = self.telemetry.clone();
        let guarded_leave: LeaveGuardFn = Arc::new(move |message: &str| {
            telemetry.increment(BlockReason::Navigation);
            tracing::debug!(text = message, "suppressed page-leave warning");
            false
        });

        let originals = Originals {
            open: self.capabilities.swap_open(guarded_open.clone()),
            confirm: self.capabilities.swap_confirm(guarded_confirm.clone()),
            alert: self.capabilities.swap_alert(guarded_alert.clone()),
            prompt: self.capabilities.swap_prompt(guarded_prompt.clone()),
            leave_guard: self.capabilities.swap_leave_guard(guarded_leave.clone()),
        };
        let installed = Installed {
            open: guarded_open,
            confirm: guarded_confirm,
            alert: guarded_alert,
            prompt: guarded_prompt,
            leave_guard: guarded_leave,
        };

        state.captured = Some((originals, installed));
        tracing::info!(generation, "capability guards installed");
    }

    /// Release one acquire. The 1→0 transition restores every original,
    /// exactly. A foreign replacement found in a slot is recorded as a
    /// diagnostic and overwritten; the session is still marked released so
    /// the counter never sticks.
    pub fn release(&self, generation: Generation) {
        let mut state = self.state.lock();
        if state.depth == 0 {
            tracing::warn!(generation, "capability release without matching acquire");
            return;
        }
        state.depth -= 1;
        if state.depth > 0 {
            tracing::debug!(generation, depth = state.depth, "nested capability release");
            return;
        }

        let Some((originals, installed)) = state.captured.take() else {
            tracing::warn!(generation, "capability release with no captured originals");
            return;
        };

        let removed_open = self.capabilities.swap_open(originals.open);
        let removed_confirm = self.capabilities.swap_confirm(originals.confirm);
        let removed_alert = self.capabilities.swap_alert(originals.alert);
        let removed_prompt = self.capabilities.swap_prompt(originals.prompt);
        let removed_leave = self.capabilities.swap_leave_guard(originals.leave_guard);

        let mut foreign = Vec::new();
        if !Arc::ptr_eq(&removed_open, &installed.open) {
            foreign.push("open");
        }
        if !Arc::ptr_eq(&removed_confirm, &installed.confirm) {
            foreign.push("confirm");
        }
        if !Arc::ptr_eq(&removed_alert, &installed.alert) {
            foreign.push("alert");
        }
        if !Arc::ptr_eq(&removed_prompt, &installed.prompt) {
            foreign.push("prompt");
        }
        if !Arc::ptr_eq(&removed_leave, &installed.leave_guard) {
            foreign.push("leave_guard");
        }

        if foreign.is_empty() {
            tracing::info!(generation, "capability guards released");
        } else {
            // Diagnostics only: the originals are reinstalled regardless.
            tracing::warn!(
                generation,
                slots = ?foreign,
                "foreign replacement found during capability restore"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interceptor() -> (Arc<Capabilities>, Arc<TelemetryCounter>, CapabilityInterceptor) {
        let caps = Arc::new(Capabilities::new());
        let telemetry = Arc::new(TelemetryCounter::new());
        let interceptor = CapabilityInterceptor::new(caps.clone(), telemetry.clone());
        (caps, telemetry, interceptor)
    }

    #[test]
    fn test_popup_refused_and_counted() {
        let (caps, telemetry, interceptor) = interceptor();
        interceptor.acquire(1);

        assert_eq!(caps.open("https://adsite.example"), None);
        let snapshot = telemetry.current();
        assert_eq!(snapshot.count, 1);
        assert_eq!(snapshot.last_reason, Some(BlockReason::Popup));

        interceptor.release(1);
        assert_eq!(caps.open("https://example.com"), Some("https://example.com".into()));
    }

    #[test]
    fn test_confirm_keyword_refused_else_delegated() {
        let (caps, telemetry, interceptor) = interceptor();
        interceptor.acquire(1);

        // Scam pattern: cancelled result without showing anything.
        assert!(!caps.confirm("Update your Chrome now!"));
        assert_eq!(telemetry.current().count, 1);

        // Legitimate dialog delegates to the original (default answers true).
        assert!(caps.confirm("Resume playback?"));
        assert_eq!(telemetry.current().count, 1);

        interceptor.release(1);
    }

    #[test]
    fn test_alert_keyword_swallowed() {
        let (caps, telemetry, interceptor) = interceptor();
        interceptor.acquire(1);

        caps.alert("Disable your ad blocker to continue");
        assert_eq!(telemetry.current().last_reason, Some(BlockReason::Dialog));

        interceptor.release(1);
    }

    #[test]
    fn test_prompt_always_refused() {
        let (caps, telemetry, interceptor) = interceptor();
        interceptor.acquire(1);

        assert_eq!(caps.prompt("Enter your email"), None);
        assert_eq!(telemetry.current().last_reason, Some(BlockReason::Prompt));

        interceptor.release(1);
    }

    #[test]
    fn test_leave_warning_suppressed() {
        let (caps, telemetry, interceptor) = interceptor();
        interceptor.acquire(1);

        assert!(!caps.arm_leave_warning("Are you sure you want to leave?"));
        assert_eq!(telemetry.current().last_reason, Some(BlockReason::Navigation));

        interceptor.release(1);
        assert!(caps.arm_leave_warning("unsaved changes"));
    }

    #[test]
    fn test_restore_is_reference_equal() {
        let (caps, _telemetry, interceptor) = interceptor();
        let open = caps.current_open();
        let confirm = caps.current_confirm();
        let alert = caps.current_alert();

        interceptor.acquire(1);
        assert!(!Arc::ptr_eq(&caps.current_open(), &open));
        interceptor.release(1);

        assert!(Arc::ptr_eq(&caps.current_open(), &open));
        assert!(Arc::ptr_eq(&caps.current_confirm(), &confirm));
        assert!(Arc::ptr_eq(&caps.current_alert(), &alert));
    }

    #[test]
    fn test_nested_acquire_release() {
        let (caps, _telemetry, interceptor) = interceptor();
        let open = caps.current_open();

        interceptor.acquire(1);
        let guarded = caps.current_open();
        interceptor.acquire(1);
        interceptor.acquire(1);
        assert_eq!(interceptor.depth(), 3);

        // Inner releases keep the guard installed, reference-identical.
        interceptor.release(1);
        assert!(Arc::ptr_eq(&caps.current_open(), &guarded));
        interceptor.release(1);
        assert!(Arc::ptr_eq(&caps.current_open(), &guarded));

        // Outermost release restores the original.
        interceptor.release(1);
        assert!(Arc::ptr_eq(&caps.current_open(), &open));
        assert!(!interceptor.is_active());
    }

    #[test]
    fn test_foreign_replacement_still_releases() {
        let (caps, _telemetry, interceptor) = interceptor();
        let open = caps.current_open();

        interceptor.acquire(1);
        // Other page script stomps the slot while the guard is live.
        caps.swap_open(Arc::new(|_| Some("hijacked".into())));
        interceptor.release(1);

        // The original is back and the counter did not stick.
        assert!(Arc::ptr_eq(&caps.current_open(), &open));
        assert_eq!(interceptor.depth(), 0);
    }

    #[test]
    fn test_unbalanced_release_is_noop() {
        let (caps, _telemetry, interceptor) = interceptor();
        let open = caps.current_open();
        interceptor.release(1);
        assert!(Arc::ptr_eq(&caps.current_open(), &open));
    }
}
