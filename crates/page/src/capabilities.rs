//! Page-global capabilities.
//!
//! The global functions untrusted embedded content can reach to hijack the
//! page: programmatic window opening, modal dialogs, and the leave warning.
//! Each is an explicit slot that can be swapped out and back in, with
//! reference identity observable through `Arc::ptr_eq`, so a scoped override
//! can prove its release restored the page exactly.

use parking_lot::RwLock;
use std::sync::Arc;

/// Programmatic window opening. Returns a handle name for the opened
/// window, or `None` when refused.
pub type OpenFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Modal confirmation dialog. Returns the user's answer; `false` is the
/// cancelled result.
pub type ConfirmFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Modal alert dialog.
pub type AlertFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Modal input prompt. Returns the entered text, or `None` when dismissed.
pub type PromptFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Arming of the page-leave warning. Returns whether the warning was
/// actually armed.
pub type LeaveGuardFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// The page's capability table.
pub struct Capabilities {
    open: RwLock<OpenFn>,
    confirm: RwLock<ConfirmFn>,
    alert: RwLock<AlertFn>,
    prompt: RwLock<PromptFn>,
    leave_guard: RwLock<LeaveGuardFn>,
}

impl Capabilities {
    /// Create a table with the host's native behaviors.
    pub fn new() -> Self {
        Self {
            open: RwLock::new(Arc::new(|url: &str| Some(url.to_string()))),
            confirm: RwLock::new(Arc::new(|_msg: &str| true)),
            alert: RwLock::new(Arc::new(|_msg: &str| {})),
            prompt: RwLock::new(Arc::new(|_msg: &str| None)),
            leave_guard: RwLock::new(Arc::new(|_msg: &str| true)),
        }
    }

    // Invocation surface, as called by page content.

    pub fn open(&self, url: &str) -> Option<String> {
        let f = self.open.read().clone();
        f(url)
    }

    pub fn confirm(&self, message: &str) -> bool {
        let f = self.confirm.read().clone();
        f(message)
    }

    pub fn alert(&self, message: &str) {
        let f = self.alert.read().clone();
        f(message)
    }

    pub fn prompt(&self, message: &str) -> Option<String> {
        let f = self.prompt.read().clone();
        f(message)
    }

    pub fn arm_leave_warning(&self, message: &str) -> bool {
        let f = self.leave_guard.read().clone();
        f(message)
    }

    // Slot access. Swap returns the previously installed function so the
    // caller can hold it for restore.

    pub fn swap_open(&self, new: OpenFn) -> OpenFn {
        std::mem::replace(&mut *self.open.write(), new)
    }

    pub fn swap_confirm(&self, new: ConfirmFn) -> ConfirmFn {
        std::mem::replace(&mut *self.confirm.write(), new)
    }

    pub fn swap_alert(&self, new: AlertFn) -> AlertFn {
        std::mem::replace(&mut *self.alert.write(), new)
    }

    pub fn swap_prompt(&self, new: PromptFn) -> PromptFn {
        std::mem::replace(&mut *self.prompt.write(), new)
    }

    pub fn swap_leave_guard(&self, new: LeaveGuardFn) -> LeaveGuardFn {
        std::mem::replace(&mut *self.leave_guard.write(), new)
    }

    // Current references, for identity checks.

    pub fn current_open(&self) -> OpenFn {
        self.open.read().clone()
    }

    pub fn current_confirm(&self) -> ConfirmFn {
        self.confirm.read().clone()
    }

    pub fn current_alert(&self) -> AlertFn {
        self.alert.read().clone()
    }

    pub fn current_prompt(&self) -> PromptFn {
        self.prompt.read().clone()
    }

    pub fn current_leave_guard(&self) -> LeaveGuardFn {
        self.leave_guard.read().clone()
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::new()
    }
}
