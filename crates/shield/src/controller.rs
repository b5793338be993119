//! Shield state machine.
//!
//! One controller owns the full lifecycle of shield sessions: generation
//! tokens, phase transitions, the cosmetic countdown, and acquisition and
//! release of the capability and input guards. It is the only component
//! that mutates session state, and every timer fire validates its captured
//! generation before acting, so a slow timer from a superseded session can
//! never corrupt the live one.

use crate::guard::InputEventGuard;
use crate::interceptor::CapabilityInterceptor;
use crate::policy::{self, ResolvedPolicy};
use crate::telemetry::{BlockReason, TelemetryCounter};
use crate::timer::{Generation, TimerKind, TimerQueue};
use common::{ContentIdentity, Environment};
use page::capabilities::Capabilities;
use page::events::EventDispatcher;
use page::node::NodeId;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Stage of the shield state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldPhase {
    /// No session has been created yet.
    Init,
    /// Visible shield: full interception, countdown shown.
    PrimaryActive,
    /// Transparent shield: interception without the overlay.
    SecondaryActive,
    /// Shield lowered. Terminal for a session.
    Inactive,
}

impl ShieldPhase {
    pub fn name(&self) -> &'static str {
        match self {
            ShieldPhase::Init => "init",
            ShieldPhase::PrimaryActive => "primary-active",
            ShieldPhase::SecondaryActive => "secondary-active",
            ShieldPhase::Inactive => "inactive",
        }
    }

    /// Whether interception is in force.
    pub fn is_active(&self) -> bool {
        matches!(self, ShieldPhase::PrimaryActive | ShieldPhase::SecondaryActive)
    }
}

/// Read-only state for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShieldSnapshot {
    pub generation: Generation,
    pub phase: ShieldPhase,
    pub countdown_seconds: u32,
    pub blocked_attempts: u64,
    pub last_reason: Option<BlockReason>,
    pub content: Option<ContentIdentity>,
    pub manual_override: bool,
}

struct SessionState {
    generation: Generation,
    phase: ShieldPhase,
    countdown_seconds: u32,
    policy: ResolvedPolicy,
    content: Option<ContentIdentity>,
    manual_override: bool,
    guards_held: bool,
}

impl SessionState {
    fn new() -> Self {
        Self {
            generation: 0,
            phase: ShieldPhase::Init,
            countdown_seconds: 0,
            policy: ResolvedPolicy {
                primary_ms: 0,
                secondary_ms: 0,
            },
            content: None,
            manual_override: false,
            guards_held: false,
        }
    }
}

/// Coordinates shield sessions for one player host.
pub struct ShieldController {
    environment: Environment,
    telemetry: Arc<TelemetryCounter>,
    interceptor: CapabilityInterceptor,
    guard: RwLock<InputEventGuard>,
    dispatcher: Arc<RwLock<EventDispatcher>>,
    document_root: NodeId,
    timers: Mutex<TimerQueue>,
    state: RwLock<SessionState>,
}

impl ShieldController {
    pub fn new(
        capabilities: Arc<Capabilities>,
        dispatcher: Arc<RwLock<EventDispatcher>>,
        document_root: NodeId,
        environment: Environment,
    ) -> Self {
        let telemetry = Arc::new(TelemetryCounter::new());
        Self {
            environment,
            interceptor: CapabilityInterceptor::new(capabilities, telemetry.clone()),
            guard: RwLock::new(InputEventGuard::new(telemetry.clone())),
            telemetry,
            dispatcher,
            document_root,
            timers: Mutex::new(TimerQueue::new()),
            state: RwLock::new(SessionState::new()),
        }
    }

    /// Start a new shield session, superseding and fully tearing down any
    /// prior one before any new timer is armed.
    pub fn create_session(&self, content: ContentIdentity) -> Generation {
        let mut state = self.state.write();
        self.end_session_locked(&mut state);

        let generation = state.generation + 1;
        state.generation = generation;
        state.manual_override = false;
        self.telemetry.reset();

        let resolved = policy::resolve(&content.provider, &self.environment);
        state.policy = resolved;
        tracing::info!(
            generation,
            provider = %content.provider,
            content = %content,
            primary_ms = resolved.primary_ms,
            secondary_ms = resolved.secondary_ms,
            "shield session created"
        );
        state.content = Some(content);

        self.acquire_guards_locked(&mut state, generation);

        let mut timers = self.timers.lock();
        if resolved.primary_ms > 0 {
            state.phase = ShieldPhase::PrimaryActive;
            state.countdown_seconds = (resolved.primary_ms / 1_000) as u32;
            timers.schedule(
                Duration::from_millis(resolved.primary_ms),
                generation,
                TimerKind::PrimaryElapsed,
            );
            if resolved.secondary_ms > 0 {
                timers.schedule(
                    Duration::from_millis(resolved.primary_ms + resolved.secondary_ms),
                    generation,
                    TimerKind::SecondaryElapsed,
                );
            }
            timers.schedule(COUNTDOWN_TICK, generation, TimerKind::CountdownTick);
        } else if resolved.secondary_ms > 0 {
            // Stealth variant: no visible window, straight to the
            // transparent shield.
            state.phase = ShieldPhase::SecondaryActive;
            state.countdown_seconds = (resolved.secondary_ms / 1_000) as u32;
            timers.schedule(
                Duration::from_millis(resolved.secondary_ms),
                generation,
                TimerKind::SecondaryElapsed,
            );
            timers.schedule(COUNTDOWN_TICK, generation, TimerKind::CountdownTick);
        } else {
            // Nothing to guard; keep the acquire/release pairing anyway.
            drop(timers);
            self.release_guards_locked(&mut state, generation);
            state.phase = ShieldPhase::Inactive;
            state.countdown_seconds = 0;
        }

        generation
    }

    /// User-initiated early release. Idempotent; a no-op unless a phase is
    /// active.
    pub fn manual_override(&self) {
        let mut state = self.state.write();
        if !state.phase.is_active() {
            return;
        }
        state.manual_override = true;
        tracing::info!(generation = state.generation, "shield lowered by user");
        self.finish_locked(&mut state);
    }

    /// Advance virtual time, firing due timers in deadline order.
    pub fn advance(&self, elapsed: Duration) {
        let target = self.timers.lock().now() + elapsed;
        loop {
            let fired = self.timers.lock().fire_next(target);
            match fired {
                Some((generation, kind)) => self.handle_fire(generation, kind),
                None => break,
            }
        }
    }

    /// Unconditional teardown for host unmount: cancels all timers,
    /// releases guards, removes listeners. Safe to call repeatedly.
    pub fn teardown(&self) {
        let mut state = self.state.write();
        self.timers.lock().cancel_all();
        if state.guards_held {
            let generation = state.generation;
            self.release_guards_locked(&mut state, generation);
        }
        if state.generation > 0 {
            state.phase = ShieldPhase::Inactive;
        }
        state.countdown_seconds = 0;

        let mut guard = self.guard.write();
        let mut dispatcher = self.dispatcher.write();
        guard.uninstall(&mut dispatcher);
        tracing::info!("shield controller torn down");
    }

    /// Mark a host element as part of the input-guard safe zone.
    pub fn designate(&self, node: NodeId) {
        self.guard.read().designate(node);
    }

    /// Remove a safe-zone designation.
    pub fn revoke(&self, node: NodeId) {
        self.guard.read().revoke(node);
    }

    /// Read-only state for rendering.
    pub fn snapshot(&self) -> ShieldSnapshot {
        let state = self.state.read();
        let telemetry = self.telemetry.current();
        ShieldSnapshot {
            generation: state.generation,
            phase: state.phase,
            countdown_seconds: state.countdown_seconds,
            blocked_attempts: telemetry.count,
            last_reason: telemetry.last_reason,
            content: state.content.clone(),
            manual_override: state.manual_override,
        }
    }

    pub fn phase(&self) -> ShieldPhase {
        self.state.read().phase
    }

    pub fn generation(&self) -> Generation {
        self.state.read().generation
    }

    pub fn telemetry(&self) -> Arc<TelemetryCounter> {
        self.telemetry.clone()
    }

    fn handle_fire(&self, generation: Generation, kind: TimerKind) {
        let mut state = self.state.write();
        if generation != state.generation {
            // A timer from a superseded session; nothing it is allowed to do.
            tracing::trace!(
                stale = generation,
                live = state.generation,
                ?kind,
                "dropped stale timer"
            );
            return;
        }

        match kind {
            TimerKind::PrimaryElapsed => {
                if state.phase != ShieldPhase::PrimaryActive {
                    return;
                }
                if state.policy.secondary_ms > 0 {
                    state.phase = ShieldPhase::SecondaryActive;
                    state.countdown_seconds = (state.policy.secondary_ms / 1_000) as u32;
                    tracing::info!(generation, "primary shield elapsed, secondary active");
                } else {
                    tracing::info!(generation, "primary shield elapsed, no secondary");
                    self.finish_locked(&mut state);
                }
            }
            TimerKind::SecondaryElapsed => {
                if state.phase.is_active() {
                    tracing::info!(generation, "secondary shield elapsed");
                    self.finish_locked(&mut state);
                }
            }
            TimerKind::CountdownTick => {
                if state.phase.is_active() {
                    state.countdown_seconds = state.countdown_seconds.saturating_sub(1);
                    self.timers
                        .lock()
                        .schedule(COUNTDOWN_TICK, generation, TimerKind::CountdownTick);
                }
            }
        }
    }

    fn acquire_guards_locked(&self, state: &mut SessionState, generation: Generation) {
        self.interceptor.acquire(generation);
        {
            let mut guard = self.guard.write();
            let mut dispatcher = self.dispatcher.write();
            guard.install(&mut dispatcher, self.document_root);
            guard.activate(generation);
        }
        state.guards_held = true;
    }

    fn release_guards_locked(&self, state: &mut SessionState, generation: Generation) {
        if !state.guards_held {
            return;
        }
        self.interceptor.release(generation);
        self.guard.read().deactivate();
        state.guards_held = false;
    }

    /// Terminal transition for the current session: phase to `Inactive`,
    /// timers cancelled, guards released. Runs on every exit path.
    fn finish_locked(&self, state: &mut SessionState) {
        let generation = state.generation;
        state.phase = ShieldPhase::Inactive;
        state.countdown_seconds = 0;
        self.timers.lock().cancel_generation(generation);
        self.release_guards_locked(state, generation);
        tracing::info!(generation, "shield inactive");
    }

    fn end_session_locked(&self, state: &mut SessionState) {
        if state.generation == 0 {
            return;
        }
        self.timers.lock().cancel_generation(state.generation);
        self.release_guards_locked(state, state.generation);
    }
}
