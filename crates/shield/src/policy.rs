//! Provider shield-timing policy.
//!
//! A pure lookup from provider identity to shield durations. Unknown
//! providers resolve to the default entry; there is no failure mode.

use common::{EngineKind, Environment, ProviderId};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Timing parameters for one provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolicyEntry {
    pub provider: &'static str,
    /// Duration of the visible primary shield.
    pub primary_ms: u64,
    /// Duration of the transparent secondary shield.
    pub secondary_ms: u64,
    /// Extra buffer applied on engines that start embedded script late.
    pub environment_adjustment_ms: u64,
}

/// Durations after environment adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedPolicy {
    pub primary_ms: u64,
    pub secondary_ms: u64,
}

/// Fallback for providers without a dedicated entry.
pub const DEFAULT_ENTRY: PolicyEntry = PolicyEntry {
    provider: "default",
    primary_ms: 15_000,
    secondary_ms: 8_000,
    environment_adjustment_ms: 0,
};

static TABLE: Lazy<HashMap<&'static str, PolicyEntry>> = Lazy::new(|| {
    let entries = [
        PolicyEntry {
            provider: "Rive",
            primary_ms: 15_000,
            secondary_ms: 8_000,
            environment_adjustment_ms: 0,
        },
        // Sandboxing is disabled for this provider upstream, so the shield
        // runs in the stealth (secondary-only) configuration: no visible
        // countdown, first-gesture absorption only.
        PolicyEntry {
            provider: "VidSrc.CC",
            primary_ms: 0,
            secondary_ms: 8_000,
            environment_adjustment_ms: 2_000,
        },
        // Trusted embed with its own player event channel; a short primary
        // window is enough.
        PolicyEntry {
            provider: "VidKing",
            primary_ms: 2_000,
            secondary_ms: 0,
            environment_adjustment_ms: 0,
        },
    ];
    entries.into_iter().map(|e| (e.provider, e)).collect()
});

/// Look up the entry for a provider, falling back to the default.
pub fn entry_for(provider: &ProviderId) -> PolicyEntry {
    TABLE
        .get(provider.as_str())
        .copied()
        .unwrap_or(DEFAULT_ENTRY)
}

/// Resolve shield durations for a provider in an environment.
///
/// The adjustment is additive and provider-scoped. It extends whichever
/// phase carries the defense: the primary window normally, the secondary
/// window in the stealth configuration.
pub fn resolve(provider: &ProviderId, environment: &Environment) -> ResolvedPolicy {
    let entry = entry_for(provider);
    let mut resolved = ResolvedPolicy {
        primary_ms: entry.primary_ms,
        secondary_ms: entry.secondary_ms,
    };

    // Gecko starts embedded script late enough that hijack attempts can
    // outlive unadjusted timings.
    if environment.engine == EngineKind::Gecko {
        if resolved.primary_ms > 0 {
            resolved.primary_ms += entry.environment_adjustment_ms;
        } else {
            resolved.secondary_ms += entry.environment_adjustment_ms;
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::DeviceKind;

    #[test]
    fn test_unknown_provider_gets_default() {
        let resolved = resolve(&ProviderId::new("NoSuchHost"), &Environment::default());
        assert_eq!(resolved.primary_ms, DEFAULT_ENTRY.primary_ms);
        assert_eq!(resolved.secondary_ms, DEFAULT_ENTRY.secondary_ms);
    }

    #[test]
    fn test_known_providers() {
        let env = Environment::default();
        let vidking = resolve(&ProviderId::new("VidKing"), &env);
        assert_eq!(vidking.primary_ms, 2_000);
        assert_eq!(vidking.secondary_ms, 0);

        let stealth = resolve(&ProviderId::new("VidSrc.CC"), &env);
        assert_eq!(stealth.primary_ms, 0);
        assert_eq!(stealth.secondary_ms, 8_000);
    }

    #[test]
    fn test_gecko_adjustment_extends_active_phase() {
        let gecko = Environment::new(EngineKind::Gecko, DeviceKind::Desktop);

        // Stealth provider: adjustment lands on the secondary window.
        let stealth = resolve(&ProviderId::new("VidSrc.CC"), &gecko);
        assert_eq!(stealth.primary_ms, 0);
        assert_eq!(stealth.secondary_ms, 10_000);

        // Zero-adjustment entries are unchanged.
        let rive = resolve(&ProviderId::new("Rive"), &gecko);
        assert_eq!(rive.primary_ms, 15_000);
        assert_eq!(rive.secondary_ms, 8_000);
    }
}
