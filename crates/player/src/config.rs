//! Player configuration.

use common::{DeviceKind, EngineKind, Environment};

/// When the countdown overlay is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayMode {
    /// Show the overlay only during a visible primary phase; the stealth
    /// (secondary-only) configuration stays invisible.
    WhenPrimary,
    /// Surface the overlay during any active phase.
    Always,
}

/// Player host configuration.
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    /// Environment the host runs in; selects shield timing adjustments.
    pub environment: Environment,
    /// Countdown overlay policy.
    pub overlay_mode: OverlayMode,
    /// User agent string reported by the host.
    pub user_agent: String,
}

impl PlayerConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a living-room configuration.
    pub fn television() -> Self {
        Self {
            environment: Environment::new(EngineKind::Blink, DeviceKind::Tv),
            ..Self::default()
        }
    }

    /// Create a mobile configuration.
    pub fn mobile() -> Self {
        Self {
            environment: Environment::new(EngineKind::WebKit, DeviceKind::Mobile),
            user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1".to_string(),
            ..Self::default()
        }
    }

    /// Set the environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the overlay mode.
    pub fn with_overlay_mode(mut self, mode: OverlayMode) -> Self {
        self.overlay_mode = mode;
        self
    }

    /// Set the user agent and re-derive the device kind from it.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.environment.device = DeviceKind::from_user_agent(user_agent);
        self.user_agent = user_agent.to_string();
        self
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            overlay_mode: OverlayMode::WhenPrimary,
            user_agent: crate::user_agent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.overlay_mode, OverlayMode::WhenPrimary);
        assert_eq!(config.environment.device, DeviceKind::Desktop);
    }

    #[test]
    fn test_television_config() {
        let config = PlayerConfig::television();
        assert_eq!(config.environment.device, DeviceKind::Tv);
    }

    #[test]
    fn test_user_agent_rederives_device() {
        let config = PlayerConfig::new()
            .with_user_agent("Mozilla/5.0 (Linux; Android 14; Tablet) Gecko/20100101");
        assert_eq!(config.environment.device, DeviceKind::Tablet);
    }
}
