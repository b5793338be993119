//! Aegis Player - embedded-player host with hijack mitigation.
//!
//! This crate wires the shield layer into a player host:
//! - Host configuration (environment, overlay behavior)
//! - Playback session metadata
//! - The `PlayerHost` that owns the page, control surface, and shield

pub mod config;
pub mod host;
pub mod session;

pub use config::{OverlayMode, PlayerConfig};
pub use host::{ControlSurface, PlayerHost};
pub use session::PlaybackMetadata;

/// Player version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default user agent string reported by the host.
pub fn user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible; AegisPlayer/{}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        VERSION
    )
}
