//! Common types shared across the player engine.

pub mod environment;
pub mod error;
pub mod source;

pub use environment::{DeviceKind, EngineKind, Environment};
pub use error::{PlayerError, PlayerResult};
pub use source::{ContentIdentity, MediaKind, ProviderId, SourceDescriptor};
