//! Playback session metadata.
//!
//! Attached to every playback attempt for diagnostics and log correlation;
//! never consulted for shield correctness.

use common::{ContentIdentity, DeviceKind};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Metadata describing one playback attempt.
#[derive(Clone, Debug, Serialize)]
pub struct PlaybackMetadata {
    /// Unique playback id.
    pub playback_id: Uuid,
    /// What is being played.
    pub content: ContentIdentity,
    /// Device class of the host.
    pub device: DeviceKind,
    /// Wall-clock start, milliseconds since the epoch.
    pub started_at_unix_ms: u64,
}

impl PlaybackMetadata {
    pub fn new(content: ContentIdentity, device: DeviceKind) -> Self {
        let started_at_unix_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            playback_id: Uuid::new_v4(),
            content,
            device,
            started_at_unix_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_ids_are_unique() {
        let content = ContentIdentity::movie("Rive", 603);
        let a = PlaybackMetadata::new(content.clone(), DeviceKind::Desktop);
        let b = PlaybackMetadata::new(content, DeviceKind::Desktop);
        assert_ne!(a.playback_id, b.playback_id);
    }

    #[test]
    fn test_metadata_carries_content() {
        let content = ContentIdentity::episode("VidKing", 1399, 2, 7);
        let meta = PlaybackMetadata::new(content, DeviceKind::Tv);
        assert_eq!(meta.content.to_string(), "1399-s2e7");
        assert_eq!(meta.device, DeviceKind::Tv);
    }
}
