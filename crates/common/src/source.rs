//! Source descriptor types consumed from the video source provider.
//!
//! The provider catalog itself (URL construction, mirror selection) lives
//! outside this engine; these types are the interface it delivers on every
//! selection or change event.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a third-party content source.
///
/// Providers are an open set: unknown ids are valid and resolve to default
/// shield timings downstream.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProviderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// How the delivered media is consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// HLS manifest played through the native media pipeline.
    Hls,
    /// Plain progressive file played natively.
    Mp4,
    /// Third-party embed rendered in an iframe; the untrusted case.
    Embed,
}

impl MediaKind {
    /// Whether this media runs third-party script on the page.
    pub fn is_untrusted(&self) -> bool {
        matches!(self, MediaKind::Embed)
    }
}

/// A playable source delivered by the provider catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub provider: ProviderId,
    pub url: String,
    pub media_kind: MediaKind,
}

impl SourceDescriptor {
    pub fn new(
        provider: impl Into<ProviderId>,
        url: impl Into<String>,
        media_kind: MediaKind,
    ) -> Self {
        Self {
            provider: provider.into(),
            url: url.into(),
            media_kind,
        }
    }
}

/// Logical key of what is being guarded.
///
/// Used for display and log correlation only; correctness is carried by the
/// session generation token, never by this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentIdentity {
    pub provider: ProviderId,
    pub content_id: u64,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl ContentIdentity {
    pub fn movie(provider: impl Into<ProviderId>, content_id: u64) -> Self {
        Self {
            provider: provider.into(),
            content_id,
            season: None,
            episode: None,
        }
    }

    pub fn episode(provider: impl Into<ProviderId>, content_id: u64, season: u32, episode: u32) -> Self {
        Self {
            provider: provider.into(),
            content_id,
            season: Some(season),
            episode: Some(episode),
        }
    }
}

impl fmt::Display for ContentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.season, self.episode) {
            (Some(s), Some(e)) => write!(f, "{}-s{}e{}", self.content_id, s, e),
            _ => write!(f, "{}", self.content_id),
        }
    }
}
