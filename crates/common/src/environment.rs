//! Host environment model.
//!
//! Shield timings are tuned per environment: some engines start embedded
//! script noticeably later, which shifts when hijack attempts fire.

use serde::{Deserialize, Serialize};

/// Browser engine family the host runs under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    Blink,
    WebKit,
    Gecko,
}

impl EngineKind {
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Blink => "blink",
            EngineKind::WebKit => "webkit",
            EngineKind::Gecko => "gecko",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "blink" => Some(EngineKind::Blink),
            "webkit" => Some(EngineKind::WebKit),
            "gecko" => Some(EngineKind::Gecko),
            _ => None,
        }
    }
}

/// Device class, derived from the user agent upstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Desktop,
    Mobile,
    Tablet,
    Tv,
}

impl DeviceKind {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceKind::Desktop => "desktop",
            DeviceKind::Mobile => "mobile",
            DeviceKind::Tablet => "tablet",
            DeviceKind::Tv => "tv",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "desktop" => Some(DeviceKind::Desktop),
            "mobile" => Some(DeviceKind::Mobile),
            "tablet" => Some(DeviceKind::Tablet),
            "tv" => Some(DeviceKind::Tv),
            _ => None,
        }
    }

    /// Classify a user agent string.
    pub fn from_user_agent(ua: &str) -> Self {
        let ua = ua.to_lowercase();
        if ua.contains("smart-tv") || ua.contains("webos") || ua.contains("tizen") {
            DeviceKind::Tv
        } else if ua.contains("tablet") {
            DeviceKind::Tablet
        } else if ua.contains("mobile") {
            DeviceKind::Mobile
        } else {
            DeviceKind::Desktop
        }
    }
}

/// The environment a shield session runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub engine: EngineKind,
    pub device: DeviceKind,
}

impl Environment {
    pub fn new(engine: EngineKind, device: DeviceKind) -> Self {
        Self { engine, device }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            engine: EngineKind::Blink,
            device: DeviceKind::Desktop,
        }
    }
}
