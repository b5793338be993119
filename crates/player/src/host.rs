//! Player host.
//!
//! Owns the host page (tree, dispatcher, capabilities), builds the control
//! surface, and drives the shield controller from source selection events.

use crate::config::{OverlayMode, PlayerConfig};
use crate::session::PlaybackMetadata;
use common::{ContentIdentity, SourceDescriptor};
use page::capabilities::Capabilities;
use page::events::{Event, EventDispatcher, EventType};
use page::node::NodeId;
use page::tree::PageTree;
use parking_lot::RwLock;
use shield::{ShieldController, ShieldSnapshot};
use std::sync::Arc;
use std::time::Duration;

/// Node ids of the host's own control surface.
#[derive(Clone, Copy, Debug)]
pub struct ControlSurface {
    /// Overlay container; the designated safe zone.
    pub overlay: NodeId,
    /// Back/close button.
    pub back_button: NodeId,
    /// Server (mirror) selection menu.
    pub server_menu: NodeId,
    /// "Skip protection" button.
    pub skip_button: NodeId,
    /// Embed container for third-party content.
    pub embed: NodeId,
}

/// The player host: page ownership plus shield wiring.
pub struct PlayerHost {
    config: PlayerConfig,
    capabilities: Arc<Capabilities>,
    tree: RwLock<PageTree>,
    dispatcher: Arc<RwLock<EventDispatcher>>,
    controller: ShieldController,
    controls: ControlSurface,
    active_source: RwLock<Option<SourceDescriptor>>,
    playback: RwLock<Option<PlaybackMetadata>>,
}

impl PlayerHost {
    pub fn new(config: PlayerConfig) -> Self {
        let mut tree = PageTree::new();
        let root = tree.root();

        let overlay = tree.create_labeled("div", "controls-overlay");
        let back_button = tree.create_labeled("button", "back");
        let server_menu = tree.create_labeled("div", "server-menu");
        let skip_button = tree.create_labeled("button", "skip-protection");
        let embed = tree.create_labeled("iframe", "embed");

        // The tree is freshly built; these appends cannot fail.
        let _ = tree.append_child(root, overlay);
        let _ = tree.append_child(overlay, back_button);
        let _ = tree.append_child(overlay, server_menu);
        let _ = tree.append_child(overlay, skip_button);
        let _ = tree.append_child(root, embed);

        let capabilities = Arc::new(Capabilities::new());
        let dispatcher = Arc::new(RwLock::new(EventDispatcher::new()));
        let controller = ShieldController::new(
            capabilities.clone(),
            dispatcher.clone(),
            root,
            config.environment,
        );
        controller.designate(overlay);

        Self {
            config,
            capabilities,
            tree: RwLock::new(tree),
            dispatcher,
            controller,
            controls: ControlSurface {
                overlay,
                back_button,
                server_menu,
                skip_button,
                embed,
            },
            active_source: RwLock::new(None),
            playback: RwLock::new(None),
        }
    }

    /// Handle a source selection or change event from the provider catalog.
    ///
    /// This is the sole trigger for shield session creation; the prior
    /// session, if any, is superseded.
    pub fn select_source(
        &self,
        source: SourceDescriptor,
        content: ContentIdentity,
    ) -> ShieldSnapshot {
        let metadata = PlaybackMetadata::new(content.clone(), self.config.environment.device);
        tracing::info!(
            playback_id = %metadata.playback_id,
            provider = %source.provider,
            media_kind = ?source.media_kind,
            url = %source.url,
            "source selected"
        );

        *self.active_source.write() = Some(source);
        *self.playback.write() = Some(metadata);

        self.controller.create_session(content);
        self.controller.snapshot()
    }

    /// The user's "skip protection" action.
    pub fn skip_protection(&self) {
        self.controller.manual_override();
    }

    /// Advance virtual time.
    pub fn advance(&self, elapsed: Duration) {
        self.controller.advance(elapsed);
    }

    /// Deliver an input event to the page. Returns whether the default
    /// action is allowed.
    pub fn dispatch_input(&self, event_type: EventType, target: NodeId) -> bool {
        let mut event = Event::new(event_type, target);
        let tree = self.tree.read();
        self.dispatcher.read().dispatch(&tree, &mut event)
    }

    /// Mark an additional host element as safe-zone.
    pub fn designate(&self, node: NodeId) {
        self.controller.designate(node);
    }

    /// Current shield state for rendering.
    pub fn snapshot(&self) -> ShieldSnapshot {
        self.controller.snapshot()
    }

    /// Whether the countdown overlay should be rendered right now.
    pub fn overlay_visible(&self) -> bool {
        let phase = self.controller.phase();
        match self.config.overlay_mode {
            OverlayMode::WhenPrimary => phase == shield::ShieldPhase::PrimaryActive,
            OverlayMode::Always => phase.is_active(),
        }
    }

    /// Tear the host down, releasing every shield resource.
    pub fn close(&self) {
        self.controller.teardown();
        *self.active_source.write() = None;
        *self.playback.write() = None;
        tracing::info!("player host closed");
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn controls(&self) -> ControlSurface {
        self.controls
    }

    pub fn capabilities(&self) -> Arc<Capabilities> {
        self.capabilities.clone()
    }

    pub fn active_source(&self) -> Option<SourceDescriptor> {
        self.active_source.read().clone()
    }

    pub fn playback_metadata(&self) -> Option<PlaybackMetadata> {
        self.playback.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::MediaKind;
    use shield::ShieldPhase;

    fn embed_source(provider: &str, url: &str) -> SourceDescriptor {
        SourceDescriptor::new(provider, url, MediaKind::Embed)
    }

    fn host() -> PlayerHost {
        PlayerHost::new(PlayerConfig::default())
    }

    #[test]
    fn test_select_source_starts_session() {
        let host = host();
        let snapshot = host.select_source(
            embed_source("Rive", "https://rivestream.example/embed?type=movie&id=603"),
            ContentIdentity::movie("Rive", 603),
        );
        assert_eq!(snapshot.phase, ShieldPhase::PrimaryActive);
        assert!(host.active_source().is_some());
        assert!(host.playback_metadata().is_some());
    }

    #[test]
    fn test_overlay_visibility_by_mode() {
        let host = host();
        host.select_source(
            embed_source("VidSrc.CC", "https://vidsrc.example/v3/embed/movie/603"),
            ContentIdentity::movie("VidSrc.CC", 603),
        );
        // Stealth provider: secondary only, overlay hidden by default.
        assert_eq!(host.snapshot().phase, ShieldPhase::SecondaryActive);
        assert!(!host.overlay_visible());

        let surfaced = PlayerHost::new(PlayerConfig::new().with_overlay_mode(OverlayMode::Always));
        surfaced.select_source(
            embed_source("VidSrc.CC", "https://vidsrc.example/v3/embed/movie/603"),
            ContentIdentity::movie("VidSrc.CC", 603),
        );
        assert!(surfaced.overlay_visible());
    }

    #[test]
    fn test_control_surface_clicks_pass_through() {
        let host = host();
        host.select_source(
            embed_source("Rive", "https://rivestream.example/embed?type=movie&id=603"),
            ContentIdentity::movie("Rive", 603),
        );

        let controls = host.controls();
        assert!(host.dispatch_input(EventType::Click, controls.skip_button));
        assert!(!host.dispatch_input(EventType::Click, controls.embed));
        assert_eq!(host.snapshot().blocked_attempts, 1);
    }

    #[test]
    fn test_skip_protection_lowers_shield() {
        let host = host();
        host.select_source(
            embed_source("Rive", "https://rivestream.example/embed?type=movie&id=603"),
            ContentIdentity::movie("Rive", 603),
        );
        host.skip_protection();
        assert_eq!(host.snapshot().phase, ShieldPhase::Inactive);
        assert!(!host.overlay_visible());
    }

    #[test]
    fn test_close_releases_capabilities() {
        let host = host();
        let capabilities = host.capabilities();
        let original = capabilities.current_open();

        host.select_source(
            embed_source("Rive", "https://rivestream.example/embed?type=movie&id=603"),
            ContentIdentity::movie("Rive", 603),
        );
        host.close();

        assert!(Arc::ptr_eq(&capabilities.current_open(), &original));
        assert!(host.active_source().is_none());
    }

    #[test]
    fn test_episode_change_supersedes_session() {
        let host = host();
        let first = host.select_source(
            embed_source("Rive", "https://rivestream.example/embed?type=tv&id=1399&e=1"),
            ContentIdentity::episode("Rive", 1399, 1, 1),
        );
        host.advance(Duration::from_secs(5));
        let second = host.select_source(
            embed_source("Rive", "https://rivestream.example/embed?type=tv&id=1399&e=2"),
            ContentIdentity::episode("Rive", 1399, 1, 2),
        );
        assert!(second.generation > first.generation);
        assert_eq!(second.blocked_attempts, 0);
        assert_eq!(second.phase, ShieldPhase::PrimaryActive);
    }
}
