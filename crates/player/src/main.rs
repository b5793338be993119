//! Aegis Player - embedded-player host with hijack mitigation.
//!
//! Demo binary: runs a simulated viewing timeline against virtual time and
//! logs how the shield handles hostile behavior from the embedded content.

use anyhow::Result;
use clap::Parser;
use common::{ContentIdentity, EngineKind, MediaKind, SourceDescriptor};
use page::events::EventType;
use player::{PlayerConfig, PlayerHost};
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Aegis Player - embedded-player host with hijack mitigation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Provider to simulate
    #[arg(default_value = "Rive")]
    provider: String,

    /// Content id
    #[arg(long, default_value = "603")]
    content_id: u64,

    /// Season number (enables episode mode)
    #[arg(long)]
    season: Option<u32>,

    /// Episode number
    #[arg(long, default_value = "1")]
    episode: u32,

    /// Engine kind (blink, webkit, gecko)
    #[arg(long, default_value = "blink")]
    engine: String,

    /// Press "skip protection" after this many simulated milliseconds
    #[arg(long)]
    skip_after_ms: Option<u64>,

    /// Switch to the next episode after this many simulated milliseconds
    #[arg(long)]
    next_episode_after_ms: Option<u64>,

    /// Print the final shield snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn content_for(args: &Args, episode: u32) -> ContentIdentity {
    match args.season {
        Some(season) => {
            ContentIdentity::episode(args.provider.as_str(), args.content_id, season, episode)
        }
        None => ContentIdentity::movie(args.provider.as_str(), args.content_id),
    }
}

fn source_for(args: &Args, episode: u32) -> SourceDescriptor {
    let url = match args.season {
        Some(season) => format!(
            "https://embed.example/{}/tv/{}/{}/{}",
            args.provider, args.content_id, season, episode
        ),
        None => format!(
            "https://embed.example/{}/movie/{}",
            args.provider, args.content_id
        ),
    };
    SourceDescriptor::new(args.provider.as_str(), url, MediaKind::Embed)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Aegis Player v{}", player::VERSION);

    let mut config = PlayerConfig::default();
    if let Some(engine) = EngineKind::from_name(&args.engine) {
        config.environment.engine = engine;
    }

    let host = PlayerHost::new(config);
    let capabilities = host.capabilities();
    let controls = host.controls();

    host.select_source(source_for(&args, args.episode), content_for(&args, args.episode));

    // Hostile behavior the embedded content typically attempts, placed at
    // the moments the real providers fire them.
    let mut elapsed = Duration::ZERO;
    let step = Duration::from_millis(500);
    let horizon = Duration::from_secs(30);

    while elapsed < horizon {
        host.advance(step);
        elapsed += step;
        let ms = elapsed.as_millis() as u64;

        match ms {
            500 => {
                capabilities.open("https://ad.example/landing");
            }
            1_000 => {
                host.dispatch_input(EventType::Click, controls.embed);
            }
            1_500 => {
                capabilities.confirm("Your Chrome needs an urgent update!");
            }
            2_500 => {
                capabilities.alert("Please disable your ad blocker");
            }
            3_000 => {
                capabilities.arm_leave_warning("Leave site? Changes may not be saved.");
            }
            4_000 => {
                // The user reaches for the host's own controls.
                host.dispatch_input(EventType::Click, controls.back_button);
            }
            _ => {}
        }

        if args.skip_after_ms == Some(ms) {
            info!("user pressed skip protection");
            host.dispatch_input(EventType::Click, controls.skip_button);
            host.skip_protection();
        }
        if args.next_episode_after_ms == Some(ms) {
            let next = args.episode + 1;
            info!(episode = next, "switching episode");
            host.select_source(source_for(&args, next), content_for(&args, next));
        }

        let snapshot = host.snapshot();
        info!(
            phase = snapshot.phase.name(),
            countdown = snapshot.countdown_seconds,
            blocked = snapshot.blocked_attempts,
            overlay = host.overlay_visible(),
            "t={}ms", ms
        );

        if snapshot.phase == shield::ShieldPhase::Inactive {
            break;
        }
    }

    let snapshot = host.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        info!(
            blocked = snapshot.blocked_attempts,
            last_reason = ?snapshot.last_reason,
            "timeline finished"
        );
    }

    host.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default() {
        let args = Args::parse_from(["aegis-player"]);
        assert_eq!(args.provider, "Rive");
        assert_eq!(args.content_id, 603);
        assert!(args.season.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_episode_mode() {
        let args = Args::parse_from([
            "aegis-player",
            "VidKing",
            "--content-id",
            "1399",
            "--season",
            "1",
            "--episode",
            "4",
        ]);
        assert_eq!(args.provider, "VidKing");
        assert_eq!(content_for(&args, args.episode).to_string(), "1399-s1e4");
    }

    #[test]
    fn test_source_url_shapes() {
        let movie = Args::parse_from(["aegis-player", "Rive"]);
        assert_eq!(
            source_for(&movie, 1).url,
            "https://embed.example/Rive/movie/603"
        );

        let tv = Args::parse_from(["aegis-player", "Rive", "--season", "2"]);
        assert_eq!(
            source_for(&tv, 5).url,
            "https://embed.example/Rive/tv/603/2/5"
        );
    }
}
