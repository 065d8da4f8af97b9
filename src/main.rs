mod cli;

use saru::config;
use saru::tracks::{MediaTracks, TrackService};
use saru_av::{StreamResolver, ToolRegistry};
use saru_core::{AudioTrackDescriptor, SubtitleTrack, VideoSource};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "saru=trace,saru_av=trace,saru_core=trace".to_string()
        } else {
            "saru=info,saru_av=warn,saru_core=warn".to_string()
        }
    });

    // Logs go to stderr so --json output stays machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Subtitles { video, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(list_subtitles(&video, config_path, json))
        }
        Commands::Audio { video, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(list_audio(&video, config_path, json))
        }
        Commands::Tracks { video, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(list_tracks(&video, config_path, json))
        }
        Commands::SwitchAudio { video, index } => switch_audio(&video, index, config_path),
        Commands::Resolve { url } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(resolve_url(&url, config_path))
        }
        Commands::CheckTools => check_tools(config_path),
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or(cli.config);
            validate_config(path.as_deref())
        }
    }
}

fn build_service(config_path: Option<&Path>) -> Result<TrackService> {
    let config = config::load_config_or_default(config_path)?;
    Ok(TrackService::new(&config))
}

async fn list_subtitles(video: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
    let service = build_service(config_path)?;
    let source = VideoSource::parse(video);
    let tracks = service.subtitles(&source).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&tracks)?);
    } else {
        print_subtitles(&tracks);
    }
    Ok(())
}

async fn list_audio(video: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
    let service = build_service(config_path)?;
    let source = VideoSource::parse(video);
    let tracks = service.audio_tracks(&source).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&tracks)?);
    } else {
        print_audio(&tracks);
    }
    Ok(())
}

async fn list_tracks(video: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
    let service = build_service(config_path)?;
    let source = VideoSource::parse(video);
    let MediaTracks {
        subtitles,
        audio_tracks,
    } = service.media_tracks(&source).await;

    if json {
        let tracks = MediaTracks {
            subtitles,
            audio_tracks,
        };
        println!("{}", serde_json::to_string_pretty(&tracks)?);
    } else {
        print_subtitles(&subtitles);
        println!();
        print_audio(&audio_tracks);
    }
    Ok(())
}

fn print_subtitles(tracks: &[SubtitleTrack]) {
    println!("Subtitle Tracks: {}", tracks.len());
    for (i, track) in tracks.iter().enumerate() {
        println!(
            "  [{}] {} [{}] - {}",
            i,
            track.label,
            track.language,
            track.src.display()
        );
    }
}

fn print_audio(tracks: &[AudioTrackDescriptor]) {
    println!("Audio Tracks: {}", tracks.len());
    for track in tracks {
        print!("  [{}] {}", track.track_index, track.label);
        if let Some(ref codec) = track.codec {
            print!(" {}", codec);
        }
        if let Some(channels) = track.channels {
            print!(" {}ch", channels);
        }
        println!(" (stream {})", track.index);
    }
}

fn switch_audio(video: &str, index: usize, config_path: Option<&Path>) -> Result<()> {
    let service = build_service(config_path)?;
    let outcome = service.switch_audio_track(&VideoSource::parse(video), index);
    println!("{}", outcome.message);
    Ok(())
}

async fn resolve_url(url: &str, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools);
    let resolver = StreamResolver::from_registry(&tools, &config.stream);

    let resolved = resolver
        .resolve(url)
        .await
        .with_context(|| format!("Failed to resolve {url}"))?;
    println!("{}", resolved.stream_url);
    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools).check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them to enable all features.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config_summary(&config);
            for warning in config.validate() {
                println!("  warning: {}", warning);
            }
        }
        None => {
            println!("No config file specified, using defaults");
            println!("Default config:");
            print_config_summary(&config::Config::default());
        }
    }

    Ok(())
}

fn print_config_summary(config: &config::Config) {
    println!(
        "  Subtitle cache: {} ({:?})",
        config.subtitles.effective_cache_dir_name(),
        config.subtitles.cache_policy
    );
    println!(
        "  Max concurrent extractions: {}",
        config.subtitles.max_concurrent_extractions
    );
    println!("  Probe timeout: {}s", config.probe.timeout_secs);
    println!("  Stream format: {}", config.stream.format);
}
