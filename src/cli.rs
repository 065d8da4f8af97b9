use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "saru")]
#[command(author, version, about = "Subtitle and audio track discovery for video files")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List embedded and sidecar subtitle tracks, extracting as needed
    Subtitles {
        /// Video file or stream URL
        #[arg(required = true)]
        video: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List audio tracks
    Audio {
        /// Video file or stream URL
        #[arg(required = true)]
        video: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List subtitle and audio tracks together
    Tracks {
        /// Video file or stream URL
        #[arg(required = true)]
        video: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Request a switch to another audio track
    SwitchAudio {
        /// Video file or stream URL
        #[arg(required = true)]
        video: String,

        /// Zero-based audio track index
        #[arg(required = true)]
        index: usize,
    },

    /// Resolve a video page URL to a directly playable stream URL
    Resolve {
        /// Page URL
        #[arg(required = true)]
        url: String,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}
