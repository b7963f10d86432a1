//! Command-line interface, built on clap.
//!
//! Defines the [`Cli`] struct with subcommands [`Command`] (text, audio,
//! status) and global flags (--base-url, --interval-ms, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// callsight — dual-engine customer call analysis client.
#[derive(Debug, Parser)]
#[command(name = "callsight", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the analysis backend.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Delay between status polls, in milliseconds.
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    /// Enable verbose output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a call transcript and wait for the engine comparison.
    Text {
        /// The transcript to analyze.
        text: String,

        /// Use the single-call synchronous flow instead of polling.
        #[arg(long)]
        sync: bool,
    },

    /// Upload an audio recording and wait for the engine comparison.
    Audio {
        /// Path to the audio file.
        path: PathBuf,

        /// Use the single-call synchronous flow instead of polling.
        #[arg(long)]
        sync: bool,
    },

    /// Fetch the current status snapshot of an existing job.
    Status {
        /// The job id returned at submission.
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_text_subcommand() {
        let cli = Cli::parse_from(["callsight", "text", "I want to cancel my card"]);
        match cli.command {
            Command::Text { text, sync } => {
                assert_eq!(text, "I want to cancel my card");
                assert!(!sync);
            }
            _ => panic!("expected Text command"),
        }
    }

    #[test]
    fn cli_parses_audio_with_sync_flag() {
        let cli = Cli::parse_from(["callsight", "audio", "call.wav", "--sync"]);
        match cli.command {
            Command::Audio { path, sync } => {
                assert_eq!(path, PathBuf::from("call.wav"));
                assert!(sync);
            }
            _ => panic!("expected Audio command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "callsight",
            "--base-url",
            "https://calls.example.com",
            "--interval-ms",
            "500",
            "--verbose",
            "status",
            "42",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.base_url.as_deref(), Some("https://calls.example.com"));
        assert_eq!(cli.interval_ms, Some(500));
        match cli.command {
            Command::Status { id } => assert_eq!(id, "42"),
            _ => panic!("expected Status command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
