//! CLI definitions for statesnap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Record page network state into snapshots and replay them offline.
#[derive(Parser)]
#[command(name = "statesnap")]
#[command(version)]
pub(crate) struct Cli {
    /// Data directory (default: ~/.statesnap)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Record live traffic for one frame and write its capture
    Record {
        /// URL of the page being recorded
        page_url: String,

        /// GET through fetch (repeatable)
        #[arg(long = "fetch", value_name = "URL")]
        fetches: Vec<String>,

        /// GET through XMLHttpRequest (repeatable)
        #[arg(long = "xhr", value_name = "URL")]
        xhrs: Vec<String>,

        /// Send an empty beacon (repeatable)
        #[arg(long = "beacon", value_name = "URL")]
        beacons: Vec<String>,

        /// Seed localStorage before recording (repeatable)
        #[arg(long = "local", value_name = "KEY=VALUE")]
        local_storage: Vec<String>,

        /// Include the frame's DOM from this HTML file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Output file for the frame capture
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Merge frame captures into a snapshot
    Assemble {
        /// Frame capture files, top-level frame first
        #[arg(required = true)]
        frames: Vec<PathBuf>,

        /// Page URL stored in the snapshot
        #[arg(long)]
        url: String,

        #[arg(short, long)]
        description: Option<String>,

        /// JSON array of cookies
        #[arg(long)]
        cookies: Option<PathBuf>,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print a summary of a snapshot
    Inspect {
        snapshot: PathBuf,
    },

    /// Show which recorded entry a request would be served from
    Match {
        snapshot: PathBuf,

        method: String,

        url: String,

        /// Request body
        #[arg(long)]
        body: Option<String>,

        /// Origin for relative URLs (default: config, then snapshot URL)
        #[arg(long)]
        origin: Option<String>,
    },

    /// Issue requests against a replayed snapshot
    Replay {
        snapshot: PathBuf,

        #[arg(required = true)]
        urls: Vec<String>,

        #[arg(long, default_value = "GET")]
        method: String,

        #[arg(long)]
        body: Option<String>,

        #[arg(long)]
        origin: Option<String>,
    },
}
