use clap::{Parser, Subcommand};
use std::path::PathBuf;
use triagedesk::backend::types::{ArtifactKind, RiskTolerance};

/// `triagedesk` - Human-in-the-loop review workstation for dataset triage.
#[derive(Parser, Debug)]
#[command(name = "triagedesk")]
#[command(version = "0.1.0")]
#[command(about = "Upload a batch, audit the classifier, correct the labels.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Base URL of the triage backend
        #[arg(long)]
        backend: Option<String>,
    },

    /// Run an interactive review session over a dataset file
    Review {
        /// Dataset file to submit (CSV)
        file: PathBuf,

        /// Dataset column holding the ticket text
        #[arg(short, long)]
        column: Option<String>,

        /// Risk tolerance for auto-resolution
        #[arg(short, long, value_enum)]
        mode: Option<RiskTolerance>,

        /// Backend base URL (overrides config)
        #[arg(long)]
        backend: Option<String>,
    },

    /// Print the download URL for a batch artifact
    Download {
        /// Which artifact to fetch
        #[arg(value_enum)]
        kind: ArtifactKind,

        /// Backend base URL (overrides config)
        #[arg(long)]
        backend: Option<String>,
    },
}
