use crate::selection::McdaMethod;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "policygate")]
#[command(about = "Pre-publication policy gate and multi-criteria selector", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the gate on every candidate and report each decision
    Check {
        /// JSON array of {"id", "text", "metadata"} objects
        input: PathBuf,

        /// Config file (defaults to the nearest policygate.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Context profile passed to detectors as a tag
        #[arg(long)]
        profile: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Gate, score and rank candidates, then pick one or defer to review
    Select {
        /// JSON array of {"id", "text", "metadata"} objects
        input: PathBuf,

        /// Config file (defaults to the nearest policygate.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Context profile (overrides selection.profile)
        #[arg(long)]
        profile: Option<String>,

        /// Ranking method for multi-member Pareto fronts
        #[arg(long, value_enum)]
        method: Option<McdaMethod>,

        /// Number of ranked candidates to report
        #[arg(long, default_value = "1")]
        top_k: usize,

        /// Monte Carlo draws for robust weighting
        #[arg(long)]
        samples: Option<usize>,

        /// Seed for weight sampling
        #[arg(long, env = "POLICYGATE_SEED")]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List built-in and configured context profiles
    Profiles {
        /// Config file (defaults to the nearest policygate.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// Write a policygate.toml with default settings
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}
