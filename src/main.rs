use anyhow::Result;
use clap::Parser;
use policygate::cli::{Cli, Commands};
use policygate::commands::{check, init, profiles, select};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    policygate::observability::init_tracing();
    let cli = Cli::parse();

    let ok = match cli.command {
        Commands::Check {
            input,
            config,
            profile,
            format,
            output,
        } => check::check_candidates(check::CheckConfig {
            input,
            config,
            profile,
            format,
            output,
        })?,
        Commands::Select {
            input,
            config,
            profile,
            method,
            top_k,
            samples,
            seed,
            format,
            output,
        } => select::select_candidate(select::SelectConfig {
            input,
            config,
            profile,
            method,
            top_k,
            samples,
            seed,
            format,
            output,
        })?,
        Commands::Profiles { config, format } => {
            profiles::list_profiles(config.as_deref(), format)?;
            true
        }
        Commands::Init { force } => {
            init::init_config(force)?;
            true
        }
    };

    // 1: some candidate blocked, or selection deferred to human review
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::from(1) })
}
