use crate::cli::OutputFormat;
use crate::detection::DetectionContext;
use crate::io::{output::create_writer, read_candidates};
use crate::selection::{McdaMethod, Selector};
use anyhow::Result;
use std::path::PathBuf;

pub struct SelectConfig {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub profile: Option<String>,
    pub method: Option<McdaMethod>,
    pub top_k: usize,
    pub samples: Option<usize>,
    pub seed: Option<u64>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Returns `true` when a winner was selected.
pub fn select_candidate(config: SelectConfig) -> Result<bool> {
    let mut settings = super::resolve_config(config.config.as_deref())?;

    // Command-line flags override the file
    if let Some(profile) = config.profile {
        settings.selection.profile = profile;
    }
    if let Some(method) = config.method {
        settings.selection.method = method;
    }
    if let Some(samples) = config.samples {
        settings.selection.n_samples = samples;
    }
    if let Some(seed) = config.seed {
        settings.selection.seed = seed;
    }
    settings.validate()?;

    let selector = Selector::from_config(&settings)?;
    let candidates = read_candidates(&config.input)?;
    let context = DetectionContext::for_profile(settings.selection.profile.clone());

    let result = selector.select(candidates, Some(&context), config.top_k);

    let mut writer = create_writer(config.format, config.output.as_deref())?;
    writer.write_selection(&result)?;

    Ok(result.is_decided())
}
