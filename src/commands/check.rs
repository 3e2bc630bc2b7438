use crate::cli::OutputFormat;
use crate::detection::{create_default_registry, DetectionContext};
use crate::gate::Gate;
use crate::io::{output::create_writer, read_candidates};
use anyhow::Result;
use std::path::PathBuf;

pub struct CheckConfig {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub profile: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Returns `true` when every candidate passed the gate.
pub fn check_candidates(config: CheckConfig) -> Result<bool> {
    let settings = super::resolve_config(config.config.as_deref())?;
    let gate = Gate::new(settings.gate.clone(), create_default_registry())?;
    let context = config
        .profile
        .as_deref()
        .map(|name| settings.resolve_profile(name))
        .transpose()?
        .map(|profile| DetectionContext::for_profile(profile.name));
    let candidates = read_candidates(&config.input)?;

    tracing::debug!(count = candidates.len(), "checking candidates");
    let results = gate.check_batch(candidates, context.as_ref());

    let mut writer = create_writer(config.format, config.output.as_deref())?;
    writer.write_gate_results(&results)?;

    Ok(results.iter().all(|(_, r)| r.decision.passes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn unknown_profile_fails_before_checking() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("candidates.json");
        fs::write(&input, r#"[{"id": "a", "text": "Plain update."}]"#).unwrap();
        let settings = dir.path().join("policygate.toml");
        fs::write(&settings, "").unwrap();

        let err = check_candidates(CheckConfig {
            input,
            config: Some(settings),
            profile: Some("orbital".into()),
            format: OutputFormat::Json,
            output: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("Unknown profile 'orbital'"), "{err}");
    }
}
