//! Configuration: gate thresholds, selection settings, context profiles.
//!
//! Everything has a default; a `policygate.toml` found by [`load_config`]
//! overrides only the keys it names.

mod loader;
pub mod profiles;
mod selection;
mod thresholds;

pub use loader::{
    directory_ancestors, load_config, load_config_from_path, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
pub use profiles::{AxisProfile, ContextProfile, ProfileName, ProfileOverride};
pub use selection::SelectionConfig;
pub use thresholds::GateConfig;

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyGateConfig {
    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    /// Custom profiles; axes named here replace those of the built-in
    /// profile with the same name (or of `default`)
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileOverride>,
}

impl PolicyGateConfig {
    pub fn validate(&self) -> Result<()> {
        self.gate.validate()?;
        self.selection.validate()?;
        for (name, overrides) in &self.profiles {
            overrides
                .resolve(name)
                .validate()
                .map_err(|e| Error::Configuration(format!("profiles.{name}: {e}")))?;
        }
        // Fail at load time rather than at first selection
        self.resolve_profile(&self.selection.profile)?;
        Ok(())
    }

    /// Custom profiles first, then built-ins.
    pub fn resolve_profile(&self, name: &str) -> Result<ContextProfile> {
        if let Some(overrides) = self.profiles.get(name) {
            return Ok(overrides.resolve(name));
        }
        ProfileName::parse(name)
            .map(ProfileName::to_profile)
            .ok_or_else(|| Error::UnknownProfile {
                name: name.to_string(),
                available: self.profile_names(),
            })
    }

    /// Built-in names followed by custom ones, deduplicated.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = ProfileName::ALL.iter().map(|p| p.to_string()).collect();
        for name in self.profiles.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// The profile named by `selection.profile`.
    pub fn active_profile(&self) -> Result<ContextProfile> {
        self.resolve_profile(&self.selection.profile)
    }
}
