use crate::cli::OutputFormat;
use crate::io::output::create_writer;
use anyhow::Result;
use std::path::Path;

pub fn list_profiles(config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let settings = super::resolve_config(config)?;
    let profiles = settings
        .profile_names()
        .iter()
        .map(|name| settings.resolve_profile(name))
        .collect::<crate::errors::Result<Vec<_>>>()?;

    let mut writer = create_writer(format, None)?;
    writer.write_profiles(&profiles)
}
