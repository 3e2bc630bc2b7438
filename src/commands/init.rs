use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = r#"# policygate configuration

[gate]
tau_reject = 0.6
tau_repair = 0.3
max_repairs = 2

[selection]
p_best_threshold = 0.55
n_samples = 2000
method = "robust-weight"   # or "topsis"
seed = 42
profile = "default"

# Custom profiles override built-ins of the same name. Axes not listed
# come from that built-in, or from "default" for a new name.
# [profiles.newsroom.safety]
# e_min = 0.5
# e_target = 0.9
# weight_range = [0.2, 0.4]
"#;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created {CONFIG_FILE_NAME}");

    Ok(())
}
