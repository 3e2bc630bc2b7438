use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::PolicyGateConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "policygate.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse TOML and validate every section.
pub fn parse_and_validate_config(contents: &str) -> Result<PolicyGateConfig> {
    let config = toml::from_str::<PolicyGateConfig>(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load an explicit config file. Missing or invalid files are errors.
pub fn load_config_from_path(path: &Path) -> Result<PolicyGateConfig> {
    let contents = read_config_file(path).map_err(|e| Error::config_file(path, e.to_string()))?;
    let config =
        parse_and_validate_config(&contents).map_err(|e| Error::config_file(path, e.to_string()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// `start` and its parents, nearest first, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search the working directory and its ancestors for `policygate.toml`.
///
/// No file found means defaults. A file that is found but unreadable or
/// invalid is an error; it is never silently replaced by defaults.
pub fn load_config() -> Result<PolicyGateConfig> {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(error = %e, "failed to get current directory; using default config");
            return Ok(PolicyGateConfig::default());
        }
    };
    load_config_from_ancestors(current)
}

pub(crate) fn load_config_from_ancestors(start: PathBuf) -> Result<PolicyGateConfig> {
    let found = directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file());

    match found {
        Some(path) => load_config_from_path(&path),
        None => {
            tracing::debug!(
                depth = MAX_TRAVERSAL_DEPTH,
                "no {CONFIG_FILE_NAME} found; using default config"
            );
            Ok(PolicyGateConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::McdaMethod;
    use indoc::indoc;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config, PolicyGateConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            [gate]
            tau_reject = 0.7

            [selection]
            method = "topsis"
            profile = "medical"
        "#})
        .unwrap();
        assert_eq!(config.gate.tau_reject, 0.7);
        assert_eq!(config.gate.tau_repair, 0.3);
        assert_eq!(config.selection.method, McdaMethod::Topsis);
        assert_eq!(config.selection.profile, "medical");
    }

    #[test]
    fn invalid_threshold_fails_fast() {
        let result = parse_and_validate_config(indoc! {r#"
            [gate]
            tau_reject = 0.2
            tau_repair = 0.5
        "#});
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn ancestors_are_bounded() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }

    #[test]
    fn finds_file_in_parent_directory() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("drafts").join("week1");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[gate]\nmax_repairs = 4\n",
        )
        .unwrap();

        let config = load_config_from_ancestors(nested).unwrap();
        assert_eq!(config.gate.max_repairs, 4);
    }

    #[test]
    fn broken_file_is_an_error_not_defaults() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[gate\n").unwrap();

        let err = load_config_from_ancestors(root.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, Error::ConfigFile { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
