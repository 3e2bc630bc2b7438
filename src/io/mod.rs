pub mod output;

use crate::core::Candidate;
use crate::errors::{Error, Result, ResultExt};
use std::collections::BTreeSet;
use std::path::Path;

/// Read a JSON array of candidates. Ids must be non-empty and unique.
pub fn read_candidates(path: &Path) -> Result<Vec<Candidate>> {
    let contents = std::fs::read_to_string(path).context(format!("reading {}", path.display()))?;
    parse_candidates(&contents).context(format!("parsing {}", path.display()))
}

pub fn parse_candidates(json: &str) -> Result<Vec<Candidate>> {
    let candidates: Vec<Candidate> = serde_json::from_str(json)?;
    let mut seen = BTreeSet::new();
    for candidate in &candidates {
        if candidate.id.trim().is_empty() {
            return Err(Error::Validation("candidate id must not be empty".into()));
        }
        if !seen.insert(candidate.id.as_str()) {
            return Err(Error::Validation(format!(
                "duplicate candidate id '{}'",
                candidate.id
            )));
        }
    }
    Ok(candidates)
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).context(format!("writing {}", path.display()))
}
