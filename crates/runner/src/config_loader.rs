use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Minimal config loader for the runner.
///
/// Search order:
/// 1) `WARSIM_BOT_CONFIG_DIR/<relative_path>`
/// 2) `./<relative_path>`
/// 3) `<repo_root>/config/<relative_path>` (repo-local convenience)
///
/// A missing file is reported distinctly from a malformed one so callers can
/// fall back to defaults for the former.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn parse_from_file<T: DeserializeOwned>(relative_path: &str) -> anyhow::Result<Option<T>> {
        let Some(path) = Self::resolve_path(relative_path) else {
            return Ok(None);
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::parse_from_string(text).map(Some)
    }

    pub fn parse_from_string<T: DeserializeOwned>(text: String) -> anyhow::Result<T> {
        toml::from_str(&text).with_context(|| "Failed to parse TOML")
    }

    fn resolve_path(relative_path: &str) -> Option<PathBuf> {
        let rel = Path::new(relative_path);

        if let Some(root) = env::var_os("WARSIM_BOT_CONFIG_DIR") {
            let candidate = PathBuf::from(root).join(rel);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if let Ok(cwd) = env::current_dir() {
            let candidate = cwd.join(rel);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        // Repo convenience: <repo_root>/config/<relative_path>. This crate
        // lives at <repo_root>/crates/runner.
        let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .ancestors()
            .nth(2)?
            .join("config")
            .join(rel);
        if candidate.is_file() {
            return Some(candidate);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn parses_toml_from_string() {
        let sample: Sample =
            ConfigLoader::parse_from_string("name = \"x\"\ncount = 3\n".to_string()).unwrap();
        assert_eq!(sample.name, "x");
        assert_eq!(sample.count, 3);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let res: anyhow::Result<Sample> =
            ConfigLoader::parse_from_string("name = [broken\n".to_string());
        assert!(res.is_err());
    }
}
