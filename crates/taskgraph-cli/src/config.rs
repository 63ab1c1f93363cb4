//! `taskgraph.toml` configuration.
//!
//! Every field has a default, so a missing file (or a file with only some
//! sections) is valid. Command-line flags override whatever is loaded here.
//!
//! ```toml
//! [analysis]
//! default_source = 0
//!
//! [reports]
//! enabled = true
//! directory = "reports"
//!
//! [generate]
//! seed = 42
//! output_dir = "data"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "taskgraph.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Source node used when the input document does not name one.
    #[serde(default)]
    pub default_source: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_reports_dir")]
    pub directory: PathBuf,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            directory: default_reports_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_data_dir")]
    pub output_dir: PathBuf,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            output_dir: default_data_dir(),
        }
    }
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `taskgraph.toml` under
/// `project_root` is used if present, defaults otherwise.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`Config`].
pub fn load_config(explicit: Option<&Path>, project_root: &Path) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = project_root.join(CONFIG_FILE_NAME);
            if !path.exists() {
                return Ok(Config::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_true() -> bool {
    true
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

const fn default_seed() -> u64 {
    42
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(None, root.path()).expect("load should succeed");

        assert_eq!(cfg.analysis.default_source, 0);
        assert!(cfg.reports.enabled);
        assert_eq!(cfg.reports.directory, PathBuf::from("reports"));
        assert_eq!(cfg.generate.seed, 42);
        assert_eq!(cfg.generate.output_dir, PathBuf::from("data"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[reports]\nenabled = false\n\n[analysis]\ndefault_source = 3\n",
        )
        .expect("write config");

        let cfg = load_config(None, root.path()).expect("load should succeed");

        assert!(!cfg.reports.enabled);
        assert_eq!(cfg.reports.directory, PathBuf::from("reports"));
        assert_eq!(cfg.analysis.default_source, 3);
        assert_eq!(cfg.generate.seed, 42);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let missing = root.path().join("nope.toml");

        assert!(load_config(Some(&missing), root.path()).is_err());
    }

    #[test]
    fn malformed_config_reports_path() {
        let root = tempfile::tempdir().expect("tempdir");
        let path = root.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[reports\nenabled = yes").expect("write config");

        let err = load_config(None, root.path()).expect_err("invalid toml");
        assert!(err.to_string().contains("Failed to parse"));
    }
}
