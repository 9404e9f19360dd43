// src/core/config_file.rs

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{ENV_DIR, PROJECT_CONFIG_FILENAME};

/// Per-project configuration, loaded once from `preflight.toml` at the
/// project root. Every field has a default, so a missing or partial file is
/// fine; most projects need no file at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory of the provisioned virtual environment, relative to the root.
    pub env_dir: String,
    /// Optional override for the shared download cache. Supports `~` and
    /// environment-variable expansion.
    pub download_cache_dir: Option<String>,
    /// Value exported as the settings module for the host-application suite.
    pub settings_module: String,
    pub tools: Tools,
    pub service: ServiceConfig,
    pub suites: Suites,
}

/// Command lines for the external tools this wrapper orchestrates. Relative
/// paths are resolved against the project root at execution time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tools {
    /// Environment installer, run first during provisioning.
    pub installer: String,
    /// Build/bootstrap tool, run after the installer.
    pub bootstrap: String,
    pub coverage: String,
    pub selenium: String,
    pub lint: String,
    pub style: String,
    pub docs: String,
    pub server: String,
}

/// Background selenium server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Log file the server writes to while preflight polls for readiness,
    /// relative to the project root.
    pub log_file: String,
    /// Substring (matched case-insensitively) marking the server as ready.
    pub ready_marker: String,
    pub poll_interval_ms: u64,
    pub max_attempts: u32,
}

/// The two independent test suites of the full test action.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Suites {
    /// Component-library suite, run first.
    pub components: String,
    /// Host-application suite, run second with the local settings swapped out.
    pub application: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            env_dir: ENV_DIR.to_string(),
            download_cache_dir: None,
            settings_module: "testproject.settings".to_string(),
            tools: Tools::default(),
            service: ServiceConfig::default(),
            suites: Suites::default(),
        }
    }
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            installer: format!("virtualenv --distribute {}", ENV_DIR),
            bootstrap: "bin/buildout -N".to_string(),
            coverage: "bin/coverage".to_string(),
            selenium: "bin/selenium".to_string(),
            lint: "bin/pylint --rcfile=.pylintrc src".to_string(),
            style: "bin/pep8 --repeat src".to_string(),
            docs: "bin/sphinx-build docs docs/_build/html".to_string(),
            server: "bin/django runserver".to_string(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_file: "selenium.log".to_string(),
            ready_marker: "Started SocketListener on 0.0.0.0:4444".to_string(),
            poll_interval_ms: 1000,
            max_attempts: 60,
        }
    }
}

impl Default for Suites {
    fn default() -> Self {
        Self {
            components: "bin/test".to_string(),
            application: "bin/django test".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Loads `preflight.toml` from the project root, falling back to the
    /// built-in defaults when the file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(PROJECT_CONFIG_FILENAME);
        if !path.exists() {
            log::debug!(
                "No '{}' found at '{}'; using defaults.",
                PROJECT_CONFIG_FILENAME,
                root.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse '{}'", path.display()))?;

        log::debug!("Loaded project configuration from '{}'.", path.display());
        Ok(config)
    }

    /// Resolves the download cache directory: the configured template if set
    /// (with `~` and env vars expanded), otherwise a per-user default under
    /// the system cache directory.
    pub fn download_cache_dir(&self) -> Result<PathBuf> {
        match &self.download_cache_dir {
            Some(template) => {
                let expanded = shellexpand::full(template).map_err(|e| {
                    anyhow!("Failed to expand download cache path '{}': {}", template, e)
                })?;
                Ok(PathBuf::from(expanded.into_owned()))
            }
            None => {
                let base = dirs::cache_dir()
                    .ok_or_else(|| anyhow!("Could not determine the user cache directory"))?;
                Ok(base.join("preflight").join("downloads"))
            }
        }
    }

    /// The three artifacts provisioning must have produced for the
    /// environment to be trusted: the first program of the test runner, the
    /// coverage tool, and the selenium launcher.
    pub fn expected_artifacts(&self) -> [&str; 3] {
        [
            self.suites.components.as_str(),
            self.tools.coverage.as_str(),
            self.tools.selenium.as_str(),
        ]
    }
}
