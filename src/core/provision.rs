// src/core/provision.rs

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{
    cli::args::{Config, VenvMode},
    constants::{
        CURRENT_ENV_VERSION, DOWNLOAD_CACHE_ENV, STAMP_FILENAME, USE_MIRRORS_ENV,
    },
    core::{config_file::ProjectConfig, sanity},
    system::executor,
};

/// Ensures a usable environment exists before any action runs.
///
/// The decision tree, in order:
/// 1. `--no-virtual-env` skips everything.
/// 2. `--force` deletes the existing environment tree unconditionally.
/// 3. A stamp equal to the current version with the environment directory in
///    place means "up to date": no side effects.
/// 4. Otherwise provisioning is proposed — unconditionally in quiet or
///    `--virtual-env` mode, interactively (yes-leaning) in ask mode. A
///    decline leaves the stale environment in place and is not an error.
pub fn ensure_environment(config: &Config, project: &ProjectConfig, root: &Path) -> Result<()> {
    if matches!(config.venv, VenvMode::Never) {
        log::debug!("Virtual environment disabled; skipping the environment check.");
        return Ok(());
    }

    let env_dir = root.join(&project.env_dir);
    if config.force && env_dir.exists() {
        println!(
            "{}",
            format!("Removing existing environment '{}' (--force).", env_dir.display()).yellow()
        );
        fs::remove_dir_all(&env_dir)
            .with_context(|| format!("Failed to remove '{}'", env_dir.display()))?;
    }

    let stamp = read_stamp(&stamp_path(root))?;
    if stamp == Some(CURRENT_ENV_VERSION) && env_dir.exists() {
        println!(
            "Environment is up to date (version {}).",
            CURRENT_ENV_VERSION
        );
        return Ok(());
    }

    if !should_provision(config, stamp)? {
        println!(
            "{}",
            "Keeping the existing environment. Note that it may be stale.".yellow()
        );
        return Ok(());
    }

    provision(project, root)
}

/// Whether provisioning may proceed for a missing or mismatched stamp.
/// Quiet and `--virtual-env` modes never prompt; ask mode confirms with a
/// yes-leaning default (plain Enter proceeds).
fn should_provision(config: &Config, stamp: Option<u64>) -> Result<bool> {
    if config.quiet || matches!(config.venv, VenvMode::Always) {
        return Ok(true);
    }

    let prompt = match stamp {
        Some(installed) => format!(
            "Environment version {} is installed but version {} is required. Rebuild now?",
            installed, CURRENT_ENV_VERSION
        ),
        None => "No provisioned environment was found. Build it now?".to_string(),
    };

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Runs the full provisioning sequence, fail-fast: installer, bootstrap,
/// download-cache creation, sanity check, and only then the stamp write.
/// A half-provisioned environment must never be marked as current.
fn provision(project: &ProjectConfig, root: &Path) -> Result<()> {
    let cache_dir = project.download_cache_dir()?;

    // The cache location and mirror switch only matter to the tools invoked
    // below, so they are injected into those invocations rather than mutated
    // into our own process environment.
    let mut env_vars = HashMap::new();
    env_vars.insert(
        DOWNLOAD_CACHE_ENV.to_string(),
        cache_dir.display().to_string(),
    );
    env_vars.insert(USE_MIRRORS_ENV.to_string(), "true".to_string());

    println!("{}", "Provisioning the environment...".cyan());
    executor::run_checked(&project.tools.installer, &[], root, &env_vars)
        .context("Environment installer failed")?;
    executor::run_checked(&project.tools.bootstrap, &[], root, &env_vars)
        .context("Build/bootstrap tool failed")?;

    fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create download cache '{}'", cache_dir.display()))?;

    sanity::check_artifacts(project, root)?;

    write_stamp(&stamp_path(root), CURRENT_ENV_VERSION)?;
    println!(
        "{}",
        format!("Environment provisioned at version {}.", CURRENT_ENV_VERSION).green()
    );
    Ok(())
}

/// The version stamp lives at a fixed path in the project root.
fn stamp_path(root: &Path) -> PathBuf {
    root.join(STAMP_FILENAME)
}

/// Reads the installed environment generation. A missing file and an
/// unparsable one are both `None`: either way the environment cannot be
/// trusted to match any particular version.
fn read_stamp(path: &Path) -> Result<Option<u64>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content.trim().parse::<u64>().ok()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read stamp file '{}'", path.display()))
        }
    }
}

fn write_stamp(path: &Path, version: u64) -> Result<()> {
    fs::write(path, format!("{}\n", version))
        .with_context(|| format!("Failed to write stamp file '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::SeleniumMode;
    use tempfile::TempDir;

    fn quiet_config() -> Config {
        Config {
            quiet: true,
            ..Config::default()
        }
    }

    #[test]
    fn test_stamp_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = stamp_path(dir.path());

        write_stamp(&path, 14).unwrap();

        assert_eq!(read_stamp(&path).unwrap(), Some(14));
        assert_eq!(fs::read_to_string(&path).unwrap(), "14\n");
    }

    #[test]
    fn test_missing_stamp_reads_as_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_stamp(&stamp_path(dir.path())).unwrap(), None);
    }

    #[test]
    fn test_garbage_stamp_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let path = stamp_path(dir.path());
        fs::write(&path, "not-a-number\n").unwrap();

        assert_eq!(read_stamp(&path).unwrap(), None);
    }

    #[test]
    fn test_quiet_mode_provisions_without_prompting() {
        // Safe to call in a test: the quiet branch returns before any
        // interactive prompt is constructed.
        assert!(should_provision(&quiet_config(), None).unwrap());
        assert!(should_provision(&quiet_config(), Some(3)).unwrap());
    }

    #[test]
    fn test_always_mode_provisions_without_prompting() {
        let config = Config {
            venv: VenvMode::Always,
            ..Config::default()
        };
        assert!(should_provision(&config, None).unwrap());
    }

    #[test]
    fn test_current_stamp_and_existing_env_dir_mean_no_side_effects() {
        // --- Setup: an up-to-date environment ---
        let dir = TempDir::new().unwrap();
        let project = ProjectConfig::default();
        fs::create_dir_all(dir.path().join(&project.env_dir)).unwrap();
        write_stamp(&stamp_path(dir.path()), CURRENT_ENV_VERSION).unwrap();

        // --- Execute: must return without invoking any tool. None of the
        // configured tools exist under this root, so reaching provisioning
        // would have produced an error. ---
        let result = ensure_environment(&quiet_config(), &project, dir.path());

        // --- Assert ---
        assert!(result.is_ok());
        assert!(dir.path().join(&project.env_dir).exists());
        assert_eq!(
            read_stamp(&stamp_path(dir.path())).unwrap(),
            Some(CURRENT_ENV_VERSION)
        );
    }

    #[test]
    fn test_never_mode_skips_even_a_missing_environment() {
        let dir = TempDir::new().unwrap();
        let project = ProjectConfig::default();
        let config = Config {
            venv: VenvMode::Never,
            selenium: SeleniumMode::Auto,
            ..Config::default()
        };

        assert!(ensure_environment(&config, &project, dir.path()).is_ok());
        assert!(!dir.path().join(&project.env_dir).exists());
    }

    #[test]
    fn test_force_removes_the_environment_tree_and_failure_never_stamps() {
        // --- Setup: a stale environment plus --force. The installer points
        // at a path that cannot exist under the temp root, so provisioning
        // fails deterministically right after the deletion. ---
        let dir = TempDir::new().unwrap();
        let mut project = ProjectConfig::default();
        project.tools.installer = "bin/definitely-missing-installer".to_string();
        let env_dir = dir.path().join(&project.env_dir);
        fs::create_dir_all(env_dir.join("bin")).unwrap();
        write_stamp(&stamp_path(dir.path()), CURRENT_ENV_VERSION - 1).unwrap();

        let config = Config {
            force: true,
            quiet: true,
            ..Config::default()
        };

        // --- Execute ---
        let result = ensure_environment(&config, &project, dir.path());

        // --- Assert: deletion happened, and the failed provisioning left the
        // old stamp alone instead of marking the environment current. ---
        assert!(result.is_err());
        assert!(!env_dir.exists());
        assert_eq!(
            read_stamp(&stamp_path(dir.path())).unwrap(),
            Some(CURRENT_ENV_VERSION - 1)
        );
    }
}
