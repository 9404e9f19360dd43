// src/core/settings.rs

use scopeguard::ScopeGuard;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::LOCAL_SETTINGS_FILENAME;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not move '{path}' out of the way: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// RAII guard that puts the local settings file back on drop.
pub type SettingsGuard = ScopeGuard<(PathBuf, PathBuf), fn((PathBuf, PathBuf))>;

/// Moves the developer's local settings file out of the way so the
/// host-application suite runs against the checked-in settings.
///
/// Returns `None` when no local settings file exists (nothing to swap).
/// Otherwise the returned guard restores the file when it goes out of scope,
/// including on the error path of the surrounding test run.
pub fn swap_out(root: &Path) -> Result<Option<SettingsGuard>, SettingsError> {
    let original = root.join(LOCAL_SETTINGS_FILENAME);
    if !original.exists() {
        log::debug!("No '{}' to swap out.", LOCAL_SETTINGS_FILENAME);
        return Ok(None);
    }

    let backup = original.with_extension("py.bak");
    fs::rename(&original, &backup).map_err(|e| SettingsError::Backup {
        path: original.clone(),
        source: e,
    })?;
    log::debug!(
        "Swapped '{}' out to '{}'.",
        original.display(),
        backup.display()
    );

    Ok(Some(scopeguard::guard(
        (original, backup),
        restore_settings as fn((PathBuf, PathBuf)),
    )))
}

fn restore_settings((original, backup): (PathBuf, PathBuf)) {
    if let Err(e) = fs::rename(&backup, &original) {
        log::warn!(
            "Failed to restore '{}' from '{}': {}",
            original.display(),
            backup.display(),
            e
        );
    } else {
        log::debug!("Restored '{}'.", original.display());
    }
}
