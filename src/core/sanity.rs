// src/core/sanity.rs

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::config_file::ProjectConfig;

#[derive(Error, Debug)]
pub enum SanityError {
    #[error(
        "Sanity check failed: expected executable '{0}' is missing. \
         The environment looks broken; re-run provisioning (or pass --force \
         to rebuild it from scratch)."
    )]
    MissingArtifact(PathBuf),
    #[error("Tool command '{0}' could not be parsed.")]
    UnparsableCommand(String),
}

/// Verifies that provisioning actually produced the executables the test
/// action depends on: the test runner, the coverage tool, and the selenium
/// launcher. The first missing one is reported by name; a broken environment
/// must never be trusted silently.
pub fn check_artifacts(project: &ProjectConfig, root: &Path) -> Result<(), SanityError> {
    for command in project.expected_artifacts() {
        let program = first_program(command)?;
        if program.is_relative() && program.components().count() == 1 {
            // Bare program names are resolved through PATH; there is nothing
            // under the project root to verify for them.
            log::trace!(
                "Sanity check: skipping PATH-resolved program '{}'.",
                program.display()
            );
            continue;
        }
        let path = if program.is_absolute() {
            program
        } else {
            root.join(program)
        };

        if !path.is_file() {
            return Err(SanityError::MissingArtifact(path));
        }
        log::trace!("Sanity check: '{}' is present.", path.display());
    }

    log::debug!("Sanity check passed.");
    Ok(())
}

/// Extracts the program (first token) from a configured command line.
fn first_program(command_line: &str) -> Result<PathBuf, SanityError> {
    shlex::split(command_line.trim())
        .and_then(|parts| parts.into_iter().next())
        .map(PathBuf::from)
        .ok_or_else(|| SanityError::UnparsableCommand(command_line.to_string()))
}
