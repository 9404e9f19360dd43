// src/cli/handlers/server.rs

use anyhow::Result;
use colored::*;
use std::collections::HashMap;
use std::path::Path;

use crate::{cli::args::Config, core::config_file::ProjectConfig, system::executor};

/// Launches the development server in the foreground and exits with its
/// status once it stops. Interrupt handling is left to the host shell.
pub fn handle(_config: &Config, project: &ProjectConfig, root: &Path) -> Result<i32> {
    println!(
        "{}",
        "Starting the development server (Ctrl+C to stop)...".cyan()
    );

    let status = executor::run_status(&project.tools.server, &[], root, &HashMap::new())?;
    Ok(status)
}
