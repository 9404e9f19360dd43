// src/cli/handlers/docs.rs

use anyhow::Result;
use colored::*;
use std::collections::HashMap;
use std::path::Path;

use crate::{cli::args::Config, core::config_file::ProjectConfig, system::executor};

/// Builds the documentation and exits with the builder's own status.
pub fn handle(_config: &Config, project: &ProjectConfig, root: &Path) -> Result<i32> {
    println!("{}", "Building documentation...".cyan());

    let status = executor::run_status(&project.tools.docs, &[], root, &HashMap::new())?;
    if status == 0 {
        println!("{}", "Documentation built.".green());
    }
    Ok(status)
}
