// src/bin/preflight.rs

use anyhow::Result;
use colored::*;
use preflight::{
    cli::{
        args::{Config, USAGE},
        dispatcher::{self, Action},
    },
    core::{config_file::ProjectConfig, provision},
};
use std::env;

/// The main entry point of the `preflight` application.
/// It sets up logging, builds the immutable configuration, runs the
/// environment check, dispatches exactly one terminal action, and performs
/// centralized error handling.
fn main() {
    env_logger::init();

    let config = Config::from_args(env::args().skip(1));
    log::debug!("Parsed configuration: {:?}", config);

    // --help short-circuits everything, before any environment or dispatch
    // logic runs.
    if config.help {
        print!("{}", USAGE);
        return;
    }

    match run(&config) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // --- Centralized Error Handling ---
            // Every failure path (missing artifacts, provisioning errors,
            // selenium timeouts) surfaces here with a formatted message.
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Orchestration sequence: load project config, check/refresh the
/// environment, then run the single selected action and hand back its exit
/// code.
fn run(config: &Config) -> Result<i32> {
    let root = env::current_dir()?;
    let project = ProjectConfig::load(&root)?;

    provision::ensure_environment(config, &project, &root)?;

    let action = Action::from_config(config);
    dispatcher::dispatch(action, config, &project, &root)
}
