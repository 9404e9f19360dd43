// src/cli/dispatcher.rs

use anyhow::Result;
use std::path::Path;

use crate::{
    cli::{args::Config, handlers},
    core::config_file::ProjectConfig,
};

/// The terminal action of one invocation. Exactly one action runs per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Docs,
    StyleCheck,
    Lint,
    RunServer,
    Test,
}

impl Action {
    /// Selects the single action for this run.
    ///
    /// Several "only" flags may be set at once on the command line; the fixed
    /// priority below decides deterministically which one is honored:
    /// docs > style check > lint > dev server > full tests.
    pub fn from_config(config: &Config) -> Self {
        if config.docs_only {
            Self::Docs
        } else if config.pep8_only {
            Self::StyleCheck
        } else if config.lint_only {
            Self::Lint
        } else if config.run_server {
            Self::RunServer
        } else {
            Self::Test
        }
    }
}

/// Runs the selected action and returns the exit code the process should
/// terminate with. The match is exhaustive, so a new `Action` variant cannot
/// be added without wiring up its handler.
pub fn dispatch(
    action: Action,
    config: &Config,
    project: &ProjectConfig,
    root: &Path,
) -> Result<i32> {
    log::debug!("Dispatching action: {:?}", action);

    let handler: fn(&Config, &ProjectConfig, &Path) -> Result<i32> = match action {
        Action::Docs => handlers::docs::handle,
        Action::StyleCheck => handlers::style::handle,
        Action::Lint => handlers::lint::handle,
        Action::RunServer => handlers::server::handle,
        Action::Test => handlers::test::handle,
    };

    handler(config, project, root)
}
