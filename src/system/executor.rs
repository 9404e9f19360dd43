// src/system/executor.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{0}' exited with a non-zero error code.")]
    NonZeroExitStatus(String),
}

/// Splits a configured command line into a program and its arguments.
///
/// Relative tool paths with a directory component (e.g. `bin/test`) are
/// anchored to the project root rather than the caller's working directory,
/// which keeps behavior identical regardless of where preflight was invoked.
pub(crate) fn prepare(
    command_line: &str,
    cwd: &Path,
) -> Result<(PathBuf, Vec<String>), ExecutionError> {
    let trimmed = command_line.trim();
    if trimmed.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    let parts = shlex::split(trimmed)
        .ok_or_else(|| ExecutionError::CommandParse(trimmed.to_string()))?;
    let (program, args) = parts.split_first().ok_or(ExecutionError::EmptyCommand)?;

    let program_path = Path::new(program);
    let program = if program_path.is_relative() && program_path.components().count() > 1 {
        cwd.join(program_path)
    } else {
        PathBuf::from(program)
    };

    Ok((program, args.to_vec()))
}

/// Runs a command to completion with inherited stdio and returns its exit
/// code. A non-zero exit code is data for the caller, not an error: most
/// orchestrated tools (test runners, linters) report findings through their
/// exit status and the caller decides what that status means.
pub fn run_status(
    command_line: &str,
    extra_args: &[String],
    cwd: &Path,
    env_vars: &HashMap<String, String>,
) -> Result<i32, ExecutionError> {
    let clean_cwd = dunce::simplified(cwd);
    let (program, args) = prepare(command_line, clean_cwd)?;

    log::debug!(
        "Running '{}' with args {:?} {:?} in '{}'",
        program.display(),
        args,
        extra_args,
        clean_cwd.display()
    );

    let status = StdCommand::new(&program)
        .args(&args)
        .args(extra_args)
        .current_dir(clean_cwd)
        .envs(env_vars)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| ExecutionError::CommandFailed(command_line.trim().to_string(), e))?;

    // A signal-terminated process has no exit code; treat it as a generic failure.
    Ok(status.code().unwrap_or(1))
}

/// Runs a command and treats any non-zero exit code as an error.
/// Used by provisioning, where a failing step must abort the whole run
/// before the environment can be stamped as current.
pub fn run_checked(
    command_line: &str,
    extra_args: &[String],
    cwd: &Path,
    env_vars: &HashMap<String, String>,
) -> Result<(), ExecutionError> {
    let code = run_status(command_line, extra_args, cwd, env_vars)?;
    if code != 0 {
        return Err(ExecutionError::NonZeroExitStatus(
            command_line.trim().to_string(),
        ));
    }
    Ok(())
}
