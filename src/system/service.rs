// src/system/service.rs

use colored::*;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command as StdCommand, Stdio};
use std::thread;
use std::time::Duration;
use thiserror::Error;

use crate::{core::config_file::ServiceConfig, system::executor};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Could not create the selenium log file '{path}': {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Selenium launch command could not be parsed: {0}")]
    CommandParse(String),
    #[error("Could not launch the selenium server ('{command}'): {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error(
        "The selenium server did not become ready after {attempts} attempts \
         (~{seconds}s). Check '{log}' for details."
    )]
    ReadyTimeout {
        attempts: u32,
        seconds: u64,
        log: String,
    },
}

/// A running background service. The handle owns the spawned process, so
/// teardown never has to rediscover it by scanning the process table.
#[derive(Debug)]
pub struct ServiceHandle {
    child: Child,
    log_path: PathBuf,
}

impl ServiceHandle {
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }
}

/// Launches the selenium server as a detached background process, with both
/// output streams redirected to the dedicated log file the readiness poll
/// watches.
pub fn start(
    command_line: &str,
    service: &ServiceConfig,
    root: &Path,
) -> Result<ServiceHandle, ServiceError> {
    let log_path = root.join(&service.log_file);
    let log_out = File::create(&log_path).map_err(|e| ServiceError::LogFile {
        path: log_path.clone(),
        source: e,
    })?;
    let log_err = log_out.try_clone().map_err(|e| ServiceError::LogFile {
        path: log_path.clone(),
        source: e,
    })?;

    let clean_root = dunce::simplified(root);
    let (program, args) = executor::prepare(command_line, clean_root)
        .map_err(|_| ServiceError::CommandParse(command_line.to_string()))?;

    let child = StdCommand::new(&program)
        .args(&args)
        .current_dir(clean_root)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log_out))
        .stderr(Stdio::from(log_err))
        .spawn()
        .map_err(|e| ServiceError::SpawnFailed {
            command: command_line.to_string(),
            source: e,
        })?;

    log::debug!(
        "Selenium server launched (pid {}), logging to '{}'.",
        child.id(),
        log_path.display()
    );

    Ok(ServiceHandle { child, log_path })
}

/// Blocks until the readiness marker appears in the service log.
///
/// The marker is matched as a case-insensitive substring. Each failed scan
/// emits a progress dot and sleeps for the configured interval; after the
/// configured attempt budget is exhausted the poll gives up with a typed
/// timeout error instead of waiting forever.
pub fn wait_until_ready(log_path: &Path, service: &ServiceConfig) -> Result<(), ServiceError> {
    let marker = service.ready_marker.to_lowercase();
    let interval = Duration::from_millis(service.poll_interval_ms);

    for attempt in 1..=service.max_attempts {
        if log_contains_marker(log_path, &marker) {
            println!();
            println!("{}", "Selenium server is ready.".green());
            return Ok(());
        }

        log::trace!(
            "Readiness marker not found (attempt {}/{}).",
            attempt,
            service.max_attempts
        );
        print!(".");
        io::stdout().flush().ok();
        thread::sleep(interval);
    }

    println!();
    Err(ServiceError::ReadyTimeout {
        attempts: service.max_attempts,
        seconds: u64::from(service.max_attempts) * service.poll_interval_ms / 1000,
        log: log_path.display().to_string(),
    })
}

/// Terminates the service and removes its log file.
///
/// If the process already exited on its own, a manual-cleanup warning is
/// printed instead of failing; the log file is removed either way. Teardown
/// is best-effort by design and never aborts the run.
pub fn stop(mut handle: ServiceHandle) {
    let pid = handle.child.id();

    match handle.child.try_wait() {
        Ok(Some(status)) => {
            println!(
                "{}",
                format!(
                    "Warning: the selenium server (pid {}) already exited ({}). \
                     If another selenium instance is still running, stop it manually.",
                    pid, status
                )
                .yellow()
            );
        }
        _ => {
            if let Err(e) = handle.child.kill() {
                println!(
                    "{}",
                    format!(
                        "Warning: could not stop the selenium server (pid {}): {}. \
                         Stop it manually.",
                        pid, e
                    )
                    .yellow()
                );
            } else {
                // Reap the killed process so it does not linger as a zombie.
                handle.child.wait().ok();
                log::debug!("Selenium server (pid {}) stopped.", pid);
            }
        }
    }

    if handle.log_path.exists()
        && let Err(e) = fs::remove_file(&handle.log_path)
    {
        log::warn!(
            "Could not remove the selenium log file '{}': {}",
            handle.log_path.display(),
            e
        );
    }
}

fn log_contains_marker(path: &Path, marker_lowercase: &str) -> bool {
    match fs::read_to_string(path) {
        Ok(content) => content.to_lowercase().contains(marker_lowercase),
        // The service may not have created the log yet; treat as "not ready".
        Err(_) => false,
    }
}
