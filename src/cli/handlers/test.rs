// src/cli/handlers/test.rs

use anyhow::Result;
use colored::*;
use scopeguard::ScopeGuard;
use std::collections::HashMap;
use std::path::Path;

use crate::{
    cli::args::Config,
    constants::SETTINGS_MODULE_ENV,
    core::{config_file::ProjectConfig, sanity, settings},
    system::{
        executor,
        service::{self, ServiceHandle},
    },
};

/// RAII guard that stops the selenium server when it goes out of scope.
type SeleniumGuard = ScopeGuard<ServiceHandle, fn(ServiceHandle)>;

/// The full test action: sanity check, optional selenium server, the two
/// independent suites, optional coverage reporting, combined exit status.
pub fn handle(config: &Config, project: &ProjectConfig, root: &Path) -> Result<i32> {
    // Defensive re-check; provisioning already ran this, but the environment
    // may have been mangled since.
    sanity::check_artifacts(project, root)?;

    let selenium: Option<SeleniumGuard> = if config.selenium.should_run() {
        let handle = service::start(&project.tools.selenium, &project.service, root)?;
        println!(
            "{}",
            format!("Waiting for the selenium server (pid {})...", handle.pid()).cyan()
        );
        // The handle lives inside a guard from the moment the server is
        // spawned: whatever error path unwinds out of this function, the
        // server is killed and its log file removed.
        let guard = scopeguard::guard(handle, service::stop as fn(ServiceHandle));
        service::wait_until_ready(guard.log_path(), &project.service)?;
        Some(guard)
    } else {
        println!("{}", "Skipping the selenium server.".yellow());
        None
    };

    // Suite statuses are captured independently and only combined at the very
    // end, so a red component suite never hides application failures.
    println!("{}", "Running the component-library suite...".cyan());
    let components_status = run_suite(
        &project.suites.components,
        config,
        project,
        root,
        &HashMap::new(),
    )?;

    println!("{}", "Running the host-application suite...".cyan());
    let application_status = {
        // Swapped out so the suite runs against the checked-in settings; the
        // guard restores the developer's file even if the suite errors.
        let _settings_guard = settings::swap_out(root)?;

        let mut env_vars = HashMap::new();
        env_vars.insert(
            SETTINGS_MODULE_ENV.to_string(),
            project.settings_module.clone(),
        );
        run_suite(&project.suites.application, config, project, root, &env_vars)?
    };

    // Stop the server before coverage reporting, matching the teardown order
    // of the rest of the action.
    drop(selenium);

    if config.coverage {
        report_coverage(project, root);
    }

    report_suite(components_status, "component-library");
    report_suite(application_status, "host-application");

    Ok(combine_suite_status(components_status, application_status))
}

/// Runs one suite, optionally through the coverage tool, forwarding the
/// passthrough arguments to the underlying test runner.
fn run_suite(
    suite_command_line: &str,
    config: &Config,
    project: &ProjectConfig,
    root: &Path,
    env_vars: &HashMap<String, String>,
) -> Result<i32> {
    let command = suite_command(suite_command_line, config.coverage, &project.tools.coverage);
    let status = executor::run_status(&command, &config.passthrough, root, env_vars)?;
    Ok(status)
}

/// Wraps a suite command in `<coverage> run ...` when coverage is requested.
fn suite_command(suite_command_line: &str, coverage: bool, coverage_tool: &str) -> String {
    if coverage {
        format!("{} run {}", coverage_tool, suite_command_line)
    } else {
        suite_command_line.to_string()
    }
}

/// Combines and renders coverage data. Report generation is best-effort: a
/// failing report must not override the suite results.
fn report_coverage(project: &ProjectConfig, root: &Path) {
    println!("{}", "Generating the combined coverage report...".cyan());
    for subcommand in ["combine", "html"] {
        let command = format!("{} {}", project.tools.coverage, subcommand);
        match executor::run_status(&command, &[], root, &HashMap::new()) {
            Ok(0) => {}
            Ok(code) => log::warn!("'{}' exited with code {}.", command, code),
            Err(e) => log::warn!("'{}' could not be run: {}", command, e),
        }
    }
}

fn report_suite(status: i32, name: &str) {
    if status == 0 {
        println!("{}", format!("{} suite passed.", name).green());
    } else {
        println!(
            "{}",
            format!("{} suite failed (exit code {}).", name, status).red()
        );
    }
}

/// The run fails iff either suite failed. The original shell wrapper OR-ed
/// the two statuses into 0/1 semantics; that contract is preserved here.
pub fn combine_suite_status(components: i32, application: i32) -> i32 {
    if components != 0 || application != 0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_status_is_nonzero_when_either_suite_fails() {
        assert_eq!(combine_suite_status(1, 0), 1);
        assert_eq!(combine_suite_status(0, 2), 1);
        assert_eq!(combine_suite_status(3, 4), 1);
    }

    #[test]
    fn test_combined_status_is_zero_only_when_both_pass() {
        assert_eq!(combine_suite_status(0, 0), 0);
    }

    #[test]
    fn test_suite_command_is_untouched_without_coverage() {
        assert_eq!(suite_command("bin/test", false, "bin/coverage"), "bin/test");
    }

    #[test]
    fn test_suite_command_is_wrapped_with_coverage() {
        assert_eq!(
            suite_command("bin/test", true, "bin/coverage"),
            "bin/coverage run bin/test"
        );
    }

    #[cfg(unix)]
    mod end_to_end {
        use super::*;
        use crate::cli::args::SeleniumMode;
        use std::fs;
        use tempfile::TempDir;

        /// A project root whose expected artifacts exist and whose suites are
        /// tiny shell stand-ins with controllable exit codes.
        fn fake_project(components_exit: i32, application_exit: i32) -> (TempDir, ProjectConfig) {
            let dir = TempDir::new().unwrap();
            fs::create_dir_all(dir.path().join("bin")).unwrap();
            for name in ["test", "coverage", "selenium"] {
                fs::write(dir.path().join("bin").join(name), "#!/bin/sh\n").unwrap();
            }

            let mut project = ProjectConfig::default();
            project.suites.components = format!("sh -c 'exit {}'", components_exit);
            project.suites.application = format!("sh -c 'exit {}'", application_exit);
            (dir, project)
        }

        fn no_selenium_config() -> Config {
            Config {
                selenium: SeleniumMode::Skip,
                quiet: true,
                ..Config::default()
            }
        }

        #[test]
        fn test_failing_component_suite_fails_the_run() {
            let (dir, project) = fake_project(1, 0);
            let code = handle(&no_selenium_config(), &project, dir.path()).unwrap();
            assert_eq!(code, 1);
        }

        #[test]
        fn test_both_suites_passing_means_success() {
            let (dir, project) = fake_project(0, 0);
            let code = handle(&no_selenium_config(), &project, dir.path()).unwrap();
            assert_eq!(code, 0);
        }

        #[test]
        fn test_local_settings_are_restored_after_the_run() {
            // --- Setup ---
            let (dir, project) = fake_project(0, 1);
            let local_settings = dir.path().join("local_settings.py");
            fs::write(&local_settings, "DEBUG = True\n").unwrap();

            // --- Execute ---
            let code = handle(&no_selenium_config(), &project, dir.path()).unwrap();

            // --- Assert ---
            assert_eq!(code, 1);
            assert!(local_settings.exists());
        }

        #[test]
        fn test_selenium_is_stopped_when_a_suite_fails_to_spawn() {
            // --- Setup: a selenium stand-in that announces readiness and
            // then lingers, plus a component suite whose program does not
            // exist anywhere, so running it errors instead of exiting. ---
            let (dir, mut project) = fake_project(0, 0);
            project.tools.selenium =
                "sh -c 'echo service ready; exec sleep 300'".to_string();
            project.service.ready_marker = "service ready".to_string();
            project.service.poll_interval_ms = 10;
            project.service.max_attempts = 50;
            project.suites.components = "preflight-no-such-runner".to_string();

            let config = Config {
                quiet: true,
                ..Config::default()
            };

            // --- Execute: the spawn failure propagates as an error ---
            let result = handle(&config, &project, dir.path());
            assert!(result.is_err());

            // --- Assert: the server was torn down on the way out; stop()
            // removes the log file only after dealing with the child. ---
            let log = dir.path().join(&project.service.log_file);
            assert!(!log.exists());
        }

        #[test]
        fn test_missing_artifact_aborts_before_any_suite_runs() {
            let (dir, project) = fake_project(0, 0);
            fs::remove_file(dir.path().join("bin/selenium")).unwrap();

            let result = handle(&no_selenium_config(), &project, dir.path());
            assert!(result.is_err());
        }
    }
}
