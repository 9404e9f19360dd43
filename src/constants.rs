// src/constants.rs

/// The directory holding the provisioned virtual environment, relative to the project root.
pub const ENV_DIR: &str = "env";

/// The file recording which environment generation is currently installed (project root).
pub const STAMP_FILENAME: &str = ".preflight-env-version";

/// The environment generation this build of preflight provisions.
/// Bump this whenever the buildout configuration changes in a way that
/// requires a rebuild of everyone's environment.
pub const CURRENT_ENV_VERSION: u64 = 14;

/// The name of the optional per-project configuration file (project root).
pub const PROJECT_CONFIG_FILENAME: &str = "preflight.toml";

/// Env var pointing pip at the shared download cache during provisioning.
pub const DOWNLOAD_CACHE_ENV: &str = "PIP_DOWNLOAD_CACHE";

/// Env var enabling package-index mirrors during provisioning.
pub const USE_MIRRORS_ENV: &str = "PIP_USE_MIRRORS";

/// Env var selecting the settings module for the host-application suite.
pub const SETTINGS_MODULE_ENV: &str = "DJANGO_SETTINGS_MODULE";

/// Local settings file swapped out of the way around the host-application suite.
pub const LOCAL_SETTINGS_FILENAME: &str = "local_settings.py";

/// Pylint encodes message categories in bits of its exit code; codes below
/// this threshold mean "messages were emitted", not "pylint itself failed".
pub const LINT_FAILURE_THRESHOLD: i32 = 32;
