// src/cli/args.rs

/// Whether the virtual environment should be used at all, and whether the
/// operator is asked before (re)building it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VenvMode {
    /// Use the environment; provision without asking when it is stale.
    Always,
    /// Never touch the environment, not even to check its version.
    Never,
    /// Use the environment, but ask before provisioning (yes-leaning default).
    #[default]
    Ask,
}

/// Whether the selenium server is started around the full test action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeleniumMode {
    /// Explicitly requested.
    Run,
    /// Explicitly skipped via `--skip-selenium`.
    Skip,
    /// Initial state; resolves to `Run` at dispatch time.
    #[default]
    Auto,
}

impl SeleniumMode {
    /// Whether the server should actually be started for this run.
    pub fn should_run(self) -> bool {
        !matches!(self, Self::Skip)
    }
}

/// The immutable configuration for one invocation, built once from the raw
/// argument list and passed explicitly into every component.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub venv: VenvMode,
    pub selenium: SeleniumMode,
    pub force: bool,
    pub quiet: bool,
    pub coverage: bool,
    pub docs_only: bool,
    pub pep8_only: bool,
    pub lint_only: bool,
    pub run_server: bool,
    pub help: bool,
    /// Tokens not recognized as orchestration flags, forwarded unchanged (and
    /// in order) to the underlying test runner.
    pub passthrough: Vec<String>,
}

impl Config {
    /// Scans the raw argument sequence (without the binary name).
    ///
    /// Unknown flags are deliberately not rejected: the underlying test runner
    /// accepts its own options, so anything we do not recognize falls through
    /// to `passthrough` verbatim.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();

        for token in args {
            match token.as_str() {
                "--virtual-env" | "-V" => config.venv = VenvMode::Always,
                "--no-virtual-env" | "-N" => config.venv = VenvMode::Never,
                "--coverage" | "-c" => config.coverage = true,
                "--force" | "-f" => config.force = true,
                "--pep8" | "-p" => config.pep8_only = true,
                "--pylint" | "-y" => config.lint_only = true,
                "--quiet" | "-q" => config.quiet = true,
                "--skip-selenium" => config.selenium = SeleniumMode::Skip,
                "--runserver" => config.run_server = true,
                "--docs" => config.docs_only = true,
                "--help" | "-h" => config.help = true,
                _ => config.passthrough.push(token),
            }
        }

        config
    }
}

/// Usage text printed for `--help`/`-h`, before any environment or dispatch
/// logic runs.
pub const USAGE: &str = "\
preflight - provision the development environment and run the test suite

Usage: preflight [OPTIONS] [TEST RUNNER ARGS]...

Options:
  -V, --virtual-env      Use the virtual environment; provision without asking
  -N, --no-virtual-env   Never touch the virtual environment
  -c, --coverage         Collect and report test coverage
  -f, --force            Delete the existing environment before checking it
  -p, --pep8             Only run the style checker
  -y, --pylint           Only run the linter
  -q, --quiet            Never prompt; assume yes everywhere
      --skip-selenium    Do not start the selenium server around the tests
      --runserver        Start the development server instead of testing
      --docs             Only build the documentation
  -h, --help             Show this help text and exit

Any other argument is forwarded unchanged to the test runner.
";
