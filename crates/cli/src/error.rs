//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  clean shutdown
//! - 1:  window or GL context creation failed
//! - 2:  GL loader, program link, null handle or other GPU failure
//!       (also clap arg parse errors, before our code runs)
//! - 3:  windowing system failed to initialize
//! - 4:  invariant violation (incomplete framebuffer, GL errors after setup)
//! - 5:  shader compilation failed
//! - 6:  attachment probe found unexpected pixels
//! - 64: invalid configuration

use mrt_probe_core::{ProbeError, ShaderError};
use std::fmt;

/// Errors produced by the harness, each mapped to a distinct exit code.
pub enum CliError {
    /// The event loop (windowing system) could not be created.
    WindowSystem(String),
    /// No window, GL config, context or surface could be created.
    WindowCreation(String),
    /// GL entry points could not be resolved for the requested version.
    Loader(String),
    /// A shader program failed to build.
    Program(ShaderError),
    /// A GL object or presentation call failed.
    Gpu(String),
    /// A setup invariant did not hold.
    Invariant(String),
    /// `--probe` read pixels that pass A cannot have produced.
    ProbeMismatch(String),
    /// Bad command-line or config-file values.
    Config(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::WindowCreation(_) => 1,
            CliError::Loader(_) | CliError::Gpu(_) => 2,
            CliError::Program(ShaderError::CompileError { .. }) => 5,
            CliError::Program(_) => 2,
            CliError::WindowSystem(_) => 3,
            CliError::Invariant(_) => 4,
            CliError::ProbeMismatch(_) => 6,
            CliError::Config(_) => 64,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::WindowSystem(msg) => write!(f, "windowing system init failed: {msg}"),
            CliError::WindowCreation(msg) => write!(f, "window is null: {msg}"),
            CliError::Loader(msg) => write!(f, "{msg}"),
            CliError::Program(e) => write!(f, "{e}"),
            CliError::Gpu(msg) => write!(f, "{msg}"),
            CliError::Invariant(msg) => write!(f, "invariant violated: {msg}"),
            CliError::ProbeMismatch(msg) => write!(f, "attachment probe mismatch: {msg}"),
            CliError::Config(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CliError({}): {self}", self.exit_code())
    }
}

impl From<ProbeError> for CliError {
    fn from(e: ProbeError) -> Self {
        match e {
            ProbeError::InvalidConfig(_) => CliError::Config(e.to_string()),
            ProbeError::Loader(_) => CliError::Loader(e.to_string()),
            ProbeError::Shader(inner) => CliError::Program(inner),
            e if e.is_invariant_violation() => CliError::Invariant(e.to_string()),
            e => CliError::Gpu(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(format!("JSON: {e}"))
    }
}
