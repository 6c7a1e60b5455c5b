//! Error types for the mrt-probe core.

use crate::shaders::ShaderStage;
use thiserror::Error;

/// Errors that can occur while building a shader program.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// The driver returned no shader object for a stage.
    #[error("{stage} shader is 0: {reason}")]
    NullShader {
        /// The stage whose shader object could not be created.
        stage: ShaderStage,
        /// Driver-side reason, if any.
        reason: String,
    },
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError {
        /// The shader stage that failed.
        stage: ShaderStage,
        /// Line-numbered source followed by the driver's info log.
        log: String,
    },
    /// The driver returned no program object.
    #[error("program is 0: {0}")]
    NullProgram(String),
    /// A program failed to link.
    #[error("shader link error:\n{0}")]
    LinkError(String),
}

/// Errors produced by configuration and pipeline setup.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A configuration value was rejected by validation or failed to parse.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// GL entry points could not be resolved or the context is too old.
    #[error("GL loader failed: {0}")]
    Loader(String),

    /// A program could not be built.
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// The driver refused to create a GL object.
    #[error("failed to create {object}: {reason}")]
    GlCreate {
        object: &'static str,
        reason: String,
    },

    /// The offscreen framebuffer did not report `FRAMEBUFFER_COMPLETE`.
    #[error("framebuffer incomplete: status 0x{status:04X}")]
    FramebufferIncomplete { status: u32 },

    /// The GL error queue was not empty after setup.
    #[error("GL errors pending after setup:\n{0}")]
    PendingGlErrors(String),
}

impl ProbeError {
    /// Returns true for failures that indicate a broken invariant rather
    /// than a missing capability of the environment.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            ProbeError::FramebufferIncomplete { .. } | ProbeError::PendingGlErrors(_)
        )
    }
}
