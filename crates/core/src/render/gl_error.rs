//! Draining and describing the GL error queue.
//!
//! The queue is checked once, after setup. It is not polled inside the
//! frame loop.

use super::context::GpuContext;
use crate::error::ProbeError;
use std::fmt;

/// Upper bound on errors popped in one drain. A lost context may report
/// `CONTEXT_LOST` forever.
const MAX_DRAINED_ERRORS: usize = 32;

/// One code popped from the GL error queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlError {
    pub code: u32,
}

impl GlError {
    /// English description of the error code.
    pub fn description(&self) -> &'static str {
        gl_error_description(self.code)
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OpenGL error: {}", self.code)?;
        write!(f, "Error string: {}", self.description())
    }
}

/// Describes a `glGetError` code.
pub fn gl_error_description(code: u32) -> &'static str {
    match code {
        glow::NO_ERROR => "No error has been recorded. THIS message is the error itself.",
        glow::INVALID_ENUM => "An unacceptable value is specified for an enumerated argument.",
        glow::INVALID_VALUE => "A numeric argument is out of range.",
        glow::INVALID_OPERATION => "The specified operation is not allowed in the current state.",
        glow::INVALID_FRAMEBUFFER_OPERATION => "The framebuffer object is not complete.",
        glow::OUT_OF_MEMORY => "There is not enough memory left to execute the command.",
        glow::STACK_UNDERFLOW => {
            "An attempt has been made to perform an operation that would cause an internal stack to underflow."
        }
        glow::STACK_OVERFLOW => {
            "An attempt has been made to perform an operation that would cause an internal stack to overflow."
        }
        _ => "No description available.",
    }
}

/// Pops every pending error, oldest first.
#[allow(unsafe_code)]
pub fn drain_gl_errors(ctx: &GpuContext) -> Vec<GlError> {
    use glow::HasContext;

    let mut errors = Vec::new();
    while errors.len() < MAX_DRAINED_ERRORS {
        // SAFETY: glGetError has no preconditions beyond a current context.
        let code = unsafe { ctx.gl().get_error() };
        if code == glow::NO_ERROR {
            break;
        }
        errors.push(GlError { code });
    }
    errors
}

/// Joins drained errors into one report, one error per paragraph.
pub fn format_gl_errors(errors: &[GlError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fails if any GL error is pending.
///
/// # Errors
///
/// Returns `ProbeError::PendingGlErrors` with every drained error described.
pub fn ensure_no_gl_errors(ctx: &GpuContext) -> Result<(), ProbeError> {
    let errors = drain_gl_errors(ctx);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ProbeError::PendingGlErrors(format_gl_errors(&errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::headless_context;

    #[test]
    fn known_codes_have_descriptions() {
        for code in [
            glow::INVALID_ENUM,
            glow::INVALID_VALUE,
            glow::INVALID_OPERATION,
            glow::INVALID_FRAMEBUFFER_OPERATION,
            glow::OUT_OF_MEMORY,
            glow::STACK_UNDERFLOW,
            glow::STACK_OVERFLOW,
        ] {
            assert_ne!(
                gl_error_description(code),
                "No description available.",
                "code 0x{code:04X} should be described"
            );
        }
    }

    #[test]
    fn no_error_says_so() {
        assert!(gl_error_description(glow::NO_ERROR).starts_with("No error has been recorded"));
    }

    #[test]
    fn unknown_code_falls_back() {
        assert_eq!(gl_error_description(0xDEAD), "No description available.");
    }

    #[test]
    fn display_shows_code_and_description() {
        let err = GlError {
            code: glow::INVALID_OPERATION,
        };
        let text = err.to_string();
        assert!(text.starts_with("OpenGL error: 1282\n"), "got: {text}");
        assert!(text.ends_with("not allowed in the current state."), "got: {text}");
    }

    #[test]
    fn report_lists_every_error_in_order() {
        let report = format_gl_errors(&[
            GlError {
                code: glow::INVALID_ENUM,
            },
            GlError {
                code: glow::OUT_OF_MEMORY,
            },
        ]);
        let enum_at = report.find("1280").unwrap();
        let oom_at = report.find("1285").unwrap();
        assert!(enum_at < oom_at, "got: {report}");
    }

    #[test]
    #[ignore = "requires GL context"]
    #[allow(unsafe_code)]
    fn drain_empties_the_queue() {
        use glow::HasContext;

        let gl = headless_context();
        drain_gl_errors(&gl.ctx);
        unsafe { gl.ctx.gl().enable(0xDEAD) };

        let drained = drain_gl_errors(&gl.ctx);
        assert_eq!(drained, vec![GlError { code: glow::INVALID_ENUM }]);
        assert!(drain_gl_errors(&gl.ctx).is_empty());
        assert!(ensure_no_gl_errors(&gl.ctx).is_ok());
    }
}
