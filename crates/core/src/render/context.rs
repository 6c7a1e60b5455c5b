//! GPU context wrapper threaded through every GL operation.
//!
//! `GpuContext` wraps a loaded `glow::Context`, checks that the driver
//! delivered at least the requested core version, and applies the fixed
//! state both passes rely on (no depth test, no depth writes, clear color).

use crate::config::GlVersion;
use crate::error::ProbeError;

/// Wraps a `glow::Context` with the version the driver reported.
///
/// Created once after the context is made current. Every render function
/// takes `&GpuContext`, so the dependency on the current context is visible
/// in each signature.
pub struct GpuContext {
    gl: glow::Context,
    version_string: String,
}

impl GpuContext {
    /// Wraps `gl` after checking the reported version against `required`.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Loader` if the context is an ES context or older
    /// than `required`, which means entry-point resolution did not give us
    /// the API the shaders are written for.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context, required: GlVersion) -> Result<Self, ProbeError> {
        use glow::HasContext;

        let reported = gl.version();
        // SAFETY: VERSION is a valid string query on any current context.
        let version_string = unsafe { gl.get_parameter_string(glow::VERSION) };

        if reported.is_embedded {
            return Err(ProbeError::Loader(format!(
                "got an OpenGL ES context ({version_string}), need desktop {required} core"
            )));
        }

        let version = GlVersion {
            major: u8::try_from(reported.major).unwrap_or(u8::MAX),
            minor: u8::try_from(reported.minor).unwrap_or(u8::MAX),
        };
        if !version.at_least(required) {
            return Err(ProbeError::Loader(format!(
                "context reports GL {version} ({version_string}), need {required}"
            )));
        }

        log::info!("GL context: {version_string}");

        Ok(Self { gl, version_string })
    }

    /// Disables depth testing and depth writes and sets the clear color.
    #[allow(unsafe_code)]
    pub fn apply_fixed_state(&self, clear_color: [f32; 4]) {
        use glow::HasContext;

        let [r, g, b, a] = clear_color;
        // SAFETY: plain state setters with valid enums.
        unsafe {
            self.gl.depth_mask(false);
            self.gl.disable(glow::DEPTH_TEST);
            self.gl.clear_color(r, g, b, a);
        }
    }

    /// Returns a reference to the underlying `glow::Context`.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// The driver's full `GL_VERSION` string.
    pub fn version_string(&self) -> &str {
        &self.version_string
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glow::HasContext;
    use crate::render::test_support::headless_glow;

    // GpuContext requires a live GL context, so integration tests are ignored.

    #[test]
    fn gpu_context_struct_compiles_with_expected_api() {
        fn _assert_api(ctx: &GpuContext) {
            let _gl: &glow::Context = ctx.gl();
            let _s: &str = ctx.version_string();
            ctx.apply_fixed_state([0.0, 0.0, 0.0, 1.0]);
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_accepts_a_3_3_core_context() {
        let (gl, _context) = headless_glow();
        let ctx = GpuContext::new(gl, GlVersion::MINIMUM).expect("3.3 core");
        assert!(ctx.gl().version().major >= 3);
        assert!(!ctx.version_string().is_empty());
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_rejects_a_context_older_than_required() {
        let (gl, _context) = headless_glow();
        let required = GlVersion { major: 9, minor: 9 };
        match GpuContext::new(gl, required) {
            Err(ProbeError::Loader(msg)) => assert!(msg.contains("need 9.9"), "got: {msg}"),
            Err(e) => panic!("expected a loader error, got {e}"),
            Ok(_) => panic!("a 9.9 context should not exist"),
        }
    }
}
