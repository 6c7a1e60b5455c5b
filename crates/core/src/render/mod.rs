//! OpenGL rendering infrastructure.
//!
//! This module is only available when the `render` feature is enabled.
//! Every function takes the [`GpuContext`] it issues calls against.
//!
//! # Module overview
//!
//! - [`context`] -- GL context wrapper with version check and fixed state.
//! - [`shader`] -- Shader compilation and program linking.
//! - [`texture`] -- Texture configuration and creation helpers.
//! - [`target`] -- Offscreen framebuffer with two color attachments.
//! - [`quad`] -- Vertex array and buffer for the shared quad.
//! - [`pipeline`] -- The offscreen pass and the screen pass.
//! - [`gl_error`] -- GL error queue draining and descriptions.

pub mod context;
pub mod gl_error;
pub mod pipeline;
pub mod quad;
pub mod shader;
pub mod target;
pub mod texture;

#[cfg(test)]
mod test_support;

// Re-export key types at the render module level for convenience.
pub use context::GpuContext;
pub use gl_error::{drain_gl_errors, ensure_no_gl_errors, gl_error_description, GlError};
pub use pipeline::{OffscreenStep, Pipeline, OFFSCREEN_PASS};
pub use quad::QuadMesh;
pub use shader::{build_program, compile_shader, link_program};
pub use target::{OffscreenTarget, OFFSCREEN_DRAW_BUFFERS};
pub use texture::{create_texture, TextureConfig};
