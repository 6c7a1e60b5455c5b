//! Vertex array and buffer holding the shared fullscreen quad.

use super::context::GpuContext;
use crate::error::ProbeError;
use crate::geometry::{FULLSCREEN_QUAD, QUAD_COMPONENTS, QUAD_VERTEX_COUNT};

/// The uploaded quad. Attribute 0 is a tightly packed, non-normalized vec2.
pub struct QuadMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

impl QuadMesh {
    /// Uploads [`FULLSCREEN_QUAD`] once with `STATIC_DRAW` and leaves the
    /// vertex array bound; both passes draw from it.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::GlCreate` if the vertex array or buffer cannot be
    /// created.
    #[allow(unsafe_code)]
    pub fn new(ctx: &GpuContext) -> Result<Self, ProbeError> {
        use glow::HasContext;

        let gl = ctx.gl();

        // SAFETY: glow wraps raw GL calls as unsafe. The upload reads exactly
        // the bytes of FULLSCREEN_QUAD and attribute 0 matches its layout.
        let vao = unsafe {
            gl.create_vertex_array()
                .map_err(|reason| ProbeError::GlCreate {
                    object: "vertex array",
                    reason,
                })?
        };
        let vbo = match unsafe { gl.create_buffer() } {
            Ok(vbo) => vbo,
            Err(reason) => {
                unsafe { gl.delete_vertex_array(vao) };
                return Err(ProbeError::GlCreate {
                    object: "vertex buffer",
                    reason,
                });
            }
        };

        unsafe {
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&FULLSCREEN_QUAD),
                glow::STATIC_DRAW,
            );
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, QUAD_COMPONENTS, glow::FLOAT, false, 0, 0);
        }

        Ok(Self { vao, vbo })
    }

    /// Binds the vertex array and issues the six vertices as triangles.
    #[allow(unsafe_code)]
    pub fn draw(&self, ctx: &GpuContext) {
        use glow::HasContext;

        // SAFETY: self.vao is valid and describes QUAD_VERTEX_COUNT vertices.
        unsafe {
            ctx.gl().bind_vertex_array(Some(self.vao));
            ctx.gl().draw_arrays(glow::TRIANGLES, 0, QUAD_VERTEX_COUNT);
        }
    }

    /// Deletes the buffer and the vertex array.
    #[allow(unsafe_code)]
    pub fn destroy(&self, ctx: &GpuContext) {
        use glow::HasContext;

        // SAFETY: handles are valid and owned by this mesh.
        unsafe {
            ctx.gl().bind_vertex_array(None);
            ctx.gl().delete_buffer(self.vbo);
            ctx.gl().delete_vertex_array(self.vao);
        }
    }
}
