//! Offscreen framebuffer with two color attachments.
//!
//! Texture 0 sits on `COLOR_ATTACHMENT0` and texture 1 on
//! `COLOR_ATTACHMENT1`. The offscreen pass writes only attachment 1 (see
//! [`OFFSCREEN_DRAW_BUFFERS`]) and the screen pass samples only texture 1.
//! Attachment 0 is never read. The only write it sees is the first frame's
//! clear, issued before the mask has ever been set on this framebuffer.

use super::context::GpuContext;
use super::texture::{create_texture, TextureConfig};
use crate::error::ProbeError;
use glam::UVec2;

/// Draw-buffer mask of the offscreen pass: slot 0 off, slot 1 to attachment 1.
pub const OFFSCREEN_DRAW_BUFFERS: [u32; 2] = [glow::NONE, glow::COLOR_ATTACHMENT1];

/// Index of the attachment the offscreen pass renders and the screen pass samples.
pub const SAMPLED_ATTACHMENT: usize = 1;

const ATTACHMENT_POINTS: [u32; 2] = [glow::COLOR_ATTACHMENT0, glow::COLOR_ATTACHMENT1];

/// A framebuffer object and its two RGBA8 color textures.
pub struct OffscreenTarget {
    fbo: glow::Framebuffer,
    textures: [glow::Texture; 2],
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// Creates both textures, attaches them, and verifies completeness.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::GlCreate` if a texture or the framebuffer cannot
    /// be created, or `ProbeError::FramebufferIncomplete` if the driver does
    /// not report `FRAMEBUFFER_COMPLETE`. Everything created so far is
    /// deleted before returning.
    #[allow(unsafe_code)]
    pub fn new(ctx: &GpuContext, width: u32, height: u32) -> Result<Self, ProbeError> {
        use glow::HasContext;

        let gl = ctx.gl();
        let config = TextureConfig::rgba8_nearest(width, height);

        let first = create_texture(ctx, &config)?;
        let second = match create_texture(ctx, &config) {
            Ok(t) => t,
            Err(e) => {
                // SAFETY: first is a valid texture from create_texture.
                unsafe { gl.delete_texture(first) };
                return Err(e);
            }
        };
        let textures = [first, second];

        // SAFETY: glow wraps raw GL calls as unsafe. Texture handles are
        // valid and everything is deleted if the framebuffer is unusable.
        let fbo = match unsafe { gl.create_framebuffer() } {
            Ok(fbo) => fbo,
            Err(reason) => {
                for &texture in &textures {
                    unsafe { gl.delete_texture(texture) };
                }
                return Err(ProbeError::GlCreate {
                    object: "framebuffer",
                    reason,
                });
            }
        };

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            for (&attachment, &texture) in ATTACHMENT_POINTS.iter().zip(&textures) {
                gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    attachment,
                    glow::TEXTURE_2D,
                    Some(texture),
                    0,
                );
            }
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }

        let target = Self {
            fbo,
            textures,
            width,
            height,
        };

        let status = target.status(ctx);
        if status != glow::FRAMEBUFFER_COMPLETE {
            target.destroy(ctx);
            return Err(ProbeError::FramebufferIncomplete { status });
        }

        log::debug!("offscreen target {width}x{height} complete");
        Ok(target)
    }

    /// Queries completeness of this framebuffer. Leaves no framebuffer bound.
    #[allow(unsafe_code)]
    pub fn status(&self, ctx: &GpuContext) -> u32 {
        use glow::HasContext;

        let gl = ctx.gl();
        // SAFETY: self.fbo is a valid framebuffer handle created in new().
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            status
        }
    }

    /// Binds the framebuffer as the draw target.
    #[allow(unsafe_code)]
    pub fn bind_for_drawing(&self, ctx: &GpuContext) {
        use glow::HasContext;

        // SAFETY: self.fbo is a valid framebuffer handle created in new().
        unsafe { ctx.gl().bind_framebuffer(glow::DRAW_FRAMEBUFFER, Some(self.fbo)) };
    }

    /// Selects attachment 1 as the only output slot. The mask is state of the
    /// bound draw framebuffer and persists across frames.
    #[allow(unsafe_code)]
    pub fn select_draw_buffers(&self, ctx: &GpuContext) {
        use glow::HasContext;

        // SAFETY: called with this framebuffer bound for drawing.
        unsafe { ctx.gl().draw_buffers(&OFFSCREEN_DRAW_BUFFERS) };
    }

    /// Reads one RGBA8 pixel of the sampled attachment.
    ///
    /// Binds the framebuffer for reading only for the duration of the call.
    /// Attachment 0 is never read.
    #[allow(unsafe_code)]
    pub fn read_sampled_pixel(&self, ctx: &GpuContext, pixel: UVec2) -> [u8; 4] {
        use glow::HasContext;

        let gl = ctx.gl();
        let mut rgba = [0u8; 4];
        let x = i32::try_from(pixel.x).unwrap_or(i32::MAX);
        let y = i32::try_from(pixel.y).unwrap_or(i32::MAX);

        // SAFETY: self.fbo is valid and rgba holds exactly one RGBA8 pixel.
        unsafe {
            gl.bind_framebuffer(glow::READ_FRAMEBUFFER, Some(self.fbo));
            gl.read_buffer(ATTACHMENT_POINTS[SAMPLED_ATTACHMENT]);
            gl.read_pixels(
                x,
                y,
                1,
                1,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(&mut rgba[..])),
            );
            gl.bind_framebuffer(glow::READ_FRAMEBUFFER, None);
        }
        rgba
    }

    /// The texture the screen pass samples.
    pub fn sampled_texture(&self) -> glow::Texture {
        self.textures[SAMPLED_ATTACHMENT]
    }

    /// Returns the width of both attachments in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of both attachments in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Deletes the framebuffer and both textures.
    #[allow(unsafe_code)]
    pub fn destroy(&self, ctx: &GpuContext) {
        use glow::HasContext;

        let gl = ctx.gl();
        // SAFETY: handles are valid and owned by this target.
        unsafe {
            gl.delete_framebuffer(self.fbo);
            for &texture in &self.textures {
                gl.delete_texture(texture);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::headless_context;

    // OffscreenTarget requires a live GL context, so GL tests are ignored.

    #[test]
    fn draw_mask_disables_slot_zero_and_routes_slot_one() {
        assert_eq!(OFFSCREEN_DRAW_BUFFERS[0], glow::NONE);
        assert_eq!(OFFSCREEN_DRAW_BUFFERS[1], glow::COLOR_ATTACHMENT1);
    }

    #[test]
    fn sampled_attachment_is_the_one_the_mask_writes() {
        assert_eq!(
            OFFSCREEN_DRAW_BUFFERS[SAMPLED_ATTACHMENT],
            ATTACHMENT_POINTS[SAMPLED_ATTACHMENT]
        );
        assert_ne!(OFFSCREEN_DRAW_BUFFERS[0], ATTACHMENT_POINTS[0]);
    }

    #[test]
    fn offscreen_target_struct_has_expected_fields() {
        fn _assert_fields(t: &OffscreenTarget) {
            let _fbo = t.fbo;
            let _tex: [glow::Texture; 2] = t.textures;
            let _w = t.width;
            let _h = t.height;
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_target_reports_complete() {
        let gl = headless_context();
        let target = OffscreenTarget::new(&gl.ctx, 800, 600).expect("target");
        assert_eq!(target.status(&gl.ctx), glow::FRAMEBUFFER_COMPLETE);
        target.destroy(&gl.ctx);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn attachments_are_distinct_textures() {
        let gl = headless_context();
        let target = OffscreenTarget::new(&gl.ctx, 64, 32).expect("target");
        assert_ne!(target.textures[0], target.textures[1]);
        assert_eq!(target.sampled_texture(), target.textures[SAMPLED_ATTACHMENT]);
        assert_eq!((target.width(), target.height()), (64, 32));
        target.destroy(&gl.ctx);
    }
}
