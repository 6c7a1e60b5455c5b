//! The two-pass pipeline: offscreen quad into attachment 1, then attachment 1
//! sampled onto the window.

use super::context::GpuContext;
use super::quad::QuadMesh;
use super::shader::build_program;
use super::target::OffscreenTarget;
use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::summary::AttachmentProbe;
use glam::UVec2;

/// One GL call group of the offscreen pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffscreenStep {
    BindTarget,
    Clear,
    UseProgram,
    SelectDrawBuffers,
    Draw,
}

/// Order of the offscreen pass. The clear precedes the draw-buffer mask, so
/// on the first frame it lands on attachment 0 and from the second frame on
/// attachment 1 (see [`cleared_attachment`](crate::summary::cleared_attachment)).
pub const OFFSCREEN_PASS: [OffscreenStep; 5] = [
    OffscreenStep::BindTarget,
    OffscreenStep::Clear,
    OffscreenStep::UseProgram,
    OffscreenStep::SelectDrawBuffers,
    OffscreenStep::Draw,
];

/// Every GPU object the passes use.
pub struct Pipeline {
    offscreen_program: glow::Program,
    screen_program: glow::Program,
    quad: QuadMesh,
    target: OffscreenTarget,
}

impl Pipeline {
    /// Applies fixed state, builds both programs, uploads the quad and
    /// creates the offscreen target, in that order.
    ///
    /// # Errors
    ///
    /// Propagates the first failure. Objects created before the failure are
    /// deleted.
    #[allow(unsafe_code)]
    pub fn new(ctx: &GpuContext, config: &ProbeConfig) -> Result<Self, ProbeError> {
        use glow::HasContext;

        let gl = ctx.gl();
        let (width, height) = config.gl_size();

        ctx.apply_fixed_state(config.clear_color);
        // SAFETY: viewport with validated, positive dimensions.
        unsafe { gl.viewport(0, 0, width, height) };

        let offscreen_program = build_program(ctx, &config.shaders.offscreen)?;
        log::debug!("offscreen program linked");

        let screen_program = match build_program(ctx, &config.shaders.screen) {
            Ok(p) => p,
            Err(e) => {
                // SAFETY: offscreen_program is a valid linked program.
                unsafe { gl.delete_program(offscreen_program) };
                return Err(e.into());
            }
        };
        log::debug!("screen program linked");

        let delete_programs = || {
            // SAFETY: both programs are valid linked programs.
            unsafe {
                gl.delete_program(offscreen_program);
                gl.delete_program(screen_program);
            }
        };

        let quad = QuadMesh::new(ctx).inspect_err(|_| delete_programs())?;
        log::debug!("quad uploaded");

        let target = OffscreenTarget::new(ctx, config.width, config.height).inspect_err(|_| {
            quad.destroy(ctx);
            delete_programs();
        })?;

        Ok(Self {
            offscreen_program,
            screen_program,
            quad,
            target,
        })
    }

    /// Pass A: clear the offscreen target and draw the half-size quad into
    /// attachment 1 only. Issues [`OFFSCREEN_PASS`] in order.
    #[allow(unsafe_code)]
    pub fn render_offscreen_pass(&self, ctx: &GpuContext) {
        use glow::HasContext;

        let gl = ctx.gl();
        for step in OFFSCREEN_PASS {
            match step {
                OffscreenStep::BindTarget => self.target.bind_for_drawing(ctx),
                // SAFETY: the offscreen framebuffer is bound.
                OffscreenStep::Clear => unsafe { gl.clear(glow::COLOR_BUFFER_BIT) },
                // SAFETY: offscreen_program is a valid linked program.
                OffscreenStep::UseProgram => unsafe {
                    gl.use_program(Some(self.offscreen_program))
                },
                OffscreenStep::SelectDrawBuffers => self.target.select_draw_buffers(ctx),
                OffscreenStep::Draw => self.quad.draw(ctx),
            }
        }
    }

    /// Pass B: draw the full quad onto the window, sampling attachment 1
    /// through texture unit 0.
    #[allow(unsafe_code)]
    pub fn render_screen_pass(&self, ctx: &GpuContext) {
        use glow::HasContext;

        let gl = ctx.gl();
        // SAFETY: default framebuffer, valid program and texture handles.
        unsafe {
            gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, None);
            gl.use_program(Some(self.screen_program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.target.sampled_texture()));
        }
        self.quad.draw(ctx);
        // SAFETY: unbinding is always valid.
        unsafe { gl.bind_texture(glow::TEXTURE_2D, None) };
    }

    /// One frame's worth of GPU work, without presentation.
    pub fn render_frame(&self, ctx: &GpuContext) {
        self.render_offscreen_pass(ctx);
        self.render_screen_pass(ctx);
    }

    /// Reads the centre and corner pixels of attachment 1.
    pub fn probe_attachment(&self, ctx: &GpuContext) -> AttachmentProbe {
        let (width, height) = (self.target.width(), self.target.height());
        let [centre, corner] = AttachmentProbe::sample_points(width, height);
        AttachmentProbe {
            size: UVec2::new(width, height).to_array(),
            centre: self.target.read_sampled_pixel(ctx, centre),
            corner: self.target.read_sampled_pixel(ctx, corner),
        }
    }

    /// Deletes both programs, the quad and the offscreen target.
    #[allow(unsafe_code)]
    pub fn destroy(self, ctx: &GpuContext) {
        use glow::HasContext;

        let gl = ctx.gl();
        // SAFETY: handles are valid and owned by this pipeline.
        unsafe {
            gl.use_program(None);
            gl.delete_program(self.offscreen_program);
            gl.delete_program(self.screen_program);
        }
        self.quad.destroy(ctx);
        self.target.destroy(ctx);
        log::debug!("pipeline objects deleted");
    }
}
