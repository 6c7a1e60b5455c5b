//! Texture creation for the offscreen attachments.
//!
//! Both attachments are RGBA8 with NEAREST filtering, allocated without
//! initial data. No mipmap levels are created.

use super::context::GpuContext;
use crate::error::ProbeError;

/// Configuration for creating a GPU texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureConfig {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// GL internal format (e.g. `glow::RGBA8`).
    pub internal_format: u32,
    /// GL filter used for both minification and magnification.
    pub filter: u32,
}

impl TextureConfig {
    /// An RGBA8 color attachment with NEAREST filtering.
    pub fn rgba8_nearest(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            internal_format: glow::RGBA8,
            filter: glow::NEAREST,
        }
    }
}

/// Creates a GPU texture from the given configuration.
///
/// Applies the filter to min and mag, clamps both axes to the edge, and
/// allocates storage with undefined contents. Leaves no texture bound.
///
/// # Errors
///
/// Returns `ProbeError::GlCreate` if the driver fails to create the texture.
#[allow(unsafe_code)]
pub fn create_texture(ctx: &GpuContext, config: &TextureConfig) -> Result<glow::Texture, ProbeError> {
    use glow::HasContext;

    let gl = ctx.gl();
    let (width, height) = gl_extent(config)?;

    // SAFETY: glow wraps raw GL calls as unsafe. We create, configure,
    // and allocate a texture using valid parameters derived from TextureConfig.
    let texture = unsafe {
        gl.create_texture().map_err(|reason| ProbeError::GlCreate {
            object: "texture",
            reason,
        })?
    };

    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));

        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            config.filter as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            config.filter as i32,
        );

        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            config.internal_format as i32,
            width,
            height,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(None),
        );

        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(texture)
}

fn gl_extent(config: &TextureConfig) -> Result<(i32, i32), ProbeError> {
    match (i32::try_from(config.width), i32::try_from(config.height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(ProbeError::InvalidConfig(format!(
            "texture size {}x{} is not a valid GL extent",
            config.width, config.height
        ))),
    }
}
