//! Embedded GLSL 330 sources for the two passes.
//!
//! The offscreen pass draws the quad at half size and writes only through
//! output location 1. The screen pass draws the full quad and samples the
//! texture bound to unit 0.
//!
//! Every source opens with a blank line, so `#version` is line 2 in driver
//! diagnostics.

use std::fmt;

/// Vertex shader of the offscreen pass. Scales the quad by 0.5.
pub const QUAD_VERTEX_SHADER: &str = r#"
#version 330

const float scale = 0.5;

layout(location = 0) in vec2 v;

void main()
{
	gl_Position = vec4(v * scale, 0.0, 1.0);
}
"#;

/// Fragment shader of the offscreen pass. Location 0 is left unbound.
pub const QUAD_FRAGMENT_SHADER: &str = r#"
#version 330

layout(location = 1) out vec4 outFragColor1;

void main()
{
	outFragColor1 = vec4(vec3(0.0, 0.0, 1.0), 1.0);
}
"#;

/// Vertex shader of the screen pass. Derives texture coordinates from position.
pub const TEXTURE_VERTEX_SHADER: &str = r#"
#version 330

layout(location = 0) in vec2 v;

smooth out vec2 texCoord;

void main()
{
	texCoord = (v + vec2(1.0)) * 0.5;
	gl_Position = vec4(v, 0.0, 1.0);
}
"#;

/// Fragment shader of the screen pass. Samples unit 0 and forces opaque alpha.
pub const TEXTURE_FRAGMENT_SHADER: &str = r#"
#version 330
#extension GL_ARB_explicit_uniform_location : enable

layout(location = 0) uniform sampler2D tex;

smooth in vec2 texCoord;

layout(location = 0) out vec4 outFragColor0;

void main()
{
	outFragColor0 = vec4(texture(tex, texCoord).rgb, 1.0);
}
"#;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// The vertex/fragment pair that makes up one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramSources {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

impl ProgramSources {
    /// Returns the source for `stage`.
    pub fn stage(&self, stage: ShaderStage) -> &'static str {
        match stage {
            ShaderStage::Vertex => self.vertex,
            ShaderStage::Fragment => self.fragment,
        }
    }
}

/// Sources of both programs: `offscreen` renders pass A, `screen` pass B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSources {
    pub offscreen: ProgramSources,
    pub screen: ProgramSources,
}

impl ShaderSources {
    /// The sources compiled into the binary.
    pub const EMBEDDED: ShaderSources = ShaderSources {
        offscreen: ProgramSources {
            vertex: QUAD_VERTEX_SHADER,
            fragment: QUAD_FRAGMENT_SHADER,
        },
        screen: ProgramSources {
            vertex: TEXTURE_VERTEX_SHADER,
            fragment: TEXTURE_FRAGMENT_SHADER,
        },
    };
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::EMBEDDED
    }
}
