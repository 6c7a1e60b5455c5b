//! Shader compilation and program linking.
//!
//! Sources go to the driver as their newline-terminated lines (see
//! [`SourceLines`]), so the line numbers in driver logs match the numbered
//! source attached to a `ShaderError::CompileError`. Non-empty driver logs
//! are also echoed to standard output, success or not.

use super::context::GpuContext;
use crate::error::ShaderError;
use crate::shaders::{ProgramSources, ShaderStage};
use crate::source_lines::SourceLines;

/// The GL shader type for a stage.
pub fn shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn echo_info_log(log: &str) {
    if !log.is_empty() {
        println!("Log: ");
        print!("{log}");
        if !log.ends_with('\n') {
            println!();
        }
    }
}

/// Compiles a single shader stage.
///
/// # Errors
///
/// Returns `ShaderError::NullShader` if the driver hands out no shader
/// object, or `ShaderError::CompileError` with the numbered source and the
/// driver's info log if compilation fails. The shader object is deleted on
/// failure.
#[allow(unsafe_code)]
pub fn compile_shader(
    ctx: &GpuContext,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    let gl = ctx.gl();
    let lines = SourceLines::split(source);
    if !lines.tail().is_empty() {
        log::warn!(
            "{stage} shader: text after the last newline is not submitted: {:?}",
            lines.tail()
        );
    }

    // SAFETY: glow wraps raw GL calls as unsafe. The shader type comes from
    // shader_type() and the handle is deleted on every failure path.
    let shader = unsafe {
        gl.create_shader(shader_type(stage))
            .map_err(|reason| ShaderError::NullShader { stage, reason })?
    };

    let compiled = unsafe {
        gl.shader_source(shader, &lines.submitted());
        gl.compile_shader(shader);
        gl.get_shader_compile_status(shader)
    };

    let info_log = unsafe { gl.get_shader_info_log(shader) };
    echo_info_log(&info_log);

    if compiled {
        log::debug!("compiled {stage} shader ({} lines)", lines.len());
        Ok(shader)
    } else {
        unsafe { gl.delete_shader(shader) };
        Err(ShaderError::CompileError {
            stage,
            log: lines.numbered(&info_log),
        })
    }
}

/// Links a vertex and fragment shader into a program.
///
/// The shaders stay attached; deleting them afterwards only flags them, and
/// the program keeps its linked code either way.
///
/// # Errors
///
/// Returns `ShaderError::NullProgram` if the driver hands out no program
/// object, or `ShaderError::LinkError` with the info log if linking fails.
/// The program is deleted on failure.
#[allow(unsafe_code)]
pub fn link_program(
    ctx: &GpuContext,
    vertex: glow::Shader,
    fragment: glow::Shader,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let gl = ctx.gl();

    // SAFETY: glow wraps raw GL calls as unsafe. Shader handles come from
    // compile_shader and the program is deleted if linking fails.
    let program = unsafe { gl.create_program().map_err(ShaderError::NullProgram)? };

    let linked = unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        gl.get_program_link_status(program)
    };

    let info_log = unsafe { gl.get_program_info_log(program) };
    echo_info_log(&info_log);

    if linked {
        Ok(program)
    } else {
        unsafe { gl.delete_program(program) };
        Err(ShaderError::LinkError(info_log))
    }
}

/// Compiles both stages of `sources` and links them into a program.
///
/// Both shader objects are deleted before returning, on success and on
/// failure alike.
///
/// # Errors
///
/// Propagates the first `ShaderError` from [`compile_shader`] or
/// [`link_program`].
#[allow(unsafe_code)]
pub fn build_program(
    ctx: &GpuContext,
    sources: &ProgramSources,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let gl = ctx.gl();
    let vert = compile_shader(ctx, ShaderStage::Vertex, sources.vertex)?;
    let frag = match compile_shader(ctx, ShaderStage::Fragment, sources.fragment) {
        Ok(f) => f,
        Err(e) => {
            // SAFETY: vert is a valid shader handle from compile_shader.
            unsafe { gl.delete_shader(vert) };
            return Err(e);
        }
    };

    let result = link_program(ctx, vert, frag);

    // SAFETY: both handles are valid; a linked program retains its code.
    unsafe {
        gl.delete_shader(vert);
        gl.delete_shader(frag);
    }

    result
}
