#![deny(unsafe_code)]
//! Core types for the mrt-probe two-pass render harness.
//!
//! Provides the immutable `ProbeConfig`, the four embedded GLSL sources,
//! `SourceLines` (newline-terminated shader lines as submitted to the driver),
//! the fullscreen quad geometry, the `FrameLoop` running/closing state machine,
//! run summaries, and error types. The GL side lives in [`render`] behind the
//! `render` feature.

pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod shaders;
pub mod source_lines;
pub mod summary;

#[cfg(feature = "render")]
pub mod render;

pub use config::{GlVersion, ProbeConfig};
pub use error::{ProbeError, ShaderError};
pub use frame::{ExitReason, FrameLoop, LoopState};
pub use shaders::{ProgramSources, ShaderSources, ShaderStage};
pub use source_lines::SourceLines;
pub use summary::{AttachmentProbe, ProbeMismatch, RunSummary};
