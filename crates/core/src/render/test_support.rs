//! Headless GL context for the ignored GL-backed tests.
//!
//! Picks the first EGL device and makes a 3.3 core context current without
//! a surface. Panics when no device is available, which is why every caller
//! is `#[ignore = "requires GL context"]`.

#![allow(unsafe_code)]

use super::context::GpuContext;
use crate::config::GlVersion;
use glutin::api::egl::context::PossiblyCurrentContext;
use glutin::api::egl::device::Device;
use glutin::api::egl::display::Display;
use glutin::config::{ConfigSurfaceTypes, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, Version};
use glutin::display::GlDisplay;

/// A current headless context. `ctx` is dropped before the context itself.
pub(crate) struct HeadlessGl {
    pub ctx: GpuContext,
    _context: PossiblyCurrentContext,
}

/// Loads GL on a fresh surfaceless context and returns the raw glow handle.
pub(crate) fn headless_glow() -> (glow::Context, PossiblyCurrentContext) {
    let device = Device::query_devices()
        .expect("query EGL devices")
        .next()
        .expect("no EGL device");
    // SAFETY: no native display is passed; EGL owns the device display.
    let display = unsafe { Display::with_device(&device, None) }.expect("EGL display");

    let template = ConfigTemplateBuilder::default()
        .with_alpha_size(8)
        .with_surface_type(ConfigSurfaceTypes::empty())
        .build();
    // SAFETY: the display is alive for the whole call.
    let config = unsafe { display.find_configs(template) }
        .expect("EGL configs")
        .next()
        .expect("no surfaceless EGL config");

    let minimum = GlVersion::MINIMUM;
    let attributes = ContextAttributesBuilder::new()
        .with_profile(GlProfile::Core)
        .with_context_api(ContextApi::OpenGl(Some(Version::new(
            minimum.major,
            minimum.minor,
        ))))
        .build(None);
    // SAFETY: no window handle is involved.
    let not_current =
        unsafe { display.create_context(&config, &attributes) }.expect("GL core context");
    let context = not_current
        .make_current_surfaceless()
        .expect("make context current");

    // SAFETY: the context is current on this thread.
    let gl = unsafe { glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name)) };
    (gl, context)
}

/// A `GpuContext` on a fresh headless context.
pub(crate) fn headless_context() -> HeadlessGl {
    let (gl, context) = headless_glow();
    let ctx = GpuContext::new(gl, GlVersion::MINIMUM).expect("GL 3.3 core");
    HeadlessGl {
        ctx,
        _context: context,
    }
}
