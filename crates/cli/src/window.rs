//! Window and GL context bootstrap.
//!
//! Opens a fixed-size, non-resizable window with a core-profile context of
//! the configured version, makes it current, and loads GL entry points
//! through glow.

use crate::error::CliError;
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    PossiblyCurrentGlContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use mrt_probe_core::ProbeConfig;
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// A window with a current GL context and its surface.
///
/// Field order is drop order: surface, then context, then window.
pub struct ContextWindow {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

/// Picks the config with the fewest samples.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .min_by_key(|c| c.num_samples())
        .expect("glutin only calls the picker with at least one config")
}

impl ContextWindow {
    /// Creates the window and context and loads GL.
    ///
    /// # Errors
    ///
    /// Returns `CliError::WindowCreation` if no window, config, context or
    /// surface can be created, and `CliError::Loader` if the context cannot
    /// be made current.
    #[allow(unsafe_code)]
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &ProbeConfig,
    ) -> Result<(Self, glow::Context), CliError> {
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(false);

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, pick_config)
            .map_err(|e| CliError::WindowCreation(e.to_string()))?;
        let window =
            window.ok_or_else(|| CliError::WindowCreation("no window was created".to_string()))?;

        let raw_handle = window
            .window_handle()
            .map_err(|e| CliError::WindowCreation(e.to_string()))?
            .as_raw();
        let gl_display = gl_config.display();
        let version = Version::new(config.gl_version.major, config.gl_version.minor);
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(version)))
            .build(Some(raw_handle));

        // SAFETY: the raw window handle belongs to `window`, which outlives
        // the context inside ContextWindow.
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| {
                CliError::WindowCreation(format!("GL {} core context: {e}", config.gl_version))
            })?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|e| CliError::WindowCreation(e.to_string()))?;
        // SAFETY: same window ownership as above.
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| CliError::WindowCreation(format!("window surface: {e}")))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| CliError::Loader(format!("make current: {e}")))?;

        // SAFETY: the context is current on this thread and get_proc_address
        // returns entry points of that context.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| gl_display.get_proc_address(name))
        };

        log::debug!(
            "window {}x{} \"{}\" created",
            config.width,
            config.height,
            config.title
        );

        Ok((
            Self {
                surface,
                context,
                window,
            },
            gl,
        ))
    }

    /// Presents the back buffer.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Gpu` if the swap fails.
    pub fn swap_buffers(&self) -> Result<(), CliError> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| CliError::Gpu(format!("swap buffers: {e}")))
    }

    /// Clears the current-context association, then destroys the surface and
    /// the window.
    pub fn release(self) {
        let Self {
            surface,
            context,
            window,
        } = self;
        match context.make_not_current() {
            Ok(not_current) => drop(not_current),
            Err(e) => log::warn!("could not release GL context: {e}"),
        }
        drop(surface);
        drop(window);
        log::debug!("window destroyed");
    }
}
