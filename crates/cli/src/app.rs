//! Event handling and the frame loop.
//!
//! winit delivers events to [`ProbeApp`], which records the close flag and
//! the exit key. [`run`] owns the loop itself: it checks the flag, renders
//! both passes, swaps, and pumps pending events without blocking.

use crate::error::CliError;
use crate::window::ContextWindow;
use mrt_probe_core::render::{ensure_no_gl_errors, GpuContext, Pipeline};
use mrt_probe_core::{ExitReason, FrameLoop, LoopState, ProbeConfig, RunSummary};
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::WindowId;

/// Pumps allowed before the platform must have delivered `resumed`.
const BOOTSTRAP_PUMPS: usize = 16;

/// Everything that lives exactly as long as the window.
struct Session {
    window: ContextWindow,
    ctx: GpuContext,
    pipeline: Pipeline,
}

impl Session {
    fn start(event_loop: &ActiveEventLoop, config: &ProbeConfig) -> Result<Self, CliError> {
        let (window, gl) = ContextWindow::create(event_loop, config)?;
        let ctx = GpuContext::new(gl, config.gl_version)?;
        let pipeline = Pipeline::new(&ctx, config)?;
        if let Err(e) = ensure_no_gl_errors(&ctx) {
            pipeline.destroy(&ctx);
            return Err(e.into());
        }
        log::debug!("setup complete");
        Ok(Self {
            window,
            ctx,
            pipeline,
        })
    }

    fn shutdown(self) {
        println!("Finishing...");
        self.teardown();
    }
}

/// The per-frame work the loop drives.
trait FrameSink {
    fn render(&self);
    fn present(&self) -> Result<(), CliError>;
    /// Deletes GPU objects and releases the window.
    fn teardown(self);
}

impl FrameSink for Session {
    fn render(&self) {
        self.pipeline.render_frame(&self.ctx);
    }

    fn present(&self) -> Result<(), CliError> {
        self.window.swap_buffers()
    }

    fn teardown(self) {
        self.pipeline.destroy(&self.ctx);
        self.window.release();
    }
}

/// Receives window-system events on behalf of the loop.
struct ProbeApp<'a> {
    config: &'a ProbeConfig,
    started: bool,
    session: Option<Result<Session, CliError>>,
    frame_loop: FrameLoop,
    exit_key_down: bool,
}

impl<'a> ProbeApp<'a> {
    fn new(config: &'a ProbeConfig) -> Self {
        Self {
            config,
            started: false,
            session: None,
            frame_loop: FrameLoop::new(config.frame_limit),
            exit_key_down: false,
        }
    }
}

impl ApplicationHandler for ProbeApp<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        let session = Session::start(event_loop, self.config);
        if let Err(e) = &session {
            log::error!("setup failed: {e}");
            event_loop.exit();
        }
        self.session = Some(session);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.frame_loop.request_close(ExitReason::WindowClosed),
            WindowEvent::KeyboardInput { event, .. }
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                self.exit_key_down = event.state == ElementState::Pressed;
            }
            _ => {}
        }
    }
}

/// Drains pending events. An exiting event loop counts as a window close.
fn pump(event_loop: &mut EventLoop<()>, app: &mut ProbeApp<'_>) {
    if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), app) {
        log::debug!("event loop exited with {code}");
        app.frame_loop.request_close(ExitReason::WindowClosed);
    }
}

/// Renders and presents until the loop closes, then hands the sink back.
/// A failed present tears the sink down before the error is returned.
fn drive<'a, S: FrameSink>(
    sink: S,
    app: &mut ProbeApp<'a>,
    mut pump: impl FnMut(&mut ProbeApp<'a>),
) -> Result<S, CliError> {
    loop {
        if app.frame_loop.begin_frame() == LoopState::Closing {
            return Ok(sink);
        }
        app.frame_loop.poll_exit_key(app.exit_key_down);

        sink.render();
        if let Err(e) = sink.present() {
            log::error!("presentation failed after {} frame(s)", app.frame_loop.frames());
            sink.teardown();
            return Err(e);
        }
        app.frame_loop.end_frame();

        pump(app);
    }
}

/// Opens the window, runs the frame loop until it closes, and shuts down.
///
/// With `probe`, attachment 1 is read back after the last frame and
/// included in the summary.
///
/// # Errors
///
/// Returns the `CliError` of the first fatal failure.
pub fn run(config: &ProbeConfig, probe: bool) -> Result<RunSummary, CliError> {
    let mut event_loop = EventLoop::new().map_err(|e| CliError::WindowSystem(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ProbeApp::new(config);
    for _ in 0..BOOTSTRAP_PUMPS {
        pump(&mut event_loop, &mut app);
        if app.started {
            break;
        }
    }
    let session = match app.session.take() {
        Some(result) => result?,
        None => {
            return Err(CliError::WindowCreation(
                "the windowing system never resumed the application".to_string(),
            ))
        }
    };

    let session = drive(session, &mut app, |app| pump(&mut event_loop, app))?;

    let probe = probe.then(|| session.pipeline.probe_attachment(&session.ctx));
    let summary = RunSummary {
        gl_version: session.ctx.version_string().to_string(),
        frames: app.frame_loop.frames(),
        exit_reason: app
            .frame_loop
            .exit_reason()
            .unwrap_or(ExitReason::WindowClosed),
        probe,
    };

    session.shutdown();
    drop(event_loop);
    Ok(summary)
}
