//! Running/closing state machine of the frame loop.
//!
//! `FrameLoop` holds the close flag the window system and the loop body
//! raise, and decides at the top of each iteration whether the body runs.
//! A close request made during an iteration takes effect at the next check,
//! so the loop always ends within one further iteration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two states of the frame loop. `Closing` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closing,
}

/// Why the loop left `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitReason {
    /// The window system asked the window to close.
    WindowClosed,
    /// The exit key was held when the loop body polled it.
    ExitKey,
    /// The configured frame limit was reached.
    FrameLimit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::WindowClosed => f.write_str("window closed"),
            ExitReason::ExitKey => f.write_str("exit key"),
            ExitReason::FrameLimit => f.write_str("frame limit"),
        }
    }
}

/// Close flag, frame counter and loop state.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: LoopState,
    close_request: Option<ExitReason>,
    frames: u64,
    frame_limit: Option<u64>,
}

impl FrameLoop {
    /// Creates a running loop with an optional frame limit.
    pub fn new(frame_limit: Option<u64>) -> Self {
        Self {
            state: LoopState::Running,
            close_request: None,
            frames: 0,
            frame_limit,
        }
    }

    /// Raises the close flag. The first reason recorded is kept.
    pub fn request_close(&mut self, reason: ExitReason) {
        if self.close_request.is_none() {
            log::debug!("close requested: {reason}");
            self.close_request = Some(reason);
        }
    }

    /// Whether the close flag is raised.
    pub fn should_close(&self) -> bool {
        self.close_request.is_some()
    }

    /// Checks the close flag at the top of an iteration and returns the
    /// resulting state. Once `Closing`, stays `Closing`.
    pub fn begin_frame(&mut self) -> LoopState {
        if self.state == LoopState::Running && self.should_close() {
            self.state = LoopState::Closing;
        }
        self.state
    }

    /// Step 1 of the loop body: a held exit key requests close.
    pub fn poll_exit_key(&mut self, pressed: bool) {
        if pressed {
            self.request_close(ExitReason::ExitKey);
        }
    }

    /// Counts a presented frame and requests close when the limit is reached.
    pub fn end_frame(&mut self) {
        self.frames += 1;
        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            self.request_close(ExitReason::FrameLimit);
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.close_request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives the loop like the harness does, pressing the exit key on
    /// `press_at` (0-based iteration). Returns the iterations executed.
    fn drive(frame_limit: Option<u64>, press_at: Option<u64>, max: u64) -> (FrameLoop, u64) {
        let mut fl = FrameLoop::new(frame_limit);
        let mut iterations = 0;
        while iterations < max && fl.begin_frame() == LoopState::Running {
            fl.poll_exit_key(press_at == Some(iterations));
            fl.end_frame();
            iterations += 1;
        }
        (fl, iterations)
    }

    #[test]
    fn starts_running_with_flag_down() {
        let fl = FrameLoop::new(None);
        assert_eq!(fl.state(), LoopState::Running);
        assert!(!fl.should_close());
        assert_eq!(fl.frames(), 0);
        assert_eq!(fl.exit_reason(), None);
    }

    #[test]
    fn n_frames_without_input_keep_running() {
        let (fl, iterations) = drive(None, None, 100);
        assert_eq!(iterations, 100);
        assert_eq!(fl.frames(), 100);
        assert!(!fl.should_close());
        assert_eq!(fl.state(), LoopState::Running);
    }

    #[test]
    fn exit_key_raises_flag_within_the_same_iteration() {
        let mut fl = FrameLoop::new(None);
        assert_eq!(fl.begin_frame(), LoopState::Running);
        fl.poll_exit_key(true);
        assert!(fl.should_close());
        assert_eq!(fl.state(), LoopState::Running, "body finishes first");
        assert_eq!(fl.begin_frame(), LoopState::Closing);
    }

    #[test]
    fn exit_key_ends_loop_within_one_further_iteration() {
        let (fl, iterations) = drive(None, Some(4), 100);
        assert_eq!(iterations, 5);
        assert_eq!(fl.state(), LoopState::Closing);
        assert_eq!(fl.exit_reason(), Some(ExitReason::ExitKey));
    }

    #[test]
    fn released_key_does_nothing() {
        let mut fl = FrameLoop::new(None);
        fl.poll_exit_key(false);
        assert!(!fl.should_close());
    }

    #[test]
    fn window_close_request_stops_before_the_body() {
        let mut fl = FrameLoop::new(None);
        fl.request_close(ExitReason::WindowClosed);
        assert_eq!(fl.begin_frame(), LoopState::Closing);
        assert_eq!(fl.frames(), 0);
    }

    #[test]
    fn frame_limit_stops_after_exactly_n_frames() {
        let (fl, iterations) = drive(Some(3), None, 100);
        assert_eq!(iterations, 3);
        assert_eq!(fl.frames(), 3);
        assert_eq!(fl.exit_reason(), Some(ExitReason::FrameLimit));
    }

    #[test]
    fn first_reason_wins() {
        let mut fl = FrameLoop::new(Some(1));
        fl.poll_exit_key(true);
        fl.end_frame();
        fl.request_close(ExitReason::WindowClosed);
        assert_eq!(fl.exit_reason(), Some(ExitReason::ExitKey));
    }

    #[test]
    fn closing_is_terminal() {
        let mut fl = FrameLoop::new(None);
        fl.request_close(ExitReason::ExitKey);
        assert_eq!(fl.begin_frame(), LoopState::Closing);
        assert_eq!(fl.begin_frame(), LoopState::Closing);
    }

    #[test]
    fn exit_reason_serializes_kebab_case() {
        let json = serde_json::to_string(&ExitReason::FrameLimit).unwrap();
        assert_eq!(json, "\"frame-limit\"");
        assert_eq!(ExitReason::WindowClosed.to_string(), "window closed");
    }
}
