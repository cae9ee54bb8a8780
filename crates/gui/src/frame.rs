//! One iteration of the main loop, and its pacing.
//!
//! An iteration folds the pending events through the dispatcher, advances the per-frame
//! animation and renders exactly one frame. The window toolkit owns the actual loop and may
//! wake it far more often than the frame rate (every pointer move does), so it calls
//! [`run_paced_frame`]: events are always dispatched, but the update and the frame only
//! happen once the previous frame's budget has run out.

use std::time::{Duration, Instant};

use crate::input::{dispatch_all, Flow, InputEvent};
use crate::render::{GraphicsBackend, RenderPipeline, TextRasterizer};
use crate::state::EditorState;

/// Fixed frame budget plus a once-per-second FPS estimate
pub struct FramePacer {
    budget: Duration,
    frame_start: Instant,
    /// No frame has started yet
    idle: bool,
    frames_since_update: u32,
    last_fps_calculation: Instant,
    fps: f64,
}

impl FramePacer {
    pub fn new(budget: Duration) -> Self {
        let now = Instant::now();
        Self {
            budget,
            frame_start: now,
            idle: true,
            frames_since_update: 0,
            last_fps_calculation: now,
            fps: 0.0,
        }
    }

    /// Mark the start of a frame
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.frame_start = now;
        self.idle = false;
        self.frames_since_update += 1;

        let elapsed = now.duration_since(self.last_fps_calculation);
        if elapsed.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_update as f64 / elapsed.as_secs_f64();
            self.frames_since_update = 0;
            self.last_fps_calculation = now;
        }
    }

    /// Start a frame unless the current one's budget is still running.
    /// The very first call always starts one.
    pub fn try_begin_frame(&mut self) -> bool {
        if !self.idle && !self.remaining().is_zero() {
            return false;
        }
        self.begin_frame();
        true
    }

    /// Time left in the current frame's budget; zero once it is spent
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.frame_start.elapsed())
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Frames per second over the last full second, 0 until one has passed
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

/// What one paced iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Updated and rendered a new frame
    Rendered,
    /// Events applied; the last frame's budget is still running
    Waiting,
    Exit,
}

/// Dispatch `events` always; update and render only when `pacer` allows a new frame.
pub fn run_paced_frame(
    state: &mut EditorState,
    pipeline: &mut RenderPipeline,
    pacer: &mut FramePacer,
    events: impl IntoIterator<Item = InputEvent>,
    gfx: &mut dyn GraphicsBackend,
    text: &mut dyn TextRasterizer,
) -> FrameOutcome {
    if dispatch_all(state, events) == Flow::Exit {
        tracing::info!("Quit requested");
        return FrameOutcome::Exit;
    }
    if !pacer.try_begin_frame() {
        return FrameOutcome::Waiting;
    }
    state.update();
    pipeline.render(state, gfx, text);
    FrameOutcome::Rendered
}

/// Dispatch `events`, update, render one frame. A quit skips the update and the frame.
pub fn run_frame(
    state: &mut EditorState,
    pipeline: &mut RenderPipeline,
    events: impl IntoIterator<Item = InputEvent>,
    gfx: &mut dyn GraphicsBackend,
    text: &mut dyn TextRasterizer,
) -> Flow {
    if dispatch_all(state, events) == Flow::Exit {
        tracing::info!("Quit requested");
        return Flow::Exit;
    }
    state.update();
    pipeline.render(state, gfx, text);
    Flow::Continue
}
