//! Frame-driven game loop
//!
//! The loop keeps at most one frame request outstanding. It is armed while
//! the session is playing and cancelled the moment it stops, so a frame can
//! never fire against a finished or torn-down session.

use crate::input::InputState;
use crate::level::LevelData;
use crate::settings::Settings;
use crate::sim::{Command, Session, StatusSignal};
use crate::view::FrameView;

/// Opaque id of a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Source of display-refresh callbacks (e.g. `requestAnimationFrame`)
pub trait FrameSource {
    /// Ask for one callback on the next refresh
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a request that has not fired yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Owns the session and everything that feeds it
pub struct GameLoop<F: FrameSource> {
    session: Session,
    input: InputState,
    settings: Settings,
    frames: F,
    pending: Option<FrameHandle>,
}

impl<F: FrameSource> GameLoop<F> {
    pub fn new(level: LevelData, settings: Settings, frames: F) -> Self {
        Self {
            session: Session::new(level),
            input: InputState::new(),
            settings,
            frames,
            pending: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_speed_multiplier(&mut self, value: f32) {
        self.settings.set_speed_multiplier(value);
        log::info!("Speed set to {}", self.settings.speed_label());
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Forward a raw key event; true if the key is mapped
    pub fn on_key_event(&mut self, name: &str, is_down: bool) -> bool {
        self.input.on_key_event(name, is_down)
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    /// Outstanding frame request, if any
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn start(&mut self) -> bool {
        self.command(Command::Start)
    }

    pub fn restart(&mut self) -> bool {
        self.command(Command::Restart)
    }

    pub fn command(&mut self, command: Command) -> bool {
        let accepted = self.session.command(command);
        self.sync();
        accepted
    }

    /// Frame callback: tick once and re-arm while still playing
    ///
    /// Handles other than the outstanding request are stale and ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> Option<StatusSignal> {
        if self.pending != Some(handle) {
            log::debug!("Ignoring stale frame {:?}", handle);
            return None;
        }
        self.pending = None;

        let keys = self.input.snapshot();
        let signal = self
            .session
            .tick(keys, now_ms, self.settings.speed_multiplier());
        self.sync();
        signal
    }

    /// Cancel any outstanding frame
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
            log::info!("Game loop stopped");
        }
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView::new(&self.session)
    }

    fn sync(&mut self) {
        match (self.session.status().is_playing(), self.pending) {
            (true, None) => self.pending = Some(self.frames.request_frame()),
            (false, Some(handle)) => {
                self.frames.cancel_frame(handle);
                self.pending = None;
            }
            _ => {}
        }
    }
}

impl<F: FrameSource> Drop for GameLoop<F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// In-memory frame source for headless runs and tests
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: u64,
    queued: Vec<FrameHandle>,
    cancelled: usize,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that have neither fired nor been cancelled
    pub fn queued(&self) -> &[FrameHandle] {
        &self.queued
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Simulate one display refresh: hand out every queued request
    pub fn refresh(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.queued)
    }
}

impl FrameSource for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.queued.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.queued.len();
        self.queued.retain(|h| *h != handle);
        if self.queued.len() != before {
            self.cancelled += 1;
        }
    }
}

impl GameLoop<ManualFrames> {
    /// Fire one display refresh at `now_ms`; false once nothing is scheduled
    pub fn pump(&mut self, now_ms: f64) -> bool {
        let due = self.frames.refresh();
        if due.is_empty() {
            return false;
        }
        for handle in due {
            self.on_frame(handle, now_ms);
        }
        true
    }
}
