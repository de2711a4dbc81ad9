//! Read-only presentation snapshot
//!
//! Drawing lives outside the crate. A presenter gets a `FrameView` each
//! frame and never writes back; the only way in is through loop commands.

use glam::Vec2;

use crate::consts::{GAME_WIDTH, LEVEL_WIDTH};
use crate::sim::{Command, Facing, GameStatus, Obstacle, Session};

/// Left edge of the viewport, following the actor and clamped to the level
pub fn camera_x(actor_x: f32) -> f32 {
    (actor_x - GAME_WIDTH / 2.0).min(LEVEL_WIDTH - GAME_WIDTH).max(0.0)
}

/// Modal shown whenever the game is not running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub message: &'static str,
    pub button: &'static str,
    pub command: Command,
}

impl Overlay {
    pub fn for_status(status: GameStatus) -> Option<Self> {
        let (message, button, command) = match status {
            GameStatus::Playing => return None,
            GameStatus::Ready => ("Ready?", "Start Game", Command::Start),
            GameStatus::GameOver => ("Game Over", "Restart", Command::Restart),
            GameStatus::Win => ("You Win!", "Restart", Command::Restart),
        };
        Some(Self {
            message,
            button,
            command,
        })
    }
}

/// Everything a presenter needs for one paint
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub actor_pos: Vec2,
    pub facing: Facing,
    pub airborne: bool,
    pub camera_x: f32,
    pub obstacles: &'a [Obstacle],
    pub status: GameStatus,
    pub overlay: Option<Overlay>,
}

impl<'a> FrameView<'a> {
    pub fn new(session: &'a Session) -> Self {
        let actor = session.actor();
        let status = session.status();
        Self {
            actor_pos: actor.pos,
            facing: actor.facing,
            airborne: actor.airborne(),
            camera_x: camera_x(actor.pos.x),
            obstacles: session.obstacles().all(),
            status,
            overlay: Overlay::for_status(status),
        }
    }
}

/// Consumer of per-frame views
pub trait Presenter {
    fn present(&mut self, view: &FrameView<'_>);
}

/// Presenter for headless runs: logs status changes and overlay prompts
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_status: Option<GameStatus>,
}

impl Presenter for LogPresenter {
    fn present(&mut self, view: &FrameView<'_>) {
        if self.last_status == Some(view.status) {
            return;
        }
        self.last_status = Some(view.status);
        match view.overlay {
            Some(overlay) => log::info!(
                "[{}] {} ({}) actor at ({:.1}, {:.1})",
                view.status.as_str(),
                overlay.message,
                overlay.button,
                view.actor_pos.x,
                view.actor_pos.y
            ),
            None => log::info!("[{}] camera at {:.1}", view.status.as_str(), view.camera_x),
        }
    }
}
