//! Game status machine
//!
//! `Ready` → `Playing` on start, `Playing` → `GameOver`/`Win` on a
//! simulation signal, `GameOver`/`Win` → `Playing` on restart. Anything else
//! is rejected and leaves the status untouched.

use serde::{Deserialize, Serialize};

/// Current status of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the first start
    #[default]
    Ready,
    /// Simulation running
    Playing,
    /// Hit a hazard or fell into a pit
    GameOver,
    /// Reached the finish
    Win,
}

/// Terminal outcome raised by a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSignal {
    GameOver,
    Win,
}

/// Commands from UI controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Restart,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Ready => "ready",
            GameStatus::Playing => "playing",
            GameStatus::GameOver => "gameOver",
            GameStatus::Win => "win",
        }
    }

    pub fn is_playing(&self) -> bool {
        *self == GameStatus::Playing
    }

    /// Run ended, waiting for restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Win)
    }

    /// Status after a UI command, or `None` if the command is invalid here
    pub fn on_command(self, command: Command) -> Option<GameStatus> {
        match (self, command) {
            (GameStatus::Ready, Command::Start) => Some(GameStatus::Playing),
            (GameStatus::GameOver | GameStatus::Win, Command::Restart) => Some(GameStatus::Playing),
            _ => None,
        }
    }

    /// Status after a simulation signal; only meaningful while playing
    pub fn on_signal(self, signal: StatusSignal) -> Option<GameStatus> {
        if !self.is_playing() {
            return None;
        }
        Some(match signal {
            StatusSignal::GameOver => GameStatus::GameOver,
            StatusSignal::Win => GameStatus::Win,
        })
    }
}
