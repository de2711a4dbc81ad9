//! Session context
//!
//! Owns every piece of mutable game state for one run of a level: the actor,
//! the obstacles, and the status. The level geometry it was built from is
//! kept so a restart can rebuild both from scratch.

use super::state::{Actor, ObstacleSet};
use super::status::{Command, GameStatus, StatusSignal};
use super::tick::step;
use crate::input::KeysState;
use crate::level::LevelData;

#[derive(Debug, Clone)]
pub struct Session {
    level: LevelData,
    actor: Actor,
    obstacles: ObstacleSet,
    status: GameStatus,
    /// Ticks simulated since the last (re)start
    ticks: u64,
}

impl Session {
    pub fn new(level: LevelData) -> Self {
        let obstacles = level.obstacle_set();
        Self {
            level,
            actor: Actor::spawn(),
            obstacles,
            status: GameStatus::Ready,
            ticks: 0,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Begin play from `Ready`; returns false (and changes nothing) otherwise
    pub fn start(&mut self) -> bool {
        self.command(Command::Start)
    }

    /// Reset the run after a loss or win; returns false otherwise
    pub fn restart(&mut self) -> bool {
        self.command(Command::Restart)
    }

    pub fn command(&mut self, command: Command) -> bool {
        let Some(next) = self.status.on_command(command) else {
            log::warn!("Ignoring {:?} while {}", command, self.status.as_str());
            return false;
        };

        if command == Command::Restart {
            self.actor = Actor::spawn();
            self.obstacles = self.level.obstacle_set();
            self.ticks = 0;
            log::info!("Session restarted");
        } else {
            log::info!("Session started");
        }
        self.status = next;
        true
    }

    /// Run one frame: obstacle clock first, then the actor step
    ///
    /// Does nothing unless playing. Returns the status signal raised this
    /// tick, if any.
    pub fn tick(&mut self, keys: KeysState, elapsed_ms: f64, speed_multiplier: f32) -> Option<StatusSignal> {
        if !self.status.is_playing() {
            return None;
        }

        self.obstacles.tick(elapsed_ms);
        let outcome = step(&self.actor, keys, self.obstacles.all(), speed_multiplier);
        self.actor = outcome.actor;
        self.ticks += 1;

        if let Some(next) = outcome.signal.and_then(|s| self.status.on_signal(s)) {
            log::info!(
                "Status {} -> {} after {} ticks",
                self.status.as_str(),
                next.as_str(),
                self.ticks
            );
            self.status = next;
        }
        outcome.signal
    }
}
