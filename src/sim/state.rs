//! Actor and obstacle types
//!
//! Everything the simulation reads or writes per tick lives here. World units
//! have their origin at the bottom-left of the level with y pointing up.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which way the actor is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The single controllable actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Bottom-left corner of the bounding box
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    /// True only on a tick where a top landing happened
    pub grounded: bool,
    pub facing: Facing,
}

impl Default for Actor {
    fn default() -> Self {
        Self::spawn()
    }
}

impl Actor {
    /// Fresh actor at the level start
    pub fn spawn() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel: Vec2::ZERO,
            grounded: true,
            facing: Facing::Right,
        }
    }

    /// Moving upward without a landing this tick
    pub fn airborne(&self) -> bool {
        self.vel.y > 0.0 && !self.grounded
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Solid, resolved by the collision ladder
    Platform,
    /// Touching it ends the run
    Hazard,
    /// Touching it wins the level
    Finish,
}

/// Vertical sinusoidal motion around a rest position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub base_y: f32,
}

impl Oscillation {
    /// y at the given clock reading (milliseconds)
    pub fn y_at(&self, elapsed_ms: f64) -> f32 {
        let phase = (elapsed_ms / OSCILLATION_PERIOD).sin() as f32;
        self.base_y + OSCILLATION_AMPLITUDE * phase
    }
}

/// An axis-aligned obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub oscillation: Option<Oscillation>,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            oscillation: None,
        }
    }

    /// Make this obstacle oscillate around its current y
    pub fn oscillating(mut self) -> Self {
        self.oscillation = Some(Oscillation { base_y: self.pos.y });
        self
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y
    }

    pub fn top(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Ordered obstacles for one session
///
/// Order is the level-authoring order and doubles as collision-test order,
/// so it never changes after construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// Recompute y for every oscillating member
    pub fn tick(&mut self, elapsed_ms: f64) {
        for obstacle in &mut self.obstacles {
            if let Some(osc) = obstacle.oscillation {
                obstacle.pos.y = osc.y_at(elapsed_ms);
            }
        }
    }

    pub fn all(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn get(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
