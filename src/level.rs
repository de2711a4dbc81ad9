//! Level geometry
//!
//! A level is an ordered list of obstacle records. The built-in course is
//! always available; custom courses load from JSON and are validated here,
//! before the simulation ever sees them.

use std::collections::HashSet;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::GROUND_HEIGHT;
use crate::sim::{Obstacle, ObstacleKind, ObstacleSet};

/// Errors raised while loading level geometry
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate obstacle id {0}")]
    DuplicateId(u32),

    #[error("obstacle {id} has non-positive size {width}x{height}")]
    InvalidSize { id: u32, width: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// On-disk obstacle record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
    pub position: Point,
    pub size: Size,
    /// Bob vertically around `position.y`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub oscillating: bool,
}

impl From<&ObstacleRecord> for Obstacle {
    fn from(record: &ObstacleRecord) -> Self {
        let obstacle = Obstacle::new(
            record.id,
            record.kind,
            Vec2::new(record.position.x, record.position.y),
            Vec2::new(record.size.width, record.size.height),
        );
        if record.oscillating {
            obstacle.oscillating()
        } else {
            obstacle
        }
    }
}

impl From<&Obstacle> for ObstacleRecord {
    fn from(obstacle: &Obstacle) -> Self {
        // Oscillating obstacles are stored at their rest position
        let y = obstacle.oscillation.map_or(obstacle.pos.y, |o| o.base_y);
        Self {
            id: obstacle.id,
            kind: obstacle.kind,
            position: Point {
                x: obstacle.pos.x,
                y,
            },
            size: Size {
                width: obstacle.size.x,
                height: obstacle.size.y,
            },
            oscillating: obstacle.oscillation.is_some(),
        }
    }
}

/// Immutable level geometry in authoring order
#[derive(Debug, Clone, PartialEq)]
pub struct LevelData {
    obstacles: Vec<Obstacle>,
}

impl Default for LevelData {
    fn default() -> Self {
        Self::default_level()
    }
}

impl LevelData {
    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// The built-in course
    pub fn default_level() -> Self {
        use ObstacleKind::*;

        let ob = |id, kind, x, y, w, h| Obstacle::new(id, kind, Vec2::new(x, y), Vec2::new(w, h));
        Self::from_obstacles(vec![
            // Starting platform
            ob(1, Platform, 0.0, 0.0, 200.0, GROUND_HEIGHT),
            // First jump
            ob(2, Platform, 250.0, 50.0, 100.0, 20.0),
            // Hazard on the ground
            ob(3, Hazard, 400.0, 0.0, 20.0, 20.0),
            ob(4, Platform, 380.0, 0.0, 60.0, GROUND_HEIGHT),
            // Ground after the pit
            ob(5, Platform, 500.0, 0.0, 250.0, GROUND_HEIGHT),
            // Floating platforms
            ob(6, Platform, 600.0, 110.0, 80.0, 20.0),
            ob(7, Platform, 720.0, 170.0, 80.0, 20.0),
            // Bobbing hazard
            ob(8, Hazard, 900.0, 100.0, 20.0, 20.0).oscillating(),
            ob(9, Platform, 830.0, 0.0, 200.0, GROUND_HEIGHT),
            // Final stretch
            ob(10, Platform, 1100.0, 0.0, 300.0, GROUND_HEIGHT),
            // Block to jump over
            ob(11, Platform, 1200.0, 0.0, 40.0, 40.0),
            // Finish line
            ob(12, Finish, 1450.0, 0.0, 10.0, 40.0),
        ])
    }

    /// Parse and validate a JSON array of obstacle records
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let records: Vec<ObstacleRecord> = serde_json::from_str(json)?;
        validate(&records)?;
        Ok(Self::from_obstacles(records.iter().map(Obstacle::from).collect()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded {} obstacles from {}",
            level.obstacles.len(),
            path.as_ref().display()
        );
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        let records: Vec<ObstacleRecord> = self.obstacles.iter().map(ObstacleRecord::from).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Fresh obstacle set at authored positions
    pub fn obstacle_set(&self) -> ObstacleSet {
        ObstacleSet::new(self.obstacles.clone())
    }
}

/// Reject duplicate ids and empty or inverted boxes
pub fn validate(records: &[ObstacleRecord]) -> Result<(), LevelError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            return Err(LevelError::DuplicateId(record.id));
        }
        let Size { width, height } = record.size;
        if !(width > 0.0 && height > 0.0) {
            return Err(LevelError::InvalidSize {
                id: record.id,
                width,
                height,
            });
        }
    }
    Ok(())
}
