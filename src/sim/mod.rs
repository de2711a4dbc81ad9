//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per display refresh, velocities in units per tick
//! - The only clock is the elapsed time handed in by the caller
//! - Stable iteration order (level-authoring order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod session;
pub mod state;
pub mod status;
pub mod tick;

pub use collision::{Aabb, ContactSide, contact_side};
pub use session::Session;
pub use state::{Actor, Facing, Obstacle, ObstacleKind, ObstacleSet, Oscillation};
pub use status::{Command, GameStatus, StatusSignal};
pub use tick::{StepOutcome, step};
