//! Pixel Platformer - A side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, collisions, game status)
//! - `input`: Held-key state from raw key events
//! - `level`: Level geometry format and the built-in course
//! - `schedule`: Frame-driven game loop with cancellable frames
//! - `view`: Read-only presentation snapshot
//! - `settings`: Persisted player preferences

pub mod input;
pub mod level;
pub mod schedule;
pub mod settings;
pub mod sim;
pub mod view;

pub use input::{InputState, Key, KeysState};
pub use level::LevelData;
pub use schedule::{FrameHandle, FrameSource, GameLoop, ManualFrames};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Visible viewport dimensions
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 400.0;

    /// Full scrollable level width
    pub const LEVEL_WIDTH: f32 = 1500.0;
    pub const GROUND_HEIGHT: f32 = 30.0;

    /// Actor bounding box
    pub const PLAYER_WIDTH: f32 = 24.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    /// Horizontal speed (units/tick) before the speed multiplier
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Vertical velocity set on jump (replaces, never adds)
    pub const JUMP_FORCE: f32 = 10.0;
    /// Subtracted from vertical velocity every tick
    pub const GRAVITY: f32 = 0.5;
    /// Spawn point
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 50.0;

    /// Oscillating obstacles: y = base_y + AMPLITUDE * sin(t_ms / PERIOD)
    pub const OSCILLATION_AMPLITUDE: f32 = 60.0;
    pub const OSCILLATION_PERIOD: f64 = 600.0;

    /// Nominal display refresh interval (60 Hz) used by headless drivers
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Clamp the actor's x into the level so its box never leaves `[0, LEVEL_WIDTH]`
#[inline]
pub fn clamp_to_level(x: f32) -> f32 {
    use consts::{LEVEL_WIDTH, PLAYER_WIDTH};
    let mut x = x;
    if x < 0.0 {
        x = 0.0;
    }
    if x + PLAYER_WIDTH > LEVEL_WIDTH {
        x = LEVEL_WIDTH - PLAYER_WIDTH;
    }
    x
}
