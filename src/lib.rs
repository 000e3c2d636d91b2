//! Side Runner - A side-scrolling runner game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scoring)
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Synthesized music and sound effects (Web Audio)
//! - `controls`: Key and tap mapping
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: JSON load/save on top of the key-value store
//! - `highscores`: Top-5 leaderboard
//! - `settings`: Audio and HUD preferences

pub mod audio;
pub mod controls;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
///
/// Units are logical canvas pixels and simulation ticks (one tick per
/// display refresh).
pub mod consts {
    /// Logical playfield size
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;
    /// Height of the floor strip at the bottom of the playfield
    pub const GROUND_HEIGHT: f32 = 50.0;

    /// Player defaults (x never changes)
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;

    /// Downward acceleration, added to velocity every tick
    pub const GRAVITY: f32 = 0.5;
    /// Vertical velocity set by a jump (negative = up)
    pub const JUMP_FORCE: f32 = -12.0;
    /// Vertical velocity set by fast-descend while airborne
    pub const FAST_DESCEND_SPEED: f32 = 15.0;

    /// World objects move left by this much per tick
    pub const SCROLL_SPEED: f32 = 5.0;
    /// Background parallax speed
    pub const BACKGROUND_SCROLL_SPEED: f32 = 2.0;

    /// Per-tick spawn probabilities (independent)
    pub const OBSTACLE_SPAWN_CHANCE: f64 = 0.015;
    pub const COLLECTIBLE_SPAWN_CHANCE: f64 = 0.01;

    pub const OBSTACLE_WIDTH: f32 = 40.0;
    pub const OBSTACLE_HEIGHT: f32 = 40.0;
    pub const COLLECTIBLE_SIZE: f32 = 30.0;
    /// Collectible bottom edge sits this far above the ground surface
    pub const COLLECTIBLE_MIN_RISE: f32 = 40.0;
    pub const COLLECTIBLE_MAX_RISE: f32 = 150.0;

    /// Objects at or left of this x are dropped
    pub const DESPAWN_X: f32 = -100.0;

    pub const COLLECTIBLE_REWARD: u64 = 100;
    pub const SCORE_PER_TICK: u64 = 1;

    /// Run cycle: 5 frames, one frame every 8 ticks
    pub const ANIMATION_FRAMES: u32 = 5;
    pub const TICKS_PER_ANIMATION_FRAME: u32 = 8;

    /// Feedback markers decay on a wall-clock timer, not per tick
    pub const FEEDBACK_DECAY_INTERVAL_MS: i32 = 50;
    pub const FEEDBACK_FADE_STEP: f32 = 0.05;
    pub const FEEDBACK_RISE_STEP: f32 = 1.5;

    /// Delay before the one-time music autoplay attempt
    pub const AUTOPLAY_DELAY_MS: i32 = 1000;
}
