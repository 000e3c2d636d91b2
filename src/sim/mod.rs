//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Injected, seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod config;
pub mod feedback;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{FeedbackEvent, Rect, Resolution, overlaps, resolve};
pub use config::SimConfig;
pub use feedback::{FeedbackLayer, FloatingFeedback};
pub use physics::advance;
pub use spawner::{scroll_and_cull, spawn};
pub use state::{
    CollectibleKind, GamePhase, JumpKind, ObjectKind, ObstacleKind, PlayerState, SimulationState,
    WorldObject,
};
pub use tick::{GameEvent, TickInput, TickOutcome, tick};
