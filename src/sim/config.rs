//! Data-driven simulation tuning
//!
//! Defaults come from [`crate::consts`]; tests swap in their own values
//! (e.g. spawn chance 0 or 1) without touching the constants.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub ground_height: f32,

    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,

    pub gravity: f32,
    pub jump_force: f32,
    pub fast_descend_speed: f32,

    pub scroll_speed: f32,
    pub background_scroll_speed: f32,

    pub obstacle_spawn_chance: f64,
    pub collectible_spawn_chance: f64,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub collectible_size: f32,
    pub collectible_min_rise: f32,
    pub collectible_max_rise: f32,
    pub despawn_x: f32,

    pub collectible_reward: u64,
    pub score_per_tick: u64,

    pub animation_frames: u32,
    pub ticks_per_animation_frame: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            ground_height: GROUND_HEIGHT,

            player_x: PLAYER_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,

            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            fast_descend_speed: FAST_DESCEND_SPEED,

            scroll_speed: SCROLL_SPEED,
            background_scroll_speed: BACKGROUND_SCROLL_SPEED,

            obstacle_spawn_chance: OBSTACLE_SPAWN_CHANCE,
            collectible_spawn_chance: COLLECTIBLE_SPAWN_CHANCE,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            collectible_size: COLLECTIBLE_SIZE,
            collectible_min_rise: COLLECTIBLE_MIN_RISE,
            collectible_max_rise: COLLECTIBLE_MAX_RISE,
            despawn_x: DESPAWN_X,

            collectible_reward: COLLECTIBLE_REWARD,
            score_per_tick: SCORE_PER_TICK,

            animation_frames: ANIMATION_FRAMES,
            ticks_per_animation_frame: TICKS_PER_ANIMATION_FRAME,
        }
    }
}

impl SimConfig {
    /// Top edge of the ground band (the surface everything stands on)
    #[inline]
    pub fn ground_top(&self) -> f32 {
        self.canvas_height - self.ground_height
    }

    /// Resting y of the player's top edge
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.ground_top() - self.player_height
    }

    /// Copy with spawning switched off (handy for scripted scenarios)
    pub fn without_spawns(&self) -> Self {
        Self {
            obstacle_spawn_chance: 0.0,
            collectible_spawn_chance: 0.0,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_y_from_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.ground_top(), 350.0);
        assert_eq!(config.ground_y(), 300.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"gravity": 1.0}"#).unwrap();
        assert_eq!(config.gravity, 1.0);
        assert_eq!(config.scroll_speed, SCROLL_SPEED);
    }

    #[test]
    fn test_without_spawns() {
        let config = SimConfig::default().without_spawns();
        assert_eq!(config.obstacle_spawn_chance, 0.0);
        assert_eq!(config.collectible_spawn_chance, 0.0);
        assert_eq!(config.gravity, GRAVITY);
    }
}
