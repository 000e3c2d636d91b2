//! Idle/demo mode player
//!
//! Looks at the nearest obstacle ahead and decides on jump/descend inputs.
//! Deterministic: the same state always yields the same decision.

use super::config::SimConfig;
use super::state::SimulationState;
use super::tick::TickInput;

/// Gap (obstacle left edge minus player right edge) that triggers a jump
const JUMP_WINDOW: (f32, f32) = (20.0, 60.0);
/// Clear runway needed before slamming back down
const DESCEND_RUNWAY: f32 = 200.0;

/// Distance from the player's right edge to the nearest obstacle still ahead
/// of (or overlapping) the player
fn nearest_obstacle_gap(state: &SimulationState) -> Option<f32> {
    let player = state.player.rect();
    state
        .objects
        .iter()
        .filter(|o| o.is_obstacle() && o.rect.right() > player.left())
        .map(|o| o.rect.left() - player.right())
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Pick inputs for the next tick
pub fn decide(state: &SimulationState, config: &SimConfig) -> TickInput {
    let player = &state.player;
    let gap = nearest_obstacle_gap(state);

    let mut input = TickInput::default();
    match gap {
        Some(gap) if !player.is_airborne() => {
            input.jump = (JUMP_WINDOW.0..=JUMP_WINDOW.1).contains(&gap);
        }
        Some(gap) => {
            // Falling onto an obstacle: spend the double jump
            let obstacle_top = config.ground_top() - config.obstacle_height;
            let falling = player.velocity_y > 0.0;
            let overlapping_soon = gap < JUMP_WINDOW.0 && gap > -(player.width + config.obstacle_width);
            let low = player.rect().bottom() > obstacle_top - config.obstacle_height * 0.5;
            input.jump = falling && overlapping_soon && low && player.can_double_jump;
            input.fast_descend = !input.jump && falling && gap > DESCEND_RUNWAY;
        }
        None => {
            input.fast_descend = player.is_airborne() && player.velocity_y > 0.0;
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;
    use crate::sim::state::{ObjectKind, ObstacleKind, WorldObject};
    use crate::sim::tick::tick;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn with_obstacle_at(x: f32, config: &SimConfig) -> SimulationState {
        let mut state = SimulationState::new(1, config);
        state.start(1, config);
        let id = state.next_entity_id();
        state.objects.push(WorldObject {
            id,
            rect: Rect::new(
                x,
                config.ground_top() - config.obstacle_height,
                config.obstacle_width,
                config.obstacle_height,
            ),
            kind: ObjectKind::Obstacle(ObstacleKind::Crate),
        });
        state
    }

    #[test]
    fn test_no_jump_when_far() {
        let config = SimConfig::default();
        let state = with_obstacle_at(500.0, &config);
        assert!(!decide(&state, &config).jump);
    }

    #[test]
    fn test_jumps_inside_window() {
        let config = SimConfig::default();
        let state = with_obstacle_at(config.player_x + config.player_width + 40.0, &config);
        assert!(decide(&state, &config).jump);
    }

    #[test]
    fn test_clears_single_obstacle() {
        let config = SimConfig::default().without_spawns();
        let mut state = with_obstacle_at(400.0, &config);
        let mut rng = Pcg32::seed_from_u64(3);

        for _ in 0..200 {
            let input = decide(&state, &config);
            state = tick(&state, &input, &config, &mut rng).state;
            assert!(state.is_playing(), "autopilot crashed at tick {}", state.time_ticks);
        }
    }
}
