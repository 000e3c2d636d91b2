//! Player physics step
//!
//! Semi-implicit Euler with a fixed per-tick gravity; no variable timestep.

use super::config::SimConfig;
use super::state::PlayerState;

/// Advance the player by one tick
pub fn advance(player: &PlayerState, config: &SimConfig) -> PlayerState {
    let mut next = player.clone();

    next.velocity_y += config.gravity;
    next.y += next.velocity_y;

    // Ground clamp
    let ground_y = config.ground_y();
    if next.y >= ground_y {
        next.y = ground_y;
        next.velocity_y = 0.0;
        next.is_jumping = false;
        next.can_double_jump = false;
    }

    next.animation_tick = next.animation_tick.wrapping_add(1);
    next
}
