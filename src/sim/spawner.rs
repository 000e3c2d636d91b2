//! Object spawning and scrolling
//!
//! The random source is always passed in so spawn sequences can be replayed
//! from a seed.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::collision::Rect;
use super::config::SimConfig;
use super::state::{CollectibleKind, ObjectKind, ObstacleKind, WorldObject};

/// Roll this tick's spawns and append them at the right edge
///
/// Obstacle and collectible rolls are independent: both, either, or neither
/// may spawn in the same tick. Returns how many objects were added.
pub fn spawn<R: Rng + ?Sized>(
    objects: &mut Vec<WorldObject>,
    config: &SimConfig,
    rng: &mut R,
    next_id: &mut u32,
) -> usize {
    let before = objects.len();

    if rng.random_bool(config.obstacle_spawn_chance.clamp(0.0, 1.0)) {
        let kind = *ObstacleKind::ALL.choose(rng).unwrap_or(&ObstacleKind::Crate);
        let rect = Rect::new(
            config.canvas_width,
            config.ground_top() - config.obstacle_height,
            config.obstacle_width,
            config.obstacle_height,
        );
        objects.push(WorldObject {
            id: take_id(next_id),
            rect,
            kind: ObjectKind::Obstacle(kind),
        });
    }

    if rng.random_bool(config.collectible_spawn_chance.clamp(0.0, 1.0)) {
        let kind = *CollectibleKind::ALL.choose(rng).unwrap_or(&CollectibleKind::Coin);
        let (lo, hi) = rise_band(config);
        let rise = if hi > lo { rng.random_range(lo..=hi) } else { lo };
        let rect = Rect::new(
            config.canvas_width,
            config.ground_top() - rise - config.collectible_size,
            config.collectible_size,
            config.collectible_size,
        );
        objects.push(WorldObject {
            id: take_id(next_id),
            rect,
            kind: ObjectKind::Collectible(kind),
        });
    }

    objects.len() - before
}

/// Move everything left by the scroll speed and drop what has left the screen
///
/// Returns how many objects were culled.
pub fn scroll_and_cull(objects: &mut Vec<WorldObject>, config: &SimConfig) -> usize {
    for object in objects.iter_mut() {
        object.rect.pos.x -= config.scroll_speed;
    }
    let before = objects.len();
    objects.retain(|o| o.rect.pos.x > config.despawn_x);
    before - objects.len()
}

fn rise_band(config: &SimConfig) -> (f32, f32) {
    let lo = config.collectible_min_rise.min(config.collectible_max_rise);
    let hi = config.collectible_min_rise.max(config.collectible_max_rise);
    (lo, hi)
}

fn take_id(next_id: &mut u32) -> u32 {
    let id = *next_id;
    *next_id += 1;
    id
}
