//! Collision detection and resolution
//!
//! Everything in the world is an axis-aligned rectangle, so detection is a
//! plain AABB test. Resolution classifies what the player ran into.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use super::state::{CollectibleKind, ObjectKind, WorldObject};

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// AABB overlap test
///
/// Strict on all four comparisons: rectangles that only share an edge do
/// not collide.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// A collectible was consumed at this position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackEvent {
    pub pos: Vec2,
    pub kind: CollectibleKind,
    pub reward: u64,
}

/// Outcome of checking the player against every active object
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Objects still active after consumption
    pub objects: Vec<WorldObject>,
    /// Points earned from collectibles this tick
    pub score_delta: u64,
    /// An obstacle was hit; the run is over
    pub terminal: bool,
    pub feedback: Vec<FeedbackEvent>,
}

/// Resolve collisions between the player and the world
///
/// Objects are visited in order. The first obstacle hit ends processing;
/// collectibles are consumed and removed; everything else passes through
/// unchanged.
pub fn resolve(player: &Rect, objects: Vec<WorldObject>, config: &SimConfig) -> Resolution {
    let mut kept = Vec::with_capacity(objects.len());
    let mut score_delta = 0;
    let mut feedback = Vec::new();
    let mut terminal = false;

    let mut remaining = objects.into_iter();
    for object in remaining.by_ref() {
        if !overlaps(player, &object.rect) {
            kept.push(object);
            continue;
        }

        match object.kind {
            ObjectKind::Obstacle(kind) => {
                log::debug!("Hit obstacle {} ({:?})", object.id, kind);
                terminal = true;
                kept.push(object);
                break;
            }
            ObjectKind::Collectible(kind) => {
                score_delta += config.collectible_reward;
                feedback.push(FeedbackEvent {
                    pos: object.rect.pos,
                    kind,
                    reward: config.collectible_reward,
                });
            }
        }
    }
    kept.extend(remaining);

    Resolution {
        objects: kept,
        score_delta,
        terminal,
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;
    use proptest::prelude::*;

    fn obstacle(id: u32, rect: Rect) -> WorldObject {
        WorldObject {
            id,
            rect,
            kind: ObjectKind::Obstacle(ObstacleKind::Crate),
        }
    }

    fn collectible(id: u32, rect: Rect) -> WorldObject {
        WorldObject {
            id,
            rect,
            kind: ObjectKind::Collectible(CollectibleKind::Coin),
        }
    }

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));

        let far = Rect::new(100.0, 100.0, 10.0, 10.0);
        assert!(!overlaps(&a, &far));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let player = Rect::new(50.0, 300.0, 50.0, 50.0);
        // Right edge of player == left edge of obstacle
        let beside = Rect::new(100.0, 310.0, 40.0, 40.0);
        assert!(!overlaps(&player, &beside));
        // Bottom edge of player == top edge of block
        let below = Rect::new(60.0, 350.0, 40.0, 40.0);
        assert!(!overlaps(&player, &below));

        let resolution = resolve(&player, vec![obstacle(1, beside)], &SimConfig::default());
        assert!(!resolution.terminal);
        assert_eq!(resolution.objects.len(), 1);
    }

    #[test]
    fn test_collectible_consumed() {
        let config = SimConfig::default();
        let player = Rect::new(50.0, 300.0, 50.0, 50.0);
        let coin_rect = Rect::new(80.0, 290.0, 30.0, 30.0);
        let bystander = obstacle(2, Rect::new(600.0, 310.0, 40.0, 40.0));

        let resolution = resolve(&player, vec![collectible(1, coin_rect), bystander], &config);

        assert!(!resolution.terminal);
        assert_eq!(resolution.score_delta, 100);
        assert_eq!(resolution.objects.len(), 1);
        assert_eq!(resolution.objects[0].id, 2);
        assert_eq!(resolution.feedback.len(), 1);
        assert_eq!(resolution.feedback[0].pos, coin_rect.pos);
    }

    #[test]
    fn test_first_obstacle_stops_processing() {
        let config = SimConfig::default();
        let player = Rect::new(50.0, 300.0, 50.0, 50.0);
        let objects = vec![
            obstacle(1, Rect::new(60.0, 310.0, 40.0, 40.0)),
            collectible(2, Rect::new(60.0, 300.0, 30.0, 30.0)),
        ];

        let resolution = resolve(&player, objects, &config);
        assert!(resolution.terminal);
        assert_eq!(resolution.score_delta, 0);
        assert!(resolution.feedback.is_empty());
        // Collectible after the fatal obstacle was never consumed
        assert!(resolution.objects.iter().any(|o| o.id == 2));
    }

    #[test]
    fn test_two_collectibles_in_one_tick() {
        let config = SimConfig::default();
        let player = Rect::new(50.0, 300.0, 50.0, 50.0);
        let objects = vec![
            collectible(1, Rect::new(60.0, 290.0, 30.0, 30.0)),
            collectible(2, Rect::new(70.0, 320.0, 30.0, 30.0)),
        ];
        let resolution = resolve(&player, objects, &config);
        assert_eq!(resolution.score_delta, 200);
        assert_eq!(resolution.feedback.len(), 2);
        assert!(resolution.objects.is_empty());
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn adjacent_rects_never_overlap(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 1.0f32..200.0, h in 1.0f32..200.0,
        ) {
            let a = Rect::new(x, y, w, h);
            let right = Rect::new(a.right(), y, w, h);
            let below = Rect::new(x, a.bottom(), w, h);
            prop_assert!(!overlaps(&a, &right));
            prop_assert!(!overlaps(&a, &below));
        }
    }
}
