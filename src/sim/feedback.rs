//! Floating score markers
//!
//! Purely cosmetic. Markers decay on their own wall-clock timer, so nothing
//! here is touched by the simulation tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::FeedbackEvent;
use crate::consts::{FEEDBACK_FADE_STEP, FEEDBACK_RISE_STEP};

/// A "+100" style marker drifting up from a consumed collectible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingFeedback {
    pub pos: Vec2,
    /// 1.0 when spawned, pruned at 0
    pub opacity: f32,
    /// How far the marker has drifted upward
    pub rise: f32,
    pub amount: u64,
}

impl FloatingFeedback {
    pub fn new(pos: Vec2, amount: u64) -> Self {
        Self {
            pos,
            opacity: 1.0,
            rise: 0.0,
            amount,
        }
    }

    /// Position including drift
    pub fn draw_pos(&self) -> Vec2 {
        self.pos - Vec2::new(0.0, self.rise)
    }

    /// One decay step; returns false once fully faded
    pub fn decay(&mut self) -> bool {
        self.opacity -= FEEDBACK_FADE_STEP;
        self.rise += FEEDBACK_RISE_STEP;
        self.opacity > 0.0
    }
}

/// All live feedback markers
#[derive(Debug, Clone, Default)]
pub struct FeedbackLayer {
    markers: Vec<FloatingFeedback>,
}

impl FeedbackLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, event: &FeedbackEvent) {
        self.markers.push(FloatingFeedback::new(event.pos, event.reward));
    }

    /// Called from the decay timer
    pub fn decay(&mut self) {
        self.markers.retain_mut(|m| m.decay());
    }

    pub fn markers(&self) -> &[FloatingFeedback] {
        &self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }
}
