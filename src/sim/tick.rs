//! Per-frame simulation tick
//!
//! Core game loop that advances simulation deterministically. `tick` never
//! mutates its input: it returns the next state plus the events the
//! presentation layer should react to (sounds, feedback markers, game over).

use rand::Rng;

use super::autopilot;
use super::collision::{FeedbackEvent, resolve};
use super::config::SimConfig;
use super::physics::advance;
use super::spawner::{scroll_and_cull, spawn};
use super::state::{GamePhase, JumpKind, SimulationState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump (space/up/tap)
    pub jump: bool,
    /// Fast-descend (down)
    pub fast_descend: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Combine buffered one-shot inputs
    pub fn merge(self, other: TickInput) -> TickInput {
        TickInput {
            jump: self.jump || other.jump,
            fast_descend: self.fast_descend || other.fast_descend,
            idle_mode: self.idle_mode || other.idle_mode,
        }
    }
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Jumped,
    DoubleJumped,
    /// A collectible was consumed
    Collected(FeedbackEvent),
    /// Obstacle hit; the run is over with this final score
    Crashed { score: u64 },
}

/// Result of one tick
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub state: SimulationState,
    pub events: Vec<GameEvent>,
}

impl TickOutcome {
    fn unchanged(state: &SimulationState) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
        }
    }

    pub fn crashed(&self) -> bool {
        self.events.iter().any(|e| matches!(e, GameEvent::Crashed { .. }))
    }
}

/// Advance the game state by one tick
///
/// Order: inputs, player physics, background scroll, spawner, collisions,
/// time score. An obstacle hit discards everything else the tick did: the
/// returned state is the pre-tick state moved to `GameOver`.
pub fn tick<R: Rng + ?Sized>(
    state: &SimulationState,
    input: &TickInput,
    config: &SimConfig,
    rng: &mut R,
) -> TickOutcome {
    if state.phase != GamePhase::Playing {
        return TickOutcome::unchanged(state);
    }

    let mut input = *input;
    if input.idle_mode {
        input = input.merge(autopilot::decide(state, config));
    }

    let mut next = state.clone();
    let mut events = Vec::new();

    if input.jump {
        match next.player.jump(config) {
            JumpKind::First => events.push(GameEvent::Jumped),
            JumpKind::Double => events.push(GameEvent::DoubleJumped),
            JumpKind::None => {}
        }
    }
    if input.fast_descend {
        next.player.fast_descend(config);
    }

    next.player = advance(&next.player, config);

    if config.canvas_width > 0.0 {
        next.background_offset =
            (next.background_offset + config.background_scroll_speed) % config.canvas_width;
    }

    spawn(&mut next.objects, config, rng, &mut next.next_id);
    scroll_and_cull(&mut next.objects, config);

    let resolution = resolve(&next.player.rect(), std::mem::take(&mut next.objects), config);
    if resolution.terminal {
        log::info!(
            "Crashed after {} ticks with score {}",
            state.time_ticks,
            state.score
        );
        let mut over = state.clone();
        over.phase = GamePhase::GameOver;
        return TickOutcome {
            events: vec![GameEvent::Crashed { score: over.score }],
            state: over,
        };
    }

    next.objects = resolution.objects;
    next.score += resolution.score_delta + config.score_per_tick;
    next.time_ticks += 1;
    events.extend(resolution.feedback.into_iter().map(GameEvent::Collected));

    TickOutcome {
        state: next,
        events,
    }
}
