//! Game state and core simulation types
//!
//! Everything the simulation owns lives here. The presentation layer reads
//! it for drawing and changes it only through input and phase transitions.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::config::SimConfig;

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, simulation idle
    Menu,
    /// Active run
    Playing,
    /// Run ended by an obstacle hit
    GameOver,
}

/// What a jump input turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Jump from the ground
    First,
    /// The one extra jump allowed while airborne
    Double,
    /// Both jumps already used
    None,
}

/// The player's runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Horizontal position (fixed for the whole run)
    pub x: f32,
    /// Top edge, screen space (larger = lower)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity per tick (negative = up)
    pub velocity_y: f32,
    pub is_jumping: bool,
    /// Second jump still available (only meaningful while jumping)
    pub can_double_jump: bool,
    /// Ticks since run start, drives the run cycle
    pub animation_tick: u32,
}

impl PlayerState {
    /// Player standing on the ground
    pub fn new(config: &SimConfig) -> Self {
        Self {
            x: config.player_x,
            y: config.ground_y(),
            width: config.player_width,
            height: config.player_height,
            velocity_y: 0.0,
            is_jumping: false,
            can_double_jump: false,
            animation_tick: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Sprite index in the run cycle
    pub fn animation_frame(&self, config: &SimConfig) -> u32 {
        let per_frame = config.ticks_per_animation_frame.max(1);
        (self.animation_tick / per_frame) % config.animation_frames.max(1)
    }

    pub fn is_airborne(&self) -> bool {
        self.is_jumping
    }

    /// Handle a jump input
    pub fn jump(&mut self, config: &SimConfig) -> JumpKind {
        if !self.is_jumping {
            self.velocity_y = config.jump_force;
            self.is_jumping = true;
            self.can_double_jump = true;
            JumpKind::First
        } else if self.can_double_jump {
            self.velocity_y = config.jump_force;
            self.can_double_jump = false;
            JumpKind::Double
        } else {
            JumpKind::None
        }
    }

    /// Handle a fast-descend input; ignored on the ground
    pub fn fast_descend(&mut self, config: &SimConfig) -> bool {
        if self.is_airborne() {
            self.velocity_y = config.fast_descend_speed;
            true
        } else {
            false
        }
    }
}

/// Obstacle art variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Crate,
    Spike,
    Boulder,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Crate, ObstacleKind::Spike, ObstacleKind::Boulder];

    /// Art variant number (1-3)
    pub fn variant(&self) -> u8 {
        match self {
            ObstacleKind::Crate => 1,
            ObstacleKind::Spike => 2,
            ObstacleKind::Boulder => 3,
        }
    }

    pub fn from_variant(variant: u8) -> Option<Self> {
        match variant {
            1 => Some(ObstacleKind::Crate),
            2 => Some(ObstacleKind::Spike),
            3 => Some(ObstacleKind::Boulder),
            _ => None,
        }
    }
}

/// Collectible categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Gem,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 2] = [CollectibleKind::Coin, CollectibleKind::Gem];
}

/// Type tag with sub-variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Obstacle(ObstacleKind),
    Collectible(CollectibleKind),
}

/// An obstacle or collectible scrolling through the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: u32,
    pub rect: Rect,
    pub kind: ObjectKind,
}

impl WorldObject {
    pub fn is_obstacle(&self) -> bool {
        matches!(self.kind, ObjectKind::Obstacle(_))
    }

    pub fn is_collectible(&self) -> bool {
        matches!(self.kind, ObjectKind::Collectible(_))
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Seed the current run's RNG was created from (for logs/replays)
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// Ticks elapsed in the current run
    pub time_ticks: u64,
    pub player: PlayerState,
    /// Active objects, in spawn order
    pub objects: Vec<WorldObject>,
    /// Horizontal background scroll, wrapped to the canvas width
    pub background_offset: f32,
    /// Next entity ID
    pub(crate) next_id: u32,
}

impl SimulationState {
    /// Fresh state sitting on the title screen
    pub fn new(seed: u64, config: &SimConfig) -> Self {
        Self {
            seed,
            phase: GamePhase::Menu,
            score: 0,
            time_ticks: 0,
            player: PlayerState::new(config),
            objects: Vec::new(),
            background_offset: 0.0,
            next_id: 1,
        }
    }

    /// Begin a new run (Menu/GameOver -> Playing)
    pub fn start(&mut self, seed: u64, config: &SimConfig) {
        *self = Self::new(seed, config);
        self.phase = GamePhase::Playing;
        log::info!("Run started with seed {}", seed);
    }

    /// Leave the current run for the title screen
    pub fn return_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_double_then_exhausted() {
        let config = SimConfig::default();
        let mut player = PlayerState::new(&config);
        assert_eq!(player.y, config.ground_y());

        assert_eq!(player.jump(&config), JumpKind::First);
        assert_eq!(player.velocity_y, config.jump_force);
        assert!(player.is_jumping);
        assert!(player.can_double_jump);

        player.velocity_y = -3.0;
        assert_eq!(player.jump(&config), JumpKind::Double);
        assert_eq!(player.velocity_y, config.jump_force);
        assert!(!player.can_double_jump);

        player.velocity_y = -3.0;
        assert_eq!(player.jump(&config), JumpKind::None);
        assert_eq!(player.velocity_y, -3.0);
    }

    #[test]
    fn test_fast_descend_only_airborne() {
        let config = SimConfig::default();
        let mut player = PlayerState::new(&config);
        assert!(!player.fast_descend(&config));
        assert_eq!(player.velocity_y, 0.0);

        player.jump(&config);
        assert!(player.fast_descend(&config));
        assert_eq!(player.velocity_y, config.fast_descend_speed);
    }

    #[test]
    fn test_animation_frame_cycle() {
        let config = SimConfig::default();
        let mut player = PlayerState::new(&config);
        let frames: Vec<u32> = (0..48)
            .map(|t| {
                player.animation_tick = t;
                player.animation_frame(&config)
            })
            .collect();
        assert_eq!(frames[0], 0);
        assert_eq!(frames[7], 0);
        assert_eq!(frames[8], 1);
        assert_eq!(frames[39], 4);
        assert_eq!(frames[40], 0);
    }

    #[test]
    fn test_obstacle_variants() {
        for kind in ObstacleKind::ALL {
            assert_eq!(ObstacleKind::from_variant(kind.variant()), Some(kind));
        }
        assert_eq!(ObstacleKind::from_variant(0), None);
        assert_eq!(ObstacleKind::from_variant(4), None);
    }

    #[test]
    fn test_start_resets_run() {
        let config = SimConfig::default();
        let mut state = SimulationState::new(1, &config);
        assert_eq!(state.phase, GamePhase::Menu);

        state.score = 500;
        state.next_entity_id();
        state.start(2, &config);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.seed, 2);
        assert_eq!(state.next_entity_id(), 1);
    }
}
