//! Scene assembly
//!
//! Turns a simulation snapshot into one triangle list. Nothing here reads
//! back from the GPU or mutates game state.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::{
    CollectibleKind, FloatingFeedback, ObjectKind, ObstacleKind, PlayerState, Rect, SimConfig,
    SimulationState, WorldObject,
};

/// Horizontal leg offsets (fraction of player width) for each run frame
const STRIDE: [f32; 5] = [-0.15, -0.05, 0.1, 0.05, -0.05];

const GROUND_STRIPE_SPACING: f32 = 40.0;

/// Build every vertex for one frame
pub fn build_scene(
    state: &SimulationState,
    feedback: &[FloatingFeedback],
    config: &SimConfig,
    settings: &Settings,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(2048);

    background(&mut vertices, state, config);
    ground(&mut vertices, state, config);

    for object in &state.objects {
        world_object(&mut vertices, object);
    }

    player(&mut vertices, &state.player, config);

    for marker in feedback {
        feedback_marker(&mut vertices, marker, config, settings.reduced_motion);
    }

    vertices
}

fn background(out: &mut Vec<Vertex>, state: &SimulationState, config: &SimConfig) {
    let ground_top = config.ground_top();
    let sky = Rect::new(0.0, 0.0, config.canvas_width, ground_top);
    out.extend(shapes::gradient_rect(&sky, colors::SKY_TOP, colors::SKY_BOTTOM));

    // Far hills drift at half the background speed
    out.extend(shapes::hills(
        config.canvas_width,
        ground_top,
        90.0,
        260.0,
        state.background_offset * 0.5,
        colors::HILLS_FAR,
    ));
    out.extend(shapes::hills(
        config.canvas_width,
        ground_top,
        50.0,
        160.0,
        state.background_offset,
        colors::HILLS_NEAR,
    ));
}

fn ground(out: &mut Vec<Vertex>, state: &SimulationState, config: &SimConfig) {
    let top = config.ground_top();
    out.extend(shapes::rect(
        &Rect::new(0.0, top, config.canvas_width, config.ground_height),
        colors::GROUND,
    ));

    // Stripes move with the obstacles so the floor reads as solid
    let travel = state.time_ticks as f32 * config.scroll_speed;
    let mut x = -(travel.rem_euclid(GROUND_STRIPE_SPACING));
    while x < config.canvas_width {
        out.extend(shapes::rect(
            &Rect::new(
                x,
                top + 12.0,
                GROUND_STRIPE_SPACING * 0.5,
                config.ground_height - 16.0,
            ),
            colors::GROUND_STRIPE,
        ));
        x += GROUND_STRIPE_SPACING;
    }

    out.extend(shapes::rect(
        &Rect::new(0.0, top, config.canvas_width, 6.0),
        colors::GROUND_EDGE,
    ));
}

fn world_object(out: &mut Vec<Vertex>, object: &WorldObject) {
    let r = &object.rect;
    match object.kind {
        ObjectKind::Obstacle(ObstacleKind::Crate) => {
            out.extend(shapes::rect(r, colors::CRATE));
            let band = r.size.y * 0.15;
            out.extend(shapes::rect(
                &Rect::new(r.left(), r.top(), r.size.x, band),
                colors::CRATE_BAND,
            ));
            out.extend(shapes::rect(
                &Rect::new(r.left(), r.bottom() - band, r.size.x, band),
                colors::CRATE_BAND,
            ));
            out.extend(shapes::rect(
                &Rect::new(r.center().x - band * 0.5, r.top(), band, r.size.y),
                colors::CRATE_BAND,
            ));
        }
        ObjectKind::Obstacle(ObstacleKind::Spike) => {
            let teeth = 3;
            let tooth = r.size.x / teeth as f32;
            for i in 0..teeth {
                let left = r.left() + tooth * i as f32;
                out.extend(shapes::triangle(
                    Vec2::new(left, r.bottom()),
                    Vec2::new(left + tooth * 0.5, r.top()),
                    Vec2::new(left + tooth, r.bottom()),
                    colors::SPIKE,
                ));
            }
        }
        ObjectKind::Obstacle(ObstacleKind::Boulder) => {
            let radius = r.size.x.min(r.size.y) * 0.5;
            out.extend(shapes::circle(r.center(), radius, colors::BOULDER, 20));
        }
        ObjectKind::Collectible(CollectibleKind::Coin) => {
            let radius = r.size.x.min(r.size.y) * 0.5;
            out.extend(shapes::circle(r.center(), radius, colors::COIN, 20));
            out.extend(shapes::circle(
                r.center() - Vec2::splat(radius * 0.3),
                radius * 0.25,
                colors::COIN_SHINE,
                10,
            ));
        }
        ObjectKind::Collectible(CollectibleKind::Gem) => {
            out.extend(shapes::diamond(r, colors::GEM));
        }
    }
}

fn player(out: &mut Vec<Vertex>, player: &PlayerState, config: &SimConfig) {
    let r = player.rect();
    let (w, h) = (r.size.x, r.size.y);

    // Legs: stride by run frame on the ground, tucked while airborne
    let leg_w = w * 0.15;
    let leg_top = r.top() + h * 0.7;
    let leg_h = h * 0.3;
    let stride = if player.is_airborne() {
        0.0
    } else {
        STRIDE[player.animation_frame(config) as usize % STRIDE.len()] * w
    };
    let hip = r.left() + w * 0.45;
    out.extend(shapes::rect(
        &Rect::new(hip - leg_w + stride, leg_top, leg_w, leg_h),
        colors::PLAYER_LEGS,
    ));
    out.extend(shapes::rect(
        &Rect::new(hip + leg_w * 0.5 - stride, leg_top, leg_w, leg_h),
        colors::PLAYER_LEGS,
    ));

    out.extend(shapes::rect(
        &Rect::new(r.left() + w * 0.25, r.top() + h * 0.35, w * 0.5, h * 0.38),
        colors::PLAYER_BODY,
    ));
    out.extend(shapes::circle(
        Vec2::new(r.left() + w * 0.55, r.top() + h * 0.2),
        h * 0.18,
        colors::PLAYER_HEAD,
        16,
    ));
}

fn feedback_marker(
    out: &mut Vec<Vertex>,
    marker: &FloatingFeedback,
    config: &SimConfig,
    reduced_motion: bool,
) {
    let anchor = if reduced_motion { marker.pos } else { marker.draw_pos() };
    let center = anchor + Vec2::splat(config.collectible_size * 0.5);
    let color = shapes::with_alpha(colors::FEEDBACK, marker.opacity);
    let arm = 8.0;
    let thickness = 3.0;

    out.extend(shapes::ring(center, 12.0, 15.0, color, 20));
    // Plus sign
    out.extend(shapes::rect(
        &Rect::new(center.x - arm, center.y - thickness * 0.5, arm * 2.0, thickness),
        color,
    ));
    out.extend(shapes::rect(
        &Rect::new(center.x - thickness * 0.5, center.y - arm, thickness, arm * 2.0),
        color,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with(objects: Vec<WorldObject>) -> Vec<Vertex> {
        let config = SimConfig::default();
        let mut state = SimulationState::new(1, &config);
        state.objects = objects;
        build_scene(&state, &[], &config, &Settings::default())
    }

    #[test]
    fn test_scene_is_triangle_list() {
        let vertices = scene_with(Vec::new());
        assert!(!vertices.is_empty());
        assert_eq!(vertices.len() % 3, 0);
    }

    #[test]
    fn test_objects_add_geometry() {
        let empty = scene_with(Vec::new()).len();
        let one = scene_with(vec![WorldObject {
            id: 1,
            rect: Rect::new(400.0, 310.0, 40.0, 40.0),
            kind: ObjectKind::Obstacle(ObstacleKind::Spike),
        }])
        .len();
        assert_eq!(one - empty, 9);
    }

    #[test]
    fn test_feedback_fades_with_opacity() {
        let config = SimConfig::default();
        let state = SimulationState::new(1, &config);
        let mut marker = FloatingFeedback::new(Vec2::new(100.0, 100.0), 100);
        marker.opacity = 0.5;

        let base = build_scene(&state, &[], &config, &Settings::default()).len();
        let vertices = build_scene(&state, &[marker], &config, &Settings::default());
        assert!(vertices[base..].iter().all(|v| (v.color[3] - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_reduced_motion_pins_markers() {
        let config = SimConfig::default();
        let state = SimulationState::new(1, &config);
        let fresh = FloatingFeedback::new(Vec2::new(200.0, 150.0), 100);
        let mut risen = fresh.clone();
        for _ in 0..5 {
            risen.decay();
        }
        assert!(risen.rise > 0.0);

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let base = build_scene(&state, &[], &config, &calm).len();
        let positions = |marker: &FloatingFeedback, settings: &Settings| -> Vec<[f32; 2]> {
            build_scene(&state, std::slice::from_ref(marker), &config, settings)[base..]
                .iter()
                .map(|v| v.position)
                .collect()
        };

        // Pinned markers only fade; animated ones drift upward
        assert_eq!(positions(&risen, &calm), positions(&fresh, &calm));
        assert_ne!(
            positions(&risen, &Settings::default()),
            positions(&fresh, &Settings::default())
        );
    }

    #[test]
    fn test_run_cycle_moves_legs() {
        let config = SimConfig::default();
        let mut a = PlayerState::new(&config);
        let mut b = a.clone();
        a.animation_tick = 0;
        b.animation_tick = config.ticks_per_animation_frame * 2;

        let mut va = Vec::new();
        let mut vb = Vec::new();
        player(&mut va, &a, &config);
        player(&mut vb, &b, &config);
        assert_ne!(va, vb);
    }
}
