//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in world space (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Multiply a color's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(r, color, color)
}

/// Rectangle with a vertical gradient (top color to bottom color)
pub fn gradient_rect(r: &Rect, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let (l, rt, t, b) = (r.left(), r.right(), r.top(), r.bottom());
    vec![
        Vertex::new(l, t, top),
        Vertex::new(l, b, bottom),
        Vertex::new(rt, t, top),
        Vertex::new(rt, t, top),
        Vertex::new(l, b, bottom),
        Vertex::new(rt, b, bottom),
    ]
}

/// Generate vertices for a single triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Diamond inscribed in a rectangle
pub fn diamond(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let c = r.center();
    let top = Vec2::new(c.x, r.top());
    let bottom = Vec2::new(c.x, r.bottom());
    let left = Vec2::new(r.left(), c.y);
    let right = Vec2::new(r.right(), c.y);

    let mut vertices = triangle(top, left, right, color);
    vertices.extend(triangle(left, bottom, right, color));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Rolling hill silhouette: a row of half-circles resting on `base_y`
///
/// Hills repeat every `spacing` pixels and are shifted left by `offset`, so
/// the row tiles seamlessly as the offset wraps.
pub fn hills(
    width: f32,
    base_y: f32,
    radius: f32,
    spacing: f32,
    offset: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    if spacing <= 0.0 {
        return vertices;
    }
    let shift = offset.rem_euclid(spacing);
    let mut x = -shift;
    while x < width + spacing {
        let center = Vec2::new(x, base_y);
        for v in circle(center, radius, color, 16) {
            // Flatten the lower half onto the base line
            vertices.push(Vertex::new(v.position[0], v.position[1].min(base_y), v.color));
        }
        x += spacing;
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        let vertices = rect(&r, [1.0; 4]);
        assert_eq!(vertices.len(), 6);
        for v in &vertices {
            assert!(v.position[0] == 10.0 || v.position[0] == 40.0);
            assert!(v.position[1] == 20.0 || v.position[1] == 60.0);
        }
    }

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 5.0, [1.0; 4], 12).len(), 36);
        assert_eq!(ring(Vec2::ZERO, 3.0, 5.0, [1.0; 4], 12).len(), 72);
    }

    #[test]
    fn test_diamond_stays_inside_rect() {
        let r = Rect::new(0.0, 0.0, 30.0, 30.0);
        for v in diamond(&r, [1.0; 4]) {
            assert!((0.0..=30.0).contains(&v.position[0]));
            assert!((0.0..=30.0).contains(&v.position[1]));
        }
    }

    #[test]
    fn test_hills_never_dip_below_base() {
        for v in hills(800.0, 300.0, 60.0, 150.0, 37.0, [1.0; 4]) {
            assert!(v.position[1] <= 300.0);
        }
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha([1.0, 1.0, 1.0, 0.5], 0.5)[3], 0.25);
        assert_eq!(with_alpha([1.0; 4], -1.0)[3], 0.0);
    }
}
