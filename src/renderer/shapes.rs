//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::polar_to_cartesian;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        vertices.push(Vertex::at(center, color));
        vertices.push(Vertex::at(center + polar_to_cartesian(radius, theta1), color));
        vertices.push(Vertex::at(center + polar_to_cartesian(radius, theta2), color));
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
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        let inner1 = center + polar_to_cartesian(inner_radius, theta1);
        let outer1 = center + polar_to_cartesian(outer_radius, theta1);
        let inner2 = center + polar_to_cartesian(inner_radius, theta2);
        let outer2 = center + polar_to_cartesian(outer_radius, theta2);

        // Two triangles per segment
        vertices.push(Vertex::at(inner1, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(inner2, color));

        vertices.push(Vertex::at(inner2, color));
        vertices.push(Vertex::at(outer1, color));
        vertices.push(Vertex::at(outer2, color));
    }

    vertices
}

/// Thick line from `a` to `b` as a quad; empty when the points coincide
pub fn segment(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = dir.perp() * (width * 0.5);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    vec![
        Vertex::at(a1, color),
        Vertex::at(a2, color),
        Vertex::at(b1, color),
        Vertex::at(b1, color),
        Vertex::at(a2, color),
        Vertex::at(b2, color),
    ]
}

/// Pin: shaft from `tail` to `head` with a round head
pub fn pin(head: Vec2, tail: Vec2, head_radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = segment(tail, head, 2.5, color);
    vertices.extend(circle(head, head_radius, color, 16));
    vertices
}

/// Seven-segment masks for 0-9, bit 0 = top bar, clockwise, bit 6 = middle
const DIGIT_SEGMENTS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

/// Decimal label drawn as seven-segment bars, centered on `center`
pub fn number(center: Vec2, height: f32, value: u32, color: [f32; 4]) -> Vec<Vertex> {
    let digits: Vec<u32> = value
        .to_string()
        .bytes()
        .map(|b| u32::from(b - b'0'))
        .collect();
    let w = height * 0.5;
    let h = height;
    let gap = height * 0.25;
    let stroke = height * 0.15;
    let total = digits.len() as f32 * w + (digits.len() as f32 - 1.0) * gap;
    let mut origin = center - Vec2::new(total * 0.5, h * 0.5);

    let bars = [
        (Vec2::new(0.0, 0.0), Vec2::new(w, 0.0)),
        (Vec2::new(w, 0.0), Vec2::new(w, h * 0.5)),
        (Vec2::new(w, h * 0.5), Vec2::new(w, h)),
        (Vec2::new(0.0, h), Vec2::new(w, h)),
        (Vec2::new(0.0, h * 0.5), Vec2::new(0.0, h)),
        (Vec2::new(0.0, 0.0), Vec2::new(0.0, h * 0.5)),
        (Vec2::new(0.0, h * 0.5), Vec2::new(w, h * 0.5)),
    ];

    let mut vertices = Vec::new();
    for digit in digits {
        let mask = DIGIT_SEGMENTS[digit as usize];
        for (bit, (a, b)) in bars.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                vertices.extend(segment(origin + *a, origin + *b, stroke, color));
            }
        }
        origin.x += w + gap;
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 5.0, [1.0; 4], 12).len(), 36);
        // Degenerate segment counts are bumped to a triangle
        assert_eq!(circle(Vec2::ZERO, 5.0, [1.0; 4], 0).len(), 9);
    }

    #[test]
    fn test_ring_stays_between_radii() {
        let vertices = ring(Vec2::new(10.0, 10.0), 20.0, 24.0, [1.0; 4], 32);
        assert_eq!(vertices.len(), 32 * 6);
        for v in &vertices {
            let r = Vec2::from(v.position).distance(Vec2::new(10.0, 10.0));
            assert!((19.99..=24.01).contains(&r));
        }
    }

    #[test]
    fn test_segment_width() {
        let vertices = segment(Vec2::ZERO, Vec2::new(0.0, 10.0), 4.0, [1.0; 4]);
        assert_eq!(vertices.len(), 6);
        for v in &vertices {
            assert!((v.position[0].abs() - 2.0).abs() < 1e-5);
        }
        assert!(segment(Vec2::ONE, Vec2::ONE, 4.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_number_segment_counts() {
        // One quad per lit bar
        assert_eq!(number(Vec2::ZERO, 10.0, 1, [1.0; 4]).len(), 2 * 6);
        assert_eq!(number(Vec2::ZERO, 10.0, 8, [1.0; 4]).len(), 7 * 6);
        assert_eq!(number(Vec2::ZERO, 10.0, 10, [1.0; 4]).len(), (2 + 6) * 6);
    }

    #[test]
    fn test_number_is_centered() {
        let vertices = number(Vec2::new(50.0, -20.0), 10.0, 88, [1.0; 4]);
        let (min, max) = vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec2::from(v.position);
                (lo.min(p), hi.max(p))
            },
        );
        let mid = (min + max) * 0.5;
        assert!((mid - Vec2::new(50.0, -20.0)).length() < 1e-3);
    }
}
