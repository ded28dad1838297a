//! # Star Burst
//!
//! Small gold stars scattered uniformly over a region. Each star is a
//! 5-vertex outline alternating between the outer radius and half of it,
//! stepping `2π/5` per vertex.

use rand::Rng;
use std::f32::consts::PI;

use crate::canvas::{Paint, Point, Rgba, Surface};

/// Fill color of every star (`#FFD700`).
pub const STAR_GOLD: Rgba = Rgba::rgb(0xFF, 0xD7, 0x00);

/// Outer radius range: `[MIN_RADIUS, MIN_RADIUS + RADIUS_SPREAD)`.
const MIN_RADIUS: f32 = 3.0;
const RADIUS_SPREAD: f32 = 4.0;

/// Outline of one star centered on (x, y).
pub fn star_path(x: f32, y: f32, radius: f32) -> Vec<Point> {
    (0..5)
        .map(|j| {
            let angle = j as f32 * 2.0 * PI / 5.0;
            let r = if j % 2 == 0 { radius } else { radius / 2.0 };
            Point::new(x + angle.cos() * r, y + angle.sin() * r)
        })
        .collect()
}

/// Draw `count` stars at random positions within `width` x `height`.
pub fn star_burst<S, R>(surface: &mut S, rng: &mut R, width: u32, height: u32, count: usize)
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    let paint = Paint::Solid(STAR_GOLD);
    for _ in 0..count {
        let x = rng.random::<f32>() * width as f32;
        let y = rng.random::<f32>() * height as f32;
        let radius = MIN_RADIUS + rng.random::<f32>() * RADIUS_SPREAD;
        surface.fill_polygon(&star_path(x, y, radius), &paint);
    }
}
