//! # Hearts
//!
//! Pink hearts scattered over a region. A heart of size `s` at (x, y) is two
//! upper semicircles of radius `s/2` centered at `(x - s/2, y)` and
//! `(x + s/2, y)`, closed by a point at `(x, y + s)`.

use rand::Rng;
use std::f32::consts::PI;

use crate::canvas::{arc_points, Paint, Point, Rgba, Surface};

/// Fill color of every heart (`#FF69B4`).
pub const HEART_PINK: Rgba = Rgba::rgb(0xFF, 0x69, 0xB4);

/// Size range: `[MIN_SIZE, MIN_SIZE + SIZE_SPREAD)`, i.e. [4, 10).
const MIN_SIZE: f32 = 4.0;
const SIZE_SPREAD: f32 = 6.0;

/// Segments per semicircle when flattening.
const ARC_SEGMENTS: usize = 8;

/// Outline of one heart.
pub fn heart_path(x: f32, y: f32, size: f32) -> Vec<Point> {
    let r = size / 2.0;
    let mut path = arc_points(Point::new(x - r, y), r, PI, 2.0 * PI, ARC_SEGMENTS);
    path.extend(arc_points(Point::new(x + r, y), r, PI, 2.0 * PI, ARC_SEGMENTS));
    path.push(Point::new(x, y + size));
    path
}

/// Draw `count` hearts at random positions within `width` x `height`.
pub fn heart<S, R>(surface: &mut S, rng: &mut R, width: u32, height: u32, count: usize)
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    let paint = Paint::Solid(HEART_PINK);
    for _ in 0..count {
        let x = rng.random::<f32>() * width as f32;
        let y = rng.random::<f32>() * height as f32;
        let size = MIN_SIZE + rng.random::<f32>() * SIZE_SPREAD;
        surface.fill_polygon(&heart_path(x, y, size), &paint);
    }
}
