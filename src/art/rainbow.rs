//! # Rainbow Band
//!
//! A full-width horizontal bar filled with a 7-stop rainbow gradient running
//! left to right.

use crate::canvas::{LinearGradient, Paint, Point, Rgba, Surface};

/// Gradient stops (offset, color), left to right.
pub const RAINBOW_STOPS: [(f32, Rgba); 7] = [
    (0.0, Rgba::rgb(0xFF, 0x00, 0x00)),
    (0.17, Rgba::rgb(0xFF, 0x8C, 0x00)),
    (0.33, Rgba::rgb(0xFF, 0xD7, 0x00)),
    (0.5, Rgba::rgb(0x00, 0xFF, 0x00)),
    (0.67, Rgba::rgb(0x00, 0x00, 0xFF)),
    (0.83, Rgba::rgb(0x8A, 0x2B, 0xE2)),
    (1.0, Rgba::rgb(0xFF, 0x14, 0x93)),
];

/// The rainbow gradient spanning `width` pixels.
pub fn rainbow_gradient(width: u32) -> LinearGradient {
    RAINBOW_STOPS.iter().fold(
        LinearGradient::new(Point::new(0.0, 0.0), Point::new(width as f32, 0.0)),
        |g, &(offset, color)| g.stop(offset, color),
    )
}

/// Fill the band `[0, width) x [y, y + height)` with the rainbow.
pub fn rainbow_band<S: Surface + ?Sized>(surface: &mut S, y: f32, width: u32, height: u32) {
    let paint = Paint::Linear(rainbow_gradient(width));
    surface.fill_rect(0.0, y, width as f32, height as f32, &paint);
}
