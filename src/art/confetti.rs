//! # Confetti
//!
//! Small solid squares in a fixed party palette, scattered over a region.

use rand::Rng;

use crate::canvas::{Paint, Rgba, Surface};

/// Confetti colors; each square picks one uniformly.
pub const CONFETTI_PALETTE: [Rgba; 6] = [
    Rgba::rgb(0xFF, 0x6B, 0x35),
    Rgba::rgb(0xF7, 0x93, 0x1E),
    Rgba::rgb(0xFF, 0xD2, 0x3F),
    Rgba::rgb(0x06, 0xFF, 0xA5),
    Rgba::rgb(0x11, 0x8A, 0xB2),
    Rgba::rgb(0x8A, 0x2B, 0xE2),
];

/// Side length range: `[MIN_SIDE, MIN_SIDE + SIDE_SPREAD)`.
const MIN_SIDE: f32 = 2.0;
const SIDE_SPREAD: f32 = 4.0;

/// Draw `count` confetti squares at random positions within `width` x `height`.
pub fn confetti<S, R>(surface: &mut S, rng: &mut R, width: u32, height: u32, count: usize)
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    for _ in 0..count {
        let color = CONFETTI_PALETTE[rng.random_range(0..CONFETTI_PALETTE.len())];
        let x = rng.random::<f32>() * width as f32;
        let y = rng.random::<f32>() * height as f32;
        let side = MIN_SIDE + rng.random::<f32>() * SIDE_SPREAD;
        surface.fill_rect(x, y, side, side, &Paint::Solid(color));
    }
}
