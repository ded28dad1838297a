//! # Waves
//!
//! Horizontal sinusoidal strokes across the top of a region.
//!
//! ## Formula
//!
//! ```text
//! y(i, x) = 15 + i * 10 + 8 * sin(x / 20)    for i in 0..5, x = 0, 10, 20, ... < width
//! ```

use crate::canvas::{Paint, Point, Rgba, Surface};

/// Parameters for the wave strokes.
#[derive(Debug, Clone)]
pub struct Params {
    /// Number of strokes. Default: 5
    pub lines: usize,
    /// Vertical offset of the first stroke. Default: 15.0
    pub base: f32,
    /// Vertical distance between strokes. Default: 10.0
    pub spacing: f32,
    /// Sine amplitude. Default: 8.0
    pub amplitude: f32,
    /// Sine period divisor. Default: 20.0
    pub period: f32,
    /// Horizontal sampling step. Default: 10
    pub step: usize,
    /// Stroke width. Default: 3.0
    pub line_width: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            lines: 5,
            base: 15.0,
            spacing: 10.0,
            amplitude: 8.0,
            period: 20.0,
            step: 10,
            line_width: 3.0,
        }
    }
}

/// Sampled points of stroke `index`.
pub fn stroke_points(index: usize, width: u32, params: &Params) -> Vec<Point> {
    (0..width as usize)
        .step_by(params.step.max(1))
        .map(|x| {
            let xf = x as f32;
            let y = params.base + index as f32 * params.spacing + params.amplitude * (xf / params.period).sin();
            Point::new(xf, y)
        })
        .collect()
}

/// Draw the default wave strokes in `color`.
///
/// `height` is accepted for symmetry with the other generators; the strokes
/// sit in a fixed band near the top.
pub fn wave<S: Surface + ?Sized>(surface: &mut S, width: u32, _height: u32, color: Rgba) {
    wave_with(surface, width, color, &Params::default());
}

/// Draw wave strokes with custom parameters.
pub fn wave_with<S: Surface + ?Sized>(surface: &mut S, width: u32, color: Rgba, params: &Params) {
    let paint = Paint::Solid(color);
    for i in 0..params.lines {
        let points = stroke_points(i, width, params);
        surface.stroke_polyline(&points, params.line_width, &paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art::testing::{Call, Recorder};

    #[test]
    fn test_five_strokes_width_three() {
        let mut rec = Recorder::default();
        wave(&mut rec, 100, 100, Rgba::rgb(0, 206, 209));
        assert_eq!(rec.calls.len(), 5);
        for call in &rec.calls {
            match call {
                Call::Polyline(points, width, paint) => {
                    assert_eq!(*width, 3.0);
                    assert_eq!(points.len(), 10);
                    assert_eq!(paint, &Paint::Solid(Rgba::rgb(0, 206, 209)));
                }
                other => panic!("unexpected call {:?}", other),
            }
        }
    }

    #[test]
    fn test_stroke_formula() {
        let params = Params::default();
        let points = stroke_points(2, 50, &params);
        let xs: Vec<f32> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0, 30.0, 40.0]);
        assert_eq!(points[0].y, 35.0);
        let expected = 35.0 + 8.0 * (20.0f32 / 20.0).sin();
        assert!((points[2].y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_zero_width_draws_nothing_visible() {
        let mut rec = Recorder::default();
        wave(&mut rec, 0, 10, Rgba::BLACK);
        for call in &rec.calls {
            if let Call::Polyline(points, _, _) = call {
                assert!(points.is_empty());
            }
        }
    }
}
