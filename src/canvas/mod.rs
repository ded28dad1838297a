//! # Drawing Surface
//!
//! A small 2D raster canvas over an RGBA8 pixel buffer. Shapes are rasterized
//! by sampling pixel centers (no anti-aliasing) and composited source-over.
//!
//! Pattern generators only depend on the [`Surface`] trait, so they can draw
//! onto a [`Canvas`] or onto any other implementation (tests use a recording
//! surface to check counts, bounds and colors).
//!
//! ## Example
//!
//! ```
//! use marco::canvas::{Canvas, Paint, Point, Rgba, Surface};
//!
//! let mut canvas = Canvas::new(32, 32);
//! canvas.fill_rect(4.0, 4.0, 8.0, 8.0, &Paint::Solid(Rgba::rgb(255, 0, 0)));
//! assert_eq!(canvas.pixel(5, 5), Rgba::rgb(255, 0, 0));
//! assert_eq!(canvas.pixel(20, 20), Rgba::TRANSPARENT);
//! ```

pub mod paint;
pub mod text;

pub use paint::{LinearGradient, Paint, Rgba};
pub use text::FontSize;

use image::{ImageFormat, RgbaImage};
use std::f32::consts::PI;
use std::io::Cursor;

use crate::error::MarcoError;

/// A point in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Drawing operations the decorative generators need.
pub trait Surface {
    /// Fill a closed polygon (nonzero winding rule).
    fn fill_polygon(&mut self, points: &[Point], paint: &Paint);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: &Paint);

    /// Stroke an open polyline with the given line width (round caps and joins).
    fn stroke_polyline(&mut self, points: &[Point], line_width: f32, paint: &Paint);
}

/// RGBA8 raster canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Read a pixel. Out-of-bounds reads return transparent.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        if x >= self.width() || y >= self.height() {
            return Rgba::TRANSPARENT;
        }
        let p = self.image.get_pixel(x, y).0;
        Rgba::new(p[0], p[1], p[2], p[3])
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            p.0 = [0, 0, 0, 0];
        }
    }

    /// Composite a color over the pixel at (x, y), ignoring out-of-bounds writes.
    #[inline]
    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        let dst = Rgba::new(px.0[0], px.0[1], px.0[2], px.0[3]);
        let out = color.over(dst);
        px.0 = [out.r, out.g, out.b, out.a];
    }

    /// Pixel index range whose centers may fall inside [min, max].
    fn span(&self, min: f32, max: f32, limit: u32) -> (i64, i64) {
        let lo = (min - 0.5).floor().max(0.0) as i64;
        let hi = ((max - 0.5).ceil() as i64).min(limit as i64 - 1);
        (lo, hi)
    }

    fn bounds(points: &[Point]) -> (f32, f32, f32, f32) {
        points.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        )
    }

    /// Stroke the outline of a rectangle, centered on its edges.
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32, paint: &Paint) {
        let half = line_width / 2.0;
        // Four non-overlapping bands so translucent strokes blend once per pixel
        self.fill_rect(x - half, y - half, width + line_width, line_width, paint);
        self.fill_rect(x - half, y + height - half, width + line_width, line_width, paint);
        self.fill_rect(x - half, y + half, line_width, height - line_width, paint);
        self.fill_rect(x + width - half, y + half, line_width, height - line_width, paint);
    }

    /// Fill a rectangle with rounded corners.
    pub fn fill_rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32, paint: &Paint) {
        let path = rounded_rect_path(x, y, width, height, radius);
        self.fill_polygon(&path, paint);
    }

    /// Stroke the outline of a rounded rectangle.
    pub fn stroke_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        line_width: f32,
        paint: &Paint,
    ) {
        let mut path = rounded_rect_path(x, y, width, height, radius);
        if let Some(first) = path.first().copied() {
            path.push(first);
        }
        self.stroke_polyline(&path, line_width, paint);
    }

    /// Draw `src` with its top-left corner at (x, y), at native resolution.
    pub fn blit(&mut self, src: &RgbaImage, x: i64, y: i64) {
        for (sx, sy, p) in src.enumerate_pixels() {
            self.blend(x + sx as i64, y + sy as i64, Rgba::new(p.0[0], p.0[1], p.0[2], p.0[3]));
        }
    }

    /// Encode the canvas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, MarcoError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| MarcoError::Image(format!("Failed to encode PNG: {}", e)))?;
        Ok(buffer.into_inner())
    }
}

impl Surface for Canvas {
    fn fill_polygon(&mut self, points: &[Point], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let (x0, y0, x1, y1) = Self::bounds(points);
        let (px0, px1) = self.span(x0, x1, self.width());
        let (py0, py1) = self.span(y0, y1, self.height());

        for py in py0..=py1 {
            for px in px0..=px1 {
                let center = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                if winding_number(points, center) != 0 {
                    let color = paint.color_at(center);
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: &Paint) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        // Pixels whose centers lie in [x, x+w) x [y, y+h)
        let px0 = (x - 0.5).ceil().max(0.0) as i64;
        let px1 = ((x + width - 0.5).ceil() as i64).min(self.width() as i64);
        let py0 = (y - 0.5).ceil().max(0.0) as i64;
        let py1 = ((y + height - 0.5).ceil() as i64).min(self.height() as i64);

        for py in py0..py1 {
            for px in px0..px1 {
                let color = paint.color_at(Point::new(px as f32 + 0.5, py as f32 + 0.5));
                self.blend(px, py, color);
            }
        }
    }

    fn stroke_polyline(&mut self, points: &[Point], line_width: f32, paint: &Paint) {
        if points.len() < 2 || line_width <= 0.0 {
            return;
        }
        let half = line_width / 2.0;
        let (x0, y0, x1, y1) = Self::bounds(points);
        let (px0, px1) = self.span(x0 - half, x1 + half, self.width());
        let (py0, py1) = self.span(y0 - half, y1 + half, self.height());

        // Coverage is a union over segments, so each pixel blends at most once
        for py in py0..=py1 {
            for px in px0..=px1 {
                let center = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                let hit = points
                    .windows(2)
                    .any(|seg| segment_distance(center, seg[0], seg[1]) <= half);
                if hit {
                    let color = paint.color_at(center);
                    self.blend(px, py, color);
                }
            }
        }
    }
}

/// Winding number of `p` with respect to a closed polygon.
fn winding_number(points: &[Point], p: Point) -> i32 {
    let n = points.len();
    let mut wn = 0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let cross = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
        if a.y <= p.y {
            if b.y > p.y && cross > 0.0 {
                wn += 1;
            }
        } else if b.y <= p.y && cross < 0.0 {
            wn -= 1;
        }
    }
    wn
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let cx = a.x + t * dx;
    let cy = a.y + t * dy;
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// Flatten a circular arc into points, sweeping clockwise on screen
/// (increasing angle, y pointing down) from `start` to `end`.
pub fn arc_points(center: Point, radius: f32, start: f32, end: f32, segments: usize) -> Vec<Point> {
    let mut end = end;
    while end <= start {
        end += 2.0 * PI;
    }
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let a = start + (end - start) * i as f32 / segments as f32;
            Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// Closed outline of a rounded rectangle (clockwise from the top-left arc).
pub fn rounded_rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Vec<Point> {
    let r = radius.max(0.0).min(width / 2.0).min(height / 2.0);
    if r <= 0.0 {
        return vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ];
    }
    let mut path = Vec::with_capacity(40);
    path.extend(arc_points(Point::new(x + r, y + r), r, PI, 1.5 * PI, 8));
    path.extend(arc_points(Point::new(x + width - r, y + r), r, 1.5 * PI, 2.0 * PI, 8));
    path.extend(arc_points(Point::new(x + width - r, y + height - r), r, 0.0, 0.5 * PI, 8));
    path.extend(arc_points(Point::new(x + r, y + height - r), r, 0.5 * PI, PI, 8));
    path
}
