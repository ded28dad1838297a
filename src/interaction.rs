//! # Pointer Interaction
//!
//! A rendered surface is usually shown scaled (fit to a window, a phone
//! screen, ...). Clicks arrive in display pixels; the Download control's
//! [`HitRegion`] is in surface pixels. This module converts between the two
//! and decides whether a click lands on the control.
//!
//! ```
//! use marco::interaction::{HitRegion, PointerEvent, hit};
//!
//! let region = HitRegion { x: 265.0, y: 245.0, width: 120.0, height: 40.0 };
//! // Surface is 400x300, shown at 200x150: every display pixel is 2 surface pixels
//! let click = PointerEvent::new(140.0, 130.0, 200.0, 150.0);
//! assert!(hit(&click, (400, 300), Some(&region)));
//! ```

use serde::{Deserialize, Serialize};

use crate::render::RenderedSurface;

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HitRegion {
    /// Inclusive on every edge.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// `x,y,width,height`, for the `X-Hit-Region` response header.
    pub fn to_header_value(&self) -> String {
        format!("{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// A click in display coordinates, with the size the surface is displayed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub display_width: f32,
    pub display_height: f32,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, display_width: f32, display_height: f32) -> Self {
        Self {
            x,
            y,
            display_width,
            display_height,
        }
    }
}

/// Map a display-space point to surface pixels, scaling x and y independently.
///
/// A zero (or negative) display dimension leaves that axis unscaled.
pub fn scale_to_native(event: &PointerEvent, native_size: (u32, u32)) -> (f32, f32) {
    let scale = |display: f32, native: u32| if display > 0.0 { native as f32 / display } else { 1.0 };
    (
        event.x * scale(event.display_width, native_size.0),
        event.y * scale(event.display_height, native_size.1),
    )
}

/// Whether the click lands inside `region` once scaled to `native_size`.
pub fn hit(event: &PointerEvent, native_size: (u32, u32), region: Option<&HitRegion>) -> bool {
    let Some(region) = region else {
        return false;
    };
    let (x, y) = scale_to_native(event, native_size);
    region.contains(x, y)
}

/// Fire `on_download` if the click hits the surface's control.
///
/// Nothing happens for unframed surfaces, without a callback, or without a
/// hit region. Returns whether the callback ran.
pub fn handle_pointer_event(
    event: &PointerEvent,
    surface: &RenderedSurface,
    on_download: Option<&mut dyn FnMut()>,
) -> bool {
    if !surface.framed {
        return false;
    }
    let Some(callback) = on_download else {
        return false;
    };
    if !hit(event, surface.size(), surface.hit_region.as_ref()) {
        return false;
    }
    callback();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    const REGION: HitRegion = HitRegion {
        x: 100.0,
        y: 50.0,
        width: 120.0,
        height: 40.0,
    };

    fn unscaled(x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(x, y, 400.0, 300.0)
    }

    fn surface(framed: bool, hit_region: Option<HitRegion>) -> RenderedSurface {
        RenderedSurface {
            canvas: Canvas::new(400, 300),
            frame_id: if framed { "party".into() } else { "none".into() },
            framed,
            hit_region,
        }
    }

    #[test]
    fn test_boundary_inclusive() {
        assert!(hit(&unscaled(100.0, 50.0), (400, 300), Some(&REGION)));
        assert!(hit(&unscaled(220.0, 90.0), (400, 300), Some(&REGION)));
        assert!(hit(&unscaled(100.0, 90.0), (400, 300), Some(&REGION)));
    }

    #[test]
    fn test_one_pixel_outside() {
        assert!(!hit(&unscaled(99.0, 60.0), (400, 300), Some(&REGION)));
        assert!(!hit(&unscaled(221.0, 60.0), (400, 300), Some(&REGION)));
        assert!(!hit(&unscaled(150.0, 49.0), (400, 300), Some(&REGION)));
        assert!(!hit(&unscaled(150.0, 91.0), (400, 300), Some(&REGION)));
    }

    #[test]
    fn test_independent_axis_scaling() {
        // Displayed squashed: x halved, y quartered
        let event = PointerEvent::new(50.0, 20.0, 200.0, 75.0);
        assert_eq!(scale_to_native(&event, (400, 300)), (100.0, 80.0));
        assert!(hit(&event, (400, 300), Some(&REGION)));
    }

    #[test]
    fn test_zero_display_size_is_unscaled() {
        let event = PointerEvent::new(12.0, 34.0, 0.0, 0.0);
        assert_eq!(scale_to_native(&event, (400, 300)), (12.0, 34.0));
    }

    #[test]
    fn test_no_region_never_hits() {
        assert!(!hit(&unscaled(150.0, 60.0), (400, 300), None));
    }

    #[test]
    fn test_handle_fires_callback_on_hit() {
        let mut fired = 0;
        let mut on_download = || fired += 1;
        let s = surface(true, Some(REGION));
        assert!(handle_pointer_event(&unscaled(150.0, 60.0), &s, Some(&mut on_download)));
        assert!(!handle_pointer_event(&unscaled(10.0, 10.0), &s, Some(&mut on_download)));
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_handle_noop_cases() {
        let mut fired = false;
        let mut on_download = || fired = true;
        let inside = unscaled(150.0, 60.0);
        assert!(!handle_pointer_event(&inside, &surface(false, Some(REGION)), Some(&mut on_download)));
        assert!(!handle_pointer_event(&inside, &surface(true, None), Some(&mut on_download)));
        assert!(!handle_pointer_event(&inside, &surface(true, Some(REGION)), None));
        assert!(!fired);
    }

    #[test]
    fn test_header_value() {
        assert_eq!(REGION.to_header_value(), "100,50,120,40");
    }
}
