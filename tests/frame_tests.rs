//! # Frame Rendering Tests
//!
//! End-to-end checks of the public rendering API: surface geometry for every
//! catalog, fallback behavior, decoration no-ops, determinism, and the
//! session's last-request-wins ordering.

use async_trait::async_trait;
use image::{Rgba as Px, RgbaImage};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

use marco::art::{confetti, heart, star_burst};
use marco::canvas::Canvas;
use marco::frame::FrameCatalog;
use marco::interaction::{PointerEvent, hit};
use marco::render::{CAPTION_RESERVE, Compositor, ImageLoader, ImageSource, RenderRequest, control_region};
use marco::session::{FrameSession, SessionStatus};
use marco::MarcoError;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn photo(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| Px([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 128, 255]))
}

fn request(frame: &str) -> RenderRequest {
    RenderRequest::new(ImageSource::parse("photo.png"), frame)
}

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[test]
fn test_surface_size_for_every_frame() {
    for catalog in [FrameCatalog::festive(), FrameCatalog::classic()] {
        let compositor = Compositor::new(Arc::new(catalog.clone()));
        for id in catalog.ids() {
            let spec = catalog.resolve(id);
            let surface = compositor.render(&request(id), &photo(123, 77), &mut rng(1));
            let reserve = if catalog.is_framed(id) { CAPTION_RESERVE } else { 0 };
            assert_eq!(
                surface.size(),
                (123 + 2 * spec.border_width, 77 + 2 * spec.border_width + reserve),
                "frame {}",
                id
            );
        }
    }
}

#[test]
fn test_unknown_frame_resolves_to_none() {
    let catalog = FrameCatalog::festive();
    assert_eq!(catalog.resolve("nonexistent"), catalog.resolve("none"));

    let compositor = Compositor::new(Arc::new(catalog));
    let img = photo(40, 30);
    let surface = compositor.render(&request("nonexistent"), &img, &mut rng(1));
    assert_eq!(surface.size(), (40, 30));
    assert!(surface.hit_region.is_none());
    assert_eq!(surface.canvas.image(), &img);
}

#[test]
fn test_hit_region_matches_control() {
    let compositor = Compositor::new(Arc::new(FrameCatalog::festive()));
    let surface = compositor.render(&request("party"), &photo(200, 150), &mut rng(3));
    let (w, h) = surface.size();
    let region = surface.hit_region.unwrap();
    assert_eq!(region, control_region(w, h));

    // Displayed at exactly half size
    let (dw, dh) = (w as f32 / 2.0, h as f32 / 2.0);
    let top_left = PointerEvent::new(region.x / 2.0, region.y / 2.0, dw, dh);
    assert!(hit(&top_left, (w, h), Some(&region)));
    let above = PointerEvent::new(region.x / 2.0, (region.y - 2.0) / 2.0, dw, dh);
    assert!(!hit(&above, (w, h), Some(&region)));
}

// ============================================================================
// DECORATIONS
// ============================================================================

#[test]
fn test_zero_count_generators_are_noops() {
    let mut canvas = Canvas::new(50, 50);
    canvas.clear();
    let before = canvas.clone();
    let mut r = rng(9);
    star_burst(&mut canvas, &mut r, 50, 50, 0);
    heart(&mut canvas, &mut r, 50, 50, 0);
    confetti(&mut canvas, &mut r, 50, 50, 0);
    assert!(canvas == before);
}

// ============================================================================
// DETERMINISM
// ============================================================================

#[test]
fn test_same_seed_same_pixels() {
    let compositor = Compositor::new(Arc::new(FrameCatalog::festive()));
    let img = photo(90, 60);
    for id in ["celebration", "tropical", "rainbow", "party", "festive"] {
        let req = request(id).title("Beach day").subtitle("2024");
        let a = compositor.render(&req, &img, &mut rng(42));
        let b = compositor.render(&req, &img, &mut rng(42));
        assert!(a == b, "frame {} differs with the same seed", id);
    }
}

#[test]
fn test_different_seeds_keep_photo_and_control() {
    let compositor = Compositor::new(Arc::new(FrameCatalog::festive()));
    let img = photo(90, 60);
    let a = compositor.render(&request("celebration"), &img, &mut rng(1));
    let b = compositor.render(&request("celebration"), &img, &mut rng(2));
    assert_eq!(a.size(), b.size());
    assert_eq!(a.hit_region, b.hit_region);

    let border = FrameCatalog::festive().resolve("celebration").border_width;
    for (x, y) in [(0, 0), (45, 30), (89, 59)] {
        assert_eq!(a.canvas.pixel(border + x, border + y), b.canvas.pixel(border + x, border + y));
    }
}

#[test]
fn test_png_encoding() {
    let compositor = Compositor::new(Arc::new(FrameCatalog::classic()));
    let surface = compositor.render(&request("gold"), &photo(20, 20), &mut rng(5));
    let png = surface.to_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), surface.size());
}

// ============================================================================
// SESSION
// ============================================================================

/// Loader whose images can be held back until released.
struct HeldLoader {
    sizes: HashMap<&'static str, (u32, u32)>,
    held: HashMap<&'static str, Arc<Notify>>,
}

#[async_trait]
impl ImageLoader for HeldLoader {
    async fn load(&self, source: &ImageSource) -> Result<RgbaImage, MarcoError> {
        let ImageSource::Url(url) = source else {
            return Err(MarcoError::Load("unsupported".into()));
        };
        if let Some(gate) = self.held.get(url.as_str()) {
            gate.notified().await;
        }
        let (w, h) = self.sizes[url.as_str()];
        Ok(photo(w, h))
    }
}

#[tokio::test]
async fn test_last_request_wins() {
    let release_first = Arc::new(Notify::new());
    let loader = HeldLoader {
        sizes: HashMap::from([("first", (10, 10)), ("second", (30, 20))]),
        held: HashMap::from([("first", release_first.clone())]),
    };
    let handle = FrameSession::spawn_with_rng(
        Compositor::new(Arc::new(FrameCatalog::festive())),
        Arc::new(loader),
        None,
        rng(11),
    );

    handle.render(RenderRequest::new(ImageSource::Url("first".into()), "party"));
    handle.render(RenderRequest::new(ImageSource::Url("second".into()), "rainbow"));

    let mut rx = handle.subscribe();
    rx.wait_for(|s| s.surface().is_some()).await.unwrap();

    release_first.notify_one();
    let state = rx.wait_for(|s| s.discarded == 1).await.unwrap().clone();
    let SessionStatus::Ready(surface) = &state.status else {
        panic!("expected a ready surface, got {:?}", state.status);
    };
    assert_eq!(surface.frame_id, "rainbow");
    let border = FrameCatalog::festive().resolve("rainbow").border_width;
    assert_eq!(surface.size(), (30 + 2 * border, 20 + 2 * border + CAPTION_RESERVE));
    handle.shutdown();
}
