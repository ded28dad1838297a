//! # Frame Compositor
//!
//! Combines a source photo and a frame into one surface. The pipeline runs
//! in a fixed order, each step drawn over the previous:
//!
//! 1. resolve the frame spec from the catalog
//! 2. size the surface: photo + 2 × border, plus a 40px caption strip when framed
//! 3. start from a transparent surface
//! 4. framed only: diagonal accent/white/accent gradient, the frame's
//!    decoration sequence, a translucent inset border
//! 5. blit the photo at (border, border), unscaled
//! 6. framed only: caption box, Download control (recorded as the hit
//!    region) and the watermark with its little hearts
//!
//! Unframed renders (`none` or an unknown id) are a straight copy of the photo.
//!
//! Every call starts from scratch; nothing is cached between renders.

use image::RgbaImage;
use rand::Rng;
use std::sync::Arc;

use crate::art::{self, heart_path, HEART_PINK};
use crate::canvas::text::{text_width, FontSize};
use crate::canvas::{Canvas, LinearGradient, Paint, Point, Rgba, Surface};
use crate::error::MarcoError;
use crate::frame::{Decoration, FrameCatalog, FrameSpec};
use crate::interaction::HitRegion;

use super::loader::{ImageLoader, ImageSource};

/// Extra height below a framed photo for the control and watermark.
pub const CAPTION_RESERVE: u32 = 40;

/// Download control size and distance from the bottom-right corner.
pub const CONTROL_WIDTH: f32 = 120.0;
pub const CONTROL_HEIGHT: f32 = 40.0;
pub const CONTROL_MARGIN: f32 = 15.0;
const CONTROL_RADIUS: f32 = 8.0;
pub const CONTROL_LABEL: &str = "Download";

/// Default watermark text, drawn bottom-left and followed by a heart.
pub const DEFAULT_WATERMARK: &str = "I love NAGA";
const WATERMARK_MARGIN: i64 = 15;
const WATERMARK_HEART: Rgba = Rgba::rgb(0xE2, 0x1B, 0x3C);

const CAPTION_MAX_WIDTH: usize = 320;
const CAPTION_OFFSET: f32 = 16.0;

/// Wave color for the tropical frame.
const TROPICAL_WAVE: Rgba = Rgba::rgb(0x00, 0xCE, 0xD1);

/// One render: which photo, which frame, optional captions.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub source: ImageSource,
    pub frame_id: String,
    pub caption_title: Option<String>,
    pub caption_subtitle: Option<String>,
}

impl RenderRequest {
    pub fn new(source: ImageSource, frame_id: impl Into<String>) -> Self {
        Self {
            source,
            frame_id: frame_id.into(),
            caption_title: None,
            caption_subtitle: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.caption_title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.caption_subtitle = Some(subtitle.into());
        self
    }
}

/// A finished render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSurface {
    pub canvas: Canvas,
    pub frame_id: String,
    /// Whether frame decorations were drawn (false for passthrough renders).
    pub framed: bool,
    /// Bounds of the Download control, in surface pixels.
    pub hit_region: Option<HitRegion>,
}

impl RenderedSurface {
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn to_png(&self) -> Result<Vec<u8>, MarcoError> {
        self.canvas.to_png()
    }
}

/// Bounds of the Download control on a framed surface of the given size.
pub fn control_region(surface_width: u32, surface_height: u32) -> HitRegion {
    HitRegion {
        x: surface_width as f32 - CONTROL_WIDTH - CONTROL_MARGIN,
        y: surface_height as f32 - CONTROL_HEIGHT - CONTROL_MARGIN,
        width: CONTROL_WIDTH,
        height: CONTROL_HEIGHT,
    }
}

/// Renders framed photos against a catalog.
#[derive(Debug, Clone)]
pub struct Compositor {
    catalog: Arc<FrameCatalog>,
    watermark: String,
}

impl Compositor {
    pub fn new(catalog: Arc<FrameCatalog>) -> Self {
        Self {
            catalog,
            watermark: DEFAULT_WATERMARK.to_string(),
        }
    }

    /// Replace the watermark text. An empty string disables it (hearts included).
    pub fn with_watermark(mut self, watermark: impl Into<String>) -> Self {
        self.watermark = watermark.into();
        self
    }

    pub fn catalog(&self) -> &FrameCatalog {
        &self.catalog
    }

    pub fn catalog_arc(&self) -> Arc<FrameCatalog> {
        self.catalog.clone()
    }

    /// Surface size for a photo of `image_width` x `image_height` in `frame_id`.
    pub fn surface_size(&self, frame_id: &str, image_width: u32, image_height: u32) -> (u32, u32) {
        let spec = self.catalog.resolve(frame_id);
        let reserve = if self.catalog.is_framed(frame_id) { CAPTION_RESERVE } else { 0 };
        let frame = spec.border_width.saturating_mul(2);
        (
            image_width.saturating_add(frame),
            image_height.saturating_add(frame).saturating_add(reserve),
        )
    }

    /// Load the request's source image, then render it.
    pub async fn load_and_render<R: Rng + ?Sized>(
        &self,
        request: &RenderRequest,
        loader: &dyn ImageLoader,
        rng: &mut R,
    ) -> Result<RenderedSurface, MarcoError> {
        let image = loader.load(&request.source).await?;
        Ok(self.render(request, &image, rng))
    }

    /// Render `image` in the request's frame.
    pub fn render<R: Rng + ?Sized>(&self, request: &RenderRequest, image: &RgbaImage, rng: &mut R) -> RenderedSurface {
        let spec = self.catalog.resolve(&request.frame_id);
        let framed = self.catalog.is_framed(&request.frame_id);
        let border = spec.border_width;
        let (width, height) = self.surface_size(&request.frame_id, image.width(), image.height());

        let mut canvas = Canvas::new(width, height);
        canvas.clear();

        if framed {
            fill_background(&mut canvas, spec);
            decorate(&mut canvas, spec, rng);
            canvas.stroke_rect(
                border as f32 - 5.0,
                border as f32 - 5.0,
                image.width() as f32 + 10.0,
                image.height() as f32 + 10.0,
                2.0,
                &Paint::Solid(Rgba::WHITE.with_alpha(0.8)),
            );
        }

        canvas.blit(image, border as i64, border as i64);

        let mut hit_region = None;
        if framed {
            draw_captions(
                &mut canvas,
                request.caption_title.as_deref(),
                request.caption_subtitle.as_deref(),
            );
            let region = control_region(width, height);
            draw_control(&mut canvas, &region, spec.accent);
            hit_region = Some(region);
            self.draw_watermark(&mut canvas, spec.accent, rng);
        }

        tracing::debug!(
            frame = %request.frame_id,
            width,
            height,
            framed,
            "rendered frame"
        );

        RenderedSurface {
            canvas,
            frame_id: request.frame_id.clone(),
            framed,
            hit_region,
        }
    }

    fn draw_watermark<R: Rng + ?Sized>(&self, canvas: &mut Canvas, accent: Rgba, rng: &mut R) {
        if self.watermark.is_empty() {
            return;
        }
        let size = FontSize::Large;
        let baseline = canvas.height() as i64 - WATERMARK_MARGIN;
        // Spleen glyphs sit about three quarters of their height above the baseline
        let top = baseline - (size.char_height() as i64 * 3) / 4;
        let x = WATERMARK_MARGIN;

        canvas.draw_text_outlined(&self.watermark, x, top, size, true, Rgba::WHITE, accent, 1);

        let heart_x = x as f32 + text_width(&self.watermark, size, true) as f32 + 14.0;
        let heart_y = top as f32 + 8.0;
        let outline = heart_path(heart_x, heart_y, 12.0);
        canvas.stroke_polyline(&closed(outline.clone()), 2.0, &Paint::Solid(accent));
        canvas.fill_polygon(&outline, &Paint::Solid(WATERMARK_HEART));

        let paint = Paint::Solid(HEART_PINK);
        for i in 0..3 {
            let hx = x as f32 + (i * 30) as f32 + rng.random::<f32>() * 10.0;
            let hy = baseline as f32 - 30.0 + rng.random::<f32>() * 10.0;
            let size = 3.0 + rng.random::<f32>() * 2.0;
            canvas.fill_polygon(&heart_path(hx, hy, size), &paint);
        }
    }
}

fn closed(mut points: Vec<Point>) -> Vec<Point> {
    if let Some(first) = points.first().copied() {
        points.push(first);
    }
    points
}

/// Diagonal accent → white → accent gradient over the whole surface.
fn fill_background(canvas: &mut Canvas, spec: &FrameSpec) {
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let gradient = LinearGradient::new(Point::new(0.0, 0.0), Point::new(w, h))
        .stop(0.0, spec.accent)
        .stop(0.5, Rgba::WHITE)
        .stop(1.0, spec.accent);
    canvas.fill_rect(0.0, 0.0, w, h, &Paint::Linear(gradient));
}

/// Run the frame's pattern sequence. Order matters: later marks cover earlier ones.
fn decorate<R: Rng + ?Sized>(canvas: &mut Canvas, spec: &FrameSpec, rng: &mut R) {
    let (w, h) = (canvas.width(), canvas.height());
    let b = spec.border_width;

    match spec.decoration {
        Decoration::Celebration => {
            art::star_burst(canvas, rng, w, b, 15);
            art::star_burst(canvas, rng, w, b, 15);
            art::heart(canvas, rng, w, h - b, 10);
        }
        Decoration::Tropical => {
            art::wave(canvas, w, h, TROPICAL_WAVE);
            art::star_burst(canvas, rng, w, h, 20);
        }
        Decoration::Rainbow => {
            art::rainbow_band(canvas, 0.0, w, b);
            art::rainbow_band(canvas, (h - b - CAPTION_RESERVE) as f32, w, b);
        }
        Decoration::Party => {
            art::confetti(canvas, rng, w, h, 30);
            art::star_burst(canvas, rng, w, h, 15);
        }
        Decoration::Festive => {
            art::heart(canvas, rng, w, h, 20);
            art::confetti(canvas, rng, w, h, 25);
        }
        Decoration::Plain => {}
    }
}

/// Shorten `text` so it fits in `max_width` pixels, ending with "...".
fn truncate_to_width(text: &str, size: FontSize, bold: bool, max_width: usize) -> String {
    if text_width(text, size, bold) <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(3 * size.char_width() + usize::from(bold)) / size.char_width();
    let mut out: String = text.chars().take(budget).collect();
    out.push_str("...");
    out
}

/// Title/subtitle box in the top-left corner.
fn draw_captions(canvas: &mut Canvas, title: Option<&str>, subtitle: Option<&str>) {
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    let subtitle = subtitle.map(str::trim).filter(|s| !s.is_empty());
    if title.is_none() && subtitle.is_none() {
        return;
    }

    let pad_x = 12.0;
    let pad_y = 8.0;
    let max_text = CAPTION_MAX_WIDTH.min((canvas.width() as usize).saturating_sub(2 * CAPTION_OFFSET as usize + 24));

    let title = title.map(|t| truncate_to_width(t, FontSize::Medium, true, max_text));
    let subtitle = subtitle.map(|s| truncate_to_width(s, FontSize::Small, false, max_text));

    let title_w = title.as_deref().map_or(0, |t| text_width(t, FontSize::Medium, true));
    let subtitle_w = subtitle.as_deref().map_or(0, |s| text_width(s, FontSize::Small, false));
    let title_h = if title.is_some() { FontSize::Medium.char_height() } else { 0 };
    let subtitle_h = if subtitle.is_some() { FontSize::Small.char_height() } else { 0 };
    let gap = if title.is_some() && subtitle.is_some() { 4 } else { 0 };

    let box_w = title_w.max(subtitle_w) as f32 + 2.0 * pad_x;
    let box_h = (title_h + gap + subtitle_h) as f32 + 2.0 * pad_y;
    canvas.fill_rounded_rect(
        CAPTION_OFFSET,
        CAPTION_OFFSET,
        box_w,
        box_h,
        8.0,
        &Paint::Solid(Rgba::BLACK.with_alpha(0.6)),
    );

    let text_x = (CAPTION_OFFSET + pad_x) as i64;
    let mut text_y = (CAPTION_OFFSET + pad_y) as i64;
    if let Some(title) = &title {
        canvas.draw_text(title, text_x, text_y, FontSize::Medium, true, Rgba::WHITE);
        text_y += (title_h + gap) as i64;
    }
    if let Some(subtitle) = &subtitle {
        canvas.draw_text(subtitle, text_x, text_y, FontSize::Small, false, Rgba::WHITE.with_alpha(0.8));
    }
}

/// The Download button: translucent gradient body, accent border, arrow glyph and label.
fn draw_control(canvas: &mut Canvas, region: &HitRegion, accent: Rgba) {
    let HitRegion { x, y, width, height } = *region;

    let body = LinearGradient::new(Point::new(x, y), Point::new(x + width, y + height))
        .stop(0.0, Rgba::WHITE.with_alpha(0.9))
        .stop(1.0, Rgba::rgb(240, 240, 240).with_alpha(0.9));
    canvas.fill_rounded_rect(x, y, width, height, CONTROL_RADIUS, &Paint::Linear(body));
    canvas.stroke_rounded_rect(x, y, width, height, CONTROL_RADIUS, 2.0, &Paint::Solid(accent));

    let glyph_w = 12.0;
    let gap = 6.0;
    let label_w = text_width(CONTROL_LABEL, FontSize::Medium, true) as f32;
    let content_x = x + (width - (glyph_w + gap + label_w)) / 2.0;
    let mid_y = y + height / 2.0;
    let paint = Paint::Solid(accent);

    // Arrow: shaft, head, tray
    canvas.fill_rect(content_x + 4.0, mid_y - 9.0, 4.0, 8.0, &paint);
    canvas.fill_polygon(
        &[
            Point::new(content_x, mid_y - 1.0),
            Point::new(content_x + glyph_w, mid_y - 1.0),
            Point::new(content_x + glyph_w / 2.0, mid_y + 5.0),
        ],
        &paint,
    );
    canvas.fill_rect(content_x, mid_y + 7.0, glyph_w, 2.0, &paint);

    let label_top = (mid_y - FontSize::Medium.char_height() as f32 / 2.0).round() as i64;
    canvas.draw_text(
        CONTROL_LABEL,
        (content_x + glyph_w + gap).round() as i64,
        label_top,
        FontSize::Medium,
        true,
        accent,
    );
}
