//! Frame listing, rendering and hit-testing handlers.

use axum::{
    Json,
    extract::{Multipart, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use image::RgbaImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    canvas::Rgba,
    error::MarcoError,
    interaction::{self, PointerEvent},
    render::{ImageSource, RenderRequest, RenderedSurface, control_region},
};

use super::super::state::AppState;

/// Name of the response header carrying the Download control bounds.
pub const HIT_REGION_HEADER: &str = "x-hit-region";

/// Frame information returned by the API.
#[derive(Debug, Serialize)]
pub struct FrameInfo {
    pub id: String,
    pub border_width: u32,
    pub corner_radius: u32,
    pub accent: Rgba,
    pub shadow: String,
}

/// Request body for the render endpoint.
#[derive(Debug, Deserialize)]
pub struct RenderBody {
    pub image_url: String,
    #[serde(default = "default_frame")]
    pub frame: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Fixes the decoration layout; random when absent.
    pub seed: Option<u64>,
}

fn default_frame() -> String {
    crate::frame::NONE.to_string()
}

/// Request body for the hit-test endpoint.
#[derive(Debug, Deserialize)]
pub struct HitTestBody {
    pub frame: String,
    pub x: f32,
    pub y: f32,
    pub display_width: f32,
    pub display_height: f32,
    pub surface_width: u32,
    pub surface_height: u32,
}

#[derive(Debug, Serialize)]
pub struct HitTestResponse {
    pub download: bool,
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn load_error(e: MarcoError) -> (StatusCode, String) {
    match e {
        MarcoError::Load(_) => (StatusCode::BAD_GATEWAY, e.to_string()),
        _ => (StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// Composite on a blocking thread and encode to PNG.
async fn render_png(
    state: &Arc<AppState>,
    request: RenderRequest,
    image: RgbaImage,
    seed: Option<u64>,
) -> Result<(RenderedSurface, Vec<u8>), (StatusCode, String)> {
    let compositor = state.compositor.clone();
    tokio::task::spawn_blocking(move || {
        let surface = compositor.render(&request, &image, &mut rng_for(seed));
        let png = surface.to_png()?;
        Ok::<_, MarcoError>((surface, png))
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

fn png_response(surface: &RenderedSurface, png: Vec<u8>) -> (HeaderMap, Vec<u8>) {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    if let Some(region) = surface.hit_region {
        if let Ok(value) = HeaderValue::from_str(&region.to_header_value()) {
            headers.insert(HIT_REGION_HEADER, value);
        }
    }
    (headers, png)
}

/// GET /api/frames - List frames in display order.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<FrameInfo>> {
    let catalog = state.catalog();
    let frames = catalog
        .ids()
        .into_iter()
        .map(|id| {
            let spec = catalog.resolve(id);
            FrameInfo {
                id: id.to_string(),
                border_width: spec.border_width,
                corner_radius: spec.corner_radius,
                accent: spec.accent,
                shadow: spec.shadow.clone(),
            }
        })
        .collect();
    Json(frames)
}

/// POST /api/frames/render - Frame an image fetched from a URL.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RenderBody>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut request = RenderRequest::new(ImageSource::Url(body.image_url.trim().to_string()), body.frame);
    request.caption_title = body.title;
    request.caption_subtitle = body.subtitle;

    let image = state.loader.load(&request.source).await.map_err(load_error)?;
    tracing::debug!(frame = %request.frame_id, width = image.width(), height = image.height(), "rendering");

    let (surface, png) = render_png(&state, request, image, body.seed).await?;
    Ok(png_response(&surface, png))
}

/// POST /api/frames/upload - Frame an uploaded image.
///
/// Multipart fields: `image` (required), `frame`, `title`, `subtitle`, `seed`.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut frame = default_frame();
    let mut title = None;
    let mut subtitle = None;
    let mut seed = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "image" {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read image: {}", e)))?;
            image_data = Some(bytes.to_vec());
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read {}: {}", name, e)))?;
        match name.as_str() {
            "frame" => frame = text,
            "title" => title = Some(text),
            "subtitle" => subtitle = Some(text),
            "seed" => {
                seed = Some(
                    text.trim()
                        .parse::<u64>()
                        .map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid seed: {}", text)))?,
                )
            }
            _ => {}
        }
    }

    let image_bytes = image_data.ok_or((StatusCode::BAD_REQUEST, "No image field found".to_string()))?;
    let mut request = RenderRequest::new(ImageSource::from_bytes(image_bytes), frame);
    request.caption_title = title;
    request.caption_subtitle = subtitle;

    let image = state.loader.load(&request.source).await.map_err(load_error)?;
    let (surface, png) = render_png(&state, request, image, seed).await?;
    Ok(png_response(&surface, png))
}

/// POST /api/frames/hit-test - Would this click trigger the download?
pub async fn hit_test(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HitTestBody>,
) -> Json<HitTestResponse> {
    let size = (body.surface_width, body.surface_height);
    let region = state
        .catalog()
        .is_framed(&body.frame)
        .then(|| control_region(size.0, size.1));
    let event = PointerEvent::new(body.x, body.y, body.display_width, body.display_height);
    Json(HitTestResponse {
        download: interaction::hit(&event, size, region.as_ref()),
    })
}
