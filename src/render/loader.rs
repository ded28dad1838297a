//! Source image loading.
//!
//! The compositor never fetches anything itself; callers hand it a decoded
//! image. [`ImageLoader`] is the seam for getting one: the default
//! [`HttpImageLoader`] understands URLs, local paths and in-memory bytes.

use async_trait::async_trait;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::MarcoError;

/// Where a source image comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// `http://` or `https://` URL
    Url(String),
    /// Local file
    Path(PathBuf),
    /// Already-fetched encoded bytes (PNG, JPEG, ...)
    Bytes(Arc<Vec<u8>>),
}

impl ImageSource {
    /// Interpret a CLI/API argument: URLs stay URLs, anything else is a path.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ImageSource::Url(trimmed.to_string())
        } else {
            ImageSource::Path(PathBuf::from(trimmed))
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(Arc::new(bytes))
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Url(url) => url.clone(),
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        }
    }
}

/// Fetches and decodes source images.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, source: &ImageSource) -> Result<RgbaImage, MarcoError>;
}

/// Decode encoded image bytes into RGBA8.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, MarcoError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| MarcoError::Image(format!("Failed to decode image: {}", e)))?;
    Ok(image.to_rgba8())
}

/// Largest encoded image accepted from any source.
pub const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;

/// Default loader backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpImageLoader {
    pub fn new() -> Result<Self, MarcoError> {
        let client = reqwest::Client::builder()
            .user_agent("marco/0.1")
            .build()
            .map_err(|e| MarcoError::Load(format!("HTTP client error: {}", e)))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            max_bytes: MAX_IMAGE_BYTES,
        }
    }

    /// Cap on downloaded bodies, [`MAX_IMAGE_BYTES`] by default.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn too_large(&self, url: &str) -> MarcoError {
        MarcoError::Load(format!("Image at {} is larger than {} bytes", url, self.max_bytes))
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, MarcoError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MarcoError::Load(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(MarcoError::Load(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        if response.content_length().is_some_and(|len| len > self.max_bytes as u64) {
            return Err(self.too_large(url));
        }

        // Content-Length may be absent or wrong; count while reading
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| MarcoError::Load(format!("Failed to read image data: {}", e)))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, source: &ImageSource) -> Result<RgbaImage, MarcoError> {
        let bytes: Arc<Vec<u8>> = match source {
            ImageSource::Url(url) => Arc::new(self.fetch(url).await?),
            ImageSource::Path(path) => Arc::new(tokio::fs::read(path).await.map_err(|e| {
                MarcoError::Load(format!("Failed to read {}: {}", path.display(), e))
            })?),
            ImageSource::Bytes(bytes) => bytes.clone(),
        };

        tracing::debug!(source = %source.describe(), bytes = bytes.len(), "decoding source image");

        // Decoding is CPU-bound
        tokio::task::spawn_blocking(move || decode(&bytes))
            .await
            .map_err(|e| MarcoError::Image(format!("Decode task failed: {}", e)))?
    }
}
