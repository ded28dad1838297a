//! # Rendering Module
//!
//! Turns a source photo and a frame id into a finished surface.
//!
//! ## Modules
//!
//! - [`compositor`]: the fixed-order framing pipeline
//! - [`loader`]: fetching and decoding source images
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//! use image::RgbaImage;
//! use rand::SeedableRng;
//! use marco::frame::FrameCatalog;
//! use marco::render::{Compositor, ImageSource, RenderRequest};
//!
//! let compositor = Compositor::new(Arc::new(FrameCatalog::festive()));
//! let photo = RgbaImage::new(200, 150);
//! let request = RenderRequest::new(ImageSource::parse("photo.png"), "party");
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//! let surface = compositor.render(&request, &photo, &mut rng);
//! assert_eq!(surface.size(), (350, 340));
//! assert!(surface.hit_region.is_some());
//! ```

pub mod compositor;
pub mod loader;

pub use compositor::{control_region, Compositor, RenderRequest, RenderedSurface, CAPTION_RESERVE};
pub use loader::{HttpImageLoader, ImageLoader, ImageSource};
