//! # Marco - Decorative Photo Frames
//!
//! Marco puts photos in festive frames and collects customer feedback
//! about them. It provides:
//!
//! - **Frames**: a catalog of border/accent/decoration specs
//! - **Decorations**: stars, hearts, confetti, waves and rainbow bands
//! - **Compositing**: photo, captions, Download control and watermark on one surface
//! - **Interaction**: mapping clicks on a scaled display back to the control
//! - **Feedback**: validated submissions, persistence, notifications and analytics
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use marco::{
//!     frame::FrameCatalog,
//!     render::{Compositor, HttpImageLoader, ImageSource, RenderRequest},
//! };
//!
//! # async fn example() -> Result<(), marco::MarcoError> {
//! let compositor = Compositor::new(Arc::new(FrameCatalog::festive()));
//! let loader = HttpImageLoader::new()?;
//!
//! let request = RenderRequest::new(ImageSource::parse("beach.jpg"), "tropical")
//!     .title("Summer")
//!     .subtitle("Boracay");
//! let surface = compositor
//!     .load_and_render(&request, &loader, &mut rand::rng())
//!     .await?;
//!
//! std::fs::write("framed.png", surface.to_png()?)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`frame`] | Frame specs and catalogs |
//! | [`art`] | Decorative pattern generators |
//! | [`canvas`] | Raster surface, paints and bitmap text |
//! | [`render`] | Compositor and image loading |
//! | [`interaction`] | Hit regions and pointer scaling |
//! | [`session`] | Event loop for one displayed frame |
//! | [`feedback`] | Feedback form, store, notifier, analytics |
//! | [`config`] | Catalog selection and server settings |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod art;
pub mod canvas;
pub mod config;
pub mod error;
pub mod feedback;
pub mod frame;
pub mod interaction;
pub mod render;
pub mod server;
pub mod session;

// Re-exports for convenience
pub use error::MarcoError;
pub use frame::{FrameCatalog, FrameSpec};
pub use render::{Compositor, RenderRequest, RenderedSurface};
