//! Server state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::MarcoError;
use crate::feedback::FeedbackService;
use crate::frame::FrameCatalog;
use crate::render::{Compositor, HttpImageLoader, ImageLoader};

/// Application state shared across handlers.
pub struct AppState {
    pub compositor: Compositor,
    pub loader: Arc<dyn ImageLoader>,
    pub feedback: FeedbackService,
}

impl AppState {
    pub fn new(compositor: Compositor, loader: Arc<dyn ImageLoader>, feedback: FeedbackService) -> Self {
        Self {
            compositor,
            loader,
            feedback,
        }
    }

    /// Wire up everything the configuration names.
    pub fn from_config(config: &ServerConfig) -> Result<Self, MarcoError> {
        let catalog = config.catalog.load()?;
        Ok(Self::new(
            Compositor::new(Arc::new(catalog)),
            Arc::new(HttpImageLoader::new()?),
            config.feedback_service()?,
        ))
    }

    pub fn catalog(&self) -> &FrameCatalog {
        self.compositor.catalog()
    }
}
