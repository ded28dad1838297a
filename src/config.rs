//! Runtime configuration for the HTTP service and the CLI.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::MarcoError;
use crate::feedback::{
    FeedbackService, JsonFileStore, LogNotifier, MemoryStore, Notifier, SubmissionStore, WebhookNotifier,
    DEFAULT_RECIPIENT,
};
use crate::frame::FrameCatalog;

/// Which frame catalog to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// celebration, tropical, rainbow, party, festive
    #[default]
    Festive,
    /// classic, modern, vintage, elegant, gold
    Classic,
    /// JSON file mapping ids to frame specs
    File(PathBuf),
}

impl CatalogSource {
    /// Resolve CLI flags: an explicit file wins over `--classic`.
    pub fn from_flags(file: Option<PathBuf>, classic: bool) -> Self {
        match (file, classic) {
            (Some(path), _) => CatalogSource::File(path),
            (None, true) => CatalogSource::Classic,
            (None, false) => CatalogSource::Festive,
        }
    }

    pub fn load(&self) -> Result<FrameCatalog, MarcoError> {
        match self {
            CatalogSource::Festive => Ok(FrameCatalog::festive()),
            CatalogSource::Classic => Ok(FrameCatalog::classic()),
            CatalogSource::File(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| MarcoError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
                FrameCatalog::from_json(&json)
            }
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    pub catalog: CatalogSource,
    /// Feedback JSON file; in-memory when unset
    pub data_path: Option<PathBuf>,
    /// Email webhook; notifications are only logged when unset
    pub notify_url: Option<String>,
    /// Where feedback notifications are addressed; required with `notify_url`
    pub recipient: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            catalog: CatalogSource::default(),
            data_path: None,
            notify_url: None,
            recipient: None,
        }
    }
}

impl ServerConfig {
    /// Build the feedback service this configuration describes.
    pub fn feedback_service(&self) -> Result<FeedbackService, MarcoError> {
        let store: Arc<dyn SubmissionStore> = match &self.data_path {
            Some(path) => Arc::new(JsonFileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };
        let (notifier, recipient): (Arc<dyn Notifier>, &str) = match (&self.notify_url, &self.recipient) {
            (Some(url), Some(to)) => (Arc::new(WebhookNotifier::new(url)?) as Arc<dyn Notifier>, to.as_str()),
            (Some(_), None) => {
                return Err(MarcoError::Config(
                    "A notification recipient is required when a webhook is configured".to_string(),
                ));
            }
            (None, to) => (
                Arc::new(LogNotifier) as Arc<dyn Notifier>,
                to.as_deref().unwrap_or(DEFAULT_RECIPIENT),
            ),
        };
        Ok(FeedbackService::new(store, notifier, recipient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        assert_eq!(CatalogSource::from_flags(None, false), CatalogSource::Festive);
        assert_eq!(CatalogSource::from_flags(None, true), CatalogSource::Classic);
        assert_eq!(
            CatalogSource::from_flags(Some("f.json".into()), true),
            CatalogSource::File("f.json".into())
        );
    }

    #[test]
    fn test_load_builtins() {
        assert!(CatalogSource::Festive.load().unwrap().get("party").is_some());
        assert!(CatalogSource::Classic.load().unwrap().get("gold").is_some());
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("marco-catalog-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r##"{"teal": {"border_width": 12, "corner_radius": 4, "accent": "#008080"}}"##,
        )
        .unwrap();
        let catalog = CatalogSource::File(path.clone()).load().unwrap();
        assert_eq!(catalog.resolve("teal").border_width, 12);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = CatalogSource::File("/no/such/catalog.json".into()).load().unwrap_err();
        assert!(matches!(err, MarcoError::Config(_)));
    }

    #[test]
    fn test_default_recipient() {
        let service = ServerConfig::default().feedback_service().unwrap();
        assert_eq!(service.recipient(), DEFAULT_RECIPIENT);
    }

    #[test]
    fn test_webhook_needs_recipient() {
        let mut config = ServerConfig {
            notify_url: Some("http://127.0.0.1:9/send".to_string()),
            ..Default::default()
        };
        let err = config.feedback_service().unwrap_err();
        assert!(matches!(err, MarcoError::Config(_)));

        config.recipient = Some("owner@example.com".to_string());
        let service = config.feedback_service().unwrap();
        assert_eq!(service.recipient(), "owner@example.com");
    }
}
