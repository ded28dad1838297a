//! # Customer Feedback
//!
//! Star rating plus free-text suggestion, validated, persisted, and
//! announced by email.
//!
//! ## Flow
//!
//! 1. [`FeedbackForm::validate`] checks the raw input and produces a
//!    [`NewSubmission`]. Nothing reaches the store if this fails.
//! 2. The [`SubmissionStore`] persists it and assigns id and timestamp.
//! 3. The [`Notifier`] is told about it. A failure here is logged and
//!    otherwise ignored: the feedback is already saved.
//!
//! [`analytics`] aggregates whatever the store lists.
//!
//! ## Example
//!
//! ```
//! use marco::feedback::{FeedbackForm, FormValue};
//!
//! let form = FeedbackForm {
//!     name: "  Ana ".into(),
//!     age: FormValue::Text("34".into()),
//!     rating: Some(FormValue::Number(4)),
//!     suggestion: "More frames!".into(),
//! };
//! let new = form.validate().unwrap();
//! assert_eq!(new.name, "Ana");
//! assert_eq!(new.age, 34);
//! assert_eq!(new.rating.get(), 4);
//! ```

pub mod analytics;
pub mod notify;
pub mod store;

pub use analytics::{Analytics, AgeBucket, AgeGroup, Mood};
pub use notify::{LogNotifier, Notification, Notifier, WebhookNotifier};
pub use store::{JsonFileStore, MemoryStore, SubmissionStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::MarcoError;

/// Placeholder recipient for log-only notifications. A webhook deployment
/// must name a real one.
pub const DEFAULT_RECIPIENT: &str = "feedback@localhost";

/// Sender address used for notifications (users don't give an email).
pub const SYSTEM_SENDER: &str = "feedback@system.com";

/// Oldest age the form accepts.
pub const MAX_AGE: u32 = 120;

pub const MSG_MISSING_FIELDS: &str = "Please fill in all fields";
pub const MSG_INVALID_AGE: &str = "Please enter a valid age";
pub const MSG_INVALID_RATING: &str = "Please choose a rating from 1 to 5";
pub const MSG_STORE_FAILED: &str = "Failed to save suggestion";
pub const MSG_THANKS: &str = "Thank you for your feedback!";

// ============================================================================
// Records
// ============================================================================

/// A 1 to 5 star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&stars).then_some(Rating(stars))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating(Self::MAX)
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("rating must be 1-5, got {}", value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated input, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub name: String,
    pub age: u32,
    pub rating: Rating,
    pub suggestion: String,
}

/// A stored feedback record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub rating: Rating,
    pub suggestion: String,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Stamp a new submission with a fresh id and the given time.
    pub fn create(new: NewSubmission, created_at: DateTime<Utc>) -> Self {
        Submission {
            id: Uuid::new_v4(),
            name: new.name,
            age: new.age,
            rating: new.rating,
            suggestion: new.suggestion,
            created_at,
        }
    }
}

// ============================================================================
// Form
// ============================================================================

/// A form field that may arrive as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(i64),
    Text(String),
}

impl Default for FormValue {
    fn default() -> Self {
        FormValue::Text(String::new())
    }
}

impl FormValue {
    fn is_blank(&self) -> bool {
        matches!(self, FormValue::Text(s) if s.trim().is_empty())
    }

    /// Strict integer parse: surrounding whitespace is allowed, anything else is not.
    fn as_integer(&self) -> Option<i64> {
        match self {
            FormValue::Number(n) => Some(*n),
            FormValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Raw form input as the widget sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackForm {
    pub name: String,
    pub age: FormValue,
    /// Five stars when absent.
    pub rating: Option<FormValue>,
    pub suggestion: String,
}

impl FeedbackForm {
    /// Check required fields and ranges, trimming text fields.
    pub fn validate(&self) -> Result<NewSubmission, MarcoError> {
        let name = self.name.trim();
        let suggestion = self.suggestion.trim();
        if name.is_empty() || suggestion.is_empty() || self.age.is_blank() {
            return Err(MarcoError::Validation(MSG_MISSING_FIELDS.into()));
        }

        let age = self
            .age
            .as_integer()
            .filter(|age| (1..=MAX_AGE as i64).contains(age))
            .ok_or_else(|| MarcoError::Validation(MSG_INVALID_AGE.into()))?;

        let rating = match &self.rating {
            None => Rating::default(),
            Some(value) if value.is_blank() => Rating::default(),
            Some(value) => value
                .as_integer()
                .and_then(|n| u8::try_from(n).ok())
                .and_then(Rating::new)
                .ok_or_else(|| MarcoError::Validation(MSG_INVALID_RATING.into()))?,
        };

        Ok(NewSubmission {
            name: name.to_string(),
            age: age as u32,
            rating,
            suggestion: suggestion.to_string(),
        })
    }
}

/// Body of the email sent for each new submission.
pub fn notification_message(submission: &Submission) -> String {
    format!(
        "New Feedback Received!\n\nName: {}\nAge: {}\nRating: {}/5 stars\n\nSuggestion:\n{}",
        submission.name, submission.age, submission.rating, submission.suggestion
    )
}

// ============================================================================
// Service
// ============================================================================

/// Validation, persistence and notification wired together.
#[derive(Clone)]
pub struct FeedbackService {
    store: Arc<dyn SubmissionStore>,
    notifier: Arc<dyn Notifier>,
    recipient: String,
}

impl std::fmt::Debug for FeedbackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackService")
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

impl FeedbackService {
    pub fn new(store: Arc<dyn SubmissionStore>, notifier: Arc<dyn Notifier>, recipient: impl Into<String>) -> Self {
        Self {
            store,
            notifier,
            recipient: recipient.into(),
        }
    }

    /// In-memory store, log-only notifications.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(LogNotifier), DEFAULT_RECIPIENT)
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Validate, persist and announce one form.
    ///
    /// Returns `Validation` for bad input and `Store` if persisting fails.
    /// Notification problems never fail the call.
    pub async fn submit(&self, form: &FeedbackForm) -> Result<Submission, MarcoError> {
        let new = form.validate()?;

        let submission = self.store.submit(new).await.map_err(|e| {
            tracing::error!(error = %e, "failed to store feedback");
            e
        })?;
        tracing::info!(id = %submission.id, rating = submission.rating.get(), "feedback received");

        let notification = Notification {
            name: submission.name.clone(),
            email: SYSTEM_SENDER.to_string(),
            message: notification_message(&submission),
            to: self.recipient.clone(),
        };
        if let Err(e) = self.notifier.notify(&notification).await {
            tracing::warn!(id = %submission.id, error = %e, "feedback notification failed");
        }

        Ok(submission)
    }

    /// All submissions, newest first.
    pub async fn list(&self) -> Result<Vec<Submission>, MarcoError> {
        self.store.list().await
    }

    pub async fn analytics(&self) -> Result<Analytics, MarcoError> {
        let submissions = self.store.list().await?;
        Ok(Analytics::from_submissions(&submissions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn form(name: &str, age: FormValue, rating: Option<FormValue>, suggestion: &str) -> FeedbackForm {
        FeedbackForm {
            name: name.into(),
            age,
            rating,
            suggestion: suggestion.into(),
        }
    }

    fn text(s: &str) -> FormValue {
        FormValue::Text(s.into())
    }

    fn validation_message(result: Result<NewSubmission, MarcoError>) -> String {
        match result {
            Err(MarcoError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(validation_message(form("", text("20"), None, "hi").validate()), MSG_MISSING_FIELDS);
        assert_eq!(validation_message(form("Bo", text("  "), None, "hi").validate()), MSG_MISSING_FIELDS);
        assert_eq!(validation_message(form("Bo", text("20"), None, "   ").validate()), MSG_MISSING_FIELDS);
    }

    #[test]
    fn test_invalid_age() {
        for age in [text("0"), text("-3"), text("abc"), text("12abc"), text("121"), FormValue::Number(0)] {
            assert_eq!(
                validation_message(form("Bo", age.clone(), None, "hi").validate()),
                MSG_INVALID_AGE,
                "age {:?}",
                age
            );
        }
    }

    #[test]
    fn test_rating_default_and_range() {
        assert_eq!(form("Bo", text("9"), None, "hi").validate().unwrap().rating.get(), 5);
        assert_eq!(form("Bo", text("9"), Some(text("")), "hi").validate().unwrap().rating.get(), 5);
        assert_eq!(form("Bo", text("9"), Some(text("2")), "hi").validate().unwrap().rating.get(), 2);
        assert_eq!(
            validation_message(form("Bo", text("9"), Some(FormValue::Number(6)), "hi").validate()),
            MSG_INVALID_RATING
        );
        assert_eq!(
            validation_message(form("Bo", text("9"), Some(FormValue::Number(0)), "hi").validate()),
            MSG_INVALID_RATING
        );
    }

    #[test]
    fn test_form_accepts_numbers_or_strings() {
        let f: FeedbackForm =
            serde_json::from_str(r#"{"name":"Li","age":"41","rating":3,"suggestion":"ok"}"#).unwrap();
        assert_eq!(f.age, text("41"));
        assert_eq!(f.rating, Some(FormValue::Number(3)));

        let f: FeedbackForm = serde_json::from_str(r#"{"name":"Li","age":41}"#).unwrap();
        assert_eq!(f.age, FormValue::Number(41));
        assert_eq!(f.suggestion, "");
    }

    #[test]
    fn test_rating_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn test_notification_message() {
        let new = NewSubmission {
            name: "Ana".into(),
            age: 30,
            rating: Rating::new(4).unwrap(),
            suggestion: "Add gold frames".into(),
        };
        let s = Submission::create(new, Utc::now());
        assert_eq!(
            notification_message(&s),
            "New Feedback Received!\n\nName: Ana\nAge: 30\nRating: 4/5 stars\n\nSuggestion:\nAdd gold frames"
        );
    }

    /// Store that always fails.
    struct BrokenStore;

    #[async_trait]
    impl SubmissionStore for BrokenStore {
        async fn submit(&self, _new: NewSubmission) -> Result<Submission, MarcoError> {
            Err(MarcoError::Store("disk full".into()))
        }

        async fn list(&self) -> Result<Vec<Submission>, MarcoError> {
            Err(MarcoError::Store("disk full".into()))
        }
    }

    /// Notifier that records what it was asked to send, optionally failing.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notification: &Notification) -> Result<(), MarcoError> {
            self.sent.lock().unwrap().push(notification.clone());
            if self.fail {
                Err(MarcoError::Notify("smtp down".into()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_submit_stores_and_notifies() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = FeedbackService::new(store.clone(), notifier.clone(), "owner@example.com");

        let saved = service
            .submit(&form(" Ana ", text(" 30 "), Some(text("4")), " Nice "))
            .await
            .unwrap();
        assert_eq!(saved.name, "Ana");
        assert_eq!(saved.suggestion, "Nice");

        let sent = notifier.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(sent[0].email, SYSTEM_SENDER);
        assert_eq!(sent[0].name, "Ana");
        assert!(sent[0].message.contains("Rating: 4/5 stars"));

        assert_eq!(service.list().await.unwrap(), vec![saved]);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_store() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = FeedbackService::new(store.clone(), notifier.clone(), DEFAULT_RECIPIENT);

        let err = service.submit(&form("Ana", text("zero"), None, "x")).await.unwrap_err();
        assert!(err.is_validation());
        assert!(store.list().await.unwrap().is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notify_failure_is_swallowed() {
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let service = FeedbackService::new(Arc::new(MemoryStore::new()), notifier.clone(), DEFAULT_RECIPIENT);
        assert!(service.submit(&form("Ana", text("30"), None, "x")).await.is_ok());
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = FeedbackService::new(Arc::new(BrokenStore), notifier.clone(), DEFAULT_RECIPIENT);
        let err = service.submit(&form("Ana", text("30"), None, "x")).await.unwrap_err();
        assert!(matches!(err, MarcoError::Store(_)));
        assert!(notifier.sent.lock().unwrap().is_empty());
    }
}
