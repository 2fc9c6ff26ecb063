//! Error types for the salon toolkit.
//!
//! One unified error type with explicit variants so callers can react to
//! the failure class (validation vs. store vs. upload vs. subscription)
//! instead of string-matching messages.

use std::fmt;
use thiserror::Error;

/// The unified error type for salon operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Field-scoped validation failures; recoverable, blocks submission.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Record store failures (network, permissions, missing documents).
    #[error("store error: {0}")]
    Adapter(#[from] AdapterError),

    /// Attachment upload failures; blocks the record write.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Live collection subscription failures.
    #[error("subscription error: {0}")]
    Subscription(#[from] SubscriptionError),

    /// Authentication failures (credentials, tokens, sessions).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Input validation errors (invalid id, collection, slug, URL format).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// A single field-level constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Name of the offending field.
    pub field: String,
    /// Human-readable message attached to that field.
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation failure carrying every violation, not just the first.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// All collected field violations.
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Create a validation error from collected violations.
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) invalid", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "; {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Record store adapter failures.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Network-level failure talking to the hosted store.
    #[error("network error: {message}")]
    Network { message: String },

    /// The store rejected the operation for this principal.
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    /// The addressed document or collection does not exist.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// The store answered with an application-level error.
    #[error("store rejected request (HTTP {status}){}", format_api_detail(.code, .message))]
    Api {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },

    /// Local I/O failure for filesystem-backed stores.
    #[error("io error: {message}")]
    Io { message: String },

    /// A stored document could not be encoded or decoded.
    #[error("malformed document: {message}")]
    Document { message: String },
}

fn format_api_detail(code: &Option<String>, message: &Option<String>) -> String {
    let mut out = String::new();
    if let Some(code) = code {
        out.push_str(&format!(" [{}]", code));
    }
    if let Some(message) = message {
        out.push_str(&format!(": {}", message));
    }
    out
}

/// Attachment upload failures.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The object store rejected or aborted the upload.
    #[error("upload failed: {message}")]
    Failed { message: String },

    /// The upload destination path is not acceptable.
    #[error("invalid upload path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Live subscription failure for a single collection.
#[derive(Debug, Error)]
#[error("subscription to '{collection}' failed: {message}")]
pub struct SubscriptionError {
    /// The collection whose subscription degraded.
    pub collection: String,
    /// What went wrong.
    pub message: String,
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid identifier or password.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The access token no longer validates.
    #[error("session expired")]
    SessionExpired,

    /// Sign-up collided with an existing account.
    #[error("account '{handle}' already exists")]
    AccountExists { handle: String },

    /// The operation requires a signed-in session.
    #[error("not signed in")]
    NotSignedIn,
}

/// Input validation errors for the core value types.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid record id format.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Invalid collection name.
    #[error("invalid collection '{value}': {reason}")]
    Collection { value: String, reason: String },

    /// Invalid slug format.
    #[error("invalid slug '{value}': {reason}")]
    Slug { value: String, reason: String },

    /// Invalid store URL format.
    #[error("invalid store URL '{value}': {reason}")]
    StoreUrl { value: String, reason: String },

    /// A document payload was not a JSON object.
    #[error("invalid fields payload: {message}")]
    Fields { message: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
