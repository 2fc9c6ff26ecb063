//! Form validation and submission.
//!
//! A form instance walks `Idle → Validating → {Invalid | Submitting →
//! {Saved | Failed}}` and always lands back in `Idle`; the terminal states
//! are reported through [`SubmitOutcome`] so the caller decides whether the
//! form closes (saved) or stays open (invalid / failed). The store adapter
//! is never called while validation fails, and an attachment upload must
//! complete before the record write that references it.

use crate::error::{FieldViolation, UploadError};
use crate::traits::{ObjectStore, ProgressFn, Session};
use crate::types::{Collection, Fields, RecordId};

use serde_json::Value;

/// A single declarative field constraint.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// String field with a minimum character count.
    MinLen(usize),
    /// Number (or numeric string) strictly greater than zero.
    Positive,
    /// Integer (or integral string) strictly greater than zero.
    PositiveInt,
    /// String field drawn from a closed set.
    OneOf(&'static [&'static str]),
    /// Field must be present and non-empty.
    Required,
}

/// A rule bound to a field, with the message shown on violation.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Field name in the draft payload.
    pub field: &'static str,
    /// The constraint.
    pub rule: Rule,
    /// Message attached to the field when the constraint fails.
    pub message: &'static str,
}

impl FieldRule {
    /// Bind a rule to a field.
    pub const fn new(field: &'static str, rule: Rule, message: &'static str) -> Self {
        Self {
            field,
            rule,
            message,
        }
    }
}

/// A per-record-type validation schema.
#[derive(Debug, Clone)]
pub struct Schema {
    rules: &'static [FieldRule],
}

impl Schema {
    /// Create a schema over a static rule set.
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    /// Check a draft against every rule, collecting all violations.
    pub fn validate(&self, draft: &Fields) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        for rule in self.rules {
            if !check(rule.rule, draft.get(rule.field)) {
                violations.push(FieldViolation {
                    field: rule.field.to_string(),
                    message: rule.message.to_string(),
                });
            }
        }
        violations
    }
}

fn check(rule: Rule, value: Option<&Value>) -> bool {
    match rule {
        Rule::MinLen(min) => value
            .and_then(Value::as_str)
            .is_some_and(|s| s.chars().count() >= min),
        Rule::Positive => coerce_number(value).is_some_and(|n| n > 0.0),
        Rule::PositiveInt => {
            coerce_number(value).is_some_and(|n| n > 0.0 && n.fract() == 0.0)
        }
        Rule::OneOf(allowed) => value
            .and_then(Value::as_str)
            .is_some_and(|s| allowed.contains(&s)),
        Rule::Required => match value {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        },
    }
}

// Form inputs arrive as strings as often as numbers; coerce like the
// original admin forms did.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Where a form instance currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    /// Waiting for input.
    #[default]
    Idle,
    /// Checking the draft against the schema.
    Validating,
    /// Writing to the store (and uploading any attachment first).
    Submitting,
}

/// Terminal result of one submission attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The record was written; the form may close. The table refreshes
    /// through its live subscription, not through this value.
    Saved {
        /// Id of the written record.
        id: RecordId,
        /// True when a new record was created rather than updated.
        created: bool,
    },
    /// Field violations; the form stays open with errors attached.
    Invalid(Vec<FieldViolation>),
    /// Upload or store failure; the form stays open for a manual retry.
    Failed(crate::Error),
}

/// An optional file attachment uploaded before the record write.
pub struct Attachment {
    /// Object-store path for the upload (e.g. `blog/1717243200_cover.jpg`).
    pub path: String,
    /// File content.
    pub bytes: Vec<u8>,
    /// Draft field that receives the download URL.
    pub url_field: &'static str,
}

/// One create-or-update submission.
pub struct SubmitRequest {
    /// Target collection.
    pub collection: Collection,
    /// Existing record id; `Some` selects merge-update, `None` create.
    pub existing: Option<RecordId>,
    /// The draft payload.
    pub draft: Fields,
    /// Optional attachment, uploaded before the write.
    pub attachment: Option<Attachment>,
}

/// Drives validation and submission for one form instance.
pub struct FormController {
    schema: Schema,
    phase: FormPhase,
}

impl FormController {
    /// Create a controller over a record type's schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            phase: FormPhase::Idle,
        }
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Validate without submitting.
    pub fn validate(&mut self, draft: &Fields) -> Vec<FieldViolation> {
        self.phase = FormPhase::Validating;
        let violations = self.schema.validate(draft);
        self.phase = FormPhase::Idle;
        violations
    }

    /// Validate the draft, upload the attachment (if any) and write the
    /// record.
    ///
    /// The store is not called when validation fails, and the record is
    /// not written when the upload fails. On success `after_save` runs
    /// before the outcome is returned; data refresh happens through the
    /// live subscription.
    pub async fn submit<S, O>(
        &mut self,
        session: &S,
        objects: Option<&O>,
        request: SubmitRequest,
        on_progress: Option<ProgressFn>,
        after_save: impl FnOnce(),
    ) -> SubmitOutcome
    where
        S: Session,
        O: ObjectStore,
    {
        self.phase = FormPhase::Validating;
        let violations = self.schema.validate(&request.draft);
        if !violations.is_empty() {
            self.phase = FormPhase::Idle;
            return SubmitOutcome::Invalid(violations);
        }

        let mut draft = request.draft;

        if let Some(attachment) = request.attachment {
            let objects = match objects {
                Some(objects) => objects,
                None => {
                    self.phase = FormPhase::Idle;
                    return SubmitOutcome::Failed(
                        UploadError::Failed {
                            message: "no object store configured for attachments".to_string(),
                        }
                        .into(),
                    );
                }
            };

            // Upload happens-before the record write; a failed upload
            // blocks submission entirely.
            match objects
                .upload(&attachment.path, &attachment.bytes, on_progress)
                .await
            {
                Ok(url) => draft.insert(attachment.url_field, Value::String(url)),
                Err(e) => {
                    self.phase = FormPhase::Idle;
                    return SubmitOutcome::Failed(e);
                }
            }
        }

        self.phase = FormPhase::Submitting;

        let result = match &request.existing {
            Some(id) => session
                .update(&request.collection, id, draft, true)
                .await
                .map(|_| (id.clone(), false)),
            None => session
                .create(&request.collection, draft)
                .await
                .map(|id| (id, true)),
        };

        self.phase = FormPhase::Idle;

        match result {
            Ok((id, created)) => {
                after_save();
                SubmitOutcome::Saved { id, created }
            }
            Err(e) => SubmitOutcome::Failed(e),
        }
    }
}
