// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Operation audit log for license assignment.
//!
//! Every assignment and unassignment attempt, successful or not,
//! produces exactly one immutable [`OperationLogEntry`]. Entries are
//! appended to an injected [`AuditSink`]; the engine never hard-codes
//! a particular sink. A sink failure is an operational problem, not a
//! result-altering one — callers report it and keep their primary
//! outcome.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use time::OffsetDateTime;
use tracing::info;

use seatwise_domain::{AssignmentTarget, LicenseType, TargetKind};

/// The kind of operation being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    /// A license grant attempt.
    #[serde(rename = "assign")]
    Assign,
    /// A license revocation attempt.
    #[serde(rename = "unassign")]
    Unassign,
}

impl OperationType {
    /// Converts this operation type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Unassign => "unassign",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of a recorded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    /// The operation completed.
    #[serde(rename = "success")]
    Success,
    /// The operation was rejected or failed.
    #[serde(rename = "failed")]
    Failed,
}

impl OperationStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What an operation acted on.
///
/// An assign attempt always knows its license type and target. An
/// unassign attempt is addressed by assignment id, and when that id
/// does not resolve to a live assignment the license and target are
/// genuinely unknown — the fields are optional for that reason, not
/// because callers may skip them when they have the data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSubject {
    /// The license type involved, when known.
    pub license_type: Option<LicenseType>,
    /// The target's directory identifier, when known.
    pub target_id: Option<String>,
    /// Whether the target is a user or a group, when known.
    pub target_kind: Option<TargetKind>,
    /// The assignment id, for operations addressed by assignment.
    pub assignment_id: Option<String>,
}

impl OperationSubject {
    /// Subject for an assign attempt: license type plus target.
    #[must_use]
    pub fn request(license_type: LicenseType, target: &AssignmentTarget) -> Self {
        Self {
            license_type: Some(license_type),
            target_id: Some(target.id.clone()),
            target_kind: Some(target.kind),
            assignment_id: None,
        }
    }

    /// Subject for an unassign attempt whose id did not resolve.
    #[must_use]
    pub fn assignment(assignment_id: &str) -> Self {
        Self {
            license_type: None,
            target_id: None,
            target_kind: None,
            assignment_id: Some(assignment_id.to_string()),
        }
    }

    /// Subject for an unassign attempt with a resolved assignment.
    #[must_use]
    pub fn resolved(
        assignment_id: &str,
        license_type: LicenseType,
        target: &AssignmentTarget,
    ) -> Self {
        Self {
            license_type: Some(license_type),
            target_id: Some(target.id.clone()),
            target_kind: Some(target.kind),
            assignment_id: Some(assignment_id.to_string()),
        }
    }
}

/// An immutable audit record of one assignment or unassignment attempt.
///
/// Entries are append-only: once created they are never mutated or
/// deleted by this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLogEntry {
    /// Opaque unique identifier for this entry.
    pub id: String,
    /// When the attempt was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Whether this was an assign or unassign attempt.
    pub operation: OperationType,
    /// What the operation acted on.
    #[serde(flatten)]
    pub subject: OperationSubject,
    /// The outcome of the attempt.
    pub status: OperationStatus,
    /// The itemized failure reasons, joined, when the attempt failed.
    pub error_message: Option<String>,
}

impl OperationLogEntry {
    /// Creates a success entry with a fresh id and current timestamp.
    ///
    /// # Arguments
    ///
    /// * `operation` - Assign or unassign
    /// * `subject` - What the operation acted on
    #[must_use]
    pub fn success(operation: OperationType, subject: OperationSubject) -> Self {
        Self {
            id: generate_entry_id(),
            timestamp: OffsetDateTime::now_utc(),
            operation,
            subject,
            status: OperationStatus::Success,
            error_message: None,
        }
    }

    /// Creates a failed entry with a fresh id and current timestamp.
    ///
    /// # Arguments
    ///
    /// * `operation` - Assign or unassign
    /// * `subject` - What the operation acted on
    /// * `error_message` - The joined failure reasons
    #[must_use]
    pub fn failure(
        operation: OperationType,
        subject: OperationSubject,
        error_message: String,
    ) -> Self {
        Self {
            id: generate_entry_id(),
            timestamp: OffsetDateTime::now_utc(),
            operation,
            subject,
            status: OperationStatus::Failed,
            error_message: Some(error_message),
        }
    }
}

/// Generates an opaque entry identifier.
fn generate_entry_id() -> String {
    let timestamp: i64 = OffsetDateTime::now_utc().unix_timestamp();
    format!("op_{timestamp}_{}", rand::random::<u64>())
}

/// Errors that can occur when appending to an audit sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// The sink could not accept the entry.
    SinkUnavailable(String),
}

impl std::fmt::Display for AuditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SinkUnavailable(msg) => write!(f, "Audit sink unavailable: {msg}"),
        }
    }
}

impl std::error::Error for AuditError {}

/// Destination for operation log entries.
///
/// Fire-and-forget semantics are tolerated: a failed append must never
/// block or invalidate the caller's primary result.
pub trait AuditSink: Send + Sync {
    /// Appends an entry to the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot accept the entry. Callers
    /// report this on their operational channel and continue.
    fn append(&self, entry: OperationLogEntry) -> Result<(), AuditError>;
}

/// An in-memory audit sink.
///
/// Used by tests and by the server's audit read endpoint.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<OperationLogEntry>>,
}

impl MemoryAuditSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all entries appended so far.
    #[must_use]
    pub fn entries(&self) -> Vec<OperationLogEntry> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Returns the number of entries appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Checks whether the sink is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditSink {
    fn append(&self, entry: OperationLogEntry) -> Result<(), AuditError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| AuditError::SinkUnavailable(String::from("entry lock poisoned")))?;
        guard.push(entry);
        Ok(())
    }
}

/// An audit sink that emits entries as structured log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Creates a new tracing-backed sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn append(&self, entry: OperationLogEntry) -> Result<(), AuditError> {
        info!(
            entry_id = %entry.id,
            operation = %entry.operation,
            license_type = entry.subject.license_type.map_or("", |t| t.as_str()),
            target_id = entry.subject.target_id.as_deref().unwrap_or(""),
            target_kind = entry.subject.target_kind.map_or("", |k| k.as_str()),
            assignment_id = entry.subject.assignment_id.as_deref().unwrap_or(""),
            status = %entry.status,
            error_message = entry.error_message.as_deref().unwrap_or(""),
            "License operation"
        );
        Ok(())
    }
}
