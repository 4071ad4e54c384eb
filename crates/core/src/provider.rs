// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The directory/assignment source contract.
//!
//! The provider owns the truth about who holds what. The engine reads
//! held sets from it at validation time (never cached) and asks it to
//! perform the actual grant and revoke side effects.

use seatwise_domain::{AssignmentTarget, HeldLicenses, LicenseType};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;
use time::OffsetDateTime;

/// Errors reported by the directory/assignment source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider understood the request and refused it.
    Rejected(String),
    /// The provider could not be reached or failed internally.
    Unavailable(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(msg) => write!(f, "Provider rejected the operation: {msg}"),
            Self::Unavailable(msg) => write!(f, "Provider unavailable: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// A live assignment as known to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    /// The provider's identifier for this assignment.
    pub assignment_id: String,
    /// The target holding the seats.
    pub target: AssignmentTarget,
    /// The license type assigned.
    pub license_type: LicenseType,
    /// The number of seats assigned.
    pub quantity: u32,
}

/// The directory/assignment source the engine calls out to.
///
/// All methods are bounded by the orchestrator's call timeout; a
/// method that does not answer in time surfaces as an infrastructure
/// error, never as a rule violation.
pub trait AssignmentProvider: Send + Sync {
    /// Fetches the target's current holdings.
    ///
    /// Called at validation time, every time. The snapshot must not be
    /// cached across validations.
    fn held_licenses(
        &self,
        target: &AssignmentTarget,
    ) -> impl Future<Output = Result<HeldLicenses, ProviderError>> + Send;

    /// Grants seats to a target, returning the new assignment id.
    fn grant(
        &self,
        target: &AssignmentTarget,
        license_type: LicenseType,
        quantity: u32,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;

    /// Looks up a live assignment by id. `None` means the id does not
    /// resolve (never assigned, or already unassigned).
    fn lookup(
        &self,
        assignment_id: &str,
    ) -> impl Future<Output = Result<Option<AssignmentRecord>, ProviderError>> + Send;

    /// Revokes an assignment. Revoking an id that no longer resolves
    /// is a no-op.
    fn revoke(
        &self,
        assignment_id: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;
}

/// An in-process directory.
///
/// Backs the server's default wiring and the test suites. A real
/// deployment supplies a provider speaking to the actual directory
/// service; only the contract above matters.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    assignments: Mutex<BTreeMap<String, AssignmentRecord>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            assignments: Mutex::new(BTreeMap::new()),
        }
    }

    /// Inserts an assignment directly, bypassing the grant path.
    ///
    /// Used to seed fixtures for tests and bootstrap data.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the directory state is
    /// poisoned.
    pub fn seed_assignment(
        &self,
        target: &AssignmentTarget,
        license_type: LicenseType,
        quantity: u32,
    ) -> Result<String, ProviderError> {
        let assignment_id: String = generate_assignment_id();
        let record: AssignmentRecord = AssignmentRecord {
            assignment_id: assignment_id.clone(),
            target: target.clone(),
            license_type,
            quantity,
        };
        self.lock()?.insert(assignment_id.clone(), record);
        Ok(assignment_id)
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, AssignmentRecord>>, ProviderError> {
        self.assignments
            .lock()
            .map_err(|_| ProviderError::Unavailable(String::from("assignment lock poisoned")))
    }
}

impl AssignmentProvider for InMemoryDirectory {
    async fn held_licenses(
        &self,
        target: &AssignmentTarget,
    ) -> Result<HeldLicenses, ProviderError> {
        let assignments = self.lock()?;
        Ok(assignments
            .values()
            .filter(|record| record.target == *target)
            .map(|record| record.license_type)
            .collect())
    }

    async fn grant(
        &self,
        target: &AssignmentTarget,
        license_type: LicenseType,
        quantity: u32,
    ) -> Result<String, ProviderError> {
        let assignment_id: String = generate_assignment_id();
        let record: AssignmentRecord = AssignmentRecord {
            assignment_id: assignment_id.clone(),
            target: target.clone(),
            license_type,
            quantity,
        };
        self.lock()?.insert(assignment_id.clone(), record);
        Ok(assignment_id)
    }

    async fn lookup(&self, assignment_id: &str) -> Result<Option<AssignmentRecord>, ProviderError> {
        Ok(self.lock()?.get(assignment_id).cloned())
    }

    async fn revoke(&self, assignment_id: &str) -> Result<(), ProviderError> {
        self.lock()?.remove(assignment_id);
        Ok(())
    }
}

/// Generates an opaque assignment identifier.
fn generate_assignment_id() -> String {
    let timestamp: i64 = OffsetDateTime::now_utc().unix_timestamp();
    format!("asg_{timestamp}_{}", rand::random::<u64>())
}
