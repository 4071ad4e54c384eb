// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The assignment orchestrator.

use crate::error::InfrastructureError;
use crate::phase::AssignmentPhase;
use crate::provider::{AssignmentProvider, AssignmentRecord, ProviderError};
use crate::validator;
use crate::verdict::AssignmentVerdict;
use seatwise_audit::{AuditSink, OperationLogEntry, OperationSubject, OperationType};
use seatwise_domain::{AssignmentRequest, LicenseCatalog, LicenseType};
use seatwise_inventory::{InventoryError, InventoryLedger, InventoryStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// The outcome of an assign or unassign call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignResult {
    /// Whether the operation completed.
    pub success: bool,
    /// A human-readable summary.
    pub message: String,
    /// The itemized failure reasons, when the operation failed.
    pub errors: Option<Vec<String>>,
    /// The assignment id involved, when one exists.
    pub assignment_id: Option<String>,
}

impl AssignResult {
    fn granted(assignment_id: String) -> Self {
        Self {
            success: true,
            message: String::from("License assigned successfully"),
            errors: None,
            assignment_id: Some(assignment_id),
        }
    }

    fn unassigned(assignment_id: &str, message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            errors: None,
            assignment_id: Some(assignment_id.to_string()),
        }
    }

    fn failed(message: &str, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            errors: Some(errors),
            assignment_id: None,
        }
    }
}

/// Releases reserved seats on drop unless disarmed.
///
/// Constructed immediately after a successful reserve. If the grant
/// confirms, the guard is disarmed and the seats stay consumed. On any
/// other exit — grant failure, timeout, or the caller abandoning the
/// in-flight future — the drop runs the compensating release, so a
/// reservation can never leak seats.
struct ReservationGuard<'a, S: InventoryStore> {
    ledger: &'a InventoryLedger<S>,
    license_type: LicenseType,
    quantity: u32,
    armed: bool,
}

impl<'a, S: InventoryStore> ReservationGuard<'a, S> {
    const fn new(ledger: &'a InventoryLedger<S>, license_type: LicenseType, quantity: u32) -> Self {
        Self {
            ledger,
            license_type,
            quantity,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<S: InventoryStore> Drop for ReservationGuard<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = self.ledger.release(self.license_type, self.quantity) {
                error!(
                    license_type = %self.license_type,
                    quantity = self.quantity,
                    error = %err,
                    "Compensating release failed; seats may be leaked"
                );
            }
        }
    }
}

/// Logs a phase transition and returns the new phase.
fn advance(from: AssignmentPhase, to: AssignmentPhase) -> AssignmentPhase {
    debug_assert!(
        from.can_transition_to(to),
        "invalid phase transition {from} -> {to}"
    );
    debug!(from = %from, to = %to, "Assignment phase");
    to
}

/// The single externally-callable entry point for license assignment.
///
/// Coordinates validation, the seat reservation, the external grant,
/// and audit logging. Generic over the inventory store, the
/// directory/assignment provider, and the audit sink so deployments
/// and tests can wire their own collaborators.
#[derive(Debug)]
pub struct LicenseService<S, P, A>
where
    S: InventoryStore,
    P: AssignmentProvider,
    A: AuditSink,
{
    catalog: Arc<LicenseCatalog>,
    ledger: InventoryLedger<S>,
    provider: P,
    audit: A,
    call_timeout: Duration,
}

impl<S, P, A> LicenseService<S, P, A>
where
    S: InventoryStore,
    P: AssignmentProvider,
    A: AuditSink,
{
    /// The default bound on external collaborator calls.
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new service.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The immutable license catalog
    /// * `ledger` - The seat ledger
    /// * `provider` - The directory/assignment source
    /// * `audit` - The audit sink for operation log entries
    pub fn new(
        catalog: Arc<LicenseCatalog>,
        ledger: InventoryLedger<S>,
        provider: P,
        audit: A,
    ) -> Self {
        Self {
            catalog,
            ledger,
            provider,
            audit,
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Overrides the bound on external collaborator calls.
    #[must_use]
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Returns the catalog this service validates against.
    #[must_use]
    pub fn catalog(&self) -> &LicenseCatalog {
        &self.catalog
    }

    /// Returns the seat ledger.
    #[must_use]
    pub const fn ledger(&self) -> &InventoryLedger<S> {
        &self.ledger
    }

    /// Returns the directory/assignment provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the audit sink.
    #[must_use]
    pub const fn audit(&self) -> &A {
        &self.audit
    }

    /// Produces a read-only verdict for a request.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError` if the inventory store or the
    /// directory cannot be reached or the held-set fetch times out.
    pub async fn validate_assignment(
        &self,
        request: &AssignmentRequest,
    ) -> Result<AssignmentVerdict, InfrastructureError> {
        validator::validate_assignment(
            &self.catalog,
            &self.ledger,
            &self.provider,
            self.call_timeout,
            request,
        )
        .await
    }

    /// Assigns license seats to a target.
    ///
    /// Validation, reservation, external grant, and audit logging run
    /// in that order. The reservation is the authoritative
    /// availability check; losing the reservation race after a passing
    /// verdict is a legitimate failed outcome, not a bug. If the
    /// external grant fails after the seats were reserved, the
    /// reservation is released before this method returns.
    ///
    /// Every call appends exactly one audit entry whose status matches
    /// the returned outcome.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError` if a collaborator cannot be
    /// reached or times out. Rule violations and lost races are not
    /// errors; they return a failed [`AssignResult`].
    pub async fn assign(
        &self,
        request: &AssignmentRequest,
    ) -> Result<AssignResult, InfrastructureError> {
        let subject: OperationSubject =
            OperationSubject::request(request.license_type, &request.target);
        let mut phase: AssignmentPhase =
            advance(AssignmentPhase::Pending, AssignmentPhase::Validating);

        let verdict: AssignmentVerdict = match self.validate_assignment(request).await {
            Ok(verdict) => verdict,
            Err(infra) => {
                advance(phase, AssignmentPhase::InfraError);
                self.record(OperationType::Assign, subject, Some(infra.to_string()));
                return Err(infra);
            }
        };

        if !verdict.is_valid {
            advance(phase, AssignmentPhase::Invalid);
            self.record(
                OperationType::Assign,
                subject,
                Some(verdict.errors.join(", ")),
            );
            return Ok(AssignResult::failed(
                "License validation failed",
                verdict.errors,
            ));
        }

        phase = advance(phase, AssignmentPhase::Valid);
        phase = advance(phase, AssignmentPhase::Reserving);

        if let Err(err) = self.ledger.reserve(request.license_type, request.quantity) {
            return match err {
                InventoryError::StoreUnavailable(msg) => {
                    advance(phase, AssignmentPhase::InfraError);
                    let infra: InfrastructureError = InfrastructureError::InventoryStore(msg);
                    self.record(OperationType::Assign, subject, Some(infra.to_string()));
                    Err(infra)
                }
                err => {
                    // The validator's pre-check passed, so this is a
                    // lost race against a concurrent reservation.
                    advance(phase, AssignmentPhase::ReserveFailed);
                    warn!(
                        license_type = %request.license_type,
                        race_lost = true,
                        error = %err,
                        "Reservation failed after validation passed"
                    );
                    self.record(OperationType::Assign, subject, Some(err.to_string()));
                    Ok(AssignResult::failed(
                        "License reservation failed",
                        vec![err.to_string()],
                    ))
                }
            };
        }

        // Seats are held. The guard guarantees the compensating
        // release from here on, even if this future is dropped.
        let mut guard: ReservationGuard<'_, S> =
            ReservationGuard::new(&self.ledger, request.license_type, request.quantity);

        match timeout(
            self.call_timeout,
            self.provider
                .grant(&request.target, request.license_type, request.quantity),
        )
        .await
        {
            Ok(Ok(assignment_id)) => {
                guard.disarm();
                advance(phase, AssignmentPhase::Granted);
                self.record(OperationType::Assign, subject, None);
                Ok(AssignResult::granted(assignment_id))
            }
            Ok(Err(ProviderError::Rejected(msg))) => {
                drop(guard);
                advance(phase, AssignmentPhase::ReserveFailed);
                self.record(OperationType::Assign, subject, Some(msg.clone()));
                Ok(AssignResult::failed("Failed to assign license", vec![msg]))
            }
            Ok(Err(ProviderError::Unavailable(msg))) => {
                drop(guard);
                advance(phase, AssignmentPhase::InfraError);
                let infra: InfrastructureError = InfrastructureError::Directory(msg);
                self.record(OperationType::Assign, subject, Some(infra.to_string()));
                Err(infra)
            }
            Err(_) => {
                drop(guard);
                advance(phase, AssignmentPhase::InfraError);
                let infra: InfrastructureError = InfrastructureError::Timeout {
                    operation: "grant",
                    timeout: self.call_timeout,
                };
                self.record(OperationType::Assign, subject, Some(infra.to_string()));
                Err(infra)
            }
        }
    }

    /// Unassigns a license by assignment id.
    ///
    /// Idempotent: an id that does not resolve to a live assignment is
    /// a no-op success, mirroring the ledger's release semantics.
    /// Every call appends exactly one audit entry.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError` if the directory or inventory
    /// store cannot be reached or a call times out.
    pub async fn unassign(&self, assignment_id: &str) -> Result<AssignResult, InfrastructureError> {
        let record: Option<AssignmentRecord> =
            match timeout(self.call_timeout, self.provider.lookup(assignment_id)).await {
                Ok(Ok(record)) => record,
                Ok(Err(err)) => {
                    let infra: InfrastructureError =
                        InfrastructureError::Directory(err.to_string());
                    self.record(
                        OperationType::Unassign,
                        OperationSubject::assignment(assignment_id),
                        Some(infra.to_string()),
                    );
                    return Err(infra);
                }
                Err(_) => {
                    let infra: InfrastructureError = InfrastructureError::Timeout {
                        operation: "lookup",
                        timeout: self.call_timeout,
                    };
                    self.record(
                        OperationType::Unassign,
                        OperationSubject::assignment(assignment_id),
                        Some(infra.to_string()),
                    );
                    return Err(infra);
                }
            };

        let Some(record) = record else {
            debug!(assignment_id = %assignment_id, "Unassign of unresolved assignment id is a no-op");
            self.record(
                OperationType::Unassign,
                OperationSubject::assignment(assignment_id),
                None,
            );
            return Ok(AssignResult::unassigned(
                assignment_id,
                "License already unassigned",
            ));
        };

        let subject: OperationSubject =
            OperationSubject::resolved(assignment_id, record.license_type, &record.target);

        match timeout(self.call_timeout, self.provider.revoke(assignment_id)).await {
            Ok(Ok(())) => {}
            Ok(Err(ProviderError::Rejected(msg))) => {
                self.record(OperationType::Unassign, subject, Some(msg.clone()));
                return Ok(AssignResult::failed("Failed to unassign license", vec![msg]));
            }
            Ok(Err(ProviderError::Unavailable(msg))) => {
                let infra: InfrastructureError = InfrastructureError::Directory(msg);
                self.record(OperationType::Unassign, subject, Some(infra.to_string()));
                return Err(infra);
            }
            Err(_) => {
                let infra: InfrastructureError = InfrastructureError::Timeout {
                    operation: "revoke",
                    timeout: self.call_timeout,
                };
                self.record(OperationType::Unassign, subject, Some(infra.to_string()));
                return Err(infra);
            }
        }

        // The revoke already happened; the seats must come back.
        if let Err(err) = self.ledger.release(record.license_type, record.quantity) {
            match err {
                InventoryError::StoreUnavailable(msg) => {
                    let infra: InfrastructureError = InfrastructureError::InventoryStore(msg);
                    self.record(
                        OperationType::Unassign,
                        subject.clone(),
                        Some(infra.to_string()),
                    );
                    return Err(infra);
                }
                err => {
                    // The type may predate inventory registration; the
                    // revoke stands, so the unassign still succeeds.
                    warn!(
                        assignment_id = %assignment_id,
                        error = %err,
                        "Seat release after revoke reported an inconsistency"
                    );
                }
            }
        }

        self.record(OperationType::Unassign, subject, None);
        Ok(AssignResult::unassigned(
            assignment_id,
            "License unassigned successfully",
        ))
    }

    /// Appends one audit entry, reporting sink failures without
    /// altering the primary result.
    fn record(
        &self,
        operation: OperationType,
        subject: OperationSubject,
        error_message: Option<String>,
    ) {
        let entry: OperationLogEntry = match error_message {
            Some(message) => OperationLogEntry::failure(operation, subject, message),
            None => OperationLogEntry::success(operation, subject),
        };
        if let Err(err) = self.audit.append(entry) {
            warn!(error = %err, "Failed to append audit entry");
        }
    }
}
