// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only validation of assignment requests.

use crate::error::InfrastructureError;
use crate::provider::AssignmentProvider;
use crate::verdict::{
    AssignmentVerdict, conflicting_licenses_message, insufficient_inventory_message,
    missing_prerequisites_message,
};
use seatwise_domain::{
    AssignmentRequest, AssignmentTarget, HeldLicenses, LicenseCatalog, conflicting_holdings,
    missing_prerequisites, validate_request,
};
use seatwise_inventory::{InventoryError, InventoryLedger, InventoryStore};
use std::time::Duration;
use tokio::time::timeout;

/// Produces a single verdict for an assignment request.
///
/// The request shape is checked first; a malformed request returns
/// immediately with schema errors only, because the remaining checks
/// are meaningless on bad input. After that, every check runs and its
/// violations accumulate: availability (advisory — the atomic reserve
/// is the authoritative check), prerequisites, and conflicts.
///
/// This function has no side effects and must not be trusted as a
/// reservation; it reads a point-in-time snapshot that a concurrent
/// request can invalidate.
///
/// # Errors
///
/// Returns `InfrastructureError` if the inventory store or the
/// directory cannot be reached, or the held-set fetch times out. Rule
/// violations are never errors; they travel inside the verdict.
pub(crate) async fn validate_assignment<S: InventoryStore, P: AssignmentProvider>(
    catalog: &LicenseCatalog,
    ledger: &InventoryLedger<S>,
    provider: &P,
    call_timeout: Duration,
    request: &AssignmentRequest,
) -> Result<AssignmentVerdict, InfrastructureError> {
    // Shape failure short-circuits: downstream checks assume a
    // well-formed request.
    if let Err(shape_errors) = validate_request(request, catalog) {
        return Ok(AssignmentVerdict::invalid(
            shape_errors.iter().map(ToString::to_string).collect(),
        ));
    }

    let mut errors: Vec<String> = Vec::new();

    // Advisory availability check. The reserve call re-checks
    // atomically; this exists so the caller sees the shortfall
    // alongside any structural violations.
    match ledger.available_seats(request.license_type) {
        Ok(available) => {
            if available < request.quantity {
                errors.push(insufficient_inventory_message(request.quantity, available));
            }
        }
        Err(InventoryError::StoreUnavailable(msg)) => {
            return Err(InfrastructureError::InventoryStore(msg));
        }
        Err(err) => errors.push(err.to_string()),
    }

    // Fresh holdings snapshot, fetched every validation.
    let held: HeldLicenses = fetch_held(provider, call_timeout, &request.target).await?;

    match missing_prerequisites(catalog, request.license_type, &held) {
        Ok(missing) if !missing.is_empty() => {
            errors.push(missing_prerequisites_message(request.license_type, &missing));
        }
        Ok(_) => {}
        Err(err) => errors.push(err.to_string()),
    }

    match conflicting_holdings(catalog, request.license_type, &held) {
        Ok(conflicting) if !conflicting.is_empty() => {
            errors.push(conflicting_licenses_message(
                request.license_type,
                &conflicting,
            ));
        }
        Ok(_) => {}
        Err(err) => errors.push(err.to_string()),
    }

    Ok(AssignmentVerdict::from_errors(errors))
}

/// Fetches the target's held set within the call timeout.
async fn fetch_held<P: AssignmentProvider>(
    provider: &P,
    call_timeout: Duration,
    target: &AssignmentTarget,
) -> Result<HeldLicenses, InfrastructureError> {
    match timeout(call_timeout, provider.held_licenses(target)).await {
        Ok(Ok(held)) => Ok(held),
        Ok(Err(err)) => Err(InfrastructureError::Directory(err.to_string())),
        Err(_) => Err(InfrastructureError::Timeout {
            operation: "held_licenses",
            timeout: call_timeout,
        }),
    }
}
