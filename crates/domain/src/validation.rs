// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::catalog::LicenseCatalog;
use crate::error::DomainError;
use crate::types::AssignmentRequest;

/// Validates the shape of an assignment request.
///
/// This checks only the request itself: a positive whole-seat quantity,
/// a non-empty target identifier, and a license type the catalog knows.
/// It does NOT check inventory, prerequisites, or conflicts — those
/// require external state and belong to the assignment validator.
///
/// All shape violations are collected so the caller sees every problem
/// in one pass.
///
/// # Arguments
///
/// * `request` - The request to validate
/// * `catalog` - The license catalog
///
/// # Returns
///
/// * `Ok(())` if the request is well-formed
/// * `Err(Vec<DomainError>)` listing every shape violation
///
/// # Errors
///
/// Returns errors if:
/// - The quantity is zero
/// - The target identifier is empty
/// - The license type has no catalog entry
pub fn validate_request(
    request: &AssignmentRequest,
    catalog: &LicenseCatalog,
) -> Result<(), Vec<DomainError>> {
    let mut errors: Vec<DomainError> = Vec::new();

    // Rule: quantity must be a positive whole number of seats
    if request.quantity == 0 {
        errors.push(DomainError::InvalidQuantity(request.quantity));
    }

    // Rule: the target must be identifiable
    if request.target.id.trim().is_empty() {
        errors.push(DomainError::EmptyTargetId);
    }

    // Rule: the license type must be known to the catalog
    if !catalog.contains(request.license_type) {
        errors.push(DomainError::UnknownLicenseType(
            request.license_type.as_str().to_string(),
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
