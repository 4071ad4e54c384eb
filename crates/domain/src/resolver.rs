// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dependency and conflict resolution over the license catalog.
//!
//! These are pure functions of `(catalog, requested type, held set)`.
//! Prerequisite checking is direct-only: a prerequisite's own
//! prerequisites are not walked. Conflict checking is symmetric
//! regardless of how the catalog rows are authored.

use crate::catalog::LicenseCatalog;
use crate::error::DomainError;
use crate::types::{HeldLicenses, LicenseType};
use std::collections::BTreeSet;

/// Checks whether every direct prerequisite of `license_type` is held.
///
/// # Arguments
///
/// * `catalog` - The license catalog
/// * `license_type` - The type being requested
/// * `held` - The target's current holdings
///
/// # Errors
///
/// Returns `DomainError::UnknownLicenseType` if the catalog has no
/// entry for the requested type.
pub fn prerequisites_satisfied(
    catalog: &LicenseCatalog,
    license_type: LicenseType,
    held: &HeldLicenses,
) -> Result<bool, DomainError> {
    Ok(missing_prerequisites(catalog, license_type, held)?.is_empty())
}

/// Returns the direct prerequisites of `license_type` that are not held.
///
/// # Errors
///
/// Returns `DomainError::UnknownLicenseType` if the catalog has no
/// entry for the requested type.
pub fn missing_prerequisites(
    catalog: &LicenseCatalog,
    license_type: LicenseType,
    held: &HeldLicenses,
) -> Result<BTreeSet<LicenseType>, DomainError> {
    let required: &BTreeSet<LicenseType> = catalog.prerequisites_of(license_type)?;
    Ok(required
        .iter()
        .copied()
        .filter(|prerequisite| !held.contains(*prerequisite))
        .collect())
}

/// Checks whether granting `license_type` would create no conflict.
///
/// # Arguments
///
/// * `catalog` - The license catalog
/// * `license_type` - The type being requested
/// * `held` - The target's current holdings
///
/// # Errors
///
/// Returns `DomainError::UnknownLicenseType` if the catalog has no
/// entry for the requested type.
pub fn conflicts_clear(
    catalog: &LicenseCatalog,
    license_type: LicenseType,
    held: &HeldLicenses,
) -> Result<bool, DomainError> {
    Ok(conflicting_holdings(catalog, license_type, held)?.is_empty())
}

/// Returns the held types that conflict with granting `license_type`.
///
/// Both directions of the declared relation are consulted: a held type
/// is conflicting if the requested type declares it, or if it declares
/// the requested type. A held type without a catalog entry declares
/// nothing.
///
/// # Errors
///
/// Returns `DomainError::UnknownLicenseType` if the catalog has no
/// entry for the requested type.
pub fn conflicting_holdings(
    catalog: &LicenseCatalog,
    license_type: LicenseType,
    held: &HeldLicenses,
) -> Result<BTreeSet<LicenseType>, DomainError> {
    let declared: &BTreeSet<LicenseType> = catalog.conflicts_of(license_type)?;

    Ok(held
        .iter()
        .filter(|holding| {
            declared.contains(holding)
                || catalog
                    .entry(*holding)
                    .is_some_and(|entry| entry.conflicts.contains(&license_type))
        })
        .collect())
}
