// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seatwise_domain::LicenseType;
use std::collections::BTreeSet;

/// The validator's answer for one assignment request.
///
/// Errors are accumulated, not short-circuited: the caller sees every
/// violated rule in one pass. Rule violations live here as strings;
/// they are expected outcomes, not exceptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentVerdict {
    /// Whether the request passed every check.
    pub is_valid: bool,
    /// Every violated rule, in check order.
    pub errors: Vec<String>,
}

impl AssignmentVerdict {
    /// Creates a verdict from an accumulated error list.
    ///
    /// The verdict is valid exactly when the list is empty.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Creates a passing verdict.
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Creates a failing verdict with the given errors.
    #[must_use]
    pub const fn invalid(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }
}

/// Builds the insufficient-inventory rule message.
pub(crate) fn insufficient_inventory_message(required: u32, available: u32) -> String {
    format!("Insufficient licenses available. Required: {required}, Available: {available}")
}

/// Builds the missing-prerequisite rule message, naming the requested
/// type and the prerequisites it lacks.
pub(crate) fn missing_prerequisites_message(
    license_type: LicenseType,
    missing: &BTreeSet<LicenseType>,
) -> String {
    let names: Vec<&str> = missing.iter().map(LicenseType::as_str).collect();
    format!(
        "Missing required prerequisite licenses for {license_type}: {}",
        names.join(", ")
    )
}

/// Builds the conflicting-license rule message, naming the requested
/// type and the held types that clash with it.
pub(crate) fn conflicting_licenses_message(
    license_type: LicenseType,
    conflicting: &BTreeSet<LicenseType>,
) -> String {
    let names: Vec<&str> = conflicting.iter().map(LicenseType::as_str).collect();
    format!(
        "License conflicts detected for {license_type} with existing assignments: {}",
        names.join(", ")
    )
}
