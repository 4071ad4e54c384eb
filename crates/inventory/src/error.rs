// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seatwise_domain::LicenseType;

/// Errors that can occur during inventory operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The license type has no inventory record.
    UnknownLicenseType(LicenseType),
    /// Not enough seats remain to satisfy a reservation.
    InsufficientInventory {
        /// The license type requested.
        license_type: LicenseType,
        /// The number of seats requested.
        required: u32,
        /// The number of seats actually available.
        available: u32,
    },
    /// The backing store could not be reached or is corrupt.
    StoreUnavailable(String),
}

impl std::fmt::Display for InventoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLicenseType(license_type) => {
                write!(f, "No inventory record for license type {license_type}")
            }
            Self::InsufficientInventory {
                required,
                available,
                ..
            } => {
                write!(
                    f,
                    "Insufficient licenses available. Required: {required}, Available: {available}"
                )
            }
            Self::StoreUnavailable(msg) => write!(f, "Inventory store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for InventoryError {}
