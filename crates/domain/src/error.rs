// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::LicenseType;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The license type is not part of the known enumeration or catalog.
    UnknownLicenseType(String),
    /// The requested quantity is not a positive whole number of seats.
    InvalidQuantity(u32),
    /// The assignment target identifier is empty.
    EmptyTargetId,
    /// The target kind string is not a recognized kind.
    InvalidTargetKind(String),
    /// A catalog entry lists itself as its own prerequisite.
    SelfPrerequisite(LicenseType),
    /// A catalog entry lists itself as its own conflict.
    SelfConflict(LicenseType),
    /// A catalog was constructed with two entries for the same type.
    DuplicateCatalogEntry(LicenseType),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLicenseType(name) => write!(f, "Unknown license type: {name}"),
            Self::InvalidQuantity(quantity) => {
                write!(f, "Quantity must be a positive integer, got {quantity}")
            }
            Self::EmptyTargetId => write!(f, "Target id cannot be empty"),
            Self::InvalidTargetKind(kind) => write!(f, "Invalid target kind: {kind}"),
            Self::SelfPrerequisite(license_type) => {
                write!(f, "{license_type} lists itself as a prerequisite")
            }
            Self::SelfConflict(license_type) => {
                write!(f, "{license_type} lists itself as a conflict")
            }
            Self::DuplicateCatalogEntry(license_type) => {
                write!(f, "Duplicate catalog entry for {license_type}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
