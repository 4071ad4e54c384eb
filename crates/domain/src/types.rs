// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// A license SKU known to the system.
///
/// The enumeration is fixed at compile time; the catalog decides which
/// members are actually purchasable and how they relate to each other.
/// Wire names match the upstream directory provider's SKU identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LicenseType {
    /// Azure AD Premium Plan 1.
    #[serde(rename = "AAD_PREMIUM_P1")]
    AadPremiumP1,
    /// Azure AD Premium Plan 2.
    #[serde(rename = "AAD_PREMIUM_P2")]
    AadPremiumP2,
    /// Office 365 Business Essentials.
    #[serde(rename = "O365_BUSINESS_ESSENTIALS")]
    O365BusinessEssentials,
    /// Office 365 Business Premium.
    #[serde(rename = "O365_BUSINESS_PREMIUM")]
    O365BusinessPremium,
    /// Microsoft 365 Business Standard.
    #[serde(rename = "M365_BUSINESS_STANDARD")]
    M365BusinessStandard,
    /// Microsoft 365 Business Premium.
    #[serde(rename = "M365_BUSINESS_PREMIUM")]
    M365BusinessPremium,
    /// Microsoft 365 E3.
    #[serde(rename = "M365_E3")]
    M365E3,
    /// Microsoft 365 E5.
    #[serde(rename = "M365_E5")]
    M365E5,
}

impl LicenseType {
    /// All license types, in catalog order.
    pub const ALL: [Self; 8] = [
        Self::AadPremiumP1,
        Self::AadPremiumP2,
        Self::O365BusinessEssentials,
        Self::O365BusinessPremium,
        Self::M365BusinessStandard,
        Self::M365BusinessPremium,
        Self::M365E3,
        Self::M365E5,
    ];

    /// Converts this license type to its wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AadPremiumP1 => "AAD_PREMIUM_P1",
            Self::AadPremiumP2 => "AAD_PREMIUM_P2",
            Self::O365BusinessEssentials => "O365_BUSINESS_ESSENTIALS",
            Self::O365BusinessPremium => "O365_BUSINESS_PREMIUM",
            Self::M365BusinessStandard => "M365_BUSINESS_STANDARD",
            Self::M365BusinessPremium => "M365_BUSINESS_PREMIUM",
            Self::M365E3 => "M365_E3",
            Self::M365E5 => "M365_E5",
        }
    }
}

impl FromStr for LicenseType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AAD_PREMIUM_P1" => Ok(Self::AadPremiumP1),
            "AAD_PREMIUM_P2" => Ok(Self::AadPremiumP2),
            "O365_BUSINESS_ESSENTIALS" => Ok(Self::O365BusinessEssentials),
            "O365_BUSINESS_PREMIUM" => Ok(Self::O365BusinessPremium),
            "M365_BUSINESS_STANDARD" => Ok(Self::M365BusinessStandard),
            "M365_BUSINESS_PREMIUM" => Ok(Self::M365BusinessPremium),
            "M365_E3" => Ok(Self::M365E3),
            "M365_E5" => Ok(Self::M365E5),
            _ => Err(DomainError::UnknownLicenseType(s.to_string())),
        }
    }
}

impl std::fmt::Display for LicenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of entity a license can be granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// An individual directory user.
    #[serde(rename = "user")]
    User,
    /// A directory group; members inherit the grant.
    #[serde(rename = "group")]
    Group,
}

impl TargetKind {
    /// Converts this target kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

impl FromStr for TargetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            _ => Err(DomainError::InvalidTargetKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The user or group a license is being granted to or revoked from.
///
/// The identifier is opaque; it is resolved by the external directory
/// and the core does not own its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentTarget {
    /// The directory identifier of the target.
    pub id: String,
    /// Whether the target is a user or a group.
    pub kind: TargetKind,
}

impl AssignmentTarget {
    /// Creates a new `AssignmentTarget`.
    ///
    /// # Arguments
    ///
    /// * `id` - The directory identifier
    /// * `kind` - The kind of target
    #[must_use]
    pub const fn new(id: String, kind: TargetKind) -> Self {
        Self { id, kind }
    }
}

/// A request to grant license seats to a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// The target of the grant.
    pub target: AssignmentTarget,
    /// The license type being requested.
    pub license_type: LicenseType,
    /// The number of seats requested. Whole seats only; must be positive.
    pub quantity: u32,
}

impl AssignmentRequest {
    /// Creates a new `AssignmentRequest`.
    ///
    /// # Arguments
    ///
    /// * `target` - The target of the grant
    /// * `license_type` - The license type being requested
    /// * `quantity` - The number of seats requested
    #[must_use]
    pub const fn new(target: AssignmentTarget, license_type: LicenseType, quantity: u32) -> Self {
        Self {
            target,
            license_type,
            quantity,
        }
    }

    /// Creates a request for a single seat, the common case.
    #[must_use]
    pub const fn single(target: AssignmentTarget, license_type: LicenseType) -> Self {
        Self::new(target, license_type, 1)
    }
}

/// The set of license types currently held by a target.
///
/// This is a read-only snapshot fetched from the external directory at
/// validation time. It is never cached across validations; a stale
/// snapshot would let dependency and conflict checks pass against
/// holdings that no longer exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldLicenses {
    held: BTreeSet<LicenseType>,
}

impl HeldLicenses {
    /// Creates an empty held set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            held: BTreeSet::new(),
        }
    }

    /// Checks whether the target holds the given license type.
    #[must_use]
    pub fn contains(&self, license_type: LicenseType) -> bool {
        self.held.contains(&license_type)
    }

    /// Adds a license type to the set.
    pub fn insert(&mut self, license_type: LicenseType) {
        self.held.insert(license_type);
    }

    /// Removes a license type from the set.
    pub fn remove(&mut self, license_type: LicenseType) {
        self.held.remove(&license_type);
    }

    /// Iterates over the held license types in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = LicenseType> + '_ {
        self.held.iter().copied()
    }

    /// Returns the number of distinct license types held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Checks whether the target holds no licenses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl FromIterator<LicenseType> for HeldLicenses {
    fn from_iter<I: IntoIterator<Item = LicenseType>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}
