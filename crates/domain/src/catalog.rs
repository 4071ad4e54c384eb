// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::LicenseType;
use std::collections::{BTreeMap, BTreeSet};

/// One row of the license catalog.
///
/// Declares, for a single license type, which types must already be
/// held before it may be granted and which types it cannot be co-held
/// with. Both sets contain direct relations only; the catalog does not
/// compute transitive closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// The license type this entry describes.
    pub license_type: LicenseType,
    /// Types that must already be held before this one may be granted.
    pub prerequisites: BTreeSet<LicenseType>,
    /// Types this one may not be co-held with.
    pub conflicts: BTreeSet<LicenseType>,
}

impl CatalogEntry {
    /// Creates a new catalog entry.
    ///
    /// # Arguments
    ///
    /// * `license_type` - The license type this entry describes
    /// * `prerequisites` - Types required before this one may be granted
    /// * `conflicts` - Types this one may not be co-held with
    #[must_use]
    pub fn new(
        license_type: LicenseType,
        prerequisites: impl IntoIterator<Item = LicenseType>,
        conflicts: impl IntoIterator<Item = LicenseType>,
    ) -> Self {
        Self {
            license_type,
            prerequisites: prerequisites.into_iter().collect(),
            conflicts: conflicts.into_iter().collect(),
        }
    }
}

/// The immutable registry of known license types and their relations.
///
/// Constructed once at process start and shared by reference with every
/// component that needs it. There is deliberately no global table; a
/// catalog is always passed explicitly.
///
/// The declared conflict relation is not required to be symmetric in
/// the table itself. The resolver enforces symmetry structurally by
/// checking both directions, so a one-directional row cannot produce a
/// one-directional rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseCatalog {
    entries: BTreeMap<LicenseType, CatalogEntry>,
}

impl LicenseCatalog {
    /// Builds a catalog from a list of entries.
    ///
    /// # Arguments
    ///
    /// * `entries` - One entry per license type
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An entry lists its own type as a prerequisite or conflict
    /// - Two entries describe the same license type
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self, DomainError> {
        let mut table: BTreeMap<LicenseType, CatalogEntry> = BTreeMap::new();

        for entry in entries {
            // Rule: a type never relates to itself
            if entry.prerequisites.contains(&entry.license_type) {
                return Err(DomainError::SelfPrerequisite(entry.license_type));
            }
            if entry.conflicts.contains(&entry.license_type) {
                return Err(DomainError::SelfConflict(entry.license_type));
            }
            if table.contains_key(&entry.license_type) {
                return Err(DomainError::DuplicateCatalogEntry(entry.license_type));
            }
            table.insert(entry.license_type, entry);
        }

        Ok(Self { entries: table })
    }

    /// Builds the standard Microsoft SKU catalog.
    ///
    /// Tier dependencies: each premium tier requires its base tier.
    /// Conflicts: the enterprise suites (E3/E5) cannot be co-held with
    /// the business premium suites, and AAD P2 supersedes P1.
    #[must_use]
    pub fn standard() -> Self {
        use LicenseType::{
            AadPremiumP1, AadPremiumP2, M365BusinessPremium, M365BusinessStandard, M365E3, M365E5,
            O365BusinessEssentials, O365BusinessPremium,
        };

        let entries: Vec<CatalogEntry> = vec![
            CatalogEntry::new(AadPremiumP1, [], []),
            CatalogEntry::new(AadPremiumP2, [AadPremiumP1], [AadPremiumP1]),
            CatalogEntry::new(O365BusinessEssentials, [], []),
            CatalogEntry::new(O365BusinessPremium, [O365BusinessEssentials], [M365E5, M365E3]),
            CatalogEntry::new(M365BusinessStandard, [], []),
            CatalogEntry::new(M365BusinessPremium, [M365BusinessStandard], [M365E5, M365E3]),
            CatalogEntry::new(M365E3, [], [M365BusinessPremium, O365BusinessPremium]),
            CatalogEntry::new(M365E5, [M365E3], [M365BusinessPremium, O365BusinessPremium]),
        ];

        // The standard table is static data that satisfies the entry
        // invariants by construction.
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.license_type, entry))
                .collect(),
        }
    }

    /// Checks whether the catalog has an entry for the given type.
    #[must_use]
    pub fn contains(&self, license_type: LicenseType) -> bool {
        self.entries.contains_key(&license_type)
    }

    /// Returns the entry for a license type, if one exists.
    #[must_use]
    pub fn entry(&self, license_type: LicenseType) -> Option<&CatalogEntry> {
        self.entries.get(&license_type)
    }

    /// Returns the declared direct prerequisites of a license type.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownLicenseType` if the catalog has no
    /// entry for the type.
    pub fn prerequisites_of(
        &self,
        license_type: LicenseType,
    ) -> Result<&BTreeSet<LicenseType>, DomainError> {
        self.entries
            .get(&license_type)
            .map(|entry| &entry.prerequisites)
            .ok_or_else(|| DomainError::UnknownLicenseType(license_type.as_str().to_string()))
    }

    /// Returns the declared direct conflicts of a license type.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownLicenseType` if the catalog has no
    /// entry for the type.
    pub fn conflicts_of(
        &self,
        license_type: LicenseType,
    ) -> Result<&BTreeSet<LicenseType>, DomainError> {
        self.entries
            .get(&license_type)
            .map(|entry| &entry.conflicts)
            .ok_or_else(|| DomainError::UnknownLicenseType(license_type.as_str().to_string()))
    }

    /// Iterates over the license types in the catalog.
    pub fn license_types(&self) -> impl Iterator<Item = LicenseType> + '_ {
        self.entries.keys().copied()
    }
}
