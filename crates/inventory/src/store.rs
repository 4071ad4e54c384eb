// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::InventoryError;
use seatwise_domain::LicenseType;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Seat counts for one license type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatTotals {
    /// The total number of purchased seats.
    pub total: u32,
    /// The number of seats currently consumed by grants.
    pub consumed: u32,
}

impl SeatTotals {
    /// Creates new seat totals.
    ///
    /// # Arguments
    ///
    /// * `total` - The total number of purchased seats
    /// * `consumed` - The number of seats currently consumed
    #[must_use]
    pub const fn new(total: u32, consumed: u32) -> Self {
        Self { total, consumed }
    }

    /// Returns the number of available seats, never negative.
    #[must_use]
    pub const fn available(&self) -> u32 {
        self.total.saturating_sub(self.consumed)
    }
}

/// Contract for the backing seat store.
///
/// `try_set_consumed` is the serialization primitive: it atomically
/// replaces the consumed count only if the caller's expectation still
/// holds. Every mutation of consumed seats goes through it, which is
/// what makes concurrent reservations safe without a lock spanning the
/// read.
pub trait InventoryStore: Send + Sync {
    /// Registers a license type with a total seat count.
    ///
    /// Re-registering an existing type updates its total and keeps the
    /// consumed count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn register(&self, license_type: LicenseType, total: u32) -> Result<(), InventoryError>;

    /// Reads the seat totals for a license type.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::UnknownLicenseType` if the type has no
    /// record, or `InventoryError::StoreUnavailable` if the store
    /// cannot be reached.
    fn get_totals(&self, license_type: LicenseType) -> Result<SeatTotals, InventoryError>;

    /// Atomically sets the consumed count if it still equals `expected`.
    ///
    /// Returns `false` if the stored count no longer matches, meaning
    /// another writer got there first and the caller must re-read.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::UnknownLicenseType` if the type has no
    /// record, or `InventoryError::StoreUnavailable` if the store
    /// cannot be reached.
    fn try_set_consumed(
        &self,
        license_type: LicenseType,
        expected: u32,
        desired: u32,
    ) -> Result<bool, InventoryError>;
}

/// An in-process seat store.
///
/// Backs the server's default wiring and the test suites. A deployment
/// against a remote store supplies its own `InventoryStore`
/// implementation with the same compare-and-swap contract.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    records: Mutex<BTreeMap<LicenseType, SeatTotals>>,
}

impl InMemoryInventoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<LicenseType, SeatTotals>>, InventoryError> {
        self.records
            .lock()
            .map_err(|_| InventoryError::StoreUnavailable(String::from("record lock poisoned")))
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn register(&self, license_type: LicenseType, total: u32) -> Result<(), InventoryError> {
        let mut records = self.lock()?;
        records
            .entry(license_type)
            .and_modify(|totals| totals.total = total)
            .or_insert_with(|| SeatTotals::new(total, 0));
        Ok(())
    }

    fn get_totals(&self, license_type: LicenseType) -> Result<SeatTotals, InventoryError> {
        let records = self.lock()?;
        records
            .get(&license_type)
            .copied()
            .ok_or(InventoryError::UnknownLicenseType(license_type))
    }

    fn try_set_consumed(
        &self,
        license_type: LicenseType,
        expected: u32,
        desired: u32,
    ) -> Result<bool, InventoryError> {
        let mut records = self.lock()?;
        let totals: &mut SeatTotals = records
            .get_mut(&license_type)
            .ok_or(InventoryError::UnknownLicenseType(license_type))?;

        if totals.consumed == expected {
            totals.consumed = desired;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
