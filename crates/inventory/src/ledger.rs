// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::InventoryError;
use crate::store::{InventoryStore, SeatTotals};
use seatwise_domain::LicenseType;
use tracing::warn;

/// Tracks seat consumption and answers availability queries.
///
/// The ledger layers reservation semantics over the store's
/// compare-and-swap primitive. `reserve` is the only authoritative
/// availability check; any earlier read is advisory and may be
/// invalidated by a concurrent writer.
#[derive(Debug)]
pub struct InventoryLedger<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> InventoryLedger<S> {
    /// Creates a ledger over a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the number of available seats for a license type.
    ///
    /// A record with `consumed > total` is misconfigured data; it is
    /// reported as a consistency warning and surfaced as zero
    /// availability, never as a negative count or a crash.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::UnknownLicenseType` if the type has no
    /// record, or `InventoryError::StoreUnavailable` if the store
    /// cannot be reached.
    pub fn available_seats(&self, license_type: LicenseType) -> Result<u32, InventoryError> {
        let totals: SeatTotals = self.store.get_totals(license_type)?;
        if totals.consumed > totals.total {
            warn!(
                license_type = %license_type,
                total = totals.total,
                consumed = totals.consumed,
                "Inventory record has consumed > total"
            );
        }
        Ok(totals.available())
    }

    /// Atomically reserves `quantity` seats for a license type.
    ///
    /// Retries the compare-and-swap until it wins or availability runs
    /// out. Under concurrent reservations for the same type, at most
    /// `total` seats can ever be consumed.
    ///
    /// # Arguments
    ///
    /// * `license_type` - The license type to reserve seats for
    /// * `quantity` - The number of seats to reserve
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InsufficientInventory` if fewer than
    /// `quantity` seats remain, `InventoryError::UnknownLicenseType`
    /// if the type has no record, or
    /// `InventoryError::StoreUnavailable` if the store cannot be
    /// reached.
    pub fn reserve(&self, license_type: LicenseType, quantity: u32) -> Result<(), InventoryError> {
        loop {
            let totals: SeatTotals = self.store.get_totals(license_type)?;
            let available: u32 = totals.available();

            if available < quantity {
                return Err(InventoryError::InsufficientInventory {
                    license_type,
                    required: quantity,
                    available,
                });
            }

            let desired: u32 = totals.consumed.saturating_add(quantity);
            if self
                .store
                .try_set_consumed(license_type, totals.consumed, desired)?
            {
                return Ok(());
            }
            // Lost the swap to a concurrent writer; re-read and retry.
        }
    }

    /// Releases `quantity` seats for a license type, floored at zero.
    ///
    /// Releasing beyond zero is reported as a warning but is not an
    /// error: double-release must stay idempotent.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::UnknownLicenseType` if the type has no
    /// record, or `InventoryError::StoreUnavailable` if the store
    /// cannot be reached. Over-release is never an error.
    pub fn release(&self, license_type: LicenseType, quantity: u32) -> Result<(), InventoryError> {
        loop {
            let totals: SeatTotals = self.store.get_totals(license_type)?;

            if quantity > totals.consumed {
                warn!(
                    license_type = %license_type,
                    consumed = totals.consumed,
                    quantity = quantity,
                    "Release exceeds consumed seats; flooring at zero"
                );
            }

            let desired: u32 = totals.consumed.saturating_sub(quantity);
            if self
                .store
                .try_set_consumed(license_type, totals.consumed, desired)?
            {
                return Ok(());
            }
        }
    }
}
