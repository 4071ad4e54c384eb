// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Seat inventory for license types.
//!
//! The ledger is the only mutable shared state in the entitlement
//! engine. Reservation is serialized per license type through the
//! store's compare-and-swap primitive: two concurrent reservations for
//! the last seat cannot both succeed.

mod error;
mod ledger;
mod store;

#[cfg(test)]
mod tests;

pub use error::InventoryError;
pub use ledger::InventoryLedger;
pub use store::{InMemoryInventoryStore, InventoryStore, SeatTotals};
