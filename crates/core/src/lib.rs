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

//! License entitlement engine.
//!
//! The [`LicenseService`] is the single entry point for assignment
//! work: it validates a request against the catalog, the seat ledger,
//! and the target's current holdings, performs the grant against the
//! external provider with a compensating release on failure, and
//! writes exactly one audit entry per attempt.

mod error;
mod phase;
mod provider;
mod service;
mod validator;
mod verdict;

#[cfg(test)]
mod tests;

pub use error::InfrastructureError;
pub use phase::AssignmentPhase;
pub use provider::{AssignmentProvider, AssignmentRecord, InMemoryDirectory, ProviderError};
pub use service::{AssignResult, LicenseService};
pub use verdict::AssignmentVerdict;
