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

mod catalog;
mod error;
mod resolver;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogEntry, LicenseCatalog};
pub use error::DomainError;
pub use resolver::{
    conflicting_holdings, conflicts_clear, missing_prerequisites, prerequisites_satisfied,
};
pub use types::{AssignmentRequest, AssignmentTarget, HeldLicenses, LicenseType, TargetKind};
pub use validation::validate_request;
