// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Infrastructure failures, as distinct from rule violations.
//!
//! A rule violation (insufficient seats, missing prerequisite, active
//! conflict) is a normal answer and travels inside a verdict or
//! result. An infrastructure error means the engine could not get an
//! answer at all; it is retryable by the caller and must never be
//! silently converted into a rule violation.

use std::time::Duration;
use thiserror::Error;

/// A collaborator could not be reached or did not answer in time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfrastructureError {
    /// The inventory store failed or could not be reached.
    #[error("Inventory store unreachable: {0}")]
    InventoryStore(String),

    /// The directory/assignment source failed or could not be reached.
    #[error("Directory unreachable: {0}")]
    Directory(String),

    /// An external call did not complete within its bound.
    #[error("Operation '{operation}' timed out after {timeout:?}")]
    Timeout {
        /// The external call that expired.
        operation: &'static str,
        /// The bound that was exceeded.
        timeout: Duration,
    },
}
