// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// The lifecycle of one assignment request inside the orchestrator.
///
/// Terminal states are `Granted`, `Invalid`, `ReserveFailed`, and
/// `InfraError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssignmentPhase {
    /// Request received, nothing checked yet.
    #[default]
    Pending,
    /// The validator is producing a verdict.
    Validating,
    /// The verdict passed; reservation has not started.
    Valid,
    /// The verdict failed; no side effects were performed.
    Invalid,
    /// Seats are being reserved against the ledger.
    Reserving,
    /// Seats reserved and the external grant confirmed.
    Granted,
    /// The reservation lost the race for the remaining seats.
    ReserveFailed,
    /// A collaborator failed or timed out.
    InfraError,
}

impl AssignmentPhase {
    /// Converts this phase to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Validating => "Validating",
            Self::Valid => "Valid",
            Self::Invalid => "Invalid",
            Self::Reserving => "Reserving",
            Self::Granted => "Granted",
            Self::ReserveFailed => "ReserveFailed",
            Self::InfraError => "InfraError",
        }
    }

    /// Checks if a transition from this phase to another is valid.
    ///
    /// Valid transitions are:
    /// - Pending → Validating
    /// - Validating → Valid | Invalid | `InfraError`
    /// - Valid → Reserving
    /// - Reserving → Granted | `ReserveFailed` | `InfraError`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Validating)
                | (Self::Validating, Self::Valid | Self::Invalid | Self::InfraError)
                | (Self::Valid, Self::Reserving)
                | (Self::Reserving, Self::Granted | Self::ReserveFailed | Self::InfraError)
        )
    }

    /// Returns whether this phase ends the request.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Granted | Self::Invalid | Self::ReserveFailed | Self::InfraError
        )
    }
}

impl std::fmt::Display for AssignmentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
