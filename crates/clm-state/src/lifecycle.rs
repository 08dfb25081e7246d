//! # Contract Status State Machine
//!
//! ## States
//!
//! ```text
//! Created ──▶ Approved ──▶ Sent ──▶ Signed ──▶ Locked (terminal)
//!    │                      │
//!    └──────▶ Revoked ◀─────┘
//!             (terminal)
//! ```
//!
//! The forward path is strictly linear: there is never more than one valid
//! forward target, no state may be skipped, and nothing moves backward.
//! `Revoked` is an off-path terminal state reachable only from `Created`
//! and `Sent`. `Locked` and `Revoked` accept no transitions at all.
//!
//! ## Design Decision
//!
//! Contracts are loaded from storage with a status that is only known at
//! runtime, so the machine is a plain enum with validated transitions
//! rather than typestate types. Every function here is pure: persistence
//! calls into this module, never the reverse.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use clm_core::ValidationError;

// ─── Contract Status ─────────────────────────────────────────────────

/// The lifecycle status of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Freshly instantiated; field values are editable.
    Created,
    /// Internally approved; values are frozen.
    Approved,
    /// Sent to the counterparty for signature.
    Sent,
    /// Signed by the counterparty.
    Signed,
    /// Final, immutable (terminal).
    Locked,
    /// Withdrawn before completion (terminal).
    Revoked,
}

/// The linear forward path, in order. `Revoked` is not part of it.
pub const CONTRACT_LIFECYCLE: [ContractStatus; 5] = [
    ContractStatus::Created,
    ContractStatus::Approved,
    ContractStatus::Sent,
    ContractStatus::Signed,
    ContractStatus::Locked,
];

impl ContractStatus {
    /// Every status, forward path first.
    pub const ALL: [ContractStatus; 6] = [
        Self::Created,
        Self::Approved,
        Self::Sent,
        Self::Signed,
        Self::Locked,
        Self::Revoked,
    ];

    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Approved => "approved",
            Self::Sent => "sent",
            Self::Signed => "signed",
            Self::Locked => "locked",
            Self::Revoked => "revoked",
        }
    }

    /// Position on the forward path, or `None` for `Revoked`.
    pub fn lifecycle_index(&self) -> Option<usize> {
        CONTRACT_LIFECYCLE.iter().position(|s| s == self)
    }

    /// Whether no transition at all is possible from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Locked | Self::Revoked)
    }

    /// The single forward successor of this status, if any.
    pub fn next_valid_status(&self) -> Option<ContractStatus> {
        if self.is_terminal() {
            return None;
        }
        let index = self.lifecycle_index()?;
        CONTRACT_LIFECYCLE.get(index + 1).copied()
    }

    /// Whether `target` is reachable from this status in one step.
    pub fn can_transition_to(&self, target: ContractStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if target == Self::Revoked {
            return self.can_revoke();
        }
        self.next_valid_status() == Some(target)
    }

    /// Whether a contract in this status may be revoked.
    ///
    /// Approved, signed, and locked contracts cannot be revoked.
    pub fn can_revoke(&self) -> bool {
        matches!(self, Self::Created | Self::Sent)
    }

    /// Whether field values may be edited. Only `Created` is editable;
    /// approval freezes the values.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Created)
    }

    /// Display progress along the forward path, in percent.
    ///
    /// `Revoked` maps to 0.
    pub fn progress(&self) -> f64 {
        match self.lifecycle_index() {
            Some(index) => (index + 1) as f64 / CONTRACT_LIFECYCLE.len() as f64 * 100.0,
            None => 0.0,
        }
    }

    /// All statuses reachable in one step: the forward successor, then
    /// `Revoked` where allowed.
    pub fn valid_transitions(&self) -> Vec<ContractStatus> {
        Self::ALL
            .into_iter()
            .filter(|target| self.can_transition_to(*target))
            .collect()
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContractStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                what: "contract status",
                value: s.to_string(),
            })
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by lifecycle checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    /// The target status is not reachable from the current status.
    #[error("cannot transition contract from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: ContractStatus,
        /// Attempted target status.
        to: ContractStatus,
    },

    /// Required fields are unset; the labels are listed in presentation order.
    #[error("please fill in all required fields: {}", .labels.join(", "))]
    MissingRequiredFields {
        /// Labels of the missing fields.
        labels: Vec<String>,
    },

    /// The contract's field values are frozen.
    #[error("contract is {status}; field values can only be edited while created")]
    NotEditable {
        /// The contract's current status.
        status: ContractStatus,
    },

    /// A written value is malformed for its field type.
    #[error(transparent)]
    InvalidValue(#[from] ValidationError),
}

// ─── Tests ───────────────────────────────────────────────────────────
