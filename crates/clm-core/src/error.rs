//! # Validation Errors
//!
//! Input-level validation failures. These block an action locally before
//! any persistence call is made and name the offending input so the caller
//! can prompt for a correction.

use thiserror::Error;

/// A request input failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A name (blueprint or contract) is empty or whitespace-only.
    #[error("{what} name must not be empty")]
    EmptyName {
        /// Which record the name belongs to ("blueprint", "contract").
        what: &'static str,
    },

    /// A field label is empty or whitespace-only.
    #[error("field label must not be empty")]
    EmptyLabel,

    /// A date field value is not an ISO calendar date.
    #[error("field \"{label}\" expects an ISO date (YYYY-MM-DD), got \"{value}\"")]
    InvalidDate {
        /// Label of the field being written.
        label: String,
        /// The rejected value.
        value: String,
    },

    /// A checkbox field value is not `"true"` or `"false"`.
    #[error("field \"{label}\" expects \"true\" or \"false\", got \"{value}\"")]
    InvalidCheckbox {
        /// Label of the field being written.
        label: String,
        /// The rejected value.
        value: String,
    },

    /// A value was written for a field that is not part of the contract's
    /// blueprint.
    #[error("field {field_id} does not belong to this contract's blueprint")]
    ForeignField {
        /// The offending field id.
        field_id: String,
    },

    /// An unrecognized enum value was supplied (status, field type, sort key).
    #[error("unknown {what}: \"{value}\"")]
    UnknownVariant {
        /// What kind of value was being parsed.
        what: &'static str,
        /// The rejected input.
        value: String,
    },
}
