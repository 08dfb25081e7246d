//! # clm-core: Foundational Types for the Contract Lifecycle Manager
//!
//! Defines the record types every other crate in the workspace builds on:
//! blueprints and their typed fields, contract field values, and the
//! identifier newtypes that keep the four record families apart.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `BlueprintId`, `BlueprintFieldId`,
//!    `ContractId`, `FieldValueId`: you cannot pass a field id where a
//!    contract id is expected.
//!
//! 2. **Closed field type set.** [`FieldType`] has exactly four variants
//!    (`text`, `date`, `signature`, `checkbox`); every consumer matches
//!    exhaustively.
//!
//! 3. **String-serialized values.** Every field value is stored as an
//!    optional string. Checkbox values use the literal strings `"true"` and
//!    `"false"`; dates use ISO `YYYY-MM-DD`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `clm-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod blueprint;
pub mod error;
pub mod field_value;
pub mod identity;

pub use blueprint::{
    Blueprint, BlueprintField, BlueprintWithFields, FieldGeometry, FieldType,
};
pub use error::ValidationError;
pub use field_value::{validate_value_format, ContractFieldValue, CHECKBOX_FALSE, CHECKBOX_TRUE};
pub use identity::{BlueprintFieldId, BlueprintId, ContractId, FieldValueId};
