//! # clm-store: Persistence for the Contract Lifecycle Manager
//!
//! In-memory record stores with optional Postgres write-through, wrapped in
//! a [`Repository`] that enforces the lifecycle rules from `clm-state` on
//! every write.
//!
//! ## Crate Policy
//!
//! - Locks are `parking_lot` and never held across `.await`.
//! - With a database, the database write happens first; the in-memory
//!   mirror changes only after it succeeds.

pub mod db;
pub mod error;
pub mod query;
pub mod records;
pub mod repository;
pub mod store;

pub use error::StoreError;
pub use query::{
    build_dashboard, ContractSummary, Dashboard, DashboardQuery, DashboardStats, SortKey,
    SortOrder, UNKNOWN_BLUEPRINT,
};
pub use records::{
    BlueprintPatch, ContractDetails, FieldPatch, NewBlueprint, NewContract, NewField, ValueEntry,
};
pub use repository::Repository;
pub use store::Store;
