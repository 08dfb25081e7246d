//! # clm-state: Contract Lifecycle Rules
//!
//! Pure functions and records governing how a contract moves through its
//! statuses and when its field values may change. Persistence calls into
//! this crate; nothing here performs I/O.
//!
//! ## Modules
//!
//! - **Lifecycle** (`lifecycle.rs`): the status enum, the linear forward
//!   path `created → approved → sent → signed → locked`, and the off-path
//!   terminal `revoked`.
//!
//! - **Contract** (`contract.rs`): the contract record and milestone
//!   stamping on transition.
//!
//! - **Gate** (`gate.rs`): the required-field check on leaving `created`,
//!   the edit guard, and the configurable checkbox rule.
//!
//! - **Presentation** (`presentation.rs`): label, style class, and icon per
//!   status; the per-contract timeline.
//!
//! - **View** (`view.rs`): the client's navigation state as a tagged union.

pub mod contract;
pub mod gate;
pub mod lifecycle;
pub mod presentation;
pub mod view;

pub use contract::{Contract, Milestone};
pub use gate::{check_transition, check_value_write, missing_required_fields, CheckboxRule};
pub use lifecycle::{ContractStatus, LifecycleError, CONTRACT_LIFECYCLE};
pub use presentation::{LifecycleView, StatusPresentation, Timeline, TimelineEntry};
pub use view::{NavEvent, ViewState};
