//! # API Route Modules
//!
//! - `blueprints`: blueprint CRUD and field management.
//! - `contracts`: instantiation, dashboard listing, details, value writes.
//! - `lifecycle`: status transitions and lifecycle views.

pub mod blueprints;
pub mod contracts;
pub mod lifecycle;
