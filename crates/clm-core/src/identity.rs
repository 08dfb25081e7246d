//! # Record Identity Newtypes
//!
//! Newtype wrappers for the identifiers of the four record families.
//! These prevent accidental identifier confusion: a `BlueprintFieldId`
//! cannot be passed where a `ContractId` is expected, which matters because
//! field values are keyed by both.
//!
//! All identifiers are UUIDv4 and serialize as the bare UUID string.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a blueprint (reusable contract template).
    BlueprintId,
    "blueprint"
);

uuid_id!(
    /// Unique identifier for one field definition within a blueprint.
    BlueprintFieldId,
    "field"
);

uuid_id!(
    /// Unique identifier for a contract instantiated from a blueprint.
    ContractId,
    "contract"
);

uuid_id!(
    /// Unique identifier for a stored (contract, field) value row.
    FieldValueId,
    "value"
);
