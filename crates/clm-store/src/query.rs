//! # Dashboard Queries
//!
//! Filtering, search, sorting, and status counts over the contract list.
//! Stats always count every contract; the filter only narrows the listing.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use clm_core::{BlueprintId, ValidationError};
use clm_state::{Contract, ContractStatus};

/// Shown in place of the blueprint name when the blueprint was deleted.
pub const UNKNOWN_BLUEPRINT: &str = "Unknown Blueprint";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
}

impl std::str::FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "name" => Ok(Self::Name),
            other => Err(ValidationError::UnknownVariant {
                what: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Dashboard listing parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(
    feature = "openapi",
    derive(utoipa::IntoParams),
    into_params(parameter_in = Query)
)]
pub struct DashboardQuery {
    /// Only contracts in this status.
    #[serde(default)]
    pub status: Option<ContractStatus>,
    /// Case-insensitive substring of the contract name.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl DashboardQuery {
    fn matches(&self, contract: &Contract, needle: Option<&str>) -> bool {
        if let Some(status) = self.status {
            if contract.status != status {
                return false;
            }
        }
        match needle {
            Some(n) => contract.name.to_lowercase().contains(n),
            None => true,
        }
    }

    fn compare(&self, a: &Contract, b: &Contract) -> Ordering {
        let ord = match self.sort_by {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        };
        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// Status counts across all contracts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DashboardStats {
    pub total: usize,
    /// Created or approved.
    pub active: usize,
    /// Sent and awaiting signature.
    pub pending: usize,
    /// Signed or locked.
    pub signed: usize,
    pub revoked: usize,
}

impl DashboardStats {
    pub fn of<'a>(contracts: impl IntoIterator<Item = &'a Contract>) -> Self {
        let mut stats = Self::default();
        for c in contracts {
            stats.total += 1;
            match c.status {
                ContractStatus::Created | ContractStatus::Approved => stats.active += 1,
                ContractStatus::Sent => stats.pending += 1,
                ContractStatus::Signed | ContractStatus::Locked => stats.signed += 1,
                ContractStatus::Revoked => stats.revoked += 1,
            }
        }
        stats
    }
}

/// A listed contract with its blueprint's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContractSummary {
    #[serde(flatten)]
    pub contract: Contract,
    pub blueprint_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Dashboard {
    pub contracts: Vec<ContractSummary>,
    pub stats: DashboardStats,
}

/// Build the dashboard from all contracts and a blueprint-name lookup.
pub fn build_dashboard(
    contracts: Vec<Contract>,
    blueprint_names: &HashMap<BlueprintId, String>,
    query: &DashboardQuery,
) -> Dashboard {
    let stats = DashboardStats::of(&contracts);
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut listed: Vec<Contract> = contracts
        .into_iter()
        .filter(|c| query.matches(c, needle.as_deref()))
        .collect();
    listed.sort_by(|a, b| query.compare(a, b));

    let contracts = listed
        .into_iter()
        .map(|contract| {
            let blueprint_name = blueprint_names
                .get(&contract.blueprint_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_BLUEPRINT.to_string());
            ContractSummary {
                contract,
                blueprint_name,
            }
        })
        .collect();

    Dashboard { contracts, stats }
}
