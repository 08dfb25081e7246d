//! # Status Display Metadata
//!
//! Fixed lookup tables (label, style class, icon glyph) per status, the
//! per-contract lifecycle timeline, and the combined lifecycle view served
//! to clients.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::contract::Contract;
use crate::lifecycle::{ContractStatus, CONTRACT_LIFECYCLE};

impl ContractStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Approved => "Approved",
            Self::Sent => "Sent",
            Self::Signed => "Signed",
            Self::Locked => "Locked",
            Self::Revoked => "Revoked",
        }
    }

    /// Badge style classes.
    pub fn style_class(&self) -> &'static str {
        match self {
            Self::Created => "bg-slate-100 text-slate-700 border-slate-300",
            Self::Approved => "bg-blue-100 text-blue-700 border-blue-300",
            Self::Sent => "bg-amber-100 text-amber-700 border-amber-300",
            Self::Signed => "bg-emerald-100 text-emerald-700 border-emerald-300",
            Self::Locked => "bg-gray-100 text-gray-700 border-gray-400",
            Self::Revoked => "bg-red-100 text-red-700 border-red-300",
        }
    }

    /// Badge icon glyph.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Created => "📝",
            Self::Approved => "✓",
            Self::Sent => "📤",
            Self::Signed => "✍️",
            Self::Locked => "🔒",
            Self::Revoked => "❌",
        }
    }
}

/// Display metadata for one status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusPresentation {
    pub status: ContractStatus,
    pub label: &'static str,
    pub style_class: &'static str,
    pub icon: &'static str,
    pub progress: f64,
    pub next_status: Option<ContractStatus>,
    pub can_revoke: bool,
    pub editable: bool,
}

impl StatusPresentation {
    pub fn of(status: ContractStatus) -> Self {
        Self {
            status,
            label: status.label(),
            style_class: status.style_class(),
            icon: status.icon(),
            progress: status.progress(),
            next_status: status.next_valid_status(),
            can_revoke: status.can_revoke(),
            editable: status.is_editable(),
        }
    }

    /// The full table, one row per status.
    pub fn table() -> Vec<Self> {
        ContractStatus::ALL.into_iter().map(Self::of).collect()
    }
}

/// One step of a contract's timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimelineEntry {
    pub status: ContractStatus,
    pub label: &'static str,
    /// The step has been reached.
    pub completed: bool,
    /// The contract currently sits on this step.
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
}

/// The forward path of a contract with completion markers, plus the
/// revocation entry for revoked contracts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Timeline {
    pub steps: Vec<TimelineEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked: Option<TimelineEntry>,
}

impl Timeline {
    pub fn for_contract(contract: &Contract) -> Self {
        let revoked = contract.status == ContractStatus::Revoked;
        let current_index = contract.status.lifecycle_index();

        let steps = CONTRACT_LIFECYCLE
            .iter()
            .enumerate()
            .map(|(index, status)| {
                let (completed, current) = match current_index {
                    Some(ci) if !revoked => (index <= ci, index == ci),
                    _ => (false, false),
                };
                TimelineEntry {
                    status: *status,
                    label: status.label(),
                    completed,
                    current,
                    at: contract.status_date(*status),
                }
            })
            .collect();

        let revoked = revoked.then(|| TimelineEntry {
            status: ContractStatus::Revoked,
            label: ContractStatus::Revoked.label(),
            completed: true,
            current: true,
            at: contract.revoked_at.or(Some(contract.updated_at)),
        });

        Self { steps, revoked }
    }
}

/// Everything a client needs to render a contract's status panel and its
/// available actions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LifecycleView {
    #[serde(flatten)]
    pub presentation: StatusPresentation,
    pub valid_transitions: Vec<ContractStatus>,
    pub timeline: Timeline,
}

impl LifecycleView {
    pub fn for_contract(contract: &Contract) -> Self {
        Self {
            presentation: StatusPresentation::of(contract.status),
            valid_transitions: contract.status.valid_transitions(),
            timeline: Timeline::for_contract(contract),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clm_core::BlueprintId;

    fn contract() -> Contract {
        Contract::new(BlueprintId::new(), "Lease", Utc::now()).unwrap()
    }

    #[test]
    fn every_status_has_distinct_label_and_icon() {
        let table = StatusPresentation::table();
        assert_eq!(table.len(), 6);
        let mut labels: Vec<_> = table.iter().map(|p| p.label).collect();
        labels.dedup();
        assert_eq!(labels.len(), 6);
        assert_eq!(ContractStatus::Locked.icon(), "🔒");
        assert_eq!(ContractStatus::Revoked.label(), "Revoked");
        assert!(ContractStatus::Sent.style_class().contains("amber"));
    }

    #[test]
    fn presentation_reflects_lifecycle_rules() {
        let p = StatusPresentation::of(ContractStatus::Sent);
        assert_eq!(p.next_status, Some(ContractStatus::Signed));
        assert!(p.can_revoke);
        assert!(!p.editable);
        assert_eq!(p.progress, 60.0);
    }

    #[test]
    fn timeline_marks_completed_and_current_steps() {
        let mut c = contract();
        c.apply_transition(ContractStatus::Approved, Utc::now()).unwrap();
        let t = Timeline::for_contract(&c);
        assert_eq!(t.steps.len(), 5);
        assert!(t.steps[0].completed && !t.steps[0].current);
        assert!(t.steps[1].completed && t.steps[1].current);
        assert!(!t.steps[2].completed);
        assert_eq!(t.steps[0].at, Some(c.created_at));
        assert_eq!(t.steps[1].at, c.approved_at);
        assert!(t.steps[2].at.is_none());
        assert!(t.revoked.is_none());
    }

    #[test]
    fn revoked_timeline_has_no_completed_steps() {
        let mut c = contract();
        c.apply_transition(ContractStatus::Revoked, Utc::now()).unwrap();
        let t = Timeline::for_contract(&c);
        assert!(t.steps.iter().all(|s| !s.completed && !s.current));
        let revoked = t.revoked.unwrap();
        assert_eq!(revoked.at, c.revoked_at);
    }

    #[test]
    fn lifecycle_view_lists_actions() {
        let c = contract();
        let view = LifecycleView::for_contract(&c);
        assert_eq!(
            view.valid_transitions,
            vec![ContractStatus::Approved, ContractStatus::Revoked]
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["label"], "Created");
        assert_eq!(json["next_status"], "approved");
        assert_eq!(json["timeline"]["steps"][0]["current"], true);
    }
}
