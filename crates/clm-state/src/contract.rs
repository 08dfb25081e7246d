//! # Contract Record and Milestone Stamping
//!
//! A contract is an instance of a blueprint carrying a status and one
//! optional timestamp per lifecycle milestone. Each milestone is stamped
//! exactly once, when the contract enters the corresponding status, and is
//! never cleared or overwritten afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use clm_core::{BlueprintId, ContractId, ValidationError};

use crate::lifecycle::{ContractStatus, LifecycleError};

// ─── Milestones ──────────────────────────────────────────────────────

/// A stamped lifecycle milestone. Every status except `Created` has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    /// Stamped into `approved_at` on entering `Approved`.
    Approved,
    /// Stamped into `sent_at` on entering `Sent`.
    Sent,
    /// Stamped into `signed_at` on entering `Signed`.
    Signed,
    /// Stamped into `locked_at` on entering `Locked`.
    Locked,
    /// Stamped into `revoked_at` on entering `Revoked`.
    Revoked,
}

impl Milestone {
    /// The milestone stamped when a contract enters `status`.
    pub fn for_status(status: ContractStatus) -> Option<Milestone> {
        match status {
            ContractStatus::Created => None,
            ContractStatus::Approved => Some(Self::Approved),
            ContractStatus::Sent => Some(Self::Sent),
            ContractStatus::Signed => Some(Self::Signed),
            ContractStatus::Locked => Some(Self::Locked),
            ContractStatus::Revoked => Some(Self::Revoked),
        }
    }

    /// Name of the timestamp field (and database column) for this milestone.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Approved => "approved_at",
            Self::Sent => "sent_at",
            Self::Signed => "signed_at",
            Self::Locked => "locked_at",
            Self::Revoked => "revoked_at",
        }
    }
}

// ─── Contract ────────────────────────────────────────────────────────

/// A contract with its status and milestone timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Contract {
    pub id: ContractId,
    pub blueprint_id: BlueprintId,
    pub name: String,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Contract {
    /// Instantiate a contract from a blueprint in the `Created` status.
    ///
    /// The name is trimmed and must not be empty.
    pub fn new(
        blueprint_id: BlueprintId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName { what: "contract" });
        }
        Ok(Self {
            id: ContractId::new(),
            blueprint_id,
            name: name.to_string(),
            status: ContractStatus::Created,
            created_at: now,
            updated_at: now,
            approved_at: None,
            sent_at: None,
            signed_at: None,
            locked_at: None,
            revoked_at: None,
        })
    }

    /// The suggested name for a new contract: `"<blueprint> - <date>"`.
    pub fn default_name(blueprint_name: &str, on: NaiveDate) -> String {
        format!("{} - {}", blueprint_name.trim(), on.format("%Y-%m-%d"))
    }

    /// The timestamp recorded for a milestone, if it has been reached.
    pub fn milestone(&self, milestone: Milestone) -> Option<DateTime<Utc>> {
        match milestone {
            Milestone::Approved => self.approved_at,
            Milestone::Sent => self.sent_at,
            Milestone::Signed => self.signed_at,
            Milestone::Locked => self.locked_at,
            Milestone::Revoked => self.revoked_at,
        }
    }

    /// The timestamp at which the contract entered `status`, if it has.
    ///
    /// `Created` maps to `created_at`.
    pub fn status_date(&self, status: ContractStatus) -> Option<DateTime<Utc>> {
        match Milestone::for_status(status) {
            Some(milestone) => self.milestone(milestone),
            None => Some(self.created_at),
        }
    }

    fn milestone_slot(&mut self, milestone: Milestone) -> &mut Option<DateTime<Utc>> {
        match milestone {
            Milestone::Approved => &mut self.approved_at,
            Milestone::Sent => &mut self.sent_at,
            Milestone::Signed => &mut self.signed_at,
            Milestone::Locked => &mut self.locked_at,
            Milestone::Revoked => &mut self.revoked_at,
        }
    }

    /// Move to `target`, stamping exactly the target's milestone.
    ///
    /// Rejects the transition (leaving the contract untouched) if `target`
    /// is not reachable from the current status. Previously stamped
    /// milestones are never modified.
    pub fn apply_transition(
        &mut self,
        target: ContractStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Milestone>, LifecycleError> {
        if !self.status.can_transition_to(target) {
            return Err(LifecycleError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        let milestone = Milestone::for_status(target);
        if let Some(m) = milestone {
            let slot = self.milestone_slot(m);
            if slot.is_none() {
                *slot = Some(at);
            }
        }
        self.status = target;
        self.updated_at = at;
        Ok(milestone)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_contract() -> Contract {
        Contract::new(BlueprintId::new(), "Employment - Jane", Utc::now()).unwrap()
    }

    #[test]
    fn new_contract_starts_created_without_milestones() {
        let c = make_contract();
        assert_eq!(c.status, ContractStatus::Created);
        assert!(c.approved_at.is_none());
        assert!(c.revoked_at.is_none());
        assert_eq!(c.status_date(ContractStatus::Created), Some(c.created_at));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Contract::new(BlueprintId::new(), "  ", Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyName { what: "contract" });
    }

    #[test]
    fn default_name_appends_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            Contract::default_name("NDA ", date),
            "NDA - 2024-03-09"
        );
    }

    #[test]
    fn full_walk_stamps_each_milestone_once() {
        let mut c = make_contract();
        let t0 = c.created_at;
        let steps = [
            (ContractStatus::Approved, Milestone::Approved),
            (ContractStatus::Sent, Milestone::Sent),
            (ContractStatus::Signed, Milestone::Signed),
            (ContractStatus::Locked, Milestone::Locked),
        ];
        for (i, (target, milestone)) in steps.iter().enumerate() {
            let at = t0 + Duration::minutes(i as i64 + 1);
            let stamped = c.apply_transition(*target, at).unwrap();
            assert_eq!(stamped, Some(*milestone));
            assert_eq!(c.milestone(*milestone), Some(at));
        }
        assert_eq!(c.approved_at, Some(t0 + Duration::minutes(1)));
        assert_eq!(c.sent_at, Some(t0 + Duration::minutes(2)));
        assert_eq!(c.signed_at, Some(t0 + Duration::minutes(3)));
        assert_eq!(c.locked_at, Some(t0 + Duration::minutes(4)));
        assert!(c.revoked_at.is_none());
        assert_eq!(c.status, ContractStatus::Locked);
    }

    #[test]
    fn rejected_transition_leaves_contract_untouched() {
        let mut c = make_contract();
        let before = c.clone();
        let err = c
            .apply_transition(ContractStatus::Signed, Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: ContractStatus::Created,
                to: ContractStatus::Signed,
            }
        );
        assert_eq!(c, before);
    }

    #[test]
    fn revoking_from_sent_keeps_earlier_stamps() {
        let mut c = make_contract();
        c.apply_transition(ContractStatus::Approved, Utc::now()).unwrap();
        c.apply_transition(ContractStatus::Sent, Utc::now()).unwrap();
        let approved = c.approved_at;
        let sent = c.sent_at;
        c.apply_transition(ContractStatus::Revoked, Utc::now()).unwrap();
        assert_eq!(c.status, ContractStatus::Revoked);
        assert!(c.revoked_at.is_some());
        assert_eq!(c.approved_at, approved);
        assert_eq!(c.sent_at, sent);
    }

    #[test]
    fn milestone_columns() {
        assert_eq!(Milestone::for_status(ContractStatus::Created), None);
        assert_eq!(
            Milestone::for_status(ContractStatus::Revoked).map(|m| m.column()),
            Some("revoked_at")
        );
        assert_eq!(Milestone::Approved.column(), "approved_at");
    }

    #[test]
    fn unreached_milestones_are_omitted_from_json() {
        let c = make_contract();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["status"], "created");
        assert!(json.get("approved_at").is_none());
    }
}
