//! # Transition Matrix
//!
//! Checks `can_transition_to` against an explicit 6x6 truth table, then
//! property-tests the lifecycle laws and milestone stamping over random
//! transition sequences.

use chrono::{Duration, Utc};
use proptest::prelude::*;

use clm_core::BlueprintId;
use clm_state::{Contract, ContractStatus, Milestone, CONTRACT_LIFECYCLE};
use clm_state::ContractStatus::*;

/// Expected reachability, rows = current, columns = target, both in
/// `ContractStatus::ALL` order.
const MATRIX: [[bool; 6]; 6] = [
    //  created approved sent   signed locked revoked
    [false, true, false, false, false, true],   // created
    [false, false, true, false, false, false],  // approved
    [false, false, false, true, false, true],   // sent
    [false, false, false, false, true, false],  // signed
    [false, false, false, false, false, false], // locked
    [false, false, false, false, false, false], // revoked
];

#[test]
fn transition_matrix_is_exact() {
    for (i, from) in ContractStatus::ALL.iter().enumerate() {
        for (j, to) in ContractStatus::ALL.iter().enumerate() {
            assert_eq!(
                from.can_transition_to(*to),
                MATRIX[i][j],
                "{from} -> {to}"
            );
        }
    }
}

#[test]
fn valid_transitions_agree_with_matrix() {
    for (i, from) in ContractStatus::ALL.iter().enumerate() {
        let expected: Vec<_> = ContractStatus::ALL
            .iter()
            .enumerate()
            .filter(|(j, _)| MATRIX[i][*j])
            .map(|(_, s)| *s)
            .collect();
        assert_eq!(from.valid_transitions(), expected, "from {from}");
    }
}

#[test]
fn locked_contract_rejects_every_target() {
    let mut c = Contract::new(BlueprintId::new(), "Lease", Utc::now()).unwrap();
    for target in [Approved, Sent, Signed, Locked] {
        c.apply_transition(target, Utc::now()).unwrap();
    }
    assert_eq!(c.status.next_valid_status(), None);
    for target in ContractStatus::ALL {
        assert!(c.clone().apply_transition(target, Utc::now()).is_err());
    }
}

#[test]
fn signed_cannot_be_revoked_but_sent_can() {
    let mut c = Contract::new(BlueprintId::new(), "Lease", Utc::now()).unwrap();
    c.apply_transition(Approved, Utc::now()).unwrap();
    c.apply_transition(Sent, Utc::now()).unwrap();
    assert!(c.clone().apply_transition(Revoked, Utc::now()).is_ok());
    c.apply_transition(Signed, Utc::now()).unwrap();
    assert!(c.apply_transition(Revoked, Utc::now()).is_err());
}

fn any_status() -> impl Strategy<Value = ContractStatus> {
    prop::sample::select(ContractStatus::ALL.to_vec())
}

proptest! {
    /// Reachability is exactly "next on the path" or "revoke from created/sent".
    #[test]
    fn can_transition_law(from in any_status(), to in any_status()) {
        let forward = !from.is_terminal() && from.next_valid_status() == Some(to);
        let revoke = to == Revoked && matches!(from, Created | Sent);
        prop_assert_eq!(from.can_transition_to(to), forward || revoke);
    }

    /// Successors follow the linear order.
    #[test]
    fn successor_is_next_on_path(from in any_status()) {
        match from.lifecycle_index() {
            Some(i) if i + 1 < CONTRACT_LIFECYCLE.len() => {
                prop_assert_eq!(from.next_valid_status(), Some(CONTRACT_LIFECYCLE[i + 1]));
            }
            _ => prop_assert_eq!(from.next_valid_status(), None),
        }
    }

    /// Any sequence of attempted transitions stamps each reached milestone
    /// exactly once and never changes it afterwards.
    #[test]
    fn milestones_are_write_once(targets in prop::collection::vec(any_status(), 0..20)) {
        let t0 = Utc::now();
        let mut c = Contract::new(BlueprintId::new(), "Lease", t0).unwrap();
        let mut seen: Vec<(Milestone, chrono::DateTime<Utc>)> = Vec::new();

        for (step, target) in targets.into_iter().enumerate() {
            let at = t0 + Duration::seconds(step as i64 + 1);
            let before = c.clone();
            match c.apply_transition(target, at) {
                Ok(Some(m)) => {
                    prop_assert_eq!(c.milestone(m), Some(at));
                    seen.push((m, at));
                }
                Ok(None) => prop_assert!(false, "every reachable target has a milestone"),
                Err(_) => prop_assert_eq!(&c, &before),
            }
            for (m, at) in &seen {
                prop_assert_eq!(c.milestone(*m), Some(*at));
            }
        }
    }
}
