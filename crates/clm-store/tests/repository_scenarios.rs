//! # Repository Scenarios
//!
//! End-to-end behavior of the in-memory repository: the approval gate,
//! edit freezing, revocation rules, upsert identity, atomic batches, and
//! the ownership rules on deletion.

use std::collections::HashSet;

use clm_core::{BlueprintFieldId, BlueprintId, FieldType};
use clm_state::{CheckboxRule, Contract, ContractStatus, LifecycleError};
use clm_store::{
    BlueprintPatch, DashboardQuery, NewBlueprint, NewContract, NewField, Repository, StoreError,
    ValueEntry, UNKNOWN_BLUEPRINT,
};

use clm_state::ContractStatus::*;

struct Fixture {
    repo: Repository,
    blueprint: BlueprintId,
    name_field: BlueprintFieldId,
    start_field: BlueprintFieldId,
    contract: Contract,
}

async fn fixture_with(rule: CheckboxRule) -> Fixture {
    let repo = Repository::new(rule);
    let bp = repo
        .create_blueprint(NewBlueprint {
            name: "Employment Contract".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let name_field = repo
        .add_field(bp.id, NewField::text("Employee Name").required())
        .await
        .unwrap();
    let start_field = repo
        .add_field(bp.id, NewField::text("Start Date").of_type(FieldType::Date))
        .await
        .unwrap();
    let contract = repo
        .create_contract(NewContract {
            blueprint_id: bp.id,
            name: Some("Employment - Jane".to_string()),
        })
        .await
        .unwrap();
    Fixture {
        repo,
        blueprint: bp.id,
        name_field: name_field.id,
        start_field: start_field.id,
        contract,
    }
}

async fn fixture() -> Fixture {
    fixture_with(CheckboxRule::Present).await
}

async fn walk(repo: &Repository, contract: &Contract, path: &[ContractStatus]) {
    for target in path {
        repo.transition_contract(contract.id, *target).await.unwrap();
    }
}

// ── approval gate ──

#[tokio::test]
async fn unset_required_field_blocks_approval() {
    let f = fixture().await;
    let err = f
        .repo
        .transition_contract(f.contract.id, Approved)
        .await
        .unwrap_err();
    match err {
        StoreError::Lifecycle(LifecycleError::MissingRequiredFields { labels }) => {
            assert_eq!(labels, vec!["Employee Name".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(f.repo.get_contract(f.contract.id).unwrap().status, Created);
}

#[tokio::test]
async fn approval_stamps_milestone_and_freezes_values() {
    let f = fixture().await;
    f.repo
        .upsert_field_value(f.contract.id, f.name_field, "Jane Doe")
        .await
        .unwrap();
    let approved = f.repo.transition_contract(f.contract.id, Approved).await.unwrap();
    assert_eq!(approved.status, Approved);
    assert!(approved.approved_at.is_some());
    assert!(approved.sent_at.is_none());

    let err = f
        .repo
        .upsert_field_value(f.contract.id, f.name_field, "John Doe")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Lifecycle(LifecycleError::NotEditable { status: Approved })
    ));
    let details = f.repo.get_contract_details(f.contract.id).unwrap();
    assert_eq!(details.value_of(&f.name_field), Some("Jane Doe"));
}

#[tokio::test]
async fn revocation_skips_the_gate() {
    let f = fixture().await;
    let revoked = f.repo.transition_contract(f.contract.id, Revoked).await.unwrap();
    assert_eq!(revoked.status, Revoked);
    assert!(revoked.revoked_at.is_some());
}

#[tokio::test]
async fn checked_rule_requires_ticked_box() {
    let f = fixture_with(CheckboxRule::MustBeChecked).await;
    let agree = f
        .repo
        .add_field(
            f.blueprint,
            NewField::text("I agree").of_type(FieldType::Checkbox).required(),
        )
        .await
        .unwrap();
    f.repo
        .upsert_field_value(f.contract.id, f.name_field, "Jane Doe")
        .await
        .unwrap();
    f.repo
        .upsert_field_value(f.contract.id, agree.id, "false")
        .await
        .unwrap();
    assert!(f.repo.transition_contract(f.contract.id, Approved).await.is_err());
    f.repo
        .upsert_field_value(f.contract.id, agree.id, "true")
        .await
        .unwrap();
    assert!(f.repo.transition_contract(f.contract.id, Approved).await.is_ok());
}

// ── revocation and terminal states ──

#[tokio::test]
async fn sent_can_be_revoked_but_signed_cannot() {
    let f = fixture().await;
    f.repo
        .upsert_field_value(f.contract.id, f.name_field, "Jane Doe")
        .await
        .unwrap();
    walk(&f.repo, &f.contract, &[Approved, Sent]).await;
    let revoked = f.repo.transition_contract(f.contract.id, Revoked).await.unwrap();
    assert!(revoked.sent_at.is_some());
    assert!(revoked.revoked_at.is_some());

    let g = fixture().await;
    g.repo
        .upsert_field_value(g.contract.id, g.name_field, "Jane Doe")
        .await
        .unwrap();
    walk(&g.repo, &g.contract, &[Approved, Sent, Signed]).await;
    let err = g.repo.transition_contract(g.contract.id, Revoked).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Lifecycle(LifecycleError::InvalidTransition { from: Signed, to: Revoked })
    ));
}

#[tokio::test]
async fn locked_contract_rejects_everything() {
    let f = fixture().await;
    f.repo
        .upsert_field_value(f.contract.id, f.name_field, "Jane Doe")
        .await
        .unwrap();
    walk(&f.repo, &f.contract, &[Approved, Sent, Signed, Locked]).await;
    let locked = f.repo.get_contract(f.contract.id).unwrap();
    assert_eq!(locked.status.next_valid_status(), None);
    for target in ContractStatus::ALL {
        assert!(f.repo.transition_contract(f.contract.id, target).await.is_err());
    }
    assert_eq!(f.repo.get_contract(f.contract.id).unwrap(), locked);
}

#[tokio::test]
async fn full_walk_keeps_earlier_stamps() {
    let f = fixture().await;
    f.repo
        .upsert_field_value(f.contract.id, f.name_field, "Jane Doe")
        .await
        .unwrap();
    let approved = f.repo.transition_contract(f.contract.id, Approved).await.unwrap();
    let sent = f.repo.transition_contract(f.contract.id, Sent).await.unwrap();
    let signed = f.repo.transition_contract(f.contract.id, Signed).await.unwrap();
    let locked = f.repo.transition_contract(f.contract.id, Locked).await.unwrap();
    assert_eq!(locked.approved_at, approved.approved_at);
    assert_eq!(locked.sent_at, sent.sent_at);
    assert_eq!(locked.signed_at, signed.signed_at);
    assert!(locked.locked_at.is_some());
    assert!(locked.revoked_at.is_none());
}

// ── upsert law and batches ──

#[tokio::test]
async fn upsert_keeps_row_identity() {
    let f = fixture().await;
    let first = f
        .repo
        .upsert_field_value(f.contract.id, f.name_field, "Jane")
        .await
        .unwrap();
    let second = f
        .repo
        .upsert_field_value(f.contract.id, f.name_field, "Jane Doe")
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.created_at, second.created_at);
    let values = f.repo.values_of(f.contract.id);
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].value.as_deref(), Some("Jane Doe"));
}

#[tokio::test]
async fn resaving_unchanged_values_is_idempotent() {
    let f = fixture().await;
    let entries = vec![
        ValueEntry {
            blueprint_field_id: f.name_field,
            value: "Jane Doe".to_string(),
        },
        ValueEntry {
            blueprint_field_id: f.start_field,
            value: "2024-01-15".to_string(),
        },
    ];
    f.repo.save_field_values(f.contract.id, &entries).await.unwrap();
    let snapshot = |repo: &Repository| -> HashSet<_> {
        repo.values_of(f.contract.id)
            .into_iter()
            .map(|v| (v.id, v.blueprint_field_id, v.value))
            .collect()
    };
    let before = snapshot(&f.repo);
    f.repo.save_field_values(f.contract.id, &entries).await.unwrap();
    assert_eq!(snapshot(&f.repo), before);
    assert_eq!(before.len(), 2);
}

#[tokio::test]
async fn batch_with_one_bad_entry_writes_nothing() {
    let f = fixture().await;
    let entries = vec![
        ValueEntry {
            blueprint_field_id: f.name_field,
            value: "Jane Doe".to_string(),
        },
        ValueEntry {
            blueprint_field_id: f.start_field,
            value: "soon".to_string(),
        },
    ];
    let err = f
        .repo
        .save_field_values(f.contract.id, &entries)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Lifecycle(LifecycleError::InvalidValue(_))));
    assert!(f.repo.values_of(f.contract.id).is_empty());
}

#[tokio::test]
async fn value_for_foreign_field_is_rejected() {
    let f = fixture().await;
    let err = f
        .repo
        .upsert_field_value(f.contract.id, BlueprintFieldId::new(), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

// ── ownership ──

#[tokio::test]
async fn deleting_blueprint_keeps_contracts_and_values() {
    let f = fixture().await;
    f.repo
        .upsert_field_value(f.contract.id, f.name_field, "Jane Doe")
        .await
        .unwrap();
    f.repo.delete_blueprint(f.blueprint).await.unwrap();

    assert!(f.repo.fields_of(f.blueprint).is_empty());
    let details = f.repo.get_contract_details(f.contract.id).unwrap();
    assert!(details.blueprint.is_none());
    assert_eq!(details.field_values.len(), 1);

    let dash = f.repo.dashboard(&DashboardQuery::default());
    assert_eq!(dash.contracts[0].blueprint_name, UNKNOWN_BLUEPRINT);
}

#[tokio::test]
async fn deleting_field_keeps_its_values() {
    let f = fixture().await;
    f.repo
        .upsert_field_value(f.contract.id, f.start_field, "2024-01-15")
        .await
        .unwrap();
    f.repo.delete_field(f.start_field).await.unwrap();
    assert_eq!(f.repo.values_of(f.contract.id).len(), 1);
    assert_eq!(f.repo.fields_of(f.blueprint).len(), 1);
}

#[tokio::test]
async fn deleting_contract_removes_values() {
    let f = fixture().await;
    f.repo
        .upsert_field_value(f.contract.id, f.name_field, "Jane Doe")
        .await
        .unwrap();
    f.repo.delete_contract(f.contract.id).await.unwrap();
    assert!(f.repo.values_of(f.contract.id).is_empty());
    assert!(matches!(
        f.repo.get_contract(f.contract.id),
        Err(StoreError::NotFound { kind: "contract", .. })
    ));
}

#[tokio::test]
async fn blueprint_rename_and_listing_order() {
    let f = fixture().await;
    let renamed = f
        .repo
        .update_blueprint(
            f.blueprint,
            BlueprintPatch {
                name: Some(" Employment v2 ".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Employment v2");
    let bp = f.repo.get_blueprint(f.blueprint).unwrap();
    let labels: Vec<_> = bp.fields.iter().map(|x| x.label.as_str()).collect();
    assert_eq!(labels, vec!["Employee Name", "Start Date"]);
}
