//! # Repository
//!
//! Every read and write on blueprints, fields, contracts, and field values.
//!
//! Records live in in-memory [`Store`]s. When a Postgres pool is attached,
//! each write goes to the database first and the in-memory mirror is only
//! updated once the database write has succeeded; [`Repository::hydrate`]
//! loads the mirror at startup. Without a pool the repository is purely
//! in-memory.
//!
//! ## Ownership
//!
//! - Deleting a blueprint deletes its fields. Contracts instantiated from it
//!   and their stored values are kept.
//! - Deleting a field keeps any contract values recorded for it.
//! - Deleting a contract deletes its values.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use clm_core::blueprint::sort_fields;
use clm_core::{
    Blueprint, BlueprintField, BlueprintFieldId, BlueprintId, BlueprintWithFields,
    ContractFieldValue, ContractId, FieldGeometry, FieldValueId, ValidationError,
};
use clm_state::{
    check_transition, check_value_write, CheckboxRule, Contract, ContractStatus, LifecycleError,
    LifecycleView,
};

use crate::db;
use crate::error::StoreError;
use crate::query::{build_dashboard, Dashboard, DashboardQuery};
use crate::records::{
    normalize_optional, BlueprintPatch, ContractDetails, FieldPatch, NewBlueprint, NewContract,
    NewField, ValueEntry,
};
use crate::store::Store;

/// The persistence collaborator shared by the API handlers.
#[derive(Debug, Clone)]
pub struct Repository {
    blueprints: Store<Blueprint>,
    fields: Store<BlueprintField>,
    contracts: Store<Contract>,
    values: Store<ContractFieldValue>,
    db_pool: Option<PgPool>,
    checkbox_rule: CheckboxRule,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new(CheckboxRule::default())
    }
}

impl Repository {
    /// An in-memory-only repository.
    pub fn new(checkbox_rule: CheckboxRule) -> Self {
        Self::with_pool(None, checkbox_rule)
    }

    /// A repository writing through to `db_pool` when present.
    pub fn with_pool(db_pool: Option<PgPool>, checkbox_rule: CheckboxRule) -> Self {
        Self {
            blueprints: Store::new(),
            fields: Store::new(),
            contracts: Store::new(),
            values: Store::new(),
            db_pool,
            checkbox_rule,
        }
    }

    /// Load every record from the database into the in-memory stores.
    /// No-op without a pool.
    pub async fn hydrate(&self) -> Result<(), StoreError> {
        let Some(pool) = &self.db_pool else {
            return Ok(());
        };

        let blueprints = db::blueprints::load_all(pool).await?;
        let fields = db::blueprints::load_all_fields(pool).await?;
        let contracts = db::contracts::load_all(pool).await?;
        let values = db::field_values::load_all(pool).await?;

        let counts = (blueprints.len(), fields.len(), contracts.len(), values.len());
        for record in blueprints {
            self.blueprints.insert(record.id.0, record);
        }
        for record in fields {
            self.fields.insert(record.id.0, record);
        }
        for record in contracts {
            self.contracts.insert(record.id.0, record);
        }
        for record in values {
            self.values.insert(record.id.0, record);
        }

        tracing::info!(
            blueprints = counts.0,
            fields = counts.1,
            contracts = counts.2,
            field_values = counts.3,
            "Hydrated in-memory stores from database"
        );
        Ok(())
    }

    // ─── Blueprints ──────────────────────────────────────────────────

    /// All blueprints, newest first.
    pub fn list_blueprints(&self) -> Vec<Blueprint> {
        let mut all = self.blueprints.list();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub fn get_blueprint(&self, id: BlueprintId) -> Result<BlueprintWithFields, StoreError> {
        let blueprint = self
            .blueprints
            .get(&id.0)
            .ok_or_else(|| StoreError::not_found("blueprint", id.0))?;
        Ok(BlueprintWithFields::new(blueprint, self.fields_of(id)))
    }

    /// Fields of a blueprint in presentation order.
    pub fn fields_of(&self, blueprint_id: BlueprintId) -> Vec<BlueprintField> {
        let mut fields = self.fields.filter(|f| f.blueprint_id == blueprint_id);
        sort_fields(&mut fields);
        fields
    }

    pub async fn create_blueprint(&self, input: NewBlueprint) -> Result<Blueprint, StoreError> {
        let name = Blueprint::validate_name(&input.name)?;
        let now = Utc::now();
        let record = Blueprint {
            id: BlueprintId::new(),
            name,
            description: normalize_optional(input.description),
            created_at: now,
            updated_at: now,
        };

        if let Some(pool) = &self.db_pool {
            db::blueprints::insert(pool, &record).await?;
        }
        self.blueprints.insert(record.id.0, record.clone());

        tracing::info!(blueprint_id = %record.id.0, name = %record.name, "blueprint created");
        Ok(record)
    }

    pub async fn update_blueprint(
        &self,
        id: BlueprintId,
        patch: BlueprintPatch,
    ) -> Result<Blueprint, StoreError> {
        let mut record = self
            .blueprints
            .get(&id.0)
            .ok_or_else(|| StoreError::not_found("blueprint", id.0))?;

        if let Some(name) = patch.name {
            record.name = Blueprint::validate_name(&name)?;
        }
        if patch.description.is_some() {
            record.description = normalize_optional(patch.description);
        }
        record.updated_at = Utc::now();

        if let Some(pool) = &self.db_pool {
            if !db::blueprints::update(pool, &record).await? {
                return Err(StoreError::not_found("blueprint", id.0));
            }
        }
        self.blueprints.insert(id.0, record.clone());

        tracing::info!(blueprint_id = %id.0, "blueprint updated");
        Ok(record)
    }

    /// Delete a blueprint and its fields. Contracts and values are kept.
    pub async fn delete_blueprint(&self, id: BlueprintId) -> Result<(), StoreError> {
        if !self.blueprints.contains(&id.0) {
            return Err(StoreError::not_found("blueprint", id.0));
        }
        if let Some(pool) = &self.db_pool {
            db::blueprints::delete(pool, id).await?;
        }
        self.blueprints.remove(&id.0);
        let removed = self.fields.remove_where(|f| f.blueprint_id == id);

        tracing::info!(blueprint_id = %id.0, fields_removed = removed, "blueprint deleted");
        Ok(())
    }

    // ─── Fields ──────────────────────────────────────────────────────

    /// Append a field to a blueprint, filling layout defaults below the
    /// existing fields.
    pub async fn add_field(
        &self,
        blueprint_id: BlueprintId,
        input: NewField,
    ) -> Result<BlueprintField, StoreError> {
        if !self.blueprints.contains(&blueprint_id.0) {
            return Err(StoreError::not_found("blueprint", blueprint_id.0));
        }
        let label = BlueprintField::validate_label(&input.label)?;
        let existing = self.fields_of(blueprint_id).len();
        let stacked = FieldGeometry::stacked(existing);

        let record = BlueprintField {
            id: BlueprintFieldId::new(),
            blueprint_id,
            field_type: input.field_type,
            label,
            required: input.required,
            placeholder: normalize_optional(input.placeholder),
            position_x: input.position_x.unwrap_or(stacked.position_x),
            position_y: input.position_y.unwrap_or(stacked.position_y),
            width: input.width.unwrap_or(stacked.width),
            height: input.height.unwrap_or(stacked.height),
            order_index: input
                .order_index
                .unwrap_or_else(|| i32::try_from(existing).unwrap_or(i32::MAX)),
            created_at: Utc::now(),
        };

        if let Some(pool) = &self.db_pool {
            db::blueprints::insert_field(pool, &record).await?;
        }
        self.fields.insert(record.id.0, record.clone());

        tracing::info!(
            blueprint_id = %blueprint_id.0,
            field_id = %record.id.0,
            field_type = %record.field_type,
            "field added"
        );
        Ok(record)
    }

    pub async fn update_field(
        &self,
        id: BlueprintFieldId,
        patch: FieldPatch,
    ) -> Result<BlueprintField, StoreError> {
        let mut record = self
            .fields
            .get(&id.0)
            .ok_or_else(|| StoreError::not_found("field", id.0))?;

        if let Some(label) = patch.label {
            record.label = BlueprintField::validate_label(&label)?;
        }
        if let Some(field_type) = patch.field_type {
            record.field_type = field_type;
        }
        if let Some(required) = patch.required {
            record.required = required;
        }
        if patch.placeholder.is_some() {
            record.placeholder = normalize_optional(patch.placeholder);
        }
        let mut geometry = record.geometry();
        geometry.position_x = patch.position_x.unwrap_or(geometry.position_x);
        geometry.position_y = patch.position_y.unwrap_or(geometry.position_y);
        geometry.width = patch.width.unwrap_or(geometry.width);
        geometry.height = patch.height.unwrap_or(geometry.height);
        record.set_geometry(geometry);
        if let Some(order_index) = patch.order_index {
            record.order_index = order_index;
        }

        if let Some(pool) = &self.db_pool {
            if !db::blueprints::update_field(pool, &record).await? {
                return Err(StoreError::not_found("field", id.0));
            }
        }
        self.fields.insert(id.0, record.clone());

        tracing::info!(field_id = %id.0, "field updated");
        Ok(record)
    }

    /// Delete a field definition. Stored contract values for it are kept.
    pub async fn delete_field(&self, id: BlueprintFieldId) -> Result<(), StoreError> {
        if !self.fields.contains(&id.0) {
            return Err(StoreError::not_found("field", id.0));
        }
        if let Some(pool) = &self.db_pool {
            db::blueprints::delete_field(pool, id).await?;
        }
        self.fields.remove(&id.0);

        tracing::info!(field_id = %id.0, "field deleted");
        Ok(())
    }

    // ─── Contracts ───────────────────────────────────────────────────

    /// Filtered, sorted listing plus status counts.
    pub fn dashboard(&self, query: &DashboardQuery) -> Dashboard {
        let names: HashMap<BlueprintId, String> = self
            .blueprints
            .list()
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();
        build_dashboard(self.contracts.list(), &names, query)
    }

    pub async fn create_contract(&self, input: NewContract) -> Result<Contract, StoreError> {
        let blueprint = self
            .blueprints
            .get(&input.blueprint_id.0)
            .ok_or_else(|| StoreError::not_found("blueprint", input.blueprint_id.0))?;

        let now = Utc::now();
        let name = input
            .name
            .unwrap_or_else(|| Contract::default_name(&blueprint.name, now.date_naive()));
        let record = Contract::new(blueprint.id, &name, now)?;

        if let Some(pool) = &self.db_pool {
            db::contracts::insert(pool, &record).await?;
        }
        self.contracts.insert(record.id.0, record.clone());

        tracing::info!(
            contract_id = %record.id.0,
            blueprint_id = %blueprint.id.0,
            name = %record.name,
            "contract created"
        );
        Ok(record)
    }

    pub fn get_contract(&self, id: ContractId) -> Result<Contract, StoreError> {
        self.contracts
            .get(&id.0)
            .ok_or_else(|| StoreError::not_found("contract", id.0))
    }

    /// Stored values of one contract, oldest first.
    pub fn values_of(&self, contract_id: ContractId) -> Vec<ContractFieldValue> {
        let mut values = self.values.filter(|v| v.contract_id == contract_id);
        values.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        values
    }

    /// The contract, its blueprint if it still exists, its stored values,
    /// and its lifecycle view.
    pub fn get_contract_details(&self, id: ContractId) -> Result<ContractDetails, StoreError> {
        let contract = self.get_contract(id)?;
        let blueprint = self.get_blueprint(contract.blueprint_id).ok();
        let lifecycle = LifecycleView::for_contract(&contract);
        Ok(ContractDetails {
            field_values: self.values_of(id),
            blueprint,
            lifecycle,
            contract,
        })
    }

    pub fn lifecycle(&self, id: ContractId) -> Result<LifecycleView, StoreError> {
        Ok(LifecycleView::for_contract(&self.get_contract(id)?))
    }

    /// Delete a contract and its values.
    pub async fn delete_contract(&self, id: ContractId) -> Result<(), StoreError> {
        if !self.contracts.contains(&id.0) {
            return Err(StoreError::not_found("contract", id.0));
        }
        if let Some(pool) = &self.db_pool {
            db::contracts::delete(pool, id).await?;
        }
        self.contracts.remove(&id.0);
        let removed = self.values.remove_where(|v| v.contract_id == id);

        tracing::info!(contract_id = %id.0, values_removed = removed, "contract deleted");
        Ok(())
    }

    // ─── Field Values ────────────────────────────────────────────────

    /// Validate one write: the contract is editable, the field belongs to
    /// its blueprint, and the value is well-formed.
    fn check_write(
        contract: &Contract,
        fields: &[BlueprintField],
        field_id: BlueprintFieldId,
        value: &str,
    ) -> Result<(), StoreError> {
        if !contract.status.is_editable() {
            return Err(LifecycleError::NotEditable {
                status: contract.status,
            }
            .into());
        }
        let field = fields.iter().find(|f| f.id == field_id).ok_or_else(|| {
            ValidationError::ForeignField {
                field_id: field_id.0.to_string(),
            }
        })?;
        check_value_write(contract.status, field, value)?;
        Ok(())
    }

    /// The row to write for `(contract, field)`: the existing row with a new
    /// value, or a fresh one.
    fn next_row(
        map: &HashMap<Uuid, ContractFieldValue>,
        contract_id: ContractId,
        field_id: BlueprintFieldId,
        value: &str,
    ) -> ContractFieldValue {
        let now = Utc::now();
        match map
            .values()
            .find(|v| v.contract_id == contract_id && v.blueprint_field_id == field_id)
        {
            Some(existing) => ContractFieldValue {
                value: Some(value.to_string()),
                updated_at: now,
                ..existing.clone()
            },
            None => ContractFieldValue {
                id: FieldValueId::new(),
                contract_id,
                blueprint_field_id: field_id,
                value: Some(value.to_string()),
                created_at: now,
                updated_at: now,
            },
        }
    }

    /// Insert or update the value of one field. An existing row keeps its id.
    ///
    /// Editability is checked against a contract snapshot read outside the
    /// contracts lock, so a transition that lands between the check and the
    /// write is not detected.
    pub async fn upsert_field_value(
        &self,
        contract_id: ContractId,
        field_id: BlueprintFieldId,
        value: &str,
    ) -> Result<ContractFieldValue, StoreError> {
        let contract = self.get_contract(contract_id)?;
        let fields = self.fields_of(contract.blueprint_id);
        Self::check_write(&contract, &fields, field_id, value)?;

        let stored = match &self.db_pool {
            Some(pool) => {
                let row = self
                    .values
                    .with_write(|map| Self::next_row(map, contract_id, field_id, value));
                let stored = db::field_values::upsert(pool, &row).await?;
                self.values.insert(stored.id.0, stored.clone());
                stored
            }
            None => self.values.with_write(|map| {
                let row = Self::next_row(map, contract_id, field_id, value);
                map.insert(row.id.0, row.clone());
                row
            }),
        };

        tracing::info!(
            contract_id = %contract_id.0,
            field_id = %field_id.0,
            value_id = %stored.id.0,
            "field value saved"
        );
        Ok(stored)
    }

    /// Save several values at once. Every entry is validated before anything
    /// is written; then all rows are written together or not at all.
    ///
    /// As with [`Repository::upsert_field_value`], the editability check
    /// uses a contract snapshot and can race a concurrent transition.
    pub async fn save_field_values(
        &self,
        contract_id: ContractId,
        entries: &[ValueEntry],
    ) -> Result<Vec<ContractFieldValue>, StoreError> {
        let contract = self.get_contract(contract_id)?;
        let fields = self.fields_of(contract.blueprint_id);
        for entry in entries {
            Self::check_write(&contract, &fields, entry.blueprint_field_id, &entry.value)?;
        }

        let stored = match &self.db_pool {
            Some(pool) => {
                let rows: Vec<ContractFieldValue> = self.values.with_write(|map| {
                    entries
                        .iter()
                        .map(|e| Self::next_row(map, contract_id, e.blueprint_field_id, &e.value))
                        .collect()
                });
                let stored = db::field_values::upsert_many(pool, &rows).await?;
                self.values.with_write(|map| {
                    for row in &stored {
                        map.insert(row.id.0, row.clone());
                    }
                });
                stored
            }
            None => self.values.with_write(|map| {
                entries
                    .iter()
                    .map(|e| {
                        let row = Self::next_row(map, contract_id, e.blueprint_field_id, &e.value);
                        map.insert(row.id.0, row.clone());
                        row
                    })
                    .collect::<Vec<_>>()
            }),
        };

        tracing::info!(
            contract_id = %contract_id.0,
            count = stored.len(),
            "field values saved"
        );
        Ok(stored)
    }

    // ─── Transitions ─────────────────────────────────────────────────

    /// Move a contract to `target`, stamping the target's milestone.
    ///
    /// The current status is read fresh immediately before the check. With
    /// a database the write is conditional on that status, and a concurrent
    /// change surfaces as [`StoreError::Conflict`].
    pub async fn transition_contract(
        &self,
        id: ContractId,
        target: ContractStatus,
    ) -> Result<Contract, StoreError> {
        let now = Utc::now();

        let (from, contract) = match &self.db_pool {
            Some(pool) => {
                let mut contract = db::contracts::get_by_id(pool, id)
                    .await?
                    .ok_or_else(|| StoreError::not_found("contract", id.0))?;
                let from = contract.status;
                let fields = self.fields_of(contract.blueprint_id);
                let values = self.values_of(id);
                check_transition(from, target, &fields, &values, self.checkbox_rule)?;
                contract.apply_transition(target, now)?;

                if !db::contracts::update_status(pool, &contract, from).await? {
                    tracing::warn!(contract_id = %id.0, from = %from, to = %target, "status changed concurrently");
                    return Err(StoreError::Conflict(format!(
                        "contract {} changed status while transitioning from {from} to {target}",
                        id.0
                    )));
                }
                self.contracts.insert(id.0, contract.clone());
                (from, contract)
            }
            None => {
                let blueprint_id = self.get_contract(id)?.blueprint_id;
                let fields = self.fields_of(blueprint_id);
                let values = self.values_of(id);
                let rule = self.checkbox_rule;
                self.contracts
                    .try_update(&id.0, |c| {
                        let from = c.status;
                        check_transition(from, target, &fields, &values, rule)?;
                        c.apply_transition(target, now)?;
                        Ok::<_, StoreError>((from, c.clone()))
                    })
                    .ok_or_else(|| StoreError::not_found("contract", id.0))??
            }
        };

        tracing::info!(contract_id = %id.0, from = %from, to = %target, "contract transitioned");
        Ok(contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> Repository {
        Repository::new(CheckboxRule::Present)
    }

    #[tokio::test]
    async fn blank_blueprint_name_writes_nothing() {
        let repo = repo();
        let err = repo
            .create_blueprint(NewBlueprint {
                name: "  ".to_string(),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(repo.list_blueprints().is_empty());
    }

    #[tokio::test]
    async fn contract_for_missing_blueprint_is_not_found() {
        let repo = repo();
        let err = repo
            .create_contract(NewContract {
                blueprint_id: BlueprintId::new(),
                name: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "blueprint", .. }));
    }

    #[tokio::test]
    async fn default_contract_name_uses_blueprint_and_date() {
        let repo = repo();
        let bp = repo
            .create_blueprint(NewBlueprint {
                name: "NDA".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let contract = repo
            .create_contract(NewContract {
                blueprint_id: bp.id,
                name: None,
            })
            .await
            .unwrap();
        let expected = format!("NDA - {}", Utc::now().date_naive().format("%Y-%m-%d"));
        assert_eq!(contract.name, expected);
    }

    #[tokio::test]
    async fn added_fields_stack_below_existing() {
        let repo = repo();
        let bp = repo
            .create_blueprint(NewBlueprint {
                name: "Lease".to_string(),
                description: Some("  ".to_string()),
            })
            .await
            .unwrap();
        assert!(bp.description.is_none());
        repo.add_field(bp.id, NewField::text("Tenant")).await.unwrap();
        let second = repo.add_field(bp.id, NewField::text("Landlord")).await.unwrap();
        assert_eq!(second.order_index, 1);
        assert_eq!(second.position_y, 100);
        assert_eq!(second.position_x, 20);
        assert_eq!(second.width, 300);
        assert_eq!(second.height, 40);
    }

    #[tokio::test]
    async fn partial_field_update_keeps_other_columns() {
        let repo = repo();
        let bp = repo
            .create_blueprint(NewBlueprint {
                name: "Lease".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let field = repo.add_field(bp.id, NewField::text("Tenant")).await.unwrap();
        let updated = repo
            .update_field(
                field.id,
                FieldPatch {
                    required: Some(true),
                    width: Some(500),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.required);
        assert_eq!(updated.width, 500);
        assert_eq!(updated.label, "Tenant");
        assert_eq!(updated.position_y, field.position_y);

        let err = repo
            .update_field(
                field.id,
                FieldPatch {
                    label: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyLabel)));
    }
}
