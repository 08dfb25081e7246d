//! # Navigation View-State
//!
//! The set of screens a client can be on, as a closed tagged union, and a
//! pure transition function driven by typed navigation events. A selection
//! (blueprint or contract id) only exists inside the variants that need it,
//! so "editing without a blueprint" cannot be represented.

use serde::{Deserialize, Serialize};

use clm_core::{BlueprintId, ContractId};

/// The screen currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", content = "id", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Dashboard,
    BlueprintList,
    CreatingBlueprint,
    EditingBlueprint(BlueprintId),
    CreatingContract,
    ViewingContract(ContractId),
}

/// A navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "id", rename_all = "snake_case")]
pub enum NavEvent {
    OpenDashboard,
    OpenBlueprints,
    CreateBlueprint,
    EditBlueprint(BlueprintId),
    CreateContract,
    ViewContract(ContractId),
    /// A new contract was persisted; show it.
    ContractCreated(ContractId),
    /// The blueprint being created or edited was saved.
    BlueprintSaved,
    /// Leave the current screen. Also used when the selected entity turns
    /// out not to exist.
    Back,
}

impl ViewState {
    /// The state reached from `self` after `event`.
    pub fn apply(self, event: NavEvent) -> ViewState {
        match event {
            NavEvent::OpenDashboard => Self::Dashboard,
            NavEvent::OpenBlueprints => Self::BlueprintList,
            NavEvent::CreateBlueprint => Self::CreatingBlueprint,
            NavEvent::EditBlueprint(id) => Self::EditingBlueprint(id),
            NavEvent::CreateContract => Self::CreatingContract,
            NavEvent::ViewContract(id) | NavEvent::ContractCreated(id) => {
                Self::ViewingContract(id)
            }
            NavEvent::BlueprintSaved => Self::BlueprintList,
            NavEvent::Back => self.parent(),
        }
    }

    /// Where `Back` leads.
    pub fn parent(self) -> ViewState {
        match self {
            Self::CreatingBlueprint | Self::EditingBlueprint(_) => Self::BlueprintList,
            Self::Dashboard
            | Self::BlueprintList
            | Self::CreatingContract
            | Self::ViewingContract(_) => Self::Dashboard,
        }
    }

    pub fn selected_blueprint(&self) -> Option<BlueprintId> {
        match self {
            Self::EditingBlueprint(id) => Some(*id),
            _ => None,
        }
    }

    pub fn selected_contract(&self) -> Option<ContractId> {
        match self {
            Self::ViewingContract(id) => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_dashboard() {
        assert_eq!(ViewState::default(), ViewState::Dashboard);
    }

    #[test]
    fn back_from_blueprint_screens_goes_to_list() {
        let id = BlueprintId::new();
        assert_eq!(
            ViewState::EditingBlueprint(id).apply(NavEvent::Back),
            ViewState::BlueprintList
        );
        assert_eq!(
            ViewState::CreatingBlueprint.apply(NavEvent::Back),
            ViewState::BlueprintList
        );
    }

    #[test]
    fn back_from_contract_screens_goes_to_dashboard() {
        assert_eq!(
            ViewState::ViewingContract(ContractId::new()).apply(NavEvent::Back),
            ViewState::Dashboard
        );
        assert_eq!(
            ViewState::CreatingContract.apply(NavEvent::Back),
            ViewState::Dashboard
        );
    }

    #[test]
    fn created_contract_is_shown() {
        let id = ContractId::new();
        let next = ViewState::CreatingContract.apply(NavEvent::ContractCreated(id));
        assert_eq!(next, ViewState::ViewingContract(id));
        assert_eq!(next.selected_contract(), Some(id));
    }

    #[test]
    fn saving_a_blueprint_returns_to_list() {
        let next = ViewState::EditingBlueprint(BlueprintId::new()).apply(NavEvent::BlueprintSaved);
        assert_eq!(next, ViewState::BlueprintList);
    }

    #[test]
    fn top_level_navigation_clears_selection() {
        let editing = ViewState::EditingBlueprint(BlueprintId::new());
        assert!(editing.selected_blueprint().is_some());
        let next = editing.apply(NavEvent::OpenDashboard);
        assert_eq!(next.selected_blueprint(), None);
        assert_eq!(next.selected_contract(), None);
    }

    #[test]
    fn serializes_as_tagged_union() {
        let json = serde_json::to_value(ViewState::BlueprintList).unwrap();
        assert_eq!(json["view"], "blueprint_list");
        let id = ContractId::new();
        let json = serde_json::to_value(ViewState::ViewingContract(id)).unwrap();
        assert_eq!(json["view"], "viewing_contract");
        assert_eq!(json["id"], id.as_uuid().to_string());
    }
}
