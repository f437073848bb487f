//! Inbound commands and their outcomes.
//!
//! Commands are serde-tagged on `command` so a presentation layer can submit them as JSON:
//! `{"command":"activateBatch","id":"b3"}`.

use serde::{Deserialize, Serialize};

use fin_domain::{
    Amount, BatchDraft, BatchPatch, CategoryDraft, CategoryPatch, FinanceState, NewTransaction,
    ReserveGoalDraft, ReserveGoalPatch,
};

use crate::{
    validate, BatchService, BudgetService, CategoryService, CoreResult, ReserveService,
    TransactionService,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    CreateBatch(BatchDraft),
    UpdateBatch {
        id: String,
        patch: BatchPatch,
    },
    ActivateBatch {
        id: String,
    },
    ArchiveBatch {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    SetBudget {
        batch_id: String,
        category_id: String,
        amount: Amount,
    },
    AddTransaction(NewTransaction),
    DeleteTransaction {
        id: String,
    },
    AddReserveGoal(ReserveGoalDraft),
    UpdateReserveGoal {
        id: String,
        patch: ReserveGoalPatch,
    },
    DeleteReserveGoal {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    AllocateReserve {
        goal_id: String,
        amount: Amount,
    },
    AddCategory(CategoryDraft),
    UpdateCategory {
        id: String,
        patch: CategoryPatch,
    },
    DeleteCategory {
        id: String,
    },
}

/// What a successful command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "id", rename_all = "camelCase")]
pub enum CommandOutcome {
    /// A new entity was created with this id.
    Created(String),
    Applied,
    Deleted(String),
    /// The command was valid but had nothing to do.
    Unchanged,
}

impl CommandOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, CommandOutcome::Unchanged)
    }

    pub fn created_id(&self) -> Option<&str> {
        match self {
            CommandOutcome::Created(id) => Some(id),
            _ => None,
        }
    }
}

impl Command {
    /// Wire name of the command, as it appears in the `command` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateBatch(_) => "createBatch",
            Command::UpdateBatch { .. } => "updateBatch",
            Command::ActivateBatch { .. } => "activateBatch",
            Command::ArchiveBatch { .. } => "archiveBatch",
            Command::SetBudget { .. } => "setBudget",
            Command::AddTransaction(_) => "addTransaction",
            Command::DeleteTransaction { .. } => "deleteTransaction",
            Command::AddReserveGoal(_) => "addReserveGoal",
            Command::UpdateReserveGoal { .. } => "updateReserveGoal",
            Command::DeleteReserveGoal { .. } => "deleteReserveGoal",
            Command::AllocateReserve { .. } => "allocateReserve",
            Command::AddCategory(_) => "addCategory",
            Command::UpdateCategory { .. } => "updateCategory",
            Command::DeleteCategory { .. } => "deleteCategory",
        }
    }

    /// Checks that do not need the current state.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            Command::CreateBatch(draft) => BatchService::validate_draft(draft),
            Command::UpdateBatch { id, patch } => {
                validate::non_blank("batch id", id)?;
                if let Some(name) = patch.name.as_deref() {
                    validate::non_blank("batch name", name)?;
                }
                if let (Some(start), Some(end)) = (patch.start_date, patch.end_date) {
                    validate::date_range(start, end)?;
                }
                Ok(())
            }
            Command::ActivateBatch { id }
            | Command::ArchiveBatch { id }
            | Command::DeleteTransaction { id }
            | Command::DeleteReserveGoal { id }
            | Command::DeleteCategory { id } => validate::non_blank("id", id),
            Command::SetBudget {
                batch_id,
                category_id,
                amount,
            } => {
                validate::non_blank("batch id", batch_id)?;
                validate::non_blank("category id", category_id)?;
                validate::non_negative("budget amount", *amount)
            }
            Command::AddTransaction(draft) => TransactionService::validate_draft(draft),
            Command::AddReserveGoal(draft) => ReserveService::validate_draft(draft),
            Command::UpdateReserveGoal { id, patch } => {
                validate::non_blank("goal id", id)?;
                if let Some(name) = patch.name.as_deref() {
                    validate::non_blank("goal name", name)?;
                }
                if let Some(target) = patch.target {
                    validate::non_negative("goal target", target)?;
                }
                Ok(())
            }
            Command::AllocateReserve { goal_id, amount } => {
                validate::non_blank("goal id", goal_id)?;
                validate::non_negative("allocation amount", *amount)
            }
            Command::AddCategory(draft) => validate::non_blank("category name", &draft.name),
            Command::UpdateCategory { id, patch } => {
                validate::non_blank("category id", id)?;
                match patch.name.as_deref() {
                    Some(name) => validate::non_blank("category name", name),
                    None => Ok(()),
                }
            }
        }
    }

    /// Applies the command to `state`. On error `state` may be partially modified,
    /// so callers apply commands to a working copy.
    pub fn apply(self, state: &mut FinanceState) -> CoreResult<CommandOutcome> {
        let outcome = match self {
            Command::CreateBatch(draft) => {
                CommandOutcome::Created(BatchService::create(state, draft)?)
            }
            Command::UpdateBatch { id, patch } => {
                BatchService::update(state, &id, patch)?;
                CommandOutcome::Applied
            }
            Command::ActivateBatch { id } => {
                if BatchService::activate(state, &id)? {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Unchanged
                }
            }
            Command::ArchiveBatch { id } => {
                BatchService::archive(state, &id)?;
                CommandOutcome::Applied
            }
            Command::SetBudget {
                batch_id,
                category_id,
                amount,
            } => {
                BudgetService::set_budget(state, &batch_id, &category_id, amount)?;
                CommandOutcome::Applied
            }
            Command::AddTransaction(draft) => {
                CommandOutcome::Created(TransactionService::add(state, draft)?)
            }
            Command::DeleteTransaction { id } => match TransactionService::remove(state, &id)? {
                Some(removed) => CommandOutcome::Deleted(removed.id),
                None => CommandOutcome::Unchanged,
            },
            Command::AddReserveGoal(draft) => {
                CommandOutcome::Created(ReserveService::add_goal(state, draft)?)
            }
            Command::UpdateReserveGoal { id, patch } => {
                ReserveService::update_goal(state, &id, patch)?;
                CommandOutcome::Applied
            }
            Command::DeleteReserveGoal { id } => {
                if ReserveService::delete_goal(state, &id) {
                    CommandOutcome::Deleted(id)
                } else {
                    CommandOutcome::Unchanged
                }
            }
            Command::AllocateReserve { goal_id, amount } => {
                ReserveService::allocate(state, &goal_id, amount)?;
                CommandOutcome::Applied
            }
            Command::AddCategory(draft) => {
                CommandOutcome::Created(CategoryService::add(state, draft)?)
            }
            Command::UpdateCategory { id, patch } => {
                CategoryService::update(state, &id, patch)?;
                CommandOutcome::Applied
            }
            Command::DeleteCategory { id } => {
                if CategoryService::remove(state, &id)? {
                    CommandOutcome::Deleted(id)
                } else {
                    CommandOutcome::Unchanged
                }
            }
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use chrono::NaiveDate;
    use fin_domain::TransactionKind;
    use serde_json::json;

    #[test]
    fn deserializes_tagged_commands() {
        let command: Command = serde_json::from_value(json!({
            "command": "addTransaction",
            "batchId": "b2",
            "type": "reserve_in",
            "amount": 250000,
            "description": "Setor",
            "date": "2026-02-25"
        }))
        .unwrap();
        match command {
            Command::AddTransaction(draft) => {
                assert_eq!(draft.kind, TransactionKind::ReserveIn);
                assert_eq!(draft.category_id, None);
                assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 2, 25).unwrap());
            }
            other => panic!("unexpected command {:?}", other),
        }

        let command: Command = serde_json::from_value(json!({
            "command": "setBudget",
            "batchId": "b3",
            "categoryId": "c1",
            "amount": 900000
        }))
        .unwrap();
        assert_eq!(command.name(), "setBudget");
    }

    #[test]
    fn name_matches_wire_tag() {
        let command = Command::AllocateReserve {
            goal_id: "r1".into(),
            amount: 1,
        };
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["command"], command.name());
        assert_eq!(value["goalId"], "r1");
    }

    #[test]
    fn validate_rejects_without_state() {
        let blank = Command::ActivateBatch { id: " ".into() };
        assert!(matches!(blank.validate(), Err(CoreError::Validation(_))));

        let negative = Command::AllocateReserve {
            goal_id: "r1".into(),
            amount: -1,
        };
        assert!(matches!(negative.validate(), Err(CoreError::Validation(_))));

        let unknown_batch = Command::ArchiveBatch { id: "b404".into() };
        assert!(unknown_batch.validate().is_ok());
    }

    #[test]
    fn delete_of_unknown_ids_is_unchanged() {
        let mut state = FinanceState::seeded();
        for command in [
            Command::DeleteTransaction { id: "t404".into() },
            Command::DeleteReserveGoal { id: "r404".into() },
            Command::DeleteCategory { id: "c404".into() },
        ] {
            assert!(command.apply(&mut state).unwrap().is_unchanged());
        }
        assert_eq!(state, FinanceState::seeded());
    }
}
