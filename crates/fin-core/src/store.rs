use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use fin_domain::{
    Amount, Balances, Batch, BatchDraft, BatchPatch, Category, CategoryDraft, CategoryPatch,
    FinanceState, NewTransaction, ReserveGoalDraft, ReserveGoalPatch, Tier, Transaction,
    TransactionKind,
};

use crate::{
    state_warnings, BatchStatistics, BudgetReport, BudgetService, CategoryService, Command,
    CommandOutcome, CoreError, CoreResult, FinanceStorage, ReserveService, ReserveSummary,
    SummaryService, TierSpending, TrendPoint,
};

/// Owns the finance state and persists it after every successful command.
///
/// Commands run against a working copy that is saved before it replaces the live state,
/// so a rejected command or a failed save leaves the store exactly as it was.
pub struct FinanceStore {
    state: FinanceState,
    storage: Box<dyn FinanceStorage>,
}

impl FinanceStore {
    /// Loads the last saved state, or starts from the built-in seed when storage is empty.
    /// The seed is not written until the first successful command.
    pub fn open(storage: Box<dyn FinanceStorage>) -> CoreResult<Self> {
        let (mut state, source) = match storage.load()? {
            Some(state) => (state, "storage"),
            None => (FinanceState::seeded(), "seed"),
        };
        state.ensure_opening_balances();
        for warning in state_warnings(&state) {
            warn!(%warning, "finance state warning");
        }
        info!(
            source,
            batches = state.batches.len(),
            transactions = state.transactions.len(),
            main = state.main_balance,
            reserve = state.reserve_balance,
            "finance store opened"
        );
        Ok(Self { state, storage })
    }

    /// Validates, applies and persists `command`.
    pub fn execute(&mut self, command: Command) -> CoreResult<CommandOutcome> {
        let name = command.name();
        if let Err(err) = command.validate() {
            debug!(command = name, error = %err, "command rejected at validation");
            return Err(err);
        }

        let mut working = self.state.clone();
        let outcome = match command.apply(&mut working) {
            Ok(outcome) => outcome,
            Err(err) => {
                match &err {
                    CoreError::Conflict(_) | CoreError::InsufficientFunds { .. } => {
                        warn!(command = name, error = %err, "command rejected")
                    }
                    _ => debug!(command = name, error = %err, "command rejected"),
                }
                return Err(err);
            }
        };

        if outcome.is_unchanged() {
            debug!(command = name, "command left state unchanged");
            return Ok(outcome);
        }

        if let Err(err) = self.storage.save(&working) {
            warn!(command = name, error = %err, "save failed; command not committed");
            return Err(err);
        }
        self.state = working;
        debug!(command = name, outcome = ?outcome, "command applied");
        Ok(outcome)
    }

    pub fn create_batch(&mut self, draft: BatchDraft) -> CoreResult<String> {
        self.execute_created(Command::CreateBatch(draft))
    }

    pub fn update_batch(&mut self, id: &str, patch: BatchPatch) -> CoreResult<()> {
        self.execute(Command::UpdateBatch {
            id: id.to_string(),
            patch,
        })
        .map(|_| ())
    }

    pub fn activate_batch(&mut self, id: &str) -> CoreResult<CommandOutcome> {
        self.execute(Command::ActivateBatch { id: id.to_string() })
    }

    pub fn archive_batch(&mut self, id: &str) -> CoreResult<()> {
        self.execute(Command::ArchiveBatch { id: id.to_string() })
            .map(|_| ())
    }

    pub fn set_budget(&mut self, batch_id: &str, category_id: &str, amount: Amount) -> CoreResult<()> {
        self.execute(Command::SetBudget {
            batch_id: batch_id.to_string(),
            category_id: category_id.to_string(),
            amount,
        })
        .map(|_| ())
    }

    pub fn add_transaction(&mut self, draft: NewTransaction) -> CoreResult<String> {
        self.execute_created(Command::AddTransaction(draft))
    }

    /// Returns whether a transaction was removed.
    pub fn delete_transaction(&mut self, id: &str) -> CoreResult<bool> {
        self.execute(Command::DeleteTransaction { id: id.to_string() })
            .map(|outcome| !outcome.is_unchanged())
    }

    pub fn add_reserve_goal(&mut self, draft: ReserveGoalDraft) -> CoreResult<String> {
        self.execute_created(Command::AddReserveGoal(draft))
    }

    pub fn update_reserve_goal(&mut self, id: &str, patch: ReserveGoalPatch) -> CoreResult<()> {
        self.execute(Command::UpdateReserveGoal {
            id: id.to_string(),
            patch,
        })
        .map(|_| ())
    }

    pub fn delete_reserve_goal(&mut self, id: &str) -> CoreResult<bool> {
        self.execute(Command::DeleteReserveGoal { id: id.to_string() })
            .map(|outcome| !outcome.is_unchanged())
    }

    pub fn allocate_reserve(&mut self, goal_id: &str, amount: Amount) -> CoreResult<()> {
        self.execute(Command::AllocateReserve {
            goal_id: goal_id.to_string(),
            amount,
        })
        .map(|_| ())
    }

    pub fn add_category(&mut self, draft: CategoryDraft) -> CoreResult<String> {
        self.execute_created(Command::AddCategory(draft))
    }

    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> CoreResult<()> {
        self.execute(Command::UpdateCategory {
            id: id.to_string(),
            patch,
        })
        .map(|_| ())
    }

    pub fn delete_category(&mut self, id: &str) -> CoreResult<bool> {
        self.execute(Command::DeleteCategory { id: id.to_string() })
            .map(|outcome| !outcome.is_unchanged())
    }

    pub fn state(&self) -> &FinanceState {
        &self.state
    }

    pub fn balances(&self) -> Balances {
        self.state.balances()
    }

    pub fn active_batch(&self) -> Option<&Batch> {
        self.state.active_batch()
    }

    pub fn batch(&self, id: &str) -> Option<&Batch> {
        self.state.batch(id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.state.category(id)
    }

    pub fn categories_by_tier(&self, tier: Tier) -> Vec<&Category> {
        CategoryService::by_tier(&self.state, tier)
    }

    /// Batches whose date range covers `date`.
    pub fn batches_covering(&self, date: NaiveDate) -> Vec<&Batch> {
        self.state
            .batches
            .iter()
            .filter(|batch| batch.contains(date))
            .collect()
    }

    pub fn batch_statistics(&self, batch_id: &str) -> BatchStatistics {
        SummaryService::batch_statistics(&self.state, batch_id)
    }

    pub fn spending_by_category(&self, batch_id: &str) -> BTreeMap<String, Amount> {
        SummaryService::spending_by_category(&self.state, batch_id)
    }

    pub fn spending_by_tier(&self, batch_id: &str) -> Vec<TierSpending> {
        SummaryService::spending_by_tier(&self.state, batch_id)
    }

    pub fn budget_report(&self, batch_id: &str) -> CoreResult<BudgetReport> {
        BudgetService::report(&self.state, batch_id)
    }

    pub fn trend(&self) -> Vec<TrendPoint> {
        SummaryService::trend(&self.state)
    }

    pub fn recent_transactions(&self, batch_id: &str, limit: usize) -> Vec<&Transaction> {
        SummaryService::recent_transactions(&self.state, batch_id, limit)
    }

    /// Activity feed: see [`SummaryService::transactions_matching`].
    pub fn transactions_matching(
        &self,
        batch_id: &str,
        kind: Option<TransactionKind>,
        query: &str,
    ) -> Vec<&Transaction> {
        SummaryService::transactions_matching(&self.state, batch_id, kind, query)
    }

    pub fn reserve_summary(&self) -> ReserveSummary {
        ReserveService::summary(&self.state)
    }

    pub fn warnings(&self) -> Vec<String> {
        state_warnings(&self.state)
    }

    fn execute_created(&mut self, command: Command) -> CoreResult<String> {
        let outcome = self.execute(command)?;
        outcome
            .created_id()
            .map(str::to_string)
            .ok_or_else(|| CoreError::Storage(format!("expected a created id, got {:?}", outcome)))
    }
}

impl std::fmt::Debug for FinanceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceStore")
            .field("main_balance", &self.state.main_balance)
            .field("reserve_balance", &self.state.reserve_balance)
            .field("batches", &self.state.batches.len())
            .field("transactions", &self.state.transactions.len())
            .finish()
    }
}
