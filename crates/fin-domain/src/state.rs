//! The complete finance state: the unit that is rendered, persisted and restored.

use serde::{Deserialize, Serialize};

use crate::{
    balances::Balances,
    batch::{Batch, BatchStatus},
    category::Category,
    common::{find_by_id, find_by_id_mut, sum_amounts, Amount, BelongsToCategory},
    reserve::{ReserveAllocation, ReserveGoal},
    seed,
    transaction::{BalanceEffect, Transaction},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FinanceState {
    pub main_balance: Amount,
    pub reserve_balance: Amount,
    /// Balances before the first surviving transaction. Derived on load when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_balances: Option<Balances>,
    #[serde(default)]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub reserve_goals: Vec<ReserveGoal>,
    #[serde(default)]
    pub reserve_allocations: Vec<ReserveAllocation>,
}

impl Default for FinanceState {
    fn default() -> Self {
        Self::empty(Balances::default())
    }
}

impl FinanceState {
    /// Creates a state with no batches, transactions or categories.
    pub fn empty(opening: Balances) -> Self {
        Self {
            main_balance: opening.main,
            reserve_balance: opening.reserve,
            opening_balances: Some(opening),
            batches: Vec::new(),
            transactions: Vec::new(),
            categories: Vec::new(),
            reserve_goals: Vec::new(),
            reserve_allocations: Vec::new(),
        }
    }

    /// The built-in state used when storage holds nothing yet.
    pub fn seeded() -> Self {
        seed::seed_state()
    }

    pub fn balances(&self) -> Balances {
        Balances::new(self.main_balance, self.reserve_balance)
    }

    pub fn set_balances(&mut self, balances: Balances) {
        self.main_balance = balances.main;
        self.reserve_balance = balances.reserve;
    }

    /// Fills in `opening_balances` for snapshots written without it.
    pub fn ensure_opening_balances(&mut self) -> Balances {
        if let Some(opening) = self.opening_balances {
            return opening;
        }
        let opening = self.derived_opening(self.effects_total());
        self.opening_balances = Some(opening);
        opening
    }

    /// Opening balances plus every surviving transaction's effect.
    pub fn replayed_balances(&self) -> Balances {
        let applied = self.effects_total();
        let opening = self
            .opening_balances
            .unwrap_or_else(|| self.derived_opening(applied));
        opening.saturating_apply(applied)
    }

    fn derived_opening(&self, applied: BalanceEffect) -> Balances {
        self.balances().saturating_apply(applied.inverse())
    }

    fn effects_total(&self) -> BalanceEffect {
        let effects = || self.transactions.iter().map(Transaction::effect);
        BalanceEffect {
            main: sum_amounts(effects().map(|effect| effect.main)),
            reserve: sum_amounts(effects().map(|effect| effect.reserve)),
        }
    }

    pub fn batch(&self, id: &str) -> Option<&Batch> {
        find_by_id(&self.batches, id)
    }

    pub fn batch_mut(&mut self, id: &str) -> Option<&mut Batch> {
        find_by_id_mut(&mut self.batches, id)
    }

    pub fn active_batch(&self) -> Option<&Batch> {
        self.batches.iter().find(|batch| batch.is_active())
    }

    pub fn batches_with_status(&self, status: BatchStatus) -> impl Iterator<Item = &Batch> {
        self.batches
            .iter()
            .filter(move |batch| batch.status == status)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        find_by_id(&self.categories, id)
    }

    pub fn category_mut(&mut self, id: &str) -> Option<&mut Category> {
        find_by_id_mut(&mut self.categories, id)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        find_by_id(&self.transactions, id)
    }

    pub fn transactions_for_batch<'a>(
        &'a self,
        batch_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |txn| txn.batch_id == batch_id)
    }

    pub fn reserve_goal(&self, id: &str) -> Option<&ReserveGoal> {
        find_by_id(&self.reserve_goals, id)
    }

    pub fn reserve_goal_mut(&mut self, id: &str) -> Option<&mut ReserveGoal> {
        find_by_id_mut(&mut self.reserve_goals, id)
    }

    pub fn allocation_for(&self, goal_id: &str) -> Option<&ReserveAllocation> {
        self.reserve_allocations
            .iter()
            .find(|allocation| allocation.goal_id == goal_id)
    }

    /// Whether any transaction or budget entry references `category_id`.
    pub fn category_in_use(&self, category_id: &str) -> bool {
        self.transactions
            .iter()
            .any(|txn| txn.category_id() == Some(category_id))
            || self
                .batches
                .iter()
                .flat_map(|batch| &batch.budgets)
                .any(|entry| entry.category_id() == Some(category_id))
    }
}
