use std::{collections::HashSet, sync::Mutex};

use fin_domain::{FinanceState, MAX_AMOUNT};

use crate::CoreError;

/// Persistence collaborator: saves and restores the complete finance state wholesale.
pub trait FinanceStorage: Send + Sync {
    /// Returns the last saved state, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<FinanceState>, CoreError>;
    fn save(&self, state: &FinanceState) -> Result<(), CoreError>;
}

/// Keeps the saved state in memory. Useful for tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<MemorySlot>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    state: Option<FinanceState>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: FinanceState) -> Self {
        Self {
            inner: Mutex::new(MemorySlot {
                state: Some(state),
                ..MemorySlot::default()
            }),
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|slot| slot.saves).unwrap_or(0)
    }

    pub fn saved_state(&self) -> Option<FinanceState> {
        self.inner.lock().ok().and_then(|slot| slot.state.clone())
    }

    /// Makes every following save fail, simulating an unavailable backend.
    pub fn fail_saves(&self, fail: bool) {
        if let Ok(mut slot) = self.inner.lock() {
            slot.fail_saves = fail;
        }
    }
}

impl FinanceStorage for MemoryStorage {
    fn load(&self) -> Result<Option<FinanceState>, CoreError> {
        let slot = self
            .inner
            .lock()
            .map_err(|_| CoreError::Storage("memory storage poisoned".into()))?;
        Ok(slot.state.clone())
    }

    fn save(&self, state: &FinanceState) -> Result<(), CoreError> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| CoreError::Storage("memory storage poisoned".into()))?;
        if slot.fail_saves {
            return Err(CoreError::Storage("memory storage rejected save".into()));
        }
        slot.state = Some(state.clone());
        slot.saves += 1;
        Ok(())
    }
}

/// Detects dangling references and invariant drift within a state snapshot.
pub fn state_warnings(state: &FinanceState) -> Vec<String> {
    let batch_ids: HashSet<_> = state.batches.iter().map(|b| b.id.as_str()).collect();
    let category_ids: HashSet<_> = state.categories.iter().map(|c| c.id.as_str()).collect();
    let goal_ids: HashSet<_> = state.reserve_goals.iter().map(|g| g.id.as_str()).collect();
    let mut warnings = Vec::new();

    let active = state.batches.iter().filter(|b| b.is_active()).count();
    if active > 1 {
        warnings.push(format!("{} batches are active at once", active));
    }

    for txn in &state.transactions {
        if !batch_ids.contains(txn.batch_id.as_str()) {
            warnings.push(format!(
                "transaction {} references unknown batch {}",
                txn.id, txn.batch_id
            ));
        }
        if let Some(category) = txn.category_id.as_deref() {
            if !category_ids.contains(category) {
                warnings.push(format!(
                    "transaction {} references missing category {}",
                    txn.id, category
                ));
            }
        }
        if txn.amount <= 0 {
            warnings.push(format!("transaction {} has non-positive amount", txn.id));
        } else if txn.amount > MAX_AMOUNT {
            warnings.push(format!("transaction {} exceeds the amount limit", txn.id));
        }
    }

    for batch in &state.batches {
        for entry in &batch.budgets {
            if !category_ids.contains(entry.category_id.as_str()) {
                warnings.push(format!(
                    "batch {} budgets missing category {}",
                    batch.id, entry.category_id
                ));
            }
        }
    }

    for allocation in &state.reserve_allocations {
        if !goal_ids.contains(allocation.goal_id.as_str()) {
            warnings.push(format!(
                "allocation {} references missing goal {}",
                allocation.id, allocation.goal_id
            ));
        }
    }

    let replayed = state.replayed_balances();
    if replayed != state.balances() {
        warnings.push(format!(
            "balances drifted from ledger replay: stored {}/{}, replayed {}/{}",
            state.main_balance, state.reserve_balance, replayed.main, replayed.reserve
        ));
    }
    warnings
}
