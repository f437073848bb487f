//! Ledger operations: appending and deleting transactions together with their balance effects.

use fin_domain::{
    BalanceAccount, Balances, FinanceState, NewTransaction, Transaction, TransactionKind,
};

use crate::{validate, CoreError, CoreResult};

/// Validated add/delete helpers for ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Records a transaction and moves both balances in the same step. Returns the new identifier.
    pub fn add(state: &mut FinanceState, draft: NewTransaction) -> CoreResult<String> {
        Self::validate_against(state, &draft)?;
        let transaction = Transaction::from_draft(draft);
        let next = Self::balances_after_add(state.balances(), &transaction)?;
        let id = transaction.id.clone();
        state.transactions.push(transaction);
        state.set_balances(next);
        Ok(id)
    }

    /// Removes the transaction and reverses its effect. Unknown ids are a no-op.
    ///
    /// Nothing is re-checked: undoing a transfer may leave a balance negative, and an undo
    /// past the `Amount` range clamps rather than refusing the delete.
    pub fn remove(state: &mut FinanceState, id: &str) -> CoreResult<Option<Transaction>> {
        let Some(index) = state.transactions.iter().position(|txn| txn.id == id) else {
            return Ok(None);
        };
        let removed = state.transactions.remove(index);
        let next = state.balances().saturating_apply(removed.effect().inverse());
        state.set_balances(next);
        Ok(Some(removed))
    }

    /// Returns the transactions recorded against `batch_id`, in insertion order.
    pub fn list_for_batch<'a>(state: &'a FinanceState, batch_id: &str) -> Vec<&'a Transaction> {
        state
            .transactions
            .iter()
            .filter(|txn| txn.batch_id == batch_id)
            .collect()
    }

    /// Checks that only look at the draft itself.
    pub fn validate_draft(draft: &NewTransaction) -> CoreResult<()> {
        validate::positive("amount", draft.amount)?;
        validate::non_blank("batch id", &draft.batch_id)?;
        match (draft.kind.requires_category(), draft.category_id.as_deref()) {
            (true, None) => Err(CoreError::validation(format!(
                "{} transactions require a category",
                draft.kind
            ))),
            (true, Some(category_id)) if category_id.trim().is_empty() => Err(
                CoreError::validation(format!("{} transactions require a category", draft.kind)),
            ),
            (false, Some(_)) => Err(CoreError::validation(format!(
                "{} transactions cannot carry a category",
                draft.kind
            ))),
            _ => Ok(()),
        }
    }

    fn validate_against(state: &FinanceState, draft: &NewTransaction) -> CoreResult<()> {
        Self::validate_draft(draft)?;
        if state.batch(&draft.batch_id).is_none() {
            return Err(CoreError::validation(format!(
                "batch `{}` does not exist",
                draft.batch_id
            )));
        }
        if let Some(category_id) = draft.category_id.as_deref() {
            let category = state.category(category_id).ok_or_else(|| {
                CoreError::validation(format!("category `{}` does not exist", category_id))
            })?;
            let income = draft.kind == TransactionKind::Income;
            if income != category.is_income() {
                return Err(CoreError::validation(format!(
                    "category `{}` ({}) cannot be used for {} transactions",
                    category.name, category.tier, draft.kind
                )));
            }
        }
        Ok(())
    }

    fn balances_after_add(balances: Balances, transaction: &Transaction) -> CoreResult<Balances> {
        let amount = transaction.amount;
        match transaction.kind {
            TransactionKind::ReserveIn if balances.main < amount => {
                return Err(CoreError::InsufficientFunds {
                    account: BalanceAccount::Main,
                    required: amount,
                    available: balances.main,
                })
            }
            TransactionKind::ReserveOut if balances.reserve < amount => {
                return Err(CoreError::InsufficientFunds {
                    account: BalanceAccount::Reserve,
                    required: amount,
                    available: balances.reserve,
                })
            }
            _ => {}
        }
        balances
            .checked_apply(transaction.effect())
            .ok_or_else(|| CoreError::validation("amount overflows the balance"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fin_domain::{Amount, MAX_AMOUNT};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()
    }

    #[test]
    fn expense_may_overdraw_main_balance() {
        let mut state = FinanceState::seeded();
        let before = state.balances();
        TransactionService::add(
            &mut state,
            NewTransaction::expense("b2", before.main + 1, "c1", date()),
        )
        .expect("overdraft is allowed");
        assert_eq!(state.main_balance, -1);
        assert_eq!(state.reserve_balance, before.reserve);
    }

    #[test]
    fn reserve_in_requires_main_funds() {
        let mut state = FinanceState::seeded();
        let before = state.clone();
        let err = TransactionService::add(
            &mut state,
            NewTransaction::reserve_in("b2", before.main_balance + 1, date()),
        )
        .expect_err("reserve_in beyond main balance must fail");
        assert!(matches!(
            err,
            CoreError::InsufficientFunds {
                account: BalanceAccount::Main,
                ..
            }
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn reserve_in_of_exact_balance_succeeds() {
        let mut state = FinanceState::seeded();
        let main = state.main_balance;
        TransactionService::add(&mut state, NewTransaction::reserve_in("b2", main, date()))
            .expect("exact balance transfer");
        assert_eq!(state.main_balance, 0);
        assert_eq!(state.reserve_balance, 6_500_000 + main);
    }

    #[test]
    fn rejects_category_rules() {
        let mut state = FinanceState::seeded();
        let missing = NewTransaction::new("b2", TransactionKind::Expense, 10, None, date());
        assert!(matches!(
            TransactionService::add(&mut state, missing),
            Err(CoreError::Validation(_))
        ));

        let reserve_with_category =
            NewTransaction::new("b2", TransactionKind::ReserveOut, 10, Some("c1"), date());
        assert!(matches!(
            TransactionService::add(&mut state, reserve_with_category),
            Err(CoreError::Validation(_))
        ));

        let unknown = NewTransaction::expense("b2", 10, "c404", date());
        assert!(matches!(
            TransactionService::add(&mut state, unknown),
            Err(CoreError::Validation(_))
        ));

        let income_into_spending = NewTransaction::income("b2", 10, "c1", date());
        assert!(matches!(
            TransactionService::add(&mut state, income_into_spending),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn rejects_non_positive_amounts_and_unknown_batches() {
        let mut state = FinanceState::seeded();
        for amount in [0, -5] {
            let draft = NewTransaction::expense("b2", amount, "c1", date());
            assert!(matches!(
                TransactionService::add(&mut state, draft),
                Err(CoreError::Validation(_))
            ));
        }
        let draft = NewTransaction::expense("b404", 10, "c1", date());
        assert!(matches!(
            TransactionService::add(&mut state, draft),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut state = FinanceState::seeded();
        let before = state.clone();
        assert!(TransactionService::remove(&mut state, "t404").unwrap().is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn remove_reverses_without_sufficiency_check() {
        let mut state = FinanceState::seeded();
        let id = TransactionService::add(&mut state, NewTransaction::reserve_out("b2", 6_500_000, date()))
            .expect("drain reserve");
        assert_eq!(state.reserve_balance, 0);

        // spend the withdrawn money, then undo the withdrawal
        let main_balance = state.main_balance;
        TransactionService::add(
            &mut state,
            NewTransaction::expense("b2", main_balance, "c3", date()),
        )
        .unwrap();
        let removed = TransactionService::remove(&mut state, &id).unwrap().unwrap();
        assert_eq!(removed.kind, TransactionKind::ReserveOut);
        assert_eq!(state.main_balance, -6_500_000);
        assert_eq!(state.reserve_balance, 6_500_000);
    }

    #[test]
    fn rejects_amounts_above_the_limit() {
        let mut state = FinanceState::seeded();
        let before = state.clone();
        let draft = NewTransaction::income("b2", Amount::MAX - before.main_balance, "c11", date());
        assert!(matches!(
            TransactionService::add(&mut state, draft),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(state, before);

        TransactionService::add(&mut state, NewTransaction::income("b2", MAX_AMOUNT, "c11", date()))
            .expect("the limit itself is accepted");
    }

    #[test]
    fn delete_is_never_refused_near_the_balance_limit() {
        let mut state = FinanceState::seeded();
        state.main_balance = Amount::MAX - 50;
        let expense =
            TransactionService::add(&mut state, NewTransaction::expense("b2", 100, "c1", date()))
                .unwrap();
        TransactionService::add(&mut state, NewTransaction::income("b2", 100, "c11", date()))
            .unwrap();

        let removed = TransactionService::remove(&mut state, &expense).unwrap();
        assert_eq!(removed.map(|txn| txn.id), Some(expense.clone()));
        assert!(state.transaction(&expense).is_none());
        assert_eq!(state.main_balance, Amount::MAX);
    }
}
