use serde::Serialize;

use fin_domain::{sum_amounts, Amount, FinanceState, Tier, TransactionKind};

use crate::{validate, CoreError, CoreResult};

/// Budget usage for one category within a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub category_id: String,
    pub category_name: String,
    /// `None` when the category no longer exists; such lines stay out of the tier subtotals.
    pub tier: Option<Tier>,
    pub budgeted: Amount,
    pub spent: Amount,
    pub remaining: Amount,
    /// `None` when nothing was budgeted.
    pub percent_used: Option<f64>,
    pub over_budget: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBudget {
    pub tier: Tier,
    pub budgeted: Amount,
    pub spent: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    pub batch_id: String,
    pub lines: Vec<BudgetLine>,
    pub total_budgeted: Amount,
    /// Every categorised expense of the batch, budgeted or not.
    pub total_spent: Amount,
    /// Part of `total_spent` in categories without a budget entry.
    pub unbudgeted_spent: Amount,
    pub tiers: Vec<TierBudget>,
}

impl BudgetReport {
    /// Overall usage, `total_spent` against `total_budgeted`. `None` when nothing was budgeted.
    pub fn percent_used(&self) -> Option<f64> {
        (self.total_budgeted > 0)
            .then(|| self.total_spent as f64 / self.total_budgeted as f64 * 100.0)
    }

    pub fn over_budget_lines(&self) -> impl Iterator<Item = &BudgetLine> {
        self.lines.iter().filter(|line| line.over_budget)
    }
}

pub struct BudgetService;

impl BudgetService {
    /// Upserts the budget for `(batch_id, category_id)`.
    pub fn set_budget(
        state: &mut FinanceState,
        batch_id: &str,
        category_id: &str,
        amount: Amount,
    ) -> CoreResult<()> {
        validate::non_negative("budget amount", amount)?;
        let category = state.category(category_id).ok_or_else(|| {
            CoreError::validation(format!("category `{}` does not exist", category_id))
        })?;
        if category.is_income() {
            return Err(CoreError::validation(format!(
                "category `{}` is an income category and cannot carry a budget",
                category.name
            )));
        }
        let batch = state
            .batch_mut(batch_id)
            .ok_or_else(|| CoreError::not_found("batch", batch_id))?;
        batch.upsert_budget(category_id, amount);
        Ok(())
    }

    /// Budget against actual expense for every budget entry of the batch.
    pub fn report(state: &FinanceState, batch_id: &str) -> CoreResult<BudgetReport> {
        let batch = state
            .batch(batch_id)
            .ok_or_else(|| CoreError::not_found("batch", batch_id))?;

        let lines: Vec<BudgetLine> = batch
            .budgets
            .iter()
            .map(|entry| {
                let category = state.category(&entry.category_id);
                let spent = Self::spent(state, batch_id, &entry.category_id);
                BudgetLine {
                    category_id: entry.category_id.clone(),
                    category_name: category
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| entry.category_id.clone()),
                    tier: category.map(|c| c.tier),
                    budgeted: entry.amount,
                    spent,
                    remaining: entry.amount.saturating_sub(spent),
                    percent_used: (entry.amount > 0)
                        .then(|| spent as f64 / entry.amount as f64 * 100.0),
                    over_budget: spent > entry.amount,
                }
            })
            .collect();

        let tiers = Tier::SPENDING
            .iter()
            .map(|tier| TierBudget {
                tier: *tier,
                budgeted: sum_amounts(
                    lines
                        .iter()
                        .filter(|line| line.tier == Some(*tier))
                        .map(|line| line.budgeted),
                ),
                spent: sum_amounts(
                    lines
                        .iter()
                        .filter(|line| line.tier == Some(*tier))
                        .map(|line| line.spent),
                ),
            })
            .collect();

        let total_spent = sum_amounts(
            Self::categorised_expenses(state, batch_id).map(|(_, amount)| amount),
        );
        let unbudgeted_spent = sum_amounts(
            Self::categorised_expenses(state, batch_id)
                .filter(|(category_id, _)| batch.budget_for(category_id).is_none())
                .map(|(_, amount)| amount),
        );

        Ok(BudgetReport {
            batch_id: batch_id.to_string(),
            total_budgeted: sum_amounts(lines.iter().map(|line| line.budgeted)),
            total_spent,
            unbudgeted_spent,
            lines,
            tiers,
        })
    }

    fn spent(state: &FinanceState, batch_id: &str, category_id: &str) -> Amount {
        sum_amounts(
            Self::categorised_expenses(state, batch_id)
                .filter(|(id, _)| *id == category_id)
                .map(|(_, amount)| amount),
        )
    }

    fn categorised_expenses<'a>(
        state: &'a FinanceState,
        batch_id: &'a str,
    ) -> impl Iterator<Item = (&'a str, Amount)> + 'a {
        state
            .transactions_for_batch(batch_id)
            .filter(|txn| txn.kind == TransactionKind::Expense)
            .filter_map(|txn| Some((txn.category_id.as_deref()?, txn.amount)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_budget_upserts() {
        let mut state = FinanceState::seeded();
        BudgetService::set_budget(&mut state, "b3", "c1", 1_000_000).unwrap();
        BudgetService::set_budget(&mut state, "b3", "c1", 1_100_000).unwrap();
        let batch = state.batch("b3").unwrap();
        assert_eq!(batch.budgets.len(), 1);
        assert_eq!(batch.budget_for("c1").map(|b| b.amount), Some(1_100_000));
    }

    #[test]
    fn set_budget_rejections() {
        let mut state = FinanceState::seeded();
        assert!(matches!(
            BudgetService::set_budget(&mut state, "b3", "c1", -1),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            BudgetService::set_budget(&mut state, "b3", "c404", 10),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            BudgetService::set_budget(&mut state, "b3", "c11", 10),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            BudgetService::set_budget(&mut state, "b404", "c1", 10),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn report_for_seeded_february() {
        let state = FinanceState::seeded();
        let report = BudgetService::report(&state, "b2").unwrap();

        assert_eq!(report.lines.len(), 5);
        assert_eq!(report.total_budgeted, 3_000_000);
        // Langganan (c9) has no budget entry but still counts towards the total.
        assert_eq!(report.total_spent, 1_930_000);
        assert_eq!(report.unbudgeted_spent, 180_000);
        assert!((report.percent_used().unwrap() - 64.333).abs() < 0.01);

        let food = report.lines.iter().find(|l| l.category_id == "c1").unwrap();
        assert_eq!(food.remaining, 220_000);
        assert!(!food.over_budget);
        assert!((food.percent_used.unwrap() - 81.666).abs() < 0.01);

        let needs = report.tiers.iter().find(|t| t.tier == Tier::Needs).unwrap();
        assert_eq!(needs.budgeted, 2_200_000);
        assert_eq!(needs.spent, 1_400_000);
        assert_eq!(report.over_budget_lines().count(), 0);
    }

    #[test]
    fn zero_budget_has_no_percentage() {
        let mut state = FinanceState::seeded();
        BudgetService::set_budget(&mut state, "b2", "c9", 0).unwrap();
        let report = BudgetService::report(&state, "b2").unwrap();
        let subscriptions = report.lines.iter().find(|l| l.category_id == "c9").unwrap();
        assert_eq!(subscriptions.percent_used, None);
        assert!(subscriptions.over_budget);
        assert_eq!(report.unbudgeted_spent, 0);
        assert_eq!(report.total_spent, 1_930_000);
    }

    #[test]
    fn budget_for_missing_category_has_no_tier() {
        let mut state = FinanceState::seeded();
        state.categories.retain(|category| category.id != "c3");
        let report = BudgetService::report(&state, "b2").unwrap();

        let orphan = report.lines.iter().find(|l| l.category_id == "c3").unwrap();
        assert_eq!(orphan.tier, None);
        assert_eq!(orphan.category_name, "c3");

        let needs = report.tiers.iter().find(|t| t.tier == Tier::Needs).unwrap();
        assert_eq!(needs.budgeted, 1_200_000 + 600_000);
        assert_eq!(report.total_budgeted, 3_000_000);
    }
}
