use std::collections::BTreeMap;

use serde::Serialize;

use fin_domain::{
    sum_amounts, Amount, BatchStatus, FinanceState, Tier, Transaction, TransactionKind,
};

/// Totals per transaction type for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatistics {
    pub batch_id: String,
    pub transactions: usize,
    pub total_income: Amount,
    pub total_expense: Amount,
    pub total_reserve_in: Amount,
    pub total_reserve_out: Amount,
}

impl BatchStatistics {
    /// Net movement of the main balance caused by the batch.
    pub fn net(&self) -> Amount {
        self.total_income
            .saturating_sub(self.total_expense)
            .saturating_sub(self.total_reserve_in)
            .saturating_add(self.total_reserve_out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSpending {
    pub tier: Tier,
    pub spent: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub batch_id: String,
    pub name: String,
    /// First word of the batch name, used as the chart axis label.
    pub label: String,
    pub income: Amount,
    pub expense: Amount,
}

/// Read-only aggregations over the ledger. Nothing here is cached.
pub struct SummaryService;

impl SummaryService {
    /// Unknown batches yield zero totals.
    pub fn batch_statistics(state: &FinanceState, batch_id: &str) -> BatchStatistics {
        state.transactions_for_batch(batch_id).fold(
            BatchStatistics {
                batch_id: batch_id.to_string(),
                ..BatchStatistics::default()
            },
            |mut stats, txn| {
                stats.transactions += 1;
                let total = match txn.kind {
                    TransactionKind::Income => &mut stats.total_income,
                    TransactionKind::Expense => &mut stats.total_expense,
                    TransactionKind::ReserveIn => &mut stats.total_reserve_in,
                    TransactionKind::ReserveOut => &mut stats.total_reserve_out,
                };
                *total = total.saturating_add(txn.amount);
                stats
            },
        )
    }

    /// Expense totals keyed by category id.
    pub fn spending_by_category(state: &FinanceState, batch_id: &str) -> BTreeMap<String, Amount> {
        let mut totals = BTreeMap::new();
        for txn in Self::expenses(state, batch_id) {
            if let Some(category_id) = txn.category_id.as_ref() {
                let total = totals.entry(category_id.clone()).or_insert(0);
                *total = Amount::saturating_add(*total, txn.amount);
            }
        }
        totals
    }

    /// Expense totals for each spending tier, in tier order. Expenses in unknown categories are skipped.
    pub fn spending_by_tier(state: &FinanceState, batch_id: &str) -> Vec<TierSpending> {
        Tier::SPENDING
            .iter()
            .map(|tier| TierSpending {
                tier: *tier,
                spent: sum_amounts(
                    Self::expenses(state, batch_id)
                        .filter(|txn| {
                            txn.category_id
                                .as_deref()
                                .and_then(|id| state.category(id))
                                .map(|category| category.tier == *tier)
                                .unwrap_or(false)
                        })
                        .map(|txn| txn.amount),
                ),
            })
            .collect()
    }

    /// Income and expense for every started batch, in storage order.
    pub fn trend(state: &FinanceState) -> Vec<TrendPoint> {
        state
            .batches
            .iter()
            .filter(|batch| batch.status != BatchStatus::Planned)
            .map(|batch| {
                let stats = Self::batch_statistics(state, &batch.id);
                TrendPoint {
                    batch_id: batch.id.clone(),
                    name: batch.name.clone(),
                    label: batch.name.split(' ').next().unwrap_or_default().to_string(),
                    income: stats.total_income,
                    expense: stats.total_expense,
                }
            })
            .collect()
    }

    /// Newest first by date; same-day entries keep the most recently recorded first.
    pub fn recent_transactions<'a>(
        state: &'a FinanceState,
        batch_id: &str,
        limit: usize,
    ) -> Vec<&'a Transaction> {
        let mut transactions = Self::newest_first(
            state
                .transactions
                .iter()
                .filter(|txn| txn.batch_id == batch_id)
                .collect(),
        );
        transactions.truncate(limit);
        transactions
    }

    /// Activity feed for a batch: optionally one kind only, and a case-insensitive `query`
    /// matched against the description or the category name. A blank query matches everything.
    pub fn transactions_matching<'a>(
        state: &'a FinanceState,
        batch_id: &str,
        kind: Option<TransactionKind>,
        query: &str,
    ) -> Vec<&'a Transaction> {
        let needle = query.trim().to_lowercase();
        let matches_query = |txn: &Transaction| {
            needle.is_empty()
                || txn.description.to_lowercase().contains(&needle)
                || txn
                    .category_id
                    .as_deref()
                    .and_then(|id| state.category(id))
                    .map(|category| category.name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        };
        Self::newest_first(
            state
                .transactions
                .iter()
                .filter(|txn| txn.batch_id == batch_id)
                .filter(|txn| kind.map_or(true, |kind| txn.kind == kind))
                .filter(|txn| matches_query(txn))
                .collect(),
        )
    }

    /// Sorts by date descending; same-day entries put the most recently recorded first.
    fn newest_first(mut transactions: Vec<&Transaction>) -> Vec<&Transaction> {
        transactions.reverse();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        transactions
    }

    fn expenses<'a>(
        state: &'a FinanceState,
        batch_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        state
            .transactions_for_batch(batch_id)
            .filter(|txn| txn.kind == TransactionKind::Expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_for_seeded_february() {
        let state = FinanceState::seeded();
        let stats = SummaryService::batch_statistics(&state, "b2");
        assert_eq!(stats.transactions, 7);
        assert_eq!(stats.total_income, 6_700_000);
        assert_eq!(stats.total_expense, 1_930_000);
        assert_eq!(stats.total_reserve_in, 500_000);
        assert_eq!(stats.total_reserve_out, 0);
        assert_eq!(stats.net(), 4_270_000);
    }

    #[test]
    fn unknown_batch_has_zero_totals() {
        let state = FinanceState::seeded();
        let stats = SummaryService::batch_statistics(&state, "b404");
        assert_eq!(stats.transactions, 0);
        assert_eq!(stats.net(), 0);
    }

    #[test]
    fn spending_breakdowns() {
        let state = FinanceState::seeded();
        let by_category = SummaryService::spending_by_category(&state, "b2");
        assert_eq!(by_category.get("c1"), Some(&980_000));
        assert_eq!(by_category.get("c11"), None);

        let by_tier = SummaryService::spending_by_tier(&state, "b2");
        let amounts: Vec<_> = by_tier.iter().map(|t| (t.tier, t.spent)).collect();
        assert_eq!(
            amounts,
            vec![
                (Tier::Needs, 1_400_000),
                (Tier::Comfort, 0),
                (Tier::Wants, 530_000)
            ]
        );
    }

    #[test]
    fn trend_skips_planned_batches() {
        let state = FinanceState::seeded();
        let trend = SummaryService::trend(&state);
        let ids: Vec<_> = trend.iter().map(|p| p.batch_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
        assert_eq!(trend[0].income, 5_500_000);
        assert_eq!(trend[0].expense, 2_010_000);
        assert_eq!(trend[0].name, "Januari 2026");
        assert_eq!(trend[0].label, "Januari");
        assert_eq!(trend[1].label, "Februari");
    }

    #[test]
    fn recent_transactions_newest_first() {
        let state = FinanceState::seeded();
        let recent = SummaryService::recent_transactions(&state, "b2", 3);
        let ids: Vec<_> = recent.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t12", "t11", "t10"]);
    }

    #[test]
    fn matching_filters_by_kind() {
        let state = FinanceState::seeded();
        let expenses =
            SummaryService::transactions_matching(&state, "b2", Some(TransactionKind::Expense), "");
        let ids: Vec<_> = expenses.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t10", "t9", "t8", "t7"]);

        let all = SummaryService::transactions_matching(&state, "b2", None, "  ");
        assert_eq!(all.len(), 7);
    }

    #[test]
    fn matching_searches_category_names_case_insensitively() {
        let state = FinanceState::seeded();
        // "Makan di Luar" (t9) and "Makanan & Minuman" (t7) match by category only
        let found = SummaryService::transactions_matching(&state, "b2", None, "MAKAN");
        let ids: Vec<_> = found.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t9", "t7"]);

        let by_description = SummaryService::transactions_matching(&state, "b2", None, "setor");
        let ids: Vec<_> = by_description.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t11"]);

        let none = SummaryService::transactions_matching(
            &state,
            "b2",
            Some(TransactionKind::Expense),
            "setor",
        );
        assert!(none.is_empty());
    }

    #[test]
    fn statistics_clamp_extreme_loaded_amounts() {
        let mut state = FinanceState::seeded();
        let date = chrono::NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        for _ in 0..2 {
            state.transactions.push(Transaction::from_draft(
                fin_domain::NewTransaction::income("b2", Amount::MAX, "c11", date),
            ));
            state.transactions.push(Transaction::from_draft(
                fin_domain::NewTransaction::expense("b2", Amount::MAX, "c1", date),
            ));
        }

        let stats = SummaryService::batch_statistics(&state, "b2");
        assert_eq!(stats.total_income, Amount::MAX);
        assert_eq!(stats.total_expense, Amount::MAX);
        assert_eq!(stats.net(), -500_000);
        assert_eq!(
            SummaryService::spending_by_category(&state, "b2").get("c1"),
            Some(&Amount::MAX)
        );
        assert_eq!(SummaryService::spending_by_tier(&state, "b2")[0].spent, Amount::MAX);
    }
}
