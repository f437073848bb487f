//! Built-in data used the first time the store starts with empty storage.

use chrono::NaiveDate;

use crate::{
    batch::{Batch, BatchDraft, BatchStatus, BudgetEntry},
    category::{Category, Tier},
    common::Amount,
    reserve::{ReserveAllocation, ReserveGoal, ReserveGoalDraft},
    state::FinanceState,
    transaction::{NewTransaction, Transaction, TransactionKind},
};

pub const SEED_MAIN_BALANCE: Amount = 4_442_000;
pub const SEED_RESERVE_BALANCE: Amount = 6_500_000;

const CATEGORIES: [(&str, &str, Tier, &str); 13] = [
    ("c1", "Makanan & Minuman", Tier::Needs, "🍽️"),
    ("c2", "Transportasi", Tier::Needs, "🚌"),
    ("c3", "Tagihan & Utilitas", Tier::Needs, "⚡"),
    ("c4", "Kesehatan", Tier::Needs, "💊"),
    ("c5", "Perawatan Diri", Tier::Comfort, "🧴"),
    ("c6", "Pakaian", Tier::Comfort, "👕"),
    ("c7", "Hiburan", Tier::Wants, "🎮"),
    ("c8", "Makan di Luar", Tier::Wants, "🍜"),
    ("c9", "Langganan", Tier::Wants, "📱"),
    ("c10", "Shopping", Tier::Wants, "🛍️"),
    ("c11", "Gaji", Tier::Income, "💼"),
    ("c12", "Freelance", Tier::Income, "💻"),
    ("c13", "Bonus", Tier::Income, "🎁"),
];

type SeedTransaction = (
    &'static str,
    &'static str,
    TransactionKind,
    Amount,
    Option<&'static str>,
    &'static str,
    (u32, u32),
    &'static str,
);

const TRANSACTIONS: [SeedTransaction; 12] = [
    ("t1", "b1", TransactionKind::Income, 5_500_000, Some("c11"), "Gaji Januari", (1, 2), ""),
    ("t2", "b1", TransactionKind::Expense, 1_150_000, Some("c1"), "Belanja supermarket", (1, 5), ""),
    ("t3", "b1", TransactionKind::Expense, 580_000, Some("c2"), "Bensin + parkir", (1, 10), ""),
    ("t4", "b1", TransactionKind::Expense, 280_000, Some("c7"), "Game & streaming", (1, 15), ""),
    ("t5", "b1", TransactionKind::ReserveIn, 1_000_000, None, "Setor dana darurat", (1, 25), ""),
    ("t6", "b2", TransactionKind::Income, 5_500_000, Some("c11"), "Gaji Februari", (2, 2), ""),
    ("t7", "b2", TransactionKind::Expense, 980_000, Some("c1"), "Belanja mingguan", (2, 5), ""),
    ("t8", "b2", TransactionKind::Expense, 420_000, Some("c2"), "Bensin + ojek online", (2, 8), ""),
    ("t9", "b2", TransactionKind::Expense, 350_000, Some("c8"), "Dinner Valentine", (2, 14), "🩷"),
    ("t10", "b2", TransactionKind::Expense, 180_000, Some("c9"), "Netflix & Spotify", (2, 18), ""),
    ("t11", "b2", TransactionKind::ReserveIn, 500_000, None, "Setor tabungan rutin", (2, 20), ""),
    ("t12", "b2", TransactionKind::Income, 1_200_000, Some("c12"), "Freelance website", (2, 22), ""),
];

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap_or(NaiveDate::MIN)
}

pub fn seed_categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|(id, name, tier, icon)| Category::new(*name, *tier).with_id(*id).with_icon(*icon))
        .collect()
}

fn budgets(entries: &[(&str, Amount)]) -> Vec<BudgetEntry> {
    entries
        .iter()
        .map(|(category_id, amount)| BudgetEntry {
            category_id: category_id.to_string(),
            amount: *amount,
        })
        .collect()
}

pub fn seed_batches() -> Vec<Batch> {
    let mut january = Batch::from_draft_with_id(
        "b1",
        BatchDraft::new("Januari 2026", day(1, 1), day(1, 31)).with_notes("Bulan pertama tahun baru"),
    );
    january.status = BatchStatus::Archived;
    january.snapshot_main_balance = Some(2_450_000);
    january.snapshot_reserve_balance = Some(5_000_000);
    january.budgets = budgets(&[("c1", 1_200_000), ("c2", 600_000), ("c7", 300_000)]);

    let mut february = Batch::from_draft_with_id(
        "b2",
        BatchDraft::new("Februari 2026", day(2, 1), day(2, 28)),
    );
    february.status = BatchStatus::Active;
    february.budgets = budgets(&[
        ("c1", 1_200_000),
        ("c2", 600_000),
        ("c3", 400_000),
        ("c7", 300_000),
        ("c8", 500_000),
    ]);

    let march = Batch::from_draft_with_id(
        "b3",
        BatchDraft::new("Maret 2026", day(3, 1), day(3, 31)).with_notes("Target tabungan lebih banyak"),
    );

    vec![january, february, march]
}

pub fn seed_transactions() -> Vec<Transaction> {
    TRANSACTIONS
        .iter()
        .map(
            |(id, batch_id, kind, amount, category_id, description, (month, dom), notes)| {
                let draft = NewTransaction::new(*batch_id, *kind, *amount, *category_id, day(*month, *dom))
                    .with_description(*description)
                    .with_notes(*notes);
                Transaction::from_draft_with_id(*id, draft)
            },
        )
        .collect()
}

pub fn seed_reserve_goals() -> Vec<ReserveGoal> {
    let goals = [
        ("r1", "Dana Darurat", 10_000_000, "3 bulan pengeluaran", "🛡️", Tier::Needs),
        ("r2", "Liburan Bali", 5_000_000, "Liburan akhir tahun", "🌴", Tier::Wants),
        ("r3", "Laptop Baru", 15_000_000, "MacBook Air M3", "💻", Tier::Comfort),
    ];
    goals
        .into_iter()
        .map(|(id, name, target, description, icon, accent)| {
            let mut goal = ReserveGoal::from_draft_with_id(
                id,
                ReserveGoalDraft::new(name, target).with_description(description),
            );
            goal.icon = icon.to_string();
            goal.color = accent.color().to_string();
            goal
        })
        .collect()
}

pub fn seed_reserve_allocations() -> Vec<ReserveAllocation> {
    [("ra1", "r1", 4_500_000), ("ra2", "r2", 1_200_000), ("ra3", "r3", 800_000)]
        .into_iter()
        .map(|(id, goal_id, amount)| ReserveAllocation {
            id: id.to_string(),
            goal_id: goal_id.to_string(),
            amount,
        })
        .collect()
}

pub fn seed_state() -> FinanceState {
    let mut state = FinanceState {
        main_balance: SEED_MAIN_BALANCE,
        reserve_balance: SEED_RESERVE_BALANCE,
        opening_balances: None,
        batches: seed_batches(),
        transactions: seed_transactions(),
        categories: seed_categories(),
        reserve_goals: seed_reserve_goals(),
        reserve_allocations: seed_reserve_allocations(),
    };
    state.ensure_opening_balances();
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balances::Balances;

    #[test]
    fn seed_has_exactly_one_active_batch() {
        let state = seed_state();
        let active: Vec<_> = state.batches.iter().filter(|b| b.is_active()).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "b2");
    }

    #[test]
    fn seed_opening_balances_account_for_seed_transactions() {
        let state = seed_state();
        assert_eq!(state.opening_balances, Some(Balances::new(-2_318_000, 5_000_000)));
        assert_eq!(state.replayed_balances(), state.balances());
    }

    #[test]
    fn seed_transactions_reference_known_entities() {
        let state = seed_state();
        for txn in &state.transactions {
            assert!(state.batch(&txn.batch_id).is_some(), "{} batch", txn.id);
            if let Some(category_id) = txn.category_id.as_deref() {
                assert!(state.category(category_id).is_some(), "{} category", txn.id);
            }
            assert_eq!(txn.kind.requires_category(), txn.category_id.is_some());
        }
    }
}
