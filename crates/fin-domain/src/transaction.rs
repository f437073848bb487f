//! Domain models for ledger transactions and their balance effects.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

/// A monetary event recorded against a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub batch_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Amount,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

impl Transaction {
    /// Materializes a draft under a freshly generated identifier.
    pub fn from_draft(draft: NewTransaction) -> Self {
        Self::from_draft_with_id(new_id("t"), draft)
    }

    pub fn from_draft_with_id(id: impl Into<String>, draft: NewTransaction) -> Self {
        Self {
            id: id.into(),
            batch_id: draft.batch_id,
            kind: draft.kind,
            amount: draft.amount,
            category_id: draft.category_id,
            description: draft.description,
            date: draft.date,
            notes: draft.notes,
        }
    }

    /// Change this transaction applied to the balances when it was recorded.
    pub fn effect(&self) -> BalanceEffect {
        self.kind.effect(self.amount)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl BelongsToCategory for Transaction {
    fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> Amount {
        self.amount
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {}{} [{}]",
            self.date,
            self.kind.sign(),
            self.amount,
            self.kind
        )
    }
}

/// Payload for `addTransaction`, before an identifier is assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub batch_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Amount,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

impl NewTransaction {
    pub fn new(
        batch_id: impl Into<String>,
        kind: TransactionKind,
        amount: Amount,
        category_id: Option<&str>,
        date: NaiveDate,
    ) -> Self {
        Self {
            batch_id: batch_id.into(),
            kind,
            amount,
            category_id: category_id.map(str::to_string),
            description: String::new(),
            date,
            notes: String::new(),
        }
    }

    pub fn income(batch_id: &str, amount: Amount, category_id: &str, date: NaiveDate) -> Self {
        Self::new(batch_id, TransactionKind::Income, amount, Some(category_id), date)
    }

    pub fn expense(batch_id: &str, amount: Amount, category_id: &str, date: NaiveDate) -> Self {
        Self::new(batch_id, TransactionKind::Expense, amount, Some(category_id), date)
    }

    pub fn reserve_in(batch_id: &str, amount: Amount, date: NaiveDate) -> Self {
        Self::new(batch_id, TransactionKind::ReserveIn, amount, None, date)
    }

    pub fn reserve_out(batch_id: &str, amount: Amount, date: NaiveDate) -> Self {
        Self::new(batch_id, TransactionKind::ReserveOut, amount, None, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Enumerates the four kinds of monetary movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    ReserveIn,
    ReserveOut,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 4] = [
        TransactionKind::Income,
        TransactionKind::Expense,
        TransactionKind::ReserveIn,
        TransactionKind::ReserveOut,
    ];

    /// Income and expense entries must be categorised; reserve transfers never are.
    pub fn requires_category(self) -> bool {
        matches!(self, TransactionKind::Income | TransactionKind::Expense)
    }

    /// Sign shown next to the amount from the main balance's point of view.
    pub fn sign(self) -> char {
        match self {
            TransactionKind::Income | TransactionKind::ReserveOut => '+',
            TransactionKind::Expense | TransactionKind::ReserveIn => '-',
        }
    }

    pub fn effect(self, amount: Amount) -> BalanceEffect {
        match self {
            TransactionKind::Income => BalanceEffect {
                main: amount,
                reserve: 0,
            },
            TransactionKind::Expense => BalanceEffect {
                main: amount.saturating_neg(),
                reserve: 0,
            },
            TransactionKind::ReserveIn => BalanceEffect {
                main: amount.saturating_neg(),
                reserve: amount,
            },
            TransactionKind::ReserveOut => BalanceEffect {
                main: amount,
                reserve: amount.saturating_neg(),
            },
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
            TransactionKind::ReserveIn => "Reserve In",
            TransactionKind::ReserveOut => "Reserve Out",
        };
        f.write_str(label)
    }
}

/// Signed deltas applied to the main and reserve balances.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceEffect {
    pub main: Amount,
    pub reserve: Amount,
}

impl BalanceEffect {
    pub fn inverse(self) -> Self {
        Self {
            main: self.main.saturating_neg(),
            reserve: self.reserve.saturating_neg(),
        }
    }
}
