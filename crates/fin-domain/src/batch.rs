//! Budgeting batches: named, date-bounded periods that scope transactions and budgets.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BatchStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub budgets: Vec<BudgetEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_main_balance: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_reserve_balance: Option<Amount>,
}

impl Batch {
    /// Creates a planned batch with an empty budget table.
    pub fn from_draft(draft: BatchDraft) -> Self {
        Self::from_draft_with_id(new_id("b"), draft)
    }

    pub fn from_draft_with_id(id: impl Into<String>, draft: BatchDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: BatchStatus::Planned,
            notes: draft.notes,
            budgets: Vec::new(),
            snapshot_main_balance: None,
            snapshot_reserve_balance: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == BatchStatus::Active
    }

    pub fn is_archived(&self) -> bool {
        self.status == BatchStatus::Archived
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn budget_for(&self, category_id: &str) -> Option<&BudgetEntry> {
        self.budgets
            .iter()
            .find(|entry| entry.category_id == category_id)
    }

    /// Replaces the amount for `category_id` or appends a new entry.
    pub fn upsert_budget(&mut self, category_id: &str, amount: Amount) {
        match self
            .budgets
            .iter_mut()
            .find(|entry| entry.category_id == category_id)
        {
            Some(entry) => entry.amount = amount,
            None => self.budgets.push(BudgetEntry {
                category_id: category_id.to_string(),
                amount,
            }),
        }
    }

    pub fn total_budgeted(&self) -> Amount {
        self.budgets.iter().map(Amounted::amount).sum()
    }
}

impl Identifiable for Batch {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Batch {
    fn display_label(&self) -> String {
        format!(
            "{} ({} to {}) [{}]",
            self.name, self.start_date, self.end_date, self.status
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Planned,
    Active,
    Archived,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BatchStatus::Planned => "Planned",
            BatchStatus::Active => "Active",
            BatchStatus::Archived => "Archived",
        };
        f.write_str(label)
    }
}

/// Budgeted amount for one category inside a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    pub category_id: String,
    pub amount: Amount,
}

impl BelongsToCategory for BudgetEntry {
    fn category_id(&self) -> Option<&str> {
        Some(&self.category_id)
    }
}

impl Amounted for BudgetEntry {
    fn amount(&self) -> Amount {
        self.amount
    }
}

/// Payload for `createBatch`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchDraft {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

impl BatchDraft {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Partial update applied by `updateBatch`. Status, budgets and snapshots are not editable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BatchPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.notes.is_none()
    }

    pub fn apply(self, batch: &mut Batch) {
        if let Some(name) = self.name {
            batch.name = name;
        }
        if let Some(start_date) = self.start_date {
            batch.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            batch.end_date = end_date;
        }
        if let Some(notes) = self.notes {
            batch.notes = notes;
        }
    }
}
