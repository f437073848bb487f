//! The two running totals every transaction moves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{common::Amount, transaction::BalanceEffect};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub main: Amount,
    pub reserve: Amount,
}

impl Balances {
    pub fn new(main: Amount, reserve: Amount) -> Self {
        Self { main, reserve }
    }

    /// Applies `effect`, returning `None` when either total would overflow.
    pub fn checked_apply(self, effect: BalanceEffect) -> Option<Self> {
        Some(Self {
            main: self.main.checked_add(effect.main)?,
            reserve: self.reserve.checked_add(effect.reserve)?,
        })
    }

    /// Applies `effect`, clamping each total at the `Amount` range.
    pub fn saturating_apply(self, effect: BalanceEffect) -> Self {
        Self {
            main: self.main.saturating_add(effect.main),
            reserve: self.reserve.saturating_add(effect.reserve),
        }
    }

    /// Difference `self - other`, expressed as the effect that leads from `other` to `self`.
    pub fn delta_from(self, other: Balances) -> BalanceEffect {
        BalanceEffect {
            main: self.main.saturating_sub(other.main),
            reserve: self.reserve.saturating_sub(other.reserve),
        }
    }
}

/// Names one of the two balance accounts, used in insufficient-funds reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BalanceAccount {
    Main,
    Reserve,
}

impl fmt::Display for BalanceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BalanceAccount::Main => "main balance",
            BalanceAccount::Reserve => "reserve balance",
        };
        f.write_str(label)
    }
}
