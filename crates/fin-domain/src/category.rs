//! Domain types representing spending and income categories.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::*;

/// Categorises ledger activity for budgeting and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, tier: Tier) -> Self {
        Self {
            id: new_id("c"),
            name: name.into(),
            tier,
            icon: String::new(),
            color: tier.color().to_string(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn from_draft(draft: CategoryDraft) -> Self {
        let color = if draft.color.is_empty() {
            draft.tier.color().to_string()
        } else {
            draft.color
        };
        Self {
            id: new_id("c"),
            name: draft.name,
            tier: draft.tier,
            icon: draft.icon,
            color,
        }
    }

    pub fn is_income(&self) -> bool {
        self.tier == Tier::Income
    }
}

/// Payload for `addCategory`. An empty color falls back to the tier accent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    pub tier: Tier,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, tier: Tier) -> Self {
        Self {
            name: name.into(),
            tier,
            icon: String::new(),
            color: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

impl Identifiable for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        if self.icon.is_empty() {
            format!("{} ({})", self.name, self.tier)
        } else {
            format!("{} {} ({})", self.icon, self.name, self.tier)
        }
    }
}

/// Budgeting tier a category belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Needs,
    Comfort,
    Wants,
    Income,
}

impl Tier {
    /// Spending tiers in presentation order.
    pub const SPENDING: [Tier; 3] = [Tier::Needs, Tier::Comfort, Tier::Wants];

    pub fn is_spending(self) -> bool {
        !matches!(self, Tier::Income)
    }

    /// Accent color used by the presentation layer.
    pub fn color(self) -> &'static str {
        match self {
            Tier::Needs => "#34d399",
            Tier::Comfort => "#a78bfa",
            Tier::Wants => "#fbbf24",
            Tier::Income => "#60a5fa",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Needs => "Needs",
            Tier::Comfort => "Comfort",
            Tier::Wants => "Wants",
            Tier::Income => "Income",
        };
        f.write_str(label)
    }
}

/// Partial update applied by `updateCategory`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CategoryPatch {
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(tier) = self.tier {
            category.tier = tier;
        }
        if let Some(icon) = self.icon {
            category.icon = icon;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
    }
}
