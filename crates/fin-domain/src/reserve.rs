//! Savings goals layered on top of the reserve balance.

use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReserveGoal {
    pub id: String,
    pub name: String,
    pub target: Amount,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl ReserveGoal {
    pub fn from_draft(draft: ReserveGoalDraft) -> Self {
        Self::from_draft_with_id(new_id("r"), draft)
    }

    pub fn from_draft_with_id(id: impl Into<String>, draft: ReserveGoalDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            target: draft.target,
            description: draft.description,
            icon: draft.icon,
            color: draft.color,
        }
    }
}

impl Identifiable for ReserveGoal {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for `addReserveGoal`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReserveGoalDraft {
    pub name: String,
    pub target: Amount,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl ReserveGoalDraft {
    pub fn new(name: impl Into<String>, target: Amount) -> Self {
        Self {
            name: name.into(),
            target,
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReserveGoalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ReserveGoalPatch {
    pub fn apply(self, goal: &mut ReserveGoal) {
        if let Some(name) = self.name {
            goal.name = name;
        }
        if let Some(target) = self.target {
            goal.target = target;
        }
        if let Some(description) = self.description {
            goal.description = description;
        }
        if let Some(icon) = self.icon {
            goal.icon = icon;
        }
        if let Some(color) = self.color {
            goal.color = color;
        }
    }
}

/// Portion of the reserve earmarked for a goal. Advisory only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReserveAllocation {
    pub id: String,
    pub goal_id: String,
    pub amount: Amount,
}

impl ReserveAllocation {
    pub fn new(goal_id: impl Into<String>, amount: Amount) -> Self {
        Self {
            id: new_id("a"),
            goal_id: goal_id.into(),
            amount,
        }
    }
}

impl Amounted for ReserveAllocation {
    fn amount(&self) -> Amount {
        self.amount
    }
}
