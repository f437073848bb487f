use serde::Serialize;
use tracing::debug;

use fin_domain::{
    sum_amounts, Amount, FinanceState, ReserveAllocation, ReserveGoal, ReserveGoalDraft,
    ReserveGoalPatch,
};

use crate::{validate, CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub name: String,
    pub target: Amount,
    pub allocated: Amount,
    /// Allocated share of the target, capped at 100. Zero targets report 100 once anything is allocated.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveSummary {
    pub reserve_balance: Amount,
    pub goals: Vec<GoalProgress>,
    pub total_allocated: Amount,
    /// Reserve balance minus allocations; negative when over-allocated.
    pub unallocated: Amount,
    pub over_allocated: bool,
}

/// Reserve goals and their advisory allocations.
pub struct ReserveService;

impl ReserveService {
    pub fn add_goal(state: &mut FinanceState, draft: ReserveGoalDraft) -> CoreResult<String> {
        Self::validate_draft(&draft)?;
        let goal = ReserveGoal::from_draft(draft);
        let id = goal.id.clone();
        state.reserve_goals.push(goal);
        Ok(id)
    }

    pub fn update_goal(
        state: &mut FinanceState,
        id: &str,
        patch: ReserveGoalPatch,
    ) -> CoreResult<()> {
        if let Some(name) = patch.name.as_deref() {
            validate::non_blank("goal name", name)?;
        }
        if let Some(target) = patch.target {
            validate::non_negative("goal target", target)?;
        }
        let goal = state
            .reserve_goal_mut(id)
            .ok_or_else(|| CoreError::not_found("reserve goal", id))?;
        patch.apply(goal);
        Ok(())
    }

    /// Removes the goal and its allocation. Returns `false` when the goal did not exist.
    pub fn delete_goal(state: &mut FinanceState, id: &str) -> bool {
        let before = state.reserve_goals.len();
        state.reserve_goals.retain(|goal| goal.id != id);
        if state.reserve_goals.len() == before {
            return false;
        }
        let allocations = state.reserve_allocations.len();
        state
            .reserve_allocations
            .retain(|allocation| allocation.goal_id != id);
        debug!(
            goal = %id,
            dropped_allocations = allocations - state.reserve_allocations.len(),
            "reserve goal deleted"
        );
        true
    }

    /// Sets the amount earmarked for `goal_id`, creating the allocation on first use.
    pub fn allocate(state: &mut FinanceState, goal_id: &str, amount: Amount) -> CoreResult<()> {
        validate::non_negative("allocation amount", amount)?;
        if state.reserve_goal(goal_id).is_none() {
            return Err(CoreError::not_found("reserve goal", goal_id));
        }
        match state
            .reserve_allocations
            .iter_mut()
            .find(|allocation| allocation.goal_id == goal_id)
        {
            Some(allocation) => allocation.amount = amount,
            None => state
                .reserve_allocations
                .push(ReserveAllocation::new(goal_id, amount)),
        }
        Ok(())
    }

    pub fn summary(state: &FinanceState) -> ReserveSummary {
        let goals: Vec<GoalProgress> = state
            .reserve_goals
            .iter()
            .map(|goal| {
                let allocated = state
                    .allocation_for(&goal.id)
                    .map(|allocation| allocation.amount)
                    .unwrap_or(0);
                GoalProgress {
                    goal_id: goal.id.clone(),
                    name: goal.name.clone(),
                    target: goal.target,
                    allocated,
                    percent: Self::progress(allocated, goal.target),
                }
            })
            .collect();
        let total_allocated = sum_amounts(goals.iter().map(|goal| goal.allocated));
        let unallocated = state.reserve_balance.saturating_sub(total_allocated);
        ReserveSummary {
            reserve_balance: state.reserve_balance,
            goals,
            total_allocated,
            unallocated,
            over_allocated: unallocated < 0,
        }
    }

    pub fn validate_draft(draft: &ReserveGoalDraft) -> CoreResult<()> {
        validate::non_blank("goal name", &draft.name)?;
        validate::non_negative("goal target", draft.target)
    }

    fn progress(allocated: Amount, target: Amount) -> f64 {
        if target <= 0 {
            return if allocated > 0 { 100.0 } else { 0.0 };
        }
        (allocated as f64 / target as f64 * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_summary() {
        let state = FinanceState::seeded();
        let summary = ReserveService::summary(&state);
        assert_eq!(summary.total_allocated, 6_500_000);
        assert_eq!(summary.unallocated, 0);
        assert!(!summary.over_allocated);

        let emergency = summary.goals.iter().find(|g| g.goal_id == "r1").unwrap();
        assert!((emergency.percent - 45.0).abs() < 1e-9);
    }

    #[test]
    fn allocate_upserts_and_reports_over_allocation() {
        let mut state = FinanceState::seeded();
        ReserveService::allocate(&mut state, "r1", 5_000_000).unwrap();
        assert_eq!(state.reserve_allocations.len(), 3);

        let summary = ReserveService::summary(&state);
        assert_eq!(summary.unallocated, -500_000);
        assert!(summary.over_allocated);
    }

    #[test]
    fn allocate_rejections() {
        let mut state = FinanceState::seeded();
        assert!(matches!(
            ReserveService::allocate(&mut state, "r404", 1),
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            ReserveService::allocate(&mut state, "r1", -1),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn new_goal_gets_allocation_on_first_allocate() {
        let mut state = FinanceState::seeded();
        let id = ReserveService::add_goal(&mut state, ReserveGoalDraft::new("Motor", 20_000_000))
            .unwrap();
        ReserveService::allocate(&mut state, &id, 250_000).unwrap();
        assert_eq!(state.allocation_for(&id).map(|a| a.amount), Some(250_000));
    }

    #[test]
    fn delete_goal_cascades() {
        let mut state = FinanceState::seeded();
        assert!(ReserveService::delete_goal(&mut state, "r2"));
        assert!(state.reserve_goal("r2").is_none());
        assert!(state.allocation_for("r2").is_none());
        assert_eq!(state.reserve_allocations.len(), 2);
        assert!(!ReserveService::delete_goal(&mut state, "r2"));
    }

    #[test]
    fn goal_validation() {
        let mut state = FinanceState::seeded();
        assert!(matches!(
            ReserveService::add_goal(&mut state, ReserveGoalDraft::new(" ", 10)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            ReserveService::add_goal(&mut state, ReserveGoalDraft::new("Rumah", -10)),
            Err(CoreError::Validation(_))
        ));
        let patch = ReserveGoalPatch {
            target: Some(-5),
            ..ReserveGoalPatch::default()
        };
        assert!(matches!(
            ReserveService::update_goal(&mut state, "r1", patch),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            ReserveService::update_goal(&mut state, "r404", ReserveGoalPatch::default()),
            Err(CoreError::NotFound { .. })
        ));
    }
}
