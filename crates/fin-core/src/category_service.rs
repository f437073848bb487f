use fin_domain::{Category, CategoryDraft, CategoryPatch, FinanceState, Tier};

use crate::{validate, CoreError, CoreResult};

pub struct CategoryService;

impl CategoryService {
    pub fn add(state: &mut FinanceState, draft: CategoryDraft) -> CoreResult<String> {
        validate::non_blank("category name", &draft.name)?;
        let category = Category::from_draft(draft);
        let id = category.id.clone();
        state.categories.push(category);
        Ok(id)
    }

    /// Merges `patch` into the category. Changing the tier of a referenced category is a conflict.
    pub fn update(state: &mut FinanceState, id: &str, patch: CategoryPatch) -> CoreResult<()> {
        if let Some(name) = patch.name.as_deref() {
            validate::non_blank("category name", name)?;
        }
        let current = state
            .category(id)
            .ok_or_else(|| CoreError::not_found("category", id))?;
        if let Some(tier) = patch.tier {
            if tier != current.tier && state.category_in_use(id) {
                return Err(CoreError::conflict(format!(
                    "category `{}` is in use and cannot move from {} to {}",
                    current.name, current.tier, tier
                )));
            }
        }
        if let Some(category) = state.category_mut(id) {
            patch.apply(category);
        }
        Ok(())
    }

    /// Deletes an unreferenced category. Returns `false` when the id was unknown.
    pub fn remove(state: &mut FinanceState, id: &str) -> CoreResult<bool> {
        if state.category(id).is_none() {
            return Ok(false);
        }
        if state.category_in_use(id) {
            return Err(CoreError::conflict(format!(
                "category `{}` is referenced by transactions or budgets",
                id
            )));
        }
        state.categories.retain(|category| category.id != id);
        Ok(true)
    }

    pub fn by_tier(state: &FinanceState, tier: Tier) -> Vec<&Category> {
        state
            .categories
            .iter()
            .filter(|category| category.tier == tier)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_lookup_by_tier() {
        let mut state = FinanceState::seeded();
        let id = CategoryService::add(&mut state, CategoryDraft::new("Pendidikan", Tier::Comfort))
            .unwrap();
        let category = state.category(&id).unwrap();
        assert_eq!(category.color, Tier::Comfort.color());
        assert_eq!(CategoryService::by_tier(&state, Tier::Comfort).len(), 3);
        assert_eq!(CategoryService::by_tier(&state, Tier::Income).len(), 3);
    }

    #[test]
    fn blank_names_rejected() {
        let mut state = FinanceState::seeded();
        assert!(matches!(
            CategoryService::add(&mut state, CategoryDraft::new("", Tier::Wants)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn tier_change_blocked_while_referenced() {
        let mut state = FinanceState::seeded();
        let patch = CategoryPatch {
            tier: Some(Tier::Wants),
            ..CategoryPatch::default()
        };
        assert!(matches!(
            CategoryService::update(&mut state, "c1", patch.clone()),
            Err(CoreError::Conflict(_))
        ));
        // Perawatan Diri has no transactions or budgets.
        CategoryService::update(&mut state, "c5", patch).unwrap();
        assert_eq!(state.category("c5").unwrap().tier, Tier::Wants);
    }

    #[test]
    fn delete_rules() {
        let mut state = FinanceState::seeded();
        assert!(matches!(
            CategoryService::remove(&mut state, "c1"),
            Err(CoreError::Conflict(_))
        ));
        assert!(CategoryService::remove(&mut state, "c6").unwrap());
        assert!(!CategoryService::remove(&mut state, "c6").unwrap());
    }
}
