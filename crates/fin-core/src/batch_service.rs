use fin_domain::{Amount, Batch, BatchDraft, BatchPatch, BatchStatus, FinanceState};
use tracing::info;

use crate::{validate, CoreError, CoreResult};

/// Batch lifecycle: planned, then active, then archived. At most one batch is active.
pub struct BatchService;

impl BatchService {
    /// Adds a planned batch and returns its identifier.
    pub fn create(state: &mut FinanceState, draft: BatchDraft) -> CoreResult<String> {
        Self::validate_draft(&draft)?;
        let batch = Batch::from_draft(draft);
        let id = batch.id.clone();
        state.batches.push(batch);
        Ok(id)
    }

    pub fn update(state: &mut FinanceState, id: &str, patch: BatchPatch) -> CoreResult<()> {
        if let Some(name) = patch.name.as_deref() {
            validate::non_blank("batch name", name)?;
        }
        let batch = state
            .batch_mut(id)
            .ok_or_else(|| CoreError::not_found("batch", id))?;
        let start = patch.start_date.unwrap_or(batch.start_date);
        let end = patch.end_date.unwrap_or(batch.end_date);
        validate::date_range(start, end)?;
        patch.apply(batch);
        Ok(())
    }

    /// Makes `id` the active batch.
    ///
    /// Returns `false` when the batch was already active and nothing changed.
    pub fn activate(state: &mut FinanceState, id: &str) -> CoreResult<bool> {
        let status = state
            .batch(id)
            .map(|batch| batch.status)
            .ok_or_else(|| CoreError::not_found("batch", id))?;
        match status {
            BatchStatus::Active => return Ok(false),
            BatchStatus::Archived => {
                return Err(CoreError::conflict(format!(
                    "batch `{}` is archived and cannot be reactivated",
                    id
                )))
            }
            BatchStatus::Planned => {}
        }
        if let Some(current) = state.active_batch() {
            return Err(CoreError::conflict(format!(
                "batch `{}` is still active; archive it before activating `{}`",
                current.name, id
            )));
        }
        if let Some(batch) = state.batch_mut(id) {
            batch.status = BatchStatus::Active;
        }
        info!(batch = %id, "batch activated");
        Ok(true)
    }

    /// Archives `id`, recording the balances at the time of archiving.
    pub fn archive(state: &mut FinanceState, id: &str) -> CoreResult<()> {
        let balances = state.balances();
        let batch = state
            .batch_mut(id)
            .ok_or_else(|| CoreError::not_found("batch", id))?;
        if batch.is_archived() {
            return Err(CoreError::conflict(format!(
                "batch `{}` is already archived",
                id
            )));
        }
        Self::seal(batch, balances.main, balances.reserve);
        info!(batch = %id, main = balances.main, reserve = balances.reserve, "batch archived");
        Ok(())
    }

    pub fn active(state: &FinanceState) -> Option<&Batch> {
        state.active_batch()
    }

    pub fn validate_draft(draft: &BatchDraft) -> CoreResult<()> {
        validate::non_blank("batch name", &draft.name)?;
        validate::date_range(draft.start_date, draft.end_date)
    }

    fn seal(batch: &mut Batch, main: Amount, reserve: Amount) {
        batch.status = BatchStatus::Archived;
        batch.snapshot_main_balance = Some(main);
        batch.snapshot_reserve_balance = Some(reserve);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn create_starts_planned() {
        let mut state = FinanceState::seeded();
        let id = BatchService::create(&mut state, BatchDraft::new("April", date(4, 1), date(4, 30)))
            .expect("create batch");
        let batch = state.batch(&id).unwrap();
        assert_eq!(batch.status, BatchStatus::Planned);
        assert!(batch.budgets.is_empty());
    }

    #[test]
    fn create_rejects_blank_name_and_inverted_range() {
        let mut state = FinanceState::seeded();
        let blank = BatchDraft::new("  ", date(4, 1), date(4, 30));
        assert!(matches!(
            BatchService::create(&mut state, blank),
            Err(CoreError::Validation(_))
        ));
        let inverted = BatchDraft::new("April", date(4, 30), date(4, 1));
        assert!(matches!(
            BatchService::create(&mut state, inverted),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn activation_requires_no_other_active_batch() {
        let mut state = FinanceState::seeded();
        let before = state.clone();
        assert!(matches!(
            BatchService::activate(&mut state, "b3"),
            Err(CoreError::Conflict(_))
        ));
        assert_eq!(state, before);

        BatchService::archive(&mut state, "b2").unwrap();
        assert!(BatchService::activate(&mut state, "b3").unwrap());

        let previous = state.batch("b2").unwrap();
        assert_eq!(previous.snapshot_main_balance, Some(4_442_000));
        assert_eq!(previous.snapshot_reserve_balance, Some(6_500_000));
        assert_eq!(BatchService::active(&state).map(|b| b.id.as_str()), Some("b3"));
        assert_eq!(state.batches_with_status(BatchStatus::Active).count(), 1);
    }

    #[test]
    fn activating_active_batch_is_a_noop() {
        let mut state = FinanceState::seeded();
        let before = state.clone();
        assert!(!BatchService::activate(&mut state, "b2").unwrap());
        assert_eq!(state, before);
    }

    #[test]
    fn archived_batches_stay_archived() {
        let mut state = FinanceState::seeded();
        assert!(matches!(
            BatchService::activate(&mut state, "b1"),
            Err(CoreError::Conflict(_))
        ));
        assert!(matches!(
            BatchService::archive(&mut state, "b1"),
            Err(CoreError::Conflict(_))
        ));
    }

    #[test]
    fn archive_without_successor_leaves_no_active_batch() {
        let mut state = FinanceState::seeded();
        BatchService::archive(&mut state, "b2").unwrap();
        assert!(state.active_batch().is_none());
    }

    #[test]
    fn unknown_batches_are_not_found() {
        let mut state = FinanceState::seeded();
        assert!(matches!(
            BatchService::activate(&mut state, "nope"),
            Err(CoreError::NotFound { entity: "batch", .. })
        ));
        assert!(matches!(
            BatchService::update(&mut state, "nope", BatchPatch::default()),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn update_checks_merged_date_range() {
        let mut state = FinanceState::seeded();
        let b3 = state.batch("b3").unwrap().clone();
        let patch = BatchPatch {
            end_date: Some(b3.start_date.pred_opt().unwrap()),
            ..BatchPatch::default()
        };
        assert!(matches!(
            BatchService::update(&mut state, "b3", patch),
            Err(CoreError::Validation(_))
        ));

        let rename = BatchPatch {
            name: Some("Maret (hemat)".into()),
            ..BatchPatch::default()
        };
        BatchService::update(&mut state, "b3", rename).unwrap();
        assert_eq!(state.batch("b3").unwrap().name, "Maret (hemat)");
    }
}
