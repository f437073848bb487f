//! Field checks shared by the command boundary and the services.

use chrono::NaiveDate;
use fin_domain::{Amount, MAX_AMOUNT};

use crate::{CoreError, CoreResult};

pub(crate) fn non_blank(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub(crate) fn positive(field: &str, amount: Amount) -> CoreResult<()> {
    if amount <= 0 {
        return Err(CoreError::validation(format!(
            "{} must be greater than zero, got {}",
            field, amount
        )));
    }
    within_limit(field, amount)
}

pub(crate) fn non_negative(field: &str, amount: Amount) -> CoreResult<()> {
    if amount < 0 {
        return Err(CoreError::validation(format!(
            "{} must not be negative, got {}",
            field, amount
        )));
    }
    within_limit(field, amount)
}

fn within_limit(field: &str, amount: Amount) -> CoreResult<()> {
    if amount > MAX_AMOUNT {
        return Err(CoreError::validation(format!(
            "{} must not exceed {}, got {}",
            field, MAX_AMOUNT, amount
        )));
    }
    Ok(())
}

pub(crate) fn date_range(start: NaiveDate, end: NaiveDate) -> CoreResult<()> {
    if end < start {
        return Err(CoreError::validation(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    Ok(())
}
