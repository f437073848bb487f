mod common;

use chrono::NaiveDate;
use finance_core::{
    domain::{BalanceAccount, BatchStatus, NewTransaction},
    CoreError,
};

fn feb(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
}

#[test]
fn expense_reduces_main_balance() {
    let (mut store, _) = common::setup_test_env();
    assert_eq!(store.balances().main, 4_442_000);

    store
        .add_transaction(
            NewTransaction::expense("b2", 980_000, "c1", feb(26)).with_description("Belanja"),
        )
        .expect("record expense");

    assert_eq!(store.balances().main, 3_462_000);
    assert_eq!(store.balances().reserve, 6_500_000);
}

#[test]
fn reserve_withdrawal_beyond_balance_is_rejected() {
    let (mut store, _) = common::setup_test_env();
    let before = store.state().clone();

    let err = store
        .add_transaction(NewTransaction::reserve_out("b2", 7_000_000, feb(26)))
        .expect_err("must be rejected");

    assert!(matches!(
        err,
        CoreError::InsufficientFunds {
            account: BalanceAccount::Reserve,
            required: 7_000_000,
            available: 6_500_000,
        }
    ));
    assert_eq!(store.state(), &before);
}

#[test]
fn activating_second_batch_conflicts() {
    let (mut store, _) = common::setup_test_env();

    assert!(matches!(
        store.activate_batch("b3"),
        Err(CoreError::Conflict(_))
    ));
    assert_eq!(store.batch("b2").map(|b| b.status), Some(BatchStatus::Active));
    assert_eq!(store.batch("b3").map(|b| b.status), Some(BatchStatus::Planned));
}

#[test]
fn archiving_records_balance_snapshot() {
    let (mut store, _) = common::setup_test_env();
    store
        .add_transaction(NewTransaction::expense("b2", 980_000, "c1", feb(26)))
        .unwrap();

    store.archive_batch("b2").expect("archive");

    let b2 = store.batch("b2").unwrap();
    assert_eq!(b2.status, BatchStatus::Archived);
    assert_eq!(b2.snapshot_main_balance, Some(3_462_000));
    assert_eq!(b2.snapshot_reserve_balance, Some(6_500_000));
}
