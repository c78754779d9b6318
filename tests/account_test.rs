// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Account public API integration tests.

use account_demo_rs::{
    Account, AccountId, AccountProfile, AccountStatus, AccountType, HistoryOrder, OperationError,
    Operation, SequenceNumber, TargetDirectory, TransactionKind,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

// === Helper Functions ===

fn demo_profile() -> AccountProfile {
    AccountProfile {
        account_id: AccountId(123456),
        owner_name: "Mariam Riyad".to_string(),
        account_type: AccountType::Savings,
    }
}

fn open_account(balance: Decimal, status: AccountStatus) -> Account {
    Account::open(demo_profile(), balance, status, TargetDirectory::demo()).unwrap()
}

// === Basic Account Tests ===

#[test]
fn opening_balance_seeds_the_ledger() {
    let account = open_account(dec!(1000.00), AccountStatus::Verified);
    assert_eq!(account.balance(), dec!(1000.00));

    let statement = account.statement(HistoryOrder::OldestFirst);
    assert_eq!(statement.record_count(), 1);
    let record = &statement.records()[0];
    assert_eq!(record.kind(), &TransactionKind::InitialBalance);
    assert_eq!(record.amount(), dec!(1000.00));
    assert_eq!(record.resulting_balance(), dec!(1000.00));
}

#[test]
fn deposit_appends_record_with_new_balance() {
    // Scenario: initial balance 1000, Verified, deposit 200.
    let account = open_account(dec!(1000.00), AccountStatus::Verified);
    let record = account.deposit(dec!(200.00)).unwrap();

    assert_eq!(account.balance(), dec!(1200.00));
    assert_eq!(record.kind(), &TransactionKind::Deposit);
    assert_eq!(record.amount(), dec!(200.00));
    assert_eq!(record.resulting_balance(), dec!(1200.00));

    let statement = account.statement(HistoryOrder::OldestFirst);
    assert_eq!(statement.record_count(), 2);
}

#[test]
fn multiple_deposits_accumulate() {
    let account = open_account(Decimal::ZERO, AccountStatus::Verified);
    account.deposit(dec!(100.00)).unwrap();
    account.deposit(dec!(50.00)).unwrap();
    account.deposit(dec!(25.50)).unwrap();
    assert_eq!(account.balance(), dec!(175.50));
}

#[test]
fn withdrawal_decreases_balance() {
    let account = open_account(dec!(100.00), AccountStatus::Verified);
    let record = account.withdraw(dec!(30.00)).unwrap();
    assert_eq!(account.balance(), dec!(70.00));
    assert_eq!(record.kind(), &TransactionKind::Withdrawal);
    assert_eq!(record.resulting_balance(), dec!(70.00));
}

#[test]
fn withdraw_exact_balance_succeeds() {
    let account = open_account(dec!(100.00), AccountStatus::Verified);
    account.withdraw(dec!(100.00)).unwrap();
    assert_eq!(account.balance(), Decimal::ZERO);
}

#[test]
fn small_decimal_precision() {
    let account = open_account(Decimal::ZERO, AccountStatus::Verified);
    account.deposit(dec!(0.0001)).unwrap();
    account.deposit(dec!(0.0002)).unwrap();
    assert_eq!(account.balance(), dec!(0.0003));
}

#[test]
fn large_amounts() {
    let account = open_account(Decimal::ZERO, AccountStatus::Verified);
    let large = dec!(999999999999.9999);
    account.deposit(large).unwrap();
    assert_eq!(account.balance(), large);
}

// === Error Cases ===

#[test]
fn deposit_zero_returns_invalid_amount() {
    let account = open_account(dec!(100.00), AccountStatus::Verified);
    let result = account.deposit(Decimal::ZERO);
    assert_eq!(result, Err(OperationError::InvalidAmount));
}

#[test]
fn deposit_negative_returns_invalid_amount() {
    let account = open_account(dec!(100.00), AccountStatus::Verified);
    let result = account.deposit(dec!(-10.00));
    assert_eq!(result, Err(OperationError::InvalidAmount));
}

#[test]
fn rejections_are_idempotent() {
    let account = open_account(dec!(100.00), AccountStatus::Verified);

    for _ in 0..5 {
        assert_eq!(account.deposit(dec!(-5.00)), Err(OperationError::InvalidAmount));
    }

    // Neither balance nor ledger moved.
    assert_eq!(account.balance(), dec!(100.00));
    assert_eq!(account.statement(HistoryOrder::OldestFirst).record_count(), 1);
}

#[test]
fn withdrawal_more_than_balance_returns_insufficient_funds() {
    // Scenario: balance 100, withdraw 150.
    let account = open_account(dec!(100.00), AccountStatus::Verified);
    let result = account.withdraw(dec!(150.00));
    assert_eq!(result, Err(OperationError::InsufficientFunds));
    // Balance unchanged
    assert_eq!(account.balance(), dec!(100.00));
}

#[test]
fn withdrawal_zero_returns_invalid_amount() {
    let account = open_account(dec!(100.00), AccountStatus::Verified);
    let result = account.withdraw(Decimal::ZERO);
    assert_eq!(result, Err(OperationError::InvalidAmount));
}

// === Status Gating ===

#[test]
fn suspended_account_rejects_withdrawal() {
    // Scenario: Suspended, withdraw 50.
    let account = open_account(dec!(1000.00), AccountStatus::Suspended);
    let result = account.withdraw(dec!(50.00));
    assert_eq!(
        result,
        Err(OperationError::IllegalOperation {
            operation: Operation::Withdraw,
            status: AccountStatus::Suspended,
        })
    );
    assert_eq!(account.balance(), dec!(1000.00));
    assert_eq!(account.statement(HistoryOrder::OldestFirst).record_count(), 1);
}

#[test]
fn suspended_account_accepts_deposit() {
    // Scenario: Suspended, deposit 50 succeeds.
    let account = open_account(dec!(1000.00), AccountStatus::Suspended);
    account.deposit(dec!(50.00)).unwrap();
    assert_eq!(account.balance(), dec!(1050.00));
}

#[test]
fn suspended_account_rejects_transfer_phase_one() {
    let account = open_account(dec!(1000.00), AccountStatus::Suspended);
    let result = account.begin_transfer();
    assert_eq!(
        result,
        Err(OperationError::IllegalOperation {
            operation: Operation::Transfer,
            status: AccountStatus::Suspended,
        })
    );
    assert!(!account.transfer_pending());
}

#[test]
fn closed_account_rejects_deposit_and_withdrawal_but_not_statement() {
    // Scenario: Closed, deposit 1 and withdraw 1 both fail, statement works.
    let account = open_account(dec!(1000.00), AccountStatus::Closed);

    assert_eq!(
        account.deposit(dec!(1.00)),
        Err(OperationError::IllegalOperation {
            operation: Operation::Deposit,
            status: AccountStatus::Closed,
        })
    );
    assert_eq!(
        account.withdraw(dec!(1.00)),
        Err(OperationError::IllegalOperation {
            operation: Operation::Withdraw,
            status: AccountStatus::Closed,
        })
    );

    let statement = account.statement(HistoryOrder::NewestFirst);
    assert_eq!(statement.record_count(), 1);
    assert_eq!(statement.balance(), dec!(1000.00));
    assert_eq!(statement.status(), AccountStatus::Closed);
}

#[test]
fn legality_is_checked_before_amount() {
    // Both the status and the amount are invalid; the status failure
    // must be reported.
    let account = open_account(dec!(100.00), AccountStatus::Closed);
    let result = account.deposit(dec!(-1.00));
    assert!(matches!(result, Err(OperationError::IllegalOperation { .. })));
}

#[test]
fn any_status_is_reachable_from_any_other() {
    let account = open_account(dec!(100.00), AccountStatus::Closed);

    assert_eq!(account.change_status(AccountStatus::Verified), AccountStatus::Closed);
    assert_eq!(account.status(), AccountStatus::Verified);
    account.withdraw(dec!(10.00)).unwrap();

    account.change_status(AccountStatus::Suspended);
    account.change_status(AccountStatus::Closed);
    account.change_status(AccountStatus::Suspended);
    assert_eq!(account.status(), AccountStatus::Suspended);
}

#[test]
fn status_change_appends_no_ledger_record() {
    let account = open_account(dec!(100.00), AccountStatus::Verified);
    account.change_status(AccountStatus::Suspended);
    account.change_status(AccountStatus::Verified);
    assert_eq!(account.statement(HistoryOrder::OldestFirst).record_count(), 1);
}

// === Transfer Session Tests ===

#[test]
fn transfer_two_phase_flow() {
    // Scenario: Verified, balance 500, begin then confirm 300 to 789012.
    let account = open_account(dec!(500.00), AccountStatus::Verified);

    account.begin_transfer().unwrap();
    assert!(account.transfer_pending());

    let record = account
        .confirm_transfer(AccountId(789012), dec!(300.00))
        .unwrap();

    assert_eq!(account.balance(), dec!(200.00));
    assert_eq!(record.amount(), dec!(300.00));
    assert_eq!(record.resulting_balance(), dec!(200.00));
    assert_eq!(
        record.kind(),
        &TransactionKind::TransferOut {
            target_id: AccountId(789012),
            target_name: "Ahmed Hassan".to_string(),
        }
    );

    // Session closed, back to phase-1-eligible state.
    assert!(!account.transfer_pending());
}

#[test]
fn confirm_without_begin_is_rejected() {
    let account = open_account(dec!(500.00), AccountStatus::Verified);
    let result = account.confirm_transfer(AccountId(789012), dec!(100.00));
    assert_eq!(result, Err(OperationError::TransferNotStarted));
    assert_eq!(account.balance(), dec!(500.00));
}

#[test]
fn confirm_unknown_target_is_rejected() {
    let account = open_account(dec!(500.00), AccountStatus::Verified);
    account.begin_transfer().unwrap();

    let result = account.confirm_transfer(AccountId(111111), dec!(100.00));
    assert_eq!(result, Err(OperationError::UnknownTarget(AccountId(111111))));

    // The failure did not consume the session: a corrected confirmation
    // still goes through.
    let record = account
        .confirm_transfer(AccountId(345678), dec!(100.00))
        .unwrap();
    assert_eq!(record.resulting_balance(), dec!(400.00));
}

#[test]
fn confirm_checks_target_before_amount() {
    let account = open_account(dec!(500.00), AccountStatus::Verified);
    account.begin_transfer().unwrap();

    // Unknown target and bad amount together: target wins.
    let result = account.confirm_transfer(AccountId(111111), dec!(-10.00));
    assert_eq!(result, Err(OperationError::UnknownTarget(AccountId(111111))));
}

#[test]
fn confirm_invalid_amount_is_rejected() {
    let account = open_account(dec!(500.00), AccountStatus::Verified);
    account.begin_transfer().unwrap();
    let result = account.confirm_transfer(AccountId(789012), Decimal::ZERO);
    assert_eq!(result, Err(OperationError::InvalidAmount));
}

#[test]
fn confirm_over_balance_is_rejected() {
    let account = open_account(dec!(100.00), AccountStatus::Verified);
    account.begin_transfer().unwrap();
    let result = account.confirm_transfer(AccountId(789012), dec!(500.00));
    assert_eq!(result, Err(OperationError::InsufficientFunds));
    assert_eq!(account.balance(), dec!(100.00));
}

#[test]
fn legality_is_rechecked_at_confirmation() {
    // The status changed between phase 1 and phase 2; the confirmation
    // must report the status, not the stale session.
    let account = open_account(dec!(500.00), AccountStatus::Verified);
    account.begin_transfer().unwrap();

    account.change_status(AccountStatus::Suspended);

    let result = account.confirm_transfer(AccountId(789012), dec!(100.00));
    assert_eq!(
        result,
        Err(OperationError::IllegalOperation {
            operation: Operation::Transfer,
            status: AccountStatus::Suspended,
        })
    );
    assert_eq!(account.balance(), dec!(500.00));
}

#[test]
fn status_change_cancels_open_session() {
    let account = open_account(dec!(500.00), AccountStatus::Verified);
    account.begin_transfer().unwrap();

    account.change_status(AccountStatus::Closed);
    account.change_status(AccountStatus::Verified);

    // Session did not survive the round trip through Closed.
    assert!(!account.transfer_pending());
    let result = account.confirm_transfer(AccountId(789012), dec!(100.00));
    assert_eq!(result, Err(OperationError::TransferNotStarted));
}

#[test]
fn cancel_transfer_is_always_legal_and_idempotent() {
    let account = open_account(dec!(500.00), AccountStatus::Verified);
    account.begin_transfer().unwrap();
    account.cancel_transfer();
    assert!(!account.transfer_pending());

    // Cancelling with no session open, or under any status, is a no-op.
    account.cancel_transfer();
    account.change_status(AccountStatus::Closed);
    account.cancel_transfer();

    assert_eq!(account.balance(), dec!(500.00));
    assert_eq!(account.statement(HistoryOrder::OldestFirst).record_count(), 1);
}

// === State Hook Tests ===

#[test]
fn hook_fires_after_each_successful_mutation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut account = open_account(dec!(1000.00), AccountStatus::Verified);
    account.set_state_hook(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    account.deposit(dec!(100.00)).unwrap();
    account.withdraw(dec!(50.00)).unwrap();
    account.begin_transfer().unwrap();
    account.confirm_transfer(AccountId(789012), dec!(25.00)).unwrap();
    account.change_status(AccountStatus::Suspended);

    // deposit + withdraw + confirm + status change; begin is not a
    // persistent mutation.
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn hook_receives_the_post_mutation_state() {
    let captured = Arc::new(parking_lot::Mutex::new(None));
    let slot = Arc::clone(&captured);

    let mut account = open_account(dec!(1000.00), AccountStatus::Verified);
    account.set_state_hook(move |state| {
        *slot.lock() = Some(state.clone());
    });

    account.deposit(dec!(200.00)).unwrap();

    let state = captured.lock().clone().unwrap();
    assert_eq!(state.balance, dec!(1200.00));
    assert_eq!(state.status, AccountStatus::Verified);
    assert_eq!(state.transactions.len(), 2);
    assert_eq!(
        state.transactions.last().unwrap().resulting_balance(),
        dec!(1200.00)
    );
}

#[test]
fn hook_does_not_fire_on_rejection_or_session_flags() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let mut account = open_account(dec!(100.00), AccountStatus::Verified);
    account.set_state_hook(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let _ = account.deposit(dec!(-1.00));
    let _ = account.withdraw(dec!(500.00));
    account.begin_transfer().unwrap();
    account.cancel_transfer();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// === Multi-threading Tests ===

#[test]
fn concurrent_deposits_are_atomic() {
    let account = Arc::new(open_account(Decimal::ZERO, AccountStatus::Verified));
    let mut handles = vec![];

    for _ in 0..100 {
        let acc = Arc::clone(&account);
        handles.push(thread::spawn(move || {
            let _ = acc.deposit(dec!(1.00));
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(account.balance(), dec!(100.00));

    // Every deposit got its own record with a unique sequence number.
    let statement = account.statement(HistoryOrder::OldestFirst);
    assert_eq!(statement.record_count(), 100);
    let sequences: HashSet<SequenceNumber> =
        statement.records().iter().map(|r| r.sequence()).collect();
    assert_eq!(sequences.len(), 100);
}

#[test]
fn no_double_spend_race_condition() {
    // Concurrent withdrawals of the full balance: exactly one may win.
    for _ in 0..10 {
        let account = Arc::new(open_account(dec!(100.00), AccountStatus::Verified));
        let successes = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];

        for _ in 0..10 {
            let acc = Arc::clone(&account);
            let counter = Arc::clone(&successes);
            handles.push(thread::spawn(move || {
                if acc.withdraw(dec!(100.00)).is_ok() {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(account.balance(), Decimal::ZERO);
    }
}

#[test]
fn balance_and_ledger_stay_consistent_under_concurrency() {
    let account = Arc::new(open_account(dec!(1000.00), AccountStatus::Verified));
    let mut handles = vec![];

    for i in 0..50 {
        let acc = Arc::clone(&account);
        handles.push(thread::spawn(move || {
            if i % 2 == 0 {
                let _ = acc.deposit(dec!(10.00));
            } else {
                let _ = acc.withdraw(dec!(10.00));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // A reader must never see a balance without its paired record.
    let statement = account.statement(HistoryOrder::NewestFirst);
    assert_eq!(
        statement.balance(),
        statement.records()[0].resulting_balance()
    );
    assert!(account.balance() >= Decimal::ZERO);
}
