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

//! Account state machine.
//!
//! The account owns the current balance, the status, the ledger, and the
//! two-phase transfer session. Every mutating operation consults the
//! legality matrix first, then validates input, and only then touches
//! state; balance and ledger are updated together inside one critical
//! section so a reader can never observe one without the other.
//!
//! # Example
//!
//! ```
//! use account_demo_rs::{Account, AccountId, AccountProfile, AccountStatus, AccountType, TargetDirectory};
//! use rust_decimal_macros::dec;
//!
//! let profile = AccountProfile {
//!     account_id: AccountId(123456),
//!     owner_name: "Mariam Riyad".to_string(),
//!     account_type: AccountType::Savings,
//! };
//! let account = Account::open(
//!     profile,
//!     dec!(1000.00),
//!     AccountStatus::Verified,
//!     TargetDirectory::demo(),
//! )
//! .unwrap();
//!
//! let record = account.deposit(dec!(200.00)).unwrap();
//! assert_eq!(record.resulting_balance(), dec!(1200.00));
//! assert_eq!(account.balance(), dec!(1200.00));
//! ```

use crate::base::{AccountId, AccountType};
use crate::directory::TargetDirectory;
use crate::error::OperationError;
use crate::ledger::{HistoryOrder, Ledger};
use crate::status::{AccountStatus, Operation};
use crate::transaction::{TransactionKind, TransactionRecord};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable identity metadata for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub account_id: AccountId,
    pub owner_name: String,
    pub account_type: AccountType,
}

/// Full serializable account state, handed to the post-mutation hook and
/// used for caller-driven persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountState {
    pub balance: Decimal,
    pub status: AccountStatus,
    pub transactions: Vec<TransactionRecord>,
}

impl AccountState {
    fn capture(data: &AccountData) -> Self {
        Self {
            balance: data.balance,
            status: data.status,
            transactions: data.ledger.history(HistoryOrder::OldestFirst),
        }
    }
}

/// Ledger snapshot plus the summary shown alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    records: Vec<TransactionRecord>,
    balance: Decimal,
    status: AccountStatus,
}

impl Statement {
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }
}

/// Callback invoked with the full state after each successful mutation.
type StateHook = Box<dyn Fn(&AccountState) + Send + Sync>;

#[derive(Debug)]
struct AccountData {
    balance: Decimal,
    status: AccountStatus,
    ledger: Ledger,
    /// Open transfer session (phase 1 done, confirmation expected).
    transfer_pending: bool,
}

impl AccountData {
    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
        if let Some(latest) = self.ledger.latest() {
            debug_assert_eq!(
                self.balance,
                latest.resulting_balance(),
                "Invariant violated: balance diverged from latest ledger record"
            );
        }
    }

    fn authorize(&self, operation: Operation) -> Result<(), OperationError> {
        if self.status.allows(operation) {
            Ok(())
        } else {
            Err(OperationError::IllegalOperation {
                operation,
                status: self.status,
            })
        }
    }

    /// Credits the balance and appends the paired ledger record.
    fn deposit(&mut self, amount: Decimal) -> Result<TransactionRecord, OperationError> {
        self.authorize(Operation::Deposit)?;
        if amount <= Decimal::ZERO {
            return Err(OperationError::InvalidAmount);
        }
        self.balance += amount;
        let record = self
            .ledger
            .append(TransactionKind::Deposit, amount, self.balance)
            .clone();
        self.assert_invariants();
        Ok(record)
    }

    /// Debits the balance and appends the paired ledger record.
    fn withdraw(&mut self, amount: Decimal) -> Result<TransactionRecord, OperationError> {
        self.authorize(Operation::Withdraw)?;
        if amount <= Decimal::ZERO {
            return Err(OperationError::InvalidAmount);
        }
        if amount > self.balance {
            return Err(OperationError::InsufficientFunds);
        }
        self.balance -= amount;
        let record = self
            .ledger
            .append(TransactionKind::Withdrawal, amount, self.balance)
            .clone();
        self.assert_invariants();
        Ok(record)
    }

    /// Phase 1: opens the transfer session. No financial effect.
    fn begin_transfer(&mut self) -> Result<(), OperationError> {
        self.authorize(Operation::Transfer)?;
        self.transfer_pending = true;
        Ok(())
    }

    /// Phase 2: executes the transfer and closes the session.
    ///
    /// Legality is re-checked here because the status may have changed
    /// since phase 1.
    fn confirm_transfer(
        &mut self,
        directory: &TargetDirectory,
        target_id: AccountId,
        amount: Decimal,
    ) -> Result<TransactionRecord, OperationError> {
        self.authorize(Operation::Transfer)?;
        if !self.transfer_pending {
            return Err(OperationError::TransferNotStarted);
        }
        let target = directory
            .lookup(target_id)
            .ok_or(OperationError::UnknownTarget(target_id))?;
        if amount <= Decimal::ZERO {
            return Err(OperationError::InvalidAmount);
        }
        if amount > self.balance {
            return Err(OperationError::InsufficientFunds);
        }
        self.balance -= amount;
        let record = self
            .ledger
            .append(
                TransactionKind::TransferOut {
                    target_id: target.id,
                    target_name: target.name.clone(),
                },
                amount,
                self.balance,
            )
            .clone();
        self.transfer_pending = false;
        self.assert_invariants();
        Ok(record)
    }

    fn change_status(&mut self, new_status: AccountStatus) -> AccountStatus {
        let previous = self.status;
        self.status = new_status;
        // A session must not survive into a status where confirming it
        // would be illegal.
        if !new_status.allows(Operation::Transfer) {
            self.transfer_pending = false;
        }
        previous
    }
}

/// A single bank account with a status-gated operation set and an
/// append-only ledger.
///
/// All state lives behind one mutex: each balance mutation and its ledger
/// append form a single atomic step. Mutating methods take `&self`; an
/// embedder running concurrently must still serialize mutations on a given
/// account (single logical owner).
pub struct Account {
    profile: AccountProfile,
    directory: TargetDirectory,
    inner: Mutex<AccountData>,
    on_change: Option<StateHook>,
}

impl Account {
    /// Opens an account with the given opening balance and status.
    ///
    /// A positive opening balance seeds the ledger with an
    /// `InitialBalance` record; a zero opening balance leaves the ledger
    /// empty.
    ///
    /// # Errors
    ///
    /// [`OperationError::InvalidAmount`] if the opening balance is
    /// negative.
    pub fn open(
        profile: AccountProfile,
        opening_balance: Decimal,
        status: AccountStatus,
        directory: TargetDirectory,
    ) -> Result<Self, OperationError> {
        if opening_balance < Decimal::ZERO {
            return Err(OperationError::InvalidAmount);
        }
        let mut ledger = Ledger::new();
        if opening_balance > Decimal::ZERO {
            ledger.append(
                TransactionKind::InitialBalance,
                opening_balance,
                opening_balance,
            );
        }
        Ok(Self {
            profile,
            directory,
            inner: Mutex::new(AccountData {
                balance: opening_balance,
                status,
                ledger,
                transfer_pending: false,
            }),
            on_change: None,
        })
    }

    /// Rebuilds an account from a state snapshot previously produced by
    /// [`Account::state`]. Loading the snapshot from storage is the
    /// caller's job.
    pub fn restore(
        profile: AccountProfile,
        state: AccountState,
        directory: TargetDirectory,
    ) -> Self {
        let data = AccountData {
            balance: state.balance,
            status: state.status,
            ledger: Ledger::from_records(state.transactions),
            transfer_pending: false,
        };
        data.assert_invariants();
        Self {
            profile,
            directory,
            inner: Mutex::new(data),
            on_change: None,
        }
    }

    /// Registers a hook invoked with the full serializable state after
    /// every successful mutation (deposit, withdrawal, confirmed transfer,
    /// status change). Opening or cancelling a transfer session changes no
    /// persistent state and does not fire the hook.
    pub fn set_state_hook(&mut self, hook: impl Fn(&AccountState) + Send + Sync + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    pub fn profile(&self) -> &AccountProfile {
        &self.profile
    }

    pub fn directory(&self) -> &TargetDirectory {
        &self.directory
    }

    pub fn balance(&self) -> Decimal {
        self.inner.lock().balance
    }

    pub fn status(&self) -> AccountStatus {
        self.inner.lock().status
    }

    /// Whether a transfer session is open (phase 1 done, awaiting
    /// confirmation or cancellation).
    pub fn transfer_pending(&self) -> bool {
        self.inner.lock().transfer_pending
    }

    /// Credits `amount` to the balance.
    ///
    /// # Errors
    ///
    /// - [`OperationError::IllegalOperation`] - deposits are illegal for
    ///   Closed accounts.
    /// - [`OperationError::InvalidAmount`] - amount is zero or negative.
    pub fn deposit(&self, amount: Decimal) -> Result<TransactionRecord, OperationError> {
        self.mutate(|data| data.deposit(amount))
    }

    /// Debits `amount` from the balance.
    ///
    /// # Errors
    ///
    /// - [`OperationError::IllegalOperation`] - withdrawals are legal only
    ///   for Verified accounts.
    /// - [`OperationError::InvalidAmount`] - amount is zero or negative.
    /// - [`OperationError::InsufficientFunds`] - amount exceeds the
    ///   balance.
    pub fn withdraw(&self, amount: Decimal) -> Result<TransactionRecord, OperationError> {
        self.mutate(|data| data.withdraw(amount))
    }

    /// Opens a transfer session. Signals that target selection is expected
    /// next; nothing financial happens yet.
    ///
    /// # Errors
    ///
    /// [`OperationError::IllegalOperation`] - transfers are legal only for
    /// Verified accounts.
    pub fn begin_transfer(&self) -> Result<(), OperationError> {
        // No hook: the session flag is not persistent state.
        self.inner.lock().begin_transfer()
    }

    /// Confirms the open transfer session, moving `amount` to the
    /// directory account identified by `target_id`.
    ///
    /// Status legality is re-checked here: the status may have changed
    /// between [`Account::begin_transfer`] and this call.
    ///
    /// # Errors
    ///
    /// - [`OperationError::IllegalOperation`] - status no longer permits
    ///   transfers.
    /// - [`OperationError::TransferNotStarted`] - no session is open.
    /// - [`OperationError::UnknownTarget`] - `target_id` is not in the
    ///   directory.
    /// - [`OperationError::InvalidAmount`] - amount is zero or negative.
    /// - [`OperationError::InsufficientFunds`] - amount exceeds the
    ///   balance.
    pub fn confirm_transfer(
        &self,
        target_id: AccountId,
        amount: Decimal,
    ) -> Result<TransactionRecord, OperationError> {
        let directory = &self.directory;
        self.mutate(|data| data.confirm_transfer(directory, target_id, amount))
    }

    /// Abandons the transfer session. Always legal, idempotent, and free
    /// of side effects beyond closing the session.
    pub fn cancel_transfer(&self) {
        self.inner.lock().transfer_pending = false;
    }

    /// Sets the account status, returning the previous one. Any status is
    /// reachable from any other; no ledger record is created.
    ///
    /// An open transfer session is implicitly cancelled when the new
    /// status makes transfers illegal.
    pub fn change_status(&self, new_status: AccountStatus) -> AccountStatus {
        self.mutate(|data| Ok(data.change_status(new_status)))
            .expect("status changes cannot fail")
    }

    /// Ledger snapshot plus current balance and status. Always legal,
    /// pure read.
    pub fn statement(&self, order: HistoryOrder) -> Statement {
        let data = self.inner.lock();
        Statement {
            records: data.ledger.history(order),
            balance: data.balance,
            status: data.status,
        }
    }

    /// Full serializable state, in the same shape the post-mutation hook
    /// receives.
    pub fn state(&self) -> AccountState {
        AccountState::capture(&self.inner.lock())
    }

    /// Runs a mutation inside the lock, then fires the state hook with a
    /// snapshot taken before the lock was released.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut AccountData) -> Result<T, OperationError>,
    ) -> Result<T, OperationError> {
        let mut data = self.inner.lock();
        let value = f(&mut data)?;
        let state = self
            .on_change
            .as_ref()
            .map(|_| AccountState::capture(&data));
        drop(data);
        if let (Some(hook), Some(state)) = (self.on_change.as_ref(), state) {
            hook(&state);
        }
        Ok(value)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}
