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

//! # Account Demo
//!
//! This library models a single bank account's state machine and its
//! append-only transaction ledger: deposits, withdrawals, two-phase
//! transfers, and status changes, all gated by a status legality matrix.
//!
//! ## Core Components
//!
//! - [`Account`]: the account core (balance, status, transfer session,
//!   and the operations that mutate them)
//! - [`Ledger`]: append-only, ordered history of balance-affecting events
//! - [`AccountStatus`]: lifecycle flag with the operation legality matrix
//! - [`TargetDirectory`]: read-only lookup of transfer targets
//! - [`OperationError`]: typed, recoverable failure reasons
//!
//! ## Example
//!
//! ```
//! use account_demo_rs::{
//!     Account, AccountId, AccountProfile, AccountStatus, AccountType, TargetDirectory,
//! };
//! use rust_decimal_macros::dec;
//!
//! let account = Account::open(
//!     AccountProfile {
//!         account_id: AccountId(123456),
//!         owner_name: "Mariam Riyad".to_string(),
//!         account_type: AccountType::Savings,
//!     },
//!     dec!(1000.00),
//!     AccountStatus::Verified,
//!     TargetDirectory::demo(),
//! )
//! .unwrap();
//!
//! // Deposit, then send a transfer to a directory account.
//! account.deposit(dec!(200.00)).unwrap();
//! account.begin_transfer().unwrap();
//! let record = account
//!     .confirm_transfer(AccountId(789012), dec!(300.00))
//!     .unwrap();
//!
//! assert_eq!(record.resulting_balance(), dec!(900.00));
//! assert_eq!(account.balance(), dec!(900.00));
//! ```
//!
//! ## Consistency
//!
//! Balance and ledger are mutated together inside one critical section:
//! after every operation the balance equals the `resulting_balance` of the
//! most recent ledger record (or the opening balance while the ledger is
//! empty). Failed operations never touch either.

pub mod account;
mod base;
pub mod directory;
pub mod error;
mod ledger;
mod status;
mod transaction;

pub use account::{Account, AccountProfile, AccountState, Statement};
pub use base::{AccountId, AccountType, SequenceNumber};
pub use directory::{TargetDirectory, TransferTarget};
pub use error::OperationError;
pub use ledger::{Clock, HistoryOrder, Ledger};
pub use status::{AccountStatus, Operation};
pub use transaction::{TransactionKind, TransactionRecord};
