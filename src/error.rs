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

//! Error types for account operations.
//!
//! Every variant is a recoverable, user-facing rejection. Operations
//! validate in a fixed order (legality, then amount shape, then
//! sufficiency/target) and stop at the first failure without touching
//! balance or ledger.

use crate::base::AccountId;
use crate::status::{AccountStatus, Operation};
use thiserror::Error;

/// Account operation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The current account status forbids this operation
    #[error("{operation} is illegal for {status} accounts")]
    IllegalOperation {
        operation: Operation,
        status: AccountStatus,
    },

    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Debit would exceed the current balance
    #[error("insufficient balance")]
    InsufficientFunds,

    /// Transfer target ID not present in the directory
    #[error("unknown transfer target {0}")]
    UnknownTarget(AccountId),

    /// Transfer confirmed without an open transfer session
    #[error("no transfer in progress")]
    TransferNotStarted,
}
