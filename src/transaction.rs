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

//! Ledger record types.
//!
//! A [`TransactionRecord`] is immutable once created: the ledger assigns its
//! sequence number and timestamp at append time and nothing rewrites it
//! afterwards. The record stores the positive magnitude of the movement;
//! direction (credit or debit) is derived from [`TransactionKind`], never
//! stored as a sign on the record itself.

use crate::base::{AccountId, SequenceNumber};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Balance-affecting event categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionKind {
    /// Opening balance seeded when the account is created.
    InitialBalance,
    Deposit,
    Withdrawal,
    /// Outgoing transfer to a directory account.
    TransferOut {
        target_id: AccountId,
        target_name: String,
    },
}

impl TransactionKind {
    /// Whether this kind increases the balance.
    pub fn is_credit(&self) -> bool {
        match self {
            TransactionKind::InitialBalance | TransactionKind::Deposit => true,
            TransactionKind::Withdrawal | TransactionKind::TransferOut { .. } => false,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::InitialBalance => write!(f, "Initial Balance"),
            TransactionKind::Deposit => write!(f, "Deposit"),
            TransactionKind::Withdrawal => write!(f, "Withdrawal"),
            TransactionKind::TransferOut { target_name, .. } => {
                write!(f, "Transfer to {}", target_name)
            }
        }
    }
}

/// One entry in the account ledger.
///
/// Created only by [`Ledger::append`](crate::Ledger::append) during a
/// successful mutating operation; never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    sequence: SequenceNumber,
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    kind: TransactionKind,
    amount: Decimal,
    resulting_balance: Decimal,
}

impl TransactionRecord {
    pub(crate) fn new(
        sequence: SequenceNumber,
        timestamp: DateTime<Utc>,
        kind: TransactionKind,
        amount: Decimal,
        resulting_balance: Decimal,
    ) -> Self {
        Self {
            sequence,
            timestamp,
            kind,
            amount,
            resulting_balance,
        }
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    /// Positive magnitude of the movement.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Account balance immediately after this record was applied.
    pub fn resulting_balance(&self) -> Decimal {
        self.resulting_balance
    }

    /// Amount with the direction applied: positive for credits,
    /// negative for debits. Display-layer convenience.
    pub fn signed_amount(&self) -> Decimal {
        if self.kind.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.kind.is_credit() { "+" } else { "-" };
        write!(
            f,
            "#{} {} {}{} (balance {})",
            self.sequence, self.kind, sign, self.amount, self.resulting_balance
        )
    }
}
