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

//! Append-only transaction history.
//!
//! The ledger is the audit trail: records are created by [`Ledger::append`],
//! never edited, never deleted. No business validation happens here; the
//! account decides what may be appended, the ledger only stores it.

use crate::base::SequenceNumber;
use crate::transaction::{TransactionKind, TransactionRecord};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Timestamp source for appended records. Injectable for tests.
pub type Clock = fn() -> DateTime<Utc>;

/// Read order for history snapshots.
///
/// `NewestFirst` is keyed by descending sequence number, so the order is
/// deterministic: sequence numbers are unique and ties cannot occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOrder {
    OldestFirst,
    NewestFirst,
}

/// Ordered, immutable history of balance-affecting events for one account.
#[derive(Debug, Clone)]
pub struct Ledger {
    records: Vec<TransactionRecord>,
    clock: Clock,
}

impl Ledger {
    /// Creates an empty ledger stamping records with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Creates an empty ledger with an explicit timestamp source.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            records: Vec::new(),
            clock,
        }
    }

    /// Rebuilds a ledger from a previously captured snapshot.
    ///
    /// The caller is responsible for passing records in the shape produced
    /// by [`Ledger::history`] with [`HistoryOrder::OldestFirst`]; appends
    /// continue from the highest sequence number present.
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        debug_assert!(
            records.windows(2).all(|w| w[0].sequence() < w[1].sequence()),
            "ledger snapshot out of sequence order"
        );
        Self {
            records,
            clock: Utc::now,
        }
    }

    /// Appends a record, assigning the next sequence number and stamping
    /// the current time. Always succeeds.
    pub fn append(
        &mut self,
        kind: TransactionKind,
        amount: Decimal,
        resulting_balance: Decimal,
    ) -> &TransactionRecord {
        let sequence = SequenceNumber(self.next_sequence());
        let record =
            TransactionRecord::new(sequence, (self.clock)(), kind, amount, resulting_balance);
        self.records.push(record);
        self.records.last().expect("record was just pushed")
    }

    /// Read-only snapshot of the history in the requested order.
    pub fn history(&self, order: HistoryOrder) -> Vec<TransactionRecord> {
        let mut records = self.records.clone();
        if order == HistoryOrder::NewestFirst {
            records.sort_by(|a, b| b.sequence().cmp(&a.sequence()));
        }
        records
    }

    /// The most recently appended record, if any.
    pub fn latest(&self) -> Option<&TransactionRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn next_sequence(&self) -> u32 {
        self.records.last().map_or(0, |r| r.sequence().0) + 1
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
