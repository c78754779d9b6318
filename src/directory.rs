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

//! Read-only directory of transfer-target accounts.
//!
//! The directory is an immutable lookup service: the account consults it
//! when confirming a transfer and treats an unknown ID as a validation
//! failure, never a crash.

use crate::base::{AccountId, AccountType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An account a transfer can be sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTarget {
    pub id: AccountId,
    pub name: String,
    pub account_type: AccountType,
}

/// Immutable collection of transfer targets, indexed by account ID.
#[derive(Debug, Clone, Default)]
pub struct TargetDirectory {
    targets: HashMap<AccountId, TransferTarget>,
}

impl TargetDirectory {
    pub fn new(targets: impl IntoIterator<Item = TransferTarget>) -> Self {
        Self {
            targets: targets.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    /// The fixed three-entry directory shipped with the demo dashboard.
    pub fn demo() -> Self {
        Self::new([
            TransferTarget {
                id: AccountId(789012),
                name: "Ahmed Hassan".to_string(),
                account_type: AccountType::Checking,
            },
            TransferTarget {
                id: AccountId(345678),
                name: "Sara Ahmed".to_string(),
                account_type: AccountType::Savings,
            },
            TransferTarget {
                id: AccountId(901234),
                name: "Omar Ali".to_string(),
                account_type: AccountType::Checking,
            },
        ])
    }

    pub fn lookup(&self, id: AccountId) -> Option<&TransferTarget> {
        self.targets.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransferTarget> {
        self.targets.values()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
