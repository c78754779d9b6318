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

//! Account status and the operation legality matrix.
//!
//! The matrix is the single source of truth for what an account may do:
//!
//! | Operation      | Verified | Suspended | Closed |
//! |----------------|----------|-----------|--------|
//! | Deposit        | allowed  | allowed   | illegal|
//! | Withdraw       | allowed  | illegal   | illegal|
//! | Transfer       | allowed  | illegal   | illegal|
//! | View statement | allowed  | allowed   | allowed|
//! | Change status  | allowed  | allowed   | allowed|
//!
//! Status transitions themselves are unrestricted: any status may change to
//! any other status at any time, only via an explicit status-change request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle flag gating which operations are legal on an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Verified,
    Suspended,
    Closed,
}

/// Operations an account can be asked to perform, as used by the
/// legality matrix and by error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deposit,
    Withdraw,
    Transfer,
    ViewStatement,
    ChangeStatus,
}

impl AccountStatus {
    /// Looks up the legality matrix for one `(status, operation)` cell.
    pub fn allows(self, operation: Operation) -> bool {
        use AccountStatus::*;
        use Operation::*;
        match (self, operation) {
            (Verified, Deposit) => true,
            (Verified, Withdraw) => true,
            (Verified, Transfer) => true,
            (Suspended, Deposit) => true,
            (Suspended, Withdraw) => false,
            (Suspended, Transfer) => false,
            (Closed, Deposit) => false,
            (Closed, Withdraw) => false,
            (Closed, Transfer) => false,
            (_, ViewStatement) => true,
            (_, ChangeStatus) => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Verified => "Verified",
            AccountStatus::Suspended => "Suspended",
            AccountStatus::Closed => "Closed",
        }
    }

    /// Parses a status name, case-insensitively.
    ///
    /// Returns `None` for anything outside the three valid values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "verified" => Some(AccountStatus::Verified),
            "suspended" => Some(AccountStatus::Suspended),
            "closed" => Some(AccountStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deposit => "deposit",
            Operation::Withdraw => "withdrawal",
            Operation::Transfer => "transfer",
            Operation::ViewStatement => "view statement",
            Operation::ChangeStatus => "change status",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
