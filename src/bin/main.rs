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

use account_demo_rs::{
    Account, AccountId, AccountProfile, AccountStatus, AccountType, HistoryOrder, TargetDirectory,
};
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;

/// Account Demo - Process account operation CSV files
///
/// Replays operations against a single account and writes the resulting
/// statement to stdout, most recent first.
#[derive(Parser, Debug)]
#[command(name = "account-demo-rs")]
#[command(about = "Replays account operations from a CSV and prints the statement", long_about = None)]
struct Args {
    /// Path to CSV file with operations
    ///
    /// Expected format: op,amount,target,status
    /// Example: cargo run -- operations.csv > statement.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Opening balance for the account
    #[arg(long, default_value = "1000")]
    opening_balance: Decimal,

    /// Opening status (verified, suspended, or closed)
    #[arg(long, default_value = "verified", value_parser = parse_status)]
    status: AccountStatus,
}

fn parse_status(s: &str) -> Result<AccountStatus, String> {
    AccountStatus::parse(s).ok_or_else(|| format!("invalid status '{}'", s))
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Open input file
    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let account = match Account::open(
        demo_profile(),
        args.opening_balance,
        args.status,
        TargetDirectory::demo(),
    ) {
        Ok(account) => account,
        Err(e) => {
            eprintln!("Error opening account: {}", e);
            process::exit(1);
        }
    };

    // Replay operations from CSV
    if let Err(e) = process_operations(BufReader::new(file), &account) {
        eprintln!("Error processing operations: {}", e);
        process::exit(1);
    }

    // Write the statement to stdout
    if let Err(e) = write_statement(&account, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// The fixed demo account identity the dashboard operates on.
fn demo_profile() -> AccountProfile {
    AccountProfile {
        account_id: AccountId(123456),
        owner_name: "Mariam Riyad".to_string(),
        account_type: AccountType::Savings,
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `op, amount, target, status`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    target: Option<u32>,
    #[serde(default)]
    status: Option<String>,
}

/// One parsed account operation.
#[derive(Debug)]
enum Command {
    Deposit(Decimal),
    Withdraw(Decimal),
    Transfer { target: AccountId, amount: Decimal },
    Status(AccountStatus),
}

impl CsvRecord {
    /// Converts a CSV record to a command.
    ///
    /// Returns `None` for unknown operations or missing required fields.
    fn into_command(self) -> Option<Command> {
        match self.op.to_lowercase().as_str() {
            "deposit" => Some(Command::Deposit(self.amount?)),
            "withdraw" | "withdrawal" => Some(Command::Withdraw(self.amount?)),
            "transfer" => Some(Command::Transfer {
                target: AccountId(self.target?),
                amount: self.amount?,
            }),
            "status" => Some(Command::Status(AccountStatus::parse(&self.status?)?)),
            _ => None,
        }
    }
}

/// Replays operations from a CSV reader against the account.
///
/// Malformed rows and rejected operations are skipped: the statement that
/// comes out reflects exactly the operations the account accepted.
///
/// # CSV Format
///
/// Expected columns: `op, amount, target, status`
/// - `op`: Operation (deposit, withdraw, transfer, status)
/// - `amount`: Decimal amount (deposit/withdraw/transfer)
/// - `target`: Transfer target account ID (transfer only)
/// - `status`: New status name (status only)
///
/// # Example
///
/// ```csv
/// op,amount,target,status
/// deposit,200,,
/// transfer,300,789012,
/// status,,,Suspended
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is
/// invalid. Individual operation rejections don't stop processing.
fn process_operations<R: Read>(reader: R, account: &Account) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All) // Handle whitespace in fields like " deposit "
        .flexible(true) // Allow missing trailing fields
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let Some(command) = record.into_command() else {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping invalid operation record");
                    continue;
                };

                // Apply the command, ignoring rejections (silent failure)
                let outcome = match command {
                    Command::Deposit(amount) => account.deposit(amount).map(|_| ()),
                    Command::Withdraw(amount) => account.withdraw(amount).map(|_| ()),
                    Command::Transfer { target, amount } => account
                        .begin_transfer()
                        .and_then(|_| account.confirm_transfer(target, amount))
                        .map(|_| ()),
                    Command::Status(status) => {
                        account.change_status(status);
                        Ok(())
                    }
                };
                if let Err(_e) = outcome {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping rejected operation: {}", _e);
                }
            }
            Err(_e) => {
                // Skip malformed rows
                #[cfg(debug_assertions)]
                eprintln!("Skipping malformed row: {}", _e);
                continue;
            }
        }
    }

    Ok(())
}

/// Flat statement row for CSV output.
///
/// The amount carries the direction as its sign; the record itself only
/// stores the positive magnitude.
#[derive(Debug, Serialize)]
struct StatementRow {
    sequence: u32,
    date: String,
    #[serde(rename = "type")]
    kind: String,
    amount: Decimal,
    balance: Decimal,
}

/// Writes the account statement to a CSV writer, most recent first.
///
/// # CSV Format
///
/// Columns: `sequence, date, type, amount, balance`
///
/// # Example
///
/// ```csv
/// sequence,date,type,amount,balance
/// 2,"Jan 15, 2024 10:30",Deposit,200.00,1200.00
/// 1,"Jan 15, 2024 10:30",Initial Balance,1000.00,1000.00
/// ```
///
/// # Errors
///
/// Returns a CSV error if writing fails.
fn write_statement<W: Write>(account: &Account, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    let statement = account.statement(HistoryOrder::NewestFirst);
    for record in statement.records() {
        wtr.serialize(StatementRow {
            sequence: record.sequence().0,
            date: record.timestamp().format("%b %d, %Y %H:%M").to_string(),
            kind: record.kind().to_string(),
            amount: record.signed_amount(),
            balance: record.resulting_balance(),
        })?;
    }

    // Flush to ensure all data is written
    wtr.flush()?;
    Ok(())
}
