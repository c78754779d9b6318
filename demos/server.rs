//! Simple REST API server example for the account dashboard.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `POST /operations` - Apply an operation (deposit, withdrawal, transfer phase, status change)
//! - `GET /account` - Account summary (balance, status, transfer session)
//! - `GET /account/statement` - Full statement, most recent first
//! - `GET /targets` - Transfer-target directory
//!
//! ## Example Usage
//!
//! ```bash
//! # Deposit
//! curl -X POST http://localhost:3000/operations \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "deposit", "amount": "200.00"}'
//!
//! # Two-phase transfer
//! curl -X POST http://localhost:3000/operations \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "transfer_begin"}'
//! curl -X POST http://localhost:3000/operations \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "transfer_confirm", "target_id": 789012, "amount": "300.00"}'
//!
//! # Suspend the account
//! curl -X POST http://localhost:3000/operations \
//!   -H "Content-Type: application/json" \
//!   -d '{"type": "status_change", "status": "Suspended"}'
//!
//! # Statement
//! curl http://localhost:3000/account/statement
//! ```
//!
//! Every successful mutation is persisted to `dashboard_state.json` via the
//! account's state hook; restart-and-restore is left to the reader.

use account_demo_rs::{
    Account, AccountId, AccountProfile, AccountStatus, AccountType, HistoryOrder, OperationError,
    TargetDirectory, TransactionKind, TransactionRecord, TransferTarget,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request/Response DTOs ===

/// Request body for applying operations.
///
/// Uses a tagged enum for clean JSON representation:
/// ```json
/// {"type": "deposit", "amount": "200.00"}
/// ```
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationRequest {
    Deposit { amount: Decimal },
    Withdrawal { amount: Decimal },
    TransferBegin,
    TransferConfirm { target_id: u32, amount: Decimal },
    TransferCancel,
    StatusChange { status: AccountStatus },
}

/// Response body for a successful operation.
#[derive(Debug, Serialize)]
pub struct OperationResponse {
    pub message: String,
    pub balance: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<TransactionRecord>,
}

/// Response body for the account summary.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub account_id: AccountId,
    pub owner_name: String,
    pub account_type: AccountType,
    pub balance: Decimal,
    pub status: AccountStatus,
    pub transfer_pending: bool,
}

/// Response body for the statement view.
#[derive(Debug, Serialize)]
pub struct StatementResponse {
    pub total_transactions: usize,
    pub balance: Decimal,
    pub status: AccountStatus,
    pub records: Vec<TransactionRecord>,
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the account core.
#[derive(Clone)]
pub struct AppState {
    pub account: Arc<Account>,
}

// === Error Handling ===

/// Wrapper for converting `OperationError` into HTTP responses.
pub struct AppError(OperationError);

impl From<OperationError> for AppError {
    fn from(err: OperationError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            OperationError::IllegalOperation { .. } => (StatusCode::FORBIDDEN, "ILLEGAL_OPERATION"),
            OperationError::InvalidAmount => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            OperationError::InsufficientFunds => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_FUNDS")
            }
            OperationError::UnknownTarget(_) => (StatusCode::NOT_FOUND, "UNKNOWN_TARGET"),
            OperationError::TransferNotStarted => (StatusCode::CONFLICT, "TRANSFER_NOT_STARTED"),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// POST /operations - Apply an operation to the account.
async fn apply_operation(
    State(state): State<AppState>,
    Json(request): Json<OperationRequest>,
) -> Result<Json<OperationResponse>, AppError> {
    let account = &state.account;

    let response = match request {
        OperationRequest::Deposit { amount } => {
            let record = account.deposit(amount)?;
            OperationResponse {
                message: format!("Deposit of ${} successful", record.amount()),
                balance: record.resulting_balance(),
                record: Some(record),
            }
        }
        OperationRequest::Withdrawal { amount } => {
            let record = account.withdraw(amount)?;
            OperationResponse {
                message: format!("Withdrawal of ${} successful", record.amount()),
                balance: record.resulting_balance(),
                record: Some(record),
            }
        }
        OperationRequest::TransferBegin => {
            account.begin_transfer()?;
            OperationResponse {
                message: "Please select a target account for the transfer".to_string(),
                balance: account.balance(),
                record: None,
            }
        }
        OperationRequest::TransferConfirm { target_id, amount } => {
            let record = account.confirm_transfer(AccountId(target_id), amount)?;
            let message = match record.kind() {
                TransactionKind::TransferOut {
                    target_id,
                    target_name,
                } => format!(
                    "Transfer of ${} to {} ({}) completed",
                    record.amount(),
                    target_name,
                    target_id
                ),
                _ => format!("Transfer of ${} completed", record.amount()),
            };
            OperationResponse {
                message,
                balance: record.resulting_balance(),
                record: Some(record),
            }
        }
        OperationRequest::TransferCancel => {
            account.cancel_transfer();
            OperationResponse {
                message: "Transfer cancelled".to_string(),
                balance: account.balance(),
                record: None,
            }
        }
        OperationRequest::StatusChange { status } => {
            account.change_status(status);
            OperationResponse {
                message: format!("Account status changed to {}", status),
                balance: account.balance(),
                record: None,
            }
        }
    };

    Ok(Json(response))
}

/// GET /account - Account summary.
async fn get_account(State(state): State<AppState>) -> Json<AccountResponse> {
    let account = &state.account;
    let profile = account.profile();
    Json(AccountResponse {
        account_id: profile.account_id,
        owner_name: profile.owner_name.clone(),
        account_type: profile.account_type,
        balance: account.balance(),
        status: account.status(),
        transfer_pending: account.transfer_pending(),
    })
}

/// GET /account/statement - Full statement, most recent first.
async fn get_statement(State(state): State<AppState>) -> Json<StatementResponse> {
    let statement = state.account.statement(HistoryOrder::NewestFirst);
    Json(StatementResponse {
        total_transactions: statement.record_count(),
        balance: statement.balance(),
        status: statement.status(),
        records: statement.records().to_vec(),
    })
}

/// GET /targets - Transfer-target directory.
async fn list_targets(State(state): State<AppState>) -> Json<Vec<TransferTarget>> {
    let mut targets: Vec<TransferTarget> = state.account.directory().iter().cloned().collect();
    targets.sort_by_key(|t| t.id.0);
    Json(targets)
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/operations", post(apply_operation))
        .route("/account", get(get_account))
        .route("/account/statement", get(get_statement))
        .route("/targets", get(list_targets))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    let mut account = Account::open(
        AccountProfile {
            account_id: AccountId(123456),
            owner_name: "Mariam Riyad".to_string(),
            account_type: AccountType::Savings,
        },
        rust_decimal_macros::dec!(1000.00),
        AccountStatus::Verified,
        TargetDirectory::demo(),
    )
    .expect("demo opening balance is valid");

    // Persist the full state after every successful mutation.
    account.set_state_hook(|state| {
        match serde_json::to_string_pretty(state) {
            Ok(json) => {
                if let Err(e) = std::fs::write("dashboard_state.json", json) {
                    eprintln!("Failed to persist state: {}", e);
                }
            }
            Err(e) => eprintln!("Failed to serialize state: {}", e),
        }
    });

    let state = AppState {
        account: Arc::new(account),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Account dashboard API running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  POST /operations         - Apply an operation");
    println!("  GET  /account            - Account summary");
    println!("  GET  /account/statement  - Statement, most recent first");
    println!("  GET  /targets            - Transfer-target directory");

    axum::serve(listener, app).await.unwrap();
}
