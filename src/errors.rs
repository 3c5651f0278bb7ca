//! Unified error type for the rent ledger.
//!
//! Validation failures are raised before any store call. Store failures are
//! wrapped verbatim from `SeaORM` and are never retried.

use crate::entities::TenantStatus;
use thiserror::Error;

/// Every failure the back office can report to its caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment could not be used
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A required field is missing or out of its declared range
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
    },

    /// A money amount that is negative, zero where not allowed, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// No tenant with this id
    #[error("Tenant not found: {id}")]
    TenantNotFound {
        /// Tenant id
        id: i64,
    },

    /// No room with this number or id
    #[error("Room not found: {room}")]
    RoomNotFound {
        /// Room number or id as text
        room: String,
    },

    /// No bill with this id
    #[error("Bill not found: {id}")]
    BillNotFound {
        /// Bill id
        id: i64,
    },

    /// No payment with this id
    #[error("Payment not found: {id}")]
    PaymentNotFound {
        /// Payment id
        id: i64,
    },

    /// No expense with this id
    #[error("Expense not found: {id}")]
    ExpenseNotFound {
        /// Expense id
        id: i64,
    },

    /// No electricity reading with this id
    #[error("Electricity reading not found: {id}")]
    ReadingNotFound {
        /// Reading id
        id: i64,
    },

    /// The room already holds as many active tenants as its capacity
    #[error("Room {room_number} is full (capacity {capacity})")]
    RoomFull {
        /// Room number
        room_number: String,
        /// Room capacity
        capacity: i32,
    },

    /// Bills can only be generated for tenants in an active-like status
    #[error("Tenant {tenant_id} cannot be billed while {status}")]
    TenantNotBillable {
        /// Tenant id
        tenant_id: i64,
        /// Current tenant status
        status: TenantStatus,
    },

    /// A bill already exists for this tenant and billing period
    #[error("Tenant {tenant_id} already has a bill for {billing_period}")]
    DuplicateBill {
        /// Tenant id
        tenant_id: i64,
        /// Billing period (`YYYY-MM`)
        billing_period: String,
    },

    /// The meter went backwards
    #[error("Meter reading {current} is below previous reading {previous}")]
    MeterRegression {
        /// Previous reading
        previous: i64,
        /// Submitted reading
        current: i64,
    },

    /// Payments still reference the bill
    #[error("Bill {bill_id} still has {count} payment(s) recorded against it")]
    BillHasPayments {
        /// Bill id
        bill_id: i64,
        /// Number of payments referencing it
        count: u64,
    },

    /// Store failure, reported with the store's own message
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
