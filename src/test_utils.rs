//! Shared test utilities for the rent ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults.

use crate::{
    config::Settings,
    core::{
        billing::BillingPeriod,
        invoice::{self, NewBill},
        room, tenant,
    },
    entities::{ExpenseCategory, PaymentMethod, RoomStatus, RoomType, TenantStatus},
    errors::Result,
    models::{self, BillUpdate, NewExpense, NewPayment, NewReading, NewRoom, NewTenant},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date. Panics on an invalid date.
#[allow(clippy::unwrap_used)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Room input with the type's default capacity and a rent of 8000.
pub fn new_room(room_number: &str, room_type: RoomType) -> NewRoom {
    NewRoom {
        room_number: room_number.to_string(),
        floor: None,
        room_type,
        capacity: None,
        rent_amount: 8000.0,
        status: RoomStatus::Vacant,
    }
}

/// Creates a room with custom type and capacity.
pub async fn create_custom_room(
    db: &DatabaseConnection,
    room_number: &str,
    room_type: RoomType,
    capacity: Option<i32>,
) -> Result<models::Room> {
    let mut input = new_room(room_number, room_type);
    input.capacity = capacity;
    room::create_room(db, input).await
}

/// Test database with a single double room "101".
pub async fn setup_with_room() -> Result<(DatabaseConnection, models::Room)> {
    let db = setup_test_db().await?;
    let room = create_custom_room(&db, "101", RoomType::Double, None).await?;
    Ok((db, room))
}

/// Tenant input with sensible defaults.
///
/// # Defaults
/// * `monthly_rent`: 8000.0
/// * `security_deposit`: 16000.0
/// * `electricity_joining_reading`: 1000
/// * `join_date`: 2024-02-01
/// * `status`: active
pub fn new_tenant(name: &str, room_number: &str) -> NewTenant {
    NewTenant {
        name: name.to_string(),
        mobile: "98765 43210".to_string(),
        room_number: room_number.to_string(),
        join_date: date(2024, 2, 1),
        monthly_rent: 8000.0,
        security_deposit: 16000.0,
        electricity_joining_reading: 1000,
        status: TenantStatus::Active,
    }
}

/// Creates a tenant with defaults from [`new_tenant`].
pub async fn create_test_tenant(
    db: &DatabaseConnection,
    name: &str,
    room_number: &str,
) -> Result<models::Tenant> {
    tenant::create_tenant(db, new_tenant(name, room_number)).await
}

/// Test database with room "101", default settings and one active tenant.
pub async fn setup_with_tenant() -> Result<(DatabaseConnection, Settings, models::Tenant)> {
    let (db, room) = setup_with_room().await?;
    let tenant = create_test_tenant(&db, "Asha", &room.room_number).await?;
    Ok((db, Settings::default(), tenant))
}

/// Generates a bill dated the first day of `period` with no adjustment.
pub async fn generate_test_bill(
    db: &DatabaseConnection,
    settings: &Settings,
    tenant_id: i64,
    period: &str,
    reading: i64,
) -> Result<models::Bill> {
    let billing_period: BillingPeriod = period.parse()?;
    invoice::generate_bill(
        db,
        &settings.billing,
        tenant_id,
        NewBill {
            billing_period,
            electricity_reading: reading,
            adjustments: 0.0,
            bill_date: billing_period.first_day(),
        },
    )
    .await
}

/// Generates a March 2024 bill and forces its total to `total`.
pub async fn create_bill_with_total(
    db: &DatabaseConnection,
    settings: &Settings,
    tenant_id: i64,
    total: f64,
) -> Result<models::Bill> {
    let bill = generate_test_bill(db, settings, tenant_id, "2024-03", 1100).await?;
    invoice::override_bill(
        db,
        bill.id,
        BillUpdate {
            total_amount: Some(total),
            ..Default::default()
        },
    )
    .await
}

/// Cash payment dated 2024-03-05.
pub fn new_payment(amount: f64) -> NewPayment {
    NewPayment {
        amount,
        payment_date: date(2024, 3, 5),
        payment_method: PaymentMethod::Cash,
        notes: None,
    }
}

/// Expense paid in cash.
pub fn new_expense(category: ExpenseCategory, amount: f64, expense_date: NaiveDate) -> NewExpense {
    NewExpense {
        expense_date,
        category,
        description: format!("{} bill", category.label()),
        amount,
        payment_method: PaymentMethod::Cash,
        receipt_ref: None,
    }
}

/// Meter reading at 12.0 per unit.
pub fn new_reading(
    room_number: &str,
    previous_reading: i64,
    current_reading: i64,
    reading_date: NaiveDate,
) -> NewReading {
    NewReading {
        room_number: room_number.to_string(),
        reading_date,
        previous_reading,
        current_reading,
        rate_per_unit: 12.0,
        is_paid: false,
    }
}
