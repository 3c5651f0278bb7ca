//! Application-facing models and their translation to and from store rows.
//!
//! Store rows ([`crate::entities`]) use snake_case column names. The models
//! here are what the rest of the crate works with; their serialized form is
//! camelCase. Every field is mapped by hand in both directions.
//!
//! `*Update` structs are patches: only `Some` fields are written, so a column
//! that is absent from the patch is never sent to the store. Nullable columns
//! use `Option<Option<T>>`, where `Some(None)` clears the column.

// Field docs live on the matching entity columns.
#![allow(missing_docs)]

use crate::entities::{
    BillStatus, ExpenseCategory, PaymentMethod, PaymentStatus, RoomStatus, RoomType, TenantStatus,
    bill, electricity_reading, expense, payment, room, tenant,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ActiveValue, NotSet, Set};
use serde::{Deserialize, Serialize};

/// Writes `value` into `slot` when present, leaving the column untouched otherwise.
fn patch<V>(slot: &mut ActiveValue<V>, value: Option<V>)
where
    V: Into<sea_orm::Value>,
{
    if let Some(value) = value {
        *slot = Set(value);
    }
}

// ---------------------------------------------------------------------------
// Tenant
// ---------------------------------------------------------------------------

/// A tenant as the back office sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub room_number: String,
    pub join_date: NaiveDate,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub electricity_joining_reading: i64,
    pub last_electricity_reading: Option<i64>,
    pub status: TenantStatus,
    pub departure_date: Option<NaiveDate>,
    pub notice_given: bool,
    pub notice_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Tenant {
    /// Meter value the next bill is measured from: the last recorded reading,
    /// or the joining reading when nothing has been recorded since.
    #[must_use]
    pub fn previous_reading(&self) -> i64 {
        self.last_electricity_reading
            .unwrap_or(self.electricity_joining_reading)
    }
}

impl From<tenant::Model> for Tenant {
    fn from(row: tenant::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            mobile: row.mobile,
            room_number: row.room_number,
            join_date: row.join_date,
            monthly_rent: row.monthly_rent,
            security_deposit: row.security_deposit,
            electricity_joining_reading: row.electricity_joining_reading,
            last_electricity_reading: row.last_electricity_reading,
            status: row.status,
            departure_date: row.departure_date,
            notice_given: row.notice_given,
            notice_date: row.notice_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Fields supplied when a tenant moves in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    pub name: String,
    pub mobile: String,
    pub room_number: String,
    pub join_date: NaiveDate,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    pub electricity_joining_reading: i64,
    pub status: TenantStatus,
}

impl NewTenant {
    pub(crate) fn into_active_model(self, now: NaiveDateTime) -> tenant::ActiveModel {
        tenant::ActiveModel {
            id: NotSet,
            name: Set(self.name.trim().to_string()),
            mobile: Set(self.mobile.trim().to_string()),
            room_number: Set(self.room_number.trim().to_string()),
            join_date: Set(self.join_date),
            monthly_rent: Set(self.monthly_rent),
            security_deposit: Set(self.security_deposit),
            electricity_joining_reading: Set(self.electricity_joining_reading),
            last_electricity_reading: Set(None),
            status: Set(self.status),
            departure_date: Set(None),
            notice_given: Set(false),
            notice_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

/// Partial tenant update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUpdate {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub room_number: Option<String>,
    pub monthly_rent: Option<f64>,
    pub security_deposit: Option<f64>,
    pub last_electricity_reading: Option<i64>,
    pub status: Option<TenantStatus>,
    pub departure_date: Option<Option<NaiveDate>>,
    pub notice_given: Option<bool>,
    pub notice_date: Option<Option<NaiveDate>>,
}

impl TenantUpdate {
    pub(crate) fn apply(self, row: &mut tenant::ActiveModel, now: NaiveDateTime) {
        patch(&mut row.name, self.name.map(|n| n.trim().to_string()));
        patch(&mut row.mobile, self.mobile.map(|m| m.trim().to_string()));
        patch(
            &mut row.room_number,
            self.room_number.map(|r| r.trim().to_string()),
        );
        patch(&mut row.monthly_rent, self.monthly_rent);
        patch(&mut row.security_deposit, self.security_deposit);
        patch(
            &mut row.last_electricity_reading,
            self.last_electricity_reading.map(Some),
        );
        patch(&mut row.status, self.status);
        patch(&mut row.departure_date, self.departure_date);
        patch(&mut row.notice_given, self.notice_given);
        patch(&mut row.notice_date, self.notice_date);
        row.updated_at = Set(now);
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A lettable room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub room_number: String,
    pub floor: Option<i32>,
    pub room_type: RoomType,
    pub capacity: i32,
    pub rent_amount: f64,
    pub status: RoomStatus,
    pub tenant_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl Room {
    /// Stored floor, or the floor implied by the room number.
    #[must_use]
    pub fn floor_number(&self) -> Option<i32> {
        self.floor.or_else(|| floor_from_room_number(&self.room_number))
    }
}

/// Derives the floor from a room number's leading character.
///
/// `"G3"` is the ground floor (0), `"204"` is floor 2.
#[must_use]
pub fn floor_from_room_number(room_number: &str) -> Option<i32> {
    let first = room_number.trim().chars().next()?;
    if first.eq_ignore_ascii_case(&'g') {
        return Some(0);
    }
    first.to_digit(10).and_then(|d| i32::try_from(d).ok())
}

impl From<room::Model> for Room {
    fn from(row: room::Model) -> Self {
        Self {
            id: row.id,
            room_number: row.room_number,
            floor: row.floor,
            room_type: row.room_type,
            capacity: row.capacity,
            rent_amount: row.rent_amount,
            status: row.status,
            tenant_id: row.tenant_id,
            created_at: row.created_at,
        }
    }
}

/// Fields supplied when a room is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub room_number: String,
    #[serde(default)]
    pub floor: Option<i32>,
    pub room_type: RoomType,
    /// Defaults to the room type's bed count
    #[serde(default)]
    pub capacity: Option<i32>,
    pub rent_amount: f64,
    #[serde(default = "default_room_status")]
    pub status: RoomStatus,
}

const fn default_room_status() -> RoomStatus {
    RoomStatus::Vacant
}

impl NewRoom {
    /// Capacity that will be stored.
    #[must_use]
    pub fn effective_capacity(&self) -> i32 {
        self.capacity
            .unwrap_or_else(|| self.room_type.default_capacity())
    }

    pub(crate) fn into_active_model(self, now: NaiveDateTime) -> room::ActiveModel {
        let capacity = self.effective_capacity();
        room::ActiveModel {
            id: NotSet,
            room_number: Set(self.room_number.trim().to_string()),
            floor: Set(self.floor),
            room_type: Set(self.room_type),
            capacity: Set(capacity),
            rent_amount: Set(self.rent_amount),
            status: Set(self.status),
            tenant_id: Set(None),
            created_at: Set(now),
        }
    }
}

/// Partial room update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdate {
    pub room_number: Option<String>,
    pub floor: Option<Option<i32>>,
    pub room_type: Option<RoomType>,
    pub capacity: Option<i32>,
    pub rent_amount: Option<f64>,
    pub status: Option<RoomStatus>,
    pub tenant_id: Option<Option<i64>>,
}

impl RoomUpdate {
    pub(crate) fn apply(self, row: &mut room::ActiveModel) {
        patch(
            &mut row.room_number,
            self.room_number.map(|r| r.trim().to_string()),
        );
        patch(&mut row.floor, self.floor);
        patch(&mut row.room_type, self.room_type);
        patch(&mut row.capacity, self.capacity);
        patch(&mut row.rent_amount, self.rent_amount);
        patch(&mut row.status, self.status);
        patch(&mut row.tenant_id, self.tenant_id);
    }
}

// ---------------------------------------------------------------------------
// Bill
// ---------------------------------------------------------------------------

/// An invoice for one tenant and one billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: i64,
    pub tenant_id: i64,
    pub billing_period: String,
    pub electricity_reading: i64,
    pub previous_reading: i64,
    pub rent_amount: f64,
    pub electricity_charges: f64,
    pub adjustments: f64,
    pub total_amount: f64,
    pub bill_date: NaiveDate,
    pub due_date: NaiveDate,
    pub payment_status: BillStatus,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: NaiveDateTime,
}

impl Bill {
    /// Units consumed between the previous and billed readings.
    #[must_use]
    pub const fn units_consumed(&self) -> i64 {
        self.electricity_reading - self.previous_reading
    }
}

impl From<bill::Model> for Bill {
    fn from(row: bill::Model) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            billing_period: row.billing_period,
            electricity_reading: row.electricity_reading,
            previous_reading: row.previous_reading,
            rent_amount: row.rent_amount,
            electricity_charges: row.electricity_charges,
            adjustments: row.adjustments,
            total_amount: row.total_amount,
            bill_date: row.bill_date,
            due_date: row.due_date,
            payment_status: row.payment_status,
            payment_date: row.payment_date,
            payment_method: row.payment_method,
            created_at: row.created_at,
        }
    }
}

/// Administrative bill edit. May force any status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillUpdate {
    pub rent_amount: Option<f64>,
    pub electricity_charges: Option<f64>,
    pub adjustments: Option<f64>,
    pub total_amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub payment_status: Option<BillStatus>,
    pub payment_date: Option<Option<NaiveDate>>,
    pub payment_method: Option<Option<PaymentMethod>>,
}

impl BillUpdate {
    pub(crate) fn apply(self, row: &mut bill::ActiveModel) {
        patch(&mut row.rent_amount, self.rent_amount);
        patch(&mut row.electricity_charges, self.electricity_charges);
        patch(&mut row.adjustments, self.adjustments);
        patch(&mut row.total_amount, self.total_amount);
        patch(&mut row.due_date, self.due_date);
        patch(&mut row.payment_status, self.payment_status);
        patch(&mut row.payment_date, self.payment_date);
        patch(&mut row.payment_method, self.payment_method);
    }
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

/// Money received against a bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub bill_id: i64,
    pub tenant_id: i64,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<payment::Model> for Payment {
    fn from(row: payment::Model) -> Self {
        Self {
            id: row.id,
            bill_id: row.bill_id,
            tenant_id: row.tenant_id,
            amount: row.amount,
            payment_date: row.payment_date,
            payment_method: row.payment_method,
            status: row.status,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Fields supplied when a payment is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPayment {
    pub(crate) fn into_active_model(
        self,
        bill_id: i64,
        tenant_id: i64,
        now: NaiveDateTime,
    ) -> payment::ActiveModel {
        payment::ActiveModel {
            id: NotSet,
            bill_id: Set(bill_id),
            tenant_id: Set(tenant_id),
            amount: Set(self.amount),
            payment_date: Set(self.payment_date),
            payment_method: Set(self.payment_method),
            status: Set(PaymentStatus::Completed),
            notes: Set(self
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())),
            created_at: Set(now),
        }
    }
}

/// Operator correction of a payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub amount: Option<f64>,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
    pub notes: Option<Option<String>>,
}

impl PaymentUpdate {
    pub(crate) fn apply(self, row: &mut payment::ActiveModel) {
        patch(&mut row.amount, self.amount);
        patch(&mut row.payment_date, self.payment_date);
        patch(&mut row.payment_method, self.payment_method);
        patch(&mut row.status, self.status);
        patch(&mut row.notes, self.notes);
    }
}

// ---------------------------------------------------------------------------
// Expense
// ---------------------------------------------------------------------------

/// An operating cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub expense_date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub receipt_ref: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<expense::Model> for Expense {
    fn from(row: expense::Model) -> Self {
        Self {
            id: row.id,
            expense_date: row.expense_date,
            category: row.category,
            description: row.description,
            amount: row.amount,
            payment_method: row.payment_method,
            receipt_ref: row.receipt_ref,
            created_at: row.created_at,
        }
    }
}

/// Fields supplied when an expense is logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub expense_date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub receipt_ref: Option<String>,
}

impl NewExpense {
    pub(crate) fn into_active_model(self, now: NaiveDateTime) -> expense::ActiveModel {
        expense::ActiveModel {
            id: NotSet,
            expense_date: Set(self.expense_date),
            category: Set(self.category),
            description: Set(self.description.trim().to_string()),
            amount: Set(self.amount),
            payment_method: Set(self.payment_method),
            receipt_ref: Set(self.receipt_ref),
            created_at: Set(now),
        }
    }
}

/// Partial expense update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub expense_date: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub receipt_ref: Option<Option<String>>,
}

impl ExpenseUpdate {
    pub(crate) fn apply(self, row: &mut expense::ActiveModel) {
        patch(&mut row.expense_date, self.expense_date);
        patch(&mut row.category, self.category);
        patch(
            &mut row.description,
            self.description.map(|d| d.trim().to_string()),
        );
        patch(&mut row.amount, self.amount);
        patch(&mut row.payment_method, self.payment_method);
        patch(&mut row.receipt_ref, self.receipt_ref);
    }
}

// ---------------------------------------------------------------------------
// Electricity reading
// ---------------------------------------------------------------------------

/// A metered reading for one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityReading {
    pub id: i64,
    pub room_number: String,
    pub reading_date: NaiveDate,
    pub previous_reading: i64,
    pub current_reading: i64,
    pub units_consumed: i64,
    pub rate_per_unit: f64,
    pub amount: f64,
    pub is_paid: bool,
    pub created_at: NaiveDateTime,
}

impl From<electricity_reading::Model> for ElectricityReading {
    fn from(row: electricity_reading::Model) -> Self {
        Self {
            id: row.id,
            room_number: row.room_number,
            reading_date: row.reading_date,
            previous_reading: row.previous_reading,
            current_reading: row.current_reading,
            units_consumed: row.units_consumed,
            rate_per_unit: row.rate_per_unit,
            amount: row.amount,
            is_paid: row.is_paid,
            created_at: row.created_at,
        }
    }
}

/// Fields supplied when a meter is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub room_number: String,
    pub reading_date: NaiveDate,
    pub previous_reading: i64,
    pub current_reading: i64,
    pub rate_per_unit: f64,
    #[serde(default)]
    pub is_paid: bool,
}

impl NewReading {
    pub(crate) fn into_active_model(
        self,
        amount: f64,
        now: NaiveDateTime,
    ) -> electricity_reading::ActiveModel {
        electricity_reading::ActiveModel {
            id: NotSet,
            room_number: Set(self.room_number.trim().to_string()),
            reading_date: Set(self.reading_date),
            previous_reading: Set(self.previous_reading),
            current_reading: Set(self.current_reading),
            units_consumed: Set(self.current_reading - self.previous_reading),
            rate_per_unit: Set(self.rate_per_unit),
            amount: Set(amount),
            is_paid: Set(self.is_paid),
            created_at: Set(now),
        }
    }
}
