//! Bill entity - A monthly invoice for one tenant.
//!
//! Each bill carries rent, the metered electricity charge and a signed
//! adjustment. `total_amount` is fixed at creation as the sum of the three.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment status of a bill.
///
/// Normal flow only moves forward: `Unpaid -> Partial -> Paid`, or straight
/// from `Unpaid` to `Paid`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// Nothing received yet
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Something received, not settled
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Settled
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl BillStatus {
    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Staying in the same state is allowed; going backwards is not.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Unpaid, _) | (Self::Partial, Self::Partial | Self::Paid) | (Self::Paid, Self::Paid)
        )
    }

    /// Whether money is still owed.
    #[must_use]
    pub const fn is_outstanding(self) -> bool {
        !matches!(self, Self::Paid)
    }

    /// Store representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bill database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    /// Unique identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Tenant being billed
    pub tenant_id: i64,
    /// Billing month as `YYYY-MM`
    pub billing_period: String,
    /// Meter value at bill time
    pub electricity_reading: i64,
    /// Meter value the charge was measured from
    pub previous_reading: i64,
    /// Rent charged
    pub rent_amount: f64,
    /// Metered electricity charge, negative for a credit
    pub electricity_charges: f64,
    /// Signed manual correction
    pub adjustments: f64,
    /// `rent_amount + electricity_charges + adjustments`
    pub total_amount: f64,
    /// Date the bill was issued
    pub bill_date: Date,
    /// Bill date plus the grace period
    pub due_date: Date,
    /// Payment status
    pub payment_status: BillStatus,
    /// Date of the settling payment
    pub payment_date: Option<Date>,
    /// Method of the settling payment
    pub payment_method: Option<super::payment::PaymentMethod>,
    /// When the row was created
    pub created_at: DateTime,
}

/// Defines relationships between Bill and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each bill belongs to one tenant
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
    /// One bill has many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
