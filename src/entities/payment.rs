//! Payment entity - Money received against a bill.
//!
//! `tenant_id` duplicates the bill's tenant so payments can be listed per
//! tenant without a join.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How money moved.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash in hand
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Online gateway
    #[sea_orm(string_value = "online")]
    Online,
    /// UPI transfer
    #[sea_orm(string_value = "upi")]
    Upi,
    /// Direct bank transfer
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Cheque
    #[sea_orm(string_value = "cheque")]
    Cheque,
}

impl PaymentMethod {
    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Online => "Online",
            Self::Upi => "UPI",
            Self::BankTransfer => "Bank Transfer",
            Self::Cheque => "Cheque",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the payment has cleared.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Money received
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Awaiting clearance
    #[sea_orm(string_value = "pending")]
    Pending,
}

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Bill the payment settles
    pub bill_id: i64,
    /// Tenant who paid
    pub tenant_id: i64,
    /// Amount received
    pub amount: f64,
    /// Date received
    pub payment_date: Date,
    /// How it was paid
    pub payment_method: PaymentMethod,
    /// Clearance status
    pub status: PaymentStatus,
    /// Free-text operator notes
    pub notes: Option<String>,
    /// When the row was created
    pub created_at: DateTime,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one bill
    #[sea_orm(
        belongs_to = "super::bill::Entity",
        from = "Column::BillId",
        to = "super::bill::Column::Id"
    )]
    Bill,
    /// Each payment belongs to one tenant
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
}

impl Related<super::bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bill.def()
    }
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
