//! Tenant entity - A person renting a bed or room.
//!
//! Tenants reference their room by `room_number` rather than by id; several
//! tenants may share one room up to its capacity. Tenants are not hard-deleted
//! in normal operation, they move to [`TenantStatus::Left`] instead.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a tenant.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    /// Living in the room, nothing outstanding
    #[sea_orm(string_value = "active")]
    Active,
    /// Living in the room, current bill settled
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Living in the room, payment due
    #[sea_orm(string_value = "due")]
    Due,
    /// Living in the room, balance being adjusted
    #[sea_orm(string_value = "adjust")]
    Adjust,
    /// Living in the room, has given notice
    #[sea_orm(string_value = "departing")]
    Departing,
    /// Moved out
    #[sea_orm(string_value = "left")]
    Left,
    /// Agreed to move in, not yet arrived
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Tenancy ended by the business
    #[sea_orm(string_value = "terminated")]
    Terminated,
    /// Record kept for history only
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Bed held without occupancy
    #[sea_orm(string_value = "hold")]
    Hold,
    /// Enquiry, no agreement yet
    #[sea_orm(string_value = "prospective")]
    Prospective,
}

/// Statuses that count as living in a room: billable, occupying capacity and
/// eligible for the vacancy forecast.
pub const ACTIVE_LIKE_STATUSES: [TenantStatus; 5] = [
    TenantStatus::Active,
    TenantStatus::Paid,
    TenantStatus::Due,
    TenantStatus::Adjust,
    TenantStatus::Departing,
];

impl TenantStatus {
    /// Whether the status is one of [`ACTIVE_LIKE_STATUSES`].
    #[must_use]
    pub const fn is_active_like(self) -> bool {
        matches!(
            self,
            Self::Active | Self::Paid | Self::Due | Self::Adjust | Self::Departing
        )
    }

    /// Store representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paid => "paid",
            Self::Due => "due",
            Self::Adjust => "adjust",
            Self::Departing => "departing",
            Self::Left => "left",
            Self::Pending => "pending",
            Self::Terminated => "terminated",
            Self::Inactive => "inactive",
            Self::Hold => "hold",
            Self::Prospective => "prospective",
        }
    }
}

impl std::fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Mobile number as entered
    pub mobile: String,
    /// Room the tenant lives in, joined to `rooms.room_number`
    pub room_number: String,
    /// Move-in date
    pub join_date: Date,
    /// Monthly rent charged on each bill
    pub monthly_rent: f64,
    /// Deposit held
    pub security_deposit: f64,
    /// Meter value recorded at move-in
    pub electricity_joining_reading: i64,
    /// Most recent meter value, if any since joining
    pub last_electricity_reading: Option<i64>,
    /// Lifecycle status
    pub status: TenantStatus,
    /// Planned or actual departure date
    pub departure_date: Option<Date>,
    /// Whether the tenant has given notice to vacate
    pub notice_given: bool,
    /// When notice was given
    pub notice_date: Option<Date>,
    /// When the row was created
    pub created_at: DateTime,
    /// When the row was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Tenant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One tenant has many bills
    #[sea_orm(has_many = "super::bill::Entity")]
    Bills,
    /// One tenant has many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
