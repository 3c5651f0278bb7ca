//! Room entity - A lettable room identified by its room number.
//!
//! The room number is unique and is what tenants reference. Occupancy is
//! derived from tenants, `status` is the operator's stored view of it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Room layout, which also fixes the usual capacity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    /// One bed
    #[sea_orm(string_value = "single")]
    Single,
    /// Two beds
    #[sea_orm(string_value = "double")]
    Double,
    /// Three beds
    #[sea_orm(string_value = "triple")]
    Triple,
    /// Four beds
    #[sea_orm(string_value = "quad")]
    Quad,
}

impl RoomType {
    /// Number of beds for this layout.
    #[must_use]
    pub const fn default_capacity(self) -> i32 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Quad => 4,
        }
    }

    /// Store representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Quad => "quad",
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored room status.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(12))")]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// At least one tenant lives here
    #[sea_orm(string_value = "occupied")]
    Occupied,
    /// Available to let
    #[sea_orm(string_value = "vacant")]
    Vacant,
    /// Out of service
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

impl RoomStatus {
    /// Store representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Occupied => "occupied",
            Self::Vacant => "vacant",
            Self::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Room database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    /// Unique identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Room number such as `"101"` or `"G2"`
    #[sea_orm(unique)]
    pub room_number: String,
    /// Floor, derived from the room number when absent
    pub floor: Option<i32>,
    /// Room layout
    pub room_type: RoomType,
    /// Maximum number of active tenants (1-4)
    pub capacity: i32,
    /// Advertised monthly rent for the room
    pub rent_amount: f64,
    /// Stored status
    pub status: RoomStatus,
    /// Primary occupying tenant, if recorded
    pub tenant_id: Option<i64>,
    /// When the row was created
    pub created_at: DateTime,
}

/// Rooms are joined to tenants by room number, not by a foreign key
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
