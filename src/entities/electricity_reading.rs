//! Electricity reading entity - Per-room meter readings logged independently of bills.
//!
//! Units and amount are derived from the two readings and the rate when the
//! row is created.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Electricity reading database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "electricity_readings")]
pub struct Model {
    /// Unique identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Metered room
    pub room_number: String,
    /// Date the meter was read
    pub reading_date: Date,
    /// Meter value at the previous reading
    pub previous_reading: i64,
    /// Meter value now
    pub current_reading: i64,
    /// `current_reading - previous_reading`
    pub units_consumed: i64,
    /// Price per unit
    pub rate_per_unit: f64,
    /// `units_consumed * rate_per_unit`
    pub amount: f64,
    /// Whether the amount has been collected
    pub is_paid: bool,
    /// When the row was created
    pub created_at: DateTime,
}

/// Readings reference rooms by number, not by a foreign key
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
