//! Electricity reading repository - Per-room meter readings.
//!
//! Readings are logged per room and independently of bills; the reporting
//! engine aggregates them into electricity statistics.

use crate::{
    core::billing::electricity_charge,
    entities::{ElectricityReading, electricity_reading},
    errors::{Error, Result},
    models::{self, NewReading},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Retrieves all readings, newest first.
pub async fn get_all_readings<C>(db: &C) -> Result<Vec<models::ElectricityReading>>
where
    C: ConnectionTrait,
{
    let rows = ElectricityReading::find()
        .order_by_desc(electricity_reading::Column::ReadingDate)
        .order_by_desc(electricity_reading::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// All readings for one room, newest first.
pub async fn get_readings_for_room<C>(
    db: &C,
    room_number: &str,
) -> Result<Vec<models::ElectricityReading>>
where
    C: ConnectionTrait,
{
    let rows = ElectricityReading::find()
        .filter(electricity_reading::Column::RoomNumber.eq(room_number.trim()))
        .order_by_desc(electricity_reading::Column::ReadingDate)
        .order_by_desc(electricity_reading::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// The most recent reading for a room.
pub async fn get_latest_reading_for_room<C>(
    db: &C,
    room_number: &str,
) -> Result<Option<models::ElectricityReading>>
where
    C: ConnectionTrait,
{
    Ok(get_readings_for_room(db, room_number)
        .await?
        .into_iter()
        .next())
}

/// Logs a meter reading; units and amount are derived from it.
///
/// # Errors
/// Returns an error if the room number is empty, the current reading is
/// below the previous one, the rate is negative or not finite, or the
/// database insert fails.
pub async fn create_reading<C>(db: &C, new_reading: NewReading) -> Result<models::ElectricityReading>
where
    C: ConnectionTrait,
{
    if new_reading.room_number.trim().is_empty() {
        return Err(Error::validation("Room number cannot be empty"));
    }
    if new_reading.current_reading < new_reading.previous_reading {
        return Err(Error::MeterRegression {
            previous: new_reading.previous_reading,
            current: new_reading.current_reading,
        });
    }
    if new_reading.rate_per_unit < 0.0 || !new_reading.rate_per_unit.is_finite() {
        return Err(Error::InvalidAmount {
            amount: new_reading.rate_per_unit,
        });
    }

    let amount = electricity_charge(
        new_reading.current_reading,
        new_reading.previous_reading,
        new_reading.rate_per_unit,
    );
    let now = chrono::Utc::now().naive_utc();
    let row = new_reading.into_active_model(amount, now).insert(db).await?;
    debug!(room_number = %row.room_number, units = row.units_consumed, "Meter reading logged");
    Ok(row.into())
}

/// Marks a reading's amount as collected.
pub async fn mark_reading_paid<C>(db: &C, reading_id: i64) -> Result<models::ElectricityReading>
where
    C: ConnectionTrait,
{
    let mut row: electricity_reading::ActiveModel = ElectricityReading::find_by_id(reading_id)
        .one(db)
        .await?
        .ok_or(Error::ReadingNotFound { id: reading_id })?
        .into();
    row.is_paid = Set(true);
    Ok(row.update(db).await?.into())
}

/// Deletes a reading.
pub async fn delete_reading<C>(db: &C, reading_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = ElectricityReading::delete_by_id(reading_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ReadingNotFound { id: reading_id });
    }
    Ok(())
}
