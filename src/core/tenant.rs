//! Tenant repository - Handles tenant CRUD and the tenant lifecycle steps
//! that touch rooms and meters.
//!
//! Moving in, moving rooms and moving out all change room occupancy, so those
//! writes run in one store transaction together with the room bookkeeping.

use crate::{
    core::room::{ensure_capacity, sync_room_occupancy},
    entities::{Tenant, TenantStatus, tenant},
    errors::{Error, Result},
    models::{self, NewTenant, TenantUpdate},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

fn validate_money(amount: f64) -> Result<()> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn validate_new_tenant(new_tenant: &NewTenant) -> Result<()> {
    if new_tenant.name.trim().is_empty() {
        return Err(Error::validation("Tenant name cannot be empty"));
    }
    if new_tenant.room_number.trim().is_empty() {
        return Err(Error::validation("Tenant room number cannot be empty"));
    }
    validate_money(new_tenant.monthly_rent)?;
    validate_money(new_tenant.security_deposit)?;
    if new_tenant.electricity_joining_reading < 0 {
        return Err(Error::validation(format!(
            "Joining reading cannot be negative, got {}",
            new_tenant.electricity_joining_reading
        )));
    }
    Ok(())
}

fn validate_update(update: &TenantUpdate) -> Result<()> {
    if update.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
        return Err(Error::validation("Tenant name cannot be empty"));
    }
    if update
        .room_number
        .as_ref()
        .is_some_and(|r| r.trim().is_empty())
    {
        return Err(Error::validation("Tenant room number cannot be empty"));
    }
    if let Some(rent) = update.monthly_rent {
        validate_money(rent)?;
    }
    if let Some(deposit) = update.security_deposit {
        validate_money(deposit)?;
    }
    Ok(())
}

async fn find_row<C>(db: &C, tenant_id: i64) -> Result<tenant::Model>
where
    C: ConnectionTrait,
{
    Tenant::find_by_id(tenant_id)
        .one(db)
        .await?
        .ok_or(Error::TenantNotFound { id: tenant_id })
}

/// Retrieves all tenants in creation order.
pub async fn get_all_tenants<C>(db: &C) -> Result<Vec<models::Tenant>>
where
    C: ConnectionTrait,
{
    let rows = Tenant::find().order_by_asc(tenant::Column::Id).all(db).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Finds a tenant by id.
pub async fn get_tenant_by_id<C>(db: &C, tenant_id: i64) -> Result<Option<models::Tenant>>
where
    C: ConnectionTrait,
{
    Ok(Tenant::find_by_id(tenant_id).one(db).await?.map(Into::into))
}

/// All tenants, past and present, recorded against a room number.
pub async fn get_tenants_in_room<C>(db: &C, room_number: &str) -> Result<Vec<models::Tenant>>
where
    C: ConnectionTrait,
{
    let rows = Tenant::find()
        .filter(tenant::Column::RoomNumber.eq(room_number.trim()))
        .order_by_asc(tenant::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Moves a tenant in.
///
/// The room must exist and, for an active-like status, have a free bed. The
/// tenant insert and the room's occupancy update commit together.
///
/// # Errors
/// Returns an error if:
/// - The name or room number is empty
/// - Rent or deposit is negative or not finite, or the joining reading is negative
/// - The room does not exist or is full
/// - A database operation fails
#[instrument(skip(db, new_tenant), fields(room_number = %new_tenant.room_number))]
pub async fn create_tenant(db: &DatabaseConnection, new_tenant: NewTenant) -> Result<models::Tenant> {
    validate_new_tenant(&new_tenant)?;

    let txn = db.begin().await?;

    if new_tenant.status.is_active_like() {
        ensure_capacity(&txn, &new_tenant.room_number, None).await?;
    }

    let now = chrono::Utc::now().naive_utc();
    let row = new_tenant.into_active_model(now).insert(&txn).await?;
    sync_room_occupancy(&txn, &row.room_number).await?;

    txn.commit().await?;

    info!(tenant_id = row.id, "Tenant moved in");
    Ok(row.into())
}

/// Applies a partial update to a tenant. Only fields present in `update` are written.
///
/// A room change or a switch into an active-like status checks the target
/// room's capacity; both the old and the new room's occupancy are refreshed.
///
/// # Errors
/// Returns an error if a present field fails validation, the tenant or
/// target room does not exist, the target room is full, the new last reading
/// is below the joining reading, or a database operation fails.
pub async fn update_tenant(
    db: &DatabaseConnection,
    tenant_id: i64,
    update: TenantUpdate,
) -> Result<models::Tenant> {
    validate_update(&update)?;

    let txn = db.begin().await?;
    let current = find_row(&txn, tenant_id).await?;

    if let Some(reading) = update.last_electricity_reading {
        if reading < current.electricity_joining_reading {
            return Err(Error::MeterRegression {
                previous: current.electricity_joining_reading,
                current: reading,
            });
        }
    }

    let target_room = update
        .room_number
        .as_deref()
        .map_or_else(|| current.room_number.clone(), |r| r.trim().to_string());
    let target_status = update.status.unwrap_or(current.status);
    let becomes_occupant = target_status.is_active_like()
        && (target_room != current.room_number || !current.status.is_active_like());
    if becomes_occupant {
        ensure_capacity(&txn, &target_room, Some(tenant_id)).await?;
    }

    let old_room = current.room_number.clone();
    let mut row: tenant::ActiveModel = current.into();
    update.apply(&mut row, chrono::Utc::now().naive_utc());
    let updated = row.update(&txn).await?;

    sync_room_occupancy(&txn, &old_room).await?;
    if updated.room_number != old_room {
        sync_room_occupancy(&txn, &updated.room_number).await?;
    }

    txn.commit().await?;
    Ok(updated.into())
}

/// Hard-deletes a tenant. Normal flow uses [`mark_departed`] instead.
///
/// # Errors
/// Returns an error if the tenant does not exist or the store refuses the
/// delete (for instance because bills still reference the tenant).
pub async fn delete_tenant(db: &DatabaseConnection, tenant_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let row = find_row(&txn, tenant_id).await?;
    Tenant::delete_by_id(tenant_id).exec(&txn).await?;
    sync_room_occupancy(&txn, &row.room_number).await?;
    txn.commit().await?;
    Ok(())
}

/// Records a new meter reading for a tenant.
///
/// # Errors
/// Returns [`Error::MeterRegression`] when `reading` is below the tenant's
/// last known reading.
pub async fn record_meter_reading<C>(db: &C, tenant_id: i64, reading: i64) -> Result<models::Tenant>
where
    C: ConnectionTrait,
{
    let row = find_row(db, tenant_id).await?;
    let previous = row
        .last_electricity_reading
        .unwrap_or(row.electricity_joining_reading);
    if reading < previous {
        return Err(Error::MeterRegression {
            previous,
            current: reading,
        });
    }

    let mut active: tenant::ActiveModel = row.into();
    TenantUpdate {
        last_electricity_reading: Some(reading),
        ..Default::default()
    }
    .apply(&mut active, chrono::Utc::now().naive_utc());
    debug!(tenant_id, reading, "Meter reading recorded");
    Ok(active.update(db).await?.into())
}

/// Records that a tenant intends to leave on `departure_date`.
///
/// # Errors
/// Returns an error if the tenant does not exist, is not living in a room,
/// or the departure date precedes the notice date.
pub async fn give_notice(
    db: &DatabaseConnection,
    tenant_id: i64,
    notice_date: NaiveDate,
    departure_date: NaiveDate,
) -> Result<models::Tenant> {
    if departure_date < notice_date {
        return Err(Error::validation(
            "Departure date cannot be before the notice date",
        ));
    }

    let row = find_row(db, tenant_id).await?;
    if !row.status.is_active_like() {
        return Err(Error::validation(format!(
            "Tenant {tenant_id} is {} and cannot give notice",
            row.status
        )));
    }

    let mut active: tenant::ActiveModel = row.into();
    TenantUpdate {
        status: Some(TenantStatus::Departing),
        notice_given: Some(true),
        notice_date: Some(Some(notice_date)),
        departure_date: Some(Some(departure_date)),
        ..Default::default()
    }
    .apply(&mut active, chrono::Utc::now().naive_utc());
    info!(tenant_id, %departure_date, "Tenant gave notice");
    Ok(active.update(db).await?.into())
}

/// Moves a tenant out: status becomes `left`, the departure date is recorded
/// and the room is freed when nobody else lives there.
pub async fn mark_departed(
    db: &DatabaseConnection,
    tenant_id: i64,
    departure_date: NaiveDate,
) -> Result<models::Tenant> {
    let txn = db.begin().await?;
    let row = find_row(&txn, tenant_id).await?;
    let room_number = row.room_number.clone();

    let mut active: tenant::ActiveModel = row.into();
    TenantUpdate {
        status: Some(TenantStatus::Left),
        departure_date: Some(Some(departure_date)),
        ..Default::default()
    }
    .apply(&mut active, chrono::Utc::now().naive_utc());
    let updated = active.update(&txn).await?;
    sync_room_occupancy(&txn, &room_number).await?;

    txn.commit().await?;
    info!(tenant_id, %room_number, "Tenant moved out");
    Ok(updated.into())
}
