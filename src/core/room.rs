//! Room repository - CRUD for rooms plus the occupancy bookkeeping that
//! tenant operations rely on.
//!
//! Tenants reference rooms by room number. The helpers here are the only
//! place that counts active tenants per room and keeps the stored room
//! status in line with that count.

use crate::{
    config::RoomConfig,
    entities::{Room, RoomStatus, Tenant, room, tenant},
    errors::{Error, Result},
    models::{self, NewRoom, RoomUpdate},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

fn validate_room_number(room_number: &str) -> Result<()> {
    if room_number.trim().is_empty() {
        return Err(Error::validation("Room number cannot be empty"));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> Result<()> {
    if !(1..=4).contains(&capacity) {
        return Err(Error::validation(format!(
            "Room capacity must be between 1 and 4, got {capacity}"
        )));
    }
    Ok(())
}

fn validate_rent(rent_amount: f64) -> Result<()> {
    if rent_amount < 0.0 || !rent_amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: rent_amount,
        });
    }
    Ok(())
}

/// Retrieves all rooms ordered by room number.
pub async fn get_all_rooms<C>(db: &C) -> Result<Vec<models::Room>>
where
    C: ConnectionTrait,
{
    let rows = Room::find()
        .order_by_asc(room::Column::RoomNumber)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Finds a room by its id.
pub async fn get_room_by_id<C>(db: &C, room_id: i64) -> Result<Option<models::Room>>
where
    C: ConnectionTrait,
{
    Ok(Room::find_by_id(room_id).one(db).await?.map(Into::into))
}

/// Finds a room by its room number.
pub async fn get_room_by_number<C>(db: &C, room_number: &str) -> Result<Option<models::Room>>
where
    C: ConnectionTrait,
{
    Ok(find_row_by_number(db, room_number).await?.map(Into::into))
}

async fn find_row_by_number<C>(db: &C, room_number: &str) -> Result<Option<room::Model>>
where
    C: ConnectionTrait,
{
    Room::find()
        .filter(room::Column::RoomNumber.eq(room_number.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a room after validating its number, capacity and rent.
///
/// # Errors
/// Returns an error if:
/// - The room number is empty or already taken
/// - The capacity is outside 1-4
/// - The rent is negative or not finite
/// - The database insert operation fails
#[instrument(skip(db, new_room), fields(room_number = %new_room.room_number))]
pub async fn create_room<C>(db: &C, new_room: NewRoom) -> Result<models::Room>
where
    C: ConnectionTrait,
{
    validate_room_number(&new_room.room_number)?;
    validate_capacity(new_room.effective_capacity())?;
    validate_rent(new_room.rent_amount)?;

    if find_row_by_number(db, &new_room.room_number).await?.is_some() {
        return Err(Error::validation(format!(
            "Room {} already exists",
            new_room.room_number.trim()
        )));
    }

    let now = chrono::Utc::now().naive_utc();
    let room = new_room.into_active_model(now).insert(db).await?;
    debug!(room_id = room.id, "Room created");
    Ok(room.into())
}

/// Applies a partial update to a room. Only fields present in `update` are written.
///
/// Tenants reference rooms by number, so a room with active tenants cannot be
/// renumbered, and its capacity cannot drop below its active tenant count.
///
/// # Errors
/// Returns an error if a present field fails validation, the room does not
/// exist, the new number is taken, the room is occupied and being renumbered,
/// the new capacity is below the active tenant count, or the database update fails.
pub async fn update_room<C>(db: &C, room_id: i64, update: RoomUpdate) -> Result<models::Room>
where
    C: ConnectionTrait,
{
    if let Some(room_number) = &update.room_number {
        validate_room_number(room_number)?;
    }
    if let Some(capacity) = update.capacity {
        validate_capacity(capacity)?;
    }
    if let Some(rent_amount) = update.rent_amount {
        validate_rent(rent_amount)?;
    }

    let current = Room::find_by_id(room_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::RoomNotFound {
            room: room_id.to_string(),
        })?;
    let active = active_tenant_count(db, &current.room_number, None).await?;

    if let Some(capacity) = update.capacity {
        if active > u64::try_from(capacity).unwrap_or(0) {
            return Err(Error::RoomFull {
                room_number: current.room_number,
                capacity,
            });
        }
    }

    let renamed_to = update
        .room_number
        .as_deref()
        .map(str::trim)
        .filter(|n| *n != current.room_number)
        .map(str::to_string);
    if let Some(new_number) = &renamed_to {
        if active > 0 {
            return Err(Error::validation(format!(
                "Room {} still has {active} active tenant(s) and cannot be renumbered",
                current.room_number
            )));
        }
        if find_row_by_number(db, new_number).await?.is_some() {
            return Err(Error::validation(format!("Room {new_number} already exists")));
        }
    }

    let mut room: room::ActiveModel = current.into();
    update.apply(&mut room);
    let updated = room.update(db).await?;

    if renamed_to.is_some() {
        sync_room_occupancy(db, &updated.room_number).await?;
        return Ok(find_row_by_number(db, &updated.room_number)
            .await?
            .map_or_else(|| updated.into(), Into::into));
    }
    Ok(updated.into())
}

/// Deletes a room that no active tenant lives in.
///
/// # Errors
/// Returns an error if the room does not exist, still has active tenants,
/// or the database delete fails.
pub async fn delete_room<C>(db: &C, room_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let room = Room::find_by_id(room_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::RoomNotFound {
            room: room_id.to_string(),
        })?;

    let active = active_tenant_count(db, &room.room_number, None).await?;
    if active > 0 {
        return Err(Error::validation(format!(
            "Room {} still has {active} active tenant(s)",
            room.room_number
        )));
    }

    Room::delete_by_id(room_id).exec(db).await?;
    Ok(())
}

/// Number of active-like tenants whose room number is `room_number`,
/// optionally ignoring one tenant (the one being moved or updated).
pub(crate) async fn active_tenant_count<C>(
    db: &C,
    room_number: &str,
    excluding_tenant: Option<i64>,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    let mut query = Tenant::find()
        .filter(tenant::Column::RoomNumber.eq(room_number.trim()))
        .filter(tenant::Column::Status.is_in(tenant::ACTIVE_LIKE_STATUSES));
    if let Some(tenant_id) = excluding_tenant {
        query = query.filter(tenant::Column::Id.ne(tenant_id));
    }
    query.count(db).await.map_err(Into::into)
}

/// Checks that `room_number` exists and has a free bed for one more active
/// tenant, returning the room row.
pub(crate) async fn ensure_capacity<C>(
    db: &C,
    room_number: &str,
    excluding_tenant: Option<i64>,
) -> Result<room::Model>
where
    C: ConnectionTrait,
{
    let room = find_row_by_number(db, room_number)
        .await?
        .ok_or_else(|| Error::RoomNotFound {
            room: room_number.trim().to_string(),
        })?;

    let active = active_tenant_count(db, room_number, excluding_tenant).await?;
    if active >= u64::try_from(room.capacity).unwrap_or(0) {
        return Err(Error::RoomFull {
            room_number: room.room_number,
            capacity: room.capacity,
        });
    }
    Ok(room)
}

/// Brings a room's stored status and occupant in line with its active tenants.
///
/// Rooms under maintenance are left alone. Unknown room numbers are ignored.
pub(crate) async fn sync_room_occupancy<C>(db: &C, room_number: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let Some(room) = find_row_by_number(db, room_number).await? else {
        return Ok(());
    };
    if room.status == RoomStatus::Maintenance {
        return Ok(());
    }

    let occupant = Tenant::find()
        .filter(tenant::Column::RoomNumber.eq(room.room_number.as_str()))
        .filter(tenant::Column::Status.is_in(tenant::ACTIVE_LIKE_STATUSES))
        .order_by_asc(tenant::Column::Id)
        .one(db)
        .await?;

    let (status, tenant_id) = match &occupant {
        Some(t) => (RoomStatus::Occupied, Some(t.id)),
        None => (RoomStatus::Vacant, None),
    };
    if room.status == status && room.tenant_id == tenant_id {
        return Ok(());
    }

    let room_number = room.room_number.clone();
    let mut active: room::ActiveModel = room.into();
    active.status = Set(status);
    active.tenant_id = Set(tenant_id);
    active.update(db).await?;
    debug!(%room_number, %status, "Room occupancy synced");
    Ok(())
}

/// Creates the configured rooms that do not exist yet. Returns how many were added.
pub async fn seed_rooms<C>(db: &C, rooms: &[RoomConfig]) -> Result<usize>
where
    C: ConnectionTrait,
{
    let mut created = 0;
    for config in rooms {
        if find_row_by_number(db, &config.room_number).await?.is_some() {
            continue;
        }
        create_room(db, config.clone().into()).await?;
        created += 1;
    }
    if created > 0 {
        info!("Seeded {created} room(s) from configuration");
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::RoomType;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_room_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut room = new_room("101", RoomType::Double);
        room.room_number = "  ".to_string();
        let result = create_room(&db, room).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let mut room = new_room("101", RoomType::Double);
        room.capacity = Some(5);
        let result = create_room(&db, room).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let mut room = new_room("101", RoomType::Double);
        room.capacity = Some(0);
        assert!(create_room(&db, room).await.is_err());

        let mut room = new_room("101", RoomType::Double);
        room.rent_amount = -1.0;
        let result = create_room(&db, room).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -1.0 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_get_room_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_room(&db, new_room("G2", RoomType::Triple)).await?;
        assert_eq!(created.room_number, "G2");
        assert_eq!(created.capacity, 3);
        assert_eq!(created.status, RoomStatus::Vacant);
        assert_eq!(created.floor_number(), Some(0));

        let all = get_all_rooms(&db).await?;
        assert_eq!(all, vec![created.clone()]);

        let by_number = get_room_by_number(&db, "G2").await?;
        assert_eq!(by_number, Some(created.clone()));
        let by_id = get_room_by_id(&db, created.id).await?;
        assert_eq!(by_id, Some(created));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_room_number_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_room(&db, new_room("101", RoomType::Single)).await?;

        let result = create_room(&db, new_room("101", RoomType::Double)).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_room_only_touches_given_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let room = create_room(&db, new_room("201", RoomType::Double)).await?;

        let updated = update_room(
            &db,
            room.id,
            RoomUpdate {
                rent_amount: Some(9500.0),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.rent_amount, 9500.0);
        assert_eq!(updated.room_type, RoomType::Double);
        assert_eq!(updated.capacity, 2);
        assert_eq!(updated.room_number, "201");
        Ok(())
    }

    #[tokio::test]
    async fn test_renumber_refused_while_tenants_live_there() -> Result<()> {
        let (db, room) = setup_with_room().await?;
        create_test_tenant(&db, "Asha", &room.room_number).await?;

        let renumber = RoomUpdate {
            room_number: Some("105".to_string()),
            ..Default::default()
        };
        let result = update_room(&db, room.id, renumber).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let unchanged = get_room_by_id(&db, room.id).await?.unwrap();
        assert_eq!(unchanged.room_number, "101");
        assert_eq!(unchanged.status, RoomStatus::Occupied);
        assert_eq!(
            crate::core::tenant::get_tenants_in_room(&db, "101").await?.len(),
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_renumber_empty_room() -> Result<()> {
        let (db, room) = setup_with_room().await?;
        create_room(&db, new_room("102", RoomType::Single)).await?;

        let taken = RoomUpdate {
            room_number: Some("102".to_string()),
            ..Default::default()
        };
        let result = update_room(&db, room.id, taken).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let renumbered = update_room(
            &db,
            room.id,
            RoomUpdate {
                room_number: Some(" 105 ".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(renumbered.room_number, "105");
        assert_eq!(renumbered.status, RoomStatus::Vacant);
        assert!(get_room_by_number(&db, "101").await?.is_none());

        create_test_tenant(&db, "Asha", "105").await?;
        let occupied = get_room_by_number(&db, "105").await?.unwrap();
        assert_eq!(occupied.status, RoomStatus::Occupied);
        Ok(())
    }

    #[tokio::test]
    async fn test_capacity_cannot_drop_below_active_tenants() -> Result<()> {
        let (db, room) = setup_with_room().await?;
        create_test_tenant(&db, "Asha", &room.room_number).await?;
        create_test_tenant(&db, "Ravi", &room.room_number).await?;

        let shrink = RoomUpdate {
            capacity: Some(1),
            ..Default::default()
        };
        let result = update_room(&db, room.id, shrink).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::RoomFull { capacity: 1, .. }
        ));
        assert_eq!(get_room_by_id(&db, room.id).await?.unwrap().capacity, 2);

        let grown = update_room(
            &db,
            room.id,
            RoomUpdate {
                capacity: Some(3),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(grown.capacity, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_room_refuses_occupied_room() -> Result<()> {
        let (db, room) = setup_with_room().await?;
        create_test_tenant(&db, "Asha", &room.room_number).await?;

        let result = delete_room(&db, room.id).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let empty = create_room(&db, new_room("999", RoomType::Single)).await?;
        delete_room(&db, empty.id).await?;
        assert!(get_room_by_id(&db, empty.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_rooms_skips_existing() -> Result<()> {
        let db = setup_test_db().await?;
        let configs: Vec<RoomConfig> = toml::from_str::<crate::config::Settings>(
            r#"
            [[rooms]]
            room_number = "101"
            room_type = "double"
            rent_amount = 9000.0

            [[rooms]]
            room_number = "102"
            room_type = "single"
            rent_amount = 7000.0
            "#,
        )
        .unwrap()
        .rooms;

        assert_eq!(seed_rooms(&db, &configs).await?, 2);
        assert_eq!(seed_rooms(&db, &configs).await?, 0);
        assert_eq!(get_all_rooms(&db).await?.len(), 2);
        Ok(())
    }
}
