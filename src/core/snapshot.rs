//! In-memory view of every entity collection.
//!
//! A [`Snapshot`] is loaded in full from the store and then kept current by
//! applying the rows each successful write returns. Reports read from it and
//! never touch the store.

use crate::{
    core::{bill, electricity, expense, payment, room, tenant},
    errors::Result,
    models::{Bill, ElectricityReading, Expense, Payment, Room, Tenant},
};
use sea_orm::ConnectionTrait;
use std::cmp::Ordering;
use tracing::debug;

/// All entity collections, each in its repository's default order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Tenants by id
    pub tenants: Vec<Tenant>,
    /// Rooms by room number
    pub rooms: Vec<Room>,
    /// Bills, newest bill date first, then highest id
    pub bills: Vec<Bill>,
    /// Payments, newest payment date first, then highest id
    pub payments: Vec<Payment>,
    /// Expenses, newest expense date first, then highest id
    pub expenses: Vec<Expense>,
    /// Meter readings, newest reading date first, then highest id
    pub readings: Vec<ElectricityReading>,
}

/// Replaces the row with the same id and keeps `rows` sorted by `order`.
fn upsert_by<T, F, O>(rows: &mut Vec<T>, row: T, id: F, order: O)
where
    F: Fn(&T) -> i64,
    O: Fn(&T, &T) -> Ordering,
{
    let key = id(&row);
    rows.retain(|r| id(r) != key);
    let at = rows.partition_point(|r| order(r, &row) != Ordering::Greater);
    rows.insert(at, row);
}

impl Snapshot {
    /// Loads every collection from the store.
    pub async fn load<C>(db: &C) -> Result<Self>
    where
        C: ConnectionTrait,
    {
        let snapshot = Self {
            tenants: tenant::get_all_tenants(db).await?,
            rooms: room::get_all_rooms(db).await?,
            bills: bill::get_all_bills(db).await?,
            payments: payment::get_all_payments(db).await?,
            expenses: expense::get_all_expenses(db).await?,
            readings: electricity::get_all_readings(db).await?,
        };
        debug!(
            tenants = snapshot.tenants.len(),
            rooms = snapshot.rooms.len(),
            bills = snapshot.bills.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Tenant with the given id.
    #[must_use]
    pub fn tenant_by_id(&self, tenant_id: i64) -> Option<&Tenant> {
        self.tenants.iter().find(|t| t.id == tenant_id)
    }

    /// Room with the given number.
    #[must_use]
    pub fn room_by_number(&self, room_number: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.room_number == room_number)
    }

    /// Bill with the given id.
    #[must_use]
    pub fn bill_by_id(&self, bill_id: i64) -> Option<&Bill> {
        self.bills.iter().find(|b| b.id == bill_id)
    }

    /// Tenants in an active-like status.
    pub fn active_tenants(&self) -> impl Iterator<Item = &Tenant> {
        self.tenants.iter().filter(|t| t.status.is_active_like())
    }

    /// Active-like tenants living in a room. Tenants reference rooms by number.
    pub fn tenants_in_room<'a>(&'a self, room_number: &'a str) -> impl Iterator<Item = &'a Tenant> {
        self.active_tenants()
            .filter(move |t| t.room_number == room_number)
    }

    /// Whether a room has at least one active-like tenant.
    #[must_use]
    pub fn is_room_occupied(&self, room_number: &str) -> bool {
        self.tenants_in_room(room_number).next().is_some()
    }

    /// Payments recorded against a bill.
    pub fn payments_for_bill(&self, bill_id: i64) -> impl Iterator<Item = &Payment> {
        self.payments.iter().filter(move |p| p.bill_id == bill_id)
    }

    /// Applies a stored tenant row.
    pub fn upsert_tenant(&mut self, tenant: Tenant) {
        upsert_by(&mut self.tenants, tenant, |t| t.id, |a, b| a.id.cmp(&b.id));
    }

    /// Applies a stored room row.
    pub fn upsert_room(&mut self, room: Room) {
        upsert_by(&mut self.rooms, room, |r| r.id, |a, b| {
            a.room_number.cmp(&b.room_number)
        });
    }

    /// Applies a stored bill row.
    pub fn upsert_bill(&mut self, bill: Bill) {
        upsert_by(&mut self.bills, bill, |b| b.id, |a, b| {
            (b.bill_date, b.id).cmp(&(a.bill_date, a.id))
        });
    }

    /// Applies a stored payment row.
    pub fn upsert_payment(&mut self, payment: Payment) {
        upsert_by(&mut self.payments, payment, |p| p.id, |a, b| {
            (b.payment_date, b.id).cmp(&(a.payment_date, a.id))
        });
    }

    /// Applies a stored expense row.
    pub fn upsert_expense(&mut self, expense: Expense) {
        upsert_by(&mut self.expenses, expense, |e| e.id, |a, b| {
            (b.expense_date, b.id).cmp(&(a.expense_date, a.id))
        });
    }

    /// Applies a stored meter reading row.
    pub fn upsert_reading(&mut self, reading: ElectricityReading) {
        upsert_by(&mut self.readings, reading, |r| r.id, |a, b| {
            (b.reading_date, b.id).cmp(&(a.reading_date, a.id))
        });
    }

    /// Moves the billed tenant's last meter reading up to the bill's reading
    /// when the stored tenant row could not be re-read.
    pub fn apply_billed_reading(&mut self, bill: &Bill) {
        if let Some(tenant) = self.tenants.iter_mut().find(|t| t.id == bill.tenant_id) {
            let current = tenant.last_electricity_reading.unwrap_or(i64::MIN);
            if bill.electricity_reading > current {
                tenant.last_electricity_reading = Some(bill.electricity_reading);
            }
        }
    }

    /// Drops a deleted tenant.
    pub fn remove_tenant(&mut self, tenant_id: i64) {
        self.tenants.retain(|t| t.id != tenant_id);
    }

    /// Drops a deleted room.
    pub fn remove_room(&mut self, room_id: i64) {
        self.rooms.retain(|r| r.id != room_id);
    }

    /// Drops a deleted bill.
    pub fn remove_bill(&mut self, bill_id: i64) {
        self.bills.retain(|b| b.id != bill_id);
    }

    /// Drops a deleted payment.
    pub fn remove_payment(&mut self, payment_id: i64) {
        self.payments.retain(|p| p.id != payment_id);
    }

    /// Drops a deleted expense.
    pub fn remove_expense(&mut self, expense_id: i64) {
        self.expenses.retain(|e| e.id != expense_id);
    }

    /// Drops a deleted meter reading.
    pub fn remove_reading(&mut self, reading_id: i64) {
        self.readings.retain(|r| r.id != reading_id);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::invoice::record_payment;
    use crate::entities::{BillStatus, RoomType, TenantStatus};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_load_reads_every_collection() -> Result<()> {
        let (db, settings, tenant) = setup_with_tenant().await?;
        let bill = generate_test_bill(&db, &settings, tenant.id, "2024-03", 1100).await?;
        record_payment(&db, &settings.billing, bill.id, new_payment(500.0)).await?;

        let snapshot = Snapshot::load(&db).await?;
        assert_eq!(snapshot.tenants.len(), 1);
        assert_eq!(snapshot.rooms.len(), 1);
        assert_eq!(snapshot.bills.len(), 1);
        assert_eq!(snapshot.payments.len(), 1);
        assert!(snapshot.expenses.is_empty());
        assert!(snapshot.readings.is_empty());

        assert_eq!(snapshot.tenant_by_id(tenant.id).unwrap().name, "Asha");
        assert!(snapshot.is_room_occupied("101"));
        assert_eq!(snapshot.payments_for_bill(bill.id).count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_and_remove() -> Result<()> {
        let (db, settings, tenant) = setup_with_tenant().await?;
        let mut snapshot = Snapshot::load(&db).await?;

        let bill = generate_test_bill(&db, &settings, tenant.id, "2024-03", 1100).await?;
        snapshot.upsert_bill(bill.clone());
        assert_eq!(snapshot.bills.len(), 1);

        let mut paid = bill.clone();
        paid.payment_status = BillStatus::Paid;
        snapshot.upsert_bill(paid);
        assert_eq!(snapshot.bills.len(), 1);
        assert_eq!(
            snapshot.bill_by_id(bill.id).unwrap().payment_status,
            BillStatus::Paid
        );

        snapshot.remove_bill(bill.id);
        assert!(snapshot.bill_by_id(bill.id).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_upserts_keep_load_order() -> Result<()> {
        let (db, settings, tenant) = setup_with_tenant().await?;
        let mut snapshot = Snapshot::load(&db).await?;

        let march = generate_test_bill(&db, &settings, tenant.id, "2024-03", 1100).await?;
        snapshot.upsert_bill(march);
        let later = create_custom_room(&db, "205", RoomType::Single, None).await?;
        snapshot.upsert_room(later);
        let earlier = create_custom_room(&db, "100", RoomType::Single, None).await?;
        snapshot.upsert_room(earlier);
        let second = create_test_tenant(&db, "Ravi", "205").await?;
        snapshot.upsert_tenant(second.clone());
        let february = generate_test_bill(&db, &settings, second.id, "2024-02", 1050).await?;
        snapshot.upsert_bill(february);

        // Occupancy and readings changed in the store; re-apply the stored rows.
        for row in room::get_all_rooms(&db).await? {
            snapshot.upsert_room(row);
        }
        for row in tenant::get_all_tenants(&db).await? {
            snapshot.upsert_tenant(row);
        }

        let loaded = Snapshot::load(&db).await?;
        assert_eq!(snapshot.tenants, loaded.tenants);
        assert_eq!(snapshot.rooms, loaded.rooms);
        assert_eq!(snapshot.bills, loaded.bills);
        let numbers: Vec<&str> = snapshot.rooms.iter().map(|r| r.room_number.as_str()).collect();
        assert_eq!(numbers, vec!["100", "101", "205"]);
        let periods: Vec<&str> = snapshot.bills.iter().map(|b| b.billing_period.as_str()).collect();
        assert_eq!(periods, vec!["2024-03", "2024-02"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_billed_reading_applies_without_store() -> Result<()> {
        let (db, settings, tenant) = setup_with_tenant().await?;
        let mut snapshot = Snapshot::load(&db).await?;
        assert_eq!(snapshot.tenant_by_id(tenant.id).unwrap().last_electricity_reading, None);

        let bill = generate_test_bill(&db, &settings, tenant.id, "2024-03", 1100).await?;
        snapshot.upsert_bill(bill.clone());
        snapshot.apply_billed_reading(&bill);
        assert_eq!(
            snapshot.tenant_by_id(tenant.id).unwrap().last_electricity_reading,
            Some(1100)
        );

        let mut stale = bill;
        stale.electricity_reading = 1050;
        snapshot.apply_billed_reading(&stale);
        assert_eq!(
            snapshot.tenant_by_id(tenant.id).unwrap().last_electricity_reading,
            Some(1100)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_departed_tenants_do_not_occupy_rooms() -> Result<()> {
        let (db, _settings, tenant) = setup_with_tenant().await?;
        let mut snapshot = Snapshot::load(&db).await?;

        let mut gone = tenant;
        gone.status = TenantStatus::Left;
        snapshot.upsert_tenant(gone);

        assert_eq!(snapshot.active_tenants().count(), 0);
        assert!(!snapshot.is_room_occupied("101"));
        Ok(())
    }
}
