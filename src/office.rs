//! Back office state owner.
//!
//! [`BackOffice`] holds the store connection, the settings and the in-memory
//! [`Snapshot`]. Every write goes to the store first; the snapshot only
//! changes once the store call has returned successfully.

use crate::{
    config::Settings,
    core::{
        electricity, expense,
        invoice::{self, NewBill, PaymentReceipt},
        payment, receipt,
        report::{self, DashboardStats},
        room,
        snapshot::Snapshot,
        tenant,
    },
    errors::{Error, Result},
    models::{
        self, BillUpdate, NewExpense, NewPayment, NewReading, NewRoom, NewTenant, RoomUpdate,
        TenantUpdate,
    },
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};
use url::Url;

/// Connection, settings and the current snapshot.
#[derive(Debug)]
pub struct BackOffice {
    db: DatabaseConnection,
    settings: Settings,
    snapshot: Snapshot,
}

impl BackOffice {
    /// Loads the full snapshot from the store.
    #[instrument(skip_all)]
    pub async fn load(db: DatabaseConnection, settings: Settings) -> Result<Self> {
        let snapshot = Snapshot::load(&db).await?;
        info!(
            rooms = snapshot.rooms.len(),
            tenants = snapshot.tenants.len(),
            "Back office loaded"
        );
        Ok(Self {
            db,
            settings,
            snapshot,
        })
    }

    /// Replaces the snapshot with a fresh load, picking up writes made by
    /// other processes.
    pub async fn reload(&mut self) -> Result<()> {
        self.snapshot = Snapshot::load(&self.db).await?;
        Ok(())
    }

    /// Current snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Store connection.
    #[must_use]
    pub const fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    // Tenant writes move room occupancy too, so rooms are re-read with them.
    // The write has already committed; a failed re-read leaves the rooms stale.
    async fn refresh_rooms(&mut self) {
        match room::get_all_rooms(&self.db).await {
            Ok(rooms) => self.snapshot.rooms = rooms,
            Err(e) => warn!("Failed to re-read rooms after a tenant write: {}", e),
        }
    }

    /// Adds a room.
    pub async fn add_room(&mut self, new_room: NewRoom) -> Result<models::Room> {
        let room = room::create_room(&self.db, new_room).await?;
        self.snapshot.upsert_room(room.clone());
        Ok(room)
    }

    /// Patches a room.
    pub async fn update_room(&mut self, room_id: i64, update: RoomUpdate) -> Result<models::Room> {
        let room = room::update_room(&self.db, room_id, update).await?;
        self.snapshot.upsert_room(room.clone());
        Ok(room)
    }

    /// Deletes an empty room.
    pub async fn delete_room(&mut self, room_id: i64) -> Result<()> {
        room::delete_room(&self.db, room_id).await?;
        self.snapshot.remove_room(room_id);
        Ok(())
    }

    /// Moves a tenant in.
    pub async fn add_tenant(&mut self, new_tenant: NewTenant) -> Result<models::Tenant> {
        let tenant = tenant::create_tenant(&self.db, new_tenant).await?;
        self.snapshot.upsert_tenant(tenant.clone());
        self.refresh_rooms().await;
        Ok(tenant)
    }

    /// Patches a tenant.
    pub async fn update_tenant(
        &mut self,
        tenant_id: i64,
        update: TenantUpdate,
    ) -> Result<models::Tenant> {
        let tenant = tenant::update_tenant(&self.db, tenant_id, update).await?;
        self.snapshot.upsert_tenant(tenant.clone());
        self.refresh_rooms().await;
        Ok(tenant)
    }

    /// Records a tenant's notice to leave.
    pub async fn give_notice(
        &mut self,
        tenant_id: i64,
        notice_date: NaiveDate,
        departure_date: NaiveDate,
    ) -> Result<models::Tenant> {
        let tenant = tenant::give_notice(&self.db, tenant_id, notice_date, departure_date).await?;
        self.snapshot.upsert_tenant(tenant.clone());
        Ok(tenant)
    }

    /// Moves a tenant out.
    pub async fn mark_departed(
        &mut self,
        tenant_id: i64,
        departure_date: NaiveDate,
    ) -> Result<models::Tenant> {
        let tenant = tenant::mark_departed(&self.db, tenant_id, departure_date).await?;
        self.snapshot.upsert_tenant(tenant.clone());
        self.refresh_rooms().await;
        Ok(tenant)
    }

    /// Issues a bill with the configured rate and grace period.
    pub async fn generate_bill(&mut self, tenant_id: i64, new_bill: NewBill) -> Result<models::Bill> {
        let bill = invoice::generate_bill(&self.db, &self.settings.billing, tenant_id, new_bill)
            .await?;
        self.snapshot.upsert_bill(bill.clone());
        if self.settings.billing.sync_tenant_reading {
            match tenant::get_tenant_by_id(&self.db, tenant_id).await {
                Ok(Some(tenant)) => self.snapshot.upsert_tenant(tenant),
                Ok(None) => {}
                Err(e) => {
                    warn!(tenant_id, "Failed to re-read tenant after billing: {}", e);
                    self.snapshot.apply_billed_reading(&bill);
                }
            }
        }
        Ok(bill)
    }

    /// Records a payment and settles its bill.
    pub async fn record_payment(
        &mut self,
        bill_id: i64,
        new_payment: NewPayment,
    ) -> Result<PaymentReceipt> {
        let receipt =
            invoice::record_payment(&self.db, &self.settings.billing, bill_id, new_payment).await?;
        self.snapshot.upsert_bill(receipt.bill.clone());
        self.snapshot.upsert_payment(receipt.payment.clone());
        Ok(receipt)
    }

    /// Operator edit of a bill.
    pub async fn override_bill(&mut self, bill_id: i64, update: BillUpdate) -> Result<models::Bill> {
        let bill = invoice::override_bill(&self.db, bill_id, update).await?;
        self.snapshot.upsert_bill(bill.clone());
        Ok(bill)
    }

    /// Deletes a bill that has no payments.
    pub async fn delete_bill(&mut self, bill_id: i64) -> Result<()> {
        invoice::delete_bill(&self.db, bill_id).await?;
        self.snapshot.remove_bill(bill_id);
        Ok(())
    }

    /// Removes a payment.
    pub async fn delete_payment(&mut self, payment_id: i64) -> Result<()> {
        payment::delete_payment(&self.db, payment_id).await?;
        self.snapshot.remove_payment(payment_id);
        Ok(())
    }

    /// Applies billed readings to tenants when bills were generated without syncing.
    pub async fn reconcile_tenant_readings(&mut self) -> Result<usize> {
        let updated = invoice::reconcile_tenant_readings(&self.db).await?;
        if updated > 0 {
            self.snapshot.tenants = tenant::get_all_tenants(&self.db).await?;
        }
        Ok(updated)
    }

    /// Logs an expense.
    pub async fn add_expense(&mut self, new_expense: NewExpense) -> Result<models::Expense> {
        let expense = expense::create_expense(&self.db, new_expense).await?;
        self.snapshot.upsert_expense(expense.clone());
        Ok(expense)
    }

    /// Deletes an expense.
    pub async fn delete_expense(&mut self, expense_id: i64) -> Result<()> {
        expense::delete_expense(&self.db, expense_id).await?;
        self.snapshot.remove_expense(expense_id);
        Ok(())
    }

    /// Logs a room meter reading.
    pub async fn log_reading(
        &mut self,
        new_reading: NewReading,
    ) -> Result<models::ElectricityReading> {
        let reading = electricity::create_reading(&self.db, new_reading).await?;
        self.snapshot.upsert_reading(reading.clone());
        Ok(reading)
    }

    /// Dashboard as of `today`.
    #[must_use]
    pub fn dashboard(&self, today: NaiveDate) -> DashboardStats {
        report::dashboard(&self.snapshot, today)
    }

    /// Vacancy forecast over the configured number of months.
    #[must_use]
    pub fn vacancy_forecast(&self, today: NaiveDate) -> Vec<report::VacancyForecast> {
        report::vacancy_forecast(&self.snapshot, today, self.settings.billing.forecast_months)
    }

    fn bill_with_tenant(&self, bill_id: i64) -> Result<(&models::Bill, &models::Tenant)> {
        let bill = self
            .snapshot
            .bill_by_id(bill_id)
            .ok_or(Error::BillNotFound { id: bill_id })?;
        let tenant = self
            .snapshot
            .tenant_by_id(bill.tenant_id)
            .ok_or(Error::TenantNotFound { id: bill.tenant_id })?;
        Ok((bill, tenant))
    }

    /// Text receipt for a bill, showing its most recent payment if any.
    ///
    /// # Errors
    /// Returns an error if the bill or its tenant is not in the snapshot.
    pub fn receipt(&self, bill_id: i64) -> Result<String> {
        let (bill, tenant) = self.bill_with_tenant(bill_id)?;
        let latest = self
            .snapshot
            .payments_for_bill(bill_id)
            .max_by_key(|p| (p.payment_date, p.id));
        Ok(receipt::format_receipt(
            tenant,
            bill,
            latest,
            &self.settings.receipt,
        ))
    }

    /// Share link sending a bill summary to its tenant.
    ///
    /// # Errors
    /// Returns an error if the bill or tenant is missing or the link cannot be built.
    pub fn share_link(&self, bill_id: i64) -> Result<Url> {
        let (bill, tenant) = self.bill_with_tenant(bill_id)?;
        receipt::bill_share_link(tenant, bill, &self.settings.receipt)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::billing::BillingPeriod;
    use crate::entities::{BillStatus, ExpenseCategory, RoomStatus, RoomType};
    use crate::test_utils::*;

    async fn office_with_tenant() -> Result<(BackOffice, models::Tenant)> {
        let db = setup_test_db().await?;
        let mut office = BackOffice::load(db, Settings::default()).await?;
        office.add_room(new_room("101", RoomType::Double)).await?;
        office.add_room(new_room("102", RoomType::Single)).await?;
        let tenant = office.add_tenant(new_tenant("Asha", "101")).await?;
        Ok((office, tenant))
    }

    fn march_bill(reading: i64) -> NewBill {
        NewBill {
            billing_period: BillingPeriod::new(2024, 3).unwrap(),
            electricity_reading: reading,
            adjustments: 0.0,
            bill_date: date(2024, 3, 1),
        }
    }

    #[tokio::test]
    async fn test_writes_update_snapshot() -> Result<()> {
        let (mut office, tenant) = office_with_tenant().await?;
        assert_eq!(
            office.snapshot().room_by_number("101").unwrap().status,
            RoomStatus::Occupied
        );

        let bill = office.generate_bill(tenant.id, march_bill(1100)).await?;
        assert_eq!(bill.electricity_charges, 1200.0);
        assert_eq!(
            office.snapshot().tenant_by_id(tenant.id).unwrap().last_electricity_reading,
            Some(1100)
        );

        let receipt = office.record_payment(bill.id, new_payment(4000.0)).await?;
        assert_eq!(receipt.bill.payment_status, BillStatus::Partial);
        assert_eq!(
            office.snapshot().bill_by_id(bill.id).unwrap().payment_status,
            BillStatus::Partial
        );

        office
            .add_expense(new_expense(ExpenseCategory::Water, 500.0, date(2024, 3, 3)))
            .await?;

        let stats = office.dashboard(date(2024, 3, 20));
        assert_eq!(stats.total_rooms, 2);
        assert_eq!(stats.occupied_rooms, 1);
        assert_eq!(stats.occupancy_rate, 50);
        assert_eq!(stats.total_collected, 4000.0);
        assert_eq!(stats.outstanding_amount, bill.total_amount - 4000.0);
        assert_eq!(stats.monthly_expenses, 500.0);
        assert_eq!(stats.overdue_bills, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_leaves_snapshot_alone() -> Result<()> {
        let (mut office, tenant) = office_with_tenant().await?;
        let before = office.snapshot().clone();

        assert!(office.generate_bill(tenant.id, march_bill(900)).await.is_err());
        assert!(office.record_payment(42, new_payment(100.0)).await.is_err());
        assert!(office.add_tenant(new_tenant("Bilal", "404")).await.is_err());

        assert_eq!(office.snapshot(), &before);
        Ok(())
    }

    #[tokio::test]
    async fn test_reload_matches_store() -> Result<()> {
        let (mut office, tenant) = office_with_tenant().await?;
        let bill = office.generate_bill(tenant.id, march_bill(1100)).await?;
        office.delete_bill(bill.id).await?;
        office.mark_departed(tenant.id, date(2024, 3, 31)).await?;

        office.reload().await?;
        let snapshot = office.snapshot();
        assert!(snapshot.bills.is_empty());
        assert_eq!(snapshot.active_tenants().count(), 0);
        assert_eq!(
            snapshot.room_by_number("101").unwrap().status,
            RoomStatus::Vacant
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_receipt_and_share_link() -> Result<()> {
        let (mut office, tenant) = office_with_tenant().await?;
        let bill = office.generate_bill(tenant.id, march_bill(1100)).await?;
        office.record_payment(bill.id, new_payment(9200.0)).await?;

        let text = office.receipt(bill.id)?;
        assert!(text.contains("Asha"));
        assert!(text.contains("PAYMENT"));

        let link = office.share_link(bill.id)?;
        assert!(link.as_str().starts_with("whatsapp://send?recipient=919876543210&body="));

        assert!(matches!(
            office.receipt(999).unwrap_err(),
            Error::BillNotFound { id: 999 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_vacancy_forecast_uses_configured_months() -> Result<()> {
        let (mut office, tenant) = office_with_tenant().await?;
        office
            .give_notice(tenant.id, date(2024, 3, 1), date(2024, 4, 30))
            .await?;

        let forecast = office.vacancy_forecast(date(2024, 3, 10));
        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast[1].departing_tenants, vec![tenant.id]);
        // Room 102 is vacant all along
        assert_eq!(forecast[0].available, 1);
        assert_eq!(forecast[1].available, 2);
        Ok(())
    }
}
