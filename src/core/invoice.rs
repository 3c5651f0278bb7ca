//! Invoice lifecycle - Generates bills, settles them as payments arrive and
//! classifies overdue bills.
//!
//! A bill starts `unpaid` and only moves forward: to `partial` and then
//! `paid`, or straight to `paid`. Every multi-row write here runs in one
//! store transaction, and nothing is returned to the caller before it commits.

use crate::{
    config::{BillingSettings, SettleAgainst},
    core::{
        bill::{find_bill_for_period, find_row as find_bill_row, get_bills_for_tenant, update_bill},
        billing::{self, BillingPeriod},
        payment::{completed_total_for_bill, validate_payment_amount},
        tenant::{get_all_tenants, record_meter_reading},
    },
    entities::{Bill, BillStatus, Payment, Tenant, bill, payment},
    errors::{Error, Result},
    models::{self, BillUpdate, NewPayment},
};
use chrono::NaiveDate;
use sea_orm::{NotSet, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Operator input for a new bill.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    /// Month being billed
    pub billing_period: BillingPeriod,
    /// Meter value read at bill time
    pub electricity_reading: i64,
    /// Signed manual correction
    pub adjustments: f64,
    /// Issue date; the due date follows from it
    pub bill_date: NaiveDate,
}

/// Result of recording a payment: the stored payment and the bill after settling.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    /// Bill with its new status
    pub bill: models::Bill,
    /// Stored payment
    pub payment: models::Payment,
}

/// Status a bill moves to once `paid_so_far` has been received against `total`.
///
/// The result never goes backwards from `current`: a bill that is already
/// `paid` stays `paid`, whatever the amount.
#[must_use]
pub fn settle_status(current: BillStatus, total: f64, paid_so_far: f64) -> BillStatus {
    let next = if paid_so_far >= total {
        BillStatus::Paid
    } else if paid_so_far > 0.0 {
        BillStatus::Partial
    } else {
        current
    };

    if current.can_transition_to(next) {
        next
    } else {
        current
    }
}

/// Issues a bill for a tenant.
///
/// The electricity charge is measured from the tenant's last known reading
/// (or the joining reading). When `settings.sync_tenant_reading` is set, the
/// tenant's last reading moves to the billed reading in the same transaction.
///
/// # Errors
/// Returns an error if:
/// - The reading is negative or the adjustment is not finite
/// - The tenant does not exist or is not in an active-like status
/// - The tenant already has a bill for the period
/// - The reading is below the tenant's previous reading
/// - A database operation fails
#[instrument(skip(db, settings, new_bill), fields(period = %new_bill.billing_period))]
pub async fn generate_bill(
    db: &DatabaseConnection,
    settings: &BillingSettings,
    tenant_id: i64,
    new_bill: NewBill,
) -> Result<models::Bill> {
    if new_bill.electricity_reading < 0 {
        return Err(Error::validation(format!(
            "Electricity reading cannot be negative, got {}",
            new_bill.electricity_reading
        )));
    }
    if !new_bill.adjustments.is_finite() {
        return Err(Error::InvalidAmount {
            amount: new_bill.adjustments,
        });
    }

    let txn = db.begin().await?;

    let tenant = Tenant::find_by_id(tenant_id)
        .one(&txn)
        .await?
        .ok_or(Error::TenantNotFound { id: tenant_id })?;
    if !tenant.status.is_active_like() {
        return Err(Error::TenantNotBillable {
            tenant_id,
            status: tenant.status,
        });
    }

    if find_bill_for_period(&txn, tenant_id, new_bill.billing_period)
        .await?
        .is_some()
    {
        return Err(Error::DuplicateBill {
            tenant_id,
            billing_period: new_bill.billing_period.to_string(),
        });
    }

    let previous_reading = tenant
        .last_electricity_reading
        .unwrap_or(tenant.electricity_joining_reading);
    if new_bill.electricity_reading < previous_reading {
        return Err(Error::MeterRegression {
            previous: previous_reading,
            current: new_bill.electricity_reading,
        });
    }

    let electricity_charges = billing::electricity_charge(
        new_bill.electricity_reading,
        previous_reading,
        settings.rate_per_unit,
    );
    let total_amount =
        billing::total_bill(tenant.monthly_rent, electricity_charges, new_bill.adjustments);

    let row = bill::ActiveModel {
        id: NotSet,
        tenant_id: Set(tenant_id),
        billing_period: Set(new_bill.billing_period.to_string()),
        electricity_reading: Set(new_bill.electricity_reading),
        previous_reading: Set(previous_reading),
        rent_amount: Set(tenant.monthly_rent),
        electricity_charges: Set(electricity_charges),
        adjustments: Set(new_bill.adjustments),
        total_amount: Set(total_amount),
        bill_date: Set(new_bill.bill_date),
        due_date: Set(billing::due_date(
            new_bill.bill_date,
            settings.grace_period_days,
        )),
        payment_status: Set(BillStatus::Unpaid),
        payment_date: Set(None),
        payment_method: Set(None),
        created_at: Set(chrono::Utc::now().naive_utc()),
    }
    .insert(&txn)
    .await?;

    if settings.sync_tenant_reading {
        record_meter_reading(&txn, tenant_id, new_bill.electricity_reading).await?;
    }

    txn.commit().await?;

    info!(
        bill_id = row.id,
        tenant_id,
        total = row.total_amount,
        "Bill generated"
    );
    Ok(row.into())
}

/// Records a payment against a bill and settles the bill accordingly.
///
/// With [`SettleAgainst::Total`] each payment is compared with the bill's
/// original total on its own. With [`SettleAgainst::Balance`] all completed
/// payments on the bill count together.
///
/// # Errors
/// Returns an error if the amount is not positive and finite, the bill does
/// not exist, or a database operation fails.
#[instrument(skip(db, settings, new_payment), fields(amount = new_payment.amount))]
pub async fn record_payment(
    db: &DatabaseConnection,
    settings: &BillingSettings,
    bill_id: i64,
    new_payment: NewPayment,
) -> Result<PaymentReceipt> {
    validate_payment_amount(new_payment.amount)?;

    let txn = db.begin().await?;
    let bill_row = find_bill_row(&txn, bill_id).await?;

    let earlier = match settings.settle_against {
        SettleAgainst::Total => 0.0,
        SettleAgainst::Balance => completed_total_for_bill(&txn, bill_id).await?,
    };

    let payment_row = new_payment
        .into_active_model(bill_row.id, bill_row.tenant_id, chrono::Utc::now().naive_utc())
        .insert(&txn)
        .await?;

    let status = settle_status(
        bill_row.payment_status,
        bill_row.total_amount,
        earlier + payment_row.amount,
    );
    let bill = update_bill(
        &txn,
        bill_id,
        BillUpdate {
            payment_status: Some(status),
            payment_date: Some(Some(payment_row.payment_date)),
            payment_method: Some(Some(payment_row.payment_method)),
            ..Default::default()
        },
    )
    .await?;

    txn.commit().await?;

    info!(bill_id, payment_id = payment_row.id, %status, "Payment recorded");
    Ok(PaymentReceipt {
        bill,
        payment: payment_row.into(),
    })
}

/// Deletes a bill. Irreversible.
///
/// Payments are never cascaded: while any payment still references the bill
/// the delete is refused and the operator must remove or correct them first.
///
/// # Errors
/// Returns [`Error::BillHasPayments`] when payments reference the bill and
/// [`Error::BillNotFound`] when it does not exist.
pub async fn delete_bill(db: &DatabaseConnection, bill_id: i64) -> Result<()> {
    let count = Payment::find()
        .filter(payment::Column::BillId.eq(bill_id))
        .count(db)
        .await?;
    if count > 0 {
        return Err(Error::BillHasPayments { bill_id, count });
    }

    let result = Bill::delete_by_id(bill_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::BillNotFound { id: bill_id });
    }
    warn!(bill_id, "Bill deleted");
    Ok(())
}

/// Operator edit of a bill. Any field may change, including forcing a status
/// the lifecycle would not reach on its own.
///
/// # Errors
/// Returns an error if an amount is not finite, the bill does not exist, or
/// the database update fails.
pub async fn override_bill(
    db: &DatabaseConnection,
    bill_id: i64,
    update: BillUpdate,
) -> Result<models::Bill> {
    for amount in [
        update.rent_amount,
        update.electricity_charges,
        update.adjustments,
        update.total_amount,
    ]
    .into_iter()
    .flatten()
    {
        if !amount.is_finite() {
            return Err(Error::InvalidAmount { amount });
        }
    }

    let current = find_bill_row(db, bill_id).await?;
    if let Some(status) = update.payment_status {
        if !current.payment_status.can_transition_to(status) {
            warn!(
                bill_id,
                from = %current.payment_status,
                to = %status,
                "Bill status forced backwards by operator"
            );
        }
    }
    update_bill(db, bill_id, update).await
}

/// Applies each tenant's newest billed reading to their last known reading
/// where it is ahead. Used when bills are generated without syncing the
/// tenant reading. Returns the number of tenants updated.
pub async fn reconcile_tenant_readings(db: &DatabaseConnection) -> Result<usize> {
    let mut updated = 0;
    for tenant in get_all_tenants(db).await? {
        let newest = get_bills_for_tenant(db, tenant.id)
            .await?
            .iter()
            .map(|b| b.electricity_reading)
            .max();
        if let Some(reading) = newest.filter(|r| *r > tenant.previous_reading()) {
            record_meter_reading(db, tenant.id, reading).await?;
            updated += 1;
        }
    }
    if updated > 0 {
        info!("Reconciled meter readings for {updated} tenant(s)");
    }
    Ok(updated)
}

/// Days a bill is past due on `today`; `0` for settled bills.
#[must_use]
pub fn days_overdue_for(bill: &models::Bill, today: NaiveDate) -> i64 {
    if bill.payment_status.is_outstanding() {
        billing::days_overdue(bill.due_date, today)
    } else {
        0
    }
}

/// Whether money is still owed on a bill whose due date has passed.
#[must_use]
pub fn is_overdue(bill: &models::Bill, today: NaiveDate) -> bool {
    days_overdue_for(bill, today) > 0
}

/// Bucket for a number of days overdue.
#[must_use]
pub const fn aging_bucket(days_overdue: i64) -> AgingBucket {
    AgingBucket::from_days(days_overdue)
}

/// Age class of an outstanding bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    /// Not yet due
    Current,
    /// 1-30 days overdue
    Days1To30,
    /// 31-60 days overdue
    Days31To60,
    /// 61-90 days overdue
    Days61To90,
    /// More than 90 days overdue
    Over90,
}

impl AgingBucket {
    /// All buckets, youngest first.
    pub const ALL: [Self; 5] = [
        Self::Current,
        Self::Days1To30,
        Self::Days31To60,
        Self::Days61To90,
        Self::Over90,
    ];

    /// Bucket for a number of days overdue.
    #[must_use]
    pub const fn from_days(days_overdue: i64) -> Self {
        match days_overdue {
            i64::MIN..=0 => Self::Current,
            1..=30 => Self::Days1To30,
            31..=60 => Self::Days31To60,
            61..=90 => Self::Days61To90,
            _ => Self::Over90,
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Days1To30 => "1-30 days",
            Self::Days31To60 => "31-60 days",
            Self::Days61To90 => "61-90 days",
            Self::Over90 => "90+ days",
        }
    }
}
