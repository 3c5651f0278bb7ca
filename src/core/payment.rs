//! Payment repository - Reads, corrects and removes payments.
//!
//! New payments are recorded through [`crate::core::invoice::record_payment`]
//! so the bill's status moves with them. Corrections here do not touch the
//! bill; an operator re-settles it with an override when needed.

use crate::{
    entities::{Payment, PaymentStatus, payment},
    errors::{Error, Result},
    models::{self, PaymentUpdate},
};
use sea_orm::{QueryOrder, prelude::*};
use tracing::warn;

/// Rejects amounts that are zero, negative or not finite.
pub(crate) fn validate_payment_amount(amount: f64) -> Result<()> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Retrieves all payments, newest first.
pub async fn get_all_payments<C>(db: &C) -> Result<Vec<models::Payment>>
where
    C: ConnectionTrait,
{
    let rows = Payment::find()
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Finds a payment by id.
pub async fn get_payment_by_id<C>(db: &C, payment_id: i64) -> Result<Option<models::Payment>>
where
    C: ConnectionTrait,
{
    Ok(Payment::find_by_id(payment_id).one(db).await?.map(Into::into))
}

/// All payments recorded against a bill, oldest first.
pub async fn get_payments_for_bill<C>(db: &C, bill_id: i64) -> Result<Vec<models::Payment>>
where
    C: ConnectionTrait,
{
    let rows = Payment::find()
        .filter(payment::Column::BillId.eq(bill_id))
        .order_by_asc(payment::Column::PaymentDate)
        .order_by_asc(payment::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// All payments made by a tenant, newest first.
pub async fn get_payments_for_tenant<C>(db: &C, tenant_id: i64) -> Result<Vec<models::Payment>>
where
    C: ConnectionTrait,
{
    let rows = Payment::find()
        .filter(payment::Column::TenantId.eq(tenant_id))
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Sum of completed payments recorded against a bill.
pub async fn completed_total_for_bill<C>(db: &C, bill_id: i64) -> Result<f64>
where
    C: ConnectionTrait,
{
    let rows = Payment::find()
        .filter(payment::Column::BillId.eq(bill_id))
        .filter(payment::Column::Status.eq(PaymentStatus::Completed))
        .all(db)
        .await?;
    Ok(rows.iter().map(|p| p.amount).sum())
}

/// Operator correction of a payment. Only fields present in `update` are written.
///
/// # Errors
/// Returns an error if a new amount is not positive and finite, the payment
/// does not exist, or the database update fails.
pub async fn update_payment<C>(
    db: &C,
    payment_id: i64,
    update: PaymentUpdate,
) -> Result<models::Payment>
where
    C: ConnectionTrait,
{
    if let Some(amount) = update.amount {
        validate_payment_amount(amount)?;
    }

    let mut row: payment::ActiveModel = Payment::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or(Error::PaymentNotFound { id: payment_id })?
        .into();

    update.apply(&mut row);
    let updated = row.update(db).await?;
    warn!(payment_id, bill_id = updated.bill_id, "Payment corrected by operator");
    Ok(updated.into())
}

/// Removes a payment. The bill it settled keeps its status.
pub async fn delete_payment<C>(db: &C, payment_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Payment::delete_by_id(payment_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::PaymentNotFound { id: payment_id });
    }
    warn!(payment_id, "Payment deleted by operator");
    Ok(())
}
