//! Bill repository - Reads and patches bills.
//!
//! Bills are created, settled and deleted through [`crate::core::invoice`],
//! which owns the lifecycle rules. This module is plain store access.

use crate::{
    core::billing::BillingPeriod,
    entities::{Bill, bill},
    errors::{Error, Result},
    models::{self, BillUpdate},
};
use sea_orm::{QueryOrder, prelude::*};

pub(crate) async fn find_row<C>(db: &C, bill_id: i64) -> Result<bill::Model>
where
    C: ConnectionTrait,
{
    Bill::find_by_id(bill_id)
        .one(db)
        .await?
        .ok_or(Error::BillNotFound { id: bill_id })
}

/// Retrieves all bills, newest bill date first.
pub async fn get_all_bills<C>(db: &C) -> Result<Vec<models::Bill>>
where
    C: ConnectionTrait,
{
    let rows = Bill::find()
        .order_by_desc(bill::Column::BillDate)
        .order_by_desc(bill::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Finds a bill by id.
pub async fn get_bill_by_id<C>(db: &C, bill_id: i64) -> Result<Option<models::Bill>>
where
    C: ConnectionTrait,
{
    Ok(Bill::find_by_id(bill_id).one(db).await?.map(Into::into))
}

/// All bills for one tenant, newest first.
pub async fn get_bills_for_tenant<C>(db: &C, tenant_id: i64) -> Result<Vec<models::Bill>>
where
    C: ConnectionTrait,
{
    let rows = Bill::find()
        .filter(bill::Column::TenantId.eq(tenant_id))
        .order_by_desc(bill::Column::BillDate)
        .order_by_desc(bill::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// The bill a tenant already has for `period`, if any.
pub async fn find_bill_for_period<C>(
    db: &C,
    tenant_id: i64,
    period: BillingPeriod,
) -> Result<Option<models::Bill>>
where
    C: ConnectionTrait,
{
    Ok(Bill::find()
        .filter(bill::Column::TenantId.eq(tenant_id))
        .filter(bill::Column::BillingPeriod.eq(period.to_string()))
        .one(db)
        .await?
        .map(Into::into))
}

/// Applies a partial update to a bill. Only fields present in `update` are written.
///
/// No lifecycle rule is checked here; see
/// [`crate::core::invoice::override_bill`] for the operator entry point.
pub async fn update_bill<C>(db: &C, bill_id: i64, update: BillUpdate) -> Result<models::Bill>
where
    C: ConnectionTrait,
{
    let mut row: bill::ActiveModel = find_row(db, bill_id).await?.into();
    update.apply(&mut row);
    Ok(row.update(db).await?.into())
}
