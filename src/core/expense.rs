//! Expense repository - CRUD for operating expenses.

use crate::{
    entities::{Expense, expense},
    errors::{Error, Result},
    models::{self, ExpenseUpdate, NewExpense},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, prelude::*};
use tracing::debug;

fn validate_amount(amount: f64) -> Result<()> {
    if amount <= 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::validation("Expense description cannot be empty"));
    }
    Ok(())
}

/// Retrieves all expenses, newest first.
pub async fn get_all_expenses<C>(db: &C) -> Result<Vec<models::Expense>>
where
    C: ConnectionTrait,
{
    let rows = Expense::find()
        .order_by_desc(expense::Column::ExpenseDate)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Finds an expense by id.
pub async fn get_expense_by_id<C>(db: &C, expense_id: i64) -> Result<Option<models::Expense>>
where
    C: ConnectionTrait,
{
    Ok(Expense::find_by_id(expense_id).one(db).await?.map(Into::into))
}

/// Expenses dated between `from` and `to`, both inclusive.
pub async fn get_expenses_between<C>(
    db: &C,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<models::Expense>>
where
    C: ConnectionTrait,
{
    let rows = Expense::find()
        .filter(expense::Column::ExpenseDate.between(from, to))
        .order_by_asc(expense::Column::ExpenseDate)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Logs an expense.
///
/// # Errors
/// Returns an error if the description is empty, the amount is not positive
/// and finite, or the database insert fails.
pub async fn create_expense<C>(db: &C, new_expense: NewExpense) -> Result<models::Expense>
where
    C: ConnectionTrait,
{
    validate_description(&new_expense.description)?;
    validate_amount(new_expense.amount)?;

    let now = chrono::Utc::now().naive_utc();
    let row = new_expense.into_active_model(now).insert(db).await?;
    debug!(expense_id = row.id, category = %row.category, amount = row.amount, "Expense logged");
    Ok(row.into())
}

/// Applies a partial update to an expense. Only fields present in `update` are written.
pub async fn update_expense<C>(
    db: &C,
    expense_id: i64,
    update: ExpenseUpdate,
) -> Result<models::Expense>
where
    C: ConnectionTrait,
{
    if let Some(description) = &update.description {
        validate_description(description)?;
    }
    if let Some(amount) = update.amount {
        validate_amount(amount)?;
    }

    let mut row: expense::ActiveModel = Expense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?
        .into();
    update.apply(&mut row);
    Ok(row.update(db).await?.into())
}

/// Deletes an expense.
pub async fn delete_expense<C>(db: &C, expense_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Expense::delete_by_id(expense_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ExpenseNotFound { id: expense_id });
    }
    Ok(())
}
