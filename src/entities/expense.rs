//! Expense entity - Operating costs of the property.
//! Expenses are independent of tenants and bills and only feed reports.

use super::payment::PaymentMethod;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed list of expense categories.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Routine upkeep
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    /// Utility electricity bill
    #[sea_orm(string_value = "electricity")]
    Electricity,
    /// Water supply
    #[sea_orm(string_value = "water")]
    Water,
    /// Internet connection
    #[sea_orm(string_value = "internet")]
    Internet,
    /// Housekeeping
    #[sea_orm(string_value = "cleaning")]
    Cleaning,
    /// One-off repairs
    #[sea_orm(string_value = "repairs")]
    Repairs,
    /// Staff wages
    #[sea_orm(string_value = "salaries")]
    Salaries,
    /// Consumables
    #[sea_orm(string_value = "supplies")]
    Supplies,
    /// Property and municipal taxes
    #[sea_orm(string_value = "taxes")]
    Taxes,
    /// Anything else
    #[sea_orm(string_value = "other")]
    Other,
}

impl ExpenseCategory {
    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Maintenance => "Maintenance",
            Self::Electricity => "Electricity",
            Self::Water => "Water",
            Self::Internet => "Internet",
            Self::Cleaning => "Cleaning",
            Self::Repairs => "Repairs",
            Self::Salaries => "Salaries",
            Self::Supplies => "Supplies",
            Self::Taxes => "Taxes",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Date incurred
    pub expense_date: Date,
    /// Category
    pub category: ExpenseCategory,
    /// What was bought or paid for
    pub description: String,
    /// Amount spent
    pub amount: f64,
    /// How it was paid
    pub payment_method: PaymentMethod,
    /// Receipt number or file reference
    pub receipt_ref: Option<String>,
    /// When the row was created
    pub created_at: DateTime,
}

/// `Expense` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
