//! Entity module - Contains all SeaORM entity definitions for the entity store.
//! Column names are snake_case; the application-facing models live in [`crate::models`].
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod bill;
pub mod electricity_reading;
pub mod expense;
pub mod payment;
pub mod room;
pub mod tenant;

// Re-export specific types to avoid conflicts
pub use bill::{BillStatus, Column as BillColumn, Entity as Bill, Model as BillModel};
pub use electricity_reading::{
    Column as ElectricityReadingColumn, Entity as ElectricityReading,
    Model as ElectricityReadingModel,
};
pub use expense::{Column as ExpenseColumn, Entity as Expense, ExpenseCategory, Model as ExpenseModel};
pub use payment::{
    Column as PaymentColumn, Entity as Payment, Model as PaymentModel, PaymentMethod,
    PaymentStatus,
};
pub use room::{Column as RoomColumn, Entity as Room, Model as RoomModel, RoomStatus, RoomType};
pub use tenant::{Column as TenantColumn, Entity as Tenant, Model as TenantModel, TenantStatus};
