/// Entity store connection and table creation
pub mod database;

/// Back office settings and room seeds from config.toml
pub mod settings;

pub use settings::{BillingSettings, ReceiptSettings, RoomConfig, SettleAgainst, Settings};
