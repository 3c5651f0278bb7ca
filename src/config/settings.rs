//! Back office settings loaded from config.toml
//!
//! Billing constants, receipt presentation and the rooms to seed on first run
//! are read from a TOML file. Every field has a default, so an empty or
//! missing file yields a working configuration.

use crate::entities::{RoomStatus, RoomType};
use crate::errors::{Error, Result};
use crate::models::NewRoom;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Billing constants
    #[serde(default)]
    pub billing: BillingSettings,
    /// Receipt and share-link presentation
    #[serde(default)]
    pub receipt: ReceiptSettings,
    /// Rooms to create when missing
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

/// What a payment is compared against when settling a bill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleAgainst {
    /// Each payment on its own against the bill's original total
    #[default]
    Total,
    /// All completed payments together against the bill's total
    Balance,
}

/// Billing constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillingSettings {
    /// Electricity price per unit
    pub rate_per_unit: f64,
    /// Days between bill date and due date
    pub grace_period_days: i64,
    /// How payments settle a bill
    pub settle_against: SettleAgainst,
    /// Update the tenant's last reading in the same transaction as the bill
    pub sync_tenant_reading: bool,
    /// Months covered by the vacancy forecast
    pub forecast_months: u32,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            rate_per_unit: crate::core::billing::DEFAULT_RATE_PER_UNIT,
            grace_period_days: crate::core::billing::DEFAULT_GRACE_PERIOD_DAYS,
            settle_against: SettleAgainst::Total,
            sync_tenant_reading: true,
            forecast_months: 3,
        }
    }
}

/// Receipt and share-link presentation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReceiptSettings {
    /// Name printed at the top of receipts
    pub business_name: String,
    /// Prefix for money amounts
    pub currency_symbol: String,
    /// Country code added to bare 10-digit phone numbers
    pub country_code: String,
    /// Deep-link scheme of the messaging app
    pub share_scheme: String,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            business_name: "Rent Ledger".to_string(),
            currency_symbol: "₹".to_string(),
            country_code: "91".to_string(),
            share_scheme: "whatsapp".to_string(),
        }
    }
}

/// Configuration for a single seeded room
#[derive(Debug, Clone, Deserialize)]
pub struct RoomConfig {
    /// Room number, unique
    pub room_number: String,
    /// Floor, derived from the room number when absent
    #[serde(default)]
    pub floor: Option<i32>,
    /// Room layout
    pub room_type: RoomType,
    /// Bed count, defaults to the layout's
    #[serde(default)]
    pub capacity: Option<i32>,
    /// Monthly rent
    pub rent_amount: f64,
}

impl From<RoomConfig> for NewRoom {
    fn from(config: RoomConfig) -> Self {
        Self {
            room_number: config.room_number,
            floor: config.floor,
            room_type: config.room_type,
            capacity: config.capacity,
            rent_amount: config.rent_amount,
            status: RoomStatus::Vacant,
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    debug!("Loading settings from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads settings from `path`, or the defaults when the file does not exist.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Settings> {
    if path.as_ref().exists() {
        load_config(path)
    } else {
        info!(
            "No config file at {}, using default settings",
            path.as_ref().display()
        );
        Ok(Settings::default())
    }
}

/// Loads settings from the default location (./config.toml)
pub fn load_default_config() -> Result<Settings> {
    load_or_default("config.toml")
}
