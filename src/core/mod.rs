/// Bill reads and patches
pub mod bill;

/// Pure billing arithmetic and billing periods
pub mod billing;

/// Per-room meter reading log
pub mod electricity;

/// Operating expenses
pub mod expense;

/// Bill lifecycle: generate, settle, delete, override, aging
pub mod invoice;

/// Payment reads and corrections
pub mod payment;

/// Text receipts, chat messages and share links
pub mod receipt;

/// Dashboard and breakdown reports over a snapshot
pub mod report;

/// Rooms, capacity and occupancy
pub mod room;

/// In-memory view of all entity collections
pub mod snapshot;

/// Tenants, meter readings, notice and departure
pub mod tenant;
