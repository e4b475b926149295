//! Slot availability and booking engine.
//!
//! Two capacity regimes share one calculator: the Resource Center
//! (Tue/Thu, per-slot age-partitioned pools) and Outreach clinics
//! (weekdays, uncapped). Booking, reschedule and cancellation are
//! transactions that re-check availability at write time.

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod capacity;
pub mod reschedule;
pub mod status;

pub use availability::{availability_for_date, DayAvailability, SlotAvailability};
pub use booking::{create_booking, BookingRequest};
pub use reschedule::reschedule_appointment;
pub use status::cancel_appointment;

use thiserror::Error;

use crate::db::DatabaseError;

/// Name used in notifications and confirmations for the fixed clinic site.
pub const RESOURCE_CENTER_NAME: &str = "Resource Center";

/// Failure modes of the booking engine. `SlotUnavailable` is the conflict
/// case clients handle by offering another time; the rest map onto the
/// usual validation/ownership/not-found taxonomy.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Slot not available: {0}")]
    SlotUnavailable(String),

    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error("Appointment belongs to another user")]
    NotOwner,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

// Transaction begin/commit surface raw rusqlite errors.
impl From<rusqlite::Error> for BookingError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(DatabaseError::Sqlite(e))
    }
}
