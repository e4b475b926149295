use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AgeGroup, AppointmentStatus, LocationType};

/// One reservation. The (date, time, location_type, outreach location)
/// tuple identifies a capacity bucket, not a unique appointment — several
/// appointments share a bucket up to its capacity. Rows are never deleted;
/// cancellation is a status value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Calendar day, no time-of-day component.
    pub date: NaiveDate,
    /// One of the 8 fixed "HH:MM" slot values.
    pub time: String,
    pub location_type: LocationType,
    pub outreach_location_id: Option<Uuid>,
    /// Resource Center only. Set once at creation, never recalculated.
    pub age_group: Option<AgeGroup>,
    pub status: AppointmentStatus,
    pub purpose: String,
    pub notes: Option<String>,
    /// Resource Center only.
    pub service_fee: Option<f64>,
    pub created_at: NaiveDateTime,
}
