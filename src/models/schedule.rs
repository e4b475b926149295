use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::LocationType;

/// Sparse per-date override for a location type. Absence of a row means
/// the default calendar and capacity policy applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentConfig {
    pub date: NaiveDate,
    pub location_type: LocationType,
    /// Hard override: `false` closes the date entirely.
    pub is_available: bool,
    /// Resource Center pool overrides. `None` keeps the default.
    pub slots_under_15: Option<u32>,
    pub slots_over_15: Option<u32>,
}
