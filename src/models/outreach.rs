use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical outreach site. Reference data administered outside the
/// booking engine; only active locations accept bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachLocation {
    pub id: Uuid,
    pub name: String,
    pub county: String,
    pub active: bool,
}
