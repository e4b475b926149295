//! Availability calculator.
//!
//! Combines the calendar policy, the capacity model and current bookings
//! into a per-slot availability list for one date. Consulted read-only by
//! the availability endpoint and re-run as the authoritative admission
//! check inside the booking and reschedule transactions.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::repository::{booked_counts_for_date, get_appointment_config, SlotCounts};
use crate::db::DatabaseError;
use crate::models::{AgeGroup, LocationType};
use crate::scheduling::calendar::{is_date_available, TIME_SLOTS};
use crate::scheduling::capacity::{resource_center_allowance, PoolAllowance};

/// Availability of one (date, slot) combination.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub time: String,
    pub available: bool,
    /// Which age pool the report applies to; absent for outreach and for
    /// callers with no age on file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_for_age_group: Option<AgeGroup>,
    /// Remaining Resource Center capacity; absent for outreach.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_count: Option<u32>,
}

/// Full-day availability report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub date_available: bool,
    pub slots: Vec<SlotAvailability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DayAvailability {
    /// All 8 slots closed, with a reason for the citizen.
    fn closed(message: String) -> Self {
        Self {
            date_available: false,
            slots: TIME_SLOTS
                .iter()
                .map(|&time| SlotAvailability {
                    time: time.into(),
                    available: false,
                    available_for_age_group: None,
                    slot_count: None,
                })
                .collect(),
            message: Some(message),
        }
    }

    pub fn slot(&self, time: &str) -> Option<&SlotAvailability> {
        self.slots.iter().find(|s| s.time == time)
    }
}

/// Compute per-slot availability for a date.
///
/// Short-circuits when the calendar policy rejects the date or a config
/// row closes it — no per-slot counting happens in that case. Cancelled
/// appointments never count against capacity.
pub fn availability_for_date(
    conn: &Connection,
    date: NaiveDate,
    location_type: LocationType,
    age_group: Option<AgeGroup>,
) -> Result<DayAvailability, DatabaseError> {
    if !is_date_available(date, location_type) {
        let message = match location_type {
            LocationType::ResourceCenter => {
                "The Resource Center is open on Tuesdays and Thursdays only.".to_string()
            }
            LocationType::Outreach => {
                "Outreach clinics run on weekdays only.".to_string()
            }
        };
        return Ok(DayAvailability::closed(message));
    }

    let config = get_appointment_config(conn, date, location_type)?;
    if let Some(c) = &config {
        if !c.is_available {
            return Ok(DayAvailability::closed(
                "The selected date is not open for booking.".to_string(),
            ));
        }
    }

    let slots = match location_type {
        // Uncapped: a legal, open date means every slot is bookable.
        LocationType::Outreach => TIME_SLOTS
            .iter()
            .map(|&time| SlotAvailability {
                time: time.into(),
                available: true,
                available_for_age_group: None,
                slot_count: None,
            })
            .collect(),
        LocationType::ResourceCenter => {
            let allowance = resource_center_allowance(config.as_ref());
            let counts = booked_counts_for_date(conn, date, location_type)?;
            TIME_SLOTS
                .iter()
                .map(|&time| {
                    let booked = counts.get(time).copied().unwrap_or_default();
                    resource_center_slot(time, allowance, booked, age_group)
                })
                .collect()
        }
    };

    Ok(DayAvailability {
        date_available: true,
        slots,
        message: None,
    })
}

fn resource_center_slot(
    time: &str,
    allowance: PoolAllowance,
    booked: SlotCounts,
    age_group: Option<AgeGroup>,
) -> SlotAvailability {
    let remaining_under = allowance.under_15.saturating_sub(booked.under_15);
    let remaining_over = allowance.over_15.saturating_sub(booked.over_15);

    let remaining = match age_group {
        Some(AgeGroup::Under15) => remaining_under,
        Some(AgeGroup::Over15) => remaining_over,
        None => remaining_under + remaining_over,
    };

    SlotAvailability {
        time: time.into(),
        available: remaining > 0,
        available_for_age_group: age_group,
        slot_count: Some(remaining),
    }
}
