//! Calendar policy — which calendar dates each location type may book.
//!
//! Pure predicates over `NaiveDate`; no holidays or exceptions are
//! modeled. Dates are wall-clock calendar days, weekday resolution is
//! locale-independent via `chrono::Weekday`.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::LocationType;

/// The 8 fixed daily booking slots, identical for both location types.
pub const TIME_SLOTS: [&str; 8] = [
    "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00",
];

/// The Resource Center runs clinics on Tuesdays and Thursdays only.
pub fn is_resource_center_date_available(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Tue | Weekday::Thu)
}

/// Outreach teams run on weekdays.
pub fn is_outreach_date_available(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_date_available(date: NaiveDate, location_type: LocationType) -> bool {
    match location_type {
        LocationType::ResourceCenter => is_resource_center_date_available(date),
        LocationType::Outreach => is_outreach_date_available(date),
    }
}

pub fn is_valid_time_slot(time: &str) -> bool {
    TIME_SLOTS.contains(&time)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-08-03 is a Monday; the following week covers all 7 weekdays.
    fn week_starting_monday() -> Vec<(NaiveDate, Weekday)> {
        (3..10)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2026, 8, d).unwrap();
                (date, date.weekday())
            })
            .collect()
    }

    #[test]
    fn resource_center_open_tuesday_and_thursday_only() {
        for (date, weekday) in week_starting_monday() {
            let expected = matches!(weekday, Weekday::Tue | Weekday::Thu);
            assert_eq!(
                is_resource_center_date_available(date),
                expected,
                "{weekday} mismatch"
            );
        }
    }

    #[test]
    fn outreach_open_monday_through_friday() {
        for (date, weekday) in week_starting_monday() {
            let expected = !matches!(weekday, Weekday::Sat | Weekday::Sun);
            assert_eq!(is_outreach_date_available(date), expected, "{weekday} mismatch");
        }
    }

    #[test]
    fn dispatch_by_location_type() {
        let tuesday = NaiveDate::from_ymd_opt(2026, 8, 4).unwrap();
        let friday = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert!(is_date_available(tuesday, LocationType::ResourceCenter));
        assert!(!is_date_available(friday, LocationType::ResourceCenter));
        assert!(is_date_available(friday, LocationType::Outreach));
    }

    #[test]
    fn slot_set_is_fixed() {
        assert_eq!(TIME_SLOTS.len(), 8);
        assert!(is_valid_time_slot("09:00"));
        assert!(is_valid_time_slot("16:00"));
        assert!(!is_valid_time_slot("08:00"));
        assert!(!is_valid_time_slot("17:00"));
        assert!(!is_valid_time_slot("9:00"));
        assert!(!is_valid_time_slot("09:30"));
    }
}
