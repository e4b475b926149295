//! Slot capacity model.
//!
//! The Resource Center partitions every time slot into two age pools that
//! fill independently; the split can be overridden per date by staff.
//! Outreach slots are uncapped — only the calendar and the hard per-date
//! close switch gate them.

use chrono::NaiveDate;

use crate::models::{AgeGroup, AppointmentConfig};

/// Default Resource Center pools per time slot: 6 under-15 + 9 over-15.
pub const DEFAULT_UNDER_15_SLOTS: u32 = 6;
pub const DEFAULT_OVER_15_SLOTS: u32 = 9;

/// Age at which a citizen moves from the `<15` pool to the `15+` pool.
pub const AGE_GROUP_THRESHOLD: u32 = 15;

/// Flat assessment fee charged for Resource Center visits, in KES.
/// Outreach visits are free.
pub const RESOURCE_CENTER_FEE: f64 = 200.0;

/// Per-slot allowance for the two Resource Center age pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAllowance {
    pub under_15: u32,
    pub over_15: u32,
}

impl Default for PoolAllowance {
    fn default() -> Self {
        Self {
            under_15: DEFAULT_UNDER_15_SLOTS,
            over_15: DEFAULT_OVER_15_SLOTS,
        }
    }
}

/// Resolve the Resource Center allowance for a date, applying any config
/// override. Each override field stands alone; an absent field keeps the
/// default pool size.
pub fn resource_center_allowance(config: Option<&AppointmentConfig>) -> PoolAllowance {
    let defaults = PoolAllowance::default();
    match config {
        Some(c) => PoolAllowance {
            under_15: c.slots_under_15.unwrap_or(defaults.under_15),
            over_15: c.slots_over_15.unwrap_or(defaults.over_15),
        },
        None => defaults,
    }
}

/// Derive the age group from a date of birth (preferred) or a stored age.
/// Returns `None` when neither is on file — "unknown", never a third group.
pub fn derive_age_group(
    date_of_birth: Option<NaiveDate>,
    age: Option<u32>,
    today: NaiveDate,
) -> Option<AgeGroup> {
    let years = match date_of_birth {
        Some(dob) => today.years_since(dob),
        None => age,
    }?;
    if years < AGE_GROUP_THRESHOLD {
        Some(AgeGroup::Under15)
    } else {
        Some(AgeGroup::Over15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationType;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn default_allowance_is_six_nine() {
        let allowance = resource_center_allowance(None);
        assert_eq!(allowance.under_15, 6);
        assert_eq!(allowance.over_15, 9);
        assert_eq!(allowance.under_15 + allowance.over_15, 15);
    }

    #[test]
    fn override_replaces_only_present_fields() {
        let config = AppointmentConfig {
            date: today(),
            location_type: LocationType::ResourceCenter,
            is_available: true,
            slots_under_15: Some(2),
            slots_over_15: None,
        };
        let allowance = resource_center_allowance(Some(&config));
        assert_eq!(allowance.under_15, 2);
        assert_eq!(allowance.over_15, 9);
    }

    #[test]
    fn age_group_from_stored_age() {
        assert_eq!(derive_age_group(None, Some(10), today()), Some(AgeGroup::Under15));
        assert_eq!(derive_age_group(None, Some(14), today()), Some(AgeGroup::Under15));
        assert_eq!(derive_age_group(None, Some(15), today()), Some(AgeGroup::Over15));
        assert_eq!(derive_age_group(None, Some(20), today()), Some(AgeGroup::Over15));
        assert_eq!(derive_age_group(None, Some(0), today()), Some(AgeGroup::Under15));
    }

    #[test]
    fn age_group_from_date_of_birth() {
        // Turns 15 the day after "today" — still under 15.
        let dob = NaiveDate::from_ymd_opt(2011, 8, 6).unwrap();
        assert_eq!(derive_age_group(Some(dob), None, today()), Some(AgeGroup::Under15));

        // Turned 15 exactly today.
        let dob = NaiveDate::from_ymd_opt(2011, 8, 5).unwrap();
        assert_eq!(derive_age_group(Some(dob), None, today()), Some(AgeGroup::Over15));
    }

    #[test]
    fn date_of_birth_wins_over_stored_age() {
        let dob = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(
            derive_age_group(Some(dob), Some(40), today()),
            Some(AgeGroup::Under15)
        );
    }

    #[test]
    fn unknown_age_is_none() {
        assert_eq!(derive_age_group(None, None, today()), None);
        // Future date of birth cannot be resolved to an age.
        let dob = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(derive_age_group(Some(dob), None, today()), None);
    }
}
