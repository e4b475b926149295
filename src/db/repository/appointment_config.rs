use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{AppointmentConfig, LocationType};

/// Fetch the override row for a date + location type, if any.
pub fn get_appointment_config(
    conn: &Connection,
    date: NaiveDate,
    location_type: LocationType,
) -> Result<Option<AppointmentConfig>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT date, location_type, is_available, slots_under_15, slots_over_15
         FROM appointment_config
         WHERE date = ?1 AND location_type = ?2",
    )?;
    let result = stmt.query_row(
        params![date.to_string(), location_type.as_str()],
        |row| {
            Ok(AppointmentConfig {
                date: NaiveDate::parse_from_str(&row.get::<_, String>(0)?, "%Y-%m-%d")
                    .unwrap_or_default(),
                location_type: LocationType::from_str(&row.get::<_, String>(1)?)
                    .unwrap_or(LocationType::Outreach),
                is_available: row.get(2)?,
                slots_under_15: row.get(3)?,
                slots_over_15: row.get(4)?,
            })
        },
    );
    match result {
        Ok(config) => Ok(Some(config)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert or replace the override row for a date + location type.
/// Administered by staff tooling; exposed here for provisioning and tests.
pub fn upsert_appointment_config(
    conn: &Connection,
    config: &AppointmentConfig,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointment_config
             (date, location_type, is_available, slots_under_15, slots_over_15)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (date, location_type) DO UPDATE SET
             is_available = excluded.is_available,
             slots_under_15 = excluded.slots_under_15,
             slots_over_15 = excluded.slots_over_15",
        params![
            config.date.to_string(),
            config.location_type.as_str(),
            config.is_available,
            config.slots_under_15,
            config.slots_over_15,
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn absent_config_returns_none() {
        let conn = open_memory_database().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 11).unwrap();
        assert!(get_appointment_config(&conn, date, LocationType::ResourceCenter)
            .unwrap()
            .is_none());
    }

    #[test]
    fn upsert_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 11).unwrap();
        let config = AppointmentConfig {
            date,
            location_type: LocationType::ResourceCenter,
            is_available: true,
            slots_under_15: Some(2),
            slots_over_15: Some(4),
        };
        upsert_appointment_config(&conn, &config).unwrap();

        let loaded = get_appointment_config(&conn, date, LocationType::ResourceCenter)
            .unwrap()
            .unwrap();
        assert!(loaded.is_available);
        assert_eq!(loaded.slots_under_15, Some(2));
        assert_eq!(loaded.slots_over_15, Some(4));
    }

    #[test]
    fn upsert_replaces_existing_row() {
        let conn = open_memory_database().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 11).unwrap();
        let mut config = AppointmentConfig {
            date,
            location_type: LocationType::Outreach,
            is_available: true,
            slots_under_15: None,
            slots_over_15: None,
        };
        upsert_appointment_config(&conn, &config).unwrap();

        config.is_available = false;
        upsert_appointment_config(&conn, &config).unwrap();

        let loaded = get_appointment_config(&conn, date, LocationType::Outreach)
            .unwrap()
            .unwrap();
        assert!(!loaded.is_available);
    }

    #[test]
    fn config_is_scoped_per_location_type() {
        let conn = open_memory_database().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 11).unwrap();
        upsert_appointment_config(
            &conn,
            &AppointmentConfig {
                date,
                location_type: LocationType::Outreach,
                is_available: false,
                slots_under_15: None,
                slots_over_15: None,
            },
        )
        .unwrap();

        assert!(get_appointment_config(&conn, date, LocationType::ResourceCenter)
            .unwrap()
            .is_none());
    }
}
