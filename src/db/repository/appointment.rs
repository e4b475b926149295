use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{AgeGroup, Appointment, AppointmentStatus, LocationType};

/// Bookings per time slot for one date + location type, split by age pool.
/// Cancelled appointments are excluded at the query level and never count
/// against capacity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SlotCounts {
    pub under_15: u32,
    pub over_15: u32,
}

fn map_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: parse_uuid(&row.get::<_, String>(0)?),
        user_id: parse_uuid(&row.get::<_, String>(1)?),
        date: NaiveDate::parse_from_str(&row.get::<_, String>(2)?, "%Y-%m-%d")
            .unwrap_or_default(),
        time: row.get(3)?,
        location_type: LocationType::from_str(&row.get::<_, String>(4)?)
            .unwrap_or(LocationType::Outreach),
        outreach_location_id: row
            .get::<_, Option<String>>(5)?
            .and_then(|s| Uuid::parse_str(&s).ok()),
        age_group: row
            .get::<_, Option<String>>(6)?
            .and_then(|s| AgeGroup::from_str(&s).ok()),
        status: AppointmentStatus::from_str(&row.get::<_, String>(7)?)
            .unwrap_or(AppointmentStatus::Pending),
        purpose: row.get(8)?,
        notes: row.get(9)?,
        service_fee: row.get(10)?,
        created_at: NaiveDateTime::parse_from_str(
            &row.get::<_, String>(11)?,
            "%Y-%m-%d %H:%M:%S",
        )
        .unwrap_or_default(),
    })
}

fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap_or_default()
}

const APPOINTMENT_COLUMNS: &str = "id, user_id, date, time, location_type, \
     outreach_location_id, age_group, status, purpose, notes, service_fee, created_at";

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, user_id, date, time, location_type,
             outreach_location_id, age_group, status, purpose, notes, service_fee, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            appt.id.to_string(),
            appt.user_id.to_string(),
            appt.date.to_string(),
            appt.time,
            appt.location_type.as_str(),
            appt.outreach_location_id.map(|id| id.to_string()),
            appt.age_group.map(|g| g.as_str()),
            appt.status.as_str(),
            appt.purpose,
            appt.notes,
            appt.service_fee,
            appt.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"
    ))?;
    let result = stmt.query_row(params![id.to_string()], map_appointment);
    match result {
        Ok(appt) => Ok(Some(appt)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// A user's appointments, newest first.
pub fn appointments_for_user(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE user_id = ?1
         ORDER BY date DESC, time DESC"
    ))?;
    let rows = stmt.query_map(params![user_id.to_string()], map_appointment)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::from)
}

/// Non-cancelled bookings per (time, age pool) for a date + location type.
/// Rows with no age group (outreach, or users with no age on file) are
/// counted in neither pool.
pub fn booked_counts_for_date(
    conn: &Connection,
    date: NaiveDate,
    location_type: LocationType,
) -> Result<HashMap<String, SlotCounts>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT time, age_group, COUNT(*) FROM appointments
         WHERE date = ?1 AND location_type = ?2 AND status != ?3
         GROUP BY time, age_group",
    )?;
    let rows = stmt.query_map(
        params![
            date.to_string(),
            location_type.as_str(),
            AppointmentStatus::Cancelled.as_str()
        ],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, i64>(2)?,
            ))
        },
    )?;

    let mut counts: HashMap<String, SlotCounts> = HashMap::new();
    for row in rows {
        let (time, group, count) = row?;
        let entry = counts.entry(time).or_default();
        match group.as_deref().and_then(|s| AgeGroup::from_str(s).ok()) {
            Some(AgeGroup::Under15) => entry.under_15 += count as u32,
            Some(AgeGroup::Over15) => entry.over_15 += count as u32,
            None => {}
        }
    }
    Ok(counts)
}

/// Move an appointment to a new slot, resetting its status.
pub fn update_appointment_slot(
    conn: &Connection,
    id: &Uuid,
    date: NaiveDate,
    time: &str,
    status: AppointmentStatus,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET date = ?1, time = ?2, status = ?3 WHERE id = ?4",
        params![date.to_string(), time, status.as_str(), id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn update_appointment_status(
    conn: &Connection,
    id: &Uuid,
    status: AppointmentStatus,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
