use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::OutreachLocation;

fn map_location(row: &Row<'_>) -> rusqlite::Result<OutreachLocation> {
    Ok(OutreachLocation {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        name: row.get(1)?,
        county: row.get(2)?,
        active: row.get(3)?,
    })
}

pub fn insert_outreach_location(
    conn: &Connection,
    location: &OutreachLocation,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO outreach_locations (id, name, county, active)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            location.id.to_string(),
            location.name,
            location.county,
            location.active
        ],
    )?;
    Ok(())
}

pub fn get_outreach_location(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<OutreachLocation>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, county, active FROM outreach_locations WHERE id = ?1",
    )?;
    let result = stmt.query_row(params![id.to_string()], map_location);
    match result {
        Ok(loc) => Ok(Some(loc)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Only active locations are offered to citizens.
pub fn list_active_outreach_locations(
    conn: &Connection,
) -> Result<Vec<OutreachLocation>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, county, active FROM outreach_locations
         WHERE active = 1
         ORDER BY county ASC, name ASC",
    )?;
    let rows = stmt.query_map([], map_location)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::from)
}
