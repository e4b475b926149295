use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::User;

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        full_name: row.get(1)?,
        phone: row.get(2)?,
        date_of_birth: row
            .get::<_, Option<String>>(3)?
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        age: row.get(4)?,
    })
}

const USER_COLUMNS: &str = "id, full_name, phone, date_of_birth, age";

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, full_name, phone, date_of_birth, age)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.id.to_string(),
            user.full_name,
            user.phone,
            user.date_of_birth.map(|d| d.to_string()),
            user.age,
        ],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<Option<User>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
    let result = stmt.query_row(params![id.to_string()], map_user);
    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Resolve a session token hash to its user. Expired sessions do not match.
pub fn find_user_by_session(
    conn: &Connection,
    token_hash: &str,
) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT u.{}
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token_hash = ?1
           AND (s.expires_at IS NULL OR s.expires_at > datetime('now'))",
        USER_COLUMNS.replace(", ", ", u.")
    ))?;
    let result = stmt.query_row(params![token_hash], map_user);
    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Register a session token hash for a user. Issuance lives in the identity
/// service; this is used by provisioning and tests.
pub fn insert_session(
    conn: &Connection,
    user_id: &Uuid,
    token_hash: &str,
    expires_at: Option<&str>,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?1, ?2, ?3)",
        params![token_hash, user_id.to_string(), expires_at],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn user(dob: Option<(i32, u32, u32)>, age: Option<u32>) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Otieno Odhiambo".into(),
            phone: Some("+254711000002".into()),
            date_of_birth: dob.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            age,
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        let u = user(Some((2014, 6, 1)), None);
        insert_user(&conn, &u).unwrap();

        let loaded = get_user(&conn, &u.id).unwrap().unwrap();
        assert_eq!(loaded.full_name, "Otieno Odhiambo");
        assert_eq!(loaded.date_of_birth, NaiveDate::from_ymd_opt(2014, 6, 1));
        assert_eq!(loaded.age, None);
    }

    #[test]
    fn session_lookup_resolves_user() {
        let conn = open_memory_database().unwrap();
        let u = user(None, Some(34));
        insert_user(&conn, &u).unwrap();
        insert_session(&conn, &u.id, "hash-abc", None).unwrap();

        let found = find_user_by_session(&conn, "hash-abc").unwrap().unwrap();
        assert_eq!(found.id, u.id);
        assert_eq!(found.age, Some(34));
    }

    #[test]
    fn unknown_token_resolves_nothing() {
        let conn = open_memory_database().unwrap();
        assert!(find_user_by_session(&conn, "no-such-hash")
            .unwrap()
            .is_none());
    }

    #[test]
    fn expired_session_does_not_match() {
        let conn = open_memory_database().unwrap();
        let u = user(None, None);
        insert_user(&conn, &u).unwrap();
        insert_session(&conn, &u.id, "hash-old", Some("2020-01-01 00:00:00")).unwrap();

        assert!(find_user_by_session(&conn, "hash-old").unwrap().is_none());
    }
}
