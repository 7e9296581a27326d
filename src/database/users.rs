//! User and auth token store
//!
//! One user per device identifier (schema-enforced). Tokens are stored
//! hashed; the plaintext secret only ever exists in the auth response.

use crate::database::DbResult;
use crate::models::User;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        device_id: row.get(1)?,
        created_at: row.get(2)?,
        last_seen: row.get(3)?,
    })
}

/// Insert a new user
pub fn create_user(conn: &Connection, user: &User) -> DbResult<()> {
    conn.execute(
        "INSERT INTO users (id, device_id, created_at, last_seen)
         VALUES (?1, ?2, ?3, ?4)",
        params![user.id, user.device_id, user.created_at, user.last_seen],
    )?;
    Ok(())
}

/// Look up a user by device identifier
pub fn get_user_by_device_id(conn: &Connection, device_id: &str) -> DbResult<Option<User>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, device_id, created_at, last_seen FROM users WHERE device_id = ?1",
    )?;
    let mut rows = stmt.query(params![device_id])?;
    match rows.next()? {
        Some(row) => Ok(Some(user_from_row(row)?)),
        None => Ok(None),
    }
}

/// Bump a user's last_seen timestamp
pub fn update_user_last_seen(conn: &Connection, user_id: &str) -> DbResult<()> {
    conn.execute(
        "UPDATE users SET last_seen = ?1 WHERE id = ?2",
        params![Utc::now(), user_id],
    )?;
    Ok(())
}

/// Store a hashed bearer token with its expiry
pub fn insert_auth_token(
    conn: &Connection,
    token_hash: &str,
    user_id: &str,
    expires_at: DateTime<Utc>,
) -> DbResult<()> {
    conn.execute(
        "INSERT INTO auth_tokens (token_hash, user_id, created_at, expires_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![token_hash, user_id, Utc::now(), expires_at],
    )?;
    Ok(())
}

/// Delete tokens whose expiry has passed, returning how many were removed
///
/// Called opportunistically when new tokens are issued so the table does
/// not grow without bound.
pub fn delete_expired_tokens(conn: &Connection) -> DbResult<usize> {
    conn.execute(
        "DELETE FROM auth_tokens WHERE expires_at < ?1",
        params![Utc::now()],
    )
}

/// Look up a token by hash, returning (user_id, expires_at)
pub fn get_auth_token(
    conn: &Connection,
    token_hash: &str,
) -> DbResult<Option<(String, DateTime<Utc>)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT user_id, expires_at FROM auth_tokens WHERE token_hash = ?1",
    )?;
    let mut rows = stmt.query(params![token_hash])?;
    match rows.next()? {
        Some(row) => Ok(Some((row.get(0)?, row.get(1)?))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_db;
    use chrono::Duration;

    fn make_user(device_id: &str) -> User {
        let now = Utc::now();
        User {
            id: uuid::Uuid::new_v4().to_string(),
            device_id: device_id.to_string(),
            created_at: now,
            last_seen: now,
        }
    }

    #[test]
    fn create_and_find_by_device() {
        let conn = test_db();
        let user = make_user("device-abc");
        create_user(&conn, &user).unwrap();

        let found = get_user_by_device_id(&conn, "device-abc").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(get_user_by_device_id(&conn, "device-xyz").unwrap().is_none());
    }

    #[test]
    fn device_id_is_unique() {
        let conn = test_db();
        create_user(&conn, &make_user("device-abc")).unwrap();
        assert!(create_user(&conn, &make_user("device-abc")).is_err());
    }

    #[test]
    fn last_seen_moves_forward() {
        let conn = test_db();
        let user = make_user("device-abc");
        create_user(&conn, &user).unwrap();

        update_user_last_seen(&conn, &user.id).unwrap();
        let found = get_user_by_device_id(&conn, "device-abc").unwrap().unwrap();
        assert!(found.last_seen >= user.last_seen);
    }

    #[test]
    fn token_roundtrip() {
        let conn = test_db();
        let user = make_user("device-abc");
        create_user(&conn, &user).unwrap();

        let expires = Utc::now() + Duration::days(365);
        insert_auth_token(&conn, "hash-1", &user.id, expires).unwrap();

        let (user_id, expires_at) = get_auth_token(&conn, "hash-1").unwrap().unwrap();
        assert_eq!(user_id, user.id);
        assert_eq!(expires_at, expires);
        assert!(get_auth_token(&conn, "hash-2").unwrap().is_none());
    }

    #[test]
    fn expired_tokens_are_purged_and_live_ones_kept() {
        let conn = test_db();
        let user = make_user("device-abc");
        create_user(&conn, &user).unwrap();

        insert_auth_token(&conn, "hash-old", &user.id, Utc::now() - Duration::days(1)).unwrap();
        insert_auth_token(&conn, "hash-live", &user.id, Utc::now() + Duration::days(1)).unwrap();

        assert_eq!(delete_expired_tokens(&conn).unwrap(), 1);
        assert!(get_auth_token(&conn, "hash-old").unwrap().is_none());
        assert!(get_auth_token(&conn, "hash-live").unwrap().is_some());
    }
}
