//! Anonymous device authentication
//!
//! One user per device identifier. Issues opaque bearer tokens; only the
//! SHA-256 hash is stored, so a leaked database cannot be replayed as
//! credentials.

use crate::database::{users, Db};
use crate::error::{Result, ScanError};
use crate::models::{AuthResponse, User};
use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

const TOKEN_PREFIX: &str = "cs_";
const TOKEN_SECRET_LEN: usize = 48;

fn generate_secret(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| rng.sample(rand::distributions::Alphanumeric) as char)
        .collect()
}

fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

pub struct AuthService {
    db: Db,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(db: Db, token_ttl_days: i64) -> Self {
        Self {
            db,
            token_ttl: Duration::days(token_ttl_days),
        }
    }

    /// Create or retrieve the user bound to this device and issue a token
    ///
    /// Repeat calls for a known device return the same user with a fresh
    /// token and bump its last_seen timestamp.
    pub fn authenticate_device(&self, device_id: &str) -> Result<AuthResponse> {
        let conn = self.db.lock().unwrap();

        let user = match users::get_user_by_device_id(&conn, device_id)? {
            Some(user) => {
                users::update_user_last_seen(&conn, &user.id)?;
                user
            }
            None => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4().to_string(),
                    device_id: device_id.to_string(),
                    created_at: now,
                    last_seen: now,
                };
                users::create_user(&conn, &user)?;
                log::info!("Created anonymous user for new device");
                user
            }
        };

        // Issuing a token is a natural moment to shed dead rows
        let purged = users::delete_expired_tokens(&conn)?;
        if purged > 0 {
            log::debug!("Purged {} expired auth tokens", purged);
        }

        let token = format!("{}{}", TOKEN_PREFIX, generate_secret(TOKEN_SECRET_LEN));
        users::insert_auth_token(
            &conn,
            &hash_secret(&token),
            &user.id,
            Utc::now() + self.token_ttl,
        )?;

        Ok(AuthResponse {
            user_id: user.id,
            token,
        })
    }

    /// Validate a bearer token, returning the user ID it belongs to
    pub fn validate_token(&self, token: &str) -> Result<String> {
        let conn = self.db.lock().unwrap();
        match users::get_auth_token(&conn, &hash_secret(token))? {
            Some((user_id, expires_at)) if expires_at > Utc::now() => Ok(user_id),
            _ => Err(ScanError::InvalidToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_db;
    use std::sync::{Arc, Mutex};

    fn auth_service() -> AuthService {
        AuthService::new(Arc::new(Mutex::new(test_db())), 365)
    }

    #[test]
    fn same_device_maps_to_same_user() {
        let auth = auth_service();

        let first = auth.authenticate_device("device-abc").unwrap();
        let second = auth.authenticate_device("device-abc").unwrap();

        assert_eq!(first.user_id, second.user_id);
        // Each authentication issues a fresh token
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn different_devices_map_to_different_users() {
        let auth = auth_service();

        let a = auth.authenticate_device("device-a").unwrap();
        let b = auth.authenticate_device("device-b").unwrap();
        assert_ne!(a.user_id, b.user_id);
    }

    #[test]
    fn issued_token_validates_to_its_user() {
        let auth = auth_service();

        let resp = auth.authenticate_device("device-abc").unwrap();
        let user_id = auth.validate_token(&resp.token).unwrap();
        assert_eq!(user_id, resp.user_id);
    }

    #[test]
    fn unknown_token_is_rejected() {
        let auth = auth_service();
        auth.authenticate_device("device-abc").unwrap();

        let err = auth.validate_token("cs_not_a_real_token").unwrap_err();
        assert!(matches!(err, ScanError::InvalidToken));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Zero-day TTL expires immediately
        let auth = AuthService::new(Arc::new(Mutex::new(test_db())), 0);

        let resp = auth.authenticate_device("device-abc").unwrap();
        let err = auth.validate_token(&resp.token).unwrap_err();
        assert!(matches!(err, ScanError::InvalidToken));
    }

    #[test]
    fn authentication_purges_expired_tokens() {
        let db: crate::database::Db = Arc::new(Mutex::new(test_db()));

        // Zero-day TTL means the token is already expired when stored
        let expired_issuer = AuthService::new(Arc::clone(&db), 0);
        expired_issuer.authenticate_device("device-abc").unwrap();

        let auth = AuthService::new(Arc::clone(&db), 365);
        auth.authenticate_device("device-xyz").unwrap();

        let count: i64 = db
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM auth_tokens", [], |row| row.get(0))
            .unwrap();
        // Only the freshly issued token remains
        assert_eq!(count, 1);
    }

    #[test]
    fn tokens_are_long_and_prefixed() {
        let auth = auth_service();
        let resp = auth.authenticate_device("device-abc").unwrap();
        assert!(resp.token.starts_with(TOKEN_PREFIX));
        assert!(resp.token.len() >= TOKEN_SECRET_LEN);
    }
}
