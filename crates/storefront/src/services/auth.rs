//! Dashboard authentication.
//!
//! Two gates open the dashboard: a named account with an Argon2id
//! password hash, or the shared operator secret from configuration.
//! A failed login never reveals which gate was tried or whether the
//! account exists.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

use crate::db::dashboard_users::DashboardUserRepository;
use crate::error::Result;
use crate::models::{AuthContext, AuthMethod};
use crate::state::AppState;

/// Attempt a dashboard login.
///
/// A non-empty username selects the named-account gate; an empty
/// username falls back to the shared secret. Returns `None` on any
/// credential mismatch.
pub async fn authenticate(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<Option<AuthContext>> {
    let username = username.trim();

    if username.is_empty() {
        let expected = state.config().dashboard_password.expose_secret();
        if digests_match(password, expected) {
            return Ok(Some(AuthContext {
                auth: AuthMethod::SharedSecret,
            }));
        }
        return Ok(None);
    }

    let Some(user) = DashboardUserRepository::new(state.pool())
        .find_by_username(username)
        .await?
    else {
        // Burn a verification anyway so absent and present accounts
        // take comparable time.
        let _ = verify_password("$argon2id$v=19$m=19456,t=2,p=1$YWJjZGVmZ2hpamts$c29tZWhhc2g", password);
        return Ok(None);
    };

    if verify_password(&user.password_hash, password) {
        return Ok(Some(AuthContext {
            auth: AuthMethod::Identity {
                username: user.username,
            },
        }));
    }

    Ok(None)
}

/// Hash a password using Argon2id, for provisioning dashboard accounts.
///
/// # Errors
///
/// Returns error if hashing fails.
pub fn hash_password(password: &str) -> std::result::Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Compare two secrets by their SHA-256 digests.
///
/// Comparing fixed-width digests keeps the comparison independent of
/// where the first mismatching byte falls.
fn digests_match(candidate: &str, expected: &str) -> bool {
    Sha256::digest(candidate.as_bytes()) == Sha256::digest(expected.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password_round_trip() {
        let hash = hash_password("correct horse battery staple").expect("hashing succeeds");
        assert!(verify_password(&hash, "correct horse battery staple"));
        assert!(!verify_password(&hash, "wrong password"));
    }

    #[test]
    fn test_verify_password_rejects_malformed_hash() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }

    #[test]
    fn test_digests_match() {
        assert!(digests_match("secret", "secret"));
        assert!(!digests_match("secret", "Secret"));
        assert!(!digests_match("", "secret"));
    }
}
