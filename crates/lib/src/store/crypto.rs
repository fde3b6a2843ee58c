//! Password hashing for stored users (Argon2id, PHC string format).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core},
};

use super::errors::StoreError;
use crate::Result;

/// Hash a password using Argon2id with a random salt.
///
/// The returned PHC string embeds the salt and parameters.
pub fn hash_password(password: impl AsRef<str>) -> Result<String> {
    let salt = SaltString::generate(&mut rand_core::OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map_err(|e| StoreError::PasswordHash {
            reason: e.to_string(),
        })?
        .to_string();

    Ok(hash)
}

/// Verify a password against its stored hash.
///
/// Any mismatch, including an unparsable hash, is reported as
/// [`StoreError::InvalidCredentials`].
pub fn verify_password(password: impl AsRef<str>, password_hash: impl AsRef<str>) -> Result<()> {
    let parsed = PasswordHash::new(password_hash.as_ref())
        .map_err(|_| StoreError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed)
        .map_err(|_| StoreError::InvalidCredentials.into())
}
