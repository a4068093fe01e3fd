//! bcrypt password hashing.

pub use bcrypt::BcryptError;

/// Work factor for new hashes.
pub const BCRYPT_COST: u32 = 10;

/// Hash `password` with a fresh random salt at [`BCRYPT_COST`].
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, BCRYPT_COST)
}

/// Check `password` against a stored bcrypt hash. Malformed hashes never match.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(password, stored_hash) {
        Ok(matches) => matches,
        Err(err) => {
            tracing::warn!(error = %err, "Stored password hash is not a valid bcrypt hash");
            false
        }
    }
}
