//! Password hashing (argon2id, PHC string format)

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    Hash(String),

    #[error("Invalid hash format: {0}")]
    InvalidHash(String),

    #[error("Password does not match")]
    Mismatch,
}

/// Hash `password` with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check `password` against a stored PHC hash
pub fn check_password(password: &str, hashed_password: &str) -> Result<(), PasswordError> {
    let parsed_hash =
        PasswordHash::new(hashed_password).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_check() {
        let hashed = hash_password("secret123").unwrap();
        assert!(hashed.starts_with("$argon2"));
        assert!(check_password("secret123", &hashed).is_ok());
        assert_eq!(
            check_password("wrong-password", &hashed),
            Err(PasswordError::Mismatch)
        );
    }

    #[test]
    fn test_salt_is_random() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(matches!(
            check_password("secret123", "not-a-phc-string"),
            Err(PasswordError::InvalidHash(_))
        ));
    }
}
