//! Argon2 password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use nutrivision_core::ports::{AuthError, PasswordService};

/// Argon2id password service with a fresh random salt per hash.
#[derive(Default)]
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    /// A stored value that is not a PHC string is an error, not a mismatch.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = Argon2PasswordService::new();

        let hash = service.hash("broccoli-lover").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(service.verify("broccoli-lover", &hash).unwrap());
        assert!(!service.verify("broccoli-hater", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let service = Argon2PasswordService::new();

        let a = service.hash("same-password").unwrap();
        let b = service.hash("same-password").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_plaintext_hash_is_error() {
        let service = Argon2PasswordService::new();

        let result = service.verify("password", "password");
        assert!(matches!(result, Err(AuthError::HashingError(_))));
    }
}
