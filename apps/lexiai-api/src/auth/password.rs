//! Password hashing with bcrypt

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// `false` on mismatch and on unreadable hashes alike
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters long");
    }
    Ok(())
}

/// Canonical form emails are stored and looked up in
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
