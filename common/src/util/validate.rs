use validator::{ValidateEmail, ValidationError};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_password(pwd: &str) -> Result<(), ValidationError> {
    if pwd.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new("password_too_short").with_message("Password must be at least 6 characters".into()));
    }
    Ok(())
}

pub fn validate_email_str(email: &str) -> Result<(), ValidationError> {
    if email.validate_email() { Ok(()) } else { Err(ValidationError::new("email").with_message("Invalid email format".into())) }
}
