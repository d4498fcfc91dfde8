/// Minimum accepted password length at sign-up
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Basic email validation for sign-up and sign-in input
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("Invalid email format".to_string());
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err("Invalid email format".to_string());
    }
    if email.chars().any(char::is_whitespace) {
        return Err("Email cannot contain whitespace".to_string());
    }

    Ok(())
}

pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if trimmed.chars().count() > 100 {
        return Err("Name must be less than 100 characters".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(validate_email_format("ada@campus.edu").is_ok());
        assert!(validate_email_format("").is_err());
        assert!(validate_email_format("ada").is_err());
        assert!(validate_email_format("ada@campus").is_err());
        assert!(validate_email_format("@campus.edu").is_err());
        assert!(validate_email_format("a@b@campus.edu").is_err());
        assert!(validate_email_format("ada lovelace@campus.edu").is_err());
    }

    #[test]
    fn password_and_name() {
        assert!(validate_password_strength("short").is_err());
        assert!(validate_password_strength("long enough").is_ok());
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name("Ada").is_ok());
    }
}
