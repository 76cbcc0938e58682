//! Account field rules applied at registration and by user management.

use crate::error::CoreError;

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_FULL_NAME_LEN: usize = 120;

/// Light structural e-mail check: one `@`, non-empty local part, a dot in
/// the domain, no whitespace. Deliverability is proven by the verification
/// code, not here.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let email = email.trim();
    let invalid = || CoreError::Validation(format!("'{email}' is not a valid e-mail address"));

    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_full_name(name: &str) -> Result<(), CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Full name must not be empty".into()));
    }
    if name.chars().count() > MAX_FULL_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Full name must be at most {MAX_FULL_NAME_LEN} characters"
        )));
    }
    Ok(())
}
