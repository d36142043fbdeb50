//! Reusable validation rules for `validator` derives.

use std::borrow::Cow;

use validator::ValidationError;

/// Organizational mail domain every participant address must belong to.
pub const ORG_EMAIL_DOMAIN: &str = "@schools.nyc.gov";

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Participant name, measured after trimming surrounding whitespace.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len < NAME_MIN_CHARS {
        return Err(rule_error(
            "name_too_short",
            "Name must be at least 2 characters",
        ));
    }
    if len > NAME_MAX_CHARS {
        return Err(rule_error(
            "name_too_long",
            "Name must be less than 100 characters",
        ));
    }
    Ok(())
}

/// Suffix check runs on the lowercased address.
pub fn validate_org_email(email: &str) -> Result<(), ValidationError> {
    if has_org_domain(email) {
        Ok(())
    } else {
        Err(rule_error(
            "email_domain",
            "Email must be from @schools.nyc.gov domain",
        ))
    }
}

pub fn has_org_domain(email: &str) -> bool {
    email.to_lowercase().ends_with(ORG_EMAIL_DOMAIN)
}
