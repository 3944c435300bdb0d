//! Registration field rules.
//!
//! [`validate`] is a pure, total function of the submitted form and the
//! records already stored. Each field is checked independently and reports
//! at most one message: the first rule it violates.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::{Field, FieldErrors, RegistrationForm, UserRecord};

/// Minimum display name length, in characters, after trimming.
pub const NAME_MIN_CHARS: usize = 2;
/// Minimum password length, in characters.
pub const PASSWORD_MIN_CHARS: usize = 8;
/// Longest address accepted by the syntax check.
pub const EMAIL_MAX_CHARS: usize = 254;
const EMAIL_LOCAL_MAX_CHARS: usize = 64;

/// Display name rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameRule {
    /// Blank after trimming.
    #[error("Name is required.")]
    Required,
    /// Shorter than [`NAME_MIN_CHARS`] after trimming.
    #[error("Name must be at least 2 characters long.")]
    TooShort,
}

/// Email rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmailRule {
    /// Blank after trimming.
    #[error("Email address is required.")]
    Required,
    /// Not a syntactically valid address.
    #[error("Please enter a valid email address.")]
    InvalidFormat,
    /// A stored record already uses this exact address.
    #[error("This email address is already registered.")]
    Duplicate,
}

/// Password rule violations, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordRule {
    /// Empty.
    #[error("Password is required.")]
    Required,
    /// Shorter than [`PASSWORD_MIN_CHARS`].
    #[error("Password must be at least 8 characters long.")]
    TooShort,
    /// No `A-Z`.
    #[error("Password must contain at least one uppercase letter.")]
    MissingUppercase,
    /// No `a-z`.
    #[error("Password must contain at least one lowercase letter.")]
    MissingLowercase,
    /// No `0-9`.
    #[error("Password must contain at least one number.")]
    MissingDigit,
    /// Nothing outside `A-Za-z0-9`.
    #[error("Password must contain at least one special character.")]
    MissingSymbol,
}

/// Confirmation rule violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfirmPasswordRule {
    /// Empty.
    #[error("Please confirm your password.")]
    Required,
    /// Differs from the password.
    #[error("Passwords do not match.")]
    Mismatch,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "constant pattern; compilation is exercised by the validation tests"
)]
fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Dot-atom local part; domain of two or more DNS labels.
        let pattern = concat!(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
            r"@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+",
            r"[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
        );
        Regex::new(pattern).expect("email regex compiles")
    })
}

/// Whether `email` is a syntactically valid address.
///
/// # Examples
/// ```
/// use signup::domain::is_valid_email;
///
/// assert!(is_valid_email("a@b.com"));
/// assert!(!is_valid_email("a@b"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().count() > EMAIL_MAX_CHARS {
        return false;
    }
    let local_ok = email
        .split_once('@')
        .is_some_and(|(local, _)| local.chars().count() <= EMAIL_LOCAL_MAX_CHARS);
    local_ok && email_regex().is_match(email)
}

/// Check the display name.
///
/// # Errors
/// Returns the first [`NameRule`] violated.
pub fn validate_name(name: &str) -> Result<(), NameRule> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameRule::Required);
    }
    if trimmed.chars().count() < NAME_MIN_CHARS {
        return Err(NameRule::TooShort);
    }
    Ok(())
}

/// Check the email address against syntax and the stored records.
///
/// The duplicate check is an exact, case-sensitive comparison.
///
/// # Errors
/// Returns the first [`EmailRule`] violated.
pub fn validate_email(email: &str, existing: &[UserRecord]) -> Result<(), EmailRule> {
    if email.trim().is_empty() {
        return Err(EmailRule::Required);
    }
    if !is_valid_email(email) {
        return Err(EmailRule::InvalidFormat);
    }
    if existing.iter().any(|user| user.email() == email) {
        return Err(EmailRule::Duplicate);
    }
    Ok(())
}

/// Check password length and composition.
///
/// # Errors
/// Returns the first [`PasswordRule`] violated.
pub fn validate_password(password: &str) -> Result<(), PasswordRule> {
    if password.is_empty() {
        return Err(PasswordRule::Required);
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(PasswordRule::TooShort);
    }
    let checks: [(fn(&char) -> bool, PasswordRule); 4] = [
        (char::is_ascii_uppercase, PasswordRule::MissingUppercase),
        (char::is_ascii_lowercase, PasswordRule::MissingLowercase),
        (char::is_ascii_digit, PasswordRule::MissingDigit),
        (|c| !c.is_ascii_alphanumeric(), PasswordRule::MissingSymbol),
    ];
    for (present, rule) in checks {
        if !password.chars().any(|c| present(&c)) {
            return Err(rule);
        }
    }
    Ok(())
}

/// Check the confirmation against the password.
///
/// # Errors
/// Returns the first [`ConfirmPasswordRule`] violated.
pub fn validate_confirm_password(
    password: &str,
    confirm_password: &str,
) -> Result<(), ConfirmPasswordRule> {
    if confirm_password.is_empty() {
        return Err(ConfirmPasswordRule::Required);
    }
    if password != confirm_password {
        return Err(ConfirmPasswordRule::Mismatch);
    }
    Ok(())
}

/// Validate every field of `form`.
///
/// # Examples
/// ```
/// use signup::domain::{validate, Field, RegistrationForm};
///
/// let form = RegistrationForm::new("Jo", "a@b.com", "short", "short");
/// let errors = validate(&form, &[]);
/// assert!(errors.contains(Field::Password));
/// assert!(!errors.contains(Field::ConfirmPassword));
/// ```
#[must_use]
pub fn validate(form: &RegistrationForm, existing: &[UserRecord]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Err(rule) = validate_name(form.name()) {
        errors.record(Field::Name, rule.to_string());
    }
    if let Err(rule) = validate_email(form.email(), existing) {
        errors.record(Field::Email, rule.to_string());
    }
    if let Err(rule) = validate_password(form.password()) {
        errors.record(Field::Password, rule.to_string());
    }
    if let Err(rule) = validate_confirm_password(form.password(), form.confirm_password()) {
        errors.record(Field::ConfirmPassword, rule.to_string());
    }
    errors
}

#[cfg(test)]
mod tests;
