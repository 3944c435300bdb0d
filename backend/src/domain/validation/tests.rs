//! Tests for the registration field rules.

use super::*;
use crate::domain::{PasswordHash, RegisteredAt};
use proptest::prelude::*;
use rstest::{fixture, rstest};

const STRONG_PASSWORD: &str = "Abcdef1!";

fn stored(email: &str) -> UserRecord {
    UserRecord::new(
        "Existing",
        email,
        PasswordHash::from_encoded("$argon2id$stub"),
        RegisteredAt::parse("2024-01-01 00:00:00").expect("valid timestamp"),
    )
}

#[fixture]
fn existing() -> Vec<UserRecord> {
    vec![stored("a@b.com")]
}

#[rstest]
#[case("", NameRule::Required)]
#[case("   ", NameRule::Required)]
#[case("J", NameRule::TooShort)]
#[case(" J ", NameRule::TooShort)]
fn name_rules(#[case] name: &str, #[case] expected: NameRule) {
    assert_eq!(validate_name(name), Err(expected));
}

#[rstest]
#[case("Jo")]
#[case("Zoë")]
fn name_accepts_two_or_more_characters(#[case] name: &str) {
    assert_eq!(validate_name(name), Ok(()));
}

#[rstest]
#[case("", EmailRule::Required)]
#[case("  ", EmailRule::Required)]
#[case("plainaddress", EmailRule::InvalidFormat)]
#[case("a@b", EmailRule::InvalidFormat)]
#[case("a@@b.com", EmailRule::InvalidFormat)]
#[case("a..b@c.com", EmailRule::InvalidFormat)]
#[case("a@-b.com", EmailRule::InvalidFormat)]
#[case("a b@c.com", EmailRule::InvalidFormat)]
fn email_rules_without_records(#[case] email: &str, #[case] expected: EmailRule) {
    assert_eq!(validate_email(email, &[]), Err(expected));
}

#[rstest]
#[case("a@b.com")]
#[case("first.last+tag@sub.example.org")]
#[case("o'brien@example.ie")]
fn email_accepts_common_addresses(#[case] email: &str) {
    assert_eq!(validate_email(email, &[]), Ok(()));
}

#[rstest]
fn email_rejects_over_long_local_part() {
    let email = format!("{}@b.com", "a".repeat(65));
    assert_eq!(validate_email(&email, &[]), Err(EmailRule::InvalidFormat));
}

#[rstest]
fn email_rejects_duplicate(existing: Vec<UserRecord>) {
    assert_eq!(
        validate_email("a@b.com", &existing),
        Err(EmailRule::Duplicate)
    );
}

#[rstest]
#[case("A@B.COM")]
#[case("A@b.com")]
fn email_duplicate_check_is_case_sensitive(existing: Vec<UserRecord>, #[case] email: &str) {
    // Pins current behaviour: addresses differing only in case are distinct.
    assert_eq!(validate_email(email, &existing), Ok(()));
}

#[rstest]
fn syntax_is_checked_before_duplicates() {
    let records = vec![stored("not-an-email")];
    assert_eq!(
        validate_email("not-an-email", &records),
        Err(EmailRule::InvalidFormat)
    );
}

#[rstest]
#[case("", PasswordRule::Required)]
#[case("short", PasswordRule::TooShort)]
#[case("Ab1!", PasswordRule::TooShort)]
#[case("abcdefg1!", PasswordRule::MissingUppercase)]
#[case("ABCDEFG1!", PasswordRule::MissingLowercase)]
#[case("Abcdefgh!", PasswordRule::MissingDigit)]
#[case("Abcdefg12", PasswordRule::MissingSymbol)]
#[case("abcdefgh", PasswordRule::MissingUppercase)]
fn password_rules_in_order(#[case] password: &str, #[case] expected: PasswordRule) {
    assert_eq!(validate_password(password), Err(expected));
}

#[rstest]
#[case(STRONG_PASSWORD)]
#[case("Abcdef1 ")]
#[case("Abcdef1é")]
fn password_accepts_full_composition(#[case] password: &str) {
    assert_eq!(validate_password(password), Ok(()));
}

#[rstest]
fn password_treats_non_ascii_uppercase_as_symbol() {
    assert_eq!(validate_password("ÀBCDEF1a"), Ok(()));
    assert_eq!(validate_password("àbcdef1!"), Err(PasswordRule::MissingUppercase));
}

#[rstest]
#[case("Abcdef1!", "", ConfirmPasswordRule::Required)]
#[case("Abcdef1!", "Abcdef1?", ConfirmPasswordRule::Mismatch)]
#[case("", "x", ConfirmPasswordRule::Mismatch)]
fn confirm_rules(
    #[case] password: &str,
    #[case] confirm: &str,
    #[case] expected: ConfirmPasswordRule,
) {
    assert_eq!(validate_confirm_password(password, confirm), Err(expected));
}

#[rstest]
fn valid_form_has_no_errors() {
    let form = RegistrationForm::new("Jo", "a@b.com", STRONG_PASSWORD, STRONG_PASSWORD);
    assert!(validate(&form, &[]).is_empty());
}

#[rstest]
fn empty_form_reports_required_for_every_input() {
    let form = RegistrationForm::new("", "", "", "");
    let errors = validate(&form, &[]);
    assert_eq!(errors.get(Field::Name), Some("Name is required."));
    assert_eq!(errors.get(Field::Email), Some("Email address is required."));
    assert_eq!(errors.get(Field::Password), Some("Password is required."));
    assert_eq!(
        errors.get(Field::ConfirmPassword),
        Some("Please confirm your password.")
    );
    assert!(!errors.contains(Field::General));
}

#[rstest]
fn duplicate_email_message(existing: Vec<UserRecord>) {
    let form = RegistrationForm::new("Jo", "a@b.com", STRONG_PASSWORD, STRONG_PASSWORD);
    let errors = validate(&form, &existing);
    assert_eq!(
        errors.get(Field::Email),
        Some("This email address is already registered.")
    );
    assert_eq!(errors.len(), 1);
}

#[rstest]
fn short_matching_passwords_report_length_only() {
    let form = RegistrationForm::new("Jo", "a@b.com", "short", "short");
    let errors = validate(&form, &[]);
    assert_eq!(
        errors.get(Field::Password),
        Some("Password must be at least 8 characters long.")
    );
    assert!(!errors.contains(Field::ConfirmPassword));
}

fn strong_password() -> impl Strategy<Value = String> {
    (
        "[A-Z]{1,4}",
        "[a-z]{1,4}",
        "[0-9]{1,4}",
        "[!@#$%^&*() _+=-]{1,4}",
        "[A-Za-z0-9!?]{4,8}",
    )
        .prop_map(|(upper, lower, digit, symbol, filler)| {
            format!("{filler}{lower}{symbol}{upper}{digit}")
        })
}

proptest! {
    #[test]
    fn short_passwords_always_fail(password in "\\PC{1,7}") {
        prop_assume!(password.chars().count() < PASSWORD_MIN_CHARS);
        let form = RegistrationForm::new("Jo", "a@b.com", password.clone(), password);
        prop_assert!(validate(&form, &[]).contains(Field::Password));
    }

    #[test]
    fn full_composition_always_passes(password in strong_password()) {
        let form = RegistrationForm::new("Jo", "a@b.com", password.clone(), password);
        prop_assert!(!validate(&form, &[]).contains(Field::Password));
    }

    #[test]
    fn differing_confirmation_always_mismatches(
        password in "\\PC{0,12}",
        confirm in "\\PC{1,12}",
    ) {
        prop_assume!(password != confirm);
        let form = RegistrationForm::new("Jo", "a@b.com", password, confirm);
        let errors = validate(&form, &[]);
        prop_assert_eq!(
            errors.get(Field::ConfirmPassword),
            Some("Passwords do not match.")
        );
    }

    #[test]
    fn duplicate_reported_only_for_stored_addresses(
        local in "[a-z]{1,8}",
        other in "[a-z]{1,8}",
    ) {
        let email = format!("{local}@example.com");
        let candidate = format!("{other}@example.com");
        let records = vec![stored(&email)];
        prop_assert_eq!(validate_email(&email, &records), Err(EmailRule::Duplicate));
        if candidate != email {
            prop_assert_eq!(validate_email(&candidate, &records), Ok(()));
        }
    }

    #[test]
    fn validate_is_deterministic(
        name in "\\PC{0,6}",
        email in "\\PC{0,12}",
        password in "\\PC{0,12}",
        confirm in "\\PC{0,12}",
    ) {
        let form = RegistrationForm::new(name, email, password, confirm);
        prop_assert_eq!(validate(&form, &[]), validate(&form, &[]));
    }
}
