//! Request-scoped registration input and output.
//!
//! One [`RegistrationForm`] enters the pipeline per request and exactly one
//! [`RegistrationOutcome`] leaves it. Nothing here is shared between requests.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use zeroize::Zeroizing;

/// Message shown once a record has been persisted.
pub const REGISTRATION_SUCCESS_MESSAGE: &str =
    "Registration successful! Your account has been created.";

/// Submitted registration fields.
///
/// ## Invariants
/// - `name` and `email` are trimmed on intake; the trimmed values are the
///   ones validated, stored, and echoed back.
/// - Password fields keep caller-provided whitespace and are wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    name: String,
    email: String,
    password: Zeroizing<String>,
    confirm_password: Zeroizing<String>,
}

impl RegistrationForm {
    /// Build a form from raw submitted values. Absent fields should be passed
    /// as empty strings.
    ///
    /// # Examples
    /// ```
    /// use signup::domain::RegistrationForm;
    ///
    /// let form = RegistrationForm::new("  Ada ", " ada@example.com", "Secr3t!!", "Secr3t!!");
    /// assert_eq!(form.name(), "Ada");
    /// assert_eq!(form.email(), "ada@example.com");
    /// ```
    pub fn new(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_owned(),
            email: email.as_ref().trim().to_owned(),
            password: Zeroizing::new(password.into()),
            confirm_password: Zeroizing::new(confirm_password.into()),
        }
    }

    /// Trimmed display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Trimmed email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext password as submitted.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Plaintext confirmation as submitted.
    #[must_use]
    pub fn confirm_password(&self) -> &str {
        self.confirm_password.as_str()
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Input a message can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Display name input.
    Name,
    /// Email input.
    Email,
    /// Password input.
    Password,
    /// Password confirmation input.
    ConfirmPassword,
    /// Failures not attributable to user input.
    General,
}

impl Field {
    /// Wire and form name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Field to message mapping. Empty means the submission passed.
///
/// At most one message is held per field; the first recorded wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    /// An empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Mapping holding a single general error.
    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.record(Field::General, message);
        errors
    }

    /// Record a message unless the field already has one.
    pub fn record(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether `field` has a message.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// True when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with a message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Terminal state of one registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The record was persisted.
    Registered {
        /// Success banner text.
        message: String,
    },
    /// Field errors, or a single general error from the store or hasher.
    Rejected(FieldErrors),
}

impl RegistrationOutcome {
    /// Successful outcome with the standard banner.
    #[must_use]
    pub fn registered() -> Self {
        Self::Registered {
            message: REGISTRATION_SUCCESS_MESSAGE.to_owned(),
        }
    }

    /// True for store or hashing failures rather than user-correctable input.
    #[must_use]
    pub fn is_general_failure(&self) -> bool {
        matches!(self, Self::Rejected(errors) if errors.contains(Field::General))
    }

    /// Field errors, if the request was rejected.
    #[must_use]
    pub const fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Registered { .. } => None,
            Self::Rejected(errors) => Some(errors),
        }
    }
}
