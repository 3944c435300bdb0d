//! Persisted user record.
//!
//! A record is created once at registration and never mutated. Its serialised
//! form is the on-disk contract of the user document:
//!
//! ```json
//! {
//!   "name": "Ada",
//!   "email": "ada@example.com",
//!   "password": "$argon2id$v=19$...",
//!   "registered_at": "2024-05-01 09:30:00"
//! }
//! ```

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `strftime` pattern used for `registered_at`.
pub const REGISTERED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One-way password hash in PHC string form.
///
/// Only constructed by a [`crate::domain::ports::PasswordHasher`] or when a
/// stored document is read back; plaintext never flows through this type.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a hasher.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Registration timestamp, second precision, local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RegisteredAt(NaiveDateTime);

impl RegisteredAt {
    /// Truncate a local timestamp to the stored precision.
    #[must_use]
    pub fn from_local(now: DateTime<Local>) -> Self {
        let naive = now.naive_local();
        Self(naive.with_nanosecond(0).unwrap_or(naive))
    }

    /// Parse the stored `YYYY-MM-DD HH:MM:SS` form.
    ///
    /// # Errors
    /// Returns [`chrono::ParseError`] when the value does not match
    /// [`REGISTERED_AT_FORMAT`].
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(value, REGISTERED_AT_FORMAT).map(Self)
    }

    /// Underlying naive timestamp.
    #[must_use]
    pub const fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }
}

impl fmt::Display for RegisteredAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(REGISTERED_AT_FORMAT))
    }
}

impl Serialize for RegisteredAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RegisteredAt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Application user as stored in the document.
///
/// ## Invariants
/// - `email` is the identity key; it is unique across the document.
/// - `password` is a hash, never plaintext.
/// - Exactly the four stored keys; a record carrying any other key is
///   rejected so a rewrite can never drop data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserRecord {
    name: String,
    email: String,
    password: PasswordHash,
    registered_at: RegisteredAt,
}

impl UserRecord {
    /// Build a record from validated inputs.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: PasswordHash,
        registered_at: RegisteredAt,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password,
            registered_at,
        }
    }

    /// Display name given at registration.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email address; the record's identity.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password
    }

    /// When the record was created.
    #[must_use]
    pub const fn registered_at(&self) -> RegisteredAt {
        self.registered_at
    }
}
