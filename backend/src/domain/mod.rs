//! Domain primitives and the registration pipeline.
//!
//! Purpose: Define the typed registration input, the stored user record, the
//! field rules, and the service that drives a submission to its outcome.
//! Adapters live under `inbound` and `outbound`; they only reach the domain
//! through the ports declared in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - RegistrationForm / RegistrationOutcome: request-scoped input and output.
//! - UserRecord: one persisted user.
//! - RegistrationService: load, validate, hash, append.

pub mod error;
pub mod ports;
mod registration;
mod registration_service;
mod trace_id;
mod user;
mod validation;

pub use self::error::{Error, ErrorCode};
pub use self::registration::{
    Field, FieldErrors, REGISTRATION_SUCCESS_MESSAGE, RegistrationForm, RegistrationOutcome,
};
pub use self::registration_service::{RegistrationService, SAVE_FAILURE_MESSAGE};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{PasswordHash, REGISTERED_AT_FORMAT, RegisteredAt, UserRecord};
pub use self::validation::{
    ConfirmPasswordRule, EMAIL_MAX_CHARS, EmailRule, NAME_MIN_CHARS, NameRule, PASSWORD_MIN_CHARS,
    PasswordRule, is_valid_email, validate, validate_confirm_password, validate_email,
    validate_name, validate_password,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use signup::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::invalid_request("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
