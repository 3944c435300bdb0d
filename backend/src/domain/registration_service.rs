//! Registration pipeline: load, validate, hash, append.
//!
//! ```text
//! Idle -> Loading -> LoadFailed
//!                 -> Validating -> ValidationFailed
//!                               -> Hashing -> Appending -> WriteFailed
//!                                                       -> Success
//! ```
//!
//! Every call is blocking. Run it off the async executor.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, error, info};

use super::ports::{PasswordHasher, UserStore, UserStoreError};
use super::{
    FieldErrors, RegisteredAt, RegistrationForm, RegistrationOutcome, UserRecord, validate,
};

/// General message for failures after validation that are not store writes.
pub const SAVE_FAILURE_MESSAGE: &str = "Error saving user data. Please try again later.";

/// Runs one registration request against the store.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl RegistrationService {
    /// Wire the pipeline to its ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use signup::domain::ports::{FixturePasswordHasher, InMemoryUserStore};
    /// use signup::domain::{RegistrationForm, RegistrationOutcome, RegistrationService};
    ///
    /// let service = RegistrationService::new(
    ///     Arc::new(InMemoryUserStore::default()),
    ///     Arc::new(FixturePasswordHasher),
    ///     Arc::new(DefaultClock),
    /// );
    /// let form = RegistrationForm::new("Jo", "a@b.com", "Abcdef1!", "Abcdef1!");
    /// assert!(matches!(service.register(&form), RegistrationOutcome::Registered { .. }));
    /// ```
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            store,
            hasher,
            clock,
        }
    }

    /// Process one submission to a terminal outcome.
    ///
    /// A store that cannot be read short-circuits the request before any
    /// field is validated; nothing is written unless every field passes.
    pub fn register(&self, form: &RegistrationForm) -> RegistrationOutcome {
        let _lease = match self.store.lock() {
            Ok(lease) => lease,
            Err(err) => return Self::store_failure(&err),
        };

        let existing = match self.store.load() {
            Ok(records) => records,
            Err(err) => return Self::store_failure(&err),
        };
        debug!(records = existing.len(), "user document loaded");

        let errors = validate(form, &existing);
        if !errors.is_empty() {
            let fields: Vec<&str> = errors.iter().map(|(field, _)| field.as_str()).collect();
            info!(?fields, "registration rejected");
            return RegistrationOutcome::Rejected(errors);
        }

        let hash = match self.hasher.hash(form.password()) {
            Ok(hash) => hash,
            Err(err) => {
                error!(error = %err, "password hashing failed");
                return RegistrationOutcome::Rejected(FieldErrors::general(SAVE_FAILURE_MESSAGE));
            }
        };

        let record = UserRecord::new(
            form.name(),
            form.email(),
            hash,
            RegisteredAt::from_local(self.clock.local()),
        );
        if let Err(err) = self.store.append_and_save(record, existing) {
            return Self::store_failure(&err);
        }

        info!("user registered");
        RegistrationOutcome::registered()
    }

    fn store_failure(err: &UserStoreError) -> RegistrationOutcome {
        error!(error = %err, read = err.is_read_failure(), "user store failure");
        RegistrationOutcome::Rejected(FieldErrors::general(err.user_message()))
    }
}
