//! Driven port for the user document.
//!
//! The document is loaded whole, extended in memory, and written back whole.
//! Callers hold a [`StoreLease`] across that cycle so concurrent registrations
//! cannot lose each other's records.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use super::define_port_error;
use crate::domain::UserRecord;

define_port_error! {
    /// Failures raised by user store adapters.
    pub enum UserStoreError {
        /// Exclusive access to the document could not be obtained.
        Lock { message: String } => "user document lock failed: {message}",
        /// The document exists but could not be read.
        Read { message: String } => "user document could not be read: {message}",
        /// The document was read but is not a list of user records.
        Corrupt { message: String } => "user document is not a valid record list: {message}",
        /// The updated document could not be persisted.
        Write { message: String } => "user document could not be written: {message}",
    }
}

impl UserStoreError {
    /// True for failures before or during loading.
    #[must_use]
    pub const fn is_read_failure(&self) -> bool {
        !matches!(self, Self::Write { .. })
    }

    /// Message safe to show to the person registering.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Lock { .. } | Self::Read { .. } => {
                "Error reading user data file. Please try again later."
            }
            Self::Corrupt { .. } => "Error reading user data. Please try again later.",
            Self::Write { .. } => "Error saving user data. Please try again later.",
        }
    }
}

/// Exclusive access to the user document, released on drop.
#[must_use = "the lease releases the document as soon as it is dropped"]
pub struct StoreLease {
    _held: Box<dyn Send>,
}

impl StoreLease {
    /// Wrap whatever value keeps the document locked.
    pub fn new(held: impl Send + 'static) -> Self {
        Self {
            _held: Box::new(held),
        }
    }
}

impl std::fmt::Debug for StoreLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StoreLease")
    }
}

/// Persistence port for registered users.
pub trait UserStore: Send + Sync {
    /// Take exclusive access for one load-modify-write cycle.
    ///
    /// # Errors
    /// [`UserStoreError::Lock`] when access cannot be obtained.
    fn lock(&self) -> Result<StoreLease, UserStoreError>;

    /// Load every stored record in insertion order.
    ///
    /// A document that does not exist yet loads as an empty list.
    ///
    /// # Errors
    /// [`UserStoreError::Read`] or [`UserStoreError::Corrupt`].
    fn load(&self) -> Result<Vec<UserRecord>, UserStoreError>;

    /// Append `user` to `current` and replace the document with the result.
    ///
    /// # Errors
    /// [`UserStoreError::Write`]; the previous document is left intact.
    fn append_and_save(
        &self,
        user: UserRecord,
        current: Vec<UserRecord>,
    ) -> Result<(), UserStoreError>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    records: Vec<UserRecord>,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-memory store used by tests and local fixtures.
///
/// Failures can be switched on to exercise the store error paths.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    state: Mutex<InMemoryState>,
    gate: Arc<Gate>,
}

impl InMemoryUserStore {
    /// Store pre-populated with `records`.
    #[must_use]
    pub fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            state: Mutex::new(InMemoryState {
                records,
                ..InMemoryState::default()
            }),
            gate: Arc::default(),
        }
    }

    /// Make subsequent loads fail as if the document were unparseable.
    pub fn fail_reads(&self, fail: bool) {
        self.state().fail_reads = fail;
    }

    /// Make subsequent saves fail.
    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    /// Snapshot of the stored records.
    #[must_use]
    pub fn records(&self) -> Vec<UserRecord> {
        self.state().records.clone()
    }

    fn state(&self) -> MutexGuard<'_, InMemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Default)]
struct Gate {
    busy: Mutex<bool>,
    released: Condvar,
}

struct GatePass(Arc<Gate>);

impl Gate {
    fn enter(self: &Arc<Self>) -> GatePass {
        let mut busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        while *busy {
            busy = self
                .released
                .wait(busy)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *busy = true;
        GatePass(Arc::clone(self))
    }
}

impl Drop for GatePass {
    fn drop(&mut self) {
        *self.0.busy.lock().unwrap_or_else(PoisonError::into_inner) = false;
        self.0.released.notify_one();
    }
}

impl UserStore for InMemoryUserStore {
    fn lock(&self) -> Result<StoreLease, UserStoreError> {
        Ok(StoreLease::new(self.gate.enter()))
    }

    fn load(&self) -> Result<Vec<UserRecord>, UserStoreError> {
        let state = self.state();
        if state.fail_reads {
            return Err(UserStoreError::corrupt("simulated parse failure"));
        }
        Ok(state.records.clone())
    }

    fn append_and_save(
        &self,
        user: UserRecord,
        mut current: Vec<UserRecord>,
    ) -> Result<(), UserStoreError> {
        let mut state = self.state();
        if state.fail_writes {
            return Err(UserStoreError::write("simulated write failure"));
        }
        current.push(user);
        state.records = current;
        Ok(())
    }
}
