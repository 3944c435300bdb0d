//! JSON document store for registered users.
//!
//! The whole document is a pretty-printed array of user records. Every
//! registration holds an advisory lock on a sidecar file for its
//! load-modify-write cycle and replaces the document atomically, so
//! concurrent requests, in this process or another, cannot lose records.

use std::fs::File;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use fs2::FileExt;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, warn};

use super::atomic_io::write_atomic;
use crate::domain::UserRecord;
use crate::domain::ports::{StoreLease, UserStore, UserStoreError};

const INDENT: &[u8] = b"    ";

/// [`UserStore`] backed by a single JSON file.
///
/// # Examples
/// ```no_run
/// use signup::domain::ports::UserStore;
/// use signup::outbound::persistence::JsonFileUserStore;
///
/// let store = JsonFileUserStore::open("users.json").expect("open store");
/// let _lease = store.lock().expect("lock");
/// let users = store.load().expect("load");
/// println!("{} users registered", users.len());
/// ```
#[derive(Debug)]
pub struct JsonFileUserStore {
    dir: Dir,
    file_name: String,
    lock_name: String,
    path: Utf8PathBuf,
}

impl JsonFileUserStore {
    /// Open the store for the document at `path`, creating its parent
    /// directory when missing. The document itself is created on first save.
    ///
    /// # Errors
    /// [`UserStoreError::Read`] when `path` does not name a file or its
    /// directory cannot be opened.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, UserStoreError> {
        let path = path.as_ref();
        let Some(file_name) = path.file_name() else {
            return Err(UserStoreError::read(format!(
                "{path}: user document path must name a file"
            )));
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(parent, ambient_authority()))
            .map(|dir| Self {
                dir,
                file_name: file_name.to_owned(),
                lock_name: format!(".{file_name}.lock"),
                path: path.to_path_buf(),
            })
            .map_err(|err| UserStoreError::read(format!("{parent}: {err}")))
    }

    /// Location of the document as configured.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn encode(users: &[UserRecord]) -> Result<String, UserStoreError> {
        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
        users
            .serialize(&mut serializer)
            .map_err(|err| UserStoreError::write(err.to_string()))?;
        String::from_utf8(buffer).map_err(|err| UserStoreError::write(err.to_string()))
    }
}

/// Exclusive `flock`-style lock on the sidecar file, released on drop.
struct DocumentLock(File);

impl Drop for DocumentLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.0) {
            warn!(error = %err, "failed to release user document lock");
        }
    }
}

impl UserStore for JsonFileUserStore {
    fn lock(&self) -> Result<StoreLease, UserStoreError> {
        let mut options = OpenOptions::new();
        options.create(true).write(true);
        let file = self
            .dir
            .open_with(&self.lock_name, &options)
            .map_err(|err| UserStoreError::lock(format!("{}: {err}", self.lock_name)))?
            .into_std();
        FileExt::lock_exclusive(&file)
            .map_err(|err| UserStoreError::lock(format!("{}: {err}", self.lock_name)))?;
        debug!(path = %self.path, "user document locked");
        Ok(StoreLease::new(DocumentLock(file)))
    }

    fn load(&self) -> Result<Vec<UserRecord>, UserStoreError> {
        let raw = match self.dir.read(&self.file_name) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(UserStoreError::read(format!("{}: {err}", self.path))),
        };
        // Undecodable bytes are a parse failure, not an I/O one.
        serde_json::from_slice(&raw)
            .map_err(|err| UserStoreError::corrupt(format!("{}: {err}", self.path)))
    }

    fn append_and_save(
        &self,
        user: UserRecord,
        mut current: Vec<UserRecord>,
    ) -> Result<(), UserStoreError> {
        current.push(user);
        let encoded = Self::encode(&current)?;
        write_atomic(&self.dir, &self.file_name, &self.path, &encoded)?;
        debug!(path = %self.path, records = current.len(), "user document saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PasswordHash, RegisteredAt};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Workspace {
        _temp: TempDir,
        path: Utf8PathBuf,
    }

    impl Workspace {
        fn store(&self) -> JsonFileUserStore {
            JsonFileUserStore::open(&self.path).expect("open store")
        }

        fn contents(&self) -> String {
            std::fs::read_to_string(&self.path).expect("read document")
        }
    }

    #[fixture]
    fn workspace() -> Workspace {
        let temp = TempDir::new().expect("temp dir");
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp dir");
        Workspace {
            _temp: temp,
            path: dir.join("users.json"),
        }
    }

    fn record(email: &str) -> UserRecord {
        UserRecord::new(
            "Ada",
            email,
            PasswordHash::from_encoded("$argon2id$stub"),
            RegisteredAt::parse("2024-05-01 09:30:00").expect("valid timestamp"),
        )
    }

    #[rstest]
    fn missing_document_loads_empty(workspace: Workspace) {
        assert!(workspace.store().load().expect("load").is_empty());
    }

    #[rstest]
    #[case("{not json")]
    #[case("")]
    #[case(r#"{"name":"Ada"}"#)]
    #[case(r#"[{"name":"Ada"}]"#)]
    fn malformed_document_is_corrupt_and_untouched(workspace: Workspace, #[case] raw: &str) {
        std::fs::write(&workspace.path, raw).expect("seed");

        let err = workspace.store().load().expect_err("corrupt");

        assert!(matches!(err, UserStoreError::Corrupt { .. }));
        assert_eq!(workspace.contents(), raw);
    }

    #[rstest]
    #[case(b"[\xff]".as_slice())]
    #[case(b"\xfe\xff[]".as_slice())]
    fn undecodable_bytes_are_corrupt(workspace: Workspace, #[case] raw: &[u8]) {
        std::fs::write(&workspace.path, raw).expect("seed");

        let err = workspace.store().load().expect_err("corrupt");

        assert!(matches!(err, UserStoreError::Corrupt { .. }));
        assert_eq!(
            err.user_message(),
            "Error reading user data. Please try again later."
        );
        assert_eq!(std::fs::read(&workspace.path).expect("read document"), raw);
    }

    #[rstest]
    fn records_with_extra_keys_are_corrupt_and_never_rewritten(workspace: Workspace) {
        let raw = concat!(
            r#"[{"name":"Old","email":"old@example.com","password":"$2y$10$legacy","#,
            r#""registered_at":"2024-01-01 00:00:00","id":7}]"#,
        );
        std::fs::write(&workspace.path, raw).expect("seed");
        let store = workspace.store();

        let err = store.load().expect_err("unknown key rejected");

        assert!(matches!(err, UserStoreError::Corrupt { .. }));
        assert_eq!(workspace.contents(), raw);
    }

    #[rstest]
    fn unreadable_document_is_read_error(workspace: Workspace) {
        std::fs::create_dir(&workspace.path).expect("directory in place of file");

        let err = workspace.store().load().expect_err("unreadable");

        assert!(matches!(err, UserStoreError::Read { .. }));
        assert_eq!(
            err.user_message(),
            "Error reading user data file. Please try again later."
        );
    }

    #[rstest]
    fn saves_pretty_printed_records(workspace: Workspace) {
        let store = workspace.store();
        store
            .append_and_save(record("a@b.com"), Vec::new())
            .expect("save");

        let expected = concat!(
            "[\n",
            "    {\n",
            "        \"name\": \"Ada\",\n",
            "        \"email\": \"a@b.com\",\n",
            "        \"password\": \"$argon2id$stub\",\n",
            "        \"registered_at\": \"2024-05-01 09:30:00\"\n",
            "    }\n",
            "]",
        );
        assert_eq!(workspace.contents(), expected);
    }

    #[rstest]
    fn append_keeps_existing_records_in_order(workspace: Workspace) {
        let store = workspace.store();
        store
            .append_and_save(record("first@example.com"), Vec::new())
            .expect("first save");
        let current = store.load().expect("load");
        store
            .append_and_save(record("second@example.com"), current)
            .expect("second save");

        let emails: Vec<String> = store
            .load()
            .expect("reload")
            .iter()
            .map(|user| user.email().to_owned())
            .collect();
        assert_eq!(emails, ["first@example.com", "second@example.com"]);
    }

    #[rstest]
    fn open_creates_missing_parent(workspace: Workspace) {
        let nested = workspace
            .path
            .with_file_name("nested")
            .join("deeper")
            .join("users.json");

        let store = JsonFileUserStore::open(&nested).expect("open nested");

        assert!(store.load().expect("load").is_empty());
        assert_eq!(store.path(), nested.as_path());
    }

    #[rstest]
    fn open_rejects_paths_without_file_name() {
        let err = JsonFileUserStore::open("/").expect_err("no file name");
        assert!(matches!(err, UserStoreError::Read { .. }));
    }

    #[rstest]
    fn concurrent_appends_lose_nothing(workspace: Workspace) {
        let handles: Vec<_> = (0..8)
            .map(|index| {
                // Separate handles open separate lock descriptions, like
                // separate processes would.
                let store = workspace.store();
                std::thread::spawn(move || {
                    let _lease = store.lock().expect("lock");
                    let current = store.load().expect("load");
                    std::thread::yield_now();
                    store
                        .append_and_save(record(&format!("user{index}@example.com")), current)
                        .expect("save");
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread");
        }

        assert_eq!(workspace.store().load().expect("load").len(), 8);
    }
}
