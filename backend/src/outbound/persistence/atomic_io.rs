//! Atomic replacement of the user document.
//!
//! The new contents go to a hidden temporary file in the same directory,
//! which is synced and then renamed over the target. Readers therefore see
//! either the previous document or the new one, never a partial write.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::Utf8Path;
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::UserStoreError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `file_name` inside `dir` with `contents`.
///
/// `file_name` must be a bare file name; `display_path` is only used in error
/// messages.
///
/// # Errors
///
/// Returns [`UserStoreError::Write`] if the temporary file cannot be written
/// or renamed. The previous document is left in place.
pub(super) fn write_atomic(
    dir: &Dir,
    file_name: &str,
    display_path: &Utf8Path,
    contents: &str,
) -> Result<(), UserStoreError> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{suffix}.{counter}",
        std::process::id()
    );

    write_to_temp_file(dir, &tmp_name, contents)
        .map_err(|err| write_error(&display_path.with_file_name(&tmp_name), &err))?;
    if let Err(err) = rename_temp_to_target(dir, &tmp_name, file_name) {
        // Best-effort cleanup; the rename error is the one worth reporting.
        drop(dir.remove_file(&tmp_name));
        return Err(write_error(display_path, &err));
    }
    sync_parent_directory(dir);

    Ok(())
}

fn write_error(path: &Utf8Path, err: &io::Error) -> UserStoreError {
    UserStoreError::write(format!("{path}: {err}"))
}

fn write_to_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;

    let written = file
        .write_all(contents.as_bytes())
        .and_then(|()| file.sync_all());
    if let Err(err) = written {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(err);
    }
    Ok(())
}

#[cfg(windows)]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists, so remove it first.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_parent_directory(parent: &Dir) {
    // Best-effort: not every platform can fsync a directory handle.
    drop(parent.open(".").and_then(|dir| dir.sync_all()));
}
