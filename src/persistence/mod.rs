//! Artifact persistence
//!
//! Writes go to a hidden temporary file in the target directory which is
//! fsynced and then renamed over the canonical name, so readers only ever
//! observe the previous complete artifact or the new complete artifact.

use crate::error::{PavError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Atomically write `value` to `directory/filename`
///
/// `serializer` receives the value and a buffered writer for the temporary
/// file. If it fails, or any later step fails, the temporary file is removed
/// and an existing artifact under `filename` is left untouched.
pub fn atomic_save<T, F>(value: &T, directory: &Path, filename: &str, serializer: F) -> Result<PathBuf>
where
    T: ?Sized,
    F: FnOnce(&T, &mut dyn Write) -> Result<()>,
{
    fs::create_dir_all(directory)?;

    let target = directory.join(filename);
    let tmp_path = directory.join(format!(
        ".{}.tmp-{}-{}",
        filename,
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let replaces_existing = target.exists();
    match write_and_commit(value, &tmp_path, &target, serializer) {
        Ok(()) => {
            if replaces_existing {
                debug!(path = %target.display(), "overwrote existing artifact");
            } else {
                debug!(path = %target.display(), "artifact committed");
            }
            Ok(target)
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp_path);
            Err(err)
        }
    }
}

fn write_and_commit<T, F>(value: &T, tmp_path: &Path, target: &Path, serializer: F) -> Result<()>
where
    T: ?Sized,
    F: FnOnce(&T, &mut dyn Write) -> Result<()>,
{
    let file = OpenOptions::new().write(true).create_new(true).open(tmp_path)?;
    let mut writer = BufWriter::new(file);
    serializer(value, &mut writer)?;
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| PavError::IoError(e.into_error()))?;
    file.sync_all()?;
    drop(file);

    fs::rename(tmp_path, target)?;
    sync_parent_directory(target)
}

fn sync_parent_directory(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

/// JSON serializer for [`atomic_save`]
pub fn json_serializer<T: Serialize + ?Sized>(value: &T, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer(writer, value)?;
    Ok(())
}

/// Atomically write `value` as JSON
pub fn save_json<T: Serialize + ?Sized>(value: &T, directory: &Path, filename: &str) -> Result<PathBuf> {
    atomic_save(value, directory, filename, json_serializer::<T>)
}

/// Load a JSON artifact
///
/// A missing file surfaces as [`PavError::IoError`] with kind `NotFound`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}
