//! Directory-backed key-value store with atomic writes.
//!
//! Each key is one JSON file inside the store directory. Writes go through a
//! temporary file, fsync and atomic rename while holding an exclusive lock,
//! so a crash never leaves a half-written value behind.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use enhancer_core::error::{EnhancerError, Result};
use enhancer_core::storage::KeyValueStore;
use serde_json::Value as JsonValue;

/// A `KeyValueStore` persisting each key as `<dir>/<encoded key>.json`.
///
/// Responsibilities:
/// - **File locking** (exclusive lock around writes and removals)
/// - **Atomic write** (tmp file + fsync + rename)
/// - **Key to file name mapping** (percent-encoding of unsafe characters)
///
/// Does NOT:
/// - Know about history items or accounts (values are opaque JSON)
/// - Recover from corrupt files (the caller decides; see `HistoryManager`)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }

    /// Gets a temporary file path for atomic writes.
    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", encode_key(key)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&content)?))
    }

    fn set(&self, key: &str, value: &JsonValue) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path_for(key);
        let _lock = FileLock::acquire(&path)?;

        let json_string = serde_json::to_string_pretty(value)?;

        // Write to temporary file in the same directory
        let tmp_path = self.temp_path_for(key);
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json_string.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, &path)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }

        let _lock = FileLock::acquire(&path)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Maps a key to a file-name-safe stem.
///
/// `[A-Za-z0-9._@-]` pass through; every other byte becomes `%XX`. The
/// mapping is injective, so two keys never share a file. A leading `.` is
/// encoded too, keeping stored files visible and distinct from temp files.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for (index, byte) in key.bytes().enumerate() {
        let safe = byte.is_ascii_alphanumeric()
            || matches!(byte, b'_' | b'@' | b'-')
            || (byte == b'.' && index > 0);
        if safe {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// A file lock guard that automatically releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    /// Acquires an exclusive lock on the given path.
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| {
                EnhancerError::storage(format!("Failed to acquire lock: {}", e))
            })?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}
