//! Filesystem helpers shared by the file-backed adapters.
//!
//! All access goes through a capability-scoped [`Dir`], so adapters can never
//! escape the store root regardless of the names they are handed.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::{Serialize, de::DeserializeOwned};
use std::io;

/// Suffix used for in-flight writes before they are renamed into place.
const TEMP_SUFFIX: &str = ".tmp";

/// Opens `root`, creating it first when missing.
///
/// # Errors
///
/// Returns any I/O error raised while creating or opening the directory.
pub fn open_root(root: &Utf8Path) -> io::Result<Dir> {
    Dir::create_ambient_dir_all(root, ambient_authority())?;
    Dir::open_ambient_dir(root, ambient_authority())
}

/// Serialises `value` as pretty JSON and atomically replaces `path`.
///
/// # Errors
///
/// Returns serialisation failures as [`io::ErrorKind::InvalidData`] and any
/// filesystem error unchanged.
pub fn write_json<T: Serialize>(dir: &Dir, path: &Utf8Path, value: &T) -> io::Result<()> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    write_atomic(dir, path, &bytes)
}

/// Writes `bytes` to a sibling temporary file, then renames it over `path`.
///
/// # Errors
///
/// Returns any filesystem error.
pub fn write_atomic(dir: &Dir, path: &Utf8Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
        dir.create_dir_all(parent)?;
    }
    let temp_path = Utf8PathBuf::from(format!("{path}{TEMP_SUFFIX}"));
    dir.write(&temp_path, bytes)?;
    dir.rename(&temp_path, dir, path)
}

/// Reads and deserialises a JSON record.
///
/// # Errors
///
/// Preserves [`io::ErrorKind::NotFound`] for missing files and reports decode
/// failures as [`io::ErrorKind::InvalidData`].
pub fn read_json<T: DeserializeOwned>(dir: &Dir, path: &Utf8Path) -> io::Result<T> {
    let bytes = dir.read(path)?;
    serde_json::from_slice(&bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Lists the entry names directly under `path`, sorted.
///
/// A missing directory yields an empty list. Temporary files left behind by
/// interrupted writes are skipped.
///
/// # Errors
///
/// Returns any other filesystem error.
pub fn list_names(dir: &Dir, path: &Utf8Path) -> io::Result<Vec<String>> {
    let entries = match dir.read_dir(path) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let mut names = Vec::new();
    for entry in entries {
        let name = entry?.file_name()?;
        if !name.ends_with(TEMP_SUFFIX) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Returns whether `name` is safe to use as a single path component.
#[must_use]
pub fn is_plain_file_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty()
        && trimmed == name
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.ends_with(TEMP_SUFFIX)
}
