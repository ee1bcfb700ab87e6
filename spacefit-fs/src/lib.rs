//! Capability-scoped UTF-8 file access for configuration, facility snapshots
//! and report output.
//!
//! Every helper anchors the requested path at an ambient base directory (the
//! filesystem root, a Windows drive prefix, or the working directory) and
//! performs the operation through `cap-std` relative to that anchor.
#![forbid(unsafe_code)]

use std::io;
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Split `path` into an opened base directory and the remainder beneath it.
///
/// # Errors
/// Fails when the base directory cannot be opened or the path is not UTF-8
/// after prefix stripping.
pub fn anchor(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();
    let base = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let drive = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(drive).join(std::path::MAIN_SEPARATOR.to_string())
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string()),
        _ => Utf8PathBuf::from("."),
    };

    let remainder = if base == "." {
        path.to_path_buf()
    } else {
        path.strip_prefix(&base)
            .map_err(|_| io::Error::other(format!("failed to strip {base} from {path}")))?
            .to_path_buf()
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, remainder))
}

/// Read the whole file at `path` as UTF-8 text.
///
/// # Errors
/// Propagates I/O failures, including missing files and invalid UTF-8.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, relative) = anchor(path)?;
    dir.read_to_string(&relative)
}

/// Write `contents` to `path`, creating parent directories first.
///
/// # Errors
/// Propagates I/O failures from directory creation or the write itself.
pub fn write_string(path: &Utf8Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, relative) = anchor(path)?;
    if relative.as_str().is_empty() {
        return Err(io::Error::other(format!("{path} does not name a file")));
    }
    dir.write(&relative, contents)
}

/// Create every missing directory above `path`.
///
/// # Errors
/// Propagates I/O failures from opening the anchor or creating directories.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) else {
        return Ok(());
    };
    let (dir, relative) = anchor(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    dir.create_dir_all(&relative)
}

/// Report whether `path` names an existing regular file.
///
/// Missing entries yield `Ok(false)`.
///
/// # Errors
/// Propagates I/O failures other than the entry being absent.
pub fn is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, relative) = anchor(path)?;
    match dir.metadata(&relative) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
