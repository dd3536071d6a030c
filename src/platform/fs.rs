// QSOMap - platform/fs.rs
//
// Filesystem access for the contact log (read) and the export document
// (atomic write). Core never touches the filesystem; these helpers do.

use crate::core::parser;
use crate::util::constants::MAX_INPUT_FILE_SIZE;
use crate::util::error::{DecodeError, ExportError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Read a contact log into text, applying the encoding fallback.
///
/// The file handle is scoped to this call. Files above
/// `MAX_INPUT_FILE_SIZE` are rejected before reading.
pub fn read_log_file(path: &Path) -> Result<String, DecodeError> {
    let io_err = |source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > MAX_INPUT_FILE_SIZE {
        return Err(DecodeError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: MAX_INPUT_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Log file read");
    parser::decode_bytes(&bytes)
}

/// Write `text` to `path` atomically (write temp -> rename).
///
/// Parent directories are created as needed. On any failure the temporary
/// file is removed and the previous content of `path`, if any, is left
/// untouched.
pub fn write_atomic(path: &Path, text: &str) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let tmp = temp_path(path);
    if let Err(source) = write_and_sync(&tmp, text) {
        let _ = std::fs::remove_file(&tmp);
        return Err(ExportError::Io { path: tmp, source });
    }

    if let Err(source) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(ExportError::Persist {
            tmp_path: tmp,
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::debug!(path = %path.display(), bytes = text.len(), "Export written");
    Ok(())
}

/// Sibling temp file: `<name>.tmp` next to the destination.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_and_sync(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()
}
