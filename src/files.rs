// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # File Helpers
//!
//! Thin wrappers over `std::fs` that attach the offending path to every
//! error, plus a recursive copy used for static assets.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use log::trace;
use walkdir::WalkDir;

use crate::core::error::{HydeError, Result};

/// Reads the file at `path` into a string.
///
/// # Errors
///
/// Returns `HydeError::Io` carrying `path` if the file cannot be opened or
/// is not valid UTF-8.
pub fn read_content<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let mut file =
        File::open(path).map_err(|e| HydeError::io_error(path.to_path_buf(), e))?;
    let mut content = String::new();
    let _ = file
        .read_to_string(&mut content)
        .map_err(|e| HydeError::io_error(path.to_path_buf(), e))?;
    Ok(content)
}

/// Writes `content` to `path`, creating missing parent directories.
pub fn write_content<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| HydeError::io_error(parent.to_path_buf(), e))?;
    }
    let file =
        File::create(path).map_err(|e| HydeError::io_error(path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| HydeError::io_error(path.to_path_buf(), e))
}

/// Copies every file below `source` into `destination`, keeping the
/// relative layout. Returns the number of files copied. A missing `source`
/// copies nothing.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<usize> {
    if !source.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            HydeError::io_error(path, e.into())
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| HydeError::output_error(
                "static file escaped its directory",
                entry.path().to_path_buf(),
                Some(Box::new(e)),
            ))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| HydeError::io_error(target.clone(), e))?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| HydeError::io_error(parent.to_path_buf(), e))?;
            }
            let _ = fs::copy(entry.path(), &target)
                .map_err(|e| HydeError::io_error(entry.path().to_path_buf(), e))?;
            trace!("Copied {} -> {}", entry.path().display(), target.display());
            copied += 1;
        }
    }
    Ok(copied)
}
