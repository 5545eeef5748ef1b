// SPDX-License-Identifier: MIT
//
// Application data directory resolution.

use std::path::PathBuf;

/// The Blattwerk data directory, created on first use.
///
/// Follows the XDG convention with a home-directory fallback; only the
/// config file and (on platforms without save dialogs) exported PDFs
/// live here.
pub fn data_dir() -> PathBuf {
    let dir = base_dir().join("blattwerk");
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// A named subdirectory of the data dir, e.g. "exports".
pub fn data_subdir(name: &str) -> PathBuf {
    let dir = data_dir().join(name);
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn base_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    PathBuf::from("/tmp")
}
