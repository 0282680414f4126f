mod preview;

pub use preview::read_preview;

use crate::error::DiscoveryError;
use std::fs;
use std::path::{Path, PathBuf};

/// List the `*.csv` files directly inside `dir`, sorted by name
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !dir.is_dir() {
        return Err(DiscoveryError::MissingInputDir(dir.to_path_buf()));
    }

    let read_err = |e| DiscoveryError::Read {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
