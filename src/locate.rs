//! Dataset discovery.
//!
//! An explicit `--input` path always wins and is never searched for. Without
//! one, the locator walks a search root recursively and takes the first file
//! whose name matches the dataset file name. Traversal is sorted by file name
//! so the first match is stable across platforms.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, info};
use walkdir::WalkDir;

use crate::error::PipelineError;

fn default_search_root() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolves the dataset file to load, either from an explicit path or by
/// recursive search under `search_root` (the user's home directory when no
/// root is given).
pub fn locate_dataset(
    input: Option<&Path>,
    search_root: Option<&Path>,
    file_name: &str,
) -> Result<PathBuf> {
    if let Some(path) = input {
        if path.is_file() {
            debug!("Using explicit dataset path {path:?}");
            return Ok(path.to_path_buf());
        }
        let root = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        return Err(PipelineError::DatasetNotFound {
            name: path.display().to_string(),
            root,
        }
        .into());
    }

    let root = search_root
        .map(Path::to_path_buf)
        .unwrap_or_else(default_search_root);
    info!("Searching for '{file_name}' under {root:?}");
    for entry in WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.file_type().is_file() && entry.file_name().to_str() == Some(file_name) {
            debug!("Found dataset at {:?}", entry.path());
            return Ok(entry.into_path());
        }
    }
    Err(PipelineError::DatasetNotFound {
        name: file_name.to_string(),
        root,
    }
    .into())
}
