//! Expands command-line paths into the list of files to scan.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use defscan_core::profile::profile_for_extension;
use defscan_core::ScanOptions;
use ignore::WalkBuilder;
use tracing::debug;

/// Files named on the command line are always scanned. Directories are
/// walked honoring `.gitignore`, keeping files with a known extension.
pub fn collect_files(paths: &[PathBuf], options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("path not found: {}", path.display());
        }

        let walker = WalkBuilder::new(path).hidden(true).git_ignore(true).build();
        let before = files.len();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_some_and(|ft| ft.is_file()) && is_source(entry.path(), options) {
                files.push(entry.into_path());
            }
        }
        debug!(dir = %path.display(), files = files.len() - before, "walked");
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_source(path: &Path, options: &ScanOptions) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    options.extensions.contains_key(&ext) || profile_for_extension(&ext).is_some()
}
