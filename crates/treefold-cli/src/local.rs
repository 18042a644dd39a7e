//! Directory listings from the local filesystem.

use std::fs;
use std::io;
use std::path::Path;

use treefold_core::files::{DirEntryInfo, DirectorySource};

/// [`DirectorySource`] backed by `std::fs`. Symlinks are reported as the
/// kind they point to; broken ones as zero-length files.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDirectory;

impl DirectorySource for LocalDirectory {
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            let info = match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => DirEntryInfo::dir(path),
                Ok(meta) => DirEntryInfo::file(path, meta.len()),
                Err(_) => DirEntryInfo::file(path, 0),
            };
            entries.push(info);
        }
        Ok(entries)
    }
}
