//! Input adapters (`spec.md` §4.I, interface-only there; a concrete
//! line-oriented file reader and a directory-of-files reader are
//! supplemented here per `SPEC_FULL.md` §0/§2).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use strmatrix_core::{HarryError, Result, SimString};

/// Produces the initial batch of [`SimString`]s a matrix is built over.
pub trait InputAdapter {
    fn read(&self, path: &Path) -> Result<Vec<SimString>>;
}

/// Reads one string per newline-terminated line, tagging each with its
/// 1-based line number as `src`.
pub struct LineInput;

impl InputAdapter for LineInput {
    fn read(&self, path: &Path) -> Result<Vec<SimString>> {
        // `spec.md` §7: an un-openable input batch is `Fatal`, by the same
        // logic as an un-openable output sink.
        let file = File::open(path)
            .map_err(|e| HarryError::Fatal(format!("could not open '{}': {e}", path.display())))?;
        let reader = BufReader::new(file);

        let mut batch = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line
                .map_err(|e| HarryError::Resource(format!("could not read '{}': {e}", path.display())))?;
            let src = format!("{}:{}", path.display(), idx + 1);
            batch.push(SimString::from_bytes(
                Some(src),
                None,
                idx as u64,
                line.into_bytes(),
            ));
        }
        Ok(batch)
    }
}

/// Reads one string per regular file in a directory, tagging each with
/// its path as `src`. Files are visited in sorted filename order so
/// `idx` assignment is stable across runs (`spec.md` §4.I: "stable
/// `idx` assignments starting from 0"). Not recursive: subdirectories
/// are skipped.
pub struct DirInput;

impl InputAdapter for DirInput {
    fn read(&self, path: &Path) -> Result<Vec<SimString>> {
        let entries = std::fs::read_dir(path)
            .map_err(|e| HarryError::Fatal(format!("could not open '{}': {e}", path.display())))?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        let mut batch = Vec::with_capacity(paths.len());
        for (idx, file_path) in paths.into_iter().enumerate() {
            let bytes = std::fs::read(&file_path).map_err(|e| {
                HarryError::Resource(format!("could not read '{}': {e}", file_path.display()))
            })?;
            batch.push(SimString::from_bytes(
                Some(file_path.display().to_string()),
                None,
                idx as u64,
                bytes,
            ));
        }
        Ok(batch)
    }
}
