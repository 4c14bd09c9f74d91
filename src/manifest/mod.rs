//! Batch-command manifest generation
//!
//! A manifest is a plain text file with one `cp` command per file found under
//! the payload directory. It is the input of the transfer tool's `run`
//! subcommand.

pub mod template;

pub use template::{remote_uri, FixedDestination, LineTemplate, RandomPairedDestination, RenderedLine};

use crate::error::{AppError, Result};
use crate::random::RandomSource;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a successful build wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSummary {
    /// Manifest location
    pub path: PathBuf,
    /// Number of lines written, one per source file
    pub line_count: usize,
    /// Lines per target bucket
    pub lines_per_bucket: BTreeMap<String, usize>,
}

/// Convert a path to forward-slash form regardless of the host separator
pub fn to_slash(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        raw.into_owned()
    } else {
        raw.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Write one command line per file under `source_root` into `manifest_path`.
///
/// The manifest is created or truncated. `template` is consulted once per
/// file. On error the partially written manifest stays on disk and must not
/// be reused.
pub fn build_manifest(
    manifest_path: &Path,
    source_root: &Path,
    template: &dyn LineTemplate,
    rng: &mut dyn RandomSource,
) -> Result<ManifestSummary> {
    if !source_root.is_dir() {
        return Err(AppError::manifest_io(format!(
            "source '{}' is not a readable directory",
            source_root.display()
        )));
    }

    if let Some(parent) = manifest_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::manifest_io(format!("cannot create '{}': {}", parent.display(), e))
        })?;
    }

    let file = File::create(manifest_path).map_err(|e| {
        AppError::manifest_io(format!("cannot create '{}': {}", manifest_path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    let write_error = |e: std::io::Error| {
        AppError::manifest_io(format!("cannot write '{}': {}", manifest_path.display(), e))
    };

    let mut line_count = 0;
    let mut lines_per_bucket = BTreeMap::new();

    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        let path = to_slash(entry.path());
        let line = template.render_line(&path, rng);
        writeln!(writer, "{}", line.command).map_err(write_error)?;

        line_count += 1;
        *lines_per_bucket.entry(line.bucket).or_insert(0) += 1;
    }

    // Flush explicitly; Drop would swallow the error
    let file = writer.into_inner().map_err(|e| write_error(e.into_error()))?;
    file.sync_all().map_err(write_error)?;

    Ok(ManifestSummary {
        path: manifest_path.to_path_buf(),
        line_count,
        lines_per_bucket,
    })
}
