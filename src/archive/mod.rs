//! Unpacking annotation-tool exports.
//!
//! Exports usually arrive as one zip per task, sometimes bundled inside an
//! outer zip. [`collect_archive`] flattens either shape into one folder per
//! task holding only the images or only the label files, ready for
//! [`match_pairs`](crate::pairing::match_pairs).

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::DetaugError;
use crate::pairing::{IMAGE_EXTENSIONS, LABEL_EXTENSIONS};
use crate::paths::{has_extension, rel_string};

/// Label-tool manifest that lists image paths; never a label itself.
const MANIFEST_FILE_NAME: &str = "train.txt";

/// Which files to keep from an archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectKind {
    Images,
    Labels,
}

impl CollectKind {
    fn accepts(&self, path: &Path) -> bool {
        match self {
            CollectKind::Images => has_extension(path, &IMAGE_EXTENSIONS),
            CollectKind::Labels => {
                has_extension(path, &LABEL_EXTENSIONS)
                    && !path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.eq_ignore_ascii_case(MANIFEST_FILE_NAME))
            }
        }
    }
}

/// Files copied out of one archive.
#[derive(Clone, Debug, Serialize)]
pub struct CollectGroup {
    /// Stem of the archive the files came from.
    pub name: String,
    pub output_dir: PathBuf,
    /// File names in copy order.
    pub files: Vec<String>,
    /// Archive paths not copied because an earlier file had the same name.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

/// Outcome of [`collect_archive`].
#[derive(Clone, Debug, Serialize)]
pub struct CollectReport {
    pub archive: PathBuf,
    pub kind: CollectKind,
    pub groups: Vec<CollectGroup>,
}

impl CollectReport {
    /// Total number of files copied.
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }
}

impl std::fmt::Display for CollectReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Collected {} file(s) from {} in {} group(s):",
            self.file_count(),
            self.archive.display(),
            self.groups.len()
        )?;
        for group in &self.groups {
            writeln!(
                f,
                "  {} -> {} ({} file(s))",
                group.name,
                group.output_dir.display(),
                group.files.len()
            )?;
            for path in &group.skipped {
                writeln!(f, "    skipped duplicate name: {}", path)?;
            }
        }
        Ok(())
    }
}

/// Unpack a zip archive into `dest`.
///
/// Entries whose path would escape `dest` are rejected by the zip reader.
pub fn extract(archive: &Path, dest: &Path) -> Result<PathBuf, DetaugError> {
    let file = File::open(archive).map_err(|source| DetaugError::Read {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut zip = zip::ZipArchive::new(file).map_err(|source| DetaugError::Archive {
        path: archive.to_path_buf(),
        message: source.to_string(),
    })?;

    debug!(archive = %archive.display(), entries = zip.len(), "extracting");
    zip.extract(dest).map_err(|source| DetaugError::Archive {
        path: archive.to_path_buf(),
        message: source.to_string(),
    })?;

    Ok(dest.to_path_buf())
}

/// Extract `archive` and copy files of `kind` into `out_dir/<archive stem>/`.
///
/// When the archive contains nested zips, each inner zip becomes its own
/// group named after the inner zip. Files are copied in case-insensitive file
/// name order; when two files share a name, the one whose archive path sorts
/// first is copied and the other is listed in [`CollectGroup::skipped`].
pub fn collect_archive(
    archive: &Path,
    out_dir: &Path,
    kind: CollectKind,
) -> Result<CollectReport, DetaugError> {
    let outer = tempfile::tempdir()?;
    extract(archive, outer.path())?;

    let mut report = CollectReport {
        archive: archive.to_path_buf(),
        kind,
        groups: Vec::new(),
    };

    let mut inner_archives = files_matching(outer.path(), |p| has_extension(p, &["zip"]))?;
    inner_archives.sort_by_cached_key(|p| sort_key(p));

    if inner_archives.is_empty() {
        let group = copy_group(outer.path(), &archive_stem(archive), out_dir, kind)?;
        report.groups.push(group);
    } else {
        info!(count = inner_archives.len(), "found nested archives");
        for inner in &inner_archives {
            let scratch = tempfile::tempdir()?;
            extract(inner, scratch.path())?;
            let group = copy_group(scratch.path(), &archive_stem(inner), out_dir, kind)?;
            report.groups.push(group);
        }
    }

    Ok(report)
}

fn copy_group(
    source_root: &Path,
    name: &str,
    out_dir: &Path,
    kind: CollectKind,
) -> Result<CollectGroup, DetaugError> {
    let mut files = files_matching(source_root, |p| kind.accepts(p))?;
    files.sort_by_cached_key(|p| (sort_key(p), rel_string(source_root, p)));

    let output_dir = out_dir.join(name);
    fs::create_dir_all(&output_dir)?;

    let mut seen = HashSet::new();
    let mut copied = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    for file in files {
        let Some(file_name) = file.file_name() else {
            continue;
        };
        if !seen.insert(file_name.to_os_string()) {
            let rel = rel_string(source_root, &file);
            warn!(group = name, path = %rel, "skipping file with duplicate name");
            skipped.push(rel);
            continue;
        }
        fs::copy(&file, output_dir.join(file_name))?;
        copied.push(file_name.to_string_lossy().into_owned());
    }

    info!(group = name, files = copied.len(), dir = %output_dir.display(), "copied");
    Ok(CollectGroup {
        name: name.to_string(),
        output_dir,
        files: copied,
        skipped,
    })
}

fn files_matching(
    root: &Path,
    accept: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, DetaugError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| DetaugError::Archive {
            path: root.to_path_buf(),
            message: format!("failed while traversing extracted files: {source}"),
        })?;
        if entry.file_type().is_file() && accept(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn archive_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string())
}
