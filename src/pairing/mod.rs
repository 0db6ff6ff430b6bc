//! Reconciles an image tree with a label tree into verified pairs.
//!
//! Both trees are walked recursively. Files join on their base name (the
//! file stem), regardless of which subfolder they sit in. The walk always runs
//! to completion, so the mismatch sets are complete even when the gate fails.

mod report;

pub use report::{
    DuplicateBaseName, FilePair, IssueCode, MismatchReport, PairingIssue, PairingReport, Severity,
    Side,
};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::paths::{base_name, has_extension, rel_string};

/// Extensions accepted as images by default.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
/// Extensions accepted as labels by default.
pub const LABEL_EXTENSIONS: [&str; 1] = ["txt"];

/// Options for pair discovery.
#[derive(Clone, Debug)]
pub struct MatchOptions {
    /// Image extensions, compared case-insensitively.
    pub image_extensions: Vec<String>,
    /// Label extensions, compared case-insensitively.
    pub label_extensions: Vec<String>,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            image_extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            label_extensions: LABEL_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            follow_links: true,
        }
    }
}

/// Match images to labels by base name.
///
/// Never fails outright: missing roots and an empty intersection are
/// recorded as error-level issues, and [`PairingReport::is_ok`] tells the
/// caller whether augmentation may proceed.
///
/// When one side holds several files with the same base name, the one whose
/// root-relative path sorts first is kept and the rest are reported.
pub fn match_pairs(images_root: &Path, labels_root: &Path, opts: &MatchOptions) -> PairingReport {
    let mut report = PairingReport::new();

    let images = discover_side(
        images_root,
        Side::Images,
        &opts.image_extensions,
        opts.follow_links,
        &mut report,
    );
    let labels = discover_side(
        labels_root,
        Side::Labels,
        &opts.label_extensions,
        opts.follow_links,
        &mut report,
    );

    report.image_count = images.len();
    report.label_count = labels.len();

    for (name, image_path) in &images {
        match labels.get(name) {
            Some(label_path) => report.pairs.push(FilePair {
                base_name: name.clone(),
                image_path: image_path.clone(),
                label_path: label_path.clone(),
            }),
            None => {
                report
                    .mismatches
                    .images_without_labels
                    .insert(name.clone());
            }
        }
    }

    report.mismatches.labels_without_images = labels
        .keys()
        .filter(|name| !images.contains_key(*name))
        .cloned()
        .collect();

    if report.pairs.is_empty() {
        report.add(PairingIssue::error(
            IssueCode::NoMatchedPairs,
            format!(
                "no base name is shared by '{}' and '{}'",
                images_root.display(),
                labels_root.display()
            ),
        ));
    }

    report
}

/// Walk one side and resolve each base name to a single path.
fn discover_side(
    root: &Path,
    side: Side,
    extensions: &[String],
    follow_links: bool,
    report: &mut PairingReport,
) -> BTreeMap<String, PathBuf> {
    if !root.is_dir() {
        let code = match side {
            Side::Images => IssueCode::MissingImagesRoot,
            Side::Labels => IssueCode::MissingLabelsRoot,
        };
        report.add(PairingIssue::error(
            code,
            format!("{} root '{}' is not a directory", side, root.display()),
        ));
        return BTreeMap::new();
    }

    let mut candidates: BTreeMap<String, Vec<(String, PathBuf)>> = BTreeMap::new();

    for entry in WalkDir::new(root).follow_links(follow_links) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let location = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                report.add(PairingIssue::warning(
                    IssueCode::WalkError,
                    format!("skipped {} entry '{}': {}", side, location, err),
                ));
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }

        let Some(name) = base_name(entry.path()) else {
            continue;
        };

        let path = entry.into_path();
        candidates
            .entry(name)
            .or_default()
            .push((rel_string(root, &path), path));
    }

    let mut resolved = BTreeMap::new();
    for (name, mut paths) in candidates {
        paths.sort();
        let mut paths = paths.into_iter().map(|(_, path)| path);
        let Some(kept) = paths.next() else {
            continue;
        };
        let ignored: Vec<PathBuf> = paths.collect();

        if !ignored.is_empty() {
            report.add(PairingIssue::warning(
                IssueCode::DuplicateBaseName,
                format!(
                    "{} base name '{}' found {} times; using '{}'",
                    side,
                    name,
                    ignored.len() + 1,
                    kept.display()
                ),
            ));
            report.duplicates.push(DuplicateBaseName {
                side,
                base_name: name.clone(),
                kept: kept.clone(),
                ignored,
            });
        }

        resolved.insert(name, kept);
    }

    resolved
}
