//! Pairing report types for structured coverage reporting.
//!
//! The report is the outcome of the validation gate: the matched pairs, the
//! base names present on only one side, and any problems found on the way.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A verified image/label pair sharing one base name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilePair {
    pub base_name: String,
    pub image_path: PathBuf,
    pub label_path: PathBuf,
}

/// Base names that appear on exactly one side.
///
/// These are exclusions, not errors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MismatchReport {
    pub images_without_labels: BTreeSet<String>,
    pub labels_without_images: BTreeSet<String>,
}

impl MismatchReport {
    /// Total number of excluded base names.
    pub fn len(&self) -> usize {
        self.images_without_labels.len() + self.labels_without_images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which input tree a file came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Images,
    Labels,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Images => write!(f, "images"),
            Side::Labels => write!(f, "labels"),
        }
    }
}

/// A base name found more than once within one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateBaseName {
    pub side: Side,
    pub base_name: String,
    /// The path kept for matching.
    pub kept: PathBuf,
    /// Every other candidate, in tie-break order.
    pub ignored: Vec<PathBuf>,
}

/// The result of reconciling an image tree with a label tree.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PairingReport {
    /// Distinct image base names discovered.
    pub image_count: usize,
    /// Distinct label base names discovered.
    pub label_count: usize,
    /// Matched pairs, sorted by base name.
    pub pairs: Vec<FilePair>,
    pub mismatches: MismatchReport,
    pub duplicates: Vec<DuplicateBaseName>,
    pub issues: Vec<PairingIssue>,
}

impl PairingReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: PairingIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if augmentation may proceed.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }
}

impl fmt::Display for PairingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Pairing: {} image(s), {} label(s), {} matched pair(s)",
            self.image_count,
            self.label_count,
            self.pairs.len()
        )?;

        if !self.mismatches.images_without_labels.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "Images without labels ({}):",
                self.mismatches.images_without_labels.len()
            )?;
            for name in &self.mismatches.images_without_labels {
                writeln!(f, "  - {}", name)?;
            }
        }

        if !self.mismatches.labels_without_images.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "Labels without images ({}):",
                self.mismatches.labels_without_images.len()
            )?;
            for name in &self.mismatches.labels_without_images {
                writeln!(f, "  - {}", name)?;
            }
        }

        if !self.issues.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "Issues: {} error(s) and {} warning(s):",
                self.error_count(),
                self.warning_count()
            )?;
            for issue in &self.issues {
                writeln!(f, "  {}", issue)?;
            }
        }

        if self.is_ok() {
            writeln!(f)?;
            writeln!(f, "Validation passed")?;
        }

        Ok(())
    }
}

/// A single pairing issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct PairingIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
}

impl PairingIssue {
    /// Creates a new error.
    pub fn error(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    /// Creates a new warning.
    pub fn warning(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for PairingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(f, "[{}] {:?}: {}", severity, self.code, self.message)
    }
}

/// The severity of a pairing issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Reported, but augmentation may still run.
    Warning,
    /// Blocks augmentation.
    Error,
}

/// A stable code identifying the type of pairing issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// The image root does not exist or is not a directory.
    MissingImagesRoot,
    /// The label root does not exist or is not a directory.
    MissingLabelsRoot,
    /// No base name is shared by both sides.
    NoMatchedPairs,
    /// One side holds several files with the same base name.
    DuplicateBaseName,
    /// An entry could not be read while walking a tree.
    WalkError,
}
