//! Naming and persisting augmented artifacts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use thiserror::Error;

/// JPEG quality used for every augmented image.
pub const JPEG_QUALITY: u8 = 95;

/// Why a single artifact could not be persisted.
#[derive(Debug, Error)]
pub enum WriteFailure {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl WriteFailure {
    /// The artifact path that failed.
    pub fn path(&self) -> &Path {
        match self {
            WriteFailure::Io { path, .. } | WriteFailure::Encode { path, .. } => path,
        }
    }
}

/// Writes images and labels into two parallel output roots.
///
/// An artifact stem `s` becomes `{images_dir}/s.jpg` and `{labels_dir}/s.txt`.
/// Existing files are overwritten.
#[derive(Clone, Debug)]
pub struct OutputWriter {
    images_dir: PathBuf,
    labels_dir: PathBuf,
    jpeg_quality: u8,
}

impl OutputWriter {
    pub fn new(images_dir: impl Into<PathBuf>, labels_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            labels_dir: labels_dir.into(),
            jpeg_quality: JPEG_QUALITY,
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn labels_dir(&self) -> &Path {
        &self.labels_dir
    }

    /// Create both output roots. Safe to call repeatedly and concurrently.
    pub fn prepare(&self) -> io::Result<()> {
        fs::create_dir_all(&self.images_dir)?;
        fs::create_dir_all(&self.labels_dir)
    }

    /// Path an image with this stem is written to.
    pub fn image_path(&self, stem: &str) -> PathBuf {
        self.images_dir.join(format!("{stem}.jpg"))
    }

    /// Path a label with this stem is written to.
    pub fn label_path(&self, stem: &str) -> PathBuf {
        self.labels_dir.join(format!("{stem}.txt"))
    }

    /// Encode `image` as JPEG and write it under `stem`.
    pub fn write_image(&self, stem: &str, image: &RgbImage) -> Result<PathBuf, WriteFailure> {
        let path = self.image_path(stem);

        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, self.jpeg_quality)
            .encode_image(image)
            .map_err(|source| WriteFailure::Encode {
                path: path.clone(),
                source,
            })?;

        fs::write(&path, encoded).map_err(|source| WriteFailure::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Write `label` byte-for-byte under `stem`.
    pub fn write_label(&self, stem: &str, label: &[u8]) -> Result<PathBuf, WriteFailure> {
        let path = self.label_path(stem);
        fs::write(&path, label).map_err(|source| WriteFailure::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
