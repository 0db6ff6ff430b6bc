//! Per-pair augmentation.
//!
//! For one [`FilePair`] the engine decodes the image, reads the label bytes,
//! resizes the image to the canonical resolution, and writes one image/label
//! artifact pair per plan entry. Each pair moves through
//! `Pending -> Decoded -> Resized -> Augmenting(i) -> Done`, or stops with a
//! decode, read, or write error.
//!
//! - [`writer`]: naming and persisting artifacts
//! - [`pipeline`]: running many pairs and aggregating the outcome

pub mod pipeline;
mod report;
pub mod writer;

pub use pipeline::{run_pipeline, Execution, NoopObserver, PipelineObserver, TracingObserver};
pub use report::{PairFailure, RunReport};
pub use writer::{OutputWriter, WriteFailure, JPEG_QUALITY};

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;
use serde::Serialize;
use tracing::debug;

use crate::error::DetaugError;
use crate::pairing::FilePair;
use crate::plan::AugmentationPlan;

/// Every image is resized to `CANONICAL_SIZE x CANONICAL_SIZE` before augmentation.
pub const CANONICAL_SIZE: u32 = 640;

/// What a successfully processed pair produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PairOutcome {
    pub base_name: String,
    pub images: Vec<PathBuf>,
    pub labels: Vec<PathBuf>,
}

impl PairOutcome {
    /// Number of image/label artifact pairs written.
    pub fn written(&self) -> usize {
        self.images.len()
    }
}

/// Applies an [`AugmentationPlan`] to matched pairs.
#[derive(Clone, Debug)]
pub struct AugmentationEngine {
    plan: AugmentationPlan,
    writer: OutputWriter,
}

impl AugmentationEngine {
    pub fn new(plan: AugmentationPlan, writer: OutputWriter) -> Self {
        Self { plan, writer }
    }

    pub fn plan(&self) -> &AugmentationPlan {
        &self.plan
    }

    pub fn writer(&self) -> &OutputWriter {
        &self.writer
    }

    /// Process one pair to completion.
    ///
    /// On success exactly `plan.len()` images and `plan.len()` labels were
    /// written, with matching stems. A write failure leaves earlier artifacts
    /// of this pair on disk.
    pub fn process_pair(&self, pair: &FilePair) -> Result<PairOutcome, DetaugError> {
        let image = load_image(&pair.image_path)?;
        let label = fs::read(&pair.label_path).map_err(|source| DetaugError::Read {
            path: pair.label_path.clone(),
            source,
        })?;

        let image = canonicalize(image);
        debug!(
            base_name = %pair.base_name,
            label_bytes = label.len(),
            "pair decoded"
        );

        let mut outcome = PairOutcome {
            base_name: pair.base_name.clone(),
            images: Vec::with_capacity(self.plan.len()),
            labels: Vec::with_capacity(self.plan.len()),
        };

        for spec in &self.plan {
            let augmented = spec.transform.apply(&image);
            let stem = format!("{}_{}", pair.base_name, spec.suffix);

            let write_error = |source| DetaugError::Write {
                base_name: pair.base_name.clone(),
                spec_index: spec.index,
                suffix: spec.suffix.clone(),
                source,
            };

            let image_path = self
                .writer
                .write_image(&stem, &augmented)
                .map_err(write_error)?;
            let label_path = self
                .writer
                .write_label(&stem, &label)
                .map_err(write_error)?;

            outcome.images.push(image_path);
            outcome.labels.push(label_path);
        }

        Ok(outcome)
    }
}

/// Read and decode an image file into 8-bit RGB.
///
/// The codec is chosen from the file contents, not the extension.
pub fn load_image(path: &Path) -> Result<RgbImage, DetaugError> {
    let bytes = fs::read(path).map_err(|source| DetaugError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| DetaugError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoded.into_rgb8())
}

/// Resize to the canonical square resolution, ignoring aspect ratio.
pub fn canonicalize(image: RgbImage) -> RgbImage {
    if image.dimensions() == (CANONICAL_SIZE, CANONICAL_SIZE) {
        return image;
    }
    imageops::resize(&image, CANONICAL_SIZE, CANONICAL_SIZE, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};

    use crate::plan::AugmentationConfig;

    fn write_png(path: &Path, width: u32, height: u32) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 90])
        });
        image
            .save_with_format(path, ImageFormat::Png)
            .expect("write png");
    }

    fn engine_in(root: &Path, plan: AugmentationPlan) -> AugmentationEngine {
        let writer = OutputWriter::new(root.join("out_img"), root.join("out_txt"));
        writer.prepare().expect("prepare output");
        AugmentationEngine::new(plan, writer)
    }

    fn pair_in(root: &Path, name: &str) -> FilePair {
        FilePair {
            base_name: name.to_string(),
            image_path: root.join(format!("{name}.png")),
            label_path: root.join(format!("{name}.txt")),
        }
    }

    #[test]
    fn canonicalize_forces_square_resolution() {
        let wide = RgbImage::new(1280, 360);
        assert_eq!(canonicalize(wide).dimensions(), (640, 640));

        let exact = RgbImage::from_pixel(640, 640, Rgb([1, 2, 3]));
        assert_eq!(canonicalize(exact.clone()), exact);
    }

    #[test]
    fn process_pair_writes_one_artifact_pair_per_spec() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let pair = pair_in(temp.path(), "cat");
        write_png(&pair.image_path, 32, 24);
        fs::write(&pair.label_path, "0 0.5 0.5 0.2 0.2").expect("write label");

        let engine = engine_in(temp.path(), AugmentationPlan::default());
        let outcome = engine.process_pair(&pair).expect("process pair");

        assert_eq!(outcome.written(), 15);
        assert_eq!(outcome.labels.len(), 15);
        for (image, label) in outcome.images.iter().zip(&outcome.labels) {
            assert_eq!(image.file_stem(), label.file_stem());
            let decoded = image::open(image).expect("decode output");
            assert_eq!((decoded.width(), decoded.height()), (640, 640));
            assert_eq!(
                fs::read_to_string(label).expect("read label"),
                "0 0.5 0.5 0.2 0.2"
            );
        }
    }

    #[test]
    fn undecodable_image_is_a_decode_error() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let pair = pair_in(temp.path(), "broken");
        fs::write(&pair.image_path, b"definitely not an image").expect("write junk");
        fs::write(&pair.label_path, "0 0.5 0.5 0.1 0.1").expect("write label");

        let engine = engine_in(temp.path(), AugmentationPlan::default());
        let err = engine.process_pair(&pair).unwrap_err();
        assert!(matches!(err, DetaugError::Decode { .. }));
        assert_eq!(
            fs::read_dir(engine.writer().images_dir()).unwrap().count(),
            0
        );
    }

    #[test]
    fn missing_label_is_a_read_error() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let pair = pair_in(temp.path(), "lonely");
        write_png(&pair.image_path, 4, 4);

        let engine = engine_in(temp.path(), AugmentationPlan::default());
        let err = engine.process_pair(&pair).unwrap_err();
        assert!(matches!(err, DetaugError::Read { .. }));
    }

    #[test]
    fn write_failure_reports_spec_index() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let pair = pair_in(temp.path(), "cat");
        write_png(&pair.image_path, 4, 4);
        fs::write(&pair.label_path, "0 0.5 0.5 0.2 0.2").expect("write label");

        // labels root is never created, so the first label write fails
        let writer = OutputWriter::new(temp.path().join("img"), temp.path().join("missing"));
        fs::create_dir_all(writer.images_dir()).expect("create image root");
        let engine = AugmentationEngine::new(AugmentationPlan::default(), writer);

        let err = engine.process_pair(&pair).unwrap_err();
        match err {
            DetaugError::Write {
                spec_index, suffix, ..
            } => {
                assert_eq!(spec_index, 0);
                assert_eq!(suffix, "bgr_blend_0.25");
            }
            other => panic!("expected Write, got {other:?}"),
        }
        // the image of spec 0 stays behind
        assert!(temp.path().join("img/cat_bgr_blend_0.25.jpg").is_file());
    }

    #[test]
    fn substituted_plan_controls_output_count() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let pair = pair_in(temp.path(), "dog");
        write_png(&pair.image_path, 10, 10);
        fs::write(&pair.label_path, "").expect("write empty label");

        let config = AugmentationConfig {
            blend_ratios: vec![1.0],
            hue_shifts: vec![],
            brightness_factors: vec![],
            saturation_factors: vec![],
        };
        let plan = AugmentationPlan::new(&config).expect("valid plan");
        let engine = engine_in(temp.path(), plan);

        let outcome = engine.process_pair(&pair).expect("process pair");
        assert_eq!(outcome.written(), 1);
        assert!(outcome.images[0].ends_with("dog_bgr_blend_1.00.jpg"));
        assert!(fs::read(&outcome.labels[0]).expect("read label").is_empty());
    }
}
