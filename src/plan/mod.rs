//! The fixed battery of augmentations applied to every image.
//!
//! A plan is built once from an [`AugmentationConfig`] and never changes
//! afterwards. Construction checks parameters and rejects plans whose
//! suffixes would collide on disk.

mod config;

pub use config::{load_config, AugmentationConfig};

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::color::ColorTransform;
use crate::error::DetaugError;

/// One entry of the plan: a transform plus the suffix its outputs carry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AugmentationSpec {
    /// Position in the plan, starting at 0.
    pub index: usize,
    pub transform: ColorTransform,
    pub suffix: String,
}

/// Ordered, collision-free list of augmentation specs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AugmentationPlan {
    specs: Vec<AugmentationSpec>,
}

impl AugmentationPlan {
    /// Build a plan from explicit parameter lists.
    ///
    /// Order is blend ratios, hue shifts, brightness factors, then
    /// saturation factors, each in the order given.
    pub fn new(config: &AugmentationConfig) -> Result<Self, DetaugError> {
        validate_parameters(config)?;

        let specs = build_specs(config);
        if specs.is_empty() {
            return Err(DetaugError::InvalidPlan {
                message: "plan contains no augmentations".to_string(),
            });
        }

        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for spec in &specs {
            if let Some(first) = seen.insert(spec.suffix.as_str(), spec.index) {
                return Err(DetaugError::InvalidPlan {
                    message: format!(
                        "augmentations #{} and #{} both produce suffix '{}'",
                        first, spec.index, spec.suffix
                    ),
                });
            }
        }

        Ok(Self { specs })
    }

    /// All specs, in plan order.
    pub fn specs(&self) -> &[AugmentationSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AugmentationSpec> {
        self.specs.iter()
    }
}

impl Default for AugmentationPlan {
    /// The default 15-entry plan.
    fn default() -> Self {
        Self {
            specs: build_specs(&AugmentationConfig::default()),
        }
    }
}

impl<'a> IntoIterator for &'a AugmentationPlan {
    type Item = &'a AugmentationSpec;
    type IntoIter = std::slice::Iter<'a, AugmentationSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

impl fmt::Display for AugmentationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Augmentation plan ({} per image):", self.specs.len())?;
        for spec in &self.specs {
            writeln!(
                f,
                "  {:>2}  {:<16} {}",
                spec.index,
                spec.transform.to_string(),
                spec.suffix
            )?;
        }
        Ok(())
    }
}

fn build_specs(config: &AugmentationConfig) -> Vec<AugmentationSpec> {
    let transforms = config
        .blend_ratios
        .iter()
        .map(|&ratio| ColorTransform::Blend { ratio })
        .chain(
            config
                .hue_shifts
                .iter()
                .map(|&degrees| ColorTransform::HueShift { degrees }),
        )
        .chain(
            config
                .brightness_factors
                .iter()
                .map(|&factor| ColorTransform::Brightness { factor }),
        )
        .chain(
            config
                .saturation_factors
                .iter()
                .map(|&factor| ColorTransform::Saturation { factor }),
        );

    transforms
        .enumerate()
        .map(|(index, transform)| AugmentationSpec {
            index,
            suffix: transform.suffix(),
            transform,
        })
        .collect()
}

fn validate_parameters(config: &AugmentationConfig) -> Result<(), DetaugError> {
    for &ratio in &config.blend_ratios {
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            return Err(DetaugError::InvalidPlan {
                message: format!("blend ratio {} must be within [0, 1]", ratio),
            });
        }
    }

    let factors = config
        .brightness_factors
        .iter()
        .map(|f| ("brightness", f))
        .chain(config.saturation_factors.iter().map(|f| ("saturation", f)));
    for (kind, factor) in factors {
        if !factor.is_finite() {
            return Err(DetaugError::InvalidPlan {
                message: format!("{} factor {} is not finite", kind, factor),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_has_fifteen_specs_in_order() {
        let plan = AugmentationPlan::default();
        let suffixes: Vec<&str> = plan.iter().map(|s| s.suffix.as_str()).collect();
        assert_eq!(
            suffixes,
            vec![
                "bgr_blend_0.25",
                "bgr_blend_0.50",
                "bgr_blend_0.75",
                "bgr_blend_1.00",
                "hue_shift_30",
                "hue_shift_60",
                "hue_shift_90",
                "hue_shift_120",
                "hue_shift_150",
                "brightness_0.4",
                "brightness_1.1",
                "brightness_5.5",
                "saturation_-0.5",
                "saturation_+0.5",
                "saturation_+1.5",
            ]
        );
        assert_eq!(plan.specs()[14].index, 14);
    }

    #[test]
    fn default_plan_passes_construction_checks() {
        let built = AugmentationPlan::new(&AugmentationConfig::default()).expect("valid plan");
        assert_eq!(built, AugmentationPlan::default());
    }

    #[test]
    fn colliding_suffixes_are_rejected() {
        let config = AugmentationConfig {
            brightness_factors: vec![1.11, 1.14],
            ..Default::default()
        };
        let err = AugmentationPlan::new(&config).unwrap_err();
        match err {
            DetaugError::InvalidPlan { message } => assert!(message.contains("brightness_1.1")),
            other => panic!("expected InvalidPlan, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_blend_ratio_is_rejected() {
        let config = AugmentationConfig {
            blend_ratios: vec![1.5],
            ..Default::default()
        };
        assert!(matches!(
            AugmentationPlan::new(&config),
            Err(DetaugError::InvalidPlan { .. })
        ));
    }

    #[test]
    fn non_finite_factor_is_rejected() {
        let config = AugmentationConfig {
            saturation_factors: vec![f32::NAN],
            ..Default::default()
        };
        assert!(matches!(
            AugmentationPlan::new(&config),
            Err(DetaugError::InvalidPlan { .. })
        ));
    }

    #[test]
    fn empty_plan_is_rejected() {
        let config = AugmentationConfig {
            blend_ratios: vec![],
            hue_shifts: vec![],
            brightness_factors: vec![],
            saturation_factors: vec![],
        };
        assert!(AugmentationPlan::new(&config).is_err());
    }

    #[test]
    fn extreme_hue_shift_from_config_applies_cleanly() {
        let config = AugmentationConfig {
            blend_ratios: vec![],
            hue_shifts: vec![i32::MAX, i32::MIN],
            brightness_factors: vec![],
            saturation_factors: vec![],
        };
        let plan = AugmentationPlan::new(&config).expect("valid plan");
        let green = image::RgbImage::from_pixel(2, 2, image::Rgb([0, 255, 0]));
        for spec in &plan {
            let out = spec.transform.apply(&green);
            assert_eq!(out.dimensions(), (2, 2));
        }
        assert_eq!(plan.specs()[0].suffix, format!("hue_shift_{}", i32::MAX));
    }

    #[test]
    fn substituted_plan_keeps_custom_order() {
        let config = AugmentationConfig {
            blend_ratios: vec![],
            hue_shifts: vec![90],
            brightness_factors: vec![],
            saturation_factors: vec![-1.0],
        };
        let plan = AugmentationPlan::new(&config).expect("valid plan");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.specs()[0].suffix, "hue_shift_90");
        assert_eq!(plan.specs()[1].suffix, "saturation_-1.0");
    }
}
