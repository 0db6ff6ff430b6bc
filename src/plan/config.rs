//! Parameter lists for building an augmentation plan.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DetaugError;

/// Explicit parameter lists for an [`AugmentationPlan`](super::AugmentationPlan).
///
/// Missing fields fall back to the default lists, so a config file only
/// needs to name the lists it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AugmentationConfig {
    /// Weights of the red/blue-swapped image, each in `[0, 1]`.
    pub blend_ratios: Vec<f32>,
    /// Hue rotations on the 180-step wheel.
    pub hue_shifts: Vec<i32>,
    /// Multipliers for the HSV value channel.
    pub brightness_factors: Vec<f32>,
    /// Multipliers for the HSV saturation channel; negative values invert first.
    pub saturation_factors: Vec<f32>,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            blend_ratios: vec![0.25, 0.5, 0.75, 1.0],
            hue_shifts: vec![30, 60, 90, 120, 150],
            brightness_factors: vec![0.4, 1.1, 5.5],
            saturation_factors: vec![-0.5, 0.5, 1.5],
        }
    }
}

/// Load an [`AugmentationConfig`] from a YAML (`.yaml`/`.yml`) or JSON file.
pub fn load_config(path: &Path) -> Result<AugmentationConfig, DetaugError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let data = fs::read_to_string(path).map_err(|source| DetaugError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: Result<AugmentationConfig, String> = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&data).map_err(|e| e.to_string()),
        "json" => serde_json::from_str(&data).map_err(|e| e.to_string()),
        other => {
            return Err(DetaugError::UnsupportedFormat(format!(
                "config extension '{}' (supported: yaml, yml, json)",
                other
            )));
        }
    };

    parsed.map_err(|message| DetaugError::PlanConfigParse {
        path: path.to_path_buf(),
        message,
    })
}
