//! Photometric color transforms.
//!
//! Buffers are `image::RgbImage`. Channel roles are explicit (red is byte 0,
//! blue is byte 2), so swapping and HSV math give the same colors as a
//! blue-first buffer would.
//!
//! - [`hsv`]: the 180-step HSV conversion shared by every HSV transform
//! - [`ops`]: the pure transform functions

pub mod hsv;
pub mod ops;

use std::fmt;

use image::RgbImage;
use serde::Serialize;

pub use ops::{blend, brightness_scale, hue_shift, saturation_scale};

/// One parameterized photometric transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorTransform {
    /// Blend with the red/blue-swapped image.
    Blend { ratio: f32 },
    /// Rotate hue on the 180-step wheel.
    HueShift { degrees: i32 },
    /// Scale the HSV value channel.
    Brightness { factor: f32 },
    /// Scale (or invert and scale) the HSV saturation channel.
    Saturation { factor: f32 },
}

impl ColorTransform {
    /// Apply the transform, returning a new buffer.
    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        match *self {
            ColorTransform::Blend { ratio } => blend(image, ratio),
            ColorTransform::HueShift { degrees } => hue_shift(image, degrees),
            ColorTransform::Brightness { factor } => brightness_scale(image, factor),
            ColorTransform::Saturation { factor } => saturation_scale(image, factor),
        }
    }

    /// Canonical file-name suffix for this transform.
    ///
    /// Each kind has its own prefix, so suffixes of different kinds never
    /// collide.
    pub fn suffix(&self) -> String {
        match *self {
            ColorTransform::Blend { ratio } => format!("bgr_blend_{:.2}", ratio),
            ColorTransform::HueShift { degrees } => format!("hue_shift_{}", degrees),
            ColorTransform::Brightness { factor } => format!("brightness_{:.1}", factor),
            ColorTransform::Saturation { factor } => {
                let sign = if factor < 0.0 { '-' } else { '+' };
                format!("saturation_{}{:.1}", sign, factor.abs())
            }
        }
    }

    /// Short name of the transform kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ColorTransform::Blend { .. } => "blend",
            ColorTransform::HueShift { .. } => "hue",
            ColorTransform::Brightness { .. } => "brightness",
            ColorTransform::Saturation { .. } => "saturation",
        }
    }
}

impl fmt::Display for ColorTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ColorTransform::HueShift { degrees } => write!(f, "hue {}", degrees),
            ColorTransform::Blend { ratio } => write!(f, "blend {}", ratio),
            ColorTransform::Brightness { factor } | ColorTransform::Saturation { factor } => {
                write!(f, "{} {}", self.kind_name(), factor)
            }
        }
    }
}
