#![allow(dead_code)]

use image::{Rgb, RgbImage};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Small images with arbitrary pixels.
pub fn arb_image(max_side: u32) -> BoxedStrategy<RgbImage> {
    (1u32..=max_side, 1u32..=max_side)
        .prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<[u8; 3]>(), (w * h) as usize)
                .prop_map(move |pixels| image_from_pixels(w, pixels))
        })
        .boxed()
}

/// Small images built only from pixels that survive an HSV round trip
/// exactly: grays, and the six primaries and secondaries at any intensity
/// level 0 or 255.
pub fn arb_wheel_image(max_side: u32) -> BoxedStrategy<RgbImage> {
    (1u32..=max_side, 1u32..=max_side)
        .prop_flat_map(|(w, h)| {
            proptest::collection::vec(wheel_pixel(), (w * h) as usize)
                .prop_map(move |pixels| image_from_pixels(w, pixels))
        })
        .boxed()
}

/// Small images of gray pixels only.
pub fn arb_gray_image(max_side: u32) -> BoxedStrategy<RgbImage> {
    (1u32..=max_side, 1u32..=max_side)
        .prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<u8>().prop_map(|v| [v, v, v]), (w * h) as usize)
                .prop_map(move |pixels| image_from_pixels(w, pixels))
        })
        .boxed()
}

fn wheel_pixel() -> impl Strategy<Value = [u8; 3]> {
    prop_oneof![
        Just([255, 0, 0]),
        Just([255, 255, 0]),
        Just([0, 255, 0]),
        Just([0, 255, 255]),
        Just([0, 0, 255]),
        Just([255, 0, 255]),
        Just([0, 0, 0]),
        Just([255, 255, 255]),
    ]
}

fn image_from_pixels(width: u32, pixels: Vec<[u8; 3]>) -> RgbImage {
    let height = pixels.len() as u32 / width;
    RgbImage::from_fn(width, height, |x, y| {
        Rgb(pixels[(y * width + x) as usize])
    })
}
