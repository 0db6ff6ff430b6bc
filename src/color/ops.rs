//! The four photometric transforms.
//!
//! Every function takes an 8-bit RGB buffer by reference and returns a new
//! buffer of the same size. None of them move pixels, so bounding boxes stay
//! valid for every output.

use image::RgbImage;

use super::hsv::{self, Hsv, HUE_PERIOD};

/// Blend the image with its red/blue-swapped copy.
///
/// `ratio = 0` returns the input, `ratio = 1` returns the fully swapped image.
pub fn blend(image: &RgbImage, ratio: f32) -> RgbImage {
    let mix = |own: u8, swapped: u8| {
        let own = f32::from(own);
        hsv::round_saturate(own + (f32::from(swapped) - own) * ratio)
    };
    map_pixels(image, |[r, g, b]| [mix(r, b), g, mix(b, r)])
}

/// Rotate hue by `degrees` steps on the 180-step wheel, wrapping around.
///
/// Any `i32` is accepted; only `degrees mod 180` matters.
pub fn hue_shift(image: &RgbImage, degrees: i32) -> RgbImage {
    let step = degrees.rem_euclid(HUE_PERIOD);
    map_hsv(image, |px| Hsv {
        h: (i32::from(px.h) + step).rem_euclid(HUE_PERIOD) as u8,
        ..px
    })
}

/// Scale the value channel by `factor`, clamped to `[0, 255]`.
pub fn brightness_scale(image: &RgbImage, factor: f32) -> RgbImage {
    map_hsv(image, |px| Hsv {
        v: hsv::truncate_saturate(f32::from(px.v) * factor),
        ..px
    })
}

/// Scale the saturation channel by `factor`.
///
/// Negative factors invert saturation first (`1 - s/255`) and then scale by
/// `|factor|`, so `-1.0` turns vivid pixels gray and gray pixels vivid.
pub fn saturation_scale(image: &RgbImage, factor: f32) -> RgbImage {
    map_hsv(image, |px| {
        let s = f32::from(px.s);
        let scaled = if factor < 0.0 {
            (1.0 - s / 255.0) * factor.abs() * 255.0
        } else {
            s * factor
        };
        Hsv {
            s: hsv::truncate_saturate(scaled),
            ..px
        }
    })
}

fn map_hsv(image: &RgbImage, f: impl Fn(Hsv) -> Hsv) -> RgbImage {
    map_pixels(image, |rgb| hsv::hsv_to_rgb(f(hsv::rgb_to_hsv(rgb))))
}

fn map_pixels(image: &RgbImage, f: impl Fn([u8; 3]) -> [u8; 3]) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        pixel.0 = f(pixel.0);
    }
    out
}
