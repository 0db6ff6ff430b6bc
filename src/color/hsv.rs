//! 8-bit HSV conversion on a 180-step hue circle.
//!
//! The forward conversion uses 12-bit fixed-point division tables so that hue
//! and saturation round identically on every platform. The inverse conversion
//! runs in single precision and rounds half-to-even before saturating to
//! `[0, 255]`.

use std::sync::LazyLock;

/// Number of hue steps in one full turn of the color wheel.
pub const HUE_PERIOD: i32 = 180;

const HSV_SHIFT: i32 = 12;
const HSV_ROUND: i32 = 1 << (HSV_SHIFT - 1);

/// Order in which `[v, p, q, t]` feed `(b, g, r)` for each hue sector.
const SECTOR_DATA: [[usize; 3]; 6] = [
    [1, 3, 0],
    [1, 0, 2],
    [3, 0, 1],
    [0, 2, 1],
    [0, 1, 3],
    [2, 1, 0],
];

struct DivTables {
    sdiv: [i32; 256],
    hdiv: [i32; 256],
}

static DIV_TABLES: LazyLock<DivTables> = LazyLock::new(|| {
    let mut sdiv = [0i32; 256];
    let mut hdiv = [0i32; 256];
    let one = f64::from(1 << HSV_SHIFT);
    for i in 1..256 {
        let denom = i as f64;
        sdiv[i] = (255.0 * one / denom).round_ties_even() as i32;
        hdiv[i] = (f64::from(HUE_PERIOD) * one / (6.0 * denom)).round_ties_even() as i32;
    }
    DivTables { sdiv, hdiv }
});

/// A single pixel in HSV space. `h` lies in `[0, 180)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

/// Convert one `[r, g, b]` pixel to HSV.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> Hsv {
    let tables = &*DIV_TABLES;
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));

    let v = r.max(g).max(b);
    let diff = v - r.min(g).min(b);

    let s = (diff * tables.sdiv[v as usize] + HSV_ROUND) >> HSV_SHIFT;

    let h = if v == r {
        g - b
    } else if v == g {
        b - r + 2 * diff
    } else {
        r - g + 4 * diff
    };
    let mut h = (h * tables.hdiv[diff as usize] + HSV_ROUND) >> HSV_SHIFT;
    if h < 0 {
        h += HUE_PERIOD;
    }

    Hsv {
        h: h as u8,
        s: s as u8,
        v: v as u8,
    }
}

/// Convert one HSV pixel back to `[r, g, b]`.
///
/// Hue values outside `[0, 180)` wrap around.
pub fn hsv_to_rgb(hsv: Hsv) -> [u8; 3] {
    let s = f32::from(hsv.s) * (1.0 / 255.0);
    let v = f32::from(hsv.v) * (1.0 / 255.0);

    let (b, g, r) = if s == 0.0 {
        (v, v, v)
    } else {
        let mut h = f32::from(hsv.h) * (6.0 / HUE_PERIOD as f32);
        h %= 6.0;
        if h < 0.0 {
            h += 6.0;
        }

        let mut sector = h.floor() as i32;
        h -= sector as f32;
        if !(0..6).contains(&sector) {
            sector = 0;
            h = 0.0;
        }

        let tab = [v, v * (1.0 - s), v * (1.0 - s * h), v * (1.0 - s * (1.0 - h))];
        let [bi, gi, ri] = SECTOR_DATA[sector as usize];
        (tab[bi], tab[gi], tab[ri])
    };

    [
        round_saturate(r * 255.0),
        round_saturate(g * 255.0),
        round_saturate(b * 255.0),
    ]
}

/// Round half-to-even, then clamp to the 8-bit range.
pub(crate) fn round_saturate(value: f32) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Clamp to the 8-bit range, then drop the fractional part.
pub(crate) fn truncate_saturate(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
