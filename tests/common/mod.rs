#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

pub const LABEL_LINE: &str = "0 0.5 0.5 0.25 0.25\n";

/// Image with a left-to-right red ramp over a fixed blue, so color
/// transforms have something to change.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgb([r, g, 96])
    })
}

pub fn write_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    gradient(width, height)
        .save_with_format(path, format)
        .expect("write image file");
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    write_image(path, width, height, ImageFormat::Png);
}

pub fn write_jpg(path: &Path, width: u32, height: u32) {
    write_image(path, width, height, ImageFormat::Jpeg);
}

pub fn write_label(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write label file");
}

/// Populate `root/images` and `root/labels` with one pair per name.
pub fn write_dataset(root: &Path, names: &[&str]) {
    for name in names {
        write_jpg(&root.join("images").join(format!("{name}.jpg")), 32, 24);
        write_label(
            &root.join("labels").join(format!("{name}.txt")),
            LABEL_LINE,
        );
    }
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
