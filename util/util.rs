#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use image::RgbImage;

pub const BENCH_DIR: &str = "img";

pub fn load_images(images: &[PathBuf]) -> Vec<(String, RgbImage)> {
    images
        .iter()
        .map(|path| {
            image::open(path).map(|image| {
                (
                    path.file_name().unwrap().to_owned().into_string().unwrap(),
                    image.into_rgb8(),
                )
            })
        })
        .collect::<Result<_, _>>()
        .expect("loaded each image")
}

pub fn load_image_dir(dir: impl AsRef<Path>) -> Vec<(String, RgbImage)> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths = entries
        .collect::<Result<Vec<_>, _>>()
        .expect("read each file")
        .iter()
        .map(std::fs::DirEntry::path)
        .collect::<Vec<_>>();

    paths.sort();

    load_images(&paths)
}

pub fn load_image_dir_relative_to_root(dir: impl AsRef<Path>) -> Vec<(String, RgbImage)> {
    // assume current exe path is something like: target/build/deps/current_exe
    let exe = std::env::current_exe().unwrap();
    let root = exe
        .parent()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .and_then(Path::parent)
        .unwrap();

    load_image_dir(root.join(dir.as_ref()))
}

/// A smooth gradient with a solid border, for when no images are available.
pub fn synthetic_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if x < width / 16 || y < height / 16 {
            image::Rgb([240, 240, 235])
        } else {
            #[allow(clippy::cast_possible_truncation)]
            image::Rgb([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                ((x + y) * 127 / (width + height)) as u8,
            ])
        }
    })
}

static BENCH_IMAGES: OnceLock<Vec<(String, RgbImage)>> = OnceLock::new();

pub fn load_bench_images() -> Vec<(String, RgbImage)> {
    let mut images = load_image_dir_relative_to_root(BENCH_DIR);
    if images.is_empty() {
        images.push(("synthetic".to_owned(), synthetic_image(1920, 1080)));
    }
    images
}

pub fn bench_images() -> &'static [(String, RgbImage)] {
    BENCH_IMAGES.get_or_init(load_bench_images)
}
