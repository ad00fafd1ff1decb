#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use quantview::{Pixel, Raster};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

pub fn load_images(images: &[PathBuf]) -> Vec<(String, Raster)> {
    images
        .iter()
        .map(|path| {
            image::open(path).map(|image| {
                (
                    path.file_name().unwrap().to_owned().into_string().unwrap(),
                    Raster::try_from(&image.into_rgba8()).unwrap(),
                )
            })
        })
        .collect::<Result<_, _>>()
        .expect("loaded each image")
}

pub fn load_image_dir(dir: impl AsRef<Path>) -> Vec<(String, Raster)> {
    let mut paths = std::fs::read_dir(dir)
        .expect("read img directory")
        .collect::<Result<Vec<_>, _>>()
        .expect("read each file")
        .iter()
        .map(std::fs::DirEntry::path)
        .collect::<Vec<_>>();

    paths.sort();

    load_images(&paths)
}

/// Set this to a directory of images to benchmark on real photos instead of generated rasters.
pub const IMAGE_DIR_VAR: &str = "QUANTVIEW_BENCH_IMAGES";

pub fn gradient(width: u32, height: u32) -> Raster {
    Raster::from_fn(width, height, |row, col| {
        let r = (col * 255 / width.max(1)) as u8;
        let g = (row * 255 / height.max(1)) as u8;
        let b = ((row + col) * 255 / (width + height).max(1)) as u8;
        Pixel::new(r, g, b, 255)
    })
}

pub fn noise(width: u32, height: u32) -> Raster {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
    Raster::from_fn(width, height, |_, _| {
        let [r, g, b]: [u8; 3] = rng.gen();
        Pixel::new(r, g, b, 255)
    })
}

pub fn generated_rasters() -> Vec<(String, Raster)> {
    vec![
        ("gradient_1024x768".to_owned(), gradient(1024, 768)),
        ("noise_1024x768".to_owned(), noise(1024, 768)),
    ]
}

static BENCHMARK_RASTERS: OnceLock<Vec<(String, Raster)>> = OnceLock::new();

pub fn benchmark_rasters() -> &'static [(String, Raster)] {
    BENCHMARK_RASTERS.get_or_init(|| match std::env::var_os(IMAGE_DIR_VAR) {
        Some(dir) => load_image_dir(dir),
        None => generated_rasters(),
    })
}
