//! pixelmatch color metric, taken from https://github.com/dfrankland/pixelmatch-rs
//! itself adapted from JS pixelmatch from https://github.com/mapbox/pixelmatch
//! and adapted here for hspgfx bitmaps.
//! The anti-aliasing detection is left out: device output is compared to
//! device output, never to images from another rasterizer.

// pixelmatch-rs from https://github.com/dfrankland/pixelmatch-rs
// is released under the MIT license with the following copyright:
// Copyright (c) 2021, Dylan Frankland

// JS pixelmatch from https://github.com/mapbox/pixelmatch
// is released under the ISC license with the following copyright:
// Copyright (c) 2025, Mapbox

use hspgfx::ColorU8;
use hspgfx::render::{Bitmap, BitmapUsage};

pub struct Options {
    /// matching threshold (0 to 1); smaller is more sensitive
    pub threshold: f64,
    /// color of different pixels in diff output
    pub diff_color: ColorU8,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            threshold: 0.1,
            diff_color: ColorU8::from_rgb(255, 0, 0),
        }
    }
}

/// Count the pixels that differ between two bitmaps of the same size.
/// The diff image marks them over a transparent background.
pub fn pixelmatch(img1: &Bitmap, img2: &Bitmap, options: Option<Options>) -> (Option<Bitmap>, usize) {
    assert_eq!(img1.size(), img2.size(), "Image sizes do not match.");

    let (width, height) = img1.size();
    let options = options.unwrap_or_default();

    if img1.data() == img2.data() {
        return (None, 0);
    }

    // maximum acceptable square distance between two colors;
    // 35215 is the maximum possible value for the YIQ difference metric
    let max_delta = 35215_f64 * options.threshold * options.threshold;

    let mut diff_px = vec![ColorU8::default(); (width * height) as usize];
    let mut diff = 0;
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let pixel1 = img1.pixel(x, y).unwrap();
            let pixel2 = img2.pixel(x, y).unwrap();
            if color_delta(pixel1, pixel2).abs() > max_delta {
                diff_px[(y as u32 * width + x as u32) as usize] = options.diff_color;
                diff += 1;
            }
        }
    }

    let diff_img = Bitmap::from_colors(width, height, BitmapUsage::SOURCE, &diff_px).unwrap();
    (Some(diff_img), diff)
}

// calculate color difference according to the paper "Measuring perceived color difference
// using YIQ NTSC transmission color space in mobile applications" by Y. Kotsarenko and F. Ramos
fn color_delta(rgba1: ColorU8, rgba2: ColorU8) -> f64 {
    if rgba1 == rgba2 {
        return 0.0;
    }

    let [r1, g1, b1] = blend_white(rgba1);
    let [r2, g2, b2] = blend_white(rgba2);

    let y1 = rgb2y(r1, g1, b1);
    let y2 = rgb2y(r2, g2, b2);
    let y = y1 - y2;
    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);

    let delta = 0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q;

    // encode whether the pixel lightens or darkens in the sign
    if y1 > y2 { -delta } else { delta }
}

// blend semi-transparent color with white
fn blend_white(c: ColorU8) -> [f64; 3] {
    let a = c.alpha() as f64 / 255.0;
    c.rgb().map(|v| 255.0 + (v as f64 - 255.0) * a)
}

fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.29889531 + g * 0.58662247 + b * 0.11448223
}
fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.59597799 - g * 0.27417610 - b * 0.32180189
}
fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.21147017 - g * 0.52261711 + b * 0.31114694
}

#[test]
fn small_differences_are_tolerated() {
    let a = Bitmap::from_colors(2, 1, BitmapUsage::SOURCE, &[ColorU8::from_rgb(100, 100, 100); 2])
        .unwrap();
    let b = Bitmap::from_colors(
        2,
        1,
        BitmapUsage::SOURCE,
        &[ColorU8::from_rgb(101, 100, 100), ColorU8::from_rgb(0, 0, 0)],
    )
    .unwrap();
    let (diff_img, count) = pixelmatch(&a, &b, None);
    assert_eq!(count, 1);
    assert_eq!(diff_img.unwrap().pixel(1, 0), Some(ColorU8::from_rgb(255, 0, 0)));
}
