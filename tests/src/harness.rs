use std::path::{Path, PathBuf};
use std::rc::Rc;

use hspgfx::render::Bitmap;
use hspgfx::{DeviceManager, ImageCodec, Options, Screens};
use hspgfx_pxl::{HeadlessHost, PxlBackend, PxlCodec};

use crate::pixelmatch::pixelmatch;

/// A headless runtime on the pxl device
pub struct Headless {
    pub backend: PxlBackend,
    pub host: Rc<HeadlessHost>,
    pub screens: Screens,
}

/// Options independent of the fonts installed on the machine
pub fn options() -> Options {
    Options::default().with_system_fonts(false)
}

/// DejaVu Sans, the only face of [`headless_with_font`]
const DEJAVU_SANS: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

pub fn headless() -> Headless {
    headless_with(PxlBackend::new(), options())
}

/// A headless runtime with a bundled font, for text tests
pub fn headless_with_font() -> Headless {
    headless_with(
        PxlBackend::new(),
        options().with_font_data(DEJAVU_SANS.to_vec()),
    )
}

pub fn headless_with(backend: PxlBackend, options: Options) -> Headless {
    let mut devices = DeviceManager::new(backend.clone(), options);
    devices.initialize().unwrap();
    let host = Rc::new(HeadlessHost::new());
    let screens = Screens::new(devices, host.clone());
    Headless {
        backend,
        host,
        screens,
    }
}

pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hspgfx-tests-{}-{name}", std::process::id()))
}

fn actual_file_path(name: &str) -> PathBuf {
    let tests_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(tests_dir).join("actual").join(name)
}

/// Compare two bitmaps. On mismatch, both images and the diff are written
/// to the `actual` directory and an error describes them.
pub fn check_bitmap_eq(actual: &Bitmap, expected: &Bitmap, name: &str) -> Result<(), String> {
    if actual.size() != expected.size() {
        return Err(format!(
            "{name}: size mismatch, {:?} vs {:?}",
            actual.size(),
            expected.size()
        ));
    }
    let (diff_img, diff_count) = pixelmatch(actual, expected, None);
    if diff_count == 0 {
        return Ok(());
    }

    let actual_file = actual_file_path(&format!("{name}.png"));
    let expected_file = actual_file_path(&format!("{name}-expected.png"));
    let diff_file = actual_file_path(&format!("{name}-diff.png"));
    std::fs::create_dir_all(actual_file.parent().unwrap()).unwrap();
    PxlCodec.save_image(actual, &actual_file).unwrap();
    PxlCodec.save_image(expected, &expected_file).unwrap();
    if let Some(diff_img) = diff_img {
        PxlCodec.save_image(&diff_img, &diff_file).unwrap();
    }
    Err(format!(
        "PXL assertion failed\n  Actual: {:?}\n  Expected: {:?}\n  Diff: {:?}\n  Diff count: {}",
        actual_file, expected_file, diff_file, diff_count
    ))
}

macro_rules! assert_bitmap_eq {
    ($actual:expr, $expected:expr, $name:expr) => {
        if let Err(msg) = $crate::harness::check_bitmap_eq($actual, $expected, $name) {
            panic!("{}", msg);
        }
    };
}

pub(crate) use assert_bitmap_eq;
