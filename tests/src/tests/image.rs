use hspgfx::{ImageCodec, PicloadMode};
use hspgfx_pxl::PxlCodec;

use super::*;

#[test]
fn bmpsave_round_trip() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 16, 8);
    let c = ColorU8::from_rgb(10, 200, 30);
    surf.set_color(c);
    surf.boxf(0, 0, 15, 7);

    let path = harness::temp_path("round_trip.bmp");
    assert!(surf.bmpsave(&path));
    let loaded = PxlCodec.load_image(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.size(), (16, 8));
    for (x, y) in [(0, 0), (15, 0), (0, 7), (15, 7), (8, 4)] {
        assert_eq!(loaded.pixel(x, y), Some(c));
    }
}

#[test]
fn picload_draws_at_cursor() {
    let Headless { mut screens, .. } = harness::headless();
    let img = screens.buffer(1, 4, 4);
    img.set_color(RED);
    img.boxf(0, 0, 3, 3);
    let path = harness::temp_path("picload.png");
    PxlCodec
        .save_image(img.bitmap().unwrap(), &path)
        .unwrap();

    let surf = screens.buffer(2, 16, 16);
    surf.set_color(BLUE);
    surf.boxf(0, 0, 15, 15);
    surf.pos(6, 6);
    assert!(surf.picload(&path, PicloadMode::ClearBlack));
    std::fs::remove_file(&path).unwrap();

    assert_eq!(px(surf, 6, 6), RED);
    assert_eq!(px(surf, 9, 9), RED);
    assert_eq!(px(surf, 10, 10), BLACK);
    assert_eq!(px(surf, 0, 0), BLACK);
}

#[test]
fn failed_picload_changes_nothing() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 8, 8);
    surf.set_color(GREEN);
    surf.boxf(0, 0, 7, 7);
    assert!(!surf.picload(harness::temp_path("nope.png"), PicloadMode::Overlay));
    assert_eq!(count_color(surf, GREEN), 64);
}
