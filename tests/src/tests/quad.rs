use hspgfx::{CopyMode, Quad, QuadColors};

use super::*;

fn square(x: i32, y: i32, size: i32) -> Quad {
    Quad::from_xy([x, x + size, x + size, x], [y, y, y + size, y + size])
}

#[test]
fn square_fill_covers_its_region() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 200, 200);
    surf.set_color(RED);
    surf.gsquare(&square(10, 10, 100));

    assert_eq!(count_color(surf, RED), 100 * 100);
    assert_eq!(px(surf, 10, 10), RED);
    assert_eq!(px(surf, 109, 109), RED);
    assert_eq!(px(surf, 110, 50), WHITE);
    assert_eq!(px(surf, 50, 9), WHITE);
}

#[test]
fn blended_square_fill() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 20, 20);
    surf.set_color(BLACK);
    surf.set_gmode(CopyMode::Blend, (32, 32), 128);
    surf.gsquare(&square(0, 0, 10));
    let c = px(surf, 5, 5);
    assert!((120..=135).contains(&c.red()), "{c:?}");
    assert_eq!(c.alpha(), 255);
}

#[test]
fn four_corner_gradient() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 100, 100);
    let yellow = ColorU8::from_rgb(255, 255, 0);
    surf.gsquare_gradient(
        &square(0, 0, 100),
        &QuadColors::new(RED, GREEN, BLUE, yellow),
    );

    let near = |a: ColorU8, b: [f32; 3], tol: f32| {
        let [r, g, bl] = a.rgb();
        (r as f32 - b[0]).abs() <= tol
            && (g as f32 - b[1]).abs() <= tol
            && (bl as f32 - b[2]).abs() <= tol
    };

    let tl = px(surf, 0, 0);
    assert!(near(tl, [255.0, 0.0, 0.0], 4.0), "{tl:?}");
    let br = px(surf, 99, 99);
    assert!(near(br, [0.0, 0.0, 255.0], 4.0), "{br:?}");

    // mean of the corners
    let mid = px(surf, 49, 49);
    assert!(near(mid, [127.5, 127.5, 63.75], 4.0), "{mid:?}");
}

#[test]
fn gradient_leaves_outside_untouched() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 60, 60);
    let diamond = Quad::from_xy([30, 50, 30, 10], [10, 30, 50, 30]);
    surf.gsquare_gradient(&diamond, &QuadColors::new(RED, RED, RED, RED));
    assert_eq!(px(surf, 30, 30), RED);
    assert_eq!(px(surf, 12, 12), WHITE);
    assert_eq!(px(surf, 48, 48), WHITE);
}

#[test]
fn image_quad_scales_bounding_boxes() {
    let Headless { mut screens, .. } = harness::headless();
    let src = screens.buffer(1, 8, 8);
    src.set_color(GREEN);
    src.boxf(0, 0, 3, 3);

    screens.buffer(2, 32, 32);
    screens
        .gsquare_image(&square(0, 0, 16), 1, &square(0, 0, 8))
        .unwrap();
    let dst = screens.get(2).unwrap();
    assert_eq!(px(dst, 0, 0), GREEN);
    assert_eq!(px(dst, 7, 7), GREEN);
    assert_eq!(px(dst, 8, 8), WHITE);
    assert_eq!(px(dst, 20, 20), WHITE);
}
