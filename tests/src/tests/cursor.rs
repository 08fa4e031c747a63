use hspgfx::MesOptions;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::*;

#[test]
fn line_to_moves_cursor_to_end_point() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 64, 64);
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);

    for _ in 0..500 {
        if rng.random_bool(0.3) {
            let (x, y) = (rng.random_range(-100..200), rng.random_range(-100..200));
            surf.pos(x, y);
            assert_eq!(surf.cursor(), IPoint::new(x, y));
        }
        let (x, y) = (rng.random_range(-100..200), rng.random_range(-100..200));
        surf.line_to(x, y);
        assert_eq!(surf.cursor(), IPoint::new(x, y));
        assert_eq!(surf.frame_state(), FrameState::Idle);
    }
}

#[test]
fn line_moves_cursor_to_second_point() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 32, 32);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..100 {
        let pts: [i32; 4] = std::array::from_fn(|_| rng.random_range(-10..40));
        surf.line(pts[0], pts[1], pts[2], pts[3]);
        assert_eq!(surf.cursor(), IPoint::new(pts[2], pts[3]));
    }
}

#[test]
fn horizontal_line_pixels() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 16, 4);
    surf.set_color(BLACK);
    surf.pos(2, 1);
    surf.line_to(10, 1);
    assert_eq!(px(surf, 5, 1), BLACK);
    assert_eq!(px(surf, 5, 0), WHITE);
    assert_eq!(px(surf, 5, 2), WHITE);
    assert_eq!(px(surf, 12, 1), WHITE);
}

#[test]
fn mes_without_font_keeps_cursor() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 64, 64);
    surf.pos(4, 6);
    surf.mes("hello", MesOptions::empty());
    assert_eq!(surf.cursor(), IPoint::new(4, 6));
    assert_eq!(surf.mes_size(), (0, 0));
    assert_eq!(count_color(surf, WHITE), 64 * 64);
}
