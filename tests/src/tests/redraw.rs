use hspgfx::{MesOptions, Quad, QuadColors, RedrawMode, WindowDesc};

use super::*;

#[test]
fn immediate_commands_close_their_frame() {
    let Headless { mut screens, .. } = harness::headless();
    screens.buffer(1, 32, 32);
    let surf = screens.cur().unwrap();
    assert_eq!(surf.redraw_mode(), RedrawMode::Immediate);

    surf.boxf(0, 0, 4, 4);
    surf.line(0, 0, 10, 10);
    surf.circle(0, 0, 8, 8, false);
    surf.pset(1, 1);
    surf.mes("text", MesOptions::SHADOW);
    surf.gradf(0, 0, 8, 8, true, RED, BLUE);
    surf.grect(16, 16, 0.5, 8, 4);
    surf.gsquare(&Quad::from_xy([0, 8, 8, 0], [0, 0, 8, 8]));
    surf.gsquare_gradient(
        &Quad::from_xy([0, 8, 8, 0], [0, 0, 8, 8]),
        &QuadColors::new(RED, GREEN, BLUE, WHITE),
    );
    surf.pget(3, 3);
    assert!(!surf.picload(harness::temp_path("missing.bmp"), Default::default()));
    surf.cls(0);
    assert_eq!(surf.frame_state(), FrameState::Idle);

    screens.gcopy(1, 0, 0, None).unwrap();
    screens.gzoom(16, 16, 1, 0, 0, 8, 8, true).unwrap();
    screens.grotate(1, 0, 0, 1.0, 16, 16).unwrap();
    assert_eq!(screens.cur().unwrap().frame_state(), FrameState::Idle);
}

#[test]
fn manual_mode_batches_until_immediate() {
    let Headless {
        mut screens,
        backend,
        ..
    } = harness::headless();
    let surf = screens
        .screen(0, &WindowDesc::new("main", 32, 32))
        .unwrap();
    let handle = surf.as_window().unwrap().handle();
    let frames = backend.frames();
    let presented = frames.count(handle);

    surf.redraw(RedrawMode::Manual);
    assert_eq!(surf.frame_state(), FrameState::FrameOpen);
    surf.set_color(RED);
    surf.boxf(0, 0, 31, 31);
    surf.set_color(BLUE);
    surf.boxf(0, 0, 3, 3);
    assert_eq!(frames.count(handle), presented);
    assert_eq!(surf.frame_state(), FrameState::FrameOpen);

    surf.redraw(RedrawMode::Immediate);
    assert_eq!(surf.frame_state(), FrameState::Idle);
    assert_eq!(frames.count(handle), presented + 1);
    let shown = frames.last(handle).unwrap();
    assert_eq!(shown.pixel(0, 0), Some(BLUE));
    assert_eq!(shown.pixel(10, 10), Some(RED));
}

#[test]
fn pget_in_manual_mode_sees_pending_draws() {
    let Headless { mut screens, .. } = harness::headless();
    let surf = screens.buffer(1, 8, 8);
    surf.redraw(RedrawMode::Manual);
    surf.set_color(GREEN);
    surf.pset(2, 2);
    assert_eq!(surf.pget(2, 2), GREEN);
    assert_eq!(surf.frame_state(), FrameState::FrameOpen);
    surf.redraw(RedrawMode::Immediate);
}

#[test]
fn immediate_window_draw_presents() {
    let Headless {
        mut screens,
        backend,
        ..
    } = harness::headless();
    let surf = screens.cur().unwrap();
    let handle = surf.as_window().unwrap().handle();
    let before = backend.frames().count(handle);
    surf.set_color(GREEN);
    surf.boxf(0, 0, 9, 9);
    assert_eq!(backend.frames().count(handle), before + 1);
    assert_eq!(backend.frames().last(handle).unwrap().pixel(5, 5), Some(GREEN));
}
