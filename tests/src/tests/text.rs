use hspgfx::MesOptions;
use hspgfx::text::FontStyle;

use super::*;

const FAMILY: &str = "DejaVu Sans";

/// Line height of DejaVu Sans at 20px, ascender to descender, rounded up
const LINE_HEIGHT: u32 = 24;

fn text_surface(h: &mut Headless, size: i32) -> &mut Surface {
    let surf = h.screens.buffer(1, 320, 120);
    surf.font(FAMILY, size, FontStyle::empty());
    surf.pos(10, 10);
    surf
}

#[test]
fn single_line_moves_cursor_below() {
    let mut h = harness::headless_with_font();
    let surf = text_surface(&mut h, 20);
    surf.mes("short", MesOptions::empty());

    let (w, lh) = surf.mes_size();
    assert_eq!(lh, LINE_HEIGHT);
    assert!((40..70).contains(&w), "width {w}");
    assert_eq!(surf.cursor(), IPoint::new(10, 10 + LINE_HEIGHT as i32));
    assert_eq!(surf.frame_state(), FrameState::Idle);
    assert!(count_color(surf, BLACK) > 0);
}

#[test]
fn multi_line_size_is_last_line() {
    let mut h = harness::headless_with_font();
    let surf = text_surface(&mut h, 20);
    surf.mes("a", MesOptions::empty());
    let single = surf.mes_size();

    surf.pos(10, 40);
    surf.mes("a much longer first line\na", MesOptions::empty());
    assert_eq!(surf.mes_size(), single);
    assert_eq!(surf.cursor(), IPoint::new(10, 40 + 2 * LINE_HEIGHT as i32));
}

#[test]
fn no_cr_stays_after_last_line() {
    let mut h = harness::headless_with_font();
    let surf = text_surface(&mut h, 20);
    surf.mes("short", MesOptions::NO_CR);
    let (w, _) = surf.mes_size();
    assert_eq!(surf.cursor(), IPoint::new(10 + w as i32, 10));

    surf.pos(10, 34);
    surf.mes("a\nmuch longer last line", MesOptions::NO_CR);
    let (last_w, lh) = surf.mes_size();
    assert!(last_w > 3 * w, "{last_w} vs {w}");
    assert_eq!(lh, LINE_HEIGHT);
    assert_eq!(
        surf.cursor(),
        IPoint::new(10 + last_w as i32, 34 + LINE_HEIGHT as i32)
    );
}

/// Red "HI" on blue, aliased
fn layered(opts: MesOptions) -> Headless {
    let mut h = harness::headless_with_font();
    let surf = text_surface(&mut h, 32);
    surf.set_color(BLUE);
    surf.boxf(0, 0, 319, 119);
    surf.set_color(RED);
    surf.pos(10, 10);
    surf.mes("HI", opts);
    h
}

fn shadow_pixels(surf: &Surface) -> usize {
    let bmp = surf.bitmap().unwrap();
    let (w, h) = bmp.size();
    (0..h as i32)
        .flat_map(|y| (0..w as i32).map(move |x| (x, y)))
        .filter_map(|(x, y)| bmp.pixel(x, y))
        .filter(|c| c.red() == 0 && c.green() == 0 && c.blue() < 200)
        .count()
}

#[test]
fn shadow_and_outline_are_under_the_text() {
    let plain = layered(MesOptions::empty());
    let plain = plain.screens.get(1).unwrap();
    let glyph_px = count_color(plain, RED);
    assert!(glyph_px > 0);
    assert_eq!(count_color(plain, WHITE), 0);
    assert_eq!(shadow_pixels(plain), 0);

    let outlined = layered(MesOptions::OUTLINE);
    let outlined = outlined.screens.get(1).unwrap();
    assert!(count_color(outlined, WHITE) > 0);
    assert_eq!(count_color(outlined, RED), glyph_px);

    let shadowed = layered(MesOptions::SHADOW);
    let shadowed = shadowed.screens.get(1).unwrap();
    assert!(shadow_pixels(shadowed) > 0);
    assert_eq!(count_color(shadowed, RED), glyph_px);

    let both = layered(MesOptions::SHADOW | MesOptions::OUTLINE | MesOptions::NO_CR);
    let both_surf = both.screens.get(1).unwrap();
    assert_eq!(count_color(both_surf, RED), glyph_px);
    assert_eq!(both_surf.frame_state(), FrameState::Idle);
}
