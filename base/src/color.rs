//! Colors as handled by the drawing commands.
//!
//! Legacy programs only ever manipulate opaque RGB triplets.
//! Alpha is carried for blending and for the transparent pixels of
//! CPU-rasterized bitmaps.

/// An 8-bit per channel, non-premultiplied RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorU8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Fully transparent black
pub const TRANSPARENT: ColorU8 = ColorU8::from_rgba(0, 0, 0, 0);
/// Opaque black
pub const BLACK: ColorU8 = ColorU8::from_rgb(0, 0, 0);
/// Opaque white
pub const WHITE: ColorU8 = ColorU8::from_rgb(255, 255, 255);
/// Opaque red
pub const RED: ColorU8 = ColorU8::from_rgb(255, 0, 0);
/// Opaque green
pub const GREEN: ColorU8 = ColorU8::from_rgb(0, 255, 0);
/// Opaque blue
pub const BLUE: ColorU8 = ColorU8::from_rgb(0, 0, 255);
/// Opaque yellow
pub const YELLOW: ColorU8 = ColorU8::from_rgb(255, 255, 0);

/// The clear colors selectable by `cls`, indexed by the legacy mode number
pub const CLS_PALETTE: [ColorU8; 5] = [
    WHITE,
    ColorU8::from_rgb(192, 192, 192),
    ColorU8::from_rgb(128, 128, 128),
    ColorU8::from_rgb(64, 64, 64),
    BLACK,
];

impl ColorU8 {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        ColorU8 { r, g, b, a: 255 }
    }

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        ColorU8 { r, g, b, a }
    }

    /// Build an opaque color from integer components, clamping each to 0..=255
    pub fn from_rgb_clamped(r: i32, g: i32, b: i32) -> Self {
        ColorU8::from_rgb(clamp_u8(r), clamp_u8(g), clamp_u8(b))
    }

    /// Build a color from the legacy HSV model.
    ///
    /// Hue is in `0..192` (the hue circle is split in 6 sectors of 32),
    /// saturation and value are in `0..=255`.
    pub fn from_hsv(h: i32, s: i32, v: i32) -> Self {
        let h = h.rem_euclid(192);
        let s = s.clamp(0, 255);
        let v = v.clamp(0, 255);
        if s == 0 {
            return ColorU8::from_rgb(v as u8, v as u8, v as u8);
        }
        let sector = h / 32;
        let frac = h % 32;
        let p = v * (255 - s) / 255;
        let q = v * (255 - s * frac / 32) / 255;
        let t = v * (255 - s * (32 - frac) / 32) / 255;
        let (r, g, b) = match sector {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        ColorU8::from_rgb_clamped(r, g, b)
    }

    /// Rebuild a color from premultiplied RGBA bytes
    pub const fn from_premultiplied(px: [u8; 4]) -> Self {
        let [r, g, b, a] = px;
        match a {
            0 => TRANSPARENT,
            255 => ColorU8::from_rgb(r, g, b),
            _ => ColorU8 {
                r: demultiply_channel(r, a),
                g: demultiply_channel(g, a),
                b: demultiply_channel(b, a),
                a,
            },
        }
    }

    /// The premultiplied RGBA bytes of this color
    pub const fn premultiply(&self) -> [u8; 4] {
        match self.a {
            255 => [self.r, self.g, self.b, 255],
            a => [
                premultiply_channel(self.r, a),
                premultiply_channel(self.g, a),
                premultiply_channel(self.b, a),
                a,
            ],
        }
    }

    pub const fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub const fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn red(&self) -> u8 {
        self.r
    }

    pub const fn green(&self) -> u8 {
        self.g
    }

    pub const fn blue(&self) -> u8 {
        self.b
    }

    pub const fn alpha(&self) -> u8 {
        self.a
    }

    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        ColorU8 { a, ..self }
    }

    pub const fn without_opacity(self) -> Self {
        ColorU8 { a: 255, ..self }
    }

    /// Same color channels, ignoring alpha
    pub const fn same_rgb(&self, other: &ColorU8) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Weighted sum of four opaque colors, the weights summing to 1.
    ///
    /// This is the bilinear interpolation kernel of four-corner gradients.
    pub fn weighted4(colors: &[ColorU8; 4], weights: [f32; 4]) -> ColorU8 {
        let mut acc = [0.0f32; 3];
        for (c, w) in colors.iter().zip(weights) {
            acc[0] += c.r as f32 * w;
            acc[1] += c.g as f32 * w;
            acc[2] += c.b as f32 * w;
        }
        ColorU8::from_rgb(round_u8(acc[0]), round_u8(acc[1]), round_u8(acc[2]))
    }
}

const fn premultiply_channel(c: u8, a: u8) -> u8 {
    let prod = c as u32 * a as u32 + 128;
    ((prod + (prod >> 8)) >> 8) as u8
}

const fn demultiply_channel(c: u8, a: u8) -> u8 {
    let v = (c as u32 * 255 + a as u32 / 2) / a as u32;
    if v > 255 { 255 } else { v as u8 }
}

fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

fn round_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
