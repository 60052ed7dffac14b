// Software drawing onto a RenderSurface, plus the demo window wrapper.
// What gets painted here:
// 1) The disaster photo, resized to the display size (base layer).
// 2) The ground-truth mask at constant 0.6 alpha, when one exists.
// 3) Procedural radial damage zones, when one doesn't.
// 4) A thin semi-transparent white frame around the whole surface.
// 5) A small 5x7 HUD line in the demo viewer.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::error::OverlayError;
use crate::gamma::GammaLut;
use crate::scale::DisplaySize;
use crate::types::{RenderSurface, SourceImage};
use crate::zones::Zone;

/// Border stroke width in display units.
pub const BORDER_WIDTH: usize = 2;
/// Border stroke opacity (semi-transparent white frame).
pub const BORDER_ALPHA: f32 = 0.3;
/// Constant alpha for the ground-truth mask layer.
pub const MASK_ALPHA: f32 = 0.6;

/* ---------------- pixel-level compositing ---------------- */

/// Blend an RGB color over the surface pixel at (x,y) with the given
/// alpha, mixing in linear light through the LUT. Out-of-bounds is a no-op.
#[inline]
pub fn blend_pixel(
    surface: &mut RenderSurface,
    x: i32,
    y: i32,
    (r, g, b): (u8, u8, u8),
    alpha: f32,
    lut: &GammaLut,
) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= surface.width || y >= surface.height {
        return;
    }
    let idx = y * surface.width + x;

    if alpha <= 0.0 {
        return;
    }
    if alpha >= 1.0 {
        surface.pixels[idx] = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
        return;
    }

    let base = surface.pixels[idx];
    let br = ((base >> 16) & 0xFF) as u8;
    let bg = ((base >> 8) & 0xFF) as u8;
    let bb = (base & 0xFF) as u8;

    let inv = 1.0 - alpha;
    let r_lin = alpha * lut.srgb_u8_to_linear(r) + inv * lut.srgb_u8_to_linear(br);
    let g_lin = alpha * lut.srgb_u8_to_linear(g) + inv * lut.srgb_u8_to_linear(bg);
    let b_lin = alpha * lut.srgb_u8_to_linear(b) + inv * lut.srgb_u8_to_linear(bb);

    let nr = lut.linear_to_srgb_u8(r_lin) as u32;
    let ng = lut.linear_to_srgb_u8(g_lin) as u32;
    let nb = lut.linear_to_srgb_u8(b_lin) as u32;
    surface.pixels[idx] = (nr << 16) | (ng << 8) | nb;
}

/// Resize an RGBA raster to the display size and pack it as opaque
/// `0x00RRGGBB` pixels.
fn resize_and_pack(raster: &RgbaImage, display: &DisplaySize) -> Vec<u32> {
    let scaled = if raster.dimensions() == (display.width, display.height) {
        raster.clone()
    } else {
        imageops::resize(raster, display.width, display.height, FilterType::Triangle)
    };
    scaled
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect()
}

/// Packed display-size pixels of the unmodified photo. This is what the
/// host shows when the overlay is toggled off.
pub fn preview_pixels(source: &SourceImage, display: &DisplaySize) -> Vec<u32> {
    resize_and_pack(source.rgba(), display)
}

/* ---------------- layer passes ---------------- */

/// Pass 1 for both render paths: fill the whole surface with the photo at
/// display size, origin (0,0).
pub fn draw_base_layer(
    surface: &mut RenderSurface,
    source: &SourceImage,
    display: &DisplaySize,
) -> Result<(), OverlayError> {
    if surface.width != display.width as usize || surface.height != display.height as usize {
        return Err(OverlayError::InvalidDimensions {
            width: surface.width as u32,
            height: surface.height as u32,
        });
    }
    surface.pixels = resize_and_pack(source.rgba(), display);
    Ok(())
}

/// Mask path: blend the decoded mask over the base at constant 0.6 alpha.
/// The mask's own colors encode severity; we scale its per-texel alpha but
/// never recolor it.
pub fn blend_mask_layer(
    surface: &mut RenderSurface,
    mask: &RgbaImage,
    display: &DisplaySize,
    lut: &GammaLut,
) {
    let scaled = if mask.dimensions() == (display.width, display.height) {
        mask.clone()
    } else {
        imageops::resize(mask, display.width, display.height, FilterType::Triangle)
    };
    for (x, y, px) in scaled.enumerate_pixels() {
        let texel_alpha = px[3] as f32 / 255.0;
        blend_pixel(
            surface,
            x as i32,
            y as i32,
            (px[0], px[1], px[2]),
            MASK_ALPHA * texel_alpha,
            lut,
        );
    }
}

/// Fallback path: paint one zone as a radial gradient.
///
/// Three stops: tier color at the sampled center opacity, the same hue at
/// half that opacity at the midpoint, fully transparent at the rim.
/// Normal (non-additive) compositing, so overlapping zones stay readable.
pub fn draw_zone(surface: &mut RenderSurface, zone: &Zone, lut: &GammaLut) {
    let r = zone.radius.ceil() as i32;
    if r <= 0 {
        return;
    }
    let cx = zone.cx;
    let cy = zone.cy;
    let color = zone.tier.color();
    let x0 = (cx as i32) - r;
    let y0 = (cy as i32) - r;

    // Scan just the bounding box; everything past the rim is skipped.
    for y in y0..=(y0 + 2 * r) {
        for x in x0..=(x0 + 2 * r) {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let t = (dx * dx + dy * dy).sqrt() / zone.radius;
            if t >= 1.0 {
                continue;
            }
            blend_pixel(surface, x, y, color, gradient_alpha(t, zone.center_alpha), lut);
        }
    }
}

/// Piecewise-linear opacity between the three gradient stops.
#[inline]
fn gradient_alpha(t: f32, center: f32) -> f32 {
    let mid = center * 0.5;
    if t <= 0.5 {
        center + (mid - center) * (t / 0.5)
    } else {
        mid * (1.0 - (t - 0.5) / 0.5)
    }
}

/// Final pass for both paths: a 2-unit semi-transparent white frame around
/// the full surface.
pub fn stroke_border(surface: &mut RenderSurface, lut: &GammaLut) {
    let w = surface.width as i32;
    let h = surface.height as i32;
    let white = (255u8, 255u8, 255u8);
    for d in 0..BORDER_WIDTH as i32 {
        for x in 0..w {
            blend_pixel(surface, x, d, white, BORDER_ALPHA, lut);
            // On surfaces shorter than twice the stroke the top run already
            // covered this row; blending it again would double the alpha.
            if h - 1 - d > d {
                blend_pixel(surface, x, h - 1 - d, white, BORDER_ALPHA, lut);
            }
        }
        // Skip the corners the horizontal runs already covered.
        for y in BORDER_WIDTH as i32..(h - BORDER_WIDTH as i32) {
            blend_pixel(surface, d, y, white, BORDER_ALPHA, lut);
            if w - 1 - d > d {
                blend_pixel(surface, w - 1 - d, y, white, BORDER_ALPHA, lut);
            }
        }
    }
}

/* ---------------- demo window ---------------- */

/// Minimal window wrapper for the demo viewer.
pub struct Viewer {
    window: Window,
}

impl Viewer {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Viewer, OverlayError> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| OverlayError::WindowInit(e.to_string()))?;
        Ok(Viewer { window })
    }

    /// Push a packed pixel buffer; the window shows it immediately.
    pub fn present(&mut self, pixels: &[u32], width: usize, height: usize) -> Result<(), OverlayError> {
        self.window
            .update_with_buffer(pixels, width, height)
            .map_err(|e| OverlayError::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// O flips the overlay visibility (single-press, no key repeat).
    pub fn o_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::O, KeyRepeat::No)
    }

    /// R re-renders; with no mask this reshuffles the procedural zones.
    pub fn r_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::R, KeyRepeat::No)
    }
}

/* ---------------- 5x7 HUD font ---------------- */

/// 5x7 glyphs for the HUD character set. Each u8 is a row; the low 5 bits
/// are pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11110,0b10001,0b10001,0b10001,0b10001,0b10001,0b11110),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b11011,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '%' => g!(0b11001,0b11010,0b00010,0b00100,0b01000,0b01011,0b10011),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

#[inline]
fn put_pixel(pixels: &mut [u32], width: usize, height: usize, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= width || y >= height {
        return;
    }
    pixels[y * width + x] = color;
}

/// Draw a HUD string into a packed pixel buffer. Each glyph gets a 1-pixel
/// black shadow for contrast over the photo.
pub fn draw_text_5x7(
    pixels: &mut [u32],
    width: usize,
    height: usize,
    mut x: i32,
    y: i32,
    text: &str,
    color: u32,
) {
    for ch in text.chars() {
        if let Some(rows) = glyph5x7(ch.to_ascii_uppercase()) {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(pixels, width, height, x + rx + 1, y + ry as i32 + 1, 0);
                        put_pixel(pixels, width, height, x + rx, y + ry as i32, color);
                    }
                }
            }
        }
        x += 6; // 5 glyph columns + 1 spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::resolve;
    use crate::zones::{ZoneSampler, TierCounts};
    use image::Rgba;

    fn gray_surface(w: u32, h: u32, v: u8) -> RenderSurface {
        let mut s = RenderSurface::new(w, h);
        let px = ((v as u32) << 16) | ((v as u32) << 8) | v as u32;
        s.pixels.fill(px);
        s
    }

    #[test]
    fn full_alpha_replaces_and_zero_alpha_is_a_noop() {
        let lut = GammaLut::new();
        let mut s = gray_surface(4, 4, 100);
        blend_pixel(&mut s, 1, 1, (255, 0, 0), 1.0, &lut);
        assert_eq!(s.pixels[1 * 4 + 1], 0x00FF0000);
        blend_pixel(&mut s, 2, 2, (255, 0, 0), 0.0, &lut);
        assert_eq!(s.pixels[2 * 4 + 2], 0x00646464);
    }

    #[test]
    fn out_of_bounds_blend_is_ignored() {
        let lut = GammaLut::new();
        let mut s = gray_surface(4, 4, 0);
        blend_pixel(&mut s, -1, 0, (255, 255, 255), 1.0, &lut);
        blend_pixel(&mut s, 4, 0, (255, 255, 255), 1.0, &lut);
        blend_pixel(&mut s, 0, 4, (255, 255, 255), 1.0, &lut);
        assert!(s.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn base_layer_fills_surface_with_resized_photo() {
        let photo = image::RgbaImage::from_pixel(16, 8, Rgba([10, 200, 30, 255]));
        let source = SourceImage::new(photo).unwrap();
        let display = resolve(16, 8, 8).unwrap();
        let mut s = RenderSurface::new(display.width, display.height);
        draw_base_layer(&mut s, &source, &display).unwrap();
        assert_eq!((s.width, s.height), (8, 4));
        // Uniform input stays uniform through the resize.
        assert!(s.pixels.iter().all(|&p| p == 0x000AC81E));
    }

    #[test]
    fn base_layer_rejects_mismatched_surface() {
        let photo = image::RgbaImage::from_pixel(16, 8, Rgba([0, 0, 0, 255]));
        let source = SourceImage::new(photo).unwrap();
        let display = resolve(16, 8, 8).unwrap();
        let mut wrong = RenderSurface::new(3, 3);
        assert!(draw_base_layer(&mut wrong, &source, &display).is_err());
    }

    #[test]
    fn mask_layer_blends_at_constant_alpha() {
        let lut = GammaLut::new();
        let display = resolve(4, 4, 800).unwrap();
        let mut s = gray_surface(4, 4, 0);
        let mask = image::RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        blend_mask_layer(&mut s, &mask, &display, &lut);
        // 0.6 of white over black, blended in linear light.
        let px = s.pixels[0];
        let r = ((px >> 16) & 0xFF) as u8;
        let expected = lut.linear_to_srgb_u8(0.6);
        assert_eq!(r, expected);
        assert!(r > 0 && r < 255);
    }

    #[test]
    fn transparent_mask_texels_leave_the_base_alone() {
        let lut = GammaLut::new();
        let display = resolve(4, 4, 800).unwrap();
        let mut s = gray_surface(4, 4, 77);
        let mask = image::RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 0]));
        blend_mask_layer(&mut s, &mask, &display, &lut);
        assert!(s.pixels.iter().all(|&p| p == 0x004D4D4D));
    }

    #[test]
    fn gradient_alpha_profile_matches_the_three_stops() {
        let center = 0.6;
        assert!((gradient_alpha(0.0, center) - 0.6).abs() < 1e-6);
        assert!((gradient_alpha(0.5, center) - 0.3).abs() < 1e-6);
        assert!(gradient_alpha(0.999, center) < 0.01);
        // Monotone decrease from center to rim.
        let mut prev = f32::MAX;
        for i in 0..=10 {
            let a = gradient_alpha(i as f32 / 10.0, center);
            assert!(a <= prev);
            prev = a;
        }
    }

    #[test]
    fn zone_paints_strongest_at_its_center() {
        let lut = GammaLut::new();
        let display = resolve(100, 100, 800).unwrap();
        let mut sampler = ZoneSampler::with_seed(5);
        let mut zone = sampler.sample_plan(TierCounts::split(4), &display)[0];
        zone.cx = 50.0;
        zone.cy = 50.0;
        zone.radius = 20.0;

        let mut s = gray_surface(100, 100, 0);
        draw_zone(&mut s, &zone, &lut);

        let center = s.pixels[50 * 100 + 50];
        let rim = s.pixels[50 * 100 + 75]; // outside the radius
        let red_at = |p: u32| ((p >> 16) & 0xFF) as u8;
        assert!(red_at(center) > 0);
        assert_eq!(rim, 0);
        // Midpoint is dimmer than the center.
        let mid = s.pixels[50 * 100 + 60];
        assert!(red_at(mid) < red_at(center));
    }

    #[test]
    fn border_touches_edges_but_not_the_interior() {
        let lut = GammaLut::new();
        let mut s = gray_surface(20, 10, 0);
        stroke_border(&mut s, &lut);
        assert_ne!(s.pixels[0], 0); // top-left corner
        assert_ne!(s.pixels[9 * 20 + 19], 0); // bottom-right corner
        assert_ne!(s.pixels[5 * 20], 0); // left edge mid-height
        assert_eq!(s.pixels[5 * 20 + 10], 0); // interior untouched
    }

    #[test]
    fn border_on_degenerate_surfaces_blends_each_pixel_once() {
        let lut = GammaLut::new();
        // 0.3 white over black, applied exactly once.
        let b = lut.linear_to_srgb_u8(0.3) as u32;
        let single = (b << 16) | (b << 8) | b;

        // 3 rows tall: the stroke passes meet in the middle row.
        let mut short = gray_surface(6, 3, 0);
        stroke_border(&mut short, &lut);
        assert_eq!(short.pixels[6 + 2], single); // middle row, once not twice
        assert!(short.pixels.iter().all(|&p| p == single));

        // 3 columns wide: the vertical runs meet in the middle column.
        let mut narrow = gray_surface(3, 8, 0);
        stroke_border(&mut narrow, &lut);
        assert_eq!(narrow.pixels[4 * 3 + 1], single); // mid row, middle column
        assert!(narrow.pixels.iter().all(|&p| p == single));
    }

    #[test]
    fn hud_text_marks_pixels_only_inside_bounds() {
        let mut pixels = vec![0u32; 40 * 10];
        draw_text_5x7(&mut pixels, 40, 10, 1, 1, "OK", 0x00FFFFFF);
        assert!(pixels.iter().any(|&p| p == 0x00FFFFFF));
        // Far off-screen draw must not panic or write.
        let mut empty = vec![0u32; 4];
        draw_text_5x7(&mut empty, 2, 2, 50, 50, "OK", 0x00FFFFFF);
        assert!(empty.iter().all(|&p| p == 0));
    }
}
