//! Text rasterization onto a grayscale page.
//!
//! This is the collaborator side of the pipeline: wrapped lines go in, a
//! dark-on-white `GrayImage` comes out, ready for the binarizer. Glyph
//! coverage is kept antialiased so the threshold decides what prints.

use image::{GrayImage, Luma};
use rusttype::{point, Font, Scale};

/// Left margin in dots, keeps glyphs off the tear bar side.
const MARGIN_X: f32 = 3.0;

/// Draw `lines` top to bottom onto a white page of the given width.
///
/// `font_px` is the glyph size in pixels; `spacing` is the baseline advance
/// as a multiple of `font_px` (1.4 reads well on 203 dpi paper). The page
/// height is sized to fit every line; an empty line list produces a single
/// blank row so the result stays a valid image.
pub fn render_lines(
    font: &Font<'_>,
    lines: &[String],
    width: u32,
    font_px: f32,
    spacing: f32,
) -> GrayImage {
    let scale = Scale {
        x: font_px,
        y: font_px,
    };
    let ascent = font.v_metrics(scale).ascent.ceil();
    let line_h = (font_px * spacing).ceil() as u32;
    let height = (line_h * lines.len() as u32).max(1);
    let mut page = GrayImage::from_pixel(width.max(1), height, Luma([255]));

    for (n, line) in lines.iter().enumerate() {
        let baseline = ascent + (n as u32 * line_h) as f32;
        for glyph in font.layout(line, scale, point(MARGIN_X, baseline)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let x = bb.min.x + gx as i32;
                    let y = bb.min.y + gy as i32;
                    if x < 0 || y < 0 || x as u32 >= page.width() || y as u32 >= page.height() {
                        return;
                    }
                    let shade = 255 - (v * 255.0) as u8;
                    let px = page.get_pixel_mut(x as u32, y as u32);
                    // overlapping glyphs keep the darker coverage
                    if shade < px.0[0] {
                        *px = Luma([shade]);
                    }
                });
            }
        }
    }
    page
}
