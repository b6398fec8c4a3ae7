//! Sprite-to-ASCII rendering.
//!
//! Decodes a sprite image (PNG or JPEG) and renders it as a block of text:
//! the image is scaled to a fixed column width with a 2:1 aspect correction
//! for terminal cells, and each cell's alpha-weighted luminance picks a
//! character from a dark-to-light ramp. Transparent cells become spaces, so
//! sprites keep their silhouette on any background.

use image::{DynamicImage, GenericImageView, Rgba, imageops::FilterType};
use std::error::Error;

/// Dark-to-light character ramp. Index 0 renders as a blank cell.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Render encoded image bytes as ASCII art `columns` characters wide.
///
/// # Errors
/// Returns an error when the bytes are not a decodable image.
pub fn render(bytes: &[u8], columns: u32) -> Result<String, Box<dyn Error>> {
    let img = image::load_from_memory(bytes)?;
    Ok(render_image(&img, columns))
}

/// Render an already-decoded image. Empty input or zero columns produce an
/// empty string rather than an error.
pub fn render_image(img: &DynamicImage, columns: u32) -> String {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 || columns == 0 {
        return String::new();
    }

    let rows = ((height as f32 / width as f32) * columns as f32 / CELL_ASPECT)
        .round()
        .max(1.0) as u32;
    let resized = img.resize_exact(columns, rows, FilterType::Triangle).to_rgba8();

    let mut out = String::with_capacity(((columns + 1) * rows) as usize);
    for y in 0..rows {
        for x in 0..columns {
            out.push(cell_char(resized.get_pixel(x, y)));
        }
        out.push('\n');
    }
    out
}

/// Map one pixel to a ramp character by alpha-weighted luminance.
fn cell_char(pixel: &Rgba<u8>) -> char {
    let Rgba([r, g, b, a]) = *pixel;
    if a < 16 {
        return ' ';
    }

    // Rec. 601 luma, scaled down by partial transparency.
    let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    let level = luma * f32::from(a) / 255.0;

    let idx = (level / 255.0 * (RAMP.len() - 1) as f32).round() as usize;
    RAMP[idx.min(RAMP.len() - 1)] as char
}
