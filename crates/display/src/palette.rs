//! Intensity to pixel colour
//!
//! Phosphor intensity `i` is drawn as green `i` with a faint white core of
//! `i / 4` in red and blue, packed as `0xAARRGGBB` for softbuffer.

use phosphor::PhosphorBuffer;

/// Colour of a dark cell.
pub const BACKGROUND: u32 = 0xFF00_0000;

/// Pixel colour for one intensity.
pub const fn phosphor_colour(intensity: u8) -> u32 {
    let green = intensity as u32;
    let core = green >> 2;
    BACKGROUND | (core << 16) | (green << 8) | core
}

/// Write the buffer's intensities into `pixels` in row-major order.
///
/// Extra pixels, if any, are left unchanged.
pub fn fill(frame: &PhosphorBuffer, pixels: &mut [u32]) {
    for (pixel, intensity) in pixels.iter_mut().zip(frame.intensities()) {
        *pixel = phosphor_colour(intensity);
    }
}
