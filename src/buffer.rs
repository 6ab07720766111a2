//! Interleaved-buffer arithmetic and scrubbing.
//!
//! All sizing goes through checked multiplication; an overflow surfaces as
//! `None` and is mapped to an error by the caller rather than wrapping.

/// Bytes per pixel in an interleaved buffer: 4 with alpha, 3 without.
pub fn bytes_per_pixel(has_alpha: bool) -> usize {
    if has_alpha { 4 } else { 3 }
}

/// Number of pixels in a `width` x `height` raster, or `None` on overflow.
pub fn pixel_count(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)
}

/// Length in bytes of an unpadded interleaved buffer, or `None` on overflow.
pub fn interleaved_len(width: u32, height: u32, bytes_per_pixel: usize) -> Option<usize> {
    pixel_count(width, height)?.checked_mul(bytes_per_pixel)
}

/// Overwrite a buffer with zeros.
///
/// Intermediate pixel buffers hold decoded image content; the orchestrator
/// scrubs them on every exit path so the data does not outlive the call.
pub fn scrub(buf: &mut [u8]) {
    buf.fill(0);
}
