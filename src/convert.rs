//! Conversion between rasters and interleaved byte buffers.
//!
//! [`to_bytes`] walks the raster's backing store directly for every
//! recognized layout and falls back to a row-at-a-time generic path for
//! [`PixelStore::Generic`]; path selection is a total match on the store
//! variant, so neither path can fail on well-formed rasters. [`to_raster`]
//! goes the other way, writing packed ARGB pixels straight into the
//! destination vector.

use crate::buffer;
use crate::error::ConversionError;
use crate::pixel::{BGR8, RGB8, RGBA8};
use crate::raster::{PixelStore, Raster};

/// Convert a raster to an unpadded interleaved buffer.
///
/// Output is R,G,B per pixel, plus A when the raster's color model
/// declares an alpha channel, regardless of the source channel order.
/// Length is exactly `width * height * bytes_per_pixel`.
pub fn to_bytes(raster: &Raster) -> Result<Vec<u8>, ConversionError> {
    if raster.width() == 0 || raster.height() == 0 {
        return Err(ConversionError::EmptyImage);
    }
    let bpp = buffer::bytes_per_pixel(raster.has_alpha());
    let len = buffer::interleaved_len(raster.width(), raster.height(), bpp).ok_or(
        ConversionError::TooLarge {
            width: raster.width(),
            height: raster.height(),
        },
    )?;

    let mut out = Vec::with_capacity(len);
    let has_alpha = raster.has_alpha();
    match raster.store() {
        PixelStore::PackedRgb(pixels) => {
            if has_alpha {
                for &px in pixels {
                    out.extend_from_slice(&[
                        (px >> 16) as u8,
                        (px >> 8) as u8,
                        px as u8,
                        (px >> 24) as u8,
                    ]);
                }
            } else {
                for &px in pixels {
                    out.extend_from_slice(&[(px >> 16) as u8, (px >> 8) as u8, px as u8]);
                }
            }
        }
        PixelStore::PackedBgr(pixels) => {
            // Blue occupies the high channel byte, red the low one.
            if has_alpha {
                for &px in pixels {
                    out.extend_from_slice(&[
                        px as u8,
                        (px >> 8) as u8,
                        (px >> 16) as u8,
                        (px >> 24) as u8,
                    ]);
                }
            } else {
                for &px in pixels {
                    out.extend_from_slice(&[px as u8, (px >> 8) as u8, (px >> 16) as u8]);
                }
            }
        }
        PixelStore::BgrBytes(bytes) => {
            let pixels: &[BGR8] = bytemuck::cast_slice(bytes);
            if has_alpha {
                for p in pixels {
                    out.extend_from_slice(&[p.r, p.g, p.b, 0xFF]);
                }
            } else {
                for p in pixels {
                    out.extend_from_slice(&[p.r, p.g, p.b]);
                }
            }
        }
        PixelStore::AbgrBytes(bytes) => {
            if has_alpha {
                for q in bytes.chunks_exact(4) {
                    out.extend_from_slice(&[q[3], q[2], q[1], q[0]]);
                }
            } else {
                for q in bytes.chunks_exact(4) {
                    out.extend_from_slice(&[q[3], q[2], q[1]]);
                }
            }
        }
        PixelStore::Generic(_) => rows_to_bytes(raster, &mut out),
    }

    debug_assert_eq!(out.len(), len);
    Ok(out)
}

/// Row-at-a-time fallback: read packed rows through [`Raster::row_packed`]
/// and extract channels identically to the direct paths.
///
/// Exposed within the crate so tests can assert byte equivalence against
/// the direct paths for every layout.
pub(crate) fn rows_to_bytes(raster: &Raster, out: &mut Vec<u8>) {
    let width = raster.width() as usize;
    let has_alpha = raster.has_alpha();
    let mut row = vec![0u32; width];
    for y in 0..raster.height() {
        raster.row_packed(y, &mut row);
        if has_alpha {
            for &px in &row {
                out.extend_from_slice(&[
                    (px >> 16) as u8,
                    (px >> 8) as u8,
                    px as u8,
                    (px >> 24) as u8,
                ]);
            }
        } else {
            for &px in &row {
                out.extend_from_slice(&[(px >> 16) as u8, (px >> 8) as u8, px as u8]);
            }
        }
    }
}

/// Convert an unpadded interleaved buffer back to a raster.
///
/// Alpha presence is inferred from the buffer length: `width * height * 4`
/// means RGBA, `width * height * 3` means RGB, and anything else is
/// rejected with [`ConversionError::SizeMismatch`] — a padded or truncated
/// buffer cannot be recovered from length alone. Alpha defaults to 255
/// when absent.
pub fn to_raster(bytes: &[u8], width: u32, height: u32) -> Result<Raster, ConversionError> {
    if width == 0 || height == 0 {
        return Err(ConversionError::EmptyImage);
    }
    let too_large = ConversionError::TooLarge { width, height };
    let rgb_len = buffer::interleaved_len(width, height, 3).ok_or(too_large)?;
    let rgba_len = buffer::interleaved_len(width, height, 4).ok_or(too_large)?;

    let has_alpha = if bytes.len() == rgba_len {
        true
    } else if bytes.len() == rgb_len {
        false
    } else {
        return Err(ConversionError::SizeMismatch {
            actual: bytes.len(),
            rgb: rgb_len,
            rgba: rgba_len,
        });
    };

    let mut pixels = Vec::with_capacity(rgb_len / 3);
    if has_alpha {
        let src: &[RGBA8] = bytemuck::cast_slice(bytes);
        for p in src {
            pixels.push(
                (u32::from(p.a) << 24)
                    | (u32::from(p.r) << 16)
                    | (u32::from(p.g) << 8)
                    | u32::from(p.b),
            );
        }
    } else {
        let src: &[RGB8] = bytemuck::cast_slice(bytes);
        for p in src {
            pixels.push(
                0xFF00_0000 | (u32::from(p.r) << 16) | (u32::from(p.g) << 8) | u32::from(p.b),
            );
        }
    }

    Raster::new(width, height, has_alpha, PixelStore::PackedRgb(pixels))
}
