//! In-memory raster images with a closed set of backing pixel layouts.
//!
//! The canonical pixel is a packed `u32`, `(a << 24) | (r << 16) | (g << 8) | b`,
//! row-major with stride equal to width. The backing store may use a
//! different channel order; [`PixelStore`] enumerates the recognized
//! layouts the converter can walk directly, plus a generic row-fetch
//! escape hatch for everything else.

use core::fmt;

use crate::buffer;
use crate::error::ConversionError;
use crate::pixel::{ImgRef, ImgVec, Rgb, Rgba};

/// Row-fetch capability for rasters whose backing store is not one of the
/// recognized layouts.
///
/// Implementations fill `row` with packed `(a<<24)|(r<<16)|(g<<8)|b` pixels
/// for row `y`. `row.len()` always equals the raster width.
pub trait RowSource: Send + Sync {
    fn read_row(&self, y: u32, row: &mut [u32]);
}

/// Backing pixel storage for a [`Raster`].
///
/// The first four variants are walked directly by the converter; `Generic`
/// takes the row-at-a-time fallback path. Both paths produce byte-identical
/// output for the same logical image.
pub enum PixelStore {
    /// One `u32` per pixel, `(a<<24)|(r<<16)|(g<<8)|b`.
    PackedRgb(Vec<u32>),
    /// One `u32` per pixel, `(a<<24)|(b<<16)|(g<<8)|r`.
    PackedBgr(Vec<u32>),
    /// Three bytes per pixel, B,G,R order.
    BgrBytes(Vec<u8>),
    /// Four bytes per pixel, A,B,G,R order.
    AbgrBytes(Vec<u8>),
    /// Anything else, read one packed row at a time.
    Generic(Box<dyn RowSource>),
}

impl PixelStore {
    /// Whether the converter can walk the backing slice directly instead of
    /// taking the generic row path.
    pub fn is_direct(&self) -> bool {
        !matches!(self, PixelStore::Generic(_))
    }

    fn actual_len(&self) -> Option<usize> {
        match self {
            PixelStore::PackedRgb(p) | PixelStore::PackedBgr(p) => Some(p.len()),
            PixelStore::BgrBytes(b) | PixelStore::AbgrBytes(b) => Some(b.len()),
            PixelStore::Generic(_) => None,
        }
    }
}

impl fmt::Debug for PixelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelStore::PackedRgb(p) => write!(f, "PackedRgb({} px)", p.len()),
            PixelStore::PackedBgr(p) => write!(f, "PackedBgr({} px)", p.len()),
            PixelStore::BgrBytes(b) => write!(f, "BgrBytes({} bytes)", b.len()),
            PixelStore::AbgrBytes(b) => write!(f, "AbgrBytes({} bytes)", b.len()),
            PixelStore::Generic(_) => write!(f, "Generic"),
        }
    }
}

/// A rectangular pixel grid with a declared color model.
///
/// `has_alpha` is a model property, not a per-pixel observation: an
/// alpha-less raster is fully opaque regardless of what its alpha bits
/// contain, and the converter never scans pixels to decide.
#[derive(Debug)]
pub struct Raster {
    width: u32,
    height: u32,
    has_alpha: bool,
    store: PixelStore,
}

impl Raster {
    /// Create a raster over `store`, validating dimensions and store length.
    ///
    /// Zero dimensions are rejected with [`ConversionError::EmptyImage`];
    /// a recognized store whose length disagrees with `width * height`
    /// is rejected with [`ConversionError::StoreMismatch`]. `Generic`
    /// stores carry no verifiable length and are accepted as-is.
    pub fn new(
        width: u32,
        height: u32,
        has_alpha: bool,
        store: PixelStore,
    ) -> Result<Self, ConversionError> {
        if width == 0 || height == 0 {
            return Err(ConversionError::EmptyImage);
        }
        let count =
            buffer::pixel_count(width, height).ok_or(ConversionError::TooLarge { width, height })?;
        let too_large = ConversionError::TooLarge { width, height };
        let expected = match &store {
            PixelStore::PackedRgb(_) | PixelStore::PackedBgr(_) => Some(count),
            PixelStore::BgrBytes(_) => Some(count.checked_mul(3).ok_or(too_large)?),
            PixelStore::AbgrBytes(_) => Some(count.checked_mul(4).ok_or(too_large)?),
            PixelStore::Generic(_) => None,
        };
        if let (Some(expected), Some(actual)) = (expected, store.actual_len()) {
            if expected != actual {
                return Err(ConversionError::StoreMismatch { expected, actual });
            }
        }
        Ok(Self {
            width,
            height,
            has_alpha,
            store,
        })
    }

    /// Build an opaque raster from a typed RGB image.
    pub fn from_rgb8(img: ImgRef<'_, Rgb<u8>>) -> Result<Self, ConversionError> {
        let (width, height) = dims_u32(img.width(), img.height())?;
        let mut pixels = Vec::with_capacity(img.width() * img.height());
        for row in img.rows() {
            for p in row {
                pixels.push(
                    0xFF00_0000
                        | (u32::from(p.r) << 16)
                        | (u32::from(p.g) << 8)
                        | u32::from(p.b),
                );
            }
        }
        Self::new(width, height, false, PixelStore::PackedRgb(pixels))
    }

    /// Build an alpha-carrying raster from a typed RGBA image.
    pub fn from_rgba8(img: ImgRef<'_, Rgba<u8>>) -> Result<Self, ConversionError> {
        let (width, height) = dims_u32(img.width(), img.height())?;
        let mut pixels = Vec::with_capacity(img.width() * img.height());
        for row in img.rows() {
            for p in row {
                pixels.push(
                    (u32::from(p.a) << 24)
                        | (u32::from(p.r) << 16)
                        | (u32::from(p.g) << 8)
                        | u32::from(p.b),
                );
            }
        }
        Self::new(width, height, true, PixelStore::PackedRgb(pixels))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the color model declares an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn store(&self) -> &PixelStore {
        &self.store
    }

    /// Read one row of logical pixels as packed ARGB.
    ///
    /// Works for every store layout; the converter's generic path and the
    /// typed accessors are built on it. For alpha-less rasters the alpha
    /// byte is normalized to 255.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height` or `row.len() != width`.
    pub fn row_packed(&self, y: u32, row: &mut [u32]) {
        assert!(y < self.height, "row index out of bounds");
        assert_eq!(row.len(), self.width as usize, "row buffer width mismatch");
        let width = self.width as usize;
        let start = y as usize * width;
        match &self.store {
            PixelStore::PackedRgb(pixels) => {
                row.copy_from_slice(&pixels[start..start + width]);
            }
            PixelStore::PackedBgr(pixels) => {
                for (dst, &src) in row.iter_mut().zip(&pixels[start..start + width]) {
                    *dst = (src & 0xFF00_FF00) | ((src & 0xFF) << 16) | ((src >> 16) & 0xFF);
                }
            }
            PixelStore::BgrBytes(bytes) => {
                let row_bytes = &bytes[start * 3..(start + width) * 3];
                for (dst, bgr) in row.iter_mut().zip(row_bytes.chunks_exact(3)) {
                    *dst = 0xFF00_0000
                        | (u32::from(bgr[2]) << 16)
                        | (u32::from(bgr[1]) << 8)
                        | u32::from(bgr[0]);
                }
            }
            PixelStore::AbgrBytes(bytes) => {
                let row_bytes = &bytes[start * 4..(start + width) * 4];
                for (dst, abgr) in row.iter_mut().zip(row_bytes.chunks_exact(4)) {
                    *dst = (u32::from(abgr[0]) << 24)
                        | (u32::from(abgr[3]) << 16)
                        | (u32::from(abgr[2]) << 8)
                        | u32::from(abgr[1]);
                }
            }
            PixelStore::Generic(source) => source.read_row(y, row),
        }
        if !self.has_alpha {
            for px in row.iter_mut() {
                *px |= 0xFF00_0000;
            }
        }
    }

    /// Materialize the logical pixels as a typed RGB image, dropping alpha.
    pub fn to_rgb8(&self) -> ImgVec<Rgb<u8>> {
        let width = self.width as usize;
        let mut row = vec![0u32; width];
        let mut out = Vec::with_capacity(width * self.height as usize);
        for y in 0..self.height {
            self.row_packed(y, &mut row);
            for &px in &row {
                out.push(Rgb {
                    r: (px >> 16) as u8,
                    g: (px >> 8) as u8,
                    b: px as u8,
                });
            }
        }
        ImgVec::new(out, width, self.height as usize)
    }

    /// Materialize the logical pixels as a typed RGBA image.
    ///
    /// Alpha is 255 for every pixel when the model declares no alpha.
    pub fn to_rgba8(&self) -> ImgVec<Rgba<u8>> {
        let width = self.width as usize;
        let mut row = vec![0u32; width];
        let mut out = Vec::with_capacity(width * self.height as usize);
        for y in 0..self.height {
            self.row_packed(y, &mut row);
            for &px in &row {
                out.push(Rgba {
                    r: (px >> 16) as u8,
                    g: (px >> 8) as u8,
                    b: px as u8,
                    a: (px >> 24) as u8,
                });
            }
        }
        ImgVec::new(out, width, self.height as usize)
    }
}

/// Narrow typed-image dimensions, rejecting anything past the `u32` range
/// (reported dimensions saturate for the error detail).
fn dims_u32(width: usize, height: usize) -> Result<(u32, u32), ConversionError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(ConversionError::TooLarge {
            width: width.min(u32::MAX as usize) as u32,
            height: height.min(u32::MAX as usize) as u32,
        }),
    }
}
