//! Unified error types for conversion and codec orchestration.

use thiserror::Error;

use crate::encode::EncodeMode;
use crate::info::FeatureStatus;

/// Errors produced by the pixel buffer converter.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConversionError {
    /// Width or height is zero.
    #[error("image has zero width or height")]
    EmptyImage,

    /// Dimensions overflow the addressable buffer size.
    #[error("dimensions {width}x{height} overflow addressable buffer size")]
    TooLarge { width: u32, height: u32 },

    /// A recognized backing store does not hold enough elements for the
    /// declared dimensions.
    #[error("pixel store holds {actual} elements, expected {expected}")]
    StoreMismatch { expected: usize, actual: usize },

    /// An interleaved buffer length matches neither the RGB nor the RGBA
    /// size for the declared dimensions.
    #[error("buffer length {actual} matches neither {rgb} (RGB) nor {rgba} (RGBA)")]
    SizeMismatch {
        actual: usize,
        rgb: usize,
        rgba: usize,
    },
}

/// Errors produced by encode/decode orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// Input rejected before any allocation or codec call.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Pixel buffer conversion produced an invalid result. Indicates a
    /// converter defect rather than a data problem; not retryable.
    #[error("pixel buffer conversion failed")]
    ConversionFailed(#[from] ConversionError),

    /// No codec has been installed via [`codec::install`](crate::codec::install).
    #[error("no codec installed")]
    CodecUnavailable,

    /// The codec could not read dimensions from the bitstream header.
    #[error("could not read bitstream dimensions")]
    InfoRetrievalFailed,

    /// The codec rejected the bitstream while reading its features.
    #[error("could not read bitstream features: {status}")]
    FeatureRetrievalFailed { status: FeatureStatus },

    /// The bitstream is valid but cannot be handled by the single-frame
    /// decode entry points.
    #[error("unsupported bitstream: {0}")]
    UnsupportedBitstream(&'static str),

    /// The codec returned an empty result for valid-looking pixel input.
    #[error("{mode} encoding failed")]
    EncodingFailed { mode: EncodeMode },

    /// The codec failed to decode a bitstream it reported features for.
    #[error("decoding failed")]
    DecodingFailed,

    /// A configured resource limit was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(&'static str),
}
