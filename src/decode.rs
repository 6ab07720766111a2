//! Decode orchestration.

use crate::codec::{self, NativeCodec};
use crate::error::CodecError;
use crate::info::{BitstreamFeatures, FeatureStatus};
use crate::limits::Limits;
use crate::raster::Raster;
use crate::{buffer, convert};

/// Decode request builder.
///
/// Probes the bitstream, allocates an RGB or RGBA output buffer from the
/// reported features, drives the matching decode entry point, and converts
/// the result to a [`Raster`]. A call either completes fully or fails with
/// no partial result.
///
/// # Example
///
/// ```no_run
/// use webp_bridge::DecodeRequest;
///
/// let data: &[u8] = &[]; // compressed bitstream
/// let codec = webp_bridge::codec::ensure_loaded()?;
/// let raster = DecodeRequest::new(codec, data).decode()?;
/// println!("{}x{}", raster.width(), raster.height());
/// # Ok::<(), webp_bridge::CodecError>(())
/// ```
pub struct DecodeRequest<'a> {
    codec: &'a dyn NativeCodec,
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    /// Create a request against an explicit codec.
    pub fn new(codec: &'a dyn NativeCodec, data: &'a [u8]) -> Self {
        Self {
            codec,
            data,
            limits: None,
        }
    }

    /// Create a request against the process-wide installed codec.
    pub fn from_installed(data: &'a [u8]) -> Result<Self, CodecError> {
        Ok(Self::new(codec::ensure_loaded()?, data))
    }

    /// Bound the dimensions and output allocation this request will accept.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode the bitstream to a raster.
    ///
    /// The intermediate pixel buffer is scrubbed (zero-filled) on every
    /// exit path, success or failure, before release.
    pub fn decode(&self) -> Result<Raster, CodecError> {
        self.decode_inner().0
    }

    // The pipeline proper. Hands the intermediate buffer back after it
    // has been scrubbed so tests can observe the scrub; exits before the
    // allocation return an empty buffer.
    fn decode_inner(&self) -> (Result<Raster, CodecError>, Vec<u8>) {
        let (features, len, stride) = match self.probe() {
            Ok(plan) => plan,
            Err(err) => return (Err(err), Vec::new()),
        };

        let mut output = vec![0u8; len];
        let ok = if features.has_alpha {
            self.codec.decode_rgba_into(self.data, &mut output, stride)
        } else {
            self.codec.decode_rgb_into(self.data, &mut output, stride)
        };
        if !ok {
            buffer::scrub(&mut output);
            return (Err(CodecError::DecodingFailed), output);
        }

        let raster =
            convert::to_raster(&output, features.width, features.height).map_err(CodecError::from);
        buffer::scrub(&mut output);
        (raster, output)
    }

    /// Header validation and output sizing, before any allocation.
    fn probe(&self) -> Result<(BitstreamFeatures, usize, u32), CodecError> {
        if self.data.is_empty() {
            return Err(CodecError::InvalidInput("empty bitstream"));
        }

        let (width, height) = self
            .codec
            .get_info(self.data)
            .ok_or(CodecError::InfoRetrievalFailed)?;
        if width == 0 || height == 0 {
            return Err(CodecError::InfoRetrievalFailed);
        }

        let features = self
            .codec
            .get_features(self.data)
            .map_err(|status| CodecError::FeatureRetrievalFailed { status })?;
        // The two header reads must agree; disagreement means the
        // bitstream is malformed.
        if features.width != width || features.height != height {
            return Err(CodecError::FeatureRetrievalFailed {
                status: FeatureStatus::BitstreamError,
            });
        }
        if features.has_animation {
            return Err(CodecError::UnsupportedBitstream(
                "animated bitstreams cannot be decoded frame-less",
            ));
        }

        let bpp = buffer::bytes_per_pixel(features.has_alpha);
        let len = buffer::interleaved_len(width, height, bpp)
            .ok_or(CodecError::InvalidInput("image dimensions overflow"))?;
        let stride = width
            .checked_mul(bpp as u32)
            .ok_or(CodecError::InvalidInput("image dimensions overflow"))?;
        if let Some(limits) = self.limits {
            limits
                .check_dimensions(width, height)
                .map_err(CodecError::LimitExceeded)?;
            limits
                .check_memory(len as u64)
                .map_err(CodecError::LimitExceeded)?;
        }

        Ok((features, len, stride))
    }
}
