//! Encode orchestration.

use core::fmt;

use crate::codec::{self, NativeCodec};
use crate::error::CodecError;
use crate::raster::Raster;
use crate::{buffer, convert};

/// Which codec encode family a request resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeMode {
    Lossy,
    Lossless,
}

impl fmt::Display for EncodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeMode::Lossy => write!(f, "lossy"),
            EncodeMode::Lossless => write!(f, "lossless"),
        }
    }
}

/// Encode request builder.
///
/// Selects one of the codec's four encode entry points from
/// `(lossless, has_alpha)`; quality applies only to the lossy paths.
///
/// # Example
///
/// ```no_run
/// use webp_bridge::{EncodeRequest, Raster, PixelStore};
///
/// let raster = Raster::new(2, 1, false, PixelStore::PackedRgb(vec![0, 0]))?;
/// let codec = webp_bridge::codec::ensure_loaded()?;
/// let compressed = EncodeRequest::new(codec).with_quality(85.0).encode(&raster)?;
/// # Ok::<(), webp_bridge::CodecError>(())
/// ```
pub struct EncodeRequest<'a> {
    codec: &'a dyn NativeCodec,
    quality: f32,
    lossless: bool,
}

impl<'a> EncodeRequest<'a> {
    /// Create a request against an explicit codec. Defaults: quality 75,
    /// lossy.
    pub fn new(codec: &'a dyn NativeCodec) -> Self {
        Self {
            codec,
            quality: 75.0,
            lossless: false,
        }
    }

    /// Create a request against the process-wide installed codec.
    pub fn from_installed() -> Result<EncodeRequest<'static>, CodecError> {
        Ok(EncodeRequest::new(codec::ensure_loaded()?))
    }

    /// Set quality (clamped to 0..=100). Ignored when lossless.
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality.clamp(0.0, 100.0);
        self
    }

    /// Request lossless encoding.
    pub fn with_lossless(mut self, lossless: bool) -> Self {
        self.lossless = lossless;
        self
    }

    /// Encode a raster to compressed bytes.
    ///
    /// The intermediate pixel buffer is scrubbed (zero-filled) on every
    /// exit path, success or failure, before release.
    pub fn encode(&self, raster: &Raster) -> Result<Vec<u8>, CodecError> {
        self.encode_inner(raster).0
    }

    // The pipeline proper. Hands the intermediate buffer back after it
    // has been scrubbed so tests can observe the scrub; exits before the
    // conversion return an empty buffer.
    fn encode_inner(&self, raster: &Raster) -> (Result<Vec<u8>, CodecError>, Vec<u8>) {
        let width = raster.width();
        let height = raster.height();
        // Checked before any allocation or codec call.
        if width == 0 || height == 0 {
            return (
                Err(CodecError::InvalidInput("zero-dimension raster")),
                Vec::new(),
            );
        }

        let has_alpha = raster.has_alpha();
        let bpp = buffer::bytes_per_pixel(has_alpha);
        let Some(stride) = width.checked_mul(bpp as u32) else {
            return (
                Err(CodecError::InvalidInput("image dimensions overflow")),
                Vec::new(),
            );
        };

        let mut pixels = match convert::to_bytes(raster) {
            Ok(pixels) => pixels,
            Err(err) => return (Err(err.into()), Vec::new()),
        };
        if pixels.len() != buffer::interleaved_len(width, height, bpp).unwrap_or(0) {
            let mismatch = crate::error::ConversionError::SizeMismatch {
                actual: pixels.len(),
                rgb: width as usize * height as usize * 3,
                rgba: width as usize * height as usize * 4,
            };
            buffer::scrub(&mut pixels);
            return (Err(CodecError::ConversionFailed(mismatch)), pixels);
        }

        let encoded = match (self.lossless, has_alpha) {
            (false, false) => self
                .codec
                .encode_rgb(&pixels, width, height, stride, self.quality),
            (false, true) => self
                .codec
                .encode_rgba(&pixels, width, height, stride, self.quality),
            (true, false) => self
                .codec
                .encode_lossless_rgb(&pixels, width, height, stride),
            (true, true) => self
                .codec
                .encode_lossless_rgba(&pixels, width, height, stride),
        };
        buffer::scrub(&mut pixels);

        if encoded.is_empty() {
            let mode = if self.lossless {
                EncodeMode::Lossless
            } else {
                EncodeMode::Lossy
            };
            return (Err(CodecError::EncodingFailed { mode }), pixels);
        }
        (Ok(encoded), pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::{BitstreamFeatures, FeatureStatus};
    use crate::raster::PixelStore;

    /// Records which entry point was hit and what it received.
    #[derive(Default)]
    struct Recording {
        calls: std::sync::Mutex<Vec<(&'static str, Vec<u8>, u32, u32, u32, f32)>>,
        reply: Vec<u8>,
    }

    impl Recording {
        fn replying(reply: &[u8]) -> Self {
            Self {
                calls: std::sync::Mutex::new(Vec::new()),
                reply: reply.to_vec(),
            }
        }

        fn record(
            &self,
            name: &'static str,
            pixels: &[u8],
            w: u32,
            h: u32,
            stride: u32,
            quality: f32,
        ) -> Vec<u8> {
            self.calls
                .lock()
                .unwrap()
                .push((name, pixels.to_vec(), w, h, stride, quality));
            self.reply.clone()
        }
    }

    impl NativeCodec for Recording {
        fn get_info(&self, _data: &[u8]) -> Option<(u32, u32)> {
            None
        }
        fn get_features(&self, _data: &[u8]) -> Result<BitstreamFeatures, FeatureStatus> {
            Err(FeatureStatus::NotEnoughData)
        }
        fn encode_rgb(&self, p: &[u8], w: u32, h: u32, s: u32, q: f32) -> Vec<u8> {
            self.record("rgb", p, w, h, s, q)
        }
        fn encode_rgba(&self, p: &[u8], w: u32, h: u32, s: u32, q: f32) -> Vec<u8> {
            self.record("rgba", p, w, h, s, q)
        }
        fn encode_lossless_rgb(&self, p: &[u8], w: u32, h: u32, s: u32) -> Vec<u8> {
            self.record("lossless_rgb", p, w, h, s, -1.0)
        }
        fn encode_lossless_rgba(&self, p: &[u8], w: u32, h: u32, s: u32) -> Vec<u8> {
            self.record("lossless_rgba", p, w, h, s, -1.0)
        }
        fn decode_rgb_into(&self, _d: &[u8], _o: &mut [u8], _s: u32) -> bool {
            false
        }
        fn decode_rgba_into(&self, _d: &[u8], _o: &mut [u8], _s: u32) -> bool {
            false
        }
    }

    fn rgb_raster() -> Raster {
        Raster::new(2, 1, false, PixelStore::PackedRgb(vec![0x00112233, 0x00445566])).unwrap()
    }

    fn rgba_raster() -> Raster {
        Raster::new(2, 1, true, PixelStore::PackedRgb(vec![0x80112233, 0xFF445566])).unwrap()
    }

    #[test]
    fn builder_defaults() {
        let codec = Recording::replying(b"x");
        let request = EncodeRequest::new(&codec);
        assert_eq!(request.quality, 75.0);
        assert!(!request.lossless);
    }

    #[test]
    fn quality_is_clamped() {
        let codec = Recording::replying(b"x");
        let request = EncodeRequest::new(&codec).with_quality(250.0);
        assert_eq!(request.quality, 100.0);
        let request = EncodeRequest::new(&codec).with_quality(-3.0);
        assert_eq!(request.quality, 0.0);
    }

    #[test]
    fn dispatches_lossy_rgb_with_stride() {
        let codec = Recording::replying(b"out");
        let data = EncodeRequest::new(&codec)
            .with_quality(50.0)
            .encode(&rgb_raster())
            .unwrap();
        assert_eq!(data, b"out");

        let calls = codec.calls.lock().unwrap();
        let (name, pixels, w, h, stride, quality) = calls[0].clone();
        assert_eq!(name, "rgb");
        assert_eq!(pixels, [0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        assert_eq!((w, h, stride), (2, 1, 6));
        assert_eq!(quality, 50.0);
    }

    #[test]
    fn dispatches_lossless_rgba_without_quality() {
        let codec = Recording::replying(b"out");
        EncodeRequest::new(&codec)
            .with_quality(50.0)
            .with_lossless(true)
            .encode(&rgba_raster())
            .unwrap();

        let calls = codec.calls.lock().unwrap();
        let (name, pixels, _, _, stride, _) = calls[0].clone();
        assert_eq!(name, "lossless_rgba");
        assert_eq!(pixels, [0x11, 0x22, 0x33, 0x80, 0x44, 0x55, 0x66, 0xFF]);
        assert_eq!(stride, 8);
    }

    #[test]
    fn stride_overflow_rejected_before_conversion() {
        // A generic store carries no length, so a raster this wide is
        // constructible; its u32 stride is not.
        struct NullRows;
        impl crate::raster::RowSource for NullRows {
            fn read_row(&self, _y: u32, row: &mut [u32]) {
                row.fill(0);
            }
        }

        let codec = Recording::replying(b"x");
        let raster =
            Raster::new(1 << 30, 1, true, PixelStore::Generic(Box::new(NullRows))).unwrap();
        let err = EncodeRequest::new(&codec).encode(&raster).unwrap_err();
        assert!(matches!(err, CodecError::InvalidInput(_)));
        assert!(codec.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn intermediate_buffer_scrubbed_on_success() {
        let codec = Recording::replying(b"out");
        let (result, pixels) = EncodeRequest::new(&codec).encode_inner(&rgb_raster());
        assert!(result.is_ok());
        assert_eq!(pixels.len(), 2 * 3);
        assert!(pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn intermediate_buffer_scrubbed_on_encoding_failure() {
        let codec = Recording::replying(b"");
        let (result, pixels) = EncodeRequest::new(&codec).encode_inner(&rgba_raster());
        assert!(matches!(result, Err(CodecError::EncodingFailed { .. })));
        assert_eq!(pixels.len(), 2 * 4);
        assert!(pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_codec_output_is_encoding_failed() {
        let codec = Recording::replying(b"");
        let err = EncodeRequest::new(&codec).encode(&rgb_raster()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::EncodingFailed {
                mode: EncodeMode::Lossy
            }
        ));

        let err = EncodeRequest::new(&codec)
            .with_lossless(true)
            .encode(&rgb_raster())
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::EncodingFailed {
                mode: EncodeMode::Lossless
            }
        ));
    }
}
