//! The external codec contract and the process-wide installed handle.
//!
//! The codec itself — entropy coding, prediction, transforms — is out of
//! scope here. This module defines the boundary the orchestrator drives
//! and a write-once process-wide slot for the codec implementation an
//! application chooses to install (typically a wrapper over a native
//! library; tests substitute a fake).

use std::sync::OnceLock;

use crate::error::CodecError;
use crate::info::{BitstreamFeatures, FeatureStatus};

/// The compressor/decompressor boundary.
///
/// Pixel buffers are interleaved R,G,B or R,G,B,A with an explicit stride
/// in bytes per row; stride may exceed `width * bytes_per_pixel` and
/// implementations must honor it. Encode entry points return an empty
/// vector on failure; decode entry points return `false`.
pub trait NativeCodec: Send + Sync {
    /// Read `(width, height)` from a bitstream header, or `None` if the
    /// header is malformed.
    fn get_info(&self, data: &[u8]) -> Option<(u32, u32)>;

    /// Read full bitstream features. Must never return
    /// `Err(FeatureStatus::Ok)`.
    fn get_features(&self, data: &[u8]) -> Result<BitstreamFeatures, FeatureStatus>;

    /// Lossy-encode interleaved RGB pixels. `quality` is 0..=100.
    fn encode_rgb(&self, pixels: &[u8], width: u32, height: u32, stride: u32, quality: f32)
    -> Vec<u8>;

    /// Lossy-encode interleaved RGBA pixels. `quality` is 0..=100.
    fn encode_rgba(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        stride: u32,
        quality: f32,
    ) -> Vec<u8>;

    /// Lossless-encode interleaved RGB pixels.
    fn encode_lossless_rgb(&self, pixels: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8>;

    /// Lossless-encode interleaved RGBA pixels.
    fn encode_lossless_rgba(&self, pixels: &[u8], width: u32, height: u32, stride: u32) -> Vec<u8>;

    /// Decode a bitstream into a caller-allocated RGB buffer.
    fn decode_rgb_into(&self, data: &[u8], output: &mut [u8], stride: u32) -> bool;

    /// Decode a bitstream into a caller-allocated RGBA buffer.
    fn decode_rgba_into(&self, data: &[u8], output: &mut [u8], stride: u32) -> bool;
}

static INSTALLED: OnceLock<Box<dyn NativeCodec>> = OnceLock::new();

/// Install the process-wide codec. Returns `false` if one is already
/// installed (the first installation wins and is never replaced).
pub fn install(codec: Box<dyn NativeCodec>) -> bool {
    INSTALLED.set(codec).is_ok()
}

/// Fetch the installed codec.
///
/// This is the single entry point for the process-wide handle; requests
/// never consult it implicitly. Returns [`CodecError::CodecUnavailable`]
/// when nothing has been installed.
pub fn ensure_loaded() -> Result<&'static dyn NativeCodec, CodecError> {
    INSTALLED
        .get()
        .map(|codec| codec.as_ref())
        .ok_or(CodecError::CodecUnavailable)
}
