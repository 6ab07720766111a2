//! # webp-bridge
//!
//! Converts in-memory rasters to and from the interleaved byte layouts a
//! WebP-style codec consumes, and orchestrates which codec entry point to
//! invoke for every combination of alpha presence, compression mode, and
//! source pixel layout.
//!
//! The codec itself is an external collaborator behind the [`NativeCodec`]
//! trait; install one process-wide with [`codec::install`] or pass it to
//! each request explicitly.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use webp_bridge::{DecodeRequest, EncodeRequest};
//!
//! let codec = webp_bridge::codec::ensure_loaded()?;
//!
//! // Decode a compressed bitstream to a raster.
//! let data: &[u8] = &[]; // your compressed bytes
//! let raster = DecodeRequest::new(codec, data).decode()?;
//!
//! // Re-encode it, lossless this time.
//! let compressed = EncodeRequest::new(codec)
//!     .with_lossless(true)
//!     .encode(&raster)?;
//! # Ok::<(), webp_bridge::CodecError>(())
//! ```
//!
//! Conversion between rasters and codec-ready byte buffers is also usable
//! on its own via [`convert::to_bytes`] and [`convert::to_raster`].

#![forbid(unsafe_code)]

pub mod buffer;
pub mod codec;
pub mod convert;
mod decode;
mod encode;
mod error;
mod info;
mod limits;
pub mod pixel;
mod raster;

pub use codec::NativeCodec;
pub use decode::DecodeRequest;
pub use encode::{EncodeMode, EncodeRequest};
pub use error::{CodecError, ConversionError};
pub use info::{BitstreamFeatures, BitstreamFormat, FeatureStatus};
pub use limits::Limits;
pub use raster::{PixelStore, Raster, RowSource};
