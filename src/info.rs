//! Bitstream metadata reported by the codec without a full decode.

use core::fmt;

/// Compression mode recorded in a bitstream header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitstreamFormat {
    /// Undefined or mixed.
    Undefined,
    Lossy,
    Lossless,
}

impl BitstreamFormat {
    /// Map the codec's numeric format code (0 = undefined, 1 = lossy,
    /// 2 = lossless). Unknown codes fold into `Undefined`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => BitstreamFormat::Lossy,
            2 => BitstreamFormat::Lossless,
            _ => BitstreamFormat::Undefined,
        }
    }

    /// Numeric format code as reported by the codec.
    pub fn code(self) -> i32 {
        match self {
            BitstreamFormat::Undefined => 0,
            BitstreamFormat::Lossy => 1,
            BitstreamFormat::Lossless => 2,
        }
    }
}

/// Metadata describing a compressed bitstream.
///
/// Produced by [`NativeCodec::get_features`](crate::NativeCodec::get_features)
/// and consumed once by the decode path to choose the RGB or RGBA output
/// buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitstreamFeatures {
    pub width: u32,
    pub height: u32,
    /// Whether the bitstream carries an alpha channel.
    pub has_alpha: bool,
    /// Whether the bitstream is an animation.
    pub has_animation: bool,
    pub format: BitstreamFormat,
}

/// Status codes for feature retrieval, mirroring the codec's native
/// status vocabulary. `Ok` is 0; implementations of
/// [`NativeCodec::get_features`](crate::NativeCodec::get_features) must
/// never return `Err(FeatureStatus::Ok)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureStatus {
    Ok,
    OutOfMemory,
    InvalidParam,
    BitstreamError,
    UnsupportedFeature,
    Suspended,
    UserAbort,
    NotEnoughData,
}

impl FeatureStatus {
    pub fn is_ok(self) -> bool {
        self == FeatureStatus::Ok
    }

    /// Numeric status code as reported by the codec.
    pub fn code(self) -> i32 {
        match self {
            FeatureStatus::Ok => 0,
            FeatureStatus::OutOfMemory => 1,
            FeatureStatus::InvalidParam => 2,
            FeatureStatus::BitstreamError => 3,
            FeatureStatus::UnsupportedFeature => 4,
            FeatureStatus::Suspended => 5,
            FeatureStatus::UserAbort => 6,
            FeatureStatus::NotEnoughData => 7,
        }
    }

    /// Map a numeric status code. Unknown codes fold into `BitstreamError`.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => FeatureStatus::Ok,
            1 => FeatureStatus::OutOfMemory,
            2 => FeatureStatus::InvalidParam,
            3 => FeatureStatus::BitstreamError,
            4 => FeatureStatus::UnsupportedFeature,
            5 => FeatureStatus::Suspended,
            6 => FeatureStatus::UserAbort,
            7 => FeatureStatus::NotEnoughData,
            _ => FeatureStatus::BitstreamError,
        }
    }
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureStatus::Ok => "ok",
            FeatureStatus::OutOfMemory => "out of memory",
            FeatureStatus::InvalidParam => "invalid parameter",
            FeatureStatus::BitstreamError => "bitstream error",
            FeatureStatus::UnsupportedFeature => "unsupported feature",
            FeatureStatus::Suspended => "suspended",
            FeatureStatus::UserAbort => "user abort",
            FeatureStatus::NotEnoughData => "not enough data",
        };
        write!(f, "{} ({})", name, self.code())
    }
}
