//! Resource limits for decode orchestration.

/// Limits applied between probing a bitstream and allocating its output
/// buffer. All limits are optional; the default is unlimited.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum image width in pixels.
    pub max_width: Option<u32>,
    /// Maximum image height in pixels.
    pub max_height: Option<u32>,
    /// Maximum total pixels (width x height).
    pub max_pixels: Option<u64>,
    /// Maximum output buffer allocation in bytes.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// No restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check probed dimensions against the configured limits.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), &'static str> {
        if let Some(max_width) = self.max_width {
            if width > max_width {
                return Err("width exceeds limit");
            }
        }
        if let Some(max_height) = self.max_height {
            if height > max_height {
                return Err("height exceeds limit");
            }
        }
        if let Some(max_pixels) = self.max_pixels {
            let pixels = u64::from(width).saturating_mul(u64::from(height));
            if pixels > max_pixels {
                return Err("pixel count exceeds limit");
            }
        }
        Ok(())
    }

    /// Check an output buffer allocation against the configured limits.
    pub fn check_memory(&self, bytes: u64) -> Result<(), &'static str> {
        if let Some(max_memory) = self.max_memory_bytes {
            if bytes > max_memory {
                return Err("output buffer exceeds memory limit");
            }
        }
        Ok(())
    }
}
