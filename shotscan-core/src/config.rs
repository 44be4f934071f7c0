//! Configuration structures and constants for the shotscan-core library.
//!
//! The historical detector hard-coded different gap and crop values at
//! different call sites. Here they form a single configurable parameter set
//! with documented defaults, validated up front instead of silently producing
//! nonsensical comparisons.

use crate::error::{Result, ShotscanError};

// Default constants

/// Default detection threshold (0-100). Higher values require greater
/// dissimilarity between sampled frames before declaring a new shot.
/// Practical tuning range is 10-60.
pub const DEFAULT_THRESHOLD: f64 = 30.0;

/// Default number of decoded frames skipped between comparison candidates.
/// Comparing every frame is wasteful for near-static shots; subtitle flicker
/// inside a skipped window is irrelevant by construction.
pub const DEFAULT_SAMPLE_STRIDE: u32 = 15;

/// Default minimum elapsed time between two emitted boundaries, in seconds.
/// Debounces transient flashes and subtitle flicker into a single cut.
pub const DEFAULT_MIN_GAP_SECONDS: f64 = 1.5;

/// Default fraction of the frame height, measured from the top, included in
/// the signature computation. The bottom band is excluded entirely to keep
/// burned-in subtitle text out of the comparison. 1.0 disables cropping.
pub const DEFAULT_SUBTITLE_CROP_FRACTION: f64 = 0.8;

/// Frame rate used for timestamp math when the source reports a zero or
/// invalid rate. Avoids division by zero; a policy, not an error.
pub const FALLBACK_FPS: f64 = 30.0;

/// Number of hue bins in a signature histogram (hue range [0, 180)).
pub const HUE_BINS: usize = 180;

/// Number of saturation bins in a signature histogram (range [0, 256)).
pub const SAT_BINS: usize = 256;

/// Parameters controlling scene segmentation.
///
/// All fields have sensible defaults; a typical caller only overrides
/// `threshold`. Out-of-range values are rejected by [`validate`](Self::validate)
/// rather than clamped.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Detection sensitivity in [0, 100]; dissimilarity must exceed
    /// `threshold / 100` to emit a boundary.
    pub threshold: f64,

    /// Number of decoded frames between comparison candidates (>= 1).
    pub sample_stride: u32,

    /// Minimum elapsed seconds between two emitted boundaries (>= 0).
    pub min_gap_seconds: f64,

    /// Fraction of the frame height included in signatures, in (0, 1].
    pub subtitle_crop_fraction: f64,

    /// Frame rate substituted when the source reports none (> 0).
    pub fallback_fps: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            min_gap_seconds: DEFAULT_MIN_GAP_SECONDS,
            subtitle_crop_fraction: DEFAULT_SUBTITLE_CROP_FRACTION,
            fallback_fps: FALLBACK_FPS,
        }
    }
}

impl SegmenterConfig {
    /// Convenience constructor: defaults with a custom threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    /// Checks every parameter against its documented range.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(ShotscanError::InvalidConfig(format!(
                "threshold must be in [0, 100], got {}",
                self.threshold
            )));
        }
        if self.sample_stride == 0 {
            return Err(ShotscanError::InvalidConfig(
                "sample_stride must be at least 1".to_string(),
            ));
        }
        if !self.min_gap_seconds.is_finite() || self.min_gap_seconds < 0.0 {
            return Err(ShotscanError::InvalidConfig(format!(
                "min_gap_seconds must be non-negative, got {}",
                self.min_gap_seconds
            )));
        }
        if !self.subtitle_crop_fraction.is_finite()
            || self.subtitle_crop_fraction <= 0.0
            || self.subtitle_crop_fraction > 1.0
        {
            return Err(ShotscanError::InvalidConfig(format!(
                "subtitle_crop_fraction must be in (0, 1], got {}",
                self.subtitle_crop_fraction
            )));
        }
        if !self.fallback_fps.is_finite() || self.fallback_fps <= 0.0 {
            return Err(ShotscanError::InvalidConfig(format!(
                "fallback_fps must be positive, got {}",
                self.fallback_fps
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SegmenterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_with_threshold() {
        let config = SegmenterConfig::with_threshold(45.0);
        assert_eq!(config.threshold, 45.0);
        assert_eq!(config.sample_stride, DEFAULT_SAMPLE_STRIDE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        for bad in [-1.0, 100.5, f64::NAN, f64::INFINITY] {
            let config = SegmenterConfig::with_threshold(bad);
            assert!(config.validate().is_err(), "threshold {bad} should be rejected");
        }
    }

    #[test]
    fn test_rejects_zero_stride() {
        let config = SegmenterConfig {
            sample_stride: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_crop_fraction() {
        for bad in [0.0, -0.2, 1.01] {
            let config = SegmenterConfig {
                subtitle_crop_fraction: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "crop fraction {bad} should be rejected");
        }
        let full_frame = SegmenterConfig {
            subtitle_crop_fraction: 1.0,
            ..Default::default()
        };
        assert!(full_frame.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_gap() {
        let config = SegmenterConfig {
            min_gap_seconds: -0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
