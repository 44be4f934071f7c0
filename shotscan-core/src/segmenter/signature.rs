//! Perceptual frame signatures.
//!
//! A signature is a 2-D histogram over hue and saturation, computed on the
//! top band of the frame and min-max normalized to [0, 1]. Hue uses the
//! half-degree convention (180 bins over [0, 180)) and saturation 256 bins,
//! so the descriptor has a fixed 180x256 shape regardless of frame size.
//! Value/brightness is deliberately ignored: it makes the signature robust
//! to exposure flicker while still separating differently colored shots.

use crate::config::{HUE_BINS, SAT_BINS};
use crate::frame::Frame;

/// Normalized hue/saturation histogram of a frame's (cropped) region.
#[derive(Debug, Clone)]
pub struct Signature {
    bins: Vec<f32>,
}

impl Signature {
    /// Computes the signature of `frame` over its top `crop_fraction` rows.
    ///
    /// `crop_fraction` is expected in (0, 1]; at least one row is always
    /// included for non-empty frames.
    pub fn from_frame(frame: &Frame, crop_fraction: f64) -> Self {
        let mut bins = vec![0f32; HUE_BINS * SAT_BINS];

        let height = frame.height();
        let width = frame.width();
        if height == 0 || width == 0 {
            return Self { bins };
        }

        let included_rows = ((height as f64 * crop_fraction).round() as u32).clamp(1, height);

        for y in 0..included_rows {
            for x in 0..width {
                let [r, g, b] = frame.pixel(x, y);
                let (hue_bin, sat_bin) = hue_sat_bins(r, g, b);
                bins[hue_bin * SAT_BINS + sat_bin] += 1.0;
            }
        }

        normalize_min_max(&mut bins);
        Self { bins }
    }

    /// Pearson correlation between two signatures, in [-1, 1] with 1.0
    /// meaning identical distributions.
    ///
    /// Two flat histograms carry no distributional information to compare,
    /// so they are treated as identical rather than producing NaN.
    pub fn correlation(&self, other: &Signature) -> f64 {
        let n = self.bins.len() as f64;
        let mean_a = self.bins.iter().map(|&v| v as f64).sum::<f64>() / n;
        let mean_b = other.bins.iter().map(|&v| v as f64).sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut var_a = 0.0;
        let mut var_b = 0.0;
        for (&a, &b) in self.bins.iter().zip(other.bins.iter()) {
            let da = a as f64 - mean_a;
            let db = b as f64 - mean_b;
            covariance += da * db;
            var_a += da * da;
            var_b += db * db;
        }

        let denom = (var_a * var_b).sqrt();
        if denom <= f64::EPSILON {
            return 1.0;
        }
        covariance / denom
    }
}

/// Maps an RGB pixel to its (hue, saturation) bin pair.
///
/// Follows the common 8-bit convention: hue in [0, 180) half-degrees,
/// saturation scaled to [0, 255]. Achromatic pixels land in hue bin 0 with
/// saturation 0.
fn hue_sat_bins(r: u8, g: u8, b: u8) -> (usize, usize) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f64;

    let sat = if max == 0 {
        0.0
    } else {
        255.0 * delta / max as f64
    };
    let sat_bin = (sat.round() as usize).min(SAT_BINS - 1);

    if delta == 0.0 {
        return (0, sat_bin);
    }

    let (rf, gf, bf) = (r as f64, g as f64, b as f64);
    let mut hue_degrees = if max == r {
        60.0 * (gf - bf) / delta
    } else if max == g {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if hue_degrees < 0.0 {
        hue_degrees += 360.0;
    }

    let hue_bin = ((hue_degrees / 2.0).round() as usize) % HUE_BINS;
    (hue_bin, sat_bin)
}

/// Rescales `bins` to [0, 1] in place. A histogram with no spread (all bins
/// equal) is left untouched.
fn normalize_min_max(bins: &mut [f32]) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for &v in bins.iter() {
        min = min.min(v);
        max = max.max(v);
    }
    let range = max - min;
    if range <= 0.0 {
        return;
    }
    for v in bins.iter_mut() {
        *v = (*v - min) / range;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width * height) {
            data.extend_from_slice(&rgb);
        }
        Frame::new(width, height, data)
    }

    #[test]
    fn test_hue_sat_bins_primaries() {
        // Red sits at hue 0, green at 60 half-degrees, blue at 120.
        assert_eq!(hue_sat_bins(255, 0, 0), (0, 255));
        assert_eq!(hue_sat_bins(0, 255, 0), (60, 255));
        assert_eq!(hue_sat_bins(0, 0, 255), (120, 255));
    }

    #[test]
    fn test_hue_sat_bins_achromatic() {
        assert_eq!(hue_sat_bins(0, 0, 0), (0, 0));
        assert_eq!(hue_sat_bins(128, 128, 128), (0, 0));
        assert_eq!(hue_sat_bins(255, 255, 255), (0, 0));
    }

    #[test]
    fn test_signature_is_normalized() {
        let frame = solid_frame(8, 8, [200, 30, 30]);
        let sig = Signature::from_frame(&frame, 1.0);
        let max = sig.bins.iter().cloned().fold(f32::MIN, f32::max);
        let min = sig.bins.iter().cloned().fold(f32::MAX, f32::min);
        assert_eq!(max, 1.0);
        assert_eq!(min, 0.0);
    }

    #[test]
    fn test_correlation_identical_is_one() {
        let frame = solid_frame(16, 16, [255, 0, 0]);
        let a = Signature::from_frame(&frame, 0.8);
        let b = Signature::from_frame(&frame, 0.8);
        assert!((a.correlation(&b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_disjoint_colors_is_low() {
        let red = Signature::from_frame(&solid_frame(16, 16, [255, 0, 0]), 1.0);
        let blue = Signature::from_frame(&solid_frame(16, 16, [0, 0, 255]), 1.0);
        // Two one-hot histograms at different bins correlate near zero.
        assert!(red.correlation(&blue) < 0.05);
    }

    #[test]
    fn test_crop_excludes_bottom_band() {
        // Top 8 rows red, bottom 2 rows blue. With an 0.8 crop the blue band
        // must not influence the signature at all.
        let width = 4u32;
        let height = 10u32;
        let mut data = Vec::new();
        for y in 0..height {
            for _ in 0..width {
                if y < 8 {
                    data.extend_from_slice(&[255, 0, 0]);
                } else {
                    data.extend_from_slice(&[0, 0, 255]);
                }
            }
        }
        let mixed = Frame::new(width, height, data);
        let cropped = Signature::from_frame(&mixed, 0.8);
        let pure_red = Signature::from_frame(&solid_frame(width, 8, [255, 0, 0]), 1.0);
        assert!((cropped.correlation(&pure_red) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_frame_signatures_compare_equal() {
        let empty = Frame::new(0, 0, Vec::new());
        let a = Signature::from_frame(&empty, 0.8);
        let b = Signature::from_frame(&empty, 0.8);
        assert_eq!(a.correlation(&b), 1.0);
    }
}
