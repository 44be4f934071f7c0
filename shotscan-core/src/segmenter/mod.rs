//! Scene segmentation: the shot boundary detection state machine.
//!
//! The segmenter consumes decoded frames one at a time, compares every
//! `sample_stride`-th frame's color signature against the previously kept
//! one, and emits a representative frame whenever the content has drifted
//! far enough AND enough time has passed since the last emission. Both
//! conditions are required: a strong-but-too-soon change is suppressed, and
//! so is a weak-but-long-elapsed one.
//!
//! All run state lives in a [`SceneSegmenter`] value local to a single scan,
//! so concurrent scans of different inputs never interfere.

mod signature;

pub use signature::Signature;

use crate::config::SegmenterConfig;
use crate::error::Result;
use crate::external::{decoder, ffprobe_executor};
use crate::frame::Frame;
use serde::Serialize;
use std::path::Path;

/// Metadata of an emitted boundary, separate from the pixel data so it can
/// be serialized into a manifest.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryInfo {
    /// Zero-based ordinal of the frame in the decode sequence
    pub frame_index: u64,
    /// Presentation time in seconds, `frame_index / effective_fps`
    pub timestamp_secs: f64,
    /// `1 - correlation` against the previously kept signature; the first
    /// boundary of a stream has no predecessor and reports 1.0
    pub dissimilarity: f64,
}

/// A representative frame marking a scene change.
#[derive(Debug, Clone)]
pub struct SceneBoundary {
    pub frame: Frame,
    pub info: BoundaryInfo,
}

/// Statistics of a completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    /// Total frames decoded from the stream
    pub frames_decoded: u64,
    /// Number of boundaries handed to the sink
    pub boundaries_emitted: usize,
    /// Frame rate used for timestamp math (nominal or fallback)
    pub effective_fps: f64,
}

/// Per-run detection state: previous kept signature, last emission time, and
/// the frame counter. Created fresh for every scan and discarded afterwards.
pub struct SceneSegmenter {
    config: SegmenterConfig,
    effective_fps: f64,
    frame_index: u64,
    previous: Option<Signature>,
    last_emitted_secs: f64,
}

impl SceneSegmenter {
    /// Creates a segmenter for a stream with the given nominal frame rate.
    ///
    /// Rejects out-of-range configuration. A missing, zero, or otherwise
    /// unusable `nominal_fps` is replaced by `config.fallback_fps` without
    /// surfacing an error; this only affects timestamp math.
    pub fn new(config: SegmenterConfig, nominal_fps: Option<f64>) -> Result<Self> {
        config.validate()?;
        let effective_fps = match nominal_fps {
            Some(fps) if fps.is_finite() && fps > 0.0 => fps,
            reported => {
                log::debug!(
                    "No usable frame rate ({:?}), using fallback {} fps",
                    reported,
                    config.fallback_fps
                );
                config.fallback_fps
            }
        };
        Ok(Self {
            effective_fps,
            config,
            frame_index: 0,
            previous: None,
            last_emitted_secs: 0.0,
        })
    }

    /// Frame rate used for timestamp computation.
    pub fn effective_fps(&self) -> f64 {
        self.effective_fps
    }

    /// Number of frames pushed so far.
    pub fn frames_seen(&self) -> u64 {
        self.frame_index
    }

    /// Feeds the next decoded frame in sequence order.
    ///
    /// Returns a boundary when this frame is kept: the first sampled
    /// candidate is always kept, later candidates only when the signature
    /// dissimilarity exceeds `threshold / 100` and at least
    /// `min_gap_seconds` have elapsed since the last kept frame.
    /// Non-candidate frames are counted and dropped with no computation.
    pub fn push(&mut self, frame: Frame) -> Option<SceneBoundary> {
        let index = self.frame_index;
        self.frame_index += 1;

        if index % self.config.sample_stride as u64 != 0 {
            return None;
        }

        let timestamp_secs = index as f64 / self.effective_fps;
        let signature = Signature::from_frame(&frame, self.config.subtitle_crop_fraction);

        let dissimilarity = match &self.previous {
            // Stream start: establish the initial signature unconditionally.
            None => 1.0,
            Some(previous) => {
                let dissimilarity = 1.0 - signature.correlation(previous);
                if dissimilarity <= self.config.threshold / 100.0 {
                    return None;
                }
                if timestamp_secs - self.last_emitted_secs < self.config.min_gap_seconds {
                    log::debug!(
                        "Suppressing cut at {:.2}s (dissimilarity {:.3}): within {}s debounce gap",
                        timestamp_secs,
                        dissimilarity,
                        self.config.min_gap_seconds
                    );
                    return None;
                }
                dissimilarity
            }
        };

        log::debug!(
            "Keeping frame {} at {:.2}s (dissimilarity {:.3})",
            index,
            timestamp_secs,
            dissimilarity
        );
        self.previous = Some(signature);
        self.last_emitted_secs = timestamp_secs;
        Some(SceneBoundary {
            frame,
            info: BoundaryInfo {
                frame_index: index,
                timestamp_secs,
                dissimilarity,
            },
        })
    }
}

/// Detects scene boundaries in a video file using the default parameter set
/// with a custom threshold.
///
/// See [`scan_scene_boundaries`] for the streaming variant that does not
/// materialize every kept frame in memory at once.
pub fn detect_scene_boundaries(input_path: &Path, threshold: f64) -> Result<Vec<SceneBoundary>> {
    detect_scene_boundaries_with_config(input_path, &SegmenterConfig::with_threshold(threshold))
}

/// Detects scene boundaries with a fully specified parameter set, returning
/// the ordered list of kept frames and their timestamps.
pub fn detect_scene_boundaries_with_config(
    input_path: &Path,
    config: &SegmenterConfig,
) -> Result<Vec<SceneBoundary>> {
    let mut boundaries = Vec::new();
    scan_scene_boundaries(input_path, config, |boundary| {
        boundaries.push(boundary);
        Ok(())
    })?;
    Ok(boundaries)
}

/// Streaming scene detection: `sink` is invoked with each boundary as it is
/// emitted, so callers can persist frames incrementally instead of holding
/// every kept pixel buffer for the whole run.
///
/// An undecodable input is reported as [`ShotscanError::Decode`] rather than
/// an empty result, so "no scene changes" and "nothing decodable" stay
/// distinguishable.
///
/// [`ShotscanError::Decode`]: crate::error::ShotscanError::Decode
pub fn scan_scene_boundaries<F>(
    input_path: &Path,
    config: &SegmenterConfig,
    mut sink: F,
) -> Result<ScanSummary>
where
    F: FnMut(SceneBoundary) -> Result<()>,
{
    config.validate()?;

    // Probe failures are not fatal here: the rate only drives timestamp
    // math, and decode failure is diagnosed by the decoder itself.
    let nominal_fps = match ffprobe_executor::probe_video(input_path) {
        Ok(info) => info.frame_rate,
        Err(e) => {
            log::warn!("Probe failed for {}: {}", input_path.display(), e);
            None
        }
    };

    let mut segmenter = SceneSegmenter::new(config.clone(), nominal_fps)?;
    let mut boundaries_emitted = 0usize;

    let frames_decoded = decoder::decode_frames(input_path, |frame| {
        if let Some(boundary) = segmenter.push(frame) {
            boundaries_emitted += 1;
            sink(boundary)?;
        }
        Ok(())
    })?;

    log::info!(
        "Scanned {} frames from {}, emitted {} scene boundaries",
        frames_decoded,
        input_path.display(),
        boundaries_emitted
    );

    Ok(ScanSummary {
        frames_decoded,
        boundaries_emitted,
        effective_fps: segmenter.effective_fps(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(rgb: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity(16 * 16 * 3);
        for _ in 0..(16 * 16) {
            data.extend_from_slice(&rgb);
        }
        Frame::new(16, 16, data)
    }

    #[test]
    fn test_fallback_fps_applied() {
        let config = SegmenterConfig::default();
        for bad in [None, Some(0.0), Some(-24.0), Some(f64::NAN), Some(f64::INFINITY)] {
            let segmenter = SceneSegmenter::new(config.clone(), bad).unwrap();
            assert_eq!(segmenter.effective_fps(), config.fallback_fps);
        }
        let segmenter = SceneSegmenter::new(config, Some(25.0)).unwrap();
        assert_eq!(segmenter.effective_fps(), 25.0);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = SegmenterConfig::with_threshold(-5.0);
        assert!(SceneSegmenter::new(config, Some(30.0)).is_err());
    }

    #[test]
    fn test_non_candidate_frames_are_skipped() {
        let mut segmenter =
            SceneSegmenter::new(SegmenterConfig::default(), Some(30.0)).unwrap();
        // Frame 0 is the first candidate and is always kept.
        assert!(segmenter.push(solid_frame([255, 0, 0])).is_some());
        // Frames 1..15 are not candidates, whatever their content.
        for _ in 1..15 {
            assert!(segmenter.push(solid_frame([0, 0, 255])).is_none());
        }
        assert_eq!(segmenter.frames_seen(), 15);
    }

    #[test]
    fn test_first_candidate_reports_full_dissimilarity() {
        let mut segmenter =
            SceneSegmenter::new(SegmenterConfig::default(), Some(30.0)).unwrap();
        let boundary = segmenter.push(solid_frame([10, 200, 10])).unwrap();
        assert_eq!(boundary.info.frame_index, 0);
        assert_eq!(boundary.info.timestamp_secs, 0.0);
        assert_eq!(boundary.info.dissimilarity, 1.0);
    }
}
