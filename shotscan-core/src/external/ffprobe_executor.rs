//! FFprobe integration for media analysis and information extraction
//!
//! Provides the stream metadata the segmenter needs before decoding:
//! dimensions, duration, nominal frame rate, and total frame count where the
//! container reports one.

use crate::error::{Result, ShotscanError};
use ffprobe::ffprobe;
use serde::Serialize;
use std::path::Path;

/// Properties of the first video stream in a media file.
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    /// Width of the video stream in pixels
    pub width: u32,
    /// Height of the video stream in pixels
    pub height: u32,
    /// Container duration in seconds, when reported
    pub duration_secs: Option<f64>,
    /// Nominal frame rate in frames/second; `None` when the source reports
    /// a zero or unparseable rate. Callers substitute the fallback rate.
    pub frame_rate: Option<f64>,
    /// Total number of frames, when the container reports one
    pub total_frames: Option<u64>,
}

/// Gets video stream properties for a given input file.
pub fn probe_video(input_path: &Path) -> Result<VideoInfo> {
    log::debug!(
        "Running ffprobe (via crate) for video properties on: {}",
        input_path.display()
    );
    let metadata = ffprobe(input_path).map_err(|err| {
        log::error!("ffprobe failed for {}: {:?}", input_path.display(), err);
        ShotscanError::Probe(format!(
            "ffprobe failed for {}: {:?}",
            input_path.display(),
            err
        ))
    })?;

    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            ShotscanError::Probe(format!(
                "No video stream found in {}",
                input_path.display()
            ))
        })?;

    let width = video_stream.width.filter(|w| *w > 0).ok_or_else(|| {
        ShotscanError::Probe(format!(
            "Video stream missing width in {}",
            input_path.display()
        ))
    })? as u32;
    let height = video_stream.height.filter(|h| *h > 0).ok_or_else(|| {
        ShotscanError::Probe(format!(
            "Video stream missing height in {}",
            input_path.display()
        ))
    })? as u32;

    let duration_secs = metadata
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| *d > 0.0);

    // Prefer the average rate; fall back to the raw rate for streams where
    // the container leaves avg_frame_rate at "0/0".
    let frame_rate = parse_rate(&video_stream.avg_frame_rate)
        .or_else(|| parse_rate(&video_stream.r_frame_rate));
    if frame_rate.is_none() {
        log::warn!(
            "No usable frame rate reported for {} (avg '{}', r '{}')",
            input_path.display(),
            video_stream.avg_frame_rate,
            video_stream.r_frame_rate
        );
    }

    let total_frames = video_stream
        .nb_frames
        .as_deref()
        .and_then(|f| f.parse::<u64>().ok());

    Ok(VideoInfo {
        width,
        height,
        duration_secs,
        frame_rate,
        total_frames,
    })
}

/// Parses an ffprobe rational rate string ("30000/1001") into frames/second.
/// Zero or degenerate rates yield `None`.
fn parse_rate(rate: &str) -> Option<f64> {
    let (num, den) = rate.split_once('/')?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    if num <= 0.0 || den <= 0.0 {
        return None;
    }
    let fps = num / den;
    fps.is_finite().then_some(fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("30/1"), Some(30.0));
        assert_eq!(parse_rate("25/1"), Some(25.0));
        let ntsc = parse_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_rate_rejects_degenerate() {
        assert_eq!(parse_rate("0/0"), None);
        assert_eq!(parse_rate("0/1"), None);
        assert_eq!(parse_rate("30/0"), None);
        assert_eq!(parse_rate("-30/1"), None);
        assert_eq!(parse_rate("garbage"), None);
        assert_eq!(parse_rate("30"), None);
    }
}
