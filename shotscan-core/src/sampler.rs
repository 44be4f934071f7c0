//! Fixed-point frame extraction.
//!
//! Independent of the segmenter but built on the same decoding primitives:
//! seek to an offset, decode a single frame, return it. Used for things like
//! pulling a title card at a known time.

use crate::error::{Result, ShotscanError};
use crate::external::decoder;
use crate::frame::Frame;
use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::Path;

/// Returns the single decoded frame nearest `offset_secs` in the stream.
pub fn frame_at_time(input_path: &Path, offset_secs: f64) -> Result<Frame> {
    if !offset_secs.is_finite() || offset_secs < 0.0 {
        return Err(ShotscanError::InvalidConfig(format!(
            "sample offset must be a non-negative number of seconds, got {offset_secs}"
        )));
    }

    log::debug!(
        "Sampling frame at {:.3}s from {}",
        offset_secs,
        input_path.display()
    );

    // -ss before -i seeks on the demuxer, then a one-frame rawvideo decode.
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner()
        .seek(format!("{offset_secs:.3}"))
        .input(input_path.to_string_lossy().as_ref())
        .arg("-an")
        .arg("-sn")
        .frames(1)
        .rawvideo();

    let mut sampled: Option<Frame> = None;
    decoder::run_frame_pipeline(cmd, input_path, |frame| {
        // -frames:v 1 means at most one frame arrives; keep the first.
        if sampled.is_none() {
            sampled = Some(frame);
        }
        Ok(())
    })?;

    sampled.ok_or_else(|| {
        ShotscanError::Decode(format!(
            "no frame decodable at {:.3}s in {}",
            offset_secs,
            input_path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_rejects_negative_offset() {
        let result = frame_at_time(&PathBuf::from("/nonexistent.mp4"), -1.0);
        assert!(matches!(result, Err(ShotscanError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_non_finite_offset() {
        let result = frame_at_time(&PathBuf::from("/nonexistent.mp4"), f64::NAN);
        assert!(matches!(result, Err(ShotscanError::InvalidConfig(_))));
    }
}
