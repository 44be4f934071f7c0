//! Raw frame decoding via ffmpeg-sidecar.
//!
//! Decoding is single-threaded and blocking: ffmpeg writes packed rgb24
//! frames to a pipe and this module hands them to a callback one at a time.
//! The child process is waited on every exit path, including callback
//! failure, so the decode handle is always released.

use crate::error::{Result, ShotscanError};
use crate::frame::Frame;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::path::Path;

/// Builds the standard decode command for a full sequential scan.
pub(crate) fn scan_command(input_path: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner()
        .input(input_path.to_string_lossy().as_ref())
        .arg("-an")
        .arg("-sn")
        .rawvideo();
    cmd
}

/// Decodes every frame of `input_path` sequentially, invoking `on_frame` for
/// each one in decode order.
///
/// A stream that yields no frames at all is a decode failure and is reported
/// as [`ShotscanError::Decode`]; a stream that dies after producing frames is
/// logged and treated as exhausted, so the caller keeps what was accumulated.
pub(crate) fn decode_frames<F>(input_path: &Path, on_frame: F) -> Result<u64>
where
    F: FnMut(Frame) -> Result<()>,
{
    log::debug!("Starting sequential decode of {}", input_path.display());
    run_frame_pipeline(scan_command(input_path), input_path, on_frame)
}

/// Spawns an ffmpeg command producing rawvideo rgb24 output and drives its
/// event stream, handing decoded frames to `on_frame`. Returns the number of
/// frames decoded.
pub(crate) fn run_frame_pipeline<F>(
    mut cmd: FfmpegCommand,
    input_path: &Path,
    mut on_frame: F,
) -> Result<u64>
where
    F: FnMut(Frame) -> Result<()>,
{
    let mut child = cmd.spawn().map_err(|e| {
        log::error!("Failed to spawn ffmpeg for {}: {}", input_path.display(), e);
        ShotscanError::CommandExecution(format!("failed to spawn ffmpeg: {e}"))
    })?;

    let events = match child.iter() {
        Ok(iter) => iter,
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ShotscanError::CommandExecution(format!(
                "failed to read ffmpeg output: {e}"
            )));
        }
    };

    let mut frames_decoded: u64 = 0;
    let mut last_error: Option<String> = None;
    let mut callback_result: Result<()> = Ok(());

    for event in events {
        match event {
            FfmpegEvent::OutputFrame(raw) => {
                frames_decoded += 1;
                let frame = Frame::new(raw.width, raw.height, raw.data);
                if let Err(e) = on_frame(frame) {
                    callback_result = Err(e);
                    let _ = child.kill();
                    break;
                }
            }
            FfmpegEvent::Error(line)
            | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) => {
                log::debug!("ffmpeg: {}", line);
                last_error = Some(line);
            }
            _ => {}
        }
    }

    // Always reap the child before returning, whatever happened above.
    let status = child.wait().map_err(|e| {
        ShotscanError::CommandExecution(format!("failed to wait for ffmpeg: {e}"))
    })?;

    callback_result?;

    if frames_decoded == 0 {
        let detail = last_error.unwrap_or_else(|| format!("ffmpeg exited with {status}"));
        log::error!(
            "No frames decodable from {}: {}",
            input_path.display(),
            detail
        );
        return Err(ShotscanError::Decode(format!(
            "no frames decodable from {}: {}",
            input_path.display(),
            detail
        )));
    }

    if !status.success() {
        // Partial decode: the stream died after producing frames. Keep what
        // was accumulated and let the caller see a truncated sequence.
        log::warn!(
            "ffmpeg exited with {} after {} frames from {}",
            status,
            frames_decoded,
            input_path.display()
        );
    }

    log::debug!(
        "Decoded {} frames from {}",
        frames_decoded,
        input_path.display()
    );
    Ok(frames_decoded)
}
