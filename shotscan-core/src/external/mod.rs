// ============================================================================
// shotscan-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates interactions with the external command-line tools
// that shotscan depends on. Frame decoding goes through ffmpeg-sidecar;
// stream metadata goes through the ffprobe crate. Everything else in the
// library is pure computation over the bytes these tools produce.

// ---- Internal crate imports ----
use crate::error::{Result, ShotscanError};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

/// Contains the raw frame decode loop built on ffmpeg-sidecar
pub mod decoder;

/// Contains ffprobe-backed stream metadata extraction
pub mod ffprobe_executor;

pub use ffprobe_executor::{VideoInfo, probe_video};

/// Checks if a required external command is available and executable.
///
/// Attempts to run the command with `-version` to verify it exists. Used to
/// check for ffmpeg and ffprobe before starting a scan so a missing binary
/// fails fast instead of mid-decode.
pub fn check_dependency(cmd_name: &str) -> Result<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                log::warn!("Dependency '{}' not found.", cmd_name);
                Err(ShotscanError::DependencyNotFound(cmd_name.to_string()))
            } else {
                log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
                Err(ShotscanError::CommandExecution(format!(
                    "failed to start '{}': {}",
                    cmd_name, e
                )))
            }
        }
    }
}
