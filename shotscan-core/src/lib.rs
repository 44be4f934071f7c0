//! Core library for shot boundary detection in video files using ffmpeg and ffprobe.
//!
//! This crate decodes a video frame by frame, computes a perceptual color
//! signature for sampled frames, and emits a minimal set of representative
//! frames marking scene changes. Subtitle overlays are suppressed by cropping
//! the bottom band out of the signature, and rapid-fire cuts are debounced
//! with a minimum time gap.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use shotscan_core::{SegmenterConfig, detect_scene_boundaries_with_config};
//! use std::path::Path;
//!
//! let config = SegmenterConfig {
//!     threshold: 30.0,
//!     ..Default::default()
//! };
//! let boundaries = detect_scene_boundaries_with_config(
//!     Path::new("/path/to/input.mp4"),
//!     &config,
//! ).unwrap();
//! for boundary in &boundaries {
//!     println!("cut at {:.2}s", boundary.info.timestamp_secs);
//! }
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod frame;
pub mod sampler;
pub mod segmenter;

// Re-exports for public API
pub use config::SegmenterConfig;
pub use error::{Result, ShotscanError};
pub use external::{VideoInfo, probe_video};
pub use frame::Frame;
pub use sampler::frame_at_time;
pub use segmenter::{
    BoundaryInfo, ScanSummary, SceneBoundary, SceneSegmenter, detect_scene_boundaries,
    detect_scene_boundaries_with_config, scan_scene_boundaries,
};
