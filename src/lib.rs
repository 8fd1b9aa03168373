//! Streams a local V4L2 camera as H.264 over RTP/UDP.
//!
//! The heavy lifting is done by a fixed GStreamer pipeline:
//! - `v4l2src` capture, constrained to 640x480 @ 30 fps
//! - `videoconvert` colour-space conversion
//! - `x264enc` low-latency H.264 encoding
//! - `rtph264pay` RTP packetization
//! - `udpsink` transmission to the configured host and port
//!
//! # Example
//!
//! ```no_run
//! use h264_udp_streamer::{streamer, GstFramework, StreamConfig};
//!
//! # async fn example() -> Result<(), h264_udp_streamer::StreamError> {
//! let config = StreamConfig::from_positional(Some("192.168.1.50".into()), None, None);
//! streamer::run(&config, GstFramework::init, async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod device;
pub mod framework;
pub mod pipeline;
pub mod profile;
pub mod streamer;

// Re-exports for convenience
pub use config::StreamConfig;
pub use framework::{GstFramework, MediaFramework};
pub use pipeline::{PipelineError, RunOutcome};
pub use profile::StreamProfile;
pub use streamer::StreamError;
