// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # mcap2video
//!
//! Extract `foxglove.CompressedVideo` channels from MCAP files into
//! playable MP4 videos.
//!
//! Container parsing is delegated to the [`mcap`] crate and muxing to
//! FFmpeg via `ffmpeg-next`; this crate supplies the channel catalog,
//! the schema filter, the CDR payload decoder, and the extraction
//! pipeline that ties them together.
//!
//! ## Example: listing video channels
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mcap2video::{map_mcap, ChannelCatalog};
//!
//! let mapped = map_mcap("drive.mcap")?;
//! let catalog = ChannelCatalog::scan(&mapped)?;
//! for channel in catalog.video_channels() {
//!     println!("{} ({} messages)", channel.topic, channel.message_count);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: extracting one channel
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use mcap2video::{extract_channel, map_mcap, resolve_output_path, ChannelCatalog};
//!
//! let mapped = map_mcap("drive.mcap")?;
//! let catalog = ChannelCatalog::scan(&mapped)?;
//! let output = resolve_output_path(Path::new("."), "/camera/front");
//! let report = extract_channel(&mapped, &catalog, "/camera/front", &output)?;
//! println!("{} frames written", report.frames_written);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{ExtractError, Result};

// CDR decoding of compressed-video payloads
pub mod encoding;

pub use encoding::{decode_compressed_video, CompressedVideo, Timestamp, VideoCodec};

// Memory-mapped input and the channel catalog
pub mod io;

pub use io::{map_mcap, ChannelCatalog, ChannelInfo, SchemaInfo, COMPRESSED_VIDEO_SCHEMA};

// Extraction pipeline
pub mod extract;

pub use extract::{
    extract_all, extract_channel, plan_output_paths, probe_codecs, resolve_output_path,
    ExtractionOutcome, JobReport,
};
