// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Typed decoding of `foxglove.CompressedVideo` payloads.
//!
//! The message layout is fixed: a `timestamp {sec, nsec}` struct, a
//! `frame_id` string, the compressed frame bytes, and a `format` tag that
//! names the codec. Payloads are CDR-encapsulated.

use std::fmt;

use crate::core::Result;
use crate::encoding::cursor::CdrCursor;

/// Message timestamp, seconds plus nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Seconds since the Unix epoch.
    pub sec: u32,
    /// Nanosecond remainder.
    pub nsec: u32,
}

impl Timestamp {
    /// Total nanoseconds since the Unix epoch.
    pub fn as_nanos(&self) -> u64 {
        self.sec as u64 * 1_000_000_000 + self.nsec as u64
    }
}

/// One decoded `foxglove.CompressedVideo` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedVideo {
    /// Capture timestamp carried inside the message.
    pub timestamp: Timestamp,
    /// Coordinate frame of the camera.
    pub frame_id: String,
    /// One complete compressed access unit.
    pub data: Vec<u8>,
    /// Codec tag (e.g. "h264", "h265").
    pub format: String,
}

/// Decode a CDR-encapsulated `foxglove.CompressedVideo` payload.
pub fn decode_compressed_video(payload: &[u8]) -> Result<CompressedVideo> {
    let mut cursor = CdrCursor::new(payload)?;

    let timestamp = Timestamp {
        sec: cursor.read_u32()?,
        nsec: cursor.read_u32()?,
    };
    let frame_id = cursor.read_string()?;
    let data = cursor.read_byte_seq()?.to_vec();
    let format = cursor.read_string()?;

    Ok(CompressedVideo {
        timestamp,
        frame_id,
        data,
        format,
    })
}

/// Video codecs the extraction pipeline can demux.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    H264,
    H265,
}

impl VideoCodec {
    /// Parse the codec from a `foxglove.CompressedVideo` format tag.
    ///
    /// Matching is case-insensitive over the aliases seen in the wild.
    /// Returns `None` for tags the pipeline does not support.
    pub fn from_format_tag(format: &str) -> Option<Self> {
        match format.to_lowercase().as_str() {
            "h264" | "avc" | "h.264" => Some(VideoCodec::H264),
            "h265" | "hevc" | "h.265" => Some(VideoCodec::H265),
            _ => None,
        }
    }

    /// File extension for the temporary elementary-stream file, chosen so
    /// the demuxer recognizes the raw bitstream.
    pub fn elementary_extension(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "h264",
            VideoCodec::H265 => "h265",
        }
    }

    /// Canonical lowercase tag.
    pub fn tag(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "h264",
            VideoCodec::H265 => "h265",
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoCodec::H264 => write!(f, "H.264"),
            VideoCodec::H265 => write!(f, "H.265"),
        }
    }
}
