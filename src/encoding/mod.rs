// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR decoding for compressed-video payloads.

pub mod cursor;
pub mod video;

pub use cursor::CdrCursor;
pub use video::{decode_compressed_video, CompressedVideo, Timestamp, VideoCodec};
