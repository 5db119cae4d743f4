// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Error types for mcap2video.
//!
//! Every fallible operation in the crate returns [`Result`], whose error
//! type is [`ExtractError`]. Variants carry enough context (paths, topics,
//! counts) to diagnose a failure without extra logging at the call site.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced while cataloguing or extracting video channels.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The input MCAP file does not exist.
    #[error("input file not found: {path}")]
    NotFound {
        /// Path that was passed on the command line.
        path: PathBuf,
    },

    /// The requested topic does not exist in the file.
    #[error("topic not found: {topic}")]
    TopicNotFound {
        /// Topic name as requested.
        topic: String,
    },

    /// The requested topic exists but does not carry compressed video.
    #[error("topic {topic} is not a compressed-video channel (schema: {schema})")]
    NotVideoTopic {
        /// Topic name as requested.
        topic: String,
        /// Schema name the channel actually references.
        schema: String,
    },

    /// The container is unreadable or structurally corrupt.
    #[error("malformed MCAP container: {0}")]
    Format(String),

    /// A frame carried a codec tag the channel pipeline cannot accept,
    /// either because the tag is unsupported or because it differs from
    /// the codec the channel was locked to.
    #[error("codec mismatch on {topic}: expected {expected}, found '{found}'")]
    CodecMismatch {
        /// Topic the offending message belongs to.
        topic: String,
        /// Codec the pipeline expected.
        expected: String,
        /// Format tag carried by the message.
        found: String,
    },

    /// The channel had messages but none of them could be decoded.
    #[error("no frames could be decoded on {topic} ({messages} messages, {skipped} skipped)")]
    Extraction {
        /// Topic that was being extracted.
        topic: String,
        /// Messages seen on the channel.
        messages: u64,
        /// Messages skipped as undecodable.
        skipped: u64,
    },

    /// The channel has no messages at all; no output file is created.
    #[error("channel {topic} has no messages")]
    NoFrames {
        /// Topic that was being extracted.
        topic: String,
    },

    /// A CDR payload could not be decoded.
    #[error("CDR decode error: {0}")]
    Cdr(String),

    /// The muxer failed to produce the output container.
    #[error("muxing failed for {path}: {reason}")]
    Mux {
        /// Output path the muxer was writing.
        path: PathBuf,
        /// Upstream failure description.
        reason: String,
    },

    /// An I/O error while reading the input or writing an output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Create a "topic not found" error.
    pub fn topic_not_found(topic: impl Into<String>) -> Self {
        ExtractError::TopicNotFound {
            topic: topic.into(),
        }
    }

    /// Create a "not a video topic" error.
    pub fn not_video_topic(topic: impl Into<String>, schema: impl Into<String>) -> Self {
        ExtractError::NotVideoTopic {
            topic: topic.into(),
            schema: schema.into(),
        }
    }

    /// Create a container format error.
    pub fn format(message: impl Into<String>) -> Self {
        ExtractError::Format(message.into())
    }

    /// Create a codec mismatch error.
    pub fn codec_mismatch(
        topic: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        ExtractError::CodecMismatch {
            topic: topic.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a CDR decode error.
    pub fn cdr(message: impl Into<String>) -> Self {
        ExtractError::Cdr(message.into())
    }

    /// Create a CDR buffer underrun error.
    pub fn buffer_too_short(requested: usize, available: usize, position: usize) -> Self {
        ExtractError::Cdr(format!(
            "buffer too short: requested {requested} bytes at position {position}, \
             but only {available} bytes available"
        ))
    }

    /// Create a muxing error.
    pub fn mux(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        ExtractError::Mux {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }
}

impl From<mcap::McapError> for ExtractError {
    fn from(err: mcap::McapError) -> Self {
        ExtractError::Format(err.to_string())
    }
}

/// Result type for mcap2video operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
