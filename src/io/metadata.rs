// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Catalog metadata types.
//!
//! These types describe the channels and schemas of one MCAP file. They
//! are built once during the catalog scan and immutable afterwards.

/// Information about a channel in an MCAP file.
///
/// A channel (a "topic" in ROS terminology) is a named stream of messages
/// referencing one schema. Topic names are unique within a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Unique channel ID within the file
    pub id: u16,
    /// Topic name (e.g., "/camera/front/compressed_video")
    pub topic: String,
    /// ID of the schema this channel references
    pub schema_id: u16,
    /// Number of messages observed on this channel
    pub message_count: u64,
    /// Log time of the first message (nanoseconds), if any
    pub start_time: Option<u64>,
    /// Log time of the last message (nanoseconds), if any
    pub end_time: Option<u64>,
}

impl ChannelInfo {
    /// Create a new ChannelInfo with no messages recorded yet.
    pub fn new(id: u16, topic: impl Into<String>, schema_id: u16) -> Self {
        Self {
            id,
            topic: topic.into(),
            schema_id,
            message_count: 0,
            start_time: None,
            end_time: None,
        }
    }

    /// Set the message count.
    pub fn with_message_count(mut self, count: u64) -> Self {
        self.message_count = count;
        self
    }

    /// Fold one message header into the channel statistics.
    pub fn record_message(&mut self, log_time: u64) {
        self.message_count += 1;
        if self.start_time.is_none() {
            self.start_time = Some(log_time);
        }
        self.end_time = Some(match self.end_time {
            Some(end) => end.max(log_time),
            None => log_time,
        });
    }

    /// Time span covered by this channel's messages, in nanoseconds.
    ///
    /// Returns 0 for empty channels.
    pub fn duration(&self) -> u64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end > start => end - start,
            _ => 0,
        }
    }
}

/// Information about a schema in an MCAP file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaInfo {
    /// Unique schema ID within the file
    pub id: u16,
    /// Schema name (e.g., "foxglove.CompressedVideo")
    pub name: String,
    /// Schema encoding (e.g., "ros2msg")
    pub encoding: String,
}

impl SchemaInfo {
    /// Create a new SchemaInfo.
    pub fn new(id: u16, name: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            encoding: encoding.into(),
        }
    }
}
