// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Channel catalog builder and schema filter.
//!
//! The catalog is built in exactly one linear pass over the file's
//! records (chunk contents flattened). Message payloads are never
//! interpreted here; only channel, schema, and message-header records
//! contribute.

use std::collections::HashMap;

use mcap::read::ChunkFlattener;
use mcap::records::Record;
use tracing::{debug, warn};

use crate::core::Result;
use crate::io::metadata::{ChannelInfo, SchemaInfo};

/// Schema name identifying compressed-video channels.
pub const COMPRESSED_VIDEO_SCHEMA: &str = "foxglove.CompressedVideo";

/// Channel and schema metadata for one MCAP file.
#[derive(Debug)]
pub struct ChannelCatalog {
    channels: HashMap<u16, ChannelInfo>,
    schemas: HashMap<u16, SchemaInfo>,
}

impl ChannelCatalog {
    /// Build the catalog from a memory-mapped MCAP file.
    ///
    /// Channel records that repeat (the summary section duplicates the
    /// data section's channel and schema records) are recorded once; the
    /// first occurrence wins. A file with no channels yields an empty
    /// catalog, which is not an error.
    pub fn scan(mapped: &[u8]) -> Result<Self> {
        let mut channels: HashMap<u16, ChannelInfo> = HashMap::new();
        let mut schemas: HashMap<u16, SchemaInfo> = HashMap::new();

        for record in ChunkFlattener::new(mapped)? {
            match record? {
                Record::Schema { header, data: _ } => {
                    schemas
                        .entry(header.id)
                        .or_insert_with(|| SchemaInfo::new(header.id, header.name, header.encoding));
                }
                Record::Channel(chan) => {
                    channels
                        .entry(chan.id)
                        .or_insert_with(|| ChannelInfo::new(chan.id, chan.topic, chan.schema_id));
                }
                Record::Message { header, data: _ } => {
                    match channels.get_mut(&header.channel_id) {
                        Some(channel) => channel.record_message(header.log_time),
                        None => warn!(
                            channel_id = header.channel_id,
                            sequence = header.sequence,
                            "message references an unknown channel"
                        ),
                    }
                }
                _ => {}
            }
        }

        debug!(
            channels = channels.len(),
            schemas = schemas.len(),
            "catalog scan complete"
        );

        Ok(Self { channels, schemas })
    }

    /// All channels, indexed by channel ID.
    pub fn channels(&self) -> &HashMap<u16, ChannelInfo> {
        &self.channels
    }

    /// All schemas, indexed by schema ID.
    pub fn schemas(&self) -> &HashMap<u16, SchemaInfo> {
        &self.schemas
    }

    /// Look up a channel by topic name.
    pub fn channel_by_topic(&self, topic: &str) -> Option<&ChannelInfo> {
        self.channels.values().find(|c| c.topic == topic)
    }

    /// Name of the schema a channel references, if the schema record was
    /// present in the file.
    pub fn schema_name(&self, channel: &ChannelInfo) -> Option<&str> {
        self.schemas
            .get(&channel.schema_id)
            .map(|s| s.name.as_str())
    }

    /// Whether a channel carries `foxglove.CompressedVideo` messages.
    ///
    /// The comparison is exact and case-sensitive.
    pub fn is_video_channel(&self, channel: &ChannelInfo) -> bool {
        self.schema_name(channel) == Some(COMPRESSED_VIDEO_SCHEMA)
    }

    /// All compressed-video channels, sorted by topic name ascending.
    pub fn video_channels(&self) -> Vec<&ChannelInfo> {
        let mut selected: Vec<&ChannelInfo> = self
            .channels
            .values()
            .filter(|c| self.is_video_channel(c))
            .collect();
        selected.sort_by(|a, b| a.topic.cmp(&b.topic));
        selected
    }
}
