// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use mcap::records::MessageHeader;
use mcap::{Channel, Schema, Writer};

use mcap2video::COMPRESSED_VIDEO_SCHEMA;

/// Encode a little-endian CDR `foxglove.CompressedVideo` payload,
/// mirroring the layout the crate decodes.
pub fn encode_compressed_video(
    sec: u32,
    nsec: u32,
    frame_id: &str,
    data: &[u8],
    format: &str,
) -> Vec<u8> {
    let mut buf = vec![0x00, 0x01, 0x00, 0x00];

    fn align4(buf: &mut Vec<u8>) {
        while (buf.len() - 4) % 4 != 0 {
            buf.push(0);
        }
    }
    fn push_string(buf: &mut Vec<u8>, s: &str) {
        align4(buf);
        buf.extend_from_slice(&(s.len() as u32 + 1).to_le_bytes());
        buf.extend_from_slice(s.as_bytes());
        buf.push(0);
    }

    buf.extend_from_slice(&sec.to_le_bytes());
    buf.extend_from_slice(&nsec.to_le_bytes());
    push_string(&mut buf, frame_id);
    align4(&mut buf);
    buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
    buf.extend_from_slice(data);
    push_string(&mut buf, format);
    buf
}

/// A fake Annex B access unit. Not decodable video, but enough for the
/// demux and bookkeeping stages the tests exercise.
pub fn fake_access_unit(index: u8) -> Vec<u8> {
    vec![0x00, 0x00, 0x00, 0x01, 0x41, index]
}

/// A valid video payload carrying `format`, timestamped at `sec` seconds.
pub fn video_payload(sec: u32, format: &str) -> Vec<u8> {
    encode_compressed_video(sec, 0, "cam", &fake_access_unit(sec as u8), format)
}

/// A channel carrying `foxglove.CompressedVideo` messages.
pub fn video_channel(topic: &str) -> Channel<'static> {
    Channel {
        id: 0,
        topic: topic.to_string(),
        schema: Some(Arc::new(Schema {
            id: 0,
            name: COMPRESSED_VIDEO_SCHEMA.to_string(),
            encoding: "ros2msg".to_string(),
            data: Cow::Borrowed(b""),
        })),
        message_encoding: "cdr".to_string(),
        metadata: BTreeMap::new(),
    }
}

/// A channel with an arbitrary non-video schema.
pub fn channel_with_schema(topic: &str, schema_name: &str) -> Channel<'static> {
    Channel {
        id: 0,
        topic: topic.to_string(),
        schema: Some(Arc::new(Schema {
            id: 0,
            name: schema_name.to_string(),
            encoding: "ros2msg".to_string(),
            data: Cow::Borrowed(b""),
        })),
        message_encoding: "cdr".to_string(),
        metadata: BTreeMap::new(),
    }
}

/// Write an MCAP fixture: each entry is a channel plus its messages as
/// `(log_time, payload)` pairs, written in the order given.
pub fn write_mcap(path: &Path, channels: &[(Channel<'static>, Vec<(u64, Vec<u8>)>)]) {
    let file = File::create(path).expect("create fixture file");
    let mut writer = Writer::new(BufWriter::new(file)).expect("create mcap writer");

    for (channel, messages) in channels {
        let schema_id = match &channel.schema {
            Some(schema) => writer
                .add_schema(&schema.name, &schema.encoding, &schema.data)
                .expect("add schema"),
            None => 0,
        };
        let channel_id = writer
            .add_channel(
                schema_id,
                &channel.topic,
                &channel.message_encoding,
                &channel.metadata,
            )
            .expect("add channel");
        for (sequence, (log_time, payload)) in messages.iter().enumerate() {
            writer
                .write_to_known_channel(
                    &MessageHeader {
                        channel_id,
                        sequence: sequence as u32,
                        log_time: *log_time,
                        publish_time: *log_time,
                    },
                    payload,
                )
                .expect("write message");
        }
    }

    writer.finish().expect("finish mcap");
}

/// Names of the regular files currently present in a directory.
pub fn dir_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| {
            let entry = entry.expect("dir entry");
            entry
                .file_type()
                .expect("file type")
                .is_file()
                .then(|| entry.file_name().to_string_lossy().into_owned())
        })
        .collect();
    names.sort();
    names
}
