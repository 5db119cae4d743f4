// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Extraction pipeline: demux one compressed-video channel into an MP4.
//!
//! Jobs run sequentially to completion; each job is independent. A job
//! assembles the channel's access units into a temporary elementary
//! stream, then remuxes it into the final container. No output file
//! exists at the final path until the job has fully succeeded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use mcap::MessageStream;
use tracing::{info, warn};

pub mod elementary;
pub mod muxer;
pub mod output;

pub use elementary::ElementaryStream;
pub use muxer::{estimate_fps, Mp4Muxer, FALLBACK_FPS};
pub use output::{plan_output_paths, resolve_output_path};

use crate::core::{ExtractError, Result};
use crate::encoding::{decode_compressed_video, VideoCodec};
use crate::io::catalog::ChannelCatalog;

/// Outcome of one successful extraction job.
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Topic that was extracted.
    pub topic: String,
    /// Final output path.
    pub output_path: PathBuf,
    /// Frames written into the container.
    pub frames_written: u64,
    /// Messages seen on the channel.
    pub messages_seen: u64,
    /// Messages skipped as undecodable.
    pub messages_skipped: u64,
}

/// Outcome of an "all topics" run.
#[derive(Debug)]
pub struct ExtractionOutcome {
    /// Reports for the jobs that succeeded.
    pub reports: Vec<JobReport>,
    /// Topic and error for each job that failed.
    pub failures: Vec<(String, ExtractError)>,
}

impl ExtractionOutcome {
    /// Whether every job succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Extract one channel into `output_path`.
///
/// The topic must exist and carry `foxglove.CompressedVideo` messages.
/// Messages are consumed in file order. A payload that fails to decode
/// is skipped with a warning; a codec change mid-stream aborts the job.
pub fn extract_channel(
    mapped: &[u8],
    catalog: &ChannelCatalog,
    topic: &str,
    output_path: &Path,
) -> Result<JobReport> {
    let channel = catalog
        .channel_by_topic(topic)
        .ok_or_else(|| ExtractError::topic_not_found(topic))?;
    if !catalog.is_video_channel(channel) {
        let schema = catalog.schema_name(channel).unwrap_or("<none>").to_string();
        return Err(ExtractError::not_video_topic(topic, schema));
    }
    if channel.message_count == 0 {
        return Err(ExtractError::NoFrames {
            topic: topic.to_string(),
        });
    }

    let mut messages_seen: u64 = 0;
    let mut messages_skipped: u64 = 0;
    let mut locked_codec: Option<VideoCodec> = None;
    let mut stream: Option<ElementaryStream> = None;

    for message in MessageStream::new(mapped)? {
        let message = message?;
        if message.channel.topic != topic {
            continue;
        }
        messages_seen += 1;

        let video = match decode_compressed_video(&message.data) {
            Ok(video) => video,
            Err(err) => {
                warn!(
                    topic,
                    sequence = message.sequence,
                    log_time = message.log_time,
                    %err,
                    "skipping undecodable message"
                );
                messages_skipped += 1;
                continue;
            }
        };

        let frame_codec = match VideoCodec::from_format_tag(&video.format) {
            Some(codec) => codec,
            None => {
                let expected = match locked_codec {
                    Some(codec) => codec.tag().to_string(),
                    None => "h264 or h265".to_string(),
                };
                return Err(ExtractError::codec_mismatch(topic, expected, &video.format));
            }
        };
        match locked_codec {
            None => locked_codec = Some(frame_codec),
            Some(locked) if locked != frame_codec => {
                return Err(ExtractError::codec_mismatch(
                    topic,
                    locked.tag(),
                    &video.format,
                ));
            }
            Some(_) => {}
        }

        // The scratch file is only created once the first frame decodes,
        // so failed jobs leave nothing behind.
        if stream.is_none() {
            stream = Some(ElementaryStream::create_for(output_path, frame_codec)?);
        }
        if let Some(stream) = stream.as_mut() {
            stream.append(&video.data, message.publish_time)?;
        }
    }

    if messages_seen == 0 {
        return Err(ExtractError::NoFrames {
            topic: topic.to_string(),
        });
    }
    let Some(mut stream) = stream else {
        return Err(ExtractError::Extraction {
            topic: topic.to_string(),
            messages: messages_seen,
            skipped: messages_skipped,
        });
    };
    stream.finish()?;

    let frames_written =
        Mp4Muxer::new(stream.path(), output_path, stream.timestamps()).run()?;
    // Dropping the stream removes the scratch bitstream file.
    drop(stream);

    info!(
        topic,
        output = %output_path.display(),
        frames = frames_written,
        skipped = messages_skipped,
        "extraction complete"
    );

    Ok(JobReport {
        topic: topic.to_string(),
        output_path: output_path.to_path_buf(),
        frames_written,
        messages_seen,
        messages_skipped,
    })
}

/// Extract every compressed-video channel into `output_dir`.
///
/// Jobs run sequentially; a failed job is recorded and the run continues
/// with the next channel.
pub fn extract_all(
    mapped: &[u8],
    catalog: &ChannelCatalog,
    output_dir: &Path,
) -> ExtractionOutcome {
    let channels = catalog.video_channels();
    let plan = plan_output_paths(output_dir, &channels);

    let mut reports = Vec::new();
    let mut failures = Vec::new();

    for (channel, path) in plan {
        match extract_channel(mapped, catalog, &channel.topic, &path) {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!(topic = %channel.topic, %err, "extraction failed");
                failures.push((channel.topic.clone(), err));
            }
        }
    }

    ExtractionOutcome { reports, failures }
}

/// Probe the codec tag of each compressed-video channel.
///
/// One pass over the file, stopping as soon as every channel in `topics`
/// has yielded a decodable message. Channels whose messages never decode
/// are absent from the result.
pub fn probe_codecs(mapped: &[u8], topics: &[&str]) -> Result<HashMap<String, VideoCodec>> {
    let mut found: HashMap<String, VideoCodec> = HashMap::new();

    for message in MessageStream::new(mapped)? {
        let message = message?;
        let topic = message.channel.topic.as_str();
        if !topics.contains(&topic) || found.contains_key(topic) {
            continue;
        }
        let Ok(video) = decode_compressed_video(&message.data) else {
            continue;
        };
        if let Some(codec) = VideoCodec::from_format_tag(&video.format) {
            found.insert(topic.to_string(), codec);
            if found.len() == topics.len() {
                break;
            }
        }
    }

    Ok(found)
}
