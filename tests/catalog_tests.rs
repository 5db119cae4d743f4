// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tests for the channel catalog and schema filter.
//!
//! Run with: cargo test --test catalog_tests

mod common;

use std::collections::HashSet;

use common::{channel_with_schema, video_channel, video_payload, write_mcap};
use mcap2video::{map_mcap, ChannelCatalog, ExtractError};

#[test]
fn test_catalog_counts_distinct_channels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.mcap");
    write_mcap(
        &path,
        &[
            (
                video_channel("/camera/front"),
                vec![
                    (1_000_000_000, video_payload(1, "h264")),
                    (2_000_000_000, video_payload(2, "h264")),
                ],
            ),
            (
                channel_with_schema("/imu", "sensor_msgs/msg/Imu"),
                vec![(1_500_000_000, vec![1, 2, 3])],
            ),
            (
                video_channel("/camera/rear"),
                vec![(3_000_000_000, video_payload(3, "h265"))],
            ),
        ],
    );

    let mapped = map_mcap(&path).unwrap();
    let catalog = ChannelCatalog::scan(&mapped).unwrap();

    assert_eq!(catalog.channels().len(), 3);

    let topics: HashSet<&str> = catalog
        .channels()
        .values()
        .map(|c| c.topic.as_str())
        .collect();
    assert_eq!(topics.len(), 3, "topics must be unique");
}

#[test]
fn test_catalog_message_stats() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.mcap");
    write_mcap(
        &path,
        &[(
            video_channel("/cam"),
            vec![
                (1_000_000_000, video_payload(1, "h264")),
                (2_000_000_000, video_payload(2, "h264")),
                (4_000_000_000, video_payload(4, "h264")),
            ],
        )],
    );

    let mapped = map_mcap(&path).unwrap();
    let catalog = ChannelCatalog::scan(&mapped).unwrap();

    let channel = catalog.channel_by_topic("/cam").unwrap();
    assert_eq!(channel.message_count, 3);
    assert_eq!(channel.start_time, Some(1_000_000_000));
    assert_eq!(channel.end_time, Some(4_000_000_000));
    assert_eq!(channel.duration(), 3_000_000_000);
}

#[test]
fn test_filter_selects_exactly_video_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filter.mcap");
    write_mcap(
        &path,
        &[
            (video_channel("/b_cam"), vec![(1, video_payload(1, "h264"))]),
            (
                channel_with_schema("/imu", "sensor_msgs/msg/Imu"),
                vec![(1, vec![0])],
            ),
            // Case differs: must not match.
            (
                channel_with_schema("/fake", "foxglove.compressedvideo"),
                vec![(1, vec![0])],
            ),
            (video_channel("/a_cam"), vec![(2, video_payload(2, "h264"))]),
        ],
    );

    let mapped = map_mcap(&path).unwrap();
    let catalog = ChannelCatalog::scan(&mapped).unwrap();

    let topics: Vec<&str> = catalog
        .video_channels()
        .iter()
        .map(|c| c.topic.as_str())
        .collect();
    assert_eq!(topics, vec!["/a_cam", "/b_cam"], "sorted, video only");
}

#[test]
fn test_zero_message_channel_is_catalogued() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty_channel.mcap");
    write_mcap(
        &path,
        &[
            (video_channel("/silent"), vec![]),
            (video_channel("/busy"), vec![(1, video_payload(1, "h264"))]),
        ],
    );

    let mapped = map_mcap(&path).unwrap();
    let catalog = ChannelCatalog::scan(&mapped).unwrap();

    let silent = catalog.channel_by_topic("/silent").unwrap();
    assert_eq!(silent.message_count, 0);
    assert_eq!(silent.start_time, None);
    assert!(catalog.is_video_channel(silent));
    assert_eq!(catalog.video_channels().len(), 2);
}

#[test]
fn test_empty_file_yields_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.mcap");
    write_mcap(&path, &[]);

    let mapped = map_mcap(&path).unwrap();
    let catalog = ChannelCatalog::scan(&mapped).unwrap();

    assert!(catalog.channels().is_empty());
    assert!(catalog.video_channels().is_empty());
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = map_mcap(dir.path().join("nope.mcap")).unwrap_err();
    assert!(matches!(err, ExtractError::NotFound { .. }));
}

#[test]
fn test_corrupt_container_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.mcap");
    std::fs::write(&path, b"this is not an mcap file at all").unwrap();

    let mapped = map_mcap(&path).unwrap();
    let err = ChannelCatalog::scan(&mapped).unwrap_err();
    assert!(matches!(err, ExtractError::Format(_)));
}

#[test]
fn test_schema_map_exposed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schemas.mcap");
    write_mcap(
        &path,
        &[
            (video_channel("/cam"), vec![(1, video_payload(1, "h264"))]),
            (
                channel_with_schema("/imu", "sensor_msgs/msg/Imu"),
                vec![(1, vec![0])],
            ),
        ],
    );

    let mapped = map_mcap(&path).unwrap();
    let catalog = ChannelCatalog::scan(&mapped).unwrap();

    let names: HashSet<&str> = catalog
        .schemas()
        .values()
        .map(|s| s.name.as_str())
        .collect();
    assert!(names.contains("foxglove.CompressedVideo"));
    assert!(names.contains("sensor_msgs/msg/Imu"));

    let channel = catalog.channel_by_topic("/cam").unwrap();
    assert_eq!(catalog.schema_name(channel), Some("foxglove.CompressedVideo"));
}
