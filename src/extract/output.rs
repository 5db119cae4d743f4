// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Output path resolution.
//!
//! Topic names are sanitized into file names deterministically. Over the
//! set of channels selected for one run the mapping must be injective:
//! colliding names are disambiguated with the channel ID.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::io::metadata::ChannelInfo;

/// Replace path separators in a topic name with underscores.
fn sanitize_topic(topic: &str) -> String {
    topic.replace(['/', '\\'], "_")
}

/// Derive the output file path for a topic.
pub fn resolve_output_path(output_dir: &Path, topic: &str) -> PathBuf {
    output_dir.join(format!("{}.mp4", sanitize_topic(topic)))
}

/// Assign one output path per channel, disambiguating collisions.
///
/// Two distinct topics can sanitize to the same file name (they may
/// differ only in the replaced separator). The first channel keeps the
/// plain name; later ones get a `_<channel id>` suffix and a warning.
pub fn plan_output_paths<'a>(
    output_dir: &Path,
    channels: &[&'a ChannelInfo],
) -> Vec<(&'a ChannelInfo, PathBuf)> {
    let mut taken: HashSet<PathBuf> = HashSet::new();
    let mut plan = Vec::with_capacity(channels.len());

    for channel in channels {
        let mut path = resolve_output_path(output_dir, &channel.topic);
        if !taken.insert(path.clone()) {
            let disambiguated =
                output_dir.join(format!("{}_{}.mp4", sanitize_topic(&channel.topic), channel.id));
            warn!(
                topic = %channel.topic,
                collision = %path.display(),
                resolved = %disambiguated.display(),
                "output name collision, appending channel id"
            );
            path = disambiguated;
            taken.insert(path.clone());
        }
        plan.push((*channel, path));
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_replaces_separators() {
        let path = resolve_output_path(Path::new("/out"), "/camera/front");
        assert_eq!(path, PathBuf::from("/out/_camera_front.mp4"));
    }

    #[test]
    fn test_resolve_backslash() {
        let path = resolve_output_path(Path::new("out"), r"cam\rear");
        assert_eq!(path, PathBuf::from("out/cam_rear.mp4"));
    }

    #[test]
    fn test_plan_no_collision() {
        let a = ChannelInfo::new(0, "/cam/front", 1);
        let b = ChannelInfo::new(1, "/cam/rear", 1);
        let plan = plan_output_paths(Path::new("out"), &[&a, &b]);
        assert_eq!(plan[0].1, PathBuf::from("out/_cam_front.mp4"));
        assert_eq!(plan[1].1, PathBuf::from("out/_cam_rear.mp4"));
    }

    #[test]
    fn test_plan_collision_disambiguated_by_channel_id() {
        // These topics differ only in the replaced separator.
        let a = ChannelInfo::new(4, "/cam/front", 1);
        let b = ChannelInfo::new(7, "/cam_front", 1);
        let plan = plan_output_paths(Path::new("out"), &[&a, &b]);
        assert_eq!(plan[0].1, PathBuf::from("out/_cam_front.mp4"));
        assert_eq!(plan[1].1, PathBuf::from("out/_cam_front_7.mp4"));
    }

    #[test]
    fn test_plan_is_injective() {
        let a = ChannelInfo::new(1, "/a/b", 1);
        let b = ChannelInfo::new(2, "/a_b", 1);
        let c = ChannelInfo::new(3, "_a/b", 1);
        let plan = plan_output_paths(Path::new("out"), &[&a, &b, &c]);
        let unique: HashSet<_> = plan.iter().map(|(_, p)| p.clone()).collect();
        assert_eq!(unique.len(), 3);
    }
}
