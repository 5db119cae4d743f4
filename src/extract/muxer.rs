// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MP4 muxing of the assembled elementary stream.
//!
//! The bitstream is remuxed into an MP4 container by packet copy, no
//! re-encoding. The container is written to a `.part` path and renamed
//! into place only after the trailer is out, so an interrupted or failed
//! job never leaves a half-written file at the final path.

use std::fs;
use std::path::{Path, PathBuf};

use ffmpeg_next::{codec::Id, media::Type};
use tracing::debug;

use crate::core::{ExtractError, Result};

/// Frame rate assumed when message timestamps carry no usable spacing.
pub const FALLBACK_FPS: f64 = 30.0;

/// Estimate a constant frame rate from message timestamps (nanoseconds).
///
/// Falls back to [`FALLBACK_FPS`] when fewer than two timestamps exist or
/// the span is degenerate. The result is clamped to a sane range.
pub fn estimate_fps(timestamps: &[u64]) -> f64 {
    let (Some(first), Some(last)) = (timestamps.first(), timestamps.last()) else {
        return FALLBACK_FPS;
    };
    if timestamps.len() < 2 || last <= first {
        return FALLBACK_FPS;
    }
    let span = (last - first) as f64;
    let fps = (timestamps.len() - 1) as f64 * 1_000_000_000.0 / span;
    fps.clamp(1.0, 240.0)
}

/// Packet-copy muxer from a raw bitstream file into an MP4 container.
pub struct Mp4Muxer<'a> {
    source: &'a Path,
    dest: &'a Path,
    timestamps: &'a [u64],
}

impl<'a> Mp4Muxer<'a> {
    /// Create a muxer reading the elementary stream at `source` and
    /// producing the container at `dest`. `timestamps` are the publish
    /// times (nanoseconds) of the access units, in arrival order.
    pub fn new(source: &'a Path, dest: &'a Path, timestamps: &'a [u64]) -> Self {
        Self {
            source,
            dest,
            timestamps,
        }
    }

    /// Run the remux. Returns the number of frames written.
    pub fn run(&self) -> Result<u64> {
        ffmpeg_next::init().map_err(|e| self.mux_err(format!("FFmpeg init failed: {e}")))?;

        let packet_total = self.count_packets()?;
        if packet_total == 0 {
            return Err(self.mux_err("no access units found in elementary stream"));
        }

        let part = part_path(self.dest);
        match self.write_container(&part, packet_total) {
            Ok(written) => {
                fs::rename(&part, self.dest)?;
                Ok(written)
            }
            Err(err) => {
                let _ = fs::remove_file(&part);
                Err(err)
            }
        }
    }

    /// First pass: let the demuxer split the bitstream into access units
    /// so we know whether message timestamps can be applied one to one.
    fn count_packets(&self) -> Result<u64> {
        let mut input = ffmpeg_next::format::input(&self.source)
            .map_err(|e| self.mux_err(format!("failed to open elementary stream: {e}")))?;
        let stream_index = input
            .streams()
            .best(Type::Video)
            .ok_or_else(|| self.mux_err("no video stream in elementary stream"))?
            .index();

        let count = input
            .packets()
            .filter(|(stream, _)| stream.index() == stream_index)
            .count() as u64;
        Ok(count)
    }

    fn write_container(&self, part: &Path, packet_total: u64) -> Result<u64> {
        let mut input = ffmpeg_next::format::input(&self.source)
            .map_err(|e| self.mux_err(format!("failed to open elementary stream: {e}")))?;

        let (stream_index, parameters) = {
            let stream = input
                .streams()
                .best(Type::Video)
                .ok_or_else(|| self.mux_err("no video stream in elementary stream"))?;
            (stream.index(), stream.parameters())
        };

        let mut output = ffmpeg_next::format::output_as(&part, "mp4")
            .map_err(|e| self.mux_err(format!("failed to create output: {e}")))?;

        {
            let mut out_stream = output
                .add_stream(ffmpeg_next::encoder::find(Id::None))
                .map_err(|e| self.mux_err(e.to_string()))?;
            out_stream.set_parameters(parameters);
            out_stream.set_time_base(ffmpeg_next::Rational::new(1, 90_000));
            // Reset codec tag to let the muxer choose.
            unsafe {
                (*out_stream.parameters().as_mut_ptr()).codec_tag = 0;
            }
        }

        output
            .write_header()
            .map_err(|e| self.mux_err(format!("failed to write header: {e}")))?;

        // The muxer may replace the requested time base; read back the
        // real one before computing tick values.
        let time_base = output
            .stream(0)
            .ok_or_else(|| self.mux_err("output stream missing after header"))?
            .time_base();

        let timing = Timing::plan(self.timestamps, packet_total, time_base);
        debug!(
            packets = packet_total,
            frames = self.timestamps.len(),
            real_timestamps = matches!(timing, Timing::Explicit { .. }),
            "muxing elementary stream"
        );

        let mut written: u64 = 0;
        for (stream, mut packet) in input.packets() {
            if stream.index() != stream_index {
                continue;
            }
            let (pts, duration) = timing.at(written as usize);
            packet.set_stream(0);
            packet.set_pts(Some(pts));
            packet.set_dts(Some(pts));
            packet.set_duration(duration);
            packet.set_position(-1);
            packet
                .write_interleaved(&mut output)
                .map_err(|e| self.mux_err(format!("failed to write packet: {e}")))?;
            written += 1;
        }

        output
            .write_trailer()
            .map_err(|e| self.mux_err(format!("failed to finalize container: {e}")))?;

        Ok(written)
    }

    fn mux_err(&self, reason: impl Into<String>) -> ExtractError {
        ExtractError::mux(self.dest, reason)
    }
}

/// Temporary container path next to the final destination.
fn part_path(dest: &Path) -> PathBuf {
    dest.with_extension("mp4.part")
}

/// Frame timing in output time-base ticks.
enum Timing {
    /// One tick value per access unit, derived from message timestamps.
    Explicit { ticks: Vec<i64>, tail_duration: i64 },
    /// Constant frame rate, used when the demuxer's packet count does not
    /// line up with the decoded frame count.
    Constant { frame_duration: i64 },
}

impl Timing {
    fn plan(timestamps: &[u64], packet_total: u64, time_base: ffmpeg_next::Rational) -> Self {
        let fps = estimate_fps(timestamps);
        let ticks_per_second =
            time_base.denominator() as f64 / time_base.numerator().max(1) as f64;
        let frame_duration = ((ticks_per_second / fps).round() as i64).max(1);

        if packet_total as usize != timestamps.len() || timestamps.is_empty() {
            return Timing::Constant { frame_duration };
        }

        let base = timestamps[0];
        let mut ticks = Vec::with_capacity(timestamps.len());
        let mut prev: i64 = -1;
        for &ts in timestamps {
            let rel = ts.saturating_sub(base) as i128;
            let tick = (rel * time_base.denominator() as i128
                / (time_base.numerator().max(1) as i128 * 1_000_000_000))
                as i64;
            // Keep the track strictly monotonic even if two messages share
            // a publish time.
            let tick = tick.max(prev + 1);
            ticks.push(tick);
            prev = tick;
        }

        Timing::Explicit {
            ticks,
            tail_duration: frame_duration,
        }
    }

    fn at(&self, index: usize) -> (i64, i64) {
        match self {
            Timing::Constant { frame_duration } => {
                (index as i64 * frame_duration, *frame_duration)
            }
            Timing::Explicit {
                ticks,
                tail_duration,
            } => {
                let pts = ticks.get(index).copied().unwrap_or_else(|| {
                    ticks.last().copied().unwrap_or(0) + (index as i64) * tail_duration
                });
                let duration = match ticks.get(index + 1) {
                    Some(next) => (next - pts).max(1),
                    None => *tail_duration,
                };
                (pts, duration)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_fps_empty() {
        assert_eq!(estimate_fps(&[]), FALLBACK_FPS);
        assert_eq!(estimate_fps(&[1_000]), FALLBACK_FPS);
    }

    #[test]
    fn test_estimate_fps_degenerate_span() {
        assert_eq!(estimate_fps(&[5_000, 5_000, 5_000]), FALLBACK_FPS);
    }

    #[test]
    fn test_estimate_fps_30() {
        // 31 frames over exactly one second.
        let timestamps: Vec<u64> = (0..31).map(|i| i * 1_000_000_000 / 30).collect();
        let fps = estimate_fps(&timestamps);
        assert!((fps - 30.0).abs() < 0.5, "estimated {fps}");
    }

    #[test]
    fn test_estimate_fps_clamped() {
        // Two frames one nanosecond apart.
        assert_eq!(estimate_fps(&[0, 1]), 240.0);
    }

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("/out/_cam.mp4")),
            PathBuf::from("/out/_cam.mp4.part")
        );
    }

    #[test]
    fn test_timing_constant_when_counts_differ() {
        let tb = ffmpeg_next::Rational::new(1, 90_000);
        let timing = Timing::plan(&[0, 33_000_000], 5, tb);
        assert!(matches!(timing, Timing::Constant { .. }));
        let (pts0, dur0) = timing.at(0);
        let (pts1, _) = timing.at(1);
        assert_eq!(pts0, 0);
        assert_eq!(pts1, dur0);
    }

    #[test]
    fn test_timing_explicit_matches_timestamps() {
        let tb = ffmpeg_next::Rational::new(1, 90_000);
        // 30 fps spacing: 33.333ms is 3000 ticks at 90kHz.
        let timestamps = [1_000_000_000, 1_033_333_333, 1_066_666_666];
        let timing = Timing::plan(&timestamps, 3, tb);
        let (pts0, dur0) = timing.at(0);
        let (pts1, _) = timing.at(1);
        let (pts2, _) = timing.at(2);
        assert_eq!(pts0, 0);
        assert_eq!(pts1, 2999);
        assert_eq!(pts2, 5999);
        assert_eq!(dur0, pts1 - pts0);
    }

    #[test]
    fn test_timing_explicit_monotonic_on_duplicates() {
        let tb = ffmpeg_next::Rational::new(1, 90_000);
        let timestamps = [1_000, 1_000, 1_000];
        let timing = Timing::plan(&timestamps, 3, tb);
        let (pts0, _) = timing.at(0);
        let (pts1, _) = timing.at(1);
        let (pts2, _) = timing.at(2);
        assert!(pts0 < pts1 && pts1 < pts2);
    }
}
