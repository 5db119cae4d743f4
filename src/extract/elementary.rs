// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Temporary elementary-stream assembly.
//!
//! Decoded access units are appended, in arrival order, to a raw
//! Annex B bitstream file next to the final output path. The file is a
//! scratch artifact: it is removed when the stream is dropped, whether
//! the job succeeded or died early.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::Result;
use crate::encoding::VideoCodec;

/// Write-side of the temporary elementary stream for one channel.
pub struct ElementaryStream {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    codec: VideoCodec,
    frames: u64,
    timestamps: Vec<u64>,
}

impl ElementaryStream {
    /// Create the scratch bitstream file next to `output_path`.
    ///
    /// The extension matches the codec so the demuxer recognizes the raw
    /// stream. Creation fails if the output directory is not writable.
    pub fn create_for(output_path: &Path, codec: VideoCodec) -> Result<Self> {
        let path = output_path.with_extension(format!("part.{}", codec.elementary_extension()));
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            codec,
            frames: 0,
            timestamps: Vec::new(),
        })
    }

    /// Append one access unit and its publish timestamp (nanoseconds).
    pub fn append(&mut self, access_unit: &[u8], publish_time: u64) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(access_unit)?;
        }
        self.frames += 1;
        self.timestamps.push(publish_time);
        Ok(())
    }

    /// Flush and close the underlying file. The file stays on disk until
    /// the stream is dropped.
    pub fn finish(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Path of the scratch bitstream file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Codec the stream is locked to.
    pub fn codec(&self) -> VideoCodec {
        self.codec
    }

    /// Number of access units appended so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Publish timestamps collected alongside the access units.
    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }
}

impl Drop for ElementaryStream {
    fn drop(&mut self) {
        self.writer.take();
        let _ = fs::remove_file(&self.path);
    }
}
