// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer: memory-mapped file access and the channel catalog.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

pub mod catalog;
pub mod metadata;

pub use catalog::{ChannelCatalog, COMPRESSED_VIDEO_SCHEMA};
pub use metadata::{ChannelInfo, SchemaInfo};

use crate::core::{ExtractError, Result};

/// Memory-map an MCAP file for reading.
///
/// A missing file maps to [`ExtractError::NotFound`]; other open or map
/// failures surface as I/O errors.
pub fn map_mcap<P: AsRef<Path>>(path: P) -> Result<Mmap> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExtractError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ExtractError::Io(e)
        }
    })?;
    let mapped = unsafe { Mmap::map(&file) }?;
    Ok(mapped)
}
