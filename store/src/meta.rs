// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! The `.meta` sidecar: interval, start time, and the sample count/end time
//! derived from the sibling `.dat` file's length.

use std::io::{Read, Seek, SeekFrom};

use base::{bail, err, Config, Error};
use byteorder::{LittleEndian, ReadBytesExt};

use crate::feed::{self, FeedId};
use crate::validate::{self, FileKind};

/// The feed's temporal layout, parsed from `<id>.meta` and the length of
/// `<id>.dat`. Immutable once constructed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MetaHeader {
    pub interval: u32,
    pub start_time: u32,
    pub npoints: u64,
    pub end_time: u64,
}

/// `.meta` must contain at least this many bytes: 8 reserved bytes
/// followed by two little-endian `u32`s (interval, start_time).
const META_MIN_LEN: u64 = 16;

impl MetaHeader {
    /// Loads and validates the metadata for `feed_id` under `cfg.data_dir`.
    pub fn load(cfg: &Config, feed_id: FeedId) -> Result<Self, Error> {
        let meta_path = feed::meta_path(cfg, feed_id)?;
        let meta_len = validate::check_file_size(&meta_path, FileKind::Meta, cfg)?;
        if meta_len < META_MIN_LEN {
            bail!(
                CorruptMeta,
                msg("{} is {meta_len} bytes, shorter than the {META_MIN_LEN}-byte minimum", meta_path.display())
            );
        }

        let mut f = std::fs::File::open(&meta_path)
            .map_err(|e| err!(IoError, msg("unable to open {}", meta_path.display()), source(e)))?;
        f.seek(SeekFrom::Start(8))
            .map_err(|e| err!(CorruptMeta, msg("unable to seek into {}", meta_path.display()), source(e)))?;
        let interval = f
            .read_u32::<LittleEndian>()
            .map_err(|e| err!(CorruptMeta, msg("unable to read interval from {}", meta_path.display()), source(e)))?;
        let start_time = f
            .read_u32::<LittleEndian>()
            .map_err(|e| err!(CorruptMeta, msg("unable to read start_time from {}", meta_path.display()), source(e)))?;

        let data_path = feed::data_path(cfg, feed_id)?;
        let file_size = validate::check_file_size(&data_path, FileKind::Dat, cfg)?;
        let npoints = file_size / 4;

        let header = MetaHeader::new(interval, start_time, npoints)?;
        tracing::debug!(%feed_id, interval, start_time, npoints, "loaded meta header");
        Ok(header)
    }

    /// Constructs and validates a `MetaHeader` directly, without touching
    /// the filesystem. Exposed mainly for tests; [`MetaHeader::load`] is
    /// the normal entry point.
    pub fn new(interval: u32, start_time: u32, npoints: u64) -> Result<Self, Error> {
        if interval == 0 {
            bail!(InvalidArgument, msg("interval must be > 0"));
        }
        base::time::check_unix_timestamp("start_time", start_time)?;
        let end_time = if npoints > 0 {
            u64::from(start_time) + npoints * u64::from(interval) - u64::from(interval)
        } else {
            u64::from(start_time)
        };
        if u64::from(start_time) > end_time {
            bail!(InvalidArgument, msg("start_time {start_time} exceeds end_time {end_time}"));
        }
        Ok(MetaHeader {
            interval,
            start_time,
            npoints,
            end_time,
        })
    }
}
