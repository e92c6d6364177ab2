// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! Chunked, memory-mapped reads over a feed's `.dat` file (spec.md §4.3).
//!
//! [`ChunkReader::open`] mmaps the whole file once; [`ChunkReader::read`]
//! produces a fresh [`ChunkStream`] each time, scanning forward from
//! `start_pos` in caller-sized (floor-clamped) chunks. The stream is a
//! finite, single-pass, non-restartable iterator, never a generator with
//! hidden resumable state.

use std::fs::File;
use std::ops::Range;

use base::{bail, err, Config, Error};
use byteorder::{ByteOrder, LittleEndian};
use memmap2::{Mmap, MmapOptions};

use crate::feed::{self, FeedId};
use crate::validate::{self, FileKind};

/// An open, memory-mapped `.dat` file ready to be streamed in chunks.
pub struct ChunkReader {
    mmap: Mmap,
    npoints: u64,
    chunk_size_floor: usize,
}

impl ChunkReader {
    /// Opens and memory-maps `<data_dir>/<feed_id>.dat`. The mapping and the
    /// underlying file handle are held by `self` and released together when
    /// it is dropped.
    pub fn open(cfg: &Config, feed_id: FeedId) -> Result<Self, Error> {
        let data_path = feed::data_path(cfg, feed_id)?;
        let file_size = validate::check_file_size(&data_path, FileKind::Dat, cfg)?;
        let file = File::open(&data_path)
            .map_err(|e| err!(IoError, msg("unable to open {}", data_path.display()), source(e)))?;
        // SAFETY: the file is opened read-only for the lifetime of this
        // reader and never written to or truncated by this process.
        let mmap = unsafe { MmapOptions::new().map(&file) }
            .map_err(|e| err!(IoError, msg("unable to mmap {}", data_path.display()), source(e)))?;
        Ok(ChunkReader {
            mmap,
            npoints: file_size / 4,
            chunk_size_floor: cfg.chunk_size_floor,
        })
    }

    /// Number of whole samples backing this reader (`file_size / 4`).
    pub fn npoints(&self) -> u64 {
        self.npoints
    }

    /// Streams samples starting at `start_pos`, in chunks of at least
    /// `chunk_size_floor` samples, bounded by `window` (or the rest of the
    /// file if `None`).
    ///
    /// When `advance_position` is `false` the stream's internal cursor
    /// never moves past its first chunk; the consumer is responsible for
    /// stopping — this mirrors spec.md's cooperative, consumer-driven
    /// cancellation model rather than producing a bounded sequence.
    pub fn read(
        &self,
        start_pos: u64,
        chunk_size: usize,
        window: Option<u64>,
        advance_position: bool,
    ) -> Result<ChunkStream<'_>, Error> {
        if self.npoints == 0 {
            bail!(InvalidArgument, msg("feed has no samples"));
        }
        if chunk_size == 0 {
            bail!(InvalidArgument, msg("chunk_size must be positive"));
        }
        if start_pos >= self.npoints {
            bail!(
                InvalidArgument,
                msg("start_pos {start_pos} is out of range for {} points", self.npoints)
            );
        }
        if let Some(w) = window {
            if w == 0 {
                bail!(InvalidArgument, msg("window must be positive"));
            }
        }
        let effective_chunk_size = chunk_size.max(self.chunk_size_floor) as u64;
        let remaining = self.npoints - start_pos;
        let total = window.map(|w| w.min(remaining)).unwrap_or(remaining);
        Ok(ChunkStream {
            mmap: &self.mmap,
            position: start_pos,
            end: start_pos + total,
            chunk_size: effective_chunk_size,
            advance_position,
        })
    }
}

/// A finite, single-pass sequence of `(position_range, values)` chunks in
/// strictly ascending, non-overlapping position order.
pub struct ChunkStream<'a> {
    mmap: &'a Mmap,
    position: u64,
    end: u64,
    chunk_size: u64,
    advance_position: bool,
}

impl Iterator for ChunkStream<'_> {
    type Item = Result<(Range<u64>, Vec<f32>), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.end {
            return None;
        }
        let current = self.chunk_size.min(self.end - self.position);
        let byte_start = (self.position * 4) as usize;
        let byte_end = ((self.position + current) * 4) as usize;
        let Some(bytes) = self.mmap.get(byte_start..byte_end) else {
            return Some(Err(err!(
                CorruptData,
                msg("short read: wanted bytes [{byte_start}..{byte_end}), file is {} bytes", self.mmap.len())
            )));
        };
        let mut values = Vec::with_capacity(current as usize);
        for sample in bytes.chunks_exact(4) {
            values.push(LittleEndian::read_f32(sample));
        }
        let range = self.position..self.position + current;
        if self.advance_position {
            self.position += current;
        }
        Some(Ok((range, values)))
    }
}
