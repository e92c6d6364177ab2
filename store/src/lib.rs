// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! Storage engine for the PhpFina fixed-interval time-series format used by
//! EmonCMS feeds: a metadata reader, a chunked memory-mapped data reader, a
//! value reader/resampler, and a daily-statistics engine. Read-only; there
//! is no write path.

pub mod chunk;
pub mod feed;
pub mod meta;
pub mod stats;
#[cfg(test)]
pub mod testutil;
pub mod validate;
pub mod value;

pub use base::{Error, ErrorKind};
pub use chunk::ChunkReader;
pub use feed::FeedId;
pub use meta::MetaHeader;
pub use stats::{DailyStats, DayRow, StatsKind, StepsWindow};
pub use value::{read_series, read_values};

/// The missing-value sentinel: IEEE-754 NaN. Any NaN bit pattern found in a
/// `.dat` file, or produced by resampling/padding, represents "no value".
pub const MISSING: f32 = f32::NAN;
