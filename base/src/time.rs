// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! UNIX-timestamp validation and UTC day-boundary arithmetic.
//!
//! PhpFina feeds store UTC seconds-since-epoch throughout; day boundaries
//! are always UTC midnight (`t % 86400 == 0`), so unlike a local-time
//! calendar index there is no time zone to thread through here.

use crate::{err, Error};

pub const SECONDS_PER_DAY: u64 = 86_400;

/// The upper bound spec.md §3/§4.1 places on valid UNIX timestamps: just
/// below the point a 32-bit signed seconds-since-epoch value would roll
/// over.
pub const MAX_UNIX_TIMESTAMP: u32 = 2_147_480_000;

/// Validates that `v` is a UNIX timestamp spec.md accepts: non-negative
/// (trivially true for `u32`), at or below [`MAX_UNIX_TIMESTAMP`], and
/// convertible to a broken-down UTC date.
pub fn check_unix_timestamp(field: &'static str, v: u32) -> Result<(), Error> {
    if v > MAX_UNIX_TIMESTAMP {
        return Err(err!(
            InvalidArgument,
            msg("{field} must be a UNIX timestamp <= {MAX_UNIX_TIMESTAMP}, got {v}")
        ));
    }
    jiff::Timestamp::from_second(i64::from(v)).map_err(|e| {
        err!(
            InvalidArgument,
            msg("{field} ({v}) is not a valid UTC timestamp"),
            source(e)
        )
    })?;
    Ok(())
}

/// Returns the UTC midnight that begins the day containing `unix_seconds`.
pub fn start_of_utc_day(unix_seconds: u64) -> u64 {
    unix_seconds - (unix_seconds % SECONDS_PER_DAY)
}
