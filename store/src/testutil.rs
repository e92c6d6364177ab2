// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! Scratch-directory helpers for building synthetic `.meta`/`.dat` pairs in
//! tests, mirroring the on-disk layout spec.md §6 describes byte-for-byte.

use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::feed::FeedId;

/// Performs one-time test-global setup (logging). Call via `testutil::init()`
/// at the top of every test, matching `base::testutil::init`.
pub fn init() {
    base::testutil::init();
}

/// Writes `<data_dir>/<feed_id>.meta` and `<data_dir>/<feed_id>.dat` for a
/// feed with the given `interval`/`start_time` and sample values.
pub fn write_feed(data_dir: &Path, feed_id: FeedId, interval: u32, start_time: u32, samples: &[f32]) {
    let mut meta_bytes = Vec::with_capacity(16);
    meta_bytes.extend_from_slice(&[0u8; 8]);
    meta_bytes.write_u32::<LittleEndian>(interval).unwrap();
    meta_bytes.write_u32::<LittleEndian>(start_time).unwrap();
    std::fs::write(data_dir.join(format!("{}.meta", feed_id)), &meta_bytes).unwrap();

    let mut data_bytes = Vec::with_capacity(samples.len() * 4);
    for &v in samples {
        data_bytes.write_f32::<LittleEndian>(v).unwrap();
    }
    std::fs::write(data_dir.join(format!("{}.dat", feed_id)), &data_bytes).unwrap();
}
