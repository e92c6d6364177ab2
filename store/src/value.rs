// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! Translates `(start_time, step, window)` requests into resampled sample
//! arrays (spec.md §4.4).
//!
//! Identity (`step == interval`) and block-mean (`step == k·interval`)
//! resampling share one accumulation pass: every output cell is the
//! ignore-missing mean of the input positions that fall into it, which for
//! `k == 1` is just the single input value. Positions before
//! `meta.start_time` or at/after `meta.npoints` never reach the
//! accumulator, so they fall out as the missing sentinel without a
//! separate padding branch.

use base::{bail, Config, Error};

use crate::chunk::ChunkReader;
use crate::feed::FeedId;
use crate::meta::MetaHeader;
use crate::MISSING;

/// Reads and resamples `window` seconds starting at `start_time`, in steps
/// of `step` seconds, returning `window / step` values. Positions outside
/// `[meta.start_time, meta.end_time]` are the missing sentinel.
pub fn read_values(
    cfg: &Config,
    feed_id: FeedId,
    meta: &MetaHeader,
    start_time: u64,
    step: u32,
    window: u64,
) -> Result<Vec<f32>, Error> {
    if start_time >= meta.end_time {
        bail!(
            OutOfRange,
            msg("start_time {start_time} is not before end_time {}", meta.end_time)
        );
    }
    if step == 0 || step % meta.interval != 0 {
        bail!(
            InvalidArgument,
            msg("step {step} must be a positive multiple of interval {}", meta.interval)
        );
    }
    if window == 0 {
        bail!(InvalidArgument, msg("window must be positive"));
    }

    let step_factor = u64::from(step / meta.interval);
    let n_out = (window / u64::from(step)) as usize;
    let mut output = vec![MISSING; n_out];
    if meta.npoints == 0 {
        return Ok(output);
    }

    // Signed so a start_time before meta.start_time yields a negative
    // pos0 rather than needing a separate "request starts early" branch.
    let pos0 = (start_time as i64 - i64::from(meta.start_time)) / i64::from(meta.interval);
    let total_in = n_out as i64 * step_factor as i64;
    let clipped_start = pos0.max(0);
    let clipped_end = (pos0 + total_in).min(meta.npoints as i64);
    if clipped_start >= clipped_end {
        return Ok(output);
    }

    let reader = ChunkReader::open(cfg, feed_id)?;
    let stream = reader.read(
        clipped_start as u64,
        cfg.chunk_size_floor,
        Some((clipped_end - clipped_start) as u64),
        true,
    )?;

    let mut sums = vec![0f64; n_out];
    let mut counts = vec![0u32; n_out];
    for chunk in stream {
        let (range, values) = chunk?;
        for (pos, &v) in range.zip(values.iter()) {
            let rel = pos as i64 - pos0;
            let out_idx = (rel / step_factor as i64) as usize;
            if out_idx >= n_out {
                continue;
            }
            if v.is_finite() {
                sums[out_idx] += f64::from(v);
                counts[out_idx] += 1;
            }
        }
    }
    for i in 0..n_out {
        if counts[i] > 0 {
            output[i] = (sums[i] / f64::from(counts[i])) as f32;
        }
    }
    Ok(output)
}

/// Like [`read_values`], but pairs each output value with its step-aligned
/// UNIX timestamp.
pub fn read_series(
    cfg: &Config,
    feed_id: FeedId,
    meta: &MetaHeader,
    start_time: u64,
    step: u32,
    window: u64,
) -> Result<Vec<(u64, f32)>, Error> {
    let values = read_values(cfg, feed_id, meta, start_time, step, window)?;
    Ok(values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (start_time + i as u64 * u64::from(step), v))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use crate::testutil::write_feed;

    fn setup(interval: u32, start_time: u32, samples: &[f32]) -> (tempfile::TempDir, Config, FeedId, MetaHeader) {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Config::new(tmp.path());
        let feed_id = FeedId::new(1).unwrap();
        write_feed(tmp.path(), feed_id, interval, start_time, samples);
        let meta = MetaHeader::load(&cfg, feed_id).unwrap();
        (tmp, cfg, feed_id, meta)
    }

    #[test]
    fn s2_identity_resampling() {
        testutil::init();
        let samples = vec![42.0f32; 10];
        let (_tmp, cfg, feed_id, meta) = setup(10, 1000, &samples);
        let out = read_values(&cfg, feed_id, &meta, 1000, 10, 100).unwrap();
        assert_eq!(out, vec![42.0; 10]);
    }

    #[test]
    fn s3_block_mean_resampling() {
        testutil::init();
        let samples = vec![42.0f32; 10];
        let (_tmp, cfg, feed_id, meta) = setup(10, 1000, &samples);
        let out = read_values(&cfg, feed_id, &meta, 1000, 20, 100).unwrap();
        assert_eq!(out, vec![42.0; 5]);
    }

    #[test]
    fn s4_pads_leading_region_with_missing() {
        testutil::init();
        let samples = vec![42.0f32; 10];
        let (_tmp, cfg, feed_id, meta) = setup(10, 1000, &samples);
        let out = read_values(&cfg, feed_id, &meta, 970, 10, 60).unwrap();
        assert_eq!(out.len(), 6);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert_eq!(out[3], 42.0);
        assert_eq!(out[4], 42.0);
        assert_eq!(out[5], 42.0);
    }

    #[test]
    fn s6_rejects_start_time_past_end() {
        testutil::init();
        let samples = vec![42.0f32; 10];
        let (_tmp, cfg, feed_id, meta) = setup(10, 1000, &samples);
        let e = read_values(&cfg, feed_id, &meta, meta.end_time, 10, 10).unwrap_err();
        assert_eq!(e.kind(), base::ErrorKind::OutOfRange);
    }

    #[test]
    fn mean_ignores_missing_within_a_block() {
        testutil::init();
        let samples = vec![10.0f32, f32::NAN, f32::NAN, f32::NAN];
        let (_tmp, cfg, feed_id, meta) = setup(10, 1000, &samples);
        // step_factor 2: block 0 = [10.0, NaN] -> mean 10.0; block 1 = [NaN, NaN] -> missing.
        let out = read_values(&cfg, feed_id, &meta, 1000, 20, 40).unwrap();
        assert_eq!(out[0], 10.0);
        assert!(out[1].is_nan());
    }

    #[test]
    fn read_series_pairs_timestamps() {
        testutil::init();
        let samples = vec![1.0f32, 2.0, 3.0];
        let (_tmp, cfg, feed_id, meta) = setup(10, 1000, &samples);
        let series = read_series(&cfg, feed_id, &meta, 1000, 10, 30).unwrap();
        assert_eq!(series, vec![(1000, 1.0), (1010, 2.0), (1020, 3.0)]);
    }
}
