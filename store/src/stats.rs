// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! Per-day aggregation over a bounded sample range (spec.md §4.5).
//!
//! One formula governs both the first (possibly partial) day's chunk
//! length and every subsequent full day's: `(next_day - sample_time) /
//! interval`, where `sample_time` is the timestamp of the position the
//! day's read starts at. For a full day that position sits exactly on a
//! day boundary, so the formula collapses to `86400 / interval` on its
//! own; no special case is needed for "first day vs. later days".

use base::{bail, Config, Error};

use crate::chunk::ChunkReader;
use crate::feed::FeedId;
use crate::meta::MetaHeader;
use crate::MISSING;

/// Which aggregate [`DailyStats::compute`] emits per day.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StatsKind {
    Values,
    Integrity,
}

/// How many steps (samples) of the feed to cover, starting from
/// `start_time`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum StepsWindow {
    /// Every sample from `start_time` to the end of the feed.
    All,
    Count(u64),
}

/// One day's aggregate. The variant matches the [`StatsKind`] the request
/// was made with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DayRow {
    Values {
        day_start: u64,
        min: f32,
        mean: f32,
        max: f32,
        n_finite: u64,
        n_total: u64,
    },
    Integrity {
        day_start: u64,
        n_finite: u64,
        n_total: u64,
    },
}

impl DayRow {
    pub fn day_start(&self) -> u64 {
        match self {
            DayRow::Values { day_start, .. } | DayRow::Integrity { day_start, .. } => *day_start,
        }
    }
}

/// Streams a feed's `.dat` one calendar day at a time and emits per-day
/// aggregates.
pub struct DailyStats;

impl DailyStats {
    #[allow(clippy::too_many_arguments)]
    pub fn compute(
        cfg: &Config,
        feed_id: FeedId,
        meta: &MetaHeader,
        start_time: u64,
        steps_window: StepsWindow,
        max_size: u64,
        min_value: Option<f32>,
        max_value: Option<f32>,
        kind: StatsKind,
    ) -> Result<Vec<DayRow>, Error> {
        let interval = u64::from(meta.interval);
        let start_pos_signed = (start_time as i64 - i64::from(meta.start_time)) / i64::from(meta.interval);
        let start_pos = start_pos_signed.max(0) as u64;
        if start_pos >= meta.npoints {
            bail!(
                OutOfRange,
                msg("start_pos {start_pos} is out of range for {} points", meta.npoints)
            );
        }

        let remaining = meta.npoints - start_pos;
        let steps = match steps_window {
            StepsWindow::All => remaining,
            StepsWindow::Count(n) => n,
        };
        let selected = steps.min(remaining);
        if selected > max_size {
            bail!(OutOfRange, msg("selected {selected} points exceeds max_size {max_size}"));
        }

        let reader = ChunkReader::open(cfg, feed_id)?;
        let mut rows = Vec::new();
        let mut pos = start_pos;
        let end_pos = start_pos + selected;
        let mut current_day = base::time::start_of_utc_day(u64::from(meta.start_time) + pos * interval);

        while pos < end_pos {
            let next_day = current_day + base::time::SECONDS_PER_DAY;
            let sample_time = u64::from(meta.start_time) + pos * interval;
            let day_chunk_len = ((next_day - sample_time) / interval).min(end_pos - pos);

            let stream = reader.read(pos, day_chunk_len as usize, Some(day_chunk_len), true)?;
            let mut n_finite = 0u64;
            let mut n_total = 0u64;
            let mut min_v = f32::INFINITY;
            let mut max_v = f32::NEG_INFINITY;
            let mut sum = 0f64;
            let mut last_pos_seen = pos;

            for chunk in stream {
                let (range, values) = chunk?;
                last_pos_seen = range.end - 1;
                for raw in values {
                    let v = filter_value(raw, min_value, max_value);
                    n_total += 1;
                    if v.is_finite() {
                        n_finite += 1;
                        sum += f64::from(v);
                        min_v = min_v.min(v);
                        max_v = max_v.max(v);
                    }
                }
            }

            let last_timestamp = u64::from(meta.start_time) + last_pos_seen * interval;
            if last_timestamp >= next_day {
                bail!(
                    ChunkBoundaryViolation,
                    msg("day chunk starting {current_day} reached {last_timestamp}, past boundary {next_day}")
                );
            }

            rows.push(match kind {
                StatsKind::Values if n_finite == 0 => DayRow::Values {
                    day_start: current_day,
                    min: MISSING,
                    mean: MISSING,
                    max: MISSING,
                    n_finite,
                    n_total,
                },
                StatsKind::Values => DayRow::Values {
                    day_start: current_day,
                    min: min_v,
                    mean: (sum / n_finite as f64) as f32,
                    max: max_v,
                    n_finite,
                    n_total,
                },
                StatsKind::Integrity => DayRow::Integrity {
                    day_start: current_day,
                    n_finite,
                    n_total,
                },
            });

            pos += day_chunk_len;
            current_day = next_day;
        }

        Ok(rows)
    }
}

fn filter_value(v: f32, min_value: Option<f32>, max_value: Option<f32>) -> f32 {
    if !v.is_finite() {
        return v;
    }
    if min_value.is_some_and(|min| v < min) || max_value.is_some_and(|max| v > max) {
        return MISSING;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use crate::testutil::write_feed;
    use base::Config;

    fn setup(samples: &[f32]) -> (tempfile::TempDir, Config, FeedId, MetaHeader) {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Config::new(tmp.path());
        let feed_id = FeedId::new(1).unwrap();
        // day0_start: a UTC-midnight-aligned timestamp, so two full days
        // of 10-second samples line up exactly on day boundaries.
        let day0_start = 1_576_972_800u32;
        write_feed(tmp.path(), feed_id, 10, day0_start, samples);
        let meta = MetaHeader::load(&cfg, feed_id).unwrap();
        (tmp, cfg, feed_id, meta)
    }

    fn two_days_of_samples() -> Vec<f32> {
        (0..2 * 8640).map(|i| 20.0 + i as f32).collect()
    }

    #[test]
    fn s5_values_over_two_full_days() {
        testutil::init();
        let samples = two_days_of_samples();
        let (_tmp, cfg, feed_id, meta) = setup(&samples);
        let rows = DailyStats::compute(
            &cfg,
            feed_id,
            &meta,
            u64::from(meta.start_time),
            StepsWindow::All,
            meta.npoints,
            None,
            None,
            StatsKind::Values,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        match rows[0] {
            DayRow::Values { day_start, min, mean, max, n_finite, n_total } => {
                assert_eq!(day_start, u64::from(meta.start_time));
                assert_eq!(min, 20.0);
                assert_eq!(mean, 4339.5);
                assert_eq!(max, 8659.0);
                assert_eq!(n_finite, 8640);
                assert_eq!(n_total, 8640);
            }
            _ => panic!("expected Values row"),
        }
        assert_eq!(rows[1].day_start(), u64::from(meta.start_time) + 86400);
    }

    #[test]
    fn s5_value_range_filter_drops_out_of_range_samples() {
        testutil::init();
        let samples = two_days_of_samples();
        let (_tmp, cfg, feed_id, meta) = setup(&samples);
        let rows = DailyStats::compute(
            &cfg,
            feed_id,
            &meta,
            u64::from(meta.start_time),
            StepsWindow::Count(8640),
            meta.npoints,
            Some(21.0),
            Some(23.0),
            StatsKind::Values,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        match rows[0] {
            DayRow::Values { min, mean, max, n_finite, n_total, .. } => {
                assert_eq!(min, 21.0);
                assert_eq!(mean, 22.0);
                assert_eq!(max, 23.0);
                assert_eq!(n_finite, 3);
                assert_eq!(n_total, 8640);
            }
            _ => panic!("expected Values row"),
        }
    }

    #[test]
    fn day_starts_are_aligned_and_ascending() {
        testutil::init();
        let samples = two_days_of_samples();
        let (_tmp, cfg, feed_id, meta) = setup(&samples);
        let rows = DailyStats::compute(
            &cfg,
            feed_id,
            &meta,
            u64::from(meta.start_time),
            StepsWindow::All,
            meta.npoints,
            None,
            None,
            StatsKind::Integrity,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.day_start() % 86400, 0);
        }
        assert_eq!(rows[1].day_start() - rows[0].day_start(), 86400);
    }

    #[test]
    fn count_conservation_across_rows() {
        testutil::init();
        let samples = two_days_of_samples();
        let (_tmp, cfg, feed_id, meta) = setup(&samples);
        let rows = DailyStats::compute(
            &cfg,
            feed_id,
            &meta,
            u64::from(meta.start_time),
            StepsWindow::All,
            meta.npoints,
            None,
            None,
            StatsKind::Integrity,
        )
        .unwrap();
        let total: u64 = rows
            .iter()
            .map(|r| match r {
                DayRow::Integrity { n_total, .. } => *n_total,
                DayRow::Values { n_total, .. } => *n_total,
            })
            .sum();
        assert_eq!(total, meta.npoints);
    }

    #[test]
    fn all_missing_day_survives_as_a_sentinel_row() {
        testutil::init();
        // A single day's worth of samples, all outside the filter range: the
        // day was still processed, so its row (with day_start finite and
        // min/mean/max sentinel) is emitted, not dropped.
        let samples = vec![100.0f32; 8640];
        let (_tmp, cfg, feed_id, meta) = setup(&samples);
        let rows = DailyStats::compute(
            &cfg,
            feed_id,
            &meta,
            u64::from(meta.start_time),
            StepsWindow::All,
            meta.npoints,
            Some(0.0),
            Some(1.0),
            StatsKind::Values,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        match rows[0] {
            DayRow::Values { day_start, min, mean, max, n_finite, n_total } => {
                assert_eq!(day_start, u64::from(meta.start_time));
                assert!(min.is_nan());
                assert!(mean.is_nan());
                assert!(max.is_nan());
                assert_eq!(n_finite, 0);
                assert_eq!(n_total, 8640);
            }
            _ => panic!("expected Values row"),
        }
    }

    #[test]
    fn rejects_start_pos_past_npoints() {
        testutil::init();
        let samples = vec![1.0f32; 10];
        let (_tmp, cfg, feed_id, meta) = setup(&samples);
        let e = DailyStats::compute(
            &cfg,
            feed_id,
            &meta,
            u64::from(meta.start_time) + 1000,
            StepsWindow::All,
            meta.npoints,
            None,
            None,
            StatsKind::Integrity,
        )
        .unwrap_err();
        assert_eq!(e.kind(), base::ErrorKind::OutOfRange);
    }

    #[test]
    fn rejects_selection_exceeding_max_size() {
        testutil::init();
        let samples = vec![1.0f32; 10];
        let (_tmp, cfg, feed_id, meta) = setup(&samples);
        let e = DailyStats::compute(
            &cfg,
            feed_id,
            &meta,
            u64::from(meta.start_time),
            StepsWindow::All,
            5,
            None,
            None,
            StatsKind::Integrity,
        )
        .unwrap_err();
        assert_eq!(e.kind(), base::ErrorKind::OutOfRange);
    }
}
