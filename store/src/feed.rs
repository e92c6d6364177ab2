// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! Feed identity and on-disk path resolution.

use std::fmt;
use std::path::PathBuf;

use base::{Config, Error};

use crate::validate;

/// A feed identifier: a positive integer shared by a `<id>.meta`/`<id>.dat`
/// pair under `data_dir`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct FeedId(u32);

impl FeedId {
    pub fn new(id: u32) -> Result<Self, Error> {
        validate::check_positive_i64("feed_id", i64::from(id))?;
        Ok(FeedId(id))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for FeedId {
    type Error = Error;
    fn try_from(id: u32) -> Result<Self, Error> {
        FeedId::new(id)
    }
}

/// Resolves the `.meta` sidecar path for `feed_id` under `cfg.data_dir`,
/// applying the extension-whitelist and containment checks.
pub fn meta_path(cfg: &Config, feed_id: FeedId) -> Result<PathBuf, Error> {
    validate::resolve_under(&cfg.data_dir, &feed_id.to_string(), "meta")
}

/// Resolves the `.dat` path for `feed_id` under `cfg.data_dir`, applying
/// the extension-whitelist and containment checks.
pub fn data_path(cfg: &Config, feed_id: FeedId) -> Result<PathBuf, Error> {
    validate::resolve_under(&cfg.data_dir, &feed_id.to_string(), "dat")
}

/// Scans `cfg.data_dir` for `<id>.meta`/`<id>.dat` pairs and returns the
/// sorted ids for which both files are present. Pure filesystem listing —
/// there is no catalog database backing this (spec.md's Non-goals exclude
/// persisting a feed catalog).
pub fn list_feed_ids(cfg: &Config) -> Result<Vec<FeedId>, Error> {
    validate::check_directory(&cfg.data_dir)?;
    let mut metas = std::collections::HashSet::new();
    let mut dats = std::collections::HashSet::new();
    for entry in std::fs::read_dir(&cfg.data_dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let Ok(id) = stem.parse::<u32>() else {
            continue;
        };
        let Ok(id) = FeedId::new(id) else {
            continue;
        };
        match ext {
            "meta" => {
                metas.insert(id);
            }
            "dat" => {
                dats.insert(id);
            }
            _ => {}
        }
    }
    let mut ids: Vec<FeedId> = metas.intersection(&dats).copied().collect();
    ids.sort();
    Ok(ids)
}
