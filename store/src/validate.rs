// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! Pure precondition checks (spec.md §4.1). None of these touch the
//! filesystem except [`check_directory`] and [`check_file_size`], which
//! `stat` the path they're handed; everything else is arithmetic or
//! string/path manipulation so that a malformed request is rejected
//! before any I/O (spec.md Testable Property 8).

use std::path::{Component, Path, PathBuf};

use base::{bail, err, Error};

/// The only extensions a path under `data_dir` may carry.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["dat", "meta"];

pub fn check_positive_i64(field: &'static str, v: i64) -> Result<(), Error> {
    if v <= 0 {
        bail!(InvalidArgument, msg("{field} must be a positive integer, got {v}"));
    }
    Ok(())
}

pub fn check_non_negative_i64(field: &'static str, v: i64) -> Result<(), Error> {
    if v < 0 {
        bail!(InvalidArgument, msg("{field} must be a non-negative integer, got {v}"));
    }
    Ok(())
}

/// Checks that `path` exists and is a directory.
pub fn check_directory(path: &Path) -> Result<(), Error> {
    let meta = std::fs::metadata(path)
        .map_err(|e| err!(InvalidArgument, msg("data_dir {} is not accessible", path.display()), source(e)))?;
    if !meta.is_dir() {
        bail!(InvalidArgument, msg("data_dir {} is not a directory", path.display()));
    }
    Ok(())
}

/// Checks that `path`'s extension is exactly `.dat` or `.meta`.
pub fn check_extension(path: &Path) -> Result<(), Error> {
    let ext = path.extension().and_then(|e| e.to_str());
    match ext {
        Some(e) if ALLOWED_EXTENSIONS.contains(&e) => Ok(()),
        _ => Err(err!(
            InvalidArgument,
            msg("{} has a disallowed extension (only .dat/.meta permitted)", path.display())
        )),
    }
}

/// Checks that `candidate` is a descendant of `data_dir`, purely
/// lexically — no filesystem access, so a request can be rejected before
/// any I/O happens even if the file doesn't exist yet.
///
/// Both paths must already be relative-component-free in the sense that
/// `data_dir` is not itself `..`-laden; the one constructed by
/// [`crate::feed::FeedId`]-based path builders always satisfies this,
/// since the file name is synthesized from a validated positive integer,
/// never taken verbatim from a caller.
pub fn check_containment(data_dir: &Path, candidate: &Path) -> Result<(), Error> {
    if has_traversal(candidate) {
        bail!(
            InvalidArgument,
            msg("{} escapes the data directory", candidate.display())
        );
    }
    let dir_components: Vec<Component> = data_dir.components().collect();
    let cand_components: Vec<Component> = candidate.components().collect();
    if cand_components.len() <= dir_components.len()
        || cand_components[..dir_components.len()] != dir_components[..]
    {
        bail!(
            InvalidArgument,
            msg("{} is not contained in data directory {}", candidate.display(), data_dir.display())
        );
    }
    Ok(())
}

fn has_traversal(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

/// Which file a size is being checked for, to pick the right cap from
/// [`base::Config`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FileKind {
    Dat,
    Meta,
}

/// Checks that `path`'s on-disk size does not exceed the configured cap,
/// returning the size in bytes on success.
pub fn check_file_size(path: &Path, kind: FileKind, cfg: &base::Config) -> Result<u64, Error> {
    let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => err!(FileMissing, msg("{} does not exist", path.display())),
        _ => err!(IoError, msg("unable to stat {}", path.display()), source(e)),
    })?;
    let len = meta.len();
    let cap = match kind {
        FileKind::Dat => cfg.max_data_size,
        FileKind::Meta => cfg.max_meta_size,
    };
    if len > cap {
        bail!(
            FileTooLarge,
            msg("{} is {len} bytes, exceeding the {cap}-byte cap", path.display())
        );
    }
    Ok(len)
}

/// Resolves and fully validates `<data_dir>/<file_stem>.<ext>`: extension
/// whitelist, containment, existence. Does not check the size cap (callers
/// do that once they know which cap — `.dat` vs `.meta` — applies).
pub fn resolve_under(data_dir: &Path, file_stem: &str, ext: &str) -> Result<PathBuf, Error> {
    let candidate = data_dir.join(format!("{file_stem}.{ext}"));
    check_extension(&candidate)?;
    check_containment(data_dir, &candidate)?;
    Ok(candidate)
}
