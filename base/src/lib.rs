// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! Foundational pieces shared by the PhpFina storage engine: error type,
//! time helpers, config, and logging setup. Knows nothing about feeds,
//! `.meta`/`.dat` files, or resampling — see the `store` crate for that.

mod config;
mod error;
pub mod strutil;
pub mod testutil;
pub mod time;
pub mod tracing_setup;

pub use config::Config;
pub use error::{Error, ErrorKind, ResultExt};
