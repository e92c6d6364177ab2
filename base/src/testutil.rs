// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! Shared test setup, in the same spirit as the teacher crate's
//! `db::testutil::init` (global, once-only logging setup for tests).

static INIT: std::sync::Once = std::sync::Once::new();

/// Performs global initialization for tests: sets up `tracing` output.
/// Safe to call from every test; only takes effect once per process.
pub fn init() {
    INIT.call_once(|| {
        crate::tracing_setup::install_for_tests();
    });
}
