// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! `tracing` subscriber setup, filtered by the `PHPFINA_LOG` environment
//! variable.

use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Layer as _;

fn filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .with_env_var("PHPFINA_LOG")
        .from_env_lossy()
}

/// Installs a stderr-writing `tracing` subscriber for normal operation.
/// Idempotent: a second call is a harmless no-op if a global subscriber is
/// already set.
pub fn install() {
    let sub = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter()),
    );
    let _ = sub.try_init();
}

/// Test-harness equivalent of [`install`], writing to the test capture
/// buffer instead of stderr.
pub fn install_for_tests() {
    let sub = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_filter(filter()),
    );
    let _ = sub.try_init();
}
