// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test log output.
//!
//! Routes `tracing` events through the test harness writer so they show up
//! only for failing tests or with `--nocapture`. Filtering follows `RUST_LOG`
//! and falls back to `debug` for the LMDB crates.

use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "reifydb_lmdb=debug,reifydb_lmdb_shim=debug";

/// Install the test subscriber. Safe to call from every test.
pub fn init() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

	let _ = fmt().with_env_filter(filter).with_test_writer().with_target(true).try_init();
}
