// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Transactional LMDB binding.
//!
//! [`Lmdb`] opens an environment and hands out two kinds of transactions:
//! - [`Lmdb::view`]: read-only, run on the calling thread, many at once
//! - [`Lmdb::update`]: read-write, run on a dedicated writer thread that
//!   batches concurrent updates into a single commit and grows the memory map
//!   when it fills up
//!
//! All key/value traffic to the engine goes through the
//! [`reifydb_lmdb_shim`] forwarding layer.

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod config;
mod cursor;
mod env;
mod error;
mod flags;
mod lmdb;
mod readers;
mod txn;
mod writer;

pub use config::LmdbConfig;
pub use cursor::{ReadOnlyCursor, ReadWriteCursor};
pub use error::{Error, Result};
pub use flags::{CursorOp, DatabaseFlags, EnvironmentFlags, PutFlags, version};
pub use lmdb::Lmdb;
pub use reifydb_lmdb_shim::MdbError;
pub use txn::{DbRef, ReadOnlyTxn, ReadWriteTxn};
