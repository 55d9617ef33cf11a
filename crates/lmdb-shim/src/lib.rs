// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Call-marshalling shim over the LMDB C API.
//!
//! LMDB takes keys and values as `MDB_val` records. Hosts that can only pass
//! a raw pointer and a length call through this crate instead: every
//! operation wraps its (pointer, length) pairs into `MDB_val`s on the stack,
//! right before the engine call, and hands back the engine's status code
//! unchanged.
//!
//! The same operations are available twice:
//! - [`forward`]: Rust `unsafe fn`s taking opaque handle tokens
//! - [`abi`]: exported `extern "C"` symbols for hosts linking the static library
//!
//! Nothing in this crate interprets a status code. [`status`] offers a 1:1
//! mirror of the engine's code list for the calling layer to use.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use lmdb_master_sys as ffi;

pub mod abi;
pub mod forward;
pub mod handle;
pub mod span;
pub mod status;

pub use forward::{cursor_get_key, cursor_get_key_value, cursor_put, cursor_put_reserve, del, get, put, put_reserve};
pub use handle::{CursorHandle, DbHandle, TxnHandle};
pub use span::{ByteSpan, span};
pub use status::{MdbError, check, strerror};
