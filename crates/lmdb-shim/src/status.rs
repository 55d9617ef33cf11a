// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Engine status codes.
//!
//! [`MdbError`] mirrors the engine's return codes one to one. Codes outside
//! the engine's own range are errno values and are kept as [`MdbError::Os`].
//! Converting a code into an [`MdbError`] and back through
//! [`MdbError::code`] always yields the original integer.

use std::ffi::{CStr, c_int};

use crate::ffi;

const SUCCESS: c_int = ffi::MDB_SUCCESS as c_int;
const KEY_EXIST: c_int = ffi::MDB_KEYEXIST as c_int;
const NOT_FOUND: c_int = ffi::MDB_NOTFOUND as c_int;
const PAGE_NOT_FOUND: c_int = ffi::MDB_PAGE_NOTFOUND as c_int;
const CORRUPTED: c_int = ffi::MDB_CORRUPTED as c_int;
const PANIC: c_int = ffi::MDB_PANIC as c_int;
const VERSION_MISMATCH: c_int = ffi::MDB_VERSION_MISMATCH as c_int;
const INVALID: c_int = ffi::MDB_INVALID as c_int;
const MAP_FULL: c_int = ffi::MDB_MAP_FULL as c_int;
const DBS_FULL: c_int = ffi::MDB_DBS_FULL as c_int;
const READERS_FULL: c_int = ffi::MDB_READERS_FULL as c_int;
const TLS_FULL: c_int = ffi::MDB_TLS_FULL as c_int;
const TXN_FULL: c_int = ffi::MDB_TXN_FULL as c_int;
const CURSOR_FULL: c_int = ffi::MDB_CURSOR_FULL as c_int;
const PAGE_FULL: c_int = ffi::MDB_PAGE_FULL as c_int;
const MAP_RESIZED: c_int = ffi::MDB_MAP_RESIZED as c_int;
const INCOMPATIBLE: c_int = ffi::MDB_INCOMPATIBLE as c_int;
const BAD_RSLOT: c_int = ffi::MDB_BAD_RSLOT as c_int;
const BAD_TXN: c_int = ffi::MDB_BAD_TXN as c_int;
const BAD_VALSIZE: c_int = ffi::MDB_BAD_VALSIZE as c_int;
const BAD_DBI: c_int = ffi::MDB_BAD_DBI as c_int;
const PROBLEM: c_int = ffi::MDB_PROBLEM as c_int;

/// A non-success engine status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MdbError {
	#[error("MDB_KEYEXIST: Key/data pair already exists")]
	KeyExist,
	#[error("MDB_NOTFOUND: No matching key/data pair found")]
	NotFound,
	#[error("MDB_PAGE_NOTFOUND: Requested page not found")]
	PageNotFound,
	#[error("MDB_CORRUPTED: Located page was wrong type")]
	Corrupted,
	#[error("MDB_PANIC: Update of meta page failed or environment had fatal error")]
	Panic,
	#[error("MDB_VERSION_MISMATCH: Database environment version mismatch")]
	VersionMismatch,
	#[error("MDB_INVALID: File is not an LMDB file")]
	Invalid,
	#[error("MDB_MAP_FULL: Environment mapsize limit reached")]
	MapFull,
	#[error("MDB_DBS_FULL: Environment maxdbs limit reached")]
	DbsFull,
	#[error("MDB_READERS_FULL: Environment maxreaders limit reached")]
	ReadersFull,
	#[error("MDB_TLS_FULL: Thread-local storage keys full - too many environments open")]
	TlsFull,
	#[error("MDB_TXN_FULL: Transaction has too many dirty pages - transaction too big")]
	TxnFull,
	#[error("MDB_CURSOR_FULL: Internal error - cursor stack limit reached")]
	CursorFull,
	#[error("MDB_PAGE_FULL: Internal error - page has no more space")]
	PageFull,
	#[error("MDB_MAP_RESIZED: Database contents grew beyond environment mapsize")]
	MapResized,
	#[error("MDB_INCOMPATIBLE: Operation and DB incompatible, or DB flags changed")]
	Incompatible,
	#[error("MDB_BAD_RSLOT: Invalid reuse of reader locktable slot")]
	BadRslot,
	#[error("MDB_BAD_TXN: Transaction must abort, has a child, or is invalid")]
	BadTxn,
	#[error("MDB_BAD_VALSIZE: Unsupported size of key/DB name/data, or wrong DUPFIXED size")]
	BadValSize,
	#[error("MDB_BAD_DBI: The specified DBI handle was closed/changed unexpectedly")]
	BadDbi,
	#[error("MDB_PROBLEM: Unexpected problem - transaction should abort")]
	Problem,
	#[error("{}", std::io::Error::from_raw_os_error(*.0))]
	Os(c_int),
}

impl MdbError {
	/// Map a status code; `None` for success.
	pub fn from_code(code: c_int) -> Option<Self> {
		let err = match code {
			SUCCESS => return None,
			KEY_EXIST => Self::KeyExist,
			NOT_FOUND => Self::NotFound,
			PAGE_NOT_FOUND => Self::PageNotFound,
			CORRUPTED => Self::Corrupted,
			PANIC => Self::Panic,
			VERSION_MISMATCH => Self::VersionMismatch,
			INVALID => Self::Invalid,
			MAP_FULL => Self::MapFull,
			DBS_FULL => Self::DbsFull,
			READERS_FULL => Self::ReadersFull,
			TLS_FULL => Self::TlsFull,
			TXN_FULL => Self::TxnFull,
			CURSOR_FULL => Self::CursorFull,
			PAGE_FULL => Self::PageFull,
			MAP_RESIZED => Self::MapResized,
			INCOMPATIBLE => Self::Incompatible,
			BAD_RSLOT => Self::BadRslot,
			BAD_TXN => Self::BadTxn,
			BAD_VALSIZE => Self::BadValSize,
			BAD_DBI => Self::BadDbi,
			PROBLEM => Self::Problem,
			other => Self::Os(other),
		};
		Some(err)
	}

	/// The exact status code this error was built from.
	pub fn code(self) -> c_int {
		match self {
			Self::KeyExist => KEY_EXIST,
			Self::NotFound => NOT_FOUND,
			Self::PageNotFound => PAGE_NOT_FOUND,
			Self::Corrupted => CORRUPTED,
			Self::Panic => PANIC,
			Self::VersionMismatch => VERSION_MISMATCH,
			Self::Invalid => INVALID,
			Self::MapFull => MAP_FULL,
			Self::DbsFull => DBS_FULL,
			Self::ReadersFull => READERS_FULL,
			Self::TlsFull => TLS_FULL,
			Self::TxnFull => TXN_FULL,
			Self::CursorFull => CURSOR_FULL,
			Self::PageFull => PAGE_FULL,
			Self::MapResized => MAP_RESIZED,
			Self::Incompatible => INCOMPATIBLE,
			Self::BadRslot => BAD_RSLOT,
			Self::BadTxn => BAD_TXN,
			Self::BadValSize => BAD_VALSIZE,
			Self::BadDbi => BAD_DBI,
			Self::Problem => PROBLEM,
			Self::Os(code) => code,
		}
	}

	/// Whether the code lies in the engine's own range rather than errno.
	pub fn is_engine_code(self) -> bool {
		!matches!(self, Self::Os(_))
	}
}

/// Turn a status code into a `Result`.
#[inline]
pub fn check(code: c_int) -> Result<(), MdbError> {
	match MdbError::from_code(code) {
		None => Ok(()),
		Some(err) => Err(err),
	}
}

/// The engine's own description of a status code.
pub fn strerror(code: c_int) -> String {
	let ptr = unsafe { ffi::mdb_strerror(code) };
	if ptr.is_null() {
		return format!("LMDB error: {}", code);
	}
	let message = unsafe { CStr::from_ptr(ptr) }.to_string_lossy();
	if message.is_empty() {
		format!("LMDB error: {}", code)
	} else {
		message.into_owned()
	}
}
