// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Opaque engine handles.
//!
//! Each token is a transparent wrapper around the engine's own handle. Tokens
//! carry no ownership: creating, committing and closing the underlying object
//! is up to whoever produced the raw handle.

use crate::ffi::{MDB_cursor, MDB_dbi, MDB_txn};

/// Transaction handle (`MDB_txn *`).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxnHandle(*mut MDB_txn);

impl TxnHandle {
	#[inline]
	pub fn from_raw(txn: *mut MDB_txn) -> Self {
		Self(txn)
	}

	#[inline]
	pub fn as_ptr(self) -> *mut MDB_txn {
		self.0
	}
}

/// Database handle (`MDB_dbi`).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DbHandle(MDB_dbi);

impl DbHandle {
	#[inline]
	pub fn from_raw(dbi: MDB_dbi) -> Self {
		Self(dbi)
	}

	#[inline]
	pub fn as_raw(self) -> MDB_dbi {
		self.0
	}
}

/// Cursor handle (`MDB_cursor *`).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorHandle(*mut MDB_cursor);

impl CursorHandle {
	#[inline]
	pub fn from_raw(cursor: *mut MDB_cursor) -> Self {
		Self(cursor)
	}

	#[inline]
	pub fn as_ptr(self) -> *mut MDB_cursor {
		self.0
	}
}
