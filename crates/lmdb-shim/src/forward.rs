// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Forwarding entry points.
//!
//! Each function builds its descriptors on the stack, calls exactly one
//! engine primitive and returns the engine's status code. Flags and cursor
//! ops are handed over bit-for-bit.
//!
//! # Safety
//! For every function here:
//! - handles must be live engine handles valid for the operation
//! - each `(ptr, len)` pair must describe `len` readable bytes that stay
//!   valid and unmoved until the call returns
//! - out-parameters must be valid for writes

use std::{
	ffi::{c_int, c_uint},
	ptr,
};

use crate::{
	ffi::{self, MDB_cursor_op, MDB_val},
	handle::{CursorHandle, DbHandle, TxnHandle},
	span::span,
};

/// Point lookup. On success `val` aliases engine-owned memory.
#[inline]
pub unsafe fn get(txn: TxnHandle, dbi: DbHandle, key: *const u8, key_len: usize, val: *mut MDB_val) -> c_int {
	let mut key = span(key, key_len);
	unsafe { ffi::mdb_get(txn.as_ptr(), dbi.as_raw(), &mut key, val) }
}

/// Point insert.
#[inline]
pub unsafe fn put(
	txn: TxnHandle,
	dbi: DbHandle,
	key: *const u8,
	key_len: usize,
	val: *const u8,
	val_len: usize,
	flags: c_uint,
) -> c_int {
	let mut key = span(key, key_len);
	let mut val = span(val, val_len);
	unsafe { ffi::mdb_put(txn.as_ptr(), dbi.as_raw(), &mut key, &mut val, flags) }
}

/// Point insert in reserve mode.
///
/// The engine reserves `val_len` bytes for the value and, on success, points
/// `reserved` at them; the caller fills them before the next update in the
/// same transaction. `MDB_RESERVE` is added to `flags`.
#[inline]
pub unsafe fn put_reserve(
	txn: TxnHandle,
	dbi: DbHandle,
	key: *const u8,
	key_len: usize,
	val_len: usize,
	flags: c_uint,
	reserved: *mut MDB_val,
) -> c_int {
	let mut key = span(key, key_len);
	unsafe {
		*reserved = span(ptr::null(), val_len);
		ffi::mdb_put(txn.as_ptr(), dbi.as_raw(), &mut key, reserved, flags | ffi::MDB_RESERVE as c_uint)
	}
}

/// Point delete.
///
/// A null `val` hands the engine a null data descriptor, which removes every
/// value of `key` in a DUPSORT table.
#[inline]
pub unsafe fn del(
	txn: TxnHandle,
	dbi: DbHandle,
	key: *const u8,
	key_len: usize,
	val: *const u8,
	val_len: usize,
) -> c_int {
	let mut key = span(key, key_len);
	if val.is_null() {
		return unsafe { ffi::mdb_del(txn.as_ptr(), dbi.as_raw(), &mut key, ptr::null_mut()) };
	}
	let mut val = span(val, val_len);
	unsafe { ffi::mdb_del(txn.as_ptr(), dbi.as_raw(), &mut key, &mut val) }
}

/// Cursor positioning from a key.
///
/// `key` is built in place inside the caller's out-parameter, so the engine
/// may either overwrite it or leave it echoing the input, depending on `op`.
#[inline]
pub unsafe fn cursor_get_key(
	cursor: CursorHandle,
	key_data: *const u8,
	key_len: usize,
	key: *mut MDB_val,
	val: *mut MDB_val,
	op: MDB_cursor_op,
) -> c_int {
	unsafe {
		*key = span(key_data, key_len);
		ffi::mdb_cursor_get(cursor.as_ptr(), key, val, op)
	}
}

/// Cursor positioning from a key and a value.
#[inline]
pub unsafe fn cursor_get_key_value(
	cursor: CursorHandle,
	key_data: *const u8,
	key_len: usize,
	val_data: *const u8,
	val_len: usize,
	key: *mut MDB_val,
	val: *mut MDB_val,
	op: MDB_cursor_op,
) -> c_int {
	unsafe {
		*key = span(key_data, key_len);
		*val = span(val_data, val_len);
		ffi::mdb_cursor_get(cursor.as_ptr(), key, val, op)
	}
}

/// Cursor insert.
#[inline]
pub unsafe fn cursor_put(
	cursor: CursorHandle,
	key: *const u8,
	key_len: usize,
	val: *const u8,
	val_len: usize,
	flags: c_uint,
) -> c_int {
	let mut key = span(key, key_len);
	let mut val = span(val, val_len);
	unsafe { ffi::mdb_cursor_put(cursor.as_ptr(), &mut key, &mut val, flags) }
}

/// Cursor insert in reserve mode. See [`put_reserve`].
#[inline]
pub unsafe fn cursor_put_reserve(
	cursor: CursorHandle,
	key: *const u8,
	key_len: usize,
	val_len: usize,
	flags: c_uint,
	reserved: *mut MDB_val,
) -> c_int {
	let mut key = span(key, key_len);
	unsafe {
		*reserved = span(ptr::null(), val_len);
		ffi::mdb_cursor_put(cursor.as_ptr(), &mut key, reserved, flags | ffi::MDB_RESERVE as c_uint)
	}
}
