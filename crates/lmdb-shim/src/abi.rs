// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Exported C ABI.
//!
//! Thin `extern "C"` entry points over [`crate::forward`] for hosts that link
//! the static library. Argument order follows the engine's own functions with
//! every `MDB_val *` input replaced by a `(ptr, len)` pair.
//!
//! # Returns
//! The engine's status code: `0` on success, an `MDB_*` code or an errno
//! otherwise.

use std::ffi::{c_int, c_uint};

use crate::{
	ffi::{MDB_cursor, MDB_cursor_op, MDB_dbi, MDB_txn, MDB_val},
	forward,
	handle::{CursorHandle, DbHandle, TxnHandle},
};

/// # Safety
/// See [`forward::get`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reifydb_lmdb_get(
	txn: *mut MDB_txn,
	dbi: MDB_dbi,
	key: *const u8,
	key_len: usize,
	val: *mut MDB_val,
) -> c_int {
	unsafe { forward::get(TxnHandle::from_raw(txn), DbHandle::from_raw(dbi), key, key_len, val) }
}

/// # Safety
/// See [`forward::put`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reifydb_lmdb_put(
	txn: *mut MDB_txn,
	dbi: MDB_dbi,
	key: *const u8,
	key_len: usize,
	val: *const u8,
	val_len: usize,
	flags: c_uint,
) -> c_int {
	unsafe { forward::put(TxnHandle::from_raw(txn), DbHandle::from_raw(dbi), key, key_len, val, val_len, flags) }
}

/// # Safety
/// See [`forward::put_reserve`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reifydb_lmdb_put_reserve(
	txn: *mut MDB_txn,
	dbi: MDB_dbi,
	key: *const u8,
	key_len: usize,
	val_len: usize,
	flags: c_uint,
	reserved: *mut MDB_val,
) -> c_int {
	unsafe {
		forward::put_reserve(TxnHandle::from_raw(txn), DbHandle::from_raw(dbi), key, key_len, val_len, flags, reserved)
	}
}

/// # Safety
/// See [`forward::del`]. Pass a null `val` to omit the value.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reifydb_lmdb_del(
	txn: *mut MDB_txn,
	dbi: MDB_dbi,
	key: *const u8,
	key_len: usize,
	val: *const u8,
	val_len: usize,
) -> c_int {
	unsafe { forward::del(TxnHandle::from_raw(txn), DbHandle::from_raw(dbi), key, key_len, val, val_len) }
}

/// # Safety
/// See [`forward::cursor_get_key`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reifydb_lmdb_cursor_get1(
	cursor: *mut MDB_cursor,
	key_data: *const u8,
	key_len: usize,
	key: *mut MDB_val,
	val: *mut MDB_val,
	op: MDB_cursor_op,
) -> c_int {
	unsafe { forward::cursor_get_key(CursorHandle::from_raw(cursor), key_data, key_len, key, val, op) }
}

/// # Safety
/// See [`forward::cursor_get_key_value`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reifydb_lmdb_cursor_get2(
	cursor: *mut MDB_cursor,
	key_data: *const u8,
	key_len: usize,
	val_data: *const u8,
	val_len: usize,
	key: *mut MDB_val,
	val: *mut MDB_val,
	op: MDB_cursor_op,
) -> c_int {
	unsafe {
		forward::cursor_get_key_value(
			CursorHandle::from_raw(cursor),
			key_data,
			key_len,
			val_data,
			val_len,
			key,
			val,
			op,
		)
	}
}

/// # Safety
/// See [`forward::cursor_put`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reifydb_lmdb_cursor_put(
	cursor: *mut MDB_cursor,
	key: *const u8,
	key_len: usize,
	val: *const u8,
	val_len: usize,
	flags: c_uint,
) -> c_int {
	unsafe { forward::cursor_put(CursorHandle::from_raw(cursor), key, key_len, val, val_len, flags) }
}

/// # Safety
/// See [`forward::cursor_put_reserve`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reifydb_lmdb_cursor_put_reserve(
	cursor: *mut MDB_cursor,
	key: *const u8,
	key_len: usize,
	val_len: usize,
	flags: c_uint,
	reserved: *mut MDB_val,
) -> c_int {
	unsafe { forward::cursor_put_reserve(CursorHandle::from_raw(cursor), key, key_len, val_len, flags, reserved) }
}
