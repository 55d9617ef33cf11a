// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Byte-span descriptors.

use std::{ffi::c_void, marker::PhantomData, ptr, slice};

use crate::ffi::MDB_val;

/// Build an engine value descriptor from a raw pointer and length.
///
/// No bytes are read or copied; the descriptor aliases `data` as-is.
#[inline]
pub fn span(data: *const u8, len: usize) -> MDB_val {
	MDB_val {
		mv_size: len,
		mv_data: data as *mut c_void,
	}
}

/// An empty descriptor, used as an out-parameter the engine fills in.
#[inline]
pub fn empty() -> MDB_val {
	span(ptr::null(), 0)
}

/// A borrowed view of a byte slice in the engine's native layout.
///
/// Lives no longer than the slice it was built from. The safe binding builds
/// one per key or value right before a forward and hands over its pointer and
/// length.
#[repr(transparent)]
pub struct ByteSpan<'a> {
	val: MDB_val,
	_marker: PhantomData<&'a [u8]>,
}

impl<'a> ByteSpan<'a> {
	#[inline]
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			val: span(data.as_ptr(), data.len()),
			_marker: PhantomData,
		}
	}

	/// A null, zero-length span for `None`.
	#[inline]
	pub fn optional(data: Option<&'a [u8]>) -> Self {
		match data {
			Some(data) => Self::new(data),
			None => Self {
				val: empty(),
				_marker: PhantomData,
			},
		}
	}

	#[inline]
	pub fn as_ptr(&self) -> *const u8 {
		self.val.mv_data as *const u8
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.val.mv_size
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.val.mv_size == 0
	}
}

/// View the bytes a descriptor points at.
///
/// A zero-length descriptor yields an empty slice regardless of its pointer,
/// since the engine may leave the pointer null on empty results.
///
/// # Safety
/// `val` must point at `mv_size` readable bytes that stay valid and unchanged
/// for `'a`.
#[inline]
pub unsafe fn bytes<'a>(val: &MDB_val) -> &'a [u8] {
	if val.mv_size == 0 || val.mv_data.is_null() {
		return &[];
	}
	unsafe { slice::from_raw_parts(val.mv_data as *const u8, val.mv_size) }
}

/// Copy `data` into engine-reserved space described by `val`.
///
/// # Safety
/// `val` must describe at least `data.len()` writable bytes, as returned by a
/// reserve-mode insert.
#[inline]
pub unsafe fn fill(val: &MDB_val, data: &[u8]) {
	if data.is_empty() {
		return;
	}
	unsafe { ptr::copy_nonoverlapping(data.as_ptr(), val.mv_data as *mut u8, data.len()) }
}
