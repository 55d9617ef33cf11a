// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	marker::PhantomData,
	ops::{Deref, DerefMut},
	ptr,
};

use reifydb_lmdb_shim::{
	self as shim, ByteSpan, CursorHandle, DbHandle, TxnHandle, ffi,
	span::{bytes, empty, fill},
};

use crate::{CursorOp, PutFlags, Result, error::mdb_result};

/// A cursor within a transaction, closed when dropped.
pub struct ReadOnlyCursor<'txn> {
	cursor: CursorHandle,
	_txn: PhantomData<&'txn ()>,
}

impl<'txn> ReadOnlyCursor<'txn> {
	pub(crate) fn open(txn: TxnHandle, db: DbHandle) -> Result<Self> {
		let mut cursor = ptr::null_mut();
		mdb_result(unsafe { ffi::mdb_cursor_open(txn.as_ptr(), db.as_raw(), &mut cursor) })?;
		Ok(Self {
			cursor: CursorHandle::from_raw(cursor),
			_txn: PhantomData,
		})
	}

	/// Move the cursor and return the key and value at the new position.
	///
	/// The returned slices may alias `key` or `val` rather than the memory
	/// map: with [`CursorOp::SET`] the engine leaves the key untouched, so
	/// the input comes straight back.
	pub fn move_and_get<'c>(
		&'c mut self,
		op: CursorOp,
		key: Option<&'c [u8]>,
		val: Option<&'c [u8]>,
	) -> Result<(&'c [u8], &'c [u8])> {
		let mut key_out = empty();
		let mut val_out = empty();
		let key = ByteSpan::optional(key);

		let code = match val.map(ByteSpan::new) {
			None => unsafe {
				shim::cursor_get_key(self.cursor, key.as_ptr(), key.len(), &mut key_out, &mut val_out, op.raw())
			},
			Some(val) => unsafe {
				shim::cursor_get_key_value(
					self.cursor,
					key.as_ptr(),
					key.len(),
					val.as_ptr(),
					val.len(),
					&mut key_out,
					&mut val_out,
					op.raw(),
				)
			},
		};
		mdb_result(code)?;

		Ok(unsafe { (bytes(&key_out), bytes(&val_out)) })
	}

	pub fn handle(&self) -> CursorHandle {
		self.cursor
	}
}

impl Drop for ReadOnlyCursor<'_> {
	fn drop(&mut self) {
		unsafe { ffi::mdb_cursor_close(self.cursor.as_ptr()) };
	}
}

/// A cursor that can also change the database.
pub struct ReadWriteCursor<'txn> {
	cursor: ReadOnlyCursor<'txn>,
}

impl<'txn> ReadWriteCursor<'txn> {
	pub(crate) fn open(txn: TxnHandle, db: DbHandle) -> Result<Self> {
		Ok(Self {
			cursor: ReadOnlyCursor::open(txn, db)?,
		})
	}

	/// Store `val` under `key` and move the cursor onto it. Not for DUPSORT
	/// databases; see [`ReadWriteCursor::put_dup_sort`].
	pub fn put(&mut self, key: &[u8], val: &[u8], flags: PutFlags) -> Result<()> {
		let key = ByteSpan::new(key);
		let mut reserved = empty();
		mdb_result(unsafe {
			shim::cursor_put_reserve(self.cursor.cursor, key.as_ptr(), key.len(), val.len(), flags.bits(), &mut reserved)
		})?;
		unsafe { fill(&reserved, val) };
		Ok(())
	}

	pub fn put_dup_sort(&mut self, key: &[u8], val: &[u8], flags: PutFlags) -> Result<()> {
		let flags = flags.without(PutFlags::RESERVE);
		let (key, val) = (ByteSpan::new(key), ByteSpan::new(val));
		mdb_result(unsafe {
			shim::cursor_put(self.cursor.cursor, key.as_ptr(), key.len(), val.as_ptr(), val.len(), flags.bits())
		})
	}

	/// Delete the pair at the current position. [`PutFlags::NO_DUP_DATA`]
	/// removes every value of the current key.
	pub fn delete(&mut self, flags: PutFlags) -> Result<()> {
		mdb_result(unsafe { ffi::mdb_cursor_del(self.cursor.cursor.as_ptr(), flags.bits()) })
	}
}

impl<'txn> Deref for ReadWriteCursor<'txn> {
	type Target = ReadOnlyCursor<'txn>;

	fn deref(&self) -> &Self::Target {
		&self.cursor
	}
}

impl DerefMut for ReadWriteCursor<'_> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.cursor
	}
}
