// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ffi::CString,
	marker::PhantomData,
	mem,
	ops::Deref,
	ptr,
};

use reifydb_lmdb_shim::{
	self as shim, ByteSpan, DbHandle, TxnHandle, ffi,
	span::{bytes, empty, fill},
};

use crate::{
	DatabaseFlags, PutFlags, ReadOnlyCursor, ReadWriteCursor, Result, env::Environment, error::mdb_result,
};

/// A handle to an open database.
///
/// Opened inside an update it stays usable from later transactions once that
/// update has committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DbRef(DbHandle);

impl DbRef {
	pub fn handle(self) -> DbHandle {
		self.0
	}
}

/// A read-only transaction, aborted when dropped.
pub struct ReadOnlyTxn<'env> {
	txn: TxnHandle,
	_env: PhantomData<&'env Environment>,
}

impl<'env> ReadOnlyTxn<'env> {
	pub(crate) fn begin(env: &'env Environment) -> Result<Self> {
		Ok(Self {
			txn: env.begin_txn(true)?,
			_env: PhantomData,
		})
	}

	/// Open the database `name`, or the unnamed database for `None`.
	///
	/// Creating a database (`DatabaseFlags::CREATE`) needs a [`ReadWriteTxn`].
	pub fn db_ref(&self, name: Option<&str>, flags: DatabaseFlags) -> Result<DbRef> {
		let name = name.map(CString::new).transpose()?;
		let name = name.as_ref().map_or(ptr::null(), |name| name.as_ptr());

		let mut dbi: ffi::MDB_dbi = 0;
		mdb_result(unsafe { ffi::mdb_dbi_open(self.txn.as_ptr(), name, flags.bits(), &mut dbi) })?;
		Ok(DbRef(DbHandle::from_raw(dbi)))
	}

	/// Look up `key`. The value points into the memory map and is valid until
	/// the transaction ends or, for a write transaction, the next change.
	pub fn get(&self, db: DbRef, key: &[u8]) -> Result<&[u8]> {
		let key = ByteSpan::new(key);
		let mut val = empty();
		mdb_result(unsafe { shim::get(self.txn, db.0, key.as_ptr(), key.len(), &mut val) })?;
		Ok(unsafe { bytes(&val) })
	}

	pub fn cursor(&self, db: DbRef) -> Result<ReadOnlyCursor<'_>> {
		ReadOnlyCursor::open(self.txn, db.0)
	}

	pub fn handle(&self) -> TxnHandle {
		self.txn
	}
}

impl Drop for ReadOnlyTxn<'_> {
	fn drop(&mut self) {
		if !self.txn.as_ptr().is_null() {
			unsafe { ffi::mdb_txn_abort(self.txn.as_ptr()) };
		}
	}
}

/// A read-write transaction, aborted when dropped without [`commit`].
///
/// Only ever exists on the writer thread.
///
/// [`commit`]: ReadWriteTxn::commit
pub struct ReadWriteTxn<'env> {
	txn: ReadOnlyTxn<'env>,
}

impl<'env> ReadWriteTxn<'env> {
	pub(crate) fn begin(env: &'env Environment) -> Result<Self> {
		Ok(Self {
			txn: ReadOnlyTxn {
				txn: env.begin_txn(false)?,
				_env: PhantomData,
			},
		})
	}

	/// Store `val` under `key`.
	///
	/// The value is written into space reserved by the engine, which DUPSORT
	/// databases do not support; use [`put_dup_sort`] for those.
	///
	/// [`put_dup_sort`]: ReadWriteTxn::put_dup_sort
	pub fn put(&mut self, db: DbRef, key: &[u8], val: &[u8], flags: PutFlags) -> Result<()> {
		let key = ByteSpan::new(key);
		let mut reserved = empty();
		mdb_result(unsafe {
			shim::put_reserve(self.txn.txn, db.0, key.as_ptr(), key.len(), val.len(), flags.bits(), &mut reserved)
		})?;
		unsafe { fill(&reserved, val) };
		Ok(())
	}

	/// Store `val` under `key` in a DUPSORT database.
	pub fn put_dup_sort(&mut self, db: DbRef, key: &[u8], val: &[u8], flags: PutFlags) -> Result<()> {
		let flags = flags.without(PutFlags::RESERVE);
		let (key, val) = (ByteSpan::new(key), ByteSpan::new(val));
		mdb_result(unsafe {
			shim::put(self.txn.txn, db.0, key.as_ptr(), key.len(), val.as_ptr(), val.len(), flags.bits())
		})
	}

	/// Delete `key`. With a value, only that value is removed from a DUPSORT
	/// database; without one, every value of `key` goes.
	pub fn delete(&mut self, db: DbRef, key: &[u8], val: Option<&[u8]>) -> Result<()> {
		let (key, val) = (ByteSpan::new(key), ByteSpan::optional(val));
		mdb_result(unsafe { shim::del(self.txn.txn, db.0, key.as_ptr(), key.len(), val.as_ptr(), val.len()) })
	}

	pub fn cursor_mut(&mut self, db: DbRef) -> Result<ReadWriteCursor<'_>> {
		ReadWriteCursor::open(self.txn.txn, db.0)
	}

	/// Commit the transaction. The handle is released even when this fails.
	pub(crate) fn commit(mut self) -> Result<()> {
		let txn = mem::replace(&mut self.txn.txn, TxnHandle::from_raw(ptr::null_mut()));
		mdb_result(unsafe { ffi::mdb_txn_commit(txn.as_ptr()) })
	}
}

impl<'env> Deref for ReadWriteTxn<'env> {
	type Target = ReadOnlyTxn<'env>;

	fn deref(&self) -> &Self::Target {
		&self.txn
	}
}
