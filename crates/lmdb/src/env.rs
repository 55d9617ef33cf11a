// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	ffi::{CString, c_int, c_uint},
	mem::MaybeUninit,
	os::unix::ffi::OsStrExt,
	path::Path,
	ptr,
};

use reifydb_lmdb_shim::{TxnHandle, ffi};
use tracing::debug;

use crate::{EnvironmentFlags, LmdbConfig, Result, error::mdb_result};

/// An open engine environment.
///
/// Closed exactly once, when dropped. Every transaction must be finished
/// before that happens.
pub(crate) struct Environment {
	raw: *mut ffi::MDB_env,
	read_only: bool,
}

// The engine allows an environment to be shared across threads; with NO_TLS
// read transactions are not tied to the thread that began them either.
unsafe impl Send for Environment {}
unsafe impl Sync for Environment {}

impl Environment {
	pub(crate) fn open(config: &LmdbConfig) -> Result<Self> {
		let path = CString::new(config.path.as_os_str().as_bytes())?;

		let mut raw = ptr::null_mut();
		mdb_result(unsafe { ffi::mdb_env_create(&mut raw) })?;

		// Closes the environment on every early return below.
		let env = Self {
			raw,
			read_only: config.is_read_only(),
		};

		mdb_result(unsafe { ffi::mdb_env_set_maxreaders(raw, config.max_readers as c_uint) })?;
		mdb_result(unsafe { ffi::mdb_env_set_maxdbs(raw, config.max_dbs as ffi::MDB_dbi) })?;
		if let Some(map_size) = config.map_size {
			env.set_map_size(map_size)?;
		}

		let flags = config.flags | EnvironmentFlags::NO_TLS;
		mdb_result(unsafe { ffi::mdb_env_open(raw, path.as_ptr(), flags.bits(), config.mode as _) })?;

		let map_size = env.map_size()?;
		let rounded = round_to_page(map_size);
		if rounded != map_size {
			env.set_map_size(rounded)?;
		}

		debug!(path = %config.path.display(), map_size = rounded, "environment opened");
		Ok(env)
	}

	pub(crate) fn is_read_only(&self) -> bool {
		self.read_only
	}

	/// Begin a top-level transaction. The caller commits or aborts it.
	pub(crate) fn begin_txn(&self, read_only: bool) -> Result<TxnHandle> {
		let flags = if read_only {
			ffi::MDB_RDONLY as c_uint
		} else {
			0
		};
		let mut txn = ptr::null_mut();
		mdb_result(unsafe { ffi::mdb_txn_begin(self.raw, ptr::null_mut(), flags, &mut txn) })?;
		Ok(TxnHandle::from_raw(txn))
	}

	/// Must not be called while a transaction is open in this process.
	pub(crate) fn set_map_size(&self, size: usize) -> Result<()> {
		mdb_result(unsafe { ffi::mdb_env_set_mapsize(self.raw, size) })
	}

	pub(crate) fn map_size(&self) -> Result<usize> {
		let mut info = MaybeUninit::<ffi::MDB_envinfo>::uninit();
		mdb_result(unsafe { ffi::mdb_env_info(self.raw, info.as_mut_ptr()) })?;
		Ok(unsafe { info.assume_init() }.me_mapsize)
	}

	pub(crate) fn sync(&self, force: bool) -> Result<()> {
		mdb_result(unsafe { ffi::mdb_env_sync(self.raw, force as c_int) })
	}

	/// Copy the environment into the existing directory `path`.
	pub(crate) fn copy(&self, path: &Path, compact: bool) -> Result<()> {
		let path = CString::new(path.as_os_str().as_bytes())?;
		let flags = if compact {
			ffi::MDB_CP_COMPACT as c_uint
		} else {
			0
		};
		mdb_result(unsafe { ffi::mdb_env_copy2(self.raw, path.as_ptr(), flags) })
	}
}

impl Drop for Environment {
	fn drop(&mut self) {
		unsafe { ffi::mdb_env_close(self.raw) };
	}
}

/// The OS page size, falling back to 4KiB when it cannot be queried.
pub(crate) fn page_size() -> usize {
	match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
		size if size > 0 => size as usize,
		_ => 4096,
	}
}

/// Round `size` up to a whole number of pages.
pub(crate) fn round_to_page(size: usize) -> usize {
	let page = page_size();
	size.div_ceil(page) * page
}

/// The map size after one growth step: half again, page aligned.
pub(crate) fn grown_map_size(current: usize) -> usize {
	round_to_page(current + current / 2)
}
