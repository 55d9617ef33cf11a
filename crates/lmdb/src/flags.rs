// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Engine flag sets and cursor operations.
//!
//! Every value carries the engine's raw bits unchanged; see
//! <http://www.lmdb.tech/doc/group__mdb.html> for their meaning.

use std::{
	ffi::{CStr, c_uint},
	ops::{BitOr, BitOrAssign},
	ptr,
};

use reifydb_lmdb_shim::ffi;
use serde::{Deserialize, Serialize};

macro_rules! flag_set {
	(
		$(#[$meta:meta])*
		$name:ident { $($(#[$fmeta:meta])* $flag:ident = $value:expr,)* }
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(c_uint);

		impl $name {
			$($(#[$fmeta])* pub const $flag: Self = Self($value as c_uint);)*

			pub const fn empty() -> Self {
				Self(0)
			}

			pub const fn from_bits(bits: c_uint) -> Self {
				Self(bits)
			}

			pub const fn bits(self) -> c_uint {
				self.0
			}

			pub const fn contains(self, other: Self) -> bool {
				self.0 & other.0 == other.0
			}

			pub const fn without(self, other: Self) -> Self {
				Self(self.0 & !other.0)
			}
		}

		impl BitOr for $name {
			type Output = Self;

			fn bitor(self, rhs: Self) -> Self {
				Self(self.0 | rhs.0)
			}
		}

		impl BitOrAssign for $name {
			fn bitor_assign(&mut self, rhs: Self) {
				self.0 |= rhs.0;
			}
		}
	};
}

flag_set! {
	/// Flags for opening an environment.
	EnvironmentFlags {
		FIXED_MAP = ffi::MDB_FIXEDMAP,
		NO_SUB_DIR = ffi::MDB_NOSUBDIR,
		NO_SYNC = ffi::MDB_NOSYNC,
		READ_ONLY = ffi::MDB_RDONLY,
		NO_META_SYNC = ffi::MDB_NOMETASYNC,
		WRITE_MAP = ffi::MDB_WRITEMAP,
		MAP_ASYNC = ffi::MDB_MAPASYNC,
		/// Always added when opening.
		NO_TLS = ffi::MDB_NOTLS,
		NO_LOCK = ffi::MDB_NOLOCK,
		NO_READ_AHEAD = ffi::MDB_NORDAHEAD,
		NO_MEM_INIT = ffi::MDB_NOMEMINIT,
	}
}

flag_set! {
	/// Flags for opening a named database.
	DatabaseFlags {
		REVERSE_KEY = ffi::MDB_REVERSEKEY,
		DUP_SORT = ffi::MDB_DUPSORT,
		INTEGER_KEY = ffi::MDB_INTEGERKEY,
		DUP_FIXED = ffi::MDB_DUPFIXED,
		INTEGER_DUP = ffi::MDB_INTEGERDUP,
		REVERSE_DUP = ffi::MDB_REVERSEDUP,
		CREATE = ffi::MDB_CREATE,
	}
}

flag_set! {
	/// Flags for inserts and cursor deletes.
	PutFlags {
		NO_OVERWRITE = ffi::MDB_NOOVERWRITE,
		NO_DUP_DATA = ffi::MDB_NODUPDATA,
		CURRENT = ffi::MDB_CURRENT,
		RESERVE = ffi::MDB_RESERVE,
		APPEND = ffi::MDB_APPEND,
		APPEND_DUP = ffi::MDB_APPENDDUP,
	}
}

/// A cursor positioning operation.
///
/// The multiple-value operations are not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorOp(ffi::MDB_cursor_op);

impl CursorOp {
	/// Move to the start of the database.
	pub const FIRST: Self = Self(ffi::MDB_FIRST);
	/// DupSort only: move to the first value of the current key.
	pub const FIRST_DUP: Self = Self(ffi::MDB_FIRST_DUP);
	/// Move to the end of the database.
	pub const LAST: Self = Self(ffi::MDB_LAST);
	/// DupSort only: move to the last value of the current key.
	pub const LAST_DUP: Self = Self(ffi::MDB_LAST_DUP);
	/// No movement.
	pub const GET_CURRENT: Self = Self(ffi::MDB_GET_CURRENT);
	/// DupSort only: move to the given key and value.
	pub const GET_BOTH: Self = Self(ffi::MDB_GET_BOTH);
	/// DupSort only: move to the first value >= the given value of the given key.
	pub const GET_BOTH_RANGE: Self = Self(ffi::MDB_GET_BOTH_RANGE);
	/// Move to the given key. The key is not read back.
	pub const SET: Self = Self(ffi::MDB_SET);
	/// Move to the given key.
	pub const SET_KEY: Self = Self(ffi::MDB_SET_KEY);
	/// Move to the first key >= the given key.
	pub const SET_RANGE: Self = Self(ffi::MDB_SET_RANGE);
	pub const NEXT: Self = Self(ffi::MDB_NEXT);
	/// DupSort only: next value of the current key.
	pub const NEXT_DUP: Self = Self(ffi::MDB_NEXT_DUP);
	/// DupSort only: first value of the next key.
	pub const NEXT_NO_DUP: Self = Self(ffi::MDB_NEXT_NODUP);
	pub const PREV: Self = Self(ffi::MDB_PREV);
	/// DupSort only: previous value of the current key.
	pub const PREV_DUP: Self = Self(ffi::MDB_PREV_DUP);
	/// DupSort only: last value of the previous key.
	pub const PREV_NO_DUP: Self = Self(ffi::MDB_PREV_NODUP);

	pub const fn raw(self) -> ffi::MDB_cursor_op {
		self.0
	}
}

/// Version string of the linked engine.
pub fn version() -> &'static str {
	let ptr = unsafe { ffi::mdb_version(ptr::null_mut(), ptr::null_mut(), ptr::null_mut()) };
	if ptr.is_null() {
		return "";
	}
	unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or_default()
}
