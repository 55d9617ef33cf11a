// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ffi::NulError, io, result};

use reifydb_lmdb_shim::{MdbError, check};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A status code returned by the engine, unchanged.
	#[error(transparent)]
	Mdb(#[from] MdbError),

	#[error("cannot update: environment has been opened read-only")]
	ReadOnly,

	#[error("lmdb writer is terminated")]
	Terminated,

	/// Returned from an update closure to abort its transaction.
	#[error("transaction aborted")]
	Abort,

	#[error("update panicked: {0}")]
	Panicked(String),

	#[error("invalid path or name: {0}")]
	InvalidPath(#[from] NulError),

	#[error("{0}")]
	Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
	pub fn other<E>(err: E) -> Self
	where
		E: Into<Box<dyn std::error::Error + Send + Sync>>,
	{
		Self::Other(err.into())
	}

	/// The engine error this wraps, if any.
	pub fn mdb(&self) -> Option<MdbError> {
		match self {
			Self::Mdb(err) => Some(*err),
			_ => None,
		}
	}

	pub fn is_not_found(&self) -> bool {
		self.mdb() == Some(MdbError::NotFound)
	}

	pub fn is_key_exist(&self) -> bool {
		self.mdb() == Some(MdbError::KeyExist)
	}

	pub(crate) fn is_map_full(&self) -> bool {
		self.mdb() == Some(MdbError::MapFull)
	}

	/// A copy for handing one failure to several waiting updates. Foreign
	/// errors keep only their message.
	pub(crate) fn duplicate(&self) -> Self {
		match self {
			Self::Mdb(err) => Self::Mdb(*err),
			Self::ReadOnly => Self::ReadOnly,
			Self::Terminated => Self::Terminated,
			Self::Abort => Self::Abort,
			Self::Panicked(msg) => Self::Panicked(msg.clone()),
			Self::InvalidPath(err) => Self::InvalidPath(err.clone()),
			Self::Other(err) => Self::Other(err.to_string().into()),
		}
	}
}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Self {
		Self::Other(Box::new(err))
	}
}

/// Check an engine status code.
#[inline]
pub(crate) fn mdb_result(code: std::ffi::c_int) -> Result<()> {
	check(code).map_err(Error::Mdb)
}
