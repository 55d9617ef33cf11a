// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::EnvironmentFlags;

/// Configuration for opening an [`crate::Lmdb`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmdbConfig {
	/// Directory holding the data and lock files, or the data file itself
	/// with [`EnvironmentFlags::NO_SUB_DIR`].
	pub path: PathBuf,
	/// Unix permissions used when creating the files.
	#[serde(default = "default_mode")]
	pub mode: u32,
	/// Also the number of views that may run at once.
	#[serde(default = "default_max_readers")]
	pub max_readers: u32,
	#[serde(default = "default_max_dbs")]
	pub max_dbs: u32,
	#[serde(default)]
	pub flags: EnvironmentFlags,
	/// Upper bound on the number of updates committed together.
	#[serde(default = "default_batch_size")]
	pub batch_size: usize,
	/// Initial map size in bytes. The engine default is kept when unset.
	#[serde(default)]
	pub map_size: Option<usize>,
}

fn default_mode() -> u32 {
	0o644
}

fn default_max_readers() -> u32 {
	126
}

fn default_max_dbs() -> u32 {
	16
}

fn default_batch_size() -> usize {
	16
}

impl LmdbConfig {
	pub fn new(path: impl AsRef<Path>) -> Self {
		Self {
			path: path.as_ref().to_path_buf(),
			mode: default_mode(),
			max_readers: default_max_readers(),
			max_dbs: default_max_dbs(),
			flags: EnvironmentFlags::empty(),
			batch_size: default_batch_size(),
			map_size: None,
		}
	}

	/// Memory-mapped writes without fsync on commit.
	///
	/// A system crash may lose the last transactions; call
	/// [`crate::Lmdb::sync`] to flush.
	pub fn fast(path: impl AsRef<Path>) -> Self {
		Self::new(path).flags(EnvironmentFlags::WRITE_MAP | EnvironmentFlags::NO_SYNC)
	}

	pub fn read_only(path: impl AsRef<Path>) -> Self {
		Self::new(path).flags(EnvironmentFlags::READ_ONLY)
	}

	pub fn mode(mut self, mode: u32) -> Self {
		self.mode = mode;
		self
	}

	pub fn max_readers(mut self, max_readers: u32) -> Self {
		self.max_readers = max_readers;
		self
	}

	pub fn max_dbs(mut self, max_dbs: u32) -> Self {
		self.max_dbs = max_dbs;
		self
	}

	pub fn flags(mut self, flags: EnvironmentFlags) -> Self {
		self.flags = flags;
		self
	}

	pub fn batch_size(mut self, batch_size: usize) -> Self {
		self.batch_size = batch_size;
		self
	}

	pub fn map_size(mut self, map_size: usize) -> Self {
		self.map_size = Some(map_size);
		self
	}

	pub fn is_read_only(&self) -> bool {
		self.flags.contains(EnvironmentFlags::READ_ONLY)
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = LmdbConfig::new("/tmp/db");
		assert_eq!(config.path, PathBuf::from("/tmp/db"));
		assert_eq!(config.mode, 0o644);
		assert_eq!(config.max_readers, 126);
		assert_eq!(config.max_dbs, 16);
		assert_eq!(config.flags, EnvironmentFlags::empty());
		assert_eq!(config.batch_size, 16);
		assert_eq!(config.map_size, None);
		assert!(!config.is_read_only());
	}

	#[test]
	fn test_presets() {
		let fast = LmdbConfig::fast("/tmp/db");
		assert!(fast.flags.contains(EnvironmentFlags::WRITE_MAP));
		assert!(fast.flags.contains(EnvironmentFlags::NO_SYNC));

		let read_only = LmdbConfig::read_only("/tmp/db");
		assert!(read_only.is_read_only());
	}

	#[test]
	fn test_builder() {
		let config = LmdbConfig::new("/tmp/db").max_readers(4).max_dbs(2).batch_size(1).map_size(1 << 20).mode(0o600);
		assert_eq!(config.max_readers, 4);
		assert_eq!(config.max_dbs, 2);
		assert_eq!(config.batch_size, 1);
		assert_eq!(config.map_size, Some(1 << 20));
		assert_eq!(config.mode, 0o600);
	}
}
