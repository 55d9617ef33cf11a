// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::{Error, Result};

/// Permits for concurrent read transactions.
///
/// Holds one token per reader slot, so views queue up here instead of running
/// the engine out of slots.
pub(crate) struct ReaderPool {
	tx: Sender<()>,
	rx: Receiver<()>,
}

impl ReaderPool {
	pub(crate) fn new(size: usize) -> Self {
		let (tx, rx) = bounded(size);
		for _ in 0..size {
			let _ = tx.try_send(());
		}
		Self {
			tx,
			rx,
		}
	}

	/// Block until a token is free.
	pub(crate) fn acquire(&self) -> Result<ReaderToken<'_>> {
		self.rx.recv().map_err(|_| Error::Terminated)?;
		Ok(ReaderToken {
			pool: self,
		})
	}

	#[cfg(test)]
	pub(crate) fn available(&self) -> usize {
		self.rx.len()
	}
}

/// Returned to the pool on drop.
pub(crate) struct ReaderToken<'a> {
	pool: &'a ReaderPool,
}

impl Drop for ReaderToken<'_> {
	fn drop(&mut self) {
		let _ = self.pool.tx.try_send(());
	}
}
