// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	path::Path,
	sync::Arc,
	thread::{self, JoinHandle},
};

use crossbeam_channel::{Sender, bounded, unbounded};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, instrument};

use crate::{
	Error, LmdbConfig, ReadOnlyTxn, ReadWriteTxn, Result,
	env::Environment,
	readers::ReaderPool,
	writer::{UpdateJob, WriteCommand, run_writer},
};

/// A handle to an open LMDB environment.
///
/// Cheap to clone; all clones share one environment and one writer thread.
#[derive(Clone)]
pub struct Lmdb {
	inner: Arc<LmdbInner>,
}

struct LmdbInner {
	env: Arc<Environment>,
	/// Held shared by views, exclusively while the map is resized.
	resize: Arc<RwLock<()>>,
	readers: ReaderPool,
	/// `None` for read-only environments.
	writer: Option<Sender<WriteCommand>>,
	writer_thread: Mutex<Option<JoinHandle<()>>>,
}

impl LmdbInner {
	fn terminate(&self) {
		if let Some(writer) = &self.writer {
			let _ = writer.send(WriteCommand::Shutdown);
		}

		let handle = self.writer_thread.lock().take();
		if let Some(handle) = handle {
			// an update closure calling terminate must not join its own thread
			if handle.thread().id() != thread::current().id() {
				let _ = handle.join();
			}
		}
	}
}

impl Drop for LmdbInner {
	fn drop(&mut self) {
		self.terminate();
	}
}

impl Lmdb {
	/// Open the environment described by `config`.
	///
	/// Unless the environment is read-only this also starts the writer
	/// thread.
	#[instrument(name = "lmdb::open", level = "debug", skip(config), fields(
		path = %config.path.display(),
		read_only = config.is_read_only(),
		batch_size = config.batch_size
	))]
	pub fn open(config: LmdbConfig) -> Result<Self> {
		let env = Arc::new(Environment::open(&config)?);
		let resize = Arc::new(RwLock::new(()));
		let readers = ReaderPool::new(config.max_readers as usize);

		let (writer, writer_thread) = if env.is_read_only() {
			(None, None)
		} else {
			let (sender, receiver) = unbounded();
			let batch_size = config.batch_size.max(1);

			let handle = thread::Builder::new().name("lmdb-writer".to_string()).spawn({
				let env = env.clone();
				let resize = resize.clone();
				move || run_writer(receiver, env, resize, batch_size)
			})?;

			(Some(sender), Some(handle))
		};

		debug!("lmdb opened");

		Ok(Self {
			inner: Arc::new(LmdbInner {
				env,
				resize,
				readers,
				writer,
				writer_thread: Mutex::new(writer_thread),
			}),
		})
	}

	/// Run `f` in a read-only transaction on the calling thread.
	///
	/// The transaction is aborted once `f` returns. Must not be called from
	/// inside [`Lmdb::update`] or another view.
	pub fn view<F, R>(&self, f: F) -> Result<R>
	where
		F: FnOnce(&ReadOnlyTxn<'_>) -> Result<R>,
	{
		let _resize = (!self.inner.env.is_read_only()).then(|| self.inner.resize.read());
		let _token = self.inner.readers.acquire()?;

		let txn = ReadOnlyTxn::begin(&self.inner.env)?;
		f(&txn)
	}

	/// Run `f` in a read-write transaction on the writer thread and wait for
	/// the result.
	///
	/// `f` may be batched with concurrent updates into one commit and may be
	/// run several times before it commits, so it must not have side effects
	/// outside the transaction. Returning an error aborts only this update;
	/// [`Error::Abort`] does so without reporting anything else. Must not be
	/// called from inside a view or another update.
	#[instrument(name = "lmdb::update", level = "trace", skip_all)]
	pub fn update<F, R>(&self, f: F) -> Result<R>
	where
		F: FnMut(&mut ReadWriteTxn<'_>) -> Result<R> + Send + 'static,
		R: Send + 'static,
	{
		let writer = self.inner.writer.as_ref().ok_or(Error::ReadOnly)?;

		let (reply, response) = bounded(1);
		writer.send(WriteCommand::Update(Box::new(UpdateJob::new(f, reply)))).map_err(|_| Error::Terminated)?;

		response.recv().map_err(|_| Error::Terminated)?
	}

	/// Flush buffers to disk. `force` syncs even with
	/// [`crate::EnvironmentFlags::NO_SYNC`].
	pub fn sync(&self, force: bool) -> Result<()> {
		self.inner.env.sync(force)
	}

	/// Write a consistent copy to the existing directory `path`.
	///
	/// The copy reads through its own transaction, so it holds off map growth
	/// and takes a reader slot the same way a view does. Must not be called
	/// from inside a view or an update.
	#[instrument(name = "lmdb::copy", level = "debug", skip_all, fields(path = %path.as_ref().display(), compact = compact))]
	pub fn copy(&self, path: impl AsRef<Path>, compact: bool) -> Result<()> {
		let _resize = (!self.inner.env.is_read_only()).then(|| self.inner.resize.read());
		let _token = self.inner.readers.acquire()?;

		self.inner.env.copy(path.as_ref(), compact)
	}

	pub fn map_size(&self) -> Result<usize> {
		self.inner.env.map_size()
	}

	pub fn is_read_only(&self) -> bool {
		self.inner.env.is_read_only()
	}

	/// Stop the writer thread. Pending updates still commit; later ones fail
	/// with [`Error::Terminated`]. Views keep working.
	#[instrument(name = "lmdb::terminate", level = "debug", skip(self))]
	pub fn terminate(&self) {
		self.inner.terminate();
	}
}
