// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Background writer for the LMDB environment.
//!
//! A single thread owns every write transaction. Updates queued while a
//! batch runs are committed together in the next one.

use std::{
	any::Any,
	panic::{self, AssertUnwindSafe},
	sync::Arc,
};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, error, instrument};

use crate::{
	Error, ReadWriteTxn, Result,
	env::{Environment, grown_map_size},
};

/// A unit of work for the writer.
///
/// `run` may be called several times, each time in a fresh transaction;
/// `complete` is called exactly once with the final outcome.
pub(crate) trait Job: Send {
	fn run(&mut self, txn: &mut ReadWriteTxn<'_>) -> Result<()>;

	fn complete(self: Box<Self>, result: Result<()>);
}

/// An update closure together with the channel its caller waits on.
pub(crate) struct UpdateJob<F, R> {
	f: F,
	output: Option<R>,
	reply: Sender<Result<R>>,
}

impl<F, R> UpdateJob<F, R> {
	pub(crate) fn new(f: F, reply: Sender<Result<R>>) -> Self {
		Self {
			f,
			output: None,
			reply,
		}
	}
}

impl<F, R> Job for UpdateJob<F, R>
where
	F: FnMut(&mut ReadWriteTxn<'_>) -> Result<R> + Send,
	R: Send,
{
	fn run(&mut self, txn: &mut ReadWriteTxn<'_>) -> Result<()> {
		self.output = None;
		self.output = Some((self.f)(txn)?);
		Ok(())
	}

	fn complete(self: Box<Self>, result: Result<()>) {
		let UpdateJob {
			output,
			reply,
			..
		} = *self;
		let result = result.and_then(|()| output.ok_or(Error::Abort));
		let _ = reply.send(result);
	}
}

/// Commands for the background writer.
pub(crate) enum WriteCommand {
	Update(Box<dyn Job>),
	Shutdown,
}

/// Run the writer until shutdown or until every sender is gone.
pub(crate) fn run_writer(
	rx: Receiver<WriteCommand>,
	env: Arc<Environment>,
	resize: Arc<RwLock<()>>,
	batch_size: usize,
) {
	debug!(name: "lmdb_writer", batch_size, "writer thread started");

	let mut batch: Vec<Box<dyn Job>> = Vec::with_capacity(batch_size);

	while let Ok(cmd) = rx.recv() {
		match cmd {
			WriteCommand::Update(job) => {
				batch.push(job);
				if batch.len() >= batch_size || rx.is_empty() {
					run_batch(&env, &resize, &mut batch);
				}
			}
			WriteCommand::Shutdown => break,
		}
	}

	if !batch.is_empty() {
		run_batch(&env, &resize, &mut batch);
	}

	debug!(name: "lmdb_writer", "writer thread stopped");
}

enum Attempt {
	/// The transaction committed, or failed to, for every job alike.
	Finished(Result<()>),
	MapFull,
	/// The job at this index failed on its own.
	JobFailed(usize, Error),
}

/// Run `batch` until every job in it has been completed.
#[instrument(name = "lmdb::batch", level = "debug", skip_all, fields(jobs = batch.len()))]
pub(crate) fn run_batch(env: &Environment, resize: &RwLock<()>, batch: &mut Vec<Box<dyn Job>>) {
	while !batch.is_empty() {
		match attempt(env, batch) {
			Attempt::Finished(result) => {
				match &result {
					Ok(()) => debug!(jobs = batch.len(), "batch committed"),
					Err(err) => error!(err = %err, jobs = batch.len(), "batch commit failed"),
				}
				complete_all(batch, result);
			}
			Attempt::MapFull => {
				if let Err(err) = increase_size(env, resize) {
					complete_all(batch, Err(err));
				}
			}
			Attempt::JobFailed(index, err) => {
				debug!(index, err = %err, "update failed, rerunning the rest of the batch");
				let job = batch.remove(index);
				job.complete(Err(err));
			}
		}
	}
}

fn attempt(env: &Environment, batch: &mut [Box<dyn Job>]) -> Attempt {
	let mut txn = match ReadWriteTxn::begin(env) {
		Ok(txn) => txn,
		Err(err) => return Attempt::Finished(Err(err)),
	};

	for (index, job) in batch.iter_mut().enumerate() {
		match panic::catch_unwind(AssertUnwindSafe(|| job.run(&mut txn))) {
			Ok(Ok(())) => {}
			Ok(Err(err)) if err.is_map_full() => return Attempt::MapFull,
			Ok(Err(err)) => return Attempt::JobFailed(index, err),
			Err(payload) => return Attempt::JobFailed(index, Error::Panicked(panic_message(payload))),
		}
	}

	committed(txn.commit())
}

/// A commit that ran out of map space is retried like a job that did.
fn committed(result: Result<()>) -> Attempt {
	match result {
		Err(err) if err.is_map_full() => Attempt::MapFull,
		result => Attempt::Finished(result),
	}
}

fn complete_all(batch: &mut Vec<Box<dyn Job>>, result: Result<()>) {
	let mut jobs = batch.drain(..).peekable();
	while let Some(job) = jobs.next() {
		if jobs.peek().is_none() {
			job.complete(result);
			return;
		}
		job.complete(match &result {
			Ok(()) => Ok(()),
			Err(err) => Err(err.duplicate()),
		});
	}
}

/// Grow the memory map by half. Waits for running views and copies to finish
/// first.
#[instrument(name = "lmdb::resize", level = "debug", skip_all)]
fn increase_size(env: &Environment, resize: &RwLock<()>) -> Result<()> {
	let _guard = resize.write();

	let current = env.map_size()?;
	let size = grown_map_size(current);

	match env.set_map_size(size) {
		Ok(()) => {
			debug!(from = current, to = size, "map size increased");
			Ok(())
		}
		Err(err) => {
			error!(from = current, to = size, err = %err, "failed to increase map size");
			Err(err)
		}
	}
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
	if let Some(msg) = payload.downcast_ref::<&str>() {
		return msg.to_string();
	}
	match payload.downcast::<String>() {
		Ok(msg) => *msg,
		Err(_) => "update panicked".to_string(),
	}
}

#[cfg(test)]
pub mod tests {
	use crossbeam_channel::{Receiver, unbounded};
	use reifydb_testing::{logging, tempdir::temp_dir};

	use super::*;
	use crate::{DatabaseFlags, LmdbConfig, MdbError, PutFlags, env::page_size, txn::ReadOnlyTxn};

	fn job<F, R>(f: F) -> (Box<dyn Job>, Receiver<Result<R>>)
	where
		F: FnMut(&mut ReadWriteTxn<'_>) -> Result<R> + Send + 'static,
		R: Send + 'static,
	{
		let (tx, rx) = unbounded();
		(Box::new(UpdateJob::new(f, tx)), rx)
	}

	fn put(key: &'static [u8], val: &'static [u8]) -> (Box<dyn Job>, Receiver<Result<()>>) {
		job(move |txn| {
			let db = txn.db_ref(None, DatabaseFlags::empty())?;
			txn.put(db, key, val, PutFlags::empty())
		})
	}

	fn read(env: &Environment, key: &[u8]) -> Result<Option<Vec<u8>>> {
		let txn = ReadOnlyTxn::begin(env)?;
		let db = txn.db_ref(None, DatabaseFlags::empty())?;
		match txn.get(db, key) {
			Ok(val) => Ok(Some(val.to_vec())),
			Err(err) if err.is_not_found() => Ok(None),
			Err(err) => Err(err),
		}
	}

	#[test]
	fn test_batch_commits_all_jobs() {
		logging::init();
		temp_dir(|dir| -> Result<()> {
			let env = Environment::open(&LmdbConfig::new(dir))?;
			let resize = RwLock::new(());

			let (first, first_rx) = put(b"a", b"1");
			let (second, second_rx) = put(b"b", b"2");
			let mut batch = vec![first, second];
			run_batch(&env, &resize, &mut batch);

			assert!(batch.is_empty());
			first_rx.recv().unwrap()?;
			second_rx.recv().unwrap()?;
			assert_eq!(read(&env, b"a")?, Some(b"1".to_vec()));
			assert_eq!(read(&env, b"b")?, Some(b"2".to_vec()));
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_failed_job_is_isolated() {
		logging::init();
		temp_dir(|dir| -> Result<()> {
			let env = Environment::open(&LmdbConfig::new(dir))?;
			let resize = RwLock::new(());

			let (first, first_rx) = put(b"a", b"1");
			let (failing, failing_rx) = job(|txn| -> Result<()> {
				let db = txn.db_ref(None, DatabaseFlags::empty())?;
				txn.put(db, b"x", b"never", PutFlags::empty())?;
				Err(Error::Abort)
			});
			let (last, last_rx) = put(b"c", b"3");
			let mut batch = vec![first, failing, last];
			run_batch(&env, &resize, &mut batch);

			first_rx.recv().unwrap()?;
			last_rx.recv().unwrap()?;
			assert!(matches!(failing_rx.recv().unwrap(), Err(Error::Abort)));

			assert_eq!(read(&env, b"a")?, Some(b"1".to_vec()));
			assert_eq!(read(&env, b"c")?, Some(b"3".to_vec()));
			assert_eq!(read(&env, b"x")?, None);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_panicking_job_is_isolated() {
		logging::init();
		temp_dir(|dir| -> Result<()> {
			let env = Environment::open(&LmdbConfig::new(dir))?;
			let resize = RwLock::new(());

			let (panicking, panicking_rx) = job(|_txn| -> Result<()> { panic!("boom") });
			let (other, other_rx) = put(b"a", b"1");
			let mut batch = vec![panicking, other];
			run_batch(&env, &resize, &mut batch);

			match panicking_rx.recv().unwrap() {
				Err(Error::Panicked(msg)) => assert_eq!(msg, "boom"),
				other => panic!("unexpected result: {other:?}"),
			}
			other_rx.recv().unwrap()?;
			assert_eq!(read(&env, b"a")?, Some(b"1".to_vec()));
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_jobs_rerun_after_map_growth() {
		logging::init();
		temp_dir(|dir| -> Result<()> {
			let env = Environment::open(&LmdbConfig::new(dir).map_size(page_size() * 16))?;
			let resize = RwLock::new(());
			let before = env.map_size()?;

			let value = vec![7u8; page_size() * 32];
			let (big, big_rx) = job(move |txn| {
				let db = txn.db_ref(None, DatabaseFlags::empty())?;
				txn.put(db, b"big", &value, PutFlags::empty())
			});
			let mut batch = vec![big];
			run_batch(&env, &resize, &mut batch);

			big_rx.recv().unwrap()?;
			assert!(env.map_size()? > before);
			assert_eq!(read(&env, b"big")?.map(|v| v.len()), Some(page_size() * 32));
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_map_full_on_commit_is_retried() {
		assert!(matches!(committed(Err(Error::Mdb(MdbError::MapFull))), Attempt::MapFull));
		assert!(matches!(committed(Ok(())), Attempt::Finished(Ok(()))));
		assert!(matches!(
			committed(Err(Error::Mdb(MdbError::TxnFull))),
			Attempt::Finished(Err(Error::Mdb(MdbError::TxnFull)))
		));
	}

	#[test]
	fn test_shutdown_flushes_pending_jobs() {
		logging::init();
		temp_dir(|dir| -> Result<()> {
			let env = Arc::new(Environment::open(&LmdbConfig::new(dir))?);
			let resize = Arc::new(RwLock::new(()));
			let (tx, rx) = unbounded();

			let (first, first_rx) = put(b"a", b"1");
			let (second, second_rx) = put(b"b", b"2");
			tx.send(WriteCommand::Update(first)).unwrap();
			tx.send(WriteCommand::Update(second)).unwrap();
			tx.send(WriteCommand::Shutdown).unwrap();

			// batch size 8: nothing runs before the shutdown is seen
			run_writer(rx, env.clone(), resize, 8);

			first_rx.recv().unwrap()?;
			second_rx.recv().unwrap()?;
			assert_eq!(read(&env, b"b")?, Some(b"2".to_vec()));
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_panic_message() {
		assert_eq!(panic_message(Box::new("static")), "static");
		assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
		assert_eq!(panic_message(Box::new(42)), "update panicked");
	}
}
