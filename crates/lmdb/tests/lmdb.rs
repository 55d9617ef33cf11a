// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	thread,
};

use reifydb_lmdb::{CursorOp, DatabaseFlags, DbRef, Error, Lmdb, LmdbConfig, PutFlags, Result};
use reifydb_testing::{logging, tempdir::temp_dir};

fn create_db(lmdb: &Lmdb, name: &'static str) -> Result<DbRef> {
	lmdb.update(move |txn| txn.db_ref(Some(name), DatabaseFlags::CREATE))
}

fn get(lmdb: &Lmdb, db: DbRef, key: &[u8]) -> Result<Option<Vec<u8>>> {
	lmdb.view(|txn| match txn.get(db, key) {
		Ok(val) => Ok(Some(val.to_vec())),
		Err(err) if err.is_not_found() => Ok(None),
		Err(err) => Err(err),
	})
}

#[test]
fn test_update_then_view() {
	logging::init();
	temp_dir(|dir| -> Result<()> {
		let lmdb = Lmdb::open(LmdbConfig::new(dir))?;
		let db = create_db(&lmdb, "items")?;

		lmdb.update(move |txn| txn.put(db, b"hello", b"world", PutFlags::empty()))?;

		assert_eq!(get(&lmdb, db, b"hello")?, Some(b"world".to_vec()));
		assert_eq!(get(&lmdb, db, b"missing")?, None);
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_update_returns_value() {
	logging::init();
	temp_dir(|dir| -> Result<()> {
		let lmdb = Lmdb::open(LmdbConfig::new(dir))?;
		let db = create_db(&lmdb, "counter")?;

		for _ in 0..3 {
			lmdb.update(move |txn| {
				let current = match txn.get(db, b"count") {
					Ok(val) => u64::from_be_bytes(val.try_into().map_err(Error::other)?),
					Err(err) if err.is_not_found() => 0,
					Err(err) => return Err(err),
				};
				txn.put(db, b"count", &(current + 1).to_be_bytes(), PutFlags::empty())
			})?;
		}

		let count = lmdb.update(move |txn| Ok(txn.get(db, b"count")?.to_vec()))?;
		assert_eq!(count, 3u64.to_be_bytes().to_vec());
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_abort_discards_changes() {
	logging::init();
	temp_dir(|dir| -> Result<()> {
		let lmdb = Lmdb::open(LmdbConfig::new(dir))?;
		let db = create_db(&lmdb, "items")?;

		let result = lmdb.update(move |txn| -> Result<()> {
			txn.put(db, b"key", b"value", PutFlags::empty())?;
			Err(Error::Abort)
		});
		assert!(matches!(result, Err(Error::Abort)));
		assert_eq!(get(&lmdb, db, b"key")?, None);
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_cursor_in_view() {
	logging::init();
	temp_dir(|dir| -> Result<()> {
		let lmdb = Lmdb::open(LmdbConfig::new(dir))?;
		let db = create_db(&lmdb, "items")?;

		lmdb.update(move |txn| {
			let mut cursor = txn.cursor_mut(db)?;
			for i in 0u8..10 {
				cursor.put(&[i], &[i * 2], PutFlags::APPEND)?;
			}
			Ok(())
		})?;

		let pairs = lmdb.view(|txn| {
			let mut cursor = txn.cursor(db)?;
			let mut pairs = Vec::new();
			let mut op = CursorOp::SET_RANGE;
			let mut key = Some(&[5u8][..]);
			loop {
				match cursor.move_and_get(op, key, None) {
					Ok((key, val)) => pairs.push((key[0], val[0])),
					Err(err) if err.is_not_found() => break,
					Err(err) => return Err(err),
				}
				op = CursorOp::NEXT;
				key = None;
			}
			Ok(pairs)
		})?;

		assert_eq!(pairs, vec![(5, 10), (6, 12), (7, 14), (8, 16), (9, 18)]);
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_read_only_rejects_updates() {
	logging::init();
	temp_dir(|dir| -> Result<()> {
		let db = {
			let lmdb = Lmdb::open(LmdbConfig::new(dir))?;
			let db = create_db(&lmdb, "items")?;
			lmdb.update(move |txn| txn.put(db, b"key", b"value", PutFlags::empty()))?;
			db
		};

		let lmdb = Lmdb::open(LmdbConfig::read_only(dir))?;
		assert!(lmdb.is_read_only());

		let result = lmdb.update(move |txn| txn.put(db, b"other", b"value", PutFlags::empty()));
		assert!(matches!(result, Err(Error::ReadOnly)));

		let value = lmdb.view(|txn| {
			let db = txn.db_ref(Some("items"), DatabaseFlags::empty())?;
			Ok(txn.get(db, b"key")?.to_vec())
		})?;
		assert_eq!(value, b"value".to_vec());
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_terminate() {
	logging::init();
	temp_dir(|dir| -> Result<()> {
		let lmdb = Lmdb::open(LmdbConfig::new(dir))?;
		let db = create_db(&lmdb, "items")?;
		lmdb.update(move |txn| txn.put(db, b"key", b"value", PutFlags::empty()))?;

		lmdb.terminate();
		lmdb.terminate();

		let result = lmdb.update(move |txn| txn.put(db, b"other", b"value", PutFlags::empty()));
		assert!(matches!(result, Err(Error::Terminated)));

		assert_eq!(get(&lmdb, db, b"key")?, Some(b"value".to_vec()));
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_reopen_keeps_data() {
	logging::init();
	temp_dir(|dir| -> Result<()> {
		{
			let lmdb = Lmdb::open(LmdbConfig::fast(dir))?;
			let db = create_db(&lmdb, "items")?;
			lmdb.update(move |txn| txn.put(db, b"key", b"value", PutFlags::empty()))?;
			lmdb.sync(true)?;
		}

		let lmdb = Lmdb::open(LmdbConfig::new(dir))?;
		let value = lmdb.view(|txn| {
			let db = txn.db_ref(Some("items"), DatabaseFlags::empty())?;
			Ok(txn.get(db, b"key")?.to_vec())
		})?;
		assert_eq!(value, b"value".to_vec());
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_copy() {
	logging::init();
	temp_dir(|dir| -> Result<()> {
		let source = dir.join("source");
		let target = dir.join("target");
		std::fs::create_dir(&source)?;
		std::fs::create_dir(&target)?;

		{
			let lmdb = Lmdb::open(LmdbConfig::new(&source))?;
			let db = create_db(&lmdb, "items")?;
			lmdb.update(move |txn| txn.put(db, b"key", b"value", PutFlags::empty()))?;
			lmdb.copy(&target, true)?;
		}

		let copy = Lmdb::open(LmdbConfig::read_only(&target))?;
		let value = copy.view(|txn| {
			let db = txn.db_ref(Some("items"), DatabaseFlags::empty())?;
			Ok(txn.get(db, b"key")?.to_vec())
		})?;
		assert_eq!(value, b"value".to_vec());
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_views_beyond_reader_limit_wait() {
	logging::init();
	temp_dir(|dir| -> Result<()> {
		let lmdb = Lmdb::open(LmdbConfig::new(dir).max_readers(2))?;
		let db = create_db(&lmdb, "items")?;
		lmdb.update(move |txn| txn.put(db, b"key", b"value", PutFlags::empty()))?;

		let active = Arc::new(AtomicUsize::new(0));
		let peak = Arc::new(AtomicUsize::new(0));

		let handles: Vec<_> = (0..8)
			.map(|_| {
				let lmdb = lmdb.clone();
				let active = active.clone();
				let peak = peak.clone();
				thread::spawn(move || {
					lmdb.view(|txn| {
						let now = active.fetch_add(1, Ordering::SeqCst) + 1;
						peak.fetch_max(now, Ordering::SeqCst);
						assert_eq!(txn.get(db, b"key")?, b"value");
						thread::yield_now();
						active.fetch_sub(1, Ordering::SeqCst);
						Ok(())
					})
				})
			})
			.collect();

		for handle in handles {
			handle.join().unwrap()?;
		}
		assert!(peak.load(Ordering::SeqCst) <= 2);
		Ok(())
	})
	.unwrap();
}
