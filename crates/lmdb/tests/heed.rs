// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Data written through the forwarding layer reads back through heed, and
//! the other way round.

use heed::{Database, EnvOpenOptions, types::Bytes};
use reifydb_lmdb::{DatabaseFlags, Lmdb, LmdbConfig, PutFlags};
use reifydb_testing::tempdir::TempDir;

#[test]
fn test_heed_reads_our_writes() {
	let dir = TempDir::new().unwrap();

	{
		let lmdb = Lmdb::open(LmdbConfig::new(dir.path())).unwrap();
		lmdb.update(|txn| {
			let db = txn.db_ref(Some("items"), DatabaseFlags::CREATE)?;
			txn.put(db, b"alpha", b"one", PutFlags::empty())?;
			txn.put(db, b"beta", &[0u8; 4096], PutFlags::empty())?;
			txn.put(db, b"empty", b"", PutFlags::empty())
		})
		.unwrap();
	}

	let env = unsafe { EnvOpenOptions::new().max_dbs(16).open(dir.path()) }.unwrap();
	{
		let rtxn = env.read_txn().unwrap();
		let db: Database<Bytes, Bytes> = env.open_database(&rtxn, Some("items")).unwrap().unwrap();

		assert_eq!(db.get(&rtxn, b"alpha").unwrap(), Some(&b"one"[..]));
		assert_eq!(db.get(&rtxn, b"beta").unwrap(), Some(&[0u8; 4096][..]));
		assert_eq!(db.get(&rtxn, b"empty").unwrap(), Some(&b""[..]));
		assert_eq!(db.len(&rtxn).unwrap(), 3);
	}
	env.prepare_for_closing().wait();
}

#[test]
fn test_we_read_heed_writes() {
	let dir = TempDir::new().unwrap();

	{
		let env = unsafe { EnvOpenOptions::new().max_dbs(16).open(dir.path()) }.unwrap();
		let mut wtxn = env.write_txn().unwrap();
		let db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some("items")).unwrap();
		db.put(&mut wtxn, b"gamma", b"three").unwrap();
		wtxn.commit().unwrap();
		env.prepare_for_closing().wait();
	}

	let lmdb = Lmdb::open(LmdbConfig::read_only(dir.path())).unwrap();
	let value = lmdb
		.view(|txn| {
			let db = txn.db_ref(Some("items"), DatabaseFlags::empty())?;
			Ok(txn.get(db, b"gamma")?.to_vec())
		})
		.unwrap();
	assert_eq!(value, b"three".to_vec());
}
