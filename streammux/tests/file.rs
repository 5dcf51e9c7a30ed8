// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use pretty_assertions::assert_eq;
use tempfile::{NamedTempFile, tempfile};
use streammux::{ErrorKind, Extent, FileStore, IoStore, Muxer, Result};
use crate::common::pattern;

mod common;

#[test]
fn file_views() -> Result {
	let mut file = tempfile()?;
	file.write_all(&pattern(4096))?;

	let muxer = Muxer::leave_open(FileStore::from(file));
	let mut head = muxer.create_window(true, true, 0, Extent::Fixed(16))?;
	let mut tail = muxer.create_window(true, false, 4000, Extent::ToEnd)?;
	head.write(b"file header....!")?;

	let mut buf = vec![0; 200];
	assert_eq!(tail.read(&mut buf)?, 96);
	assert_eq!(&buf[..96], &pattern(4096)[4000..]);

	let mut full = muxer.create_default()?;
	full.set_len(8192)?;
	assert_eq!(tail.len()?, 4192);

	let store = muxer.dispose()?.expect("store is left open");
	let mut file = store.into_inner().expect("file should still be open");
	assert_eq!(file.metadata()?.len(), 8192);
	let mut header = [0; 16];
	file.seek(SeekFrom::Start(0))?;
	file.read_exact(&mut header)?;
	assert_eq!(&header, b"file header....!");
	Ok(())
}

#[test]
fn read_only_file() -> Result {
	let mut temp = NamedTempFile::new()?;
	temp.write_all(b"read only")?;

	let muxer = Muxer::new(FileStore::open(temp.path())?);
	let mut view = muxer.create_default()?;
	assert!(view.can_read());
	assert!(!view.can_write());
	assert_eq!(view.write(b"x").unwrap_err().kind(), ErrorKind::ReadOnly);
	assert_eq!(view.set_len(0).unwrap_err().kind(), ErrorKind::ReadOnly);

	let mut text = String::new();
	view.read_to_string(&mut text)?;
	assert_eq!(text, "read only");
	Ok(())
}

#[test]
fn file_is_closed_on_dispose() -> Result {
	let temp = NamedTempFile::new()?;
	let muxer = Muxer::new(FileStore::open_rw(temp.path())?);
	muxer.create_default()?.write(b"synced")?;
	assert!(muxer.dispose()?.is_none());

	let mut text = String::new();
	File::open(temp.path())?.read_to_string(&mut text)?;
	assert_eq!(text, "synced");
	Ok(())
}

#[test]
fn io_store_over_cursor() -> Result {
	let muxer = Muxer::leave_open(IoStore::from(Cursor::new(pattern(64))));
	assert_eq!(muxer.len()?, 64);
	let mut view = muxer.create_window(true, true, 32, Extent::Fixed(32))?;
	view.write(&[0xEE; 8])?;
	let mut buf = [0; 8];
	view.read(&mut buf)?;
	assert_eq!(&buf, &pattern(64)[40..48]);

	let mut full = muxer.create_default()?;
	assert_eq!(full.set_len(10).unwrap_err().kind(), ErrorKind::Io);
	assert_eq!(muxer.len()?, 64);

	let cursor = muxer.dispose()?.and_then(IoStore::into_inner).expect("cursor should be handed back");
	assert_eq!(&cursor.get_ref()[32..40], &[0xEE; 8]);
	Ok(())
}

#[test]
fn io_store_capabilities() -> Result {
	let store = IoStore::from(Cursor::new(vec![0; 8])).with_capabilities(true, false);
	let muxer = Muxer::new(store);
	assert_eq!(muxer.write_at(b"x", 0).unwrap_err().kind(), ErrorKind::Unsupported);
	assert!(!muxer.create_default()?.can_write());
	Ok(())
}
