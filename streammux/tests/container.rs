// SPDX-License-Identifier: Apache-2.0

//! A length-prefixed container: a record count, then each record as a size
//! followed by its payload. One view walks the size prefixes while separate
//! views read payloads in place.

use std::io::{Read, Write};
use pretty_assertions::{assert_eq, assert_str_eq};
use streammux::{ErrorKind, Extent, MemoryStore, Muxer, Result};
use streammux::streams::{SeekableExt, Stream};

fn payload(index: usize) -> String {
	format!("<record index=\"{index}\">{}</record>", "x".repeat(index * 7 % 23))
}

fn build(count: usize) -> Result<MemoryStore> {
	let muxer = Muxer::leave_open(MemoryStore::new());
	let mut full = muxer.create_default()?;
	full.write_all(&(count as i32).to_le_bytes())?;
	for index in 0..count {
		let payload = payload(index);
		full.write_all(&(payload.len() as i64).to_le_bytes())?;
		full.write_all(payload.as_bytes())?;
	}
	full.close()?;
	Ok(muxer.dispose()?.expect("store is left open"))
}

fn read_i32(view: &mut impl Read) -> Result<i32> {
	let mut buf = [0; 4];
	view.read_exact(&mut buf)?;
	Ok(i32::from_le_bytes(buf))
}

fn read_i64(view: &mut impl Read) -> Result<i64> {
	let mut buf = [0; 8];
	view.read_exact(&mut buf)?;
	Ok(i64::from_le_bytes(buf))
}

#[test]
fn read_every_other_record() -> Result {
	let muxer = Muxer::new(build(31)?);
	let mut index = muxer.create(true, false)?;
	let count = read_i32(&mut index)? as usize;
	assert_eq!(count, 31);

	let mut base = 4;
	let mut read = 0;
	for z in 0..count {
		let size = read_i64(&mut index)? as u64;
		base += 8;
		index.seek_forward(size)?;
		let after_skip = index.position()?;

		if z % 2 == 0 {
			let mut record = muxer.create_window(true, false, base, Extent::Fixed(size))?;
			let mut text = String::new();
			record.read_to_string(&mut text)?;
			assert_str_eq!(text, payload(z));
			read += 1;
		}

		assert_eq!(index.position()?, after_skip, "payload views must not move the index view");
		base += size;
	}

	assert_eq!(read, 16);
	assert_eq!(index.position()?, muxer.len()?);
	Ok(())
}

#[test]
fn oversized_record_window() -> Result {
	let muxer = Muxer::new(build(3)?);
	let len = muxer.len()?;
	let first = payload(0).len() as u64;

	// oversizing a window in the middle reads into the next record
	let mut record = muxer.create_window(true, false, 12, Extent::Fixed(first + 8))?;
	let mut bytes = Vec::new();
	record.read_to_end(&mut bytes)?;
	assert_eq!(&bytes[..first as usize], payload(0).as_bytes());
	assert_eq!(&bytes[first as usize..], &(payload(1).len() as i64).to_le_bytes());

	// oversizing the last record can't fit the store
	let last = payload(2).len() as u64;
	let err = muxer.create_window(true, false, len - last, Extent::Fixed(last + 40)).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::OutOfRange);
	Ok(())
}
