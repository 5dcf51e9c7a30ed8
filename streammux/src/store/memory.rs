// SPDX-License-Identifier: Apache-2.0

use std::io::{Error, ErrorKind, Result};
use super::Store;

/// A [`Store`] over a growable in-memory byte vector. Writing past the end
/// extends the vector, filling any gap with zeros.
#[derive(Clone, Debug)]
pub struct MemoryStore {
	data: Vec<u8>,
	pos: u64,
	writable: bool,
	closed: bool,
}

impl Default for MemoryStore {
	fn default() -> Self { Self::new() }
}

impl From<Vec<u8>> for MemoryStore {
	fn from(data: Vec<u8>) -> Self {
		Self {
			data,
			pos: 0,
			writable: true,
			closed: false,
		}
	}
}

impl From<&[u8]> for MemoryStore {
	fn from(value: &[u8]) -> Self { value.to_vec().into() }
}

impl MemoryStore {
	/// Creates an empty, writable store.
	pub fn new() -> Self { Vec::new().into() }

	/// Creates a store of `len` zeroed bytes.
	pub fn zeroed(len: usize) -> Self { vec![0; len].into() }

	/// Creates a store which rejects writes and resizing.
	pub fn read_only(data: impl Into<Vec<u8>>) -> Self {
		Self { writable: false, ..Self::from(data.into()) }
	}

	/// Returns the stored bytes.
	pub fn as_slice(&self) -> &[u8] { &self.data }

	/// Returns `true` if the store was closed.
	pub fn is_closed(&self) -> bool { self.closed }

	/// Consumes the store, returning its bytes.
	pub fn into_inner(self) -> Vec<u8> { self.data }

	fn check_open(&self) -> Result<()> {
		if self.closed {
			Err(Error::new(ErrorKind::Other, "memory store is closed"))
		} else {
			Ok(())
		}
	}

	fn check_writable(&self) -> Result<()> {
		self.check_open()?;
		if self.writable {
			Ok(())
		} else {
			Err(Error::new(ErrorKind::Unsupported, "memory store is read-only"))
		}
	}

	fn index(pos: u64) -> Result<usize> {
		usize::try_from(pos).map_err(|_|
			Error::new(ErrorKind::InvalidInput, "position does not fit in memory")
		)
	}
}

impl Store for MemoryStore {
	fn len(&mut self) -> Result<u64> {
		self.check_open()?;
		Ok(self.data.len() as u64)
	}

	fn position(&mut self) -> Result<u64> {
		self.check_open()?;
		Ok(self.pos)
	}

	fn set_position(&mut self, pos: u64) -> Result<()> {
		self.check_open()?;
		self.pos = pos;
		Ok(())
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		self.check_open()?;
		let Some(data) = usize::try_from(self.pos)
			.ok()
			.and_then(|pos| self.data.get(pos..)) else {
			return Ok(0)
		};
		let count = buf.len().min(data.len());
		buf[..count].copy_from_slice(&data[..count]);
		self.pos += count as u64;
		Ok(count)
	}

	fn write(&mut self, buf: &[u8]) -> Result<usize> {
		self.check_writable()?;
		let start = Self::index(self.pos)?;
		let end = start.checked_add(buf.len()).ok_or_else(||
			Error::new(ErrorKind::InvalidInput, "write end overflows")
		)?;
		if end > self.data.len() {
			self.data.resize(end, 0);
		}
		self.data[start..end].copy_from_slice(buf);
		self.pos = end as u64;
		Ok(buf.len())
	}

	fn flush(&mut self) -> Result<()> {
		self.check_open()
	}

	fn set_len(&mut self, len: u64) -> Result<()> {
		self.check_writable()?;
		self.data.resize(Self::index(len)?, 0);
		Ok(())
	}

	fn close(&mut self) -> Result<()> {
		self.closed = true;
		Ok(())
	}

	fn can_read(&self) -> bool { !self.closed }

	fn can_write(&self) -> bool { !self.closed && self.writable }
}

#[cfg(test)]
mod test {
	use std::io::ErrorKind;
	use super::{MemoryStore, Store};

	#[test]
	fn write_past_end_fills_gap() {
		let mut store = MemoryStore::from(vec![1, 2]);
		store.set_position(4).unwrap();
		assert_eq!(store.write(&[9]).unwrap(), 1);
		assert_eq!(store.as_slice(), &[1, 2, 0, 0, 9]);
		assert_eq!(store.position().unwrap(), 5);
	}

	#[test]
	fn read_past_end_is_empty() {
		let mut store = MemoryStore::from(vec![1, 2, 3]);
		store.set_position(10).unwrap();
		let mut buf = [0; 4];
		assert_eq!(store.read(&mut buf).unwrap(), 0);
	}

	#[test]
	fn read_only_rejects_writes() {
		let mut store = MemoryStore::read_only(vec![0; 4]);
		assert!(store.can_read());
		assert!(!store.can_write());
		assert_eq!(store.write(&[1]).unwrap_err().kind(), ErrorKind::Unsupported);
		assert_eq!(store.set_len(1).unwrap_err().kind(), ErrorKind::Unsupported);
	}

	#[test]
	fn close_drops_capabilities() {
		let mut store = MemoryStore::zeroed(8);
		store.close().unwrap();
		store.close().unwrap();
		assert!(store.is_closed());
		assert!(!store.can_read());
		assert!(!store.can_write());
		assert!(store.len().is_err());
	}
}
