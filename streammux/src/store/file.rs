// SPDX-License-Identifier: Apache-2.0

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Result, Seek, SeekFrom, Write};
use std::path::Path;
use super::Store;

/// A [`Store`] over a [file](File). Files don't report the mode they were
/// opened with, so capabilities are declared when the store is created.
#[derive(Debug)]
pub struct FileStore {
	file: Option<File>,
	readable: bool,
	writable: bool,
}

impl FileStore {
	/// Opens a file for reading only.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::new(File::open(path)?, true, false))
	}

	/// Opens a file for reading and writing, creating it if it doesn't exist.
	/// Existing contents are kept.
	pub fn open_rw<P: AsRef<Path>>(path: P) -> Result<Self> {
		let file = OpenOptions::new()
			.read(true)
			.write(true)
			.create(true)
			.truncate(false)
			.open(path)?;
		Ok(Self::new(file, true, true))
	}

	/// Wraps an open file, declaring its capabilities.
	pub fn new(file: File, readable: bool, writable: bool) -> Self {
		Self {
			file: Some(file),
			readable,
			writable,
		}
	}

	/// Returns the wrapped file, or `None` if the store was closed.
	pub fn into_inner(self) -> Option<File> { self.file }

	fn file(&mut self) -> Result<&mut File> {
		self.file.as_mut().ok_or_else(|| io::Error::other("file store is closed"))
	}
}

impl From<File> for FileStore {
	/// Wraps a file, assuming it was opened for reading and writing.
	fn from(value: File) -> Self {
		Self::new(value, true, true)
	}
}

impl Store for FileStore {
	fn len(&mut self) -> Result<u64> {
		Ok(self.file()?.metadata()?.len())
	}

	fn position(&mut self) -> Result<u64> {
		self.file()?.stream_position()
	}

	fn set_position(&mut self, pos: u64) -> Result<()> {
		self.file()?.seek(SeekFrom::Start(pos))?;
		Ok(())
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		self.file()?.read(buf)
	}

	fn write(&mut self, buf: &[u8]) -> Result<usize> {
		self.file()?.write(buf)
	}

	fn flush(&mut self) -> Result<()> {
		self.file()?.flush()
	}

	fn set_len(&mut self, len: u64) -> Result<()> {
		self.file()?.set_len(len)
	}

	/// Syncs the file to disk, then closes it by letting it fall out of scope.
	fn close(&mut self) -> Result<()> {
		if let Some(file) = self.file.take() {
			if self.writable {
				file.sync_all()?;
			}
		}
		Ok(())
	}

	fn can_read(&self) -> bool { self.file.is_some() && self.readable }

	fn can_write(&self) -> bool { self.file.is_some() && self.writable }
}
