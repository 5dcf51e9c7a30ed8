// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Read, Result, Seek, SeekFrom, Write};
use super::Store;

/// A [`Store`] over any [`Read`] + [`Write`] + [`Seek`] type. The length is
/// found by seeking to the end and back, and resizing is not supported.
pub struct IoStore<T: Read + Write + Seek> {
	inner: Option<T>,
	readable: bool,
	writable: bool,
}

impl<T: Read + Write + Seek> From<T> for IoStore<T> {
	fn from(inner: T) -> Self {
		Self {
			inner: Some(inner),
			readable: true,
			writable: true,
		}
	}
}

impl<T: Read + Write + Seek> IoStore<T> {
	/// Restricts the capabilities reported by the store.
	pub fn with_capabilities(mut self, readable: bool, writable: bool) -> Self {
		self.readable = readable;
		self.writable = writable;
		self
	}

	/// Returns the wrapped value, or `None` if the store was closed.
	pub fn into_inner(self) -> Option<T> { self.inner }

	fn inner(&mut self) -> Result<&mut T> {
		self.inner.as_mut().ok_or_else(|| io::Error::other("store is closed"))
	}
}

impl<T: Read + Write + Seek> Store for IoStore<T> {
	fn len(&mut self) -> Result<u64> {
		let inner = self.inner()?;
		let pos = inner.stream_position()?;
		let len = inner.seek(SeekFrom::End(0))?;

		if pos != len {
			inner.seek(SeekFrom::Start(pos))?;
		}

		Ok(len)
	}

	fn position(&mut self) -> Result<u64> {
		self.inner()?.stream_position()
	}

	fn set_position(&mut self, pos: u64) -> Result<()> {
		self.inner()?.seek(SeekFrom::Start(pos))?;
		Ok(())
	}

	fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		if !self.readable {
			return Err(io::ErrorKind::Unsupported.into())
		}
		self.inner()?.read(buf)
	}

	fn write(&mut self, buf: &[u8]) -> Result<usize> {
		if !self.writable {
			return Err(io::ErrorKind::Unsupported.into())
		}
		self.inner()?.write(buf)
	}

	fn flush(&mut self) -> Result<()> {
		self.inner()?.flush()
	}

	fn set_len(&mut self, _len: u64) -> Result<()> {
		Err(io::Error::new(io::ErrorKind::Unsupported, "resizing requires a concrete store"))
	}

	/// Flushes, then drops the wrapped value.
	fn close(&mut self) -> Result<()> {
		if let Some(mut inner) = self.inner.take() {
			inner.flush()?;
		}
		Ok(())
	}

	fn can_read(&self) -> bool { self.inner.is_some() && self.readable }

	fn can_write(&self) -> bool { self.inner.is_some() && self.writable }
}
