// SPDX-License-Identifier: Apache-2.0

//! [`std::io`] traits for views, so they can be handed to generic readers and
//! writers.

use std::io;
use std::io::{Read, Seek, SeekFrom, Write};
use crate::store::Store;
use crate::view::View;

impl<S: Store> Read for View<S> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		Ok(View::read(self, buf)?)
	}
}

impl<S: Store> Write for View<S> {
	/// Bytes committed before a failure are reported as a short write; the error
	/// is only returned when nothing was written.
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		match self.write_committed(buf) {
			(0, Err(error)) => Err(error.into()),
			(written, _) => Ok(written),
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(View::flush(self)?)
	}
}

impl<S: Store> Seek for View<S> {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		Ok(View::seek(self, pos.into())?)
	}

	fn stream_position(&mut self) -> io::Result<u64> {
		Ok(self.position()?)
	}
}
