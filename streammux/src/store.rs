// SPDX-License-Identifier: Apache-2.0

//! Backing stores: seekable byte sequences that a [`Muxer`](crate::Muxer) can
//! partition into views.

mod file;
mod io;
mod memory;

pub use file::*;
pub use io::*;
pub use memory::*;

use std::io::Result;

/// A seekable, readable and/or writable byte sequence with a single physical
/// cursor. Only the muxer owning a store calls into it, always under its lock.
///
/// Capability is reported live through [`can_read`](Self::can_read) and
/// [`can_write`](Self::can_write); a store may lose capabilities over its
/// lifetime, after [`close`](Self::close) for example.
pub trait Store {
	/// Returns the current length in bytes.
	fn len(&mut self) -> Result<u64>;

	/// Returns `true` if the store has no bytes.
	fn is_empty(&mut self) -> Result<bool> {
		Ok(self.len()? == 0)
	}

	/// Returns the absolute cursor position.
	fn position(&mut self) -> Result<u64>;

	/// Moves the cursor to an absolute position. Positions past the end are
	/// allowed; reading there produces no bytes, writing there extends the store.
	fn set_position(&mut self, pos: u64) -> Result<()>;

	/// Reads up to `buf.len()` bytes at the cursor, advancing it by the number of
	/// bytes read.
	fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

	/// Writes up to `buf.len()` bytes at the cursor, advancing it by the number
	/// of bytes written.
	fn write(&mut self, buf: &[u8]) -> Result<usize>;

	/// Writes any buffered data to its final target.
	fn flush(&mut self) -> Result<()>;

	/// Truncates or extends the store to `len` bytes.
	fn set_len(&mut self, len: u64) -> Result<()>;

	/// Releases the store. Closing is idempotent.
	fn close(&mut self) -> Result<()>;

	fn can_read(&self) -> bool;

	fn can_write(&self) -> bool;
}

macro_rules! forward_store {
	($($ty:ty),+) => {$(
		impl<T: Store + ?Sized> Store for $ty {
			#[inline]
			fn len(&mut self) -> Result<u64> { (**self).len() }
			#[inline]
			fn position(&mut self) -> Result<u64> { (**self).position() }
			#[inline]
			fn set_position(&mut self, pos: u64) -> Result<()> { (**self).set_position(pos) }
			#[inline]
			fn read(&mut self, buf: &mut [u8]) -> Result<usize> { (**self).read(buf) }
			#[inline]
			fn write(&mut self, buf: &[u8]) -> Result<usize> { (**self).write(buf) }
			#[inline]
			fn flush(&mut self) -> Result<()> { (**self).flush() }
			#[inline]
			fn set_len(&mut self, len: u64) -> Result<()> { (**self).set_len(len) }
			#[inline]
			fn close(&mut self) -> Result<()> { (**self).close() }
			#[inline]
			fn can_read(&self) -> bool { (**self).can_read() }
			#[inline]
			fn can_write(&self) -> bool { (**self).can_write() }
		}
	)+};
}

forward_store! { &mut T, Box<T> }
