// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Weak};
use all_asserts::debug_assert_le;
use tracing::debug;
use crate::error::{Error, Operation, OutOfBounds, Result};
use crate::error::Operation::{Flush, Len, Read, Seek, SetLen, SetPosition, Write};
use crate::muxer::Inner;
use crate::store::Store;
use crate::streams::{Seekable, SeekOffset, Stream};

/// The length of a view.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Extent {
	/// A fixed number of bytes.
	Fixed(u64),
	/// Extends to the current end of the store, tracking it as the store is
	/// resized.
	#[default]
	ToEnd,
}

impl Extent {
	/// Returns `true` if the extent is [`ToEnd`](Self::ToEnd).
	pub fn is_to_end(&self) -> bool {
		matches!(self, Self::ToEnd)
	}
}

/// The access a view was created with. A view never has more access than its
/// store currently allows.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Access {
	pub read: bool,
	pub write: bool,
}

impl Access {
	pub const NONE: Self = Self::new(false, false);
	pub const READ: Self = Self::new(true, false);
	pub const WRITE: Self = Self::new(false, true);
	pub const READ_WRITE: Self = Self::new(true, true);

	pub const fn new(read: bool, write: bool) -> Self {
		Self { read, write }
	}
}

/// An independently positioned window onto a [`Muxer`](crate::Muxer)'s store.
///
/// Positions are logical, relative to the start of the window; reads and writes
/// are translated to the absolute offset `offset + position` and carried out
/// under the muxer's lock. Views know nothing of each other, so seeking or
/// writing in one never moves another's position, even when they overlap.
///
/// Once closed, every operation except [`close`](Stream::close) fails with
/// [`Closed`](crate::ErrorKind::Closed). Views close when dropped.
pub struct View<S: Store> {
	muxer: Weak<Inner<S>>,
	offset: u64,
	extent: Extent,
	access: Access,
	pos: u64,
	closed: bool,
}

impl<S: Store> Debug for View<S> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("View")
			.field("offset", &self.offset)
			.field("extent", &self.extent)
			.field("access", &self.access)
			.field("pos", &self.pos)
			.field("closed", &self.closed)
			.finish_non_exhaustive()
	}
}

impl<S: Store> View<S> {
	pub(crate) fn new(muxer: Weak<Inner<S>>, offset: u64, extent: Extent, access: Access) -> Self {
		Self {
			muxer,
			offset,
			extent,
			access,
			pos: 0,
			closed: false,
		}
	}

	/// Returns the absolute offset of the window's start in the store.
	pub fn offset(&self) -> u64 { self.offset }

	/// Returns the declared extent.
	pub fn extent(&self) -> Extent { self.extent }

	/// Returns the access the view was created with, regardless of what the store
	/// currently allows.
	pub fn access(&self) -> Access { self.access }

	/// Returns `true` if this is a full-range view, starting at the beginning of
	/// the store and extending to its end.
	pub fn is_full_range(&self) -> bool {
		self.offset == 0 && self.extent.is_to_end()
	}

	/// Returns `true` if the view is open, was created readable, and its store is
	/// still open and readable.
	pub fn can_read(&self) -> bool {
		self.access.read && self.muxer(Read).and_then(|muxer| muxer.can_read(Read)).unwrap_or(false)
	}

	/// Returns `true` if the view is open, was created writable, and its store is
	/// still open and writable.
	pub fn can_write(&self) -> bool {
		self.access.write && self.muxer(Write).and_then(|muxer| muxer.can_write(Write)).unwrap_or(false)
	}

	/// Returns `true` if the view is open.
	pub fn can_seek(&self) -> bool { !self.closed }

	/// Returns the effective length of the view. For views extending to the end,
	/// this is queried from the store each time.
	pub fn len(&self) -> Result<u64> {
		let muxer = self.muxer(Len)?;
		self.len_in(&muxer, Len)
	}

	/// Returns `true` if the view's effective length is zero.
	pub fn is_empty(&self) -> Result<bool> {
		Ok(self.len()? == 0)
	}

	/// Returns the logical position.
	pub fn position(&self) -> Result<u64> {
		self.check_open(Seek)?;
		Ok(self.pos)
	}

	/// Sets the logical position, which must be within `0..=len`. Out of range
	/// positions fail with [`Unsupported`](crate::ErrorKind::Unsupported),
	/// carrying the [`OutOfBounds`] as the source.
	pub fn set_position(&mut self, pos: u64) -> Result {
		self.set_position_checked(pos.into(), SetPosition)?;
		Ok(())
	}

	/// Seeks to an `offset`, returning the new position. The resolved position
	/// must be within `0..=len`, otherwise this fails with
	/// [`Unsupported`](crate::ErrorKind::Unsupported) and the position is left
	/// unchanged.
	pub fn seek(&mut self, offset: SeekOffset) -> Result<u64> {
		let len = match offset {
			SeekOffset::FromEnd(_) => self.len()?,
			_ => 0,
		};
		let pos = offset.resolve(self.position()?, len);
		self.set_position_checked(pos, Seek)
	}

	/// Resizes the store. Only the full-range view may resize; every other view
	/// fails with [`NotNow`](crate::ErrorKind::NotNow). If the store shrinks
	/// below the position, the position moves to the new end.
	pub fn set_len(&mut self, len: u64) -> Result {
		let muxer = self.muxer(SetLen)?;
		if !self.is_full_range() {
			return Err(Error::not_now(SetLen))
		}

		if !self.access.write || !muxer.can_write(SetLen)? {
			return Err(Error::read_only(SetLen))
		}

		muxer.set_len(len)?;
		self.pos = self.pos.min(len);
		Ok(())
	}

	/// Reads into `buf` from the current position, returning the number of bytes
	/// read. Reads never cross the end of the window: the count is clamped to the
	/// bytes remaining, and at the end `0` is returned. A short read is not an
	/// error.
	pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		let muxer = self.muxer(Read)?;
		if !self.access.read || !muxer.can_read(Read)? {
			return Err(Error::write_only(Read))
		}

		let remaining = self.len_in(&muxer, Read)?.saturating_sub(self.pos);
		let count = usize::try_from(remaining).map_or(buf.len(), |rem| rem.min(buf.len()));
		if count == 0 {
			return Ok(0)
		}

		let read = muxer.read_at(&mut buf[..count], self.offset + self.pos)?;
		debug_assert_le!(read, count);
		self.pos += read as u64;
		Ok(read)
	}

	/// Writes all of `buf` at the current position, advancing by the number of
	/// bytes committed to the store. If the write fails partway, the position
	/// still reflects what was written before the failure.
	///
	/// Fixed-length views reject writes crossing their end with
	/// [`OutOfRange`](crate::ErrorKind::OutOfRange) before writing anything.
	/// Views extending to the end may grow the store, unless disallowed by
	/// [`MuxerOptions::extend_on_write`](crate::MuxerOptions::extend_on_write).
	pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
		let (written, result) = self.write_committed(buf);
		result.map(|_| written)
	}

	/// Writes `buf` like [`write`](Self::write), returning the number of bytes
	/// committed alongside the result, even when it's an error.
	pub(crate) fn write_committed(&mut self, buf: &[u8]) -> (usize, Result) {
		let muxer = match self.muxer(Write) {
			Ok(muxer) => muxer,
			Err(error) => return (0, Err(error))
		};
		match muxer.can_write(Write) {
			Ok(true) if self.access.write => { }
			Ok(_) => return (0, Err(Error::read_only(Write))),
			Err(error) => return (0, Err(error))
		}

		let Some(end) = self.pos.checked_add(buf.len() as u64) else {
			return (0, Err(Error::invalid_argument(Write, "write end overflows")))
		};
		if let Extent::Fixed(len) = self.extent {
			if end > len {
				return (0, Err(Error::out_of_range(Write, OutOfBounds::new("write end", end, 0, len))))
			}
		}

		let grow = self.extent.is_to_end() && muxer.options().extend_on_write;
		let (written, result) = muxer.write_at(buf, self.offset + self.pos, grow);
		self.pos += written as u64;
		(written, result)
	}

	/// Flushes the store.
	pub fn flush(&mut self) -> Result {
		self.muxer(Flush)?.flush(Flush)
	}

	fn check_open(&self, op: Operation) -> Result {
		if self.closed {
			Err(Error::closed(op))
		} else {
			Ok(())
		}
	}

	/// Checks that the view is open, then upgrades the muxer reference.
	fn muxer(&self, op: Operation) -> Result<Arc<Inner<S>>> {
		self.check_open(op)?;
		self.muxer
			.upgrade()
			.filter(|muxer| !muxer.is_disposed())
			.ok_or_else(|| Error::disposed(op))
	}

	fn len_in(&self, muxer: &Inner<S>, op: Operation) -> Result<u64> {
		match self.extent {
			Extent::Fixed(len) => Ok(len),
			Extent::ToEnd => Ok(muxer.len(op)?.saturating_sub(self.offset)),
		}
	}

	/// Validates and commits a resolved position, which may be negative.
	fn set_position_checked(&mut self, pos: i128, op: Operation) -> Result<u64> {
		let len = self.len_in(&*self.muxer(op)?, op)?;
		match u64::try_from(pos) {
			Ok(pos) if pos <= len => {
				self.pos = pos;
				Ok(pos)
			}
			_ => Err(Error::past_bounds(op, OutOfBounds::new("position", pos, 0, len)))
		}
	}
}

impl<S: Store> Stream for View<S> {
	fn is_closed(&self) -> bool { self.closed }

	/// Closes the view. The muxer, its store, and other views are unaffected.
	fn close(&mut self) -> Result {
		if !self.closed {
			self.closed = true;
			debug!(offset = self.offset, extent = ?self.extent, "closed view");
		}
		Ok(())
	}
}

impl<S: Store> Seekable for View<S> {
	fn seek(&mut self, offset: SeekOffset) -> Result<u64> {
		View::seek(self, offset)
	}

	fn seek_len(&mut self) -> Result<u64> { self.len() }

	fn seek_pos(&mut self) -> Result<u64> { self.position() }
}

impl<S: Store> Drop for View<S> {
	fn drop(&mut self) {
		let _ = self.close();
	}
}
