// SPDX-License-Identifier: Apache-2.0

use std::io::SeekFrom;
use crate::Result;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SeekOffset {
	/// Reset the stream to the start. Equivalent to `FromStart(0)`.
	Reset,
	/// Move forward by an offset.
	Forward(u64),
	/// Move back by an offset.
	Back(u64),
	/// Seek a position from the start of the stream.
	FromStart(u64),
	/// Seek a position from the end of the stream.
	FromEnd(i64),
}

impl SeekOffset {
	/// Creates an offset relative to the current position.
	pub fn current(offset: i64) -> Self {
		if offset < 0 {
			Self::Back(offset.unsigned_abs())
		} else {
			Self::Forward(offset as u64)
		}
	}

	/// Resolves to a start-based position given a current `pos` and `len`. The
	/// result is exact, it may be negative or past the end; validating it is left
	/// to the stream.
	pub fn resolve(self, pos: u64, len: u64) -> i128 {
		match self {
			SeekOffset::Reset          => 0,
			SeekOffset::Forward  (off) => pos as i128 + off as i128,
			SeekOffset::Back     (off) => pos as i128 - off as i128,
			SeekOffset::FromStart(pos) => pos as i128,
			SeekOffset::FromEnd  (off) => len as i128 + off as i128,
		}
	}
}

impl From<SeekFrom> for SeekOffset {
	fn from(value: SeekFrom) -> Self {
		match value {
			SeekFrom::Start  (pos) => SeekOffset::FromStart(pos),
			SeekFrom::End    (off) => SeekOffset::FromEnd(off),
			SeekFrom::Current(off) => SeekOffset::current(off),
		}
	}
}

/// A stream that supports seeking. Based on the [`std::io::Seek`] trait.
pub trait Seekable {
	/// Seeks to an `offset`, returning the new position.
	fn seek(&mut self, offset: SeekOffset) -> Result<u64>;

	/// Seeks to the end of the stream then back to the current position, returning
	/// the length.
	fn seek_len(&mut self) -> Result<u64> {
		let pos = self.seek_pos()?;
		let len = self.seek(SeekOffset::FromEnd(0))?;

		if pos != len {
			self.seek(SeekOffset::FromStart(pos))?;
		}

		Ok(len)
	}

	/// Returns the current position.
	fn seek_pos(&mut self) -> Result<u64> {
		self.seek(SeekOffset::Forward(0))
	}
}

/// A convenience extension for [`Seekable`].
pub trait SeekableExt: Seekable {
	/// Resets to the start of the stream. Shorthand for `seek(SeekOffset::Reset)`.
	fn reset(&mut self) -> Result {
		self.seek(SeekOffset::Reset)?;
		Ok(())
	}

	/// Seeks forward `offset` bytes relative to the current position, returning
	/// the new position. Shorthand for `seek(SeekOffset::Forward(offset))`.
	fn seek_forward(&mut self, offset: u64) -> Result<u64> {
		self.seek(SeekOffset::Forward(offset))
	}

	/// Seeks back `offset` bytes relative to the current position, returning the
	/// new position. Shorthand for `seek(SeekOffset::Back(offset))`.
	fn seek_back(&mut self, offset: u64) -> Result<u64> {
		self.seek(SeekOffset::Back(offset))
	}

	/// Seeks to `offset` bytes from the start of the stream, returning the new
	/// position. Shorthand for `seek(SeekOffset::FromStart(offset))`.
	fn seek_from_start(&mut self, offset: u64) -> Result<u64> {
		self.seek(SeekOffset::FromStart(offset))
	}

	/// Seeks `offset` bytes relative to the end of the stream, returning the new
	/// position. Shorthand for `seek(SeekOffset::FromEnd(offset))`.
	fn seek_from_end(&mut self, offset: i64) -> Result<u64> {
		self.seek(SeekOffset::FromEnd(offset))
	}
}

impl<S: Seekable> SeekableExt for S { }
