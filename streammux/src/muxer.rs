// SPDX-License-Identifier: Apache-2.0

mod options;

pub use options::*;

use std::{io, result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};
use crate::error::{DisposeError, Error, Operation, OutOfBounds, Result, ResultContext};
use crate::error::Operation::{Create, Dispose, Flush, Len, Read, SetLen, Write};
use crate::store::Store;
use crate::view::{Access, Extent, View};

/// Shares one [`Store`] between any number of independent [`View`]s.
///
/// The store has a single physical cursor, so every access to it happens under
/// one lock owned by the muxer: repositioning the cursor and transferring bytes
/// is never interleaved with another view's access. Views hold only a weak
/// reference back to the muxer; once it is disposed or dropped, they fail with
/// [`Disposed`](crate::ErrorKind::Disposed).
///
/// Disposal happens exactly once, either through [`dispose`](Self::dispose) or
/// when the muxer is dropped. The store is flushed, then closed unless the muxer
/// was created with [`leave_open`](MuxerOptions::leave_open).
pub struct Muxer<S: Store> {
	inner: Arc<Inner<S>>,
}

pub(crate) struct Inner<S: Store> {
	store: Mutex<Option<S>>,
	disposed: AtomicBool,
	options: MuxerOptions,
}

impl<S: Store> Muxer<S> {
	/// Creates a muxer owning `store`, closing it when disposed.
	pub fn new(store: S) -> Self {
		Self::with_options(store, MuxerOptions::default())
	}

	/// Creates a muxer which hands `store` back on disposal rather than closing
	/// it.
	pub fn leave_open(store: S) -> Self {
		Self::with_options(store, MuxerOptions::new().with_leave_open(true))
	}

	pub fn with_options(store: S, options: MuxerOptions) -> Self {
		debug!(?options, "creating muxer");
		Self {
			inner: Arc::new(Inner {
				store: Mutex::new(Some(store)),
				disposed: AtomicBool::new(false),
				options,
			})
		}
	}

	/// Returns the options the muxer was created with.
	pub fn options(&self) -> MuxerOptions { self.inner.options }

	/// Returns `true` if the muxer was disposed.
	pub fn is_disposed(&self) -> bool { self.inner.is_disposed() }

	/// Returns the current length of the store.
	pub fn len(&self) -> Result<u64> { self.inner.len(Len) }

	/// Returns `true` if the store is empty.
	pub fn is_empty(&self) -> Result<bool> { Ok(self.len()? == 0) }

	/// Flushes the store.
	pub fn flush(&self) -> Result { self.inner.flush(Flush) }

	/// Writes all of `buf` to the store, starting at the absolute `offset`. Fails
	/// with [`Unsupported`](crate::ErrorKind::Unsupported) if the store can't be
	/// written to.
	pub fn write_at(&self, buf: &[u8], offset: u64) -> Result {
		let (_, result) = self.inner.write_at(buf, offset, true);
		result
	}

	/// Creates a readable and writable view over the whole store.
	pub fn create_default(&self) -> Result<View<S>> {
		self.create(true, true)
	}

	/// Creates a view over the whole store, extending to its end as it grows or
	/// shrinks. This is the only kind of view which may resize the store.
	pub fn create(&self, can_read: bool, can_write: bool) -> Result<View<S>> {
		self.create_window(can_read, can_write, 0, Extent::ToEnd)
	}

	/// Creates a view starting at `offset`. The window must fit within the store
	/// at the time of creation, otherwise this fails with
	/// [`OutOfRange`](crate::ErrorKind::OutOfRange).
	pub fn create_window(
		&self,
		can_read: bool,
		can_write: bool,
		offset: u64,
		extent: Extent
	) -> Result<View<S>> {
		let len = self.inner.len(Create)?;
		if offset > len {
			return Err(Error::out_of_range(Create, OutOfBounds::new("offset", offset, 0, len)))
		}

		if let Extent::Fixed(size) = extent {
			let max = len - offset;
			if size > max {
				return Err(Error::out_of_range(Create, OutOfBounds::new("length", size, 0, max)))
			}
		}

		debug!(offset, ?extent, can_read, can_write, "creating view");
		Ok(View::new(
			Arc::downgrade(&self.inner),
			offset,
			extent,
			Access::new(can_read, can_write)
		))
	}

	/// Disposes the muxer, flushing the store. If the store is left open it's
	/// returned, otherwise it's closed and `None` is returned. Disposal only
	/// happens once, later calls return `Ok(None)`.
	///
	/// If flushing or closing fails, the muxer is still disposed. A store left
	/// open is returned untouched in the [`DisposeError`].
	///
	/// Every view fails with [`Disposed`](crate::ErrorKind::Disposed) afterward.
	/// Any access already holding the store lock finishes first.
	pub fn dispose(&self) -> result::Result<Option<S>, DisposeError<S>> {
		self.inner.dispose()
	}
}

impl<S: Store> Drop for Muxer<S> {
	fn drop(&mut self) {
		if let Err(error) = self.inner.dispose() {
			warn!(%error, "failed to dispose dropped muxer");
		}
	}
}

impl<S: Store> Inner<S> {
	pub(crate) fn options(&self) -> MuxerOptions { self.options }

	pub(crate) fn is_disposed(&self) -> bool {
		self.disposed.load(Ordering::Acquire)
	}

	/// Locks the store for the duration of `access`.
	fn access<T>(&self, op: Operation, access: impl FnOnce(&mut S) -> Result<T>) -> Result<T> {
		if self.is_disposed() {
			return Err(Error::disposed(op))
		}

		let mut guard = self.store.lock();
		let store = guard.as_mut().ok_or_else(|| Error::disposed(op))?;
		access(store)
	}

	pub(crate) fn len(&self, op: Operation) -> Result<u64> {
		self.access(op, |store| store.len().context(op))
	}

	pub(crate) fn flush(&self, op: Operation) -> Result {
		self.access(op, |store| store.flush().context(op))
	}

	pub(crate) fn can_read(&self, op: Operation) -> Result<bool> {
		self.access(op, |store| Ok(store.can_read()))
	}

	pub(crate) fn can_write(&self, op: Operation) -> Result<bool> {
		self.access(op, |store| Ok(store.can_write()))
	}

	pub(crate) fn set_len(&self, len: u64) -> Result {
		self.access(SetLen, |store| {
			if !store.can_write() {
				return Err(Error::unsupported(SetLen))
			}
			store.set_len(len).context(SetLen)?;
			debug!(len, "resized store");
			Ok(())
		})
	}

	/// Reads into `buf` from the absolute `offset` with a single store read.
	pub(crate) fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
		self.access(Read, |store| {
			if !store.can_read() {
				return Err(Error::unsupported(Read))
			}
			store.set_position(offset).context(Read)?;
			let count = store.read(buf).context(Read)?;
			trace!(offset, count, "read from store");
			Ok(count)
		})
	}

	/// Writes all of `buf` at the absolute `offset`, returning the number of bytes
	/// committed to the store along with the result. The count is accurate even
	/// when the write fails partway.
	///
	/// Unless `grow` is set, writes crossing the end of the store fail with
	/// [`OutOfRange`](crate::ErrorKind::OutOfRange) before anything is written.
	/// The length is checked under the same lock as the write.
	pub(crate) fn write_at(&self, buf: &[u8], offset: u64, grow: bool) -> (usize, Result) {
		let mut written = 0;
		let result = self.access(Write, |store| {
			if !store.can_write() {
				return Err(Error::unsupported(Write))
			}
			if !grow {
				let len = store.len().context(Write)?;
				let end = offset.saturating_add(buf.len() as u64);
				if end > len {
					return Err(Error::out_of_range(Write, OutOfBounds::new("write end", end, 0, len)))
				}
			}
			store.set_position(offset).context(Write)?;
			while written < buf.len() {
				match store.write(&buf[written..]) {
					Ok(0) => return Err(Error::io(Write, io::ErrorKind::WriteZero.into())),
					Ok(count) => written += count,
					Err(err) if err.kind() == io::ErrorKind::Interrupted => { }
					Err(err) => return Err(Error::io(Write, err)),
				}
			}
			trace!(offset, count = written, "wrote to store");
			Ok(())
		});
		(written, result)
	}

	pub(crate) fn dispose(&self) -> result::Result<Option<S>, DisposeError<S>> {
		let first = self.disposed
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_ok();
		if !first {
			return Ok(None)
		}

		let Some(mut store) = self.store.lock().take() else {
			return Ok(None)
		};

		let leave_open = self.options.leave_open;
		debug!(leave_open, "disposing muxer");
		let flushed = store.flush().context(Dispose);
		if leave_open {
			return match flushed {
				Ok(()) => Ok(Some(store)),
				Err(error) => Err(DisposeError::new(error, Some(store))),
			}
		}

		let closed = store.close().context(Dispose);
		flushed.and(closed)
			.map(|_| None)
			.map_err(|error| DisposeError::new(error, None))
	}
}

impl<S: Store> Drop for Inner<S> {
	fn drop(&mut self) {
		if let Err(error) = self.dispose() {
			warn!(%error, "failed to dispose muxer on drop");
		}
	}
}
