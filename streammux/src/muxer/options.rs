// SPDX-License-Identifier: Apache-2.0

/// Options for tuning [`Muxer`](super::Muxer)'s behavior.
///
/// # Leave open
///
/// When set, the muxer does not close its store on disposal. The store is
/// flushed, then handed back by [`Muxer::dispose`](super::Muxer::dispose) so
/// the caller keeps ownership. Defaults to `false`.
///
/// # Extend on write
///
/// Whether views extending to the end of the store may grow it by writing past
/// its current end. Fixed-length views never write past their own end, and only
/// the full-range view may resize the store explicitly. Defaults to `true`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct MuxerOptions {
	pub leave_open: bool,
	pub extend_on_write: bool,
}

impl Default for MuxerOptions {
	fn default() -> Self { Self::new() }
}

impl MuxerOptions {
	/// Creates a new set of muxer options.
	pub const fn new() -> Self {
		Self {
			leave_open: false,
			extend_on_write: true,
		}
	}

	/// Returns `true` if the store is left open on disposal.
	#[inline]
	pub const fn leave_open(&self) -> bool { self.leave_open }

	/// Returns `true` if extending views may grow the store by writing.
	#[inline]
	pub const fn extend_on_write(&self) -> bool { self.extend_on_write }

	/// Sets whether the store is left open on disposal.
	#[inline]
	pub fn set_leave_open(&mut self, value: bool) {
		self.leave_open = value;
	}

	/// Sets whether extending views may grow the store by writing.
	#[inline]
	pub fn set_extend_on_write(&mut self, value: bool) {
		self.extend_on_write = value;
	}

	/// Sets whether the store is left open on disposal.
	#[inline]
	pub const fn with_leave_open(mut self, value: bool) -> Self {
		self.leave_open = value;
		self
	}

	/// Sets whether extending views may grow the store by writing.
	#[inline]
	pub const fn with_extend_on_write(mut self, value: bool) -> Self {
		self.extend_on_write = value;
		self
	}
}
