// SPDX-License-Identifier: Apache-2.0

mod seeking;

pub use seeking::*;

use crate::Result;

/// A closable data stream.
pub trait Stream {
	/// Returns `true` if the stream is closed.
	fn is_closed(&self) -> bool;

	/// Closes the stream. Closing is idempotent, [`close`](Self::close) may be
	/// called more than once with no effect.
	fn close(&mut self) -> Result;
}
