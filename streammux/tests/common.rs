// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![allow(dead_code, unused_macros)]

use std::fmt::{Arguments, Debug};
use std::io;
use std::sync::{Arc, Mutex};
use streammux::{MemoryStore, Store};

macro_rules! qc_assert_eq {
	($left:expr,$right:expr) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, None)
			)
		}
	}};
    ($left:expr,$right:expr,$($arg:tt)+) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, Some(format_args!($($arg)+)))
			)
		}
	}};
}

pub fn format_qc_assert_error<L: Debug, R: Debug>(left: &L, right: &R, msg: Option<Arguments>) -> String {
	if let Some(msg) = msg {
		format!(
			"assertion failed `(left == right)`: {msg}\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	} else {
		format!(
			"assertion failed `(left == right)`:\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	}
}

/// Returns `len` bytes counting up from zero, wrapping at 251 so the pattern
/// doesn't line up with power-of-two offsets.
pub fn pattern(len: usize) -> Vec<u8> {
	(0..len).map(|i| (i % 251) as u8).collect()
}

/// Something that happened to a [`RecordingStore`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Event {
	Flush,
	Close,
}

/// A memory store which records flushes and closes, and optionally fails
/// writes after a byte budget is spent or fails every flush.
pub struct RecordingStore {
	inner: MemoryStore,
	events: Arc<Mutex<Vec<Event>>>,
	write_budget: Option<usize>,
	fail_flush: bool,
}

impl RecordingStore {
	pub fn new(data: Vec<u8>) -> (Self, Arc<Mutex<Vec<Event>>>) {
		let events = Arc::new(Mutex::new(Vec::new()));
		let store = Self {
			inner: data.into(),
			events: Arc::clone(&events),
			write_budget: None,
			fail_flush: false,
		};
		(store, events)
	}

	/// Fails writes once `budget` bytes have been written.
	pub fn with_write_budget(mut self, budget: usize) -> Self {
		self.write_budget = Some(budget);
		self
	}

	/// Fails every flush, after recording it.
	pub fn with_failing_flush(mut self) -> Self {
		self.fail_flush = true;
		self
	}

	pub fn is_closed(&self) -> bool { self.inner.is_closed() }

	pub fn as_slice(&self) -> &[u8] { self.inner.as_slice() }

	fn record(&self, event: Event) {
		self.events.lock().unwrap().push(event);
	}
}

impl Store for RecordingStore {
	fn len(&mut self) -> io::Result<u64> { self.inner.len() }

	fn position(&mut self) -> io::Result<u64> { self.inner.position() }

	fn set_position(&mut self, pos: u64) -> io::Result<()> { self.inner.set_position(pos) }

	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> { self.inner.read(buf) }

	/// Writes a single byte at a time, so budgets are spent exactly.
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		if buf.is_empty() {
			return Ok(0)
		}

		match self.write_budget {
			Some(0) => Err(io::Error::other("write budget spent")),
			Some(ref mut budget) => {
				*budget -= 1;
				self.inner.write(&buf[..1])
			}
			None => self.inner.write(&buf[..1]),
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		self.record(Event::Flush);
		if self.fail_flush {
			return Err(io::Error::other("flush failed"))
		}
		self.inner.flush()
	}

	fn set_len(&mut self, len: u64) -> io::Result<()> { self.inner.set_len(len) }

	fn close(&mut self) -> io::Result<()> {
		self.record(Event::Close);
		self.inner.close()
	}

	fn can_read(&self) -> bool { self.inner.can_read() }

	fn can_write(&self) -> bool { self.inner.can_write() }
}
