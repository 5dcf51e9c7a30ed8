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

use std::{fmt, io, result};
use std::error::Error as StdError;
use std::fmt::Formatter;
use amplify_derive::Display;
use ErrorKind::*;

pub type ErrorBox = Box<dyn StdError + Send + Sync>;
pub type Result<T = ()> = result::Result<T, Error>;

/// The operation an [`Error`] occurred in.
#[derive(Copy, Clone, Debug, Default, Display, Eq, PartialEq)]
pub enum Operation {
	#[default]
	#[display("unknown operation")]
	Unknown,
	#[display("create view")]
	Create,
	#[display("query length")]
	Len,
	#[display("flush")]
	Flush,
	#[display("read")]
	Read,
	#[display("write")]
	Write,
	#[display("seek")]
	Seek,
	#[display("set position")]
	SetPosition,
	#[display("set length")]
	SetLen,
	#[display("dispose muxer")]
	Dispose,
}

/// The kind of an [`Error`]. [`Closed`], [`ReadOnly`], and [`WriteOnly`] are
/// refinements of [`NotNow`]; see [`Error::is_not_now`].
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum ErrorKind {
	/// The muxer was disposed.
	#[display("muxer disposed")]
	Disposed,
	/// The view was closed.
	#[display("view closed")]
	Closed,
	/// The operation is not allowed in the current state.
	#[display("not allowed now")]
	NotNow,
	/// A write was attempted on a view that cannot write.
	#[display("view is read-only")]
	ReadOnly,
	/// A read was attempted on a view that cannot read.
	#[display("view is write-only")]
	WriteOnly,
	#[display("operation not supported")]
	Unsupported,
	#[display("argument out of range")]
	OutOfRange,
	#[display("invalid argument")]
	InvalidArgument,
	#[display("IO error")]
	Io,
}

/// A value fell outside its allowed range. Carried as the source of
/// [`OutOfRange`] and position-related [`Unsupported`] errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{name} {value} is outside of {min}..={max}")]
pub struct OutOfBounds {
	pub name: &'static str,
	pub value: i128,
	pub min: u64,
	pub max: u64,
}

impl OutOfBounds {
	pub(crate) fn new(name: &'static str, value: impl Into<i128>, min: u64, max: u64) -> Self {
		Self { name, value: value.into(), min, max }
	}
}

#[derive(Debug)]
pub struct Error {
	op: Operation,
	kind: ErrorKind,
	source: Option<ErrorBox>,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let Self { op, kind, source } = self;
		if let Some(source) = source {
			write!(f, "{op} failed; {kind} ({source})")
		} else {
			write!(f, "{op} failed; {kind}")
		}
	}
}

impl StdError for Error {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		if let Some(ref source) = self.source {
			Some(source.as_ref())
		} else {
			None
		}
	}
}

impl Error {
	pub(crate) fn new(
		op: Operation,
		kind: ErrorKind,
		source: Option<ErrorBox>
	) -> Self {
		Self { op, kind, source }
	}

	/// Creates a new "disposed" error.
	pub fn disposed(op: Operation) -> Self { Self::new(op, Disposed, None) }

	/// Creates a new "closed" error.
	pub fn closed(op: Operation) -> Self { Self::new(op, Closed, None) }

	/// Creates a new "not now" error.
	pub fn not_now(op: Operation) -> Self { Self::new(op, NotNow, None) }

	/// Creates a new "read-only" error.
	pub fn read_only(op: Operation) -> Self { Self::new(op, ReadOnly, None) }

	/// Creates a new "write-only" error.
	pub fn write_only(op: Operation) -> Self { Self::new(op, WriteOnly, None) }

	/// Creates a new "unsupported" error.
	pub fn unsupported(op: Operation) -> Self { Self::new(op, Unsupported, None) }

	/// Creates a new "out of range" error.
	pub fn out_of_range(op: Operation, bounds: OutOfBounds) -> Self {
		Self::new(op, OutOfRange, Some(bounds.into()))
	}

	/// Creates an "unsupported" error for a position outside the stream. The
	/// bounds are kept as the source, so the range check is still visible to
	/// callers that look for it.
	pub fn past_bounds(op: Operation, bounds: OutOfBounds) -> Self {
		Self::new(op, Unsupported, Some(bounds.into()))
	}

	/// Creates a new "invalid argument" error.
	pub fn invalid_argument(op: Operation, message: &'static str) -> Self {
		Self::new(op, InvalidArgument, Some(message.into()))
	}

	/// Creates a new IO error.
	pub fn io(op: Operation, error: io::Error) -> Self {
		Self::new(op, Io, Some(error.into()))
	}

	/// Returns the operation kind.
	pub fn operation(&self) -> Operation { self.op }

	/// Returns the error kind.
	pub fn kind(&self) -> ErrorKind { self.kind }

	/// Returns `true` if the state of the muxer or view forbids the operation:
	/// [`NotNow`] or one of its refinements, [`Closed`], [`ReadOnly`], and
	/// [`WriteOnly`].
	pub fn is_not_now(&self) -> bool {
		matches!(self.kind, NotNow | Closed | ReadOnly | WriteOnly)
	}

	/// Returns `true` if the error can never be recovered from by retrying on the
	/// same instance.
	pub fn is_terminal(&self) -> bool {
		matches!(self.kind, Disposed | Closed)
	}

	/// Returns the source downcast into an IO Error, if possible.
	pub fn io_source(&self) -> Option<&io::Error> {
		self.source()?.downcast_ref()
	}

	/// Returns the violated bounds, if the error was caused by a range check.
	pub fn bounds(&self) -> Option<&OutOfBounds> {
		self.source()?.downcast_ref()
	}
}

impl From<io::Error> for Error {
	fn from(value: io::Error) -> Self {
		Self::io(Operation::Unknown, value)
	}
}

impl From<Error> for io::Error {
	fn from(value: Error) -> Self {
		let kind = match value.kind {
			Io if value.io_source().is_some() => {
				return match value.source.map(|source| source.downcast::<io::Error>()) {
					Some(Ok(error)) => *error,
					Some(Err(source)) => io::Error::other(source),
					None => unreachable!(),
				}
			}
			Io => io::ErrorKind::Other,
			ReadOnly | WriteOnly | Unsupported => io::ErrorKind::Unsupported,
			OutOfRange | InvalidArgument => io::ErrorKind::InvalidInput,
			Disposed | Closed | NotNow => io::ErrorKind::Other,
		};
		io::Error::new(kind, value)
	}
}

/// A failed [`Muxer::dispose`](crate::Muxer::dispose). A store left open is
/// handed back along with the error, so it's never lost to a failed flush.
pub struct DisposeError<S> {
	error: Error,
	store: Option<S>,
}

impl<S> DisposeError<S> {
	pub(crate) fn new(error: Error, store: Option<S>) -> Self {
		Self { error, store }
	}

	/// Returns the error disposal failed with.
	pub fn error(&self) -> &Error { &self.error }

	/// Returns the store, if it was left open.
	pub fn store(&self) -> Option<&S> { self.store.as_ref() }

	/// Takes the store, if it was left open.
	pub fn into_store(self) -> Option<S> { self.store }

	pub fn into_parts(self) -> (Error, Option<S>) {
		(self.error, self.store)
	}
}

impl<S> fmt::Debug for DisposeError<S> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("DisposeError")
			.field("error", &self.error)
			.field("store_returned", &self.store.is_some())
			.finish()
	}
}

impl<S> fmt::Display for DisposeError<S> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.error, f)
	}
}

impl<S> StdError for DisposeError<S> {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		self.error.source()
	}
}

impl<S> From<DisposeError<S>> for Error {
	fn from(value: DisposeError<S>) -> Self { value.error }
}

/// Attaches an [`Operation`] to results from the backing store.
pub trait ResultContext<T> {
	fn context(self, op: Operation) -> Result<T>;
}

impl<T> ResultContext<T> for io::Result<T> {
	fn context(self, op: Operation) -> Result<T> {
		self.map_err(|err| Error::io(op, err))
	}
}
