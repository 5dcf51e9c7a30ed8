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

//! ## How it works
//!
//! A *store* is a seekable byte sequence with one physical cursor: a file, an
//! in-memory buffer, or anything else implementing [`Store`]. A [`Muxer`] takes
//! ownership of a store and splits it into any number of *views*, each a window
//! defined by an offset and either a fixed length or "to the end of the store".
//! Every view keeps its own logical position and its own read/write access, and
//! behaves like an independent stream starting at zero.
//!
//! ```
//! use streammux::{Extent, MemoryStore, Muxer};
//!
//! let muxer = Muxer::new(MemoryStore::from(b"header:payload".to_vec()));
//! let mut header = muxer.create_window(true, false, 0, Extent::Fixed(6))?;
//! let mut payload = muxer.create_window(true, false, 7, Extent::ToEnd)?;
//!
//! let mut buf = [0; 16];
//! let n = payload.read(&mut buf)?;
//! assert_eq!(&buf[..n], b"payload");
//! let n = header.read(&mut buf)?;
//! assert_eq!(&buf[..n], b"header");
//! # Ok::<_, streammux::Error>(())
//! ```
//!
//! ### Access
//!
//! Reads and writes on a view are translated to absolute offsets in the store.
//! Moving the store's cursor then transferring bytes happens under a single lock
//! owned by the muxer, so views may be used from different threads at once
//! without seeing each other's cursor motion. Access is serialized, not parallel.
//!
//! Reads are clamped to the window; a view never returns bytes outside of it.
//! Writes on fixed-length views may not cross the window's end. Views extending
//! to the end track the store's length as it changes, and the *full-range* view
//! (offset zero, extending to the end) is the only one allowed to resize it.
//!
//! ### Lifecycle
//!
//! Views hold only a weak reference to their muxer. Closing a view affects no
//! other view. Disposing the muxer, explicitly or by dropping it, flushes the
//! store and closes it unless the store is left open, in which case it's handed
//! back. Both closing and disposal are idempotent; afterward, operations fail
//! with [`Closed`](ErrorKind::Closed) and [`Disposed`](ErrorKind::Disposed)
//! errors respectively.

pub mod error;
mod muxer;
mod std_io;
pub mod store;
pub mod streams;
mod view;

pub use error::{DisposeError, Error, ErrorKind, Operation, OutOfBounds, Result};
pub use muxer::*;
pub use store::{FileStore, IoStore, MemoryStore, Store};
pub use view::*;
