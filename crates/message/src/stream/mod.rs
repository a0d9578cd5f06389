//! Byte stream over a single raw I/O handle.
//!
//! [`ByteStream`] owns at most one [`RawHandle`] and moves through three states:
//!
//! ```text
//!   Open ──detach()──▶ Detached
//!     │
//!     └───close()───▶ Closed
//! ```
//!
//! The readable, writable and seekable flags are derived from the handle's
//! [`HandleMeta`] when the stream is built and are never recomputed. Both
//! terminal states clear them and reject every I/O operation with
//! [`StreamError::Detached`].
//!
//! # Example
//!
//! ```
//! use std::io::SeekFrom;
//! use micro_message::stream::{ByteStream, MemoryHandle};
//!
//! let mut stream = ByteStream::from_handle(MemoryHandle::new("w+"));
//! assert_eq!(stream.write(b"hello world").unwrap(), 11);
//! assert_eq!(stream.size(), Some(11));
//!
//! stream.seek(SeekFrom::Start(6)).unwrap();
//! assert_eq!(&stream.read(5).unwrap()[..], b"world");
//!
//! stream.close().unwrap();
//! assert!(stream.read(1).unwrap_err().is_detached());
//! ```

mod file;
mod handle;
mod memory;

pub use file::FileHandle;
pub use handle::HandleMeta;
pub use handle::OpenMode;
pub use handle::RawHandle;
pub use memory::MemoryHandle;

use std::io;
use std::io::{Read, Seek, SeekFrom, Write};

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::ensure;
use crate::protocol::StreamError;

/// Initial buffer size used when draining a stream to its end
const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Lifecycle state of a [`ByteStream`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StreamState {
    /// The stream owns its handle
    Open,
    /// The handle was handed back to the caller
    Detached,
    /// The handle was released by the stream
    Closed,
}

#[derive(Debug)]
pub struct ByteStream {
    handle: Option<Box<dyn RawHandle>>,
    state: StreamState,
    /// cached size, dropped on every write
    size: Option<u64>,
    has_uri: bool,
    readable: bool,
    writable: bool,
    seekable: bool,
    eof: bool,
}

impl ByteStream {
    /// Wraps a handle.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidArgument`] if no handle is given.
    pub fn new(handle: Option<Box<dyn RawHandle>>) -> Result<Self, StreamError> {
        let handle = handle.ok_or_else(|| StreamError::invalid_argument("stream must be backed by a handle"))?;
        Ok(Self::from_boxed(handle))
    }

    /// Wraps a handle, see [`ByteStream::new`].
    pub fn from_handle<H: RawHandle + 'static>(handle: H) -> Self {
        Self::from_boxed(Box::new(handle))
    }

    fn from_boxed(handle: Box<dyn RawHandle>) -> Self {
        let meta = handle.meta();
        trace!(mode = %meta.mode, seekable = meta.seekable, uri = ?meta.uri, "wrapping handle");

        Self {
            state: StreamState::Open,
            size: None,
            has_uri: meta.uri.is_some(),
            readable: meta.mode.is_readable(),
            writable: meta.mode.is_writable(),
            seekable: meta.seekable,
            eof: false,
            handle: Some(handle),
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    #[inline]
    pub fn is_seekable(&self) -> bool {
        self.seekable
    }

    /// Reads up to `length` bytes, returning early once the handle gives less than asked.
    ///
    /// A short or empty result is not an error: it is taken as the end of the
    /// handle, which [`ByteStream::eof`] reports afterwards.
    ///
    /// # Errors
    ///
    /// Fails if the stream is not open or not readable, if `length` is
    /// negative, or if the handle fails to read.
    pub fn read(&mut self, length: i64) -> Result<Bytes, StreamError> {
        let handle = self.handle.as_mut().ok_or(StreamError::Detached)?;
        ensure!(self.readable, StreamError::NotReadable);
        let length = usize::try_from(length)
            .map_err(|_| StreamError::invalid_argument("length parameter cannot be negative"))?;

        if length == 0 {
            return Ok(Bytes::new());
        }

        let buf = read_up_to(&mut **handle, length).map_err(StreamError::io)?;

        self.eof = buf.len() < length;
        trace!(requested = length, read = buf.len(), eof = self.eof, "read bytes from stream");
        Ok(Bytes::from(buf))
    }

    /// Writes all of `data`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Fails if the stream is not open or not writable, or if the handle fails to write.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        let handle = self.handle.as_mut().ok_or(StreamError::Detached)?;
        ensure!(self.writable, StreamError::NotWritable);

        self.size = None;
        handle.write_all(data).map_err(StreamError::io)?;
        self.eof = false;

        trace!(len = data.len(), "wrote bytes to stream");
        Ok(data.len())
    }

    /// Moves the position of the stream, returning the new position.
    ///
    /// # Errors
    ///
    /// Fails if the stream is not open or not seekable, or if the handle fails to seek.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        let handle = self.handle.as_mut().ok_or(StreamError::Detached)?;
        ensure!(self.seekable, StreamError::NotSeekable);

        let position = handle.seek(pos).map_err(StreamError::io)?;
        self.eof = false;

        trace!(?pos, position, "seeked stream");
        Ok(position)
    }

    /// Seeks back to the start of the stream.
    ///
    /// # Errors
    ///
    /// See [`ByteStream::seek`].
    pub fn rewind(&mut self) -> Result<(), StreamError> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Returns the current position of the stream.
    ///
    /// # Errors
    ///
    /// Fails if the stream is not open or the handle can't report its position.
    pub fn tell(&mut self) -> Result<u64, StreamError> {
        let handle = self.handle.as_mut().ok_or(StreamError::Detached)?;
        handle.stream_position().map_err(StreamError::io)
    }

    /// Returns true once a read came back shorter than requested.
    ///
    /// # Errors
    ///
    /// Fails if the stream is not open.
    pub fn eof(&self) -> Result<bool, StreamError> {
        ensure!(self.handle.is_some(), StreamError::Detached);
        Ok(self.eof)
    }

    /// Returns the size of the stream, `None` if it can't be determined.
    ///
    /// The size is cached until the next write.
    pub fn size(&mut self) -> Option<u64> {
        if self.size.is_some() {
            return self.size;
        }

        let handle = self.handle.as_mut()?;
        if self.has_uri {
            handle.invalidate_stat();
        }

        match handle.stat_size() {
            Ok(size) => {
                trace!(?size, "cached stream size");
                self.size = size;
                size
            }
            Err(e) => {
                debug!(cause = %e, "unable to stat stream");
                None
            }
        }
    }

    /// Reads from the current position to the end of the stream.
    ///
    /// # Errors
    ///
    /// Fails if the stream is not open or not readable, or if the handle fails to read.
    pub fn remaining_contents(&mut self) -> Result<Bytes, StreamError> {
        let handle = self.handle.as_mut().ok_or(StreamError::Detached)?;
        ensure!(self.readable, StreamError::NotReadable);

        let mut buf = Vec::with_capacity(DEFAULT_CHUNK_SIZE);
        handle.read_to_end(&mut buf).map_err(|e| {
            warn!(cause = %e, "unable to read stream contents");
            StreamError::io(e)
        })?;
        self.eof = true;

        Ok(Bytes::from(buf))
    }

    /// Rewinds the stream and reads all of it.
    ///
    /// # Errors
    ///
    /// Fails if the stream is not open, not seekable or not readable, or if the handle fails.
    pub fn full_contents(&mut self) -> Result<Bytes, StreamError> {
        self.rewind()?;
        self.remaining_contents()
    }

    /// Returns a snapshot of the handle's metadata, `None` unless the stream is open.
    pub fn metadata(&self) -> Option<HandleMeta> {
        self.handle.as_ref().map(|handle| handle.meta())
    }

    /// Surrenders the handle to the caller and leaves the stream inert.
    ///
    /// Calling it again returns `None`.
    pub fn detach(&mut self) -> Option<Box<dyn RawHandle>> {
        let handle = self.handle.take()?;
        self.clear(StreamState::Detached);
        Some(handle)
    }

    /// Releases the handle and leaves the stream inert. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if the handle failed to release, the
    /// stream is closed either way.
    pub fn close(&mut self) -> Result<(), StreamError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        self.clear(StreamState::Closed);

        handle.close().map_err(|e| {
            warn!(cause = %e, "failed to close handle");
            StreamError::io(e)
        })
    }

    fn clear(&mut self, state: StreamState) {
        self.state = state;
        self.size = None;
        self.has_uri = false;
        self.readable = false;
        self.writable = false;
        self.seekable = false;
        self.eof = false;
    }
}

/// Reads until `length` bytes arrived or the handle returns less than asked.
///
/// A short read ends the call, so a handle with nothing more to give is never polled again.
fn read_up_to(handle: &mut dyn RawHandle, length: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(length.min(DEFAULT_CHUNK_SIZE));
    while buf.len() < length {
        let start = buf.len();
        let wanted = (length - start).min(DEFAULT_CHUNK_SIZE);
        buf.resize(start + wanted, 0);

        match handle.read(&mut buf[start..]) {
            Ok(n) => {
                buf.truncate(start + n);
                if n < wanted {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => buf.truncate(start),
            Err(e) => return Err(e),
        }
    }
    Ok(buf)
}

impl Drop for ByteStream {
    fn drop(&mut self) {
        // errors are already logged by close
        let _ = self.close();
    }
}
