use std::io;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use super::handle::{HandleMeta, OpenMode, RawHandle};

/// Name reported for in-memory handles
const MEMORY_URI: &str = "memory://temp";

/// An in-memory handle, the counterpart of a temporary buffer stream.
#[derive(Debug)]
pub struct MemoryHandle {
    buf: Cursor<Vec<u8>>,
    mode: OpenMode,
}

impl MemoryHandle {
    /// Creates an empty buffer opened with `mode`.
    pub fn new<M: Into<OpenMode>>(mode: M) -> Self {
        Self::with_contents(mode, Vec::new())
    }

    /// Creates a buffer holding `contents`, positioned at the start.
    pub fn with_contents<M: Into<OpenMode>, B: Into<Vec<u8>>>(mode: M, contents: B) -> Self {
        Self { buf: Cursor::new(contents.into()), mode: mode.into() }
    }

    /// Consumes the handle, returning the buffered bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf.into_inner()
    }
}

impl Read for MemoryHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.buf.read(buf)
    }
}

impl Write for MemoryHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.mode.as_str().starts_with('a') {
            self.buf.seek(SeekFrom::End(0))?;
        }
        self.buf.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemoryHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.buf.seek(pos)
    }
}

impl RawHandle for MemoryHandle {
    fn meta(&self) -> HandleMeta {
        HandleMeta {
            mode: self.mode.clone(),
            seekable: !self.mode.is_append_only(),
            uri: Some(MEMORY_URI.to_string()),
            wrapper_type: "memory",
        }
    }

    fn stat_size(&mut self) -> io::Result<Option<u64>> {
        Ok(Some(self.buf.get_ref().len() as u64))
    }
}
