use std::fs::{File, Metadata};
use std::io;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::trace;

use super::handle::{HandleMeta, OpenMode, RawHandle};

/// A handle over a named file on disk.
///
/// The file's stat result is cached until [`RawHandle::invalidate_stat`] is
/// called, mirroring how a named resource is looked up only when asked to.
#[derive(Debug)]
pub struct FileHandle {
    file: File,
    path: PathBuf,
    mode: OpenMode,
    stat: Option<Metadata>,
}

impl FileHandle {
    /// Opens `path` with a mode string such as `r`, `w+` or `a`.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode is unknown or the file can't be opened.
    pub fn open<P: AsRef<Path>, M: Into<OpenMode>>(path: P, mode: M) -> io::Result<Self> {
        let mode = mode.into();
        let path = path.as_ref().to_path_buf();
        let file = mode.open_options()?.open(&path)?;

        trace!(path = %path.display(), %mode, "opened file handle");
        Ok(Self { file, path, mode, stat: None })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for FileHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl RawHandle for FileHandle {
    fn meta(&self) -> HandleMeta {
        HandleMeta {
            mode: self.mode.clone(),
            seekable: !self.mode.is_append_only(),
            uri: Some(self.path.display().to_string()),
            wrapper_type: "plainfile",
        }
    }

    fn stat_size(&mut self) -> io::Result<Option<u64>> {
        if self.stat.is_none() {
            self.stat = Some(self.file.metadata()?);
        }
        Ok(self.stat.as_ref().filter(|stat| stat.is_file()).map(Metadata::len))
    }

    fn invalidate_stat(&mut self) {
        self.stat = None;
    }

    fn close(mut self: Box<Self>) -> io::Result<()> {
        self.file.flush()
    }
}
