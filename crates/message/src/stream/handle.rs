//! The raw I/O handle seam wrapped by [`ByteStream`](super::ByteStream).
//!
//! A handle is any `Read + Write + Seek` resource that can describe itself
//! through [`HandleMeta`]. The stream derives its capability flags from that
//! description exactly once, when the handle is wrapped.

use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::io::ErrorKind;

/// Modes that allow reading
const READ_MODES: [&str; 16] =
    ["r", "w+", "r+", "x+", "c+", "rb", "w+b", "r+b", "x+b", "c+b", "rt", "w+t", "r+t", "x+t", "c+t", "a+"];

/// Modes that allow writing
const WRITE_MODES: [&str; 17] =
    ["w", "w+", "rw", "r+", "x+", "c+", "wb", "w+b", "r+b", "x+b", "c+b", "w+t", "r+t", "x+t", "c+t", "a", "a+"];

/// The mode string a handle was opened with, e.g. `r+` or `wb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpenMode(String);

impl OpenMode {
    pub fn new<S: Into<String>>(mode: S) -> Self {
        Self(mode.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        READ_MODES.contains(&self.as_str())
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        WRITE_MODES.contains(&self.as_str())
    }

    /// Returns true for `a`, `ab` and `at`: writes always land at the end and
    /// there is no read position to move, so such handles are not seekable.
    #[inline]
    pub fn is_append_only(&self) -> bool {
        matches!(self.as_str(), "a" | "ab" | "at")
    }

    /// Translates the mode into the options used to open a file.
    ///
    /// The `b` and `t` flags don't change anything on the platforms std supports.
    pub(crate) fn open_options(&self) -> io::Result<OpenOptions> {
        let base: String = self.0.chars().filter(|c| !matches!(c, 'b' | 't')).collect();

        let mut options = OpenOptions::new();
        match base.as_str() {
            "r" => options.read(true),
            "r+" | "rw" => options.read(true).write(true),
            "w" => options.write(true).create(true).truncate(true),
            "w+" => options.read(true).write(true).create(true).truncate(true),
            "a" => options.append(true).create(true),
            "a+" => options.read(true).append(true).create(true),
            "x" => options.write(true).create_new(true),
            "x+" => options.read(true).write(true).create_new(true),
            "c" => options.write(true).create(true),
            "c+" => options.read(true).write(true).create(true),
            _ => return Err(io::Error::new(ErrorKind::InvalidInput, format!("unsupported open mode `{}`", self.0))),
        };
        Ok(options)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OpenMode {
    fn from(mode: &str) -> Self {
        Self::new(mode)
    }
}

/// Snapshot of what a handle reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleMeta {
    /// The mode the handle was opened with
    pub mode: OpenMode,
    /// Whether the handle supports moving its position
    pub seekable: bool,
    /// The named resource behind the handle, if any
    pub uri: Option<String>,
    /// Short name of the handle implementation, e.g. `plainfile` or `memory`
    pub wrapper_type: &'static str,
}

/// An I/O resource that a [`ByteStream`](super::ByteStream) can own.
pub trait RawHandle: io::Read + io::Write + io::Seek + fmt::Debug + Send {
    /// Describes the handle, see [`HandleMeta`].
    fn meta(&self) -> HandleMeta;

    /// Returns the size of the underlying resource, `None` if it has no size.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource can't be inspected.
    fn stat_size(&mut self) -> io::Result<Option<u64>>;

    /// Drops any cached stat information, so the next [`RawHandle::stat_size`]
    /// looks at the resource again.
    fn invalidate_stat(&mut self) {}

    /// Releases the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if pending data could not be flushed.
    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}
