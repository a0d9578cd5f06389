use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("uri error: {source}")]
    UriError {
        #[from]
        source: UriError,
    },

    #[error("stream error: {source}")]
    StreamError {
        #[from]
        source: StreamError,
    },

    #[error("uploaded file error: {source}")]
    UploadedFileError {
        #[from]
        source: UploadedFileError,
    },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http method: {method}")]
    InvalidMethod { method: String },

    #[error("invalid status code: {code}")]
    InvalidStatus { code: u16 },

    #[error("no body available")]
    MissingBody,
}

impl MessageError {
    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_method<S: ToString>(str: S) -> Self {
        Self::InvalidMethod { method: str.to_string() }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("unable to parse uri `{uri}`: {reason}")]
    Parse { uri: String, reason: String },

    #[error("invalid uri state: {reason}")]
    InvalidState { reason: String },

    #[error("invalid port: {port}, must be between 1 and 65535")]
    InvalidPort { port: u32 },
}

impl UriError {
    pub fn parse<U: ToString, S: ToString>(uri: U, reason: S) -> Self {
        Self::Parse { uri: uri.to_string(), reason: reason.to_string() }
    }

    pub fn invalid_state<S: ToString>(str: S) -> Self {
        Self::InvalidState { reason: str.to_string() }
    }

    pub fn invalid_port(port: u32) -> Self {
        Self::InvalidPort { port }
    }

    /// Returns true if this error was raised by `Uri::parse`.
    #[inline]
    pub fn is_parse(&self) -> bool {
        matches!(self, UriError::Parse { .. })
    }

    /// Returns true if this error was raised by a `with_*` call.
    #[inline]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, UriError::InvalidState { .. } | UriError::InvalidPort { .. })
    }
}

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("stream is detached")]
    Detached,

    #[error("cannot read from non-readable stream")]
    NotReadable,

    #[error("cannot write to a non-writable stream")]
    NotWritable,

    #[error("stream is not seekable")]
    NotSeekable,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StreamError {
    pub fn invalid_argument<S: ToString>(str: S) -> Self {
        Self::InvalidArgument { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    #[inline]
    pub fn is_detached(&self) -> bool {
        matches!(self, StreamError::Detached)
    }
}

#[derive(Error, Debug)]
pub enum UploadedFileError {
    #[error("cannot retrieve stream due to upload error: {status:?}")]
    Upload { status: UploadStatus },

    #[error("cannot retrieve stream after it has already been moved")]
    AlreadyMoved,

    #[error("invalid path provided for move operation; must be a non-empty string")]
    EmptyPath,

    #[error("stream error: {source}")]
    Stream {
        #[from]
        source: StreamError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

/// Failure reported by the client or gateway for a single uploaded file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// The file exceeds the server side size limit
    IniSize,
    /// The file exceeds the size limit declared by the form
    FormSize,
    /// Only part of the file arrived
    Partial,
    /// No file was sent
    NoFile,
    /// No temporary directory was available
    NoTmpDir,
    /// The file could not be written to disk
    CantWrite,
    /// Some extension stopped the upload
    Extension,
}
