use std::path::Path;

use tracing::debug;

use crate::ensure;
use crate::protocol::{UploadStatus, UploadedFileError};
use crate::stream::{ByteStream, FileHandle};

/// A file received as part of a multipart request.
///
/// The file can be moved to its final location once. After that, or when the
/// upload itself failed, its stream is no longer available.
#[derive(Debug)]
pub struct UploadedFile {
    stream: ByteStream,
    size: Option<u64>,
    status: Option<UploadStatus>,
    client_filename: String,
    client_media_type: String,
    moved: bool,
}

impl UploadedFile {
    pub fn new(stream: ByteStream, size: Option<u64>) -> Self {
        Self {
            stream,
            size,
            status: None,
            client_filename: String::new(),
            client_media_type: String::new(),
            moved: false,
        }
    }

    #[must_use]
    pub fn with_status(self, status: UploadStatus) -> Self {
        Self { status: Some(status), ..self }
    }

    #[must_use]
    pub fn with_client_filename(self, filename: &str) -> Self {
        Self { client_filename: filename.to_string(), ..self }
    }

    #[must_use]
    pub fn with_client_media_type(self, media_type: &str) -> Self {
        Self { client_media_type: media_type.to_string(), ..self }
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn status(&self) -> Option<UploadStatus> {
        self.status
    }

    pub fn client_filename(&self) -> &str {
        &self.client_filename
    }

    pub fn client_media_type(&self) -> &str {
        &self.client_media_type
    }

    /// Parses the media type sent by the client, `None` if missing or malformed.
    pub fn media_type(&self) -> Option<mime::Mime> {
        self.client_media_type.parse().ok()
    }

    pub fn is_moved(&self) -> bool {
        self.moved
    }

    /// # Errors
    ///
    /// Fails if the upload failed or the file was already moved.
    pub fn stream(&mut self) -> Result<&mut ByteStream, UploadedFileError> {
        self.validate_active()?;
        Ok(&mut self.stream)
    }

    /// Copies the uploaded contents into a new file at `target` and closes the upload stream.
    ///
    /// # Errors
    ///
    /// Fails if the upload failed, the file was already moved, `target` is
    /// empty, or the copy fails.
    pub fn move_to<P: AsRef<Path>>(&mut self, target: P) -> Result<(), UploadedFileError> {
        self.validate_active()?;
        let target = target.as_ref();
        ensure!(!target.as_os_str().is_empty(), UploadedFileError::EmptyPath);

        let mut out = ByteStream::from_handle(FileHandle::open(target, "w")?);
        let contents = self.stream.remaining_contents()?;
        out.write(&contents)?;
        out.close()?;
        self.stream.close()?;

        self.moved = true;
        debug!(target = %target.display(), len = contents.len(), "moved uploaded file");
        Ok(())
    }

    fn validate_active(&self) -> Result<(), UploadedFileError> {
        if let Some(status) = self.status {
            return Err(UploadedFileError::Upload { status });
        }
        ensure!(!self.moved, UploadedFileError::AlreadyMoved);
        Ok(())
    }
}
