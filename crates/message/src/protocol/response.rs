use http::StatusCode;

use crate::header::Headers;
use crate::protocol::{MessageError, MessageHead};
use crate::stream::ByteStream;

/// An HTTP response: a status code with its reason phrase, a head and an optional body.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    reason: String,
    head: MessageHead,
    body: Option<ByteStream>,
}

impl Response {
    /// Creates a response with `code`.
    ///
    /// An empty `reason` falls back to the canonical reason phrase of the code.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidStatus`] if `code` is outside `100..=999`.
    pub fn new(code: u16, reason: &str) -> Result<Self, MessageError> {
        let status = status_code(code)?;
        Ok(Self { status, reason: reason_or_canonical(status, reason), head: MessageHead::new(), body: None })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason
    }

    pub fn head(&self) -> &MessageHead {
        &self.head
    }

    pub fn headers(&self) -> &Headers {
        self.head.headers()
    }

    pub fn protocol_version(&self) -> &str {
        self.head.protocol_version()
    }

    /// # Errors
    ///
    /// Returns [`MessageError::MissingBody`] if no body was attached.
    pub fn body(&self) -> Result<&ByteStream, MessageError> {
        self.body.as_ref().ok_or(MessageError::MissingBody)
    }

    /// # Errors
    ///
    /// Returns [`MessageError::MissingBody`] if no body was attached.
    pub fn body_mut(&mut self) -> Result<&mut ByteStream, MessageError> {
        self.body.as_mut().ok_or(MessageError::MissingBody)
    }

    pub fn into_body(self) -> Option<ByteStream> {
        self.body
    }

    /// Replaces the status and its reason phrase.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidStatus`] if `code` is outside `100..=999`.
    pub fn with_status(self, code: u16, reason: &str) -> Result<Self, MessageError> {
        let status = status_code(code)?;
        Ok(Self { status, reason: reason_or_canonical(status, reason), ..self })
    }

    #[must_use]
    pub fn with_body(self, body: ByteStream) -> Self {
        Self { body: Some(body), ..self }
    }

    #[must_use]
    pub fn with_head(self, head: MessageHead) -> Self {
        Self { head, ..self }
    }

    #[must_use]
    pub fn with_protocol_version(self, version: &str) -> Self {
        let head = self.head.with_protocol_version(version);
        self.with_head(head)
    }

    #[must_use]
    pub fn with_header<I, V>(self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let head = self.head.with_header(name, values);
        self.with_head(head)
    }

    #[must_use]
    pub fn with_added_header<I, V>(self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let head = self.head.with_added_header(name, values);
        self.with_head(head)
    }

    #[must_use]
    pub fn without_header(self, name: &str) -> Self {
        let head = self.head.without_header(name);
        self.with_head(head)
    }
}

fn status_code(code: u16) -> Result<StatusCode, MessageError> {
    StatusCode::from_u16(code).map_err(|_| MessageError::InvalidStatus { code })
}

fn reason_or_canonical(status: StatusCode, reason: &str) -> String {
    if reason.is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        reason.to_string()
    }
}
