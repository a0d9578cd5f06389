//! HTTP request value.
//!
//! A [`Request`] only composes the core values: a method, a target [`Uri`],
//! a [`MessageHead`] and an optional [`ByteStream`] body. Because the body owns
//! its handle, the `with_*` methods consume the request and return a new one.

use http::Method;

use crate::header::Headers;
use crate::protocol::{MessageError, MessageHead};
use crate::stream::ByteStream;
use crate::uri::Uri;

const HOST: &str = "Host";

#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    head: MessageHead,
    body: Option<ByteStream>,
}

impl Request {
    /// Creates a request, seeding the `Host` header from `uri` if it has a host.
    pub fn new(method: Method, uri: Uri) -> Self {
        let head = MessageHead::new();
        let head = match host_line(&uri) {
            Some(host) => head.with_header(HOST, [host]),
            None => head,
        };
        Self { method, uri, head, body: None }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
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

    /// Returns the origin-form target: the path (`/` when empty) and the query.
    pub fn request_target(&self) -> String {
        let mut target = match self.uri.path() {
            None | Some("") => "/".to_string(),
            Some(path) => path.to_string(),
        };
        if let Some(query) = self.uri.query() {
            target.push('?');
            target.push_str(query);
        }
        target
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

    #[must_use]
    pub fn with_method(self, method: Method) -> Self {
        Self { method, ..self }
    }

    /// Replaces the target URI.
    ///
    /// The `Host` header follows the new URI's host, unless `preserve_host` is
    /// set and the request already carries a non-empty `Host` header.
    #[must_use]
    pub fn with_uri(self, uri: Uri, preserve_host: bool) -> Self {
        let keep_host = preserve_host && !self.headers().get_line(HOST).is_empty();

        let head = match host_line(&uri) {
            Some(host) if !keep_host => self.head.with_header(HOST, [host]),
            _ => self.head,
        };
        Self { uri, head, ..self }
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

/// `host[:port]` of a URI, as sent in the `Host` header.
fn host_line(uri: &Uri) -> Option<String> {
    let host = uri.host()?;
    Some(match uri.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::MemoryHandle;

    #[test]
    fn seeds_host_header() {
        let request = Request::new(Method::GET, Uri::parse("http://example.com:8080/index?a=1").unwrap());

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.headers().get("host"), ["example.com:8080"]);
        assert_eq!(request.request_target(), "/index?a=1");
        assert_eq!(request.protocol_version(), "1.1");
    }

    #[test]
    fn no_host_without_uri_host() {
        let request = Request::new(Method::POST, Uri::parse("/submit").unwrap());

        assert!(!request.headers().has("Host"));
        assert_eq!(request.request_target(), "/submit");
        assert_eq!(Request::new(Method::GET, Uri::new()).request_target(), "/");
    }

    #[test]
    fn with_uri_updates_host() {
        let request = Request::new(Method::GET, Uri::parse("http://old.example/").unwrap())
            .with_uri(Uri::parse("http://new.example/").unwrap(), false);

        assert_eq!(request.headers().get("Host"), ["new.example"]);
        assert_eq!(request.uri().host(), Some("new.example"));
    }

    #[test]
    fn with_uri_can_preserve_host() {
        let request = Request::new(Method::GET, Uri::parse("http://old.example/").unwrap())
            .with_uri(Uri::parse("http://new.example/").unwrap(), true);
        assert_eq!(request.headers().get("Host"), ["old.example"]);

        let request = Request::new(Method::GET, Uri::parse("/relative").unwrap())
            .with_uri(Uri::parse("http://new.example/").unwrap(), true);
        assert_eq!(request.headers().get("Host"), ["new.example"]);
    }

    #[test]
    fn body_is_optional() {
        let request = Request::new(Method::PUT, Uri::new());
        assert!(matches!(request.body(), Err(MessageError::MissingBody)));

        let mut request = request.with_body(ByteStream::from_handle(MemoryHandle::new("w+")));
        request.body_mut().unwrap().write(b"payload").unwrap();
        assert_eq!(request.body_mut().unwrap().full_contents().unwrap(), "payload");
    }

    #[test]
    fn header_forwarding() {
        let request = Request::new(Method::GET, Uri::new())
            .with_header("Accept", ["text/html"])
            .with_added_header("accept", ["*/*"])
            .with_header("X-Drop", ["1"])
            .without_header("x-drop")
            .with_protocol_version("1.0")
            .with_method(Method::HEAD);

        assert_eq!(request.method(), &Method::HEAD);
        assert_eq!(request.protocol_version(), "1.0");
        assert_eq!(request.headers().get_line("accept"), "text/html, */*");
        assert!(!request.headers().has("X-Drop"));
    }
}
