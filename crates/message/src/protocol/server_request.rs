use std::collections::HashMap;

use http::Method;

use crate::header::Headers;
use crate::protocol::{MessageError, Request, UploadedFile};
use crate::stream::ByteStream;
use crate::uri::Uri;

/// String keyed parameters, as found in server variables, cookies or a form body.
pub type Params = HashMap<String, String>;

/// A request as seen by the server, carrying the data gathered around it.
///
/// Server params are fixed at construction. Everything else is replaced
/// through the consuming `with_*` methods.
#[derive(Debug)]
pub struct ServerRequest {
    request: Request,
    server_params: Params,
    cookie_params: Params,
    query_params: Params,
    parsed_body: Option<Params>,
    uploaded_files: HashMap<String, UploadedFile>,
    attributes: HashMap<String, String>,
}

impl ServerRequest {
    pub fn new(method: Method, uri: Uri, server_params: Params) -> Self {
        Self::from_request(Request::new(method, uri), server_params)
    }

    pub fn from_request(request: Request, server_params: Params) -> Self {
        Self {
            request,
            server_params,
            cookie_params: Params::new(),
            query_params: Params::new(),
            parsed_body: None,
            uploaded_files: HashMap::new(),
            attributes: HashMap::new(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn headers(&self) -> &Headers {
        self.request.headers()
    }

    /// # Errors
    ///
    /// Returns [`MessageError::MissingBody`] if no body was attached.
    pub fn body_mut(&mut self) -> Result<&mut ByteStream, MessageError> {
        self.request.body_mut()
    }

    pub fn server_params(&self) -> &Params {
        &self.server_params
    }

    pub fn cookie_params(&self) -> &Params {
        &self.cookie_params
    }

    pub fn query_params(&self) -> &Params {
        &self.query_params
    }

    pub fn parsed_body(&self) -> Option<&Params> {
        self.parsed_body.as_ref()
    }

    pub fn uploaded_files(&self) -> &HashMap<String, UploadedFile> {
        &self.uploaded_files
    }

    pub fn uploaded_file_mut(&mut self, name: &str) -> Option<&mut UploadedFile> {
        self.uploaded_files.get_mut(name)
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn with_request(self, request: Request) -> Self {
        Self { request, ..self }
    }

    #[must_use]
    pub fn with_cookie_params(self, cookie_params: Params) -> Self {
        Self { cookie_params, ..self }
    }

    #[must_use]
    pub fn with_query_params(self, query_params: Params) -> Self {
        Self { query_params, ..self }
    }

    #[must_use]
    pub fn with_parsed_body(self, parsed_body: Option<Params>) -> Self {
        Self { parsed_body, ..self }
    }

    #[must_use]
    pub fn with_uploaded_files(self, uploaded_files: HashMap<String, UploadedFile>) -> Self {
        Self { uploaded_files, ..self }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn without_attribute(mut self, name: &str) -> Self {
        self.attributes.remove(name);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::MemoryHandle;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn wraps_request() {
        let uri = Uri::parse("https://example.com/search?q=rust").unwrap();
        let request = ServerRequest::new(Method::GET, uri, params(&[("SERVER_NAME", "example.com")]));

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.uri().query(), Some("q=rust"));
        assert_eq!(request.headers().get("Host"), ["example.com"]);
        assert_eq!(request.server_params().get("SERVER_NAME").map(String::as_str), Some("example.com"));
        assert!(request.cookie_params().is_empty());
        assert!(request.parsed_body().is_none());
    }

    #[test]
    fn replaces_params() {
        let request = ServerRequest::new(Method::POST, Uri::new(), Params::new())
            .with_cookie_params(params(&[("session", "abc")]))
            .with_query_params(params(&[("page", "2")]))
            .with_parsed_body(Some(params(&[("name", "value")])));

        assert_eq!(request.cookie_params(), &params(&[("session", "abc")]));
        assert_eq!(request.query_params(), &params(&[("page", "2")]));
        assert_eq!(request.parsed_body(), Some(&params(&[("name", "value")])));
    }

    #[test]
    fn attributes() {
        let request = ServerRequest::new(Method::GET, Uri::new(), Params::new())
            .with_attribute("route", "index")
            .with_attribute("user", "42")
            .without_attribute("user")
            .without_attribute("missing");

        assert_eq!(request.attribute("route"), Some("index"));
        assert_eq!(request.attribute("user"), None);
        assert_eq!(request.attributes().len(), 1);
    }

    #[test]
    fn uploaded_files() {
        let file = UploadedFile::new(ByteStream::from_handle(MemoryHandle::with_contents("r", "abc")), Some(3));
        let mut request = ServerRequest::new(Method::POST, Uri::new(), Params::new())
            .with_uploaded_files(HashMap::from([("avatar".to_string(), file)]));

        let file = request.uploaded_file_mut("avatar").unwrap();
        assert_eq!(file.stream().unwrap().remaining_contents().unwrap(), "abc");
        assert!(request.uploaded_file_mut("other").is_none());
    }

    #[test]
    fn body_comes_from_request() {
        let body = ByteStream::from_handle(MemoryHandle::with_contents("r", "a=1"));
        let request = Request::new(Method::POST, Uri::new()).with_body(body);
        let mut request = ServerRequest::from_request(request, Params::new());

        assert_eq!(request.body_mut().unwrap().full_contents().unwrap(), "a=1");
    }
}
