//! Convenience constructors for URIs and messages.
//!
//! Server requests are built from an explicit [`ServerEnv`] rather than from
//! ambient process state, so the same code path serves tests and gateways.

use std::collections::HashMap;

use http::Method;
use tracing::debug;

use crate::protocol::{MessageError, Params, Request, Response, ServerRequest, UploadedFile, UriError};
use crate::stream::{ByteStream, MemoryHandle};
use crate::uri::Uri;

const REQUEST_METHOD: &str = "REQUEST_METHOD";
const REQUEST_URI: &str = "REQUEST_URI";

/// Parses `uri`, or returns the empty URI when none is given.
///
/// # Errors
///
/// Returns [`UriError::Parse`] if `uri` is malformed.
pub fn create_uri(uri: Option<&str>) -> Result<Uri, UriError> {
    uri.map_or_else(|| Ok(Uri::new()), Uri::parse)
}

pub fn create_request(method: Method, uri: Uri) -> Request {
    Request::new(method, uri)
}

/// Creates a response whose body is a writable in-memory stream.
///
/// # Errors
///
/// Returns [`MessageError::InvalidStatus`] if `code` is not a valid status code.
pub fn create_response(code: u16, reason: &str) -> Result<Response, MessageError> {
    let body = ByteStream::from_handle(MemoryHandle::new("w+"));
    Ok(Response::new(code, reason)?.with_body(body))
}

pub fn create_server_request(method: Method, uri: Uri, server_params: Params, body: ByteStream) -> ServerRequest {
    let request = Request::new(method, uri).with_body(body);
    ServerRequest::from_request(request, server_params)
}

/// The ambient input a server request is built from.
#[derive(Debug, Default)]
pub struct ServerEnv {
    pub server: Params,
    pub post: Option<Params>,
    pub get: Params,
    pub cookies: Params,
    pub uploaded_files: HashMap<String, UploadedFile>,
    pub body: Option<ByteStream>,
}

impl ServerEnv {
    /// Snapshots the process environment variables as server params.
    ///
    /// Variables that are not valid unicode are skipped.
    pub fn from_process_env() -> Self {
        let server: Params = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        debug!(vars = server.len(), "captured server params from process environment");

        Self { server, ..Self::default() }
    }
}

/// Builds a server request from `env`.
///
/// The method comes from `REQUEST_METHOD` (defaulting to `GET`) and the target
/// from `REQUEST_URI`. Without a body in `env`, an empty readable one is used.
///
/// # Errors
///
/// Fails if the method is not a valid token or the request URI is malformed.
pub fn create_server_request_from_env(env: ServerEnv) -> Result<ServerRequest, MessageError> {
    let ServerEnv { server, post, get, cookies, uploaded_files, body } = env;

    let method = match server.get(REQUEST_METHOD) {
        Some(method) => Method::from_bytes(method.as_bytes()).map_err(|_| MessageError::invalid_method(method))?,
        None => Method::GET,
    };
    let uri = create_uri(server.get(REQUEST_URI).map(String::as_str))?;
    debug!(%method, %uri, "creating server request from env");

    let body = body.unwrap_or_else(|| ByteStream::from_handle(MemoryHandle::new("r")));
    Ok(create_server_request(method, uri, server, body)
        .with_parsed_body(post)
        .with_cookie_params(cookies)
        .with_query_params(get)
        .with_uploaded_files(uploaded_files))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn create_uri_defaults_to_empty() {
        assert_eq!(create_uri(None).unwrap(), Uri::new());
        assert_eq!(create_uri(Some("http://example.com/a")).unwrap().path(), Some("/a"));
        assert!(create_uri(Some("http://example.com:0")).unwrap_err().is_parse());
    }

    #[test]
    fn create_response_has_writable_body() {
        let mut response = create_response(201, "").unwrap();
        assert_eq!(response.reason_phrase(), "Created");

        let body = response.body_mut().unwrap();
        assert!(body.is_writable());
        body.write(b"created").unwrap();
        assert_eq!(body.full_contents().unwrap(), "created");

        assert!(create_response(1, "").is_err());
    }

    #[test]
    fn create_request_seeds_host() {
        let request = create_request(Method::DELETE, Uri::parse("http://example.com/items/1").unwrap());
        assert_eq!(request.headers().get_line("host"), "example.com");
        assert!(request.body().is_err());
    }

    #[test]
    fn from_env() {
        let env = ServerEnv {
            server: params(&[("REQUEST_METHOD", "POST"), ("REQUEST_URI", "/submit?x=1")]),
            post: Some(params(&[("field", "value")])),
            get: params(&[("x", "1")]),
            cookies: params(&[("session", "abc")]),
            body: Some(ByteStream::from_handle(MemoryHandle::with_contents("r", "field=value"))),
            ..ServerEnv::default()
        };

        let mut request = create_server_request_from_env(env).unwrap();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.uri().path(), Some("/submit"));
        assert_eq!(request.request().request_target(), "/submit?x=1");
        assert_eq!(request.parsed_body(), Some(&params(&[("field", "value")])));
        assert_eq!(request.query_params(), &params(&[("x", "1")]));
        assert_eq!(request.cookie_params(), &params(&[("session", "abc")]));
        assert_eq!(request.server_params().get("REQUEST_METHOD").map(String::as_str), Some("POST"));
        assert_eq!(request.body_mut().unwrap().full_contents().unwrap(), "field=value");
    }

    #[test]
    fn from_empty_env() {
        let mut request = create_server_request_from_env(ServerEnv::default()).unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.uri(), &Uri::new());
        assert!(request.parsed_body().is_none());
        assert!(request.body_mut().unwrap().remaining_contents().unwrap().is_empty());
    }

    #[test]
    fn from_env_rejects_bad_input() {
        let env = ServerEnv { server: params(&[("REQUEST_METHOD", "GET POST")]), ..ServerEnv::default() };
        assert!(matches!(create_server_request_from_env(env), Err(MessageError::InvalidMethod { .. })));

        let env = ServerEnv { server: params(&[("REQUEST_URI", "http://[bad")]), ..ServerEnv::default() };
        assert!(matches!(create_server_request_from_env(env), Err(MessageError::UriError { .. })));
    }

    #[test]
    fn process_env_snapshot() {
        let env = ServerEnv::from_process_env();
        if let Ok(path) = std::env::var("PATH") {
            assert_eq!(env.server.get("PATH"), Some(&path));
        }
        assert!(env.post.is_none());
        assert!(env.body.is_none());
    }
}
