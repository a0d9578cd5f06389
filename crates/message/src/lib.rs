//! HTTP message building blocks
//!
//! This crate provides the value types an HTTP message is made of: a validated
//! and normalized URI, a case-insensitive header collection and a byte stream
//! over a single I/O handle. Requests, responses and server requests are thin
//! compositions of those three.
//!
//! # Features
//!
//! - RFC 3986 URI parsing with scheme and host normalization
//! - Percent-encoding of path, query and fragment that never double-encodes
//! - Default port elision for well-known schemes
//! - Case-insensitive headers that remember the first spelling of each name
//! - Copy-on-write `with*` operations on URIs and headers
//! - Byte streams over files or in-memory buffers with a detach/close lifecycle
//! - Conversions to and from the `http` crate types
//!
//! # Example
//!
//! ```
//! use std::io::SeekFrom;
//! use micro_message::header::Headers;
//! use micro_message::stream::{ByteStream, MemoryHandle};
//! use micro_message::uri::Uri;
//!
//! let uri = Uri::parse("HTTP://Example.COM:80/a b?q=1#top").unwrap();
//! assert_eq!(uri.to_string(), "http://example.com/a%20b?q=1#top");
//!
//! let uri = uri.with_port(Some(8080)).unwrap();
//! assert_eq!(uri.authority(), "example.com:8080");
//!
//! let headers = Headers::new()
//!     .with("Content-Type", ["text/plain"])
//!     .with_added("content-type", ["charset=utf-8"]);
//! assert_eq!(headers.get_line("CONTENT-TYPE"), "text/plain, charset=utf-8");
//! assert_eq!(headers.names().collect::<Vec<_>>(), ["Content-Type"]);
//!
//! let mut body = ByteStream::from_handle(MemoryHandle::new("w+"));
//! body.write(b"hello").unwrap();
//! body.seek(SeekFrom::Start(0)).unwrap();
//! assert_eq!(&body.read(5).unwrap()[..], b"hello");
//! ```
//!
//! # Architecture
//!
//! - [`uri`]: the [`uri::Uri`] value, its parser and percent-encoding
//! - [`header`]: the [`header::Headers`] collection
//! - [`stream`]: the [`stream::ByteStream`] and the handles it can wrap
//! - [`protocol`]: requests, responses, uploaded files and error types
//! - [`factory`]: convenience constructors, including server requests built from a [`factory::ServerEnv`]
//!
//! # Error Handling
//!
//! - [`protocol::UriError`]: URI parse and state errors
//! - [`protocol::StreamError`]: stream state and I/O errors
//! - [`protocol::UploadedFileError`]: uploaded file access errors
//! - [`protocol::MessageError`]: top-level error wrapping the above
//!
//! # Limitations
//!
//! - No wire format: messages are neither parsed from nor serialized to bytes
//! - Header names and values are not validated against the HTTP token grammar
//!   until converted into an `http::HeaderMap`
//! - Streams are blocking

pub mod factory;
pub mod header;
pub mod protocol;
pub mod stream;
pub mod uri;

mod utils;
pub(crate) use utils::ensure;
