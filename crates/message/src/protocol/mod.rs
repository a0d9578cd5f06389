//! Message value types built on top of the core building blocks.
//!
//! The types here only compose a [`Uri`](crate::uri::Uri), a
//! [`Headers`](crate::header::Headers) collection and a
//! [`ByteStream`](crate::stream::ByteStream) body, forwarding calls to them.
//!
//! - **Message Head** ([`message`]): protocol version plus headers
//!   - [`MessageHead`]: shared by requests and responses
//!
//! - **Requests** ([`request`], [`server_request`])
//!   - [`Request`]: method, target URI, head and optional body
//!   - [`ServerRequest`]: a request plus server, cookie and query params,
//!     parsed body, uploaded files and attributes
//!
//! - **Responses** ([`response`])
//!   - [`Response`]: status code with reason phrase, head and optional body
//!
//! - **Uploads** ([`uploaded_file`])
//!   - [`UploadedFile`]: a received file that can be moved once
//!
//! - **Error Handling** ([`error`])
//!   - [`MessageError`]: top-level error type
//!   - [`UriError`]: URI parse and state errors
//!   - [`StreamError`]: stream state and I/O errors
//!   - [`UploadedFileError`]: upload access and move errors
//!
//! Requests, responses and uploaded files own their body stream, so unlike
//! [`MessageHead`] their `with_*` methods consume the value.

mod message;
pub use message::MessageHead;
pub use message::DEFAULT_PROTOCOL_VERSION;

mod request;
pub use request::Request;

mod response;
pub use response::Response;

mod server_request;
pub use server_request::Params;
pub use server_request::ServerRequest;

mod uploaded_file;
pub use uploaded_file::UploadedFile;

mod error;
pub use error::MessageError;
pub use error::StreamError;
pub use error::UploadStatus;
pub use error::UploadedFileError;
pub use error::UriError;
