//! # HTTP Wire Codec
//!
//! Hand-rolled HTTP/1.1 request decoding and response encoding over raw
//! byte streams. Only the request line and headers are ever read; request
//! bodies are ignored and every response carries `Connection: close`.

pub mod request;
pub mod response;
pub mod status;

pub use request::{Request, RequestError};
pub use response::Response;
pub use status::StatusCode;
