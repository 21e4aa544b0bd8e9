//! HTTP request preparation and the transport seam.
//!
//! `PreparedRequest` is built from a form: verb and URL from `method` and
//! `action`, fields urlencoded into the query string (GET/HEAD) or the body.
//! The `Transport` trait sends it; `ReqwestTransport` is the real client.
//!
//! The `Authorization` header, when present, carries the stored credential
//! verbatim. No scheme prefix is added.

pub mod error;
pub mod request;
pub mod transport;

pub use error::TransportError;
pub use request::{resolve_action, PreparedRequest};
pub use transport::{RawResponse, ReqwestTransport, Transport};
