//! HTTP transport layer for the generation job client.

mod http;
mod error;
mod reqwest;
pub mod endpoints;
mod response;

pub use http::{HttpTransport, HttpMethod, HttpRequest, HttpResponse};
pub use error::TransportError;
pub use self::reqwest::ReqwestTransport;
pub use response::ResponseParser;
