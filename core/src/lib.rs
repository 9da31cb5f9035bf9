//! Request plumbing for the MyParcel shipping API.
//!
//! # Overview
//! Builds authenticated requests for creating shipments and fetching labels,
//! runs them through a pluggable transport, and turns the answer into either
//! a JSON tree, PDF bytes, or an error naming the failed URL.
//!
//! # Design
//! - `RequestSpec` is the immutable per-call input; `RequestOutcome` the
//!   result of a successful send. The executor keeps no per-call state.
//! - Transports are opened per send through a `Connector` and closed on every
//!   exit path. The `ureq` feature (on by default) provides a blocking one.
//! - Operations, their headers and resources live in one exhaustive table,
//!   `RequestKind`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod lookup;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;
pub mod user_agent;
#[cfg(feature = "ureq")]
pub mod ureq_transport;

pub use client::{RequestExecutor, RequestOutcome};
pub use config::{ClientConfig, TransportConfig};
pub use error::SdkError;
pub use http::{HttpMethod, HttpRequest};
pub use request::RequestSpec;
pub use response::{decode_response, extract_error, DecodedResponse, ErrorOrigin, ResponseBody};
pub use transport::{Connector, OpenTransport, Transport};
pub use types::{RequestKind, Resource, BASE_URL, SDK_NAME};
#[cfg(feature = "ureq")]
pub use ureq_transport::{UreqConnector, UreqTransport};
