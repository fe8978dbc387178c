//! Helpers for building HTTP API clients.
//!
//! A [`Gateway`] wraps a blocking HTTP transport with URL composition, header
//! merging, an optional minimum delay between requests, status-code checks and
//! outcome reporting.
//!
//! ```no_run
//! use restgate::{Gateway, RequestOptions};
//!
//! let mut gateway = Gateway::new("https://jsonplaceholder.typicode.com");
//! if let Ok(Some(resp)) = gateway.execute(RequestOptions::get("/posts/1").expect(200)) {
//!     println!("{}", resp.text());
//! }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod payload;
pub mod reporter;
pub mod transport;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayBuilder, StatusRejection};
pub use http::{ContentType, Headers, HttpMethod};
pub use payload::{ExpectedStatus, RequestBody, RequestOptions, RequestPayload, UploadFile};
pub use reporter::{MemoryReporter, Reporter, Severity, TracingReporter};
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError, TransportRequest};
