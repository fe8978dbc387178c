use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::http::{Headers, HttpMethod};
use crate::payload::{RequestBody, UploadFile};
use reqwest::blocking::multipart;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything a transport needs to put one request on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub query_params: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub timeout: Duration,
}

/// Failure to obtain any response at all.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be assembled, so nothing was sent.
    #[error("invalid request: {0}")]
    Build(#[source] BoxError),

    #[error("{0}")]
    Other(#[source] BoxError),
}

impl TransportError {
    pub fn connect(err: impl Into<BoxError>) -> Self {
        TransportError::Connect(err.into())
    }

    pub fn other(err: impl Into<BoxError>) -> Self {
        TransportError::Other(err.into())
    }

    /// True when the failure happened before anything reached the network.
    pub fn is_build(&self) -> bool {
        matches!(self, TransportError::Build(_))
    }

    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_builder() {
            TransportError::Build(Box::new(err))
        } else if err.is_timeout() {
            TransportError::Timeout(timeout)
        } else if err.is_connect() {
            TransportError::Connect(Box::new(err))
        } else {
            TransportError::Other(Box::new(err))
        }
    }
}

/// Response as returned by a [`Transport`]. The gateway hands it back to the
/// caller untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lower-cased.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    pub fn json_value(&self) -> serde_json::Result<serde_json::Value> {
        self.json()
    }
}

/// Synchronous HTTP capability the gateway delegates to.
pub trait Transport: Send + Sync {
    fn send(&self, request: &TransportRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking reqwest client. Must not be driven from inside an async runtime.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &TransportRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .timeout(request.timeout);

        if !request.query_params.is_empty() {
            builder = builder.query(&request.query_params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            Some(RequestBody::Bytes(bytes)) => builder.body(bytes.clone()),
            Some(RequestBody::Multipart { fields, files }) => {
                builder.multipart(multipart_form(fields, files)?)
            }
            None => builder,
        };

        let resp = builder
            .send()
            .map_err(|e| TransportError::from_reqwest(e, request.timeout))?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = resp
            .bytes()
            .map_err(|e| TransportError::from_reqwest(e, request.timeout))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn multipart_form(
    fields: &[(String, String)],
    files: &[UploadFile],
) -> Result<multipart::Form, TransportError> {
    let mut form = multipart::Form::new();
    for (name, value) in fields {
        form = form.text(name.clone(), value.clone());
    }
    for file in files {
        let mut part = multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(mime) = &file.mime {
            part = part
                .mime_str(mime)
                .map_err(|e| TransportError::Build(Box::new(e)))?;
        }
        form = form.part(file.field.clone(), part);
    }
    Ok(form)
}
