//! Request descriptions.
//!
//! [`RequestOptions`] is what a caller hands to [`Gateway::execute`](crate::Gateway::execute);
//! [`RequestPayload`] is the composed form with the final URL and merged headers.

use serde_json::Value;
use std::time::Duration;

use crate::http::{
    header_value, merge_headers, remove_header, ContentType, Headers, HttpMethod, CONTENT_TYPE,
};
use crate::transport::TransportRequest;

/// Acceptance criterion for a response status code.
///
/// `AcceptAny` is the legacy default: it treats 4xx and 5xx responses as
/// success. Prefer stating the codes you expect.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExpectedStatus {
    #[default]
    AcceptAny,
    Exactly(u16),
    OneOf(Vec<u16>),
}

impl ExpectedStatus {
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            ExpectedStatus::AcceptAny => true,
            ExpectedStatus::Exactly(code) => *code == status,
            ExpectedStatus::OneOf(codes) => codes.contains(&status),
        }
    }

    pub fn is_accept_any(&self) -> bool {
        matches!(self, ExpectedStatus::AcceptAny)
    }
}

impl From<u16> for ExpectedStatus {
    fn from(code: u16) -> Self {
        ExpectedStatus::Exactly(code)
    }
}

impl From<Vec<u16>> for ExpectedStatus {
    fn from(codes: Vec<u16>) -> Self {
        ExpectedStatus::OneOf(codes)
    }
}

impl From<&[u16]> for ExpectedStatus {
    fn from(codes: &[u16]) -> Self {
        ExpectedStatus::OneOf(codes.to_vec())
    }
}

impl<const N: usize> From<[u16; N]> for ExpectedStatus {
    fn from(codes: [u16; N]) -> Self {
        ExpectedStatus::OneOf(codes.to_vec())
    }
}

/// One file part of a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Form(Vec<(String, String)>),
    Bytes(Vec<u8>),
    /// `multipart/form-data`: text fields plus file parts.
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<UploadFile>,
    },
}

impl RequestBody {
    /// Picks the wire encoding for this body given the request's content type.
    ///
    /// Raw bytes and explicit form fields are sent as they are. A JSON value is
    /// flattened into form fields for `application/x-www-form-urlencoded`,
    /// serialised to bytes for `application/octet-stream`, and sent as JSON
    /// otherwise.
    pub fn encode_for(&self, content_type: Option<ContentType>) -> RequestBody {
        match (self, content_type) {
            (RequestBody::Json(value), Some(ContentType::FormUrlEncoded)) => {
                RequestBody::Form(json_to_fields(value))
            }
            (RequestBody::Json(value), Some(ContentType::OctetStream)) => {
                RequestBody::Bytes(value.to_string().into_bytes())
            }
            _ => self.clone(),
        }
    }

    /// One-line description used in logs; binary bodies are reported by size.
    pub fn describe(&self) -> String {
        match self {
            RequestBody::Json(value) => value.to_string(),
            RequestBody::Form(fields) => fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&"),
            RequestBody::Bytes(bytes) => format!("<Binary data: {} bytes>", bytes.len()),
            RequestBody::Multipart { fields, files } => {
                let names: Vec<String> = files
                    .iter()
                    .map(|f| format!("{} ({} bytes)", f.file_name, f.bytes.len()))
                    .collect();
                format!("<Multipart: {} fields, files: {}>", fields.len(), names.join(", "))
            }
        }
    }

    /// Text fields a body contributes when a file is attached to it.
    fn into_fields(self) -> Vec<(String, String)> {
        match self {
            RequestBody::Json(value) => json_to_fields(&value),
            RequestBody::Form(fields) => fields,
            RequestBody::Multipart { fields, .. } => fields,
            RequestBody::Bytes(_) => Vec::new(),
        }
    }
}

fn json_to_fields(value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect(),
        other => vec![("data".to_string(), other.to_string())],
    }
}

/// Per-call configuration for [`Gateway::execute`](crate::Gateway::execute).
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub endpoint: String,
    pub method: HttpMethod,
    pub body: Option<RequestBody>,
    pub query_params: Vec<(String, String)>,
    pub headers: Headers,
    pub expected_status: ExpectedStatus,
    pub fatal_if_unexpected: bool,
    /// Fail with `Err` straight away, skipping all reporting.
    pub raise_exceptions: bool,
    pub quiet: bool,
    pub call_origin: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            ..Default::default()
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn json(self, value: Value) -> Self {
        self.body(RequestBody::Json(value))
    }

    pub fn bytes(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body(RequestBody::Bytes(bytes.into()))
    }

    pub fn form<K: Into<String>, V: Into<String>>(
        self,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.body(RequestBody::Form(fields))
    }

    /// Attaches a file, turning the body into a multipart upload. Fields of an
    /// existing JSON or form body are kept as text parts; raw bytes are dropped.
    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let upload = UploadFile {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.map(str::to_string),
            bytes: bytes.into(),
        };
        let body = match self.body.take() {
            Some(RequestBody::Multipart { fields, mut files }) => {
                files.push(upload);
                RequestBody::Multipart { fields, files }
            }
            other => RequestBody::Multipart {
                fields: other.map(RequestBody::into_fields).unwrap_or_default(),
                files: vec![upload],
            },
        };
        self.body(body)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn expect(mut self, expected: impl Into<ExpectedStatus>) -> Self {
        self.expected_status = expected.into();
        self
    }

    /// Explicitly opt into accepting every status code.
    pub fn accept_any_status(mut self) -> Self {
        self.expected_status = ExpectedStatus::AcceptAny;
        self
    }

    pub fn fatal(mut self, fatal: bool) -> Self {
        self.fatal_if_unexpected = fatal;
        self
    }

    pub fn raise_exceptions(mut self, raise: bool) -> Self {
        self.raise_exceptions = raise;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn call_origin(mut self, origin: impl Into<String>) -> Self {
        self.call_origin = Some(origin.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Joins a base URL and an endpoint with exactly one `/` between them.
/// An empty base leaves the endpoint untouched.
pub fn compose_url(base_url: &str, endpoint: &str) -> String {
    if base_url.is_empty() {
        return endpoint.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// A fully composed request, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPayload {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<RequestBody>,
    pub query_params: Vec<(String, String)>,
    pub expected_status: ExpectedStatus,
    pub call_origin: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestPayload {
    pub fn from_endpoint(base_url: &str, default_headers: &Headers, options: &RequestOptions) -> Self {
        Self {
            method: options.method,
            url: compose_url(base_url, &options.endpoint),
            headers: merge_headers(default_headers, &options.headers),
            body: options.body.clone(),
            query_params: options.query_params.clone(),
            expected_status: options.expected_status.clone(),
            call_origin: options.call_origin.clone(),
            timeout: options.timeout,
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            query_params: Vec::new(),
            expected_status: ExpectedStatus::AcceptAny,
            call_origin: None,
            timeout: None,
        }
    }

    pub fn content_type(&self) -> Option<ContentType> {
        header_value(&self.headers, CONTENT_TYPE).and_then(|v| ContentType::from_mime(&v))
    }

    /// Multipart bodies drop any caller Content-Type so the transport can set
    /// the boundary.
    pub fn to_transport_request(&self, default_timeout: Duration) -> TransportRequest {
        let content_type = self.content_type();
        let mut headers = self.headers.clone();
        if matches!(self.body, Some(RequestBody::Multipart { .. })) {
            remove_header(&mut headers, CONTENT_TYPE);
        }
        TransportRequest {
            method: self.method,
            url: self.url.clone(),
            headers,
            query_params: self.query_params.clone(),
            body: self.body.as_ref().map(|b| b.encode_for(content_type)),
            timeout: self.timeout.unwrap_or(default_timeout),
        }
    }

    /// Ordered key/value summary shown when a request fails.
    pub fn details(&self, status: Option<u16>) -> Vec<(String, String)> {
        let mut details = vec![
            ("URL".to_string(), self.url.clone()),
            ("Method".to_string(), self.method.to_string()),
        ];
        if let Some(origin) = &self.call_origin {
            details.push(("Call Origin".to_string(), origin.clone()));
        }
        if let Some(body) = &self.body {
            details.push(("Data".to_string(), body.describe()));
        }
        if !self.query_params.is_empty() {
            let query = self
                .query_params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            details.push(("Query Parameters".to_string(), query));
        }
        if let Some(status) = status {
            details.push(("Status".to_string(), status.to_string()));
        }
        details
    }
}
