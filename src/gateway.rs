//! The request gateway.
//!
//! A [`Gateway`] is bound to one API base URL. Each call to
//! [`Gateway::execute`] composes the target URL, merges headers, optionally
//! waits out the rate limit, sends the request through the configured
//! [`Transport`] and checks the response status against the caller's
//! [`ExpectedStatus`]. Bookkeeping (`connected`, last error, last request
//! time) always describes the most recent attempt only.
//!
//! A `Gateway` is not meant to be shared between threads; use one instance per
//! concurrent caller or wrap it in a `Mutex`.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info_span};
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::http::{Headers, HttpMethod};
use crate::metrics::{GatewayMetrics, TimingGuard};
use crate::payload::{ExpectedStatus, RequestBody, RequestOptions, RequestPayload};
use crate::reporter::{Reporter, Severity, TracingReporter};
use crate::transport::{HttpResponse, ReqwestTransport, Transport, TransportError};

const REQUEST_SYMBOL: &str = "🌍";

/// How a single call surfaces failures.
#[derive(Debug, Clone, Copy)]
struct FailurePolicy {
    quiet: bool,
    fatal: bool,
    raise: bool,
}

/// A response that arrived but carried a status the caller did not expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRejection {
    pub method: HttpMethod,
    pub url: String,
    pub status: u16,
    pub message: String,
}

impl From<StatusRejection> for GatewayError {
    fn from(r: StatusRejection) -> Self {
        GatewayError::UnexpectedStatus {
            method: r.method,
            url: r.url,
            status: r.status,
            message: r.message,
        }
    }
}

pub struct GatewayBuilder {
    base_url: String,
    default_headers: Headers,
    transport: Option<Box<dyn Transport>>,
    reporter: Option<Arc<dyn Reporter>>,
    rate_limit_delay: Option<Duration>,
    timeout: Duration,
    quiet: bool,
}

impl GatewayBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: Headers::new(),
            transport: None,
            reporter: None,
            rate_limit_delay: None,
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECONDS),
            quiet: false,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut builder = Self::new(config.base_url.clone())
            .default_headers(config.default_headers.clone())
            .timeout(config.timeout())
            .quiet(config.quiet);
        builder.rate_limit_delay = config.rate_limit_delay();
        builder
    }

    pub fn default_headers(mut self, headers: Headers) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Minimum gap between the start of two consecutive requests.
    pub fn rate_limit(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = Some(delay);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn build(self) -> Gateway {
        Gateway {
            base_url: self.base_url,
            default_headers: self.default_headers,
            transport: self
                .transport
                .unwrap_or_else(|| Box::new(ReqwestTransport::new())),
            reporter: self.reporter.unwrap_or_else(|| Arc::new(TracingReporter)),
            rate_limit_delay: self.rate_limit_delay,
            timeout: self.timeout,
            quiet: self.quiet,
            connected: false,
            last_exception: None,
            last_rejection: None,
            last_request_time: None,
            last_request_instant: None,
        }
    }
}

pub struct Gateway {
    base_url: String,
    default_headers: Headers,
    transport: Box<dyn Transport>,
    reporter: Arc<dyn Reporter>,
    rate_limit_delay: Option<Duration>,
    timeout: Duration,
    quiet: bool,
    connected: bool,
    last_exception: Option<Arc<TransportError>>,
    last_rejection: Option<StatusRejection>,
    last_request_time: Option<DateTime<Utc>>,
    last_request_instant: Option<Instant>,
}

impl Gateway {
    /// Gateway with the blocking reqwest transport and the tracing reporter.
    pub fn new(base_url: impl Into<String>) -> Self {
        GatewayBuilder::new(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> GatewayBuilder {
        GatewayBuilder::new(base_url)
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        GatewayBuilder::from_config(config).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Transport error from the most recent attempt, if it failed to get a response.
    pub fn last_error(&self) -> Option<&TransportError> {
        self.last_exception.as_deref()
    }

    /// Status rejection from the most recent attempt, if the response was unexpected.
    pub fn last_rejection(&self) -> Option<&StatusRejection> {
        self.last_rejection.as_ref()
    }

    pub fn last_request_time(&self) -> Option<DateTime<Utc>> {
        self.last_request_time
    }

    pub fn has_error(&self) -> bool {
        self.last_exception.is_some()
    }

    pub fn clear_error(&mut self) {
        self.last_exception = None;
        self.last_rejection = None;
    }

    pub fn check_connection(&self) -> bool {
        self.connected
    }

    /// Sends a quiet GET to the base URL and reports whether any response came back.
    pub fn connect(&mut self) -> bool {
        self.check_status_code(ExpectedStatus::AcceptAny);
        self.connected
    }

    /// Sends a quiet GET to the base URL and reports whether its status matched.
    pub fn check_status_code(&mut self, expected: impl Into<ExpectedStatus>) -> bool {
        let options = RequestOptions::get("").expect(expected).quiet(true);
        matches!(self.execute(options), Ok(Some(_)))
    }

    /// Runs one request.
    ///
    /// Returns `Ok(Some(response))` when the transport answered with an
    /// accepted status. Transport failures and unexpected statuses yield
    /// `Ok(None)`, or an `Err` when `fatal_if_unexpected` is set. With
    /// `raise_exceptions` the `Err` comes back before anything is reported.
    pub fn execute(&mut self, options: RequestOptions) -> Result<Option<HttpResponse>> {
        let payload = RequestPayload::from_endpoint(&self.base_url, &self.default_headers, &options);
        let policy = FailurePolicy {
            quiet: self.quiet || options.quiet,
            fatal: options.fatal_if_unexpected,
            raise: options.raise_exceptions,
        };

        self.throttle();

        let request_id = Uuid::new_v4();
        let span = info_span!(
            "gateway_request",
            request_id = %request_id,
            method = %payload.method,
            url = %payload.url
        );
        let _enter = span.enter();

        if payload.expected_status.is_accept_any() {
            debug!("No expected status codes given; every status will be accepted");
        }
        if let (Some(body), false) = (&payload.body, policy.quiet) {
            let message = match body {
                RequestBody::Bytes(bytes) => format!("Sending binary payload ({} bytes)", bytes.len()),
                RequestBody::Json(_) => "Sending JSON payload".to_string(),
                RequestBody::Form(fields) => format!("Sending form payload ({} fields)", fields.len()),
                RequestBody::Multipart { files, .. } => {
                    format!("Sending multipart payload ({} files)", files.len())
                }
            };
            self.reporter.report(Severity::Debug, Severity::Debug.symbol(), &message);
        }

        GatewayMetrics::record_request(payload.method.as_str());
        let timing = TimingGuard::start();
        let outcome = self.transport.send(&payload.to_transport_request(self.timeout));
        drop(timing);

        match outcome {
            Err(err) => self.on_transport_failure(&payload, err, policy),
            Ok(response) => self.on_response(&payload, response, policy),
        }
    }

    fn on_transport_failure(
        &mut self,
        payload: &RequestPayload,
        err: TransportError,
        policy: FailurePolicy,
    ) -> Result<Option<HttpResponse>> {
        let err = Arc::new(err);
        // A request that never left says nothing about connectivity.
        if !err.is_build() {
            self.connected = false;
        }
        self.last_exception = Some(err.clone());
        self.last_rejection = None;
        GatewayMetrics::record_transport_failure();

        if policy.raise {
            return Err(GatewayError::Transport(err));
        }
        if !policy.quiet {
            self.reporter
                .properties(Severity::Error, "Request Details", &payload.details(None));
        }
        self.reporter.report(
            Severity::Error,
            Severity::Error.symbol(),
            &format!("Request failed: {}", err),
        );

        if policy.fatal {
            Err(GatewayError::Transport(err))
        } else {
            Ok(None)
        }
    }

    fn on_response(
        &mut self,
        payload: &RequestPayload,
        response: HttpResponse,
        policy: FailurePolicy,
    ) -> Result<Option<HttpResponse>> {
        self.connected = true;
        self.last_exception = None;

        if !policy.quiet {
            self.reporter.report(
                Severity::Debug,
                REQUEST_SYMBOL,
                &format!("{} | {} -> {}", payload.method, response.status, payload.url),
            );
        }

        if payload.expected_status.accepts(response.status) {
            self.last_rejection = None;
            if !policy.quiet {
                self.reporter.report(
                    Severity::Success,
                    Severity::Success.symbol(),
                    &format!("{} {} succeeded with {}", payload.method, payload.url, response.status),
                );
            }
            return Ok(Some(response));
        }

        let rejection = StatusRejection {
            method: payload.method,
            url: payload.url.clone(),
            status: response.status,
            message: extract_error_message(&response),
        };
        GatewayMetrics::record_status_rejection(response.status);

        if policy.raise {
            self.last_rejection = Some(rejection.clone());
            return Err(rejection.into());
        }
        if !policy.quiet {
            let mut details = payload.details(Some(response.status));
            details.push((
                "Response Content".to_string(),
                format_response_content(Some(&response)),
            ));
            self.reporter
                .properties(Severity::Warning, "Request Details", &details);
            self.reporter.report(
                Severity::Warning,
                Severity::Warning.symbol(),
                &format!("Unexpected status {}: {}", rejection.status, rejection.message),
            );
        }

        self.last_rejection = Some(rejection.clone());
        if policy.fatal {
            Err(rejection.into())
        } else {
            Ok(None)
        }
    }

    /// Blocks until the configured delay has passed since the previous
    /// request started, then stamps this attempt.
    fn throttle(&mut self) {
        if let (Some(delay), Some(last)) = (self.rate_limit_delay, self.last_request_instant) {
            let elapsed = last.elapsed();
            if elapsed < delay {
                let wait = delay - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Rate limiting");
                GatewayMetrics::record_throttle_wait(wait.as_secs_f64());
                std::thread::sleep(wait);
            }
        }
        self.last_request_instant = Some(Instant::now());
        self.last_request_time = Some(Utc::now());
    }
}

/// Response body for display: pretty JSON when it parses, raw text otherwise.
pub fn format_response_content(response: Option<&HttpResponse>) -> String {
    match response {
        None => "Null response".to_string(),
        Some(resp) => match resp.json_value() {
            Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| resp.text()),
            Err(_) => resp.text(),
        },
    }
}

/// Best human-readable reason for a failed response: the `message` or `error`
/// field of a JSON object body, else the raw body, else `HTTP <status>`.
pub fn extract_error_message(response: &HttpResponse) -> String {
    let fallback = format!("HTTP {}", response.status);
    match response.json_value() {
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .or_else(|| map.get("error"))
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or(fallback),
        Ok(_) => fallback,
        Err(_) => {
            let text = response.text().trim().to_string();
            if text.is_empty() {
                fallback
            } else {
                text
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::MemoryReporter;
    use crate::transport::TransportRequest;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    type Script = Arc<Mutex<VecDeque<std::result::Result<HttpResponse, TransportError>>>>;

    /// Replays scripted outcomes and records what it was asked to send.
    #[derive(Clone, Default)]
    struct ScriptedTransport {
        script: Script,
        sent: Arc<Mutex<Vec<(Instant, TransportRequest)>>>,
    }

    impl ScriptedTransport {
        fn respond(self, status: u16, body: &str) -> Self {
            self.script
                .lock()
                .unwrap()
                .push_back(Ok(HttpResponse::new(status, body.as_bytes().to_vec())));
            self
        }

        fn fail(self, err: TransportError) -> Self {
            self.script.lock().unwrap().push_back(Err(err));
            self
        }

        fn sent(&self) -> Vec<TransportRequest> {
            self.sent.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
        }

        fn sent_at(&self) -> Vec<Instant> {
            self.sent.lock().unwrap().iter().map(|(t, _)| *t).collect()
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: &TransportRequest) -> std::result::Result<HttpResponse, TransportError> {
            self.sent.lock().unwrap().push((Instant::now(), request.clone()));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::other("script exhausted")))
        }
    }

    fn gateway(transport: &ScriptedTransport) -> (Gateway, Arc<MemoryReporter>) {
        let reporter = Arc::new(MemoryReporter::new());
        let gw = Gateway::builder("https://api.example.com")
            .default_header("Accept", "application/json")
            .default_header("Authorization", "Bearer default")
            .transport(transport.clone())
            .reporter(reporter.clone())
            .build();
        (gw, reporter)
    }

    #[test]
    fn test_expected_status_returns_response() {
        let transport = ScriptedTransport::default().respond(200, r#"{"id":1}"#);
        let (mut gw, reporter) = gateway(&transport);

        let resp = gw
            .execute(RequestOptions::get("/users/1").expect(200))
            .unwrap()
            .expect("response");

        assert_eq!(resp.status, 200);
        assert_eq!(resp.json_value().unwrap(), json!({"id": 1}));
        assert_eq!(transport.sent()[0].url, "https://api.example.com/users/1");
        assert!(gw.is_connected());
        assert!(!gw.has_error());
        assert!(gw.last_request_time().is_some());
        assert_eq!(reporter.count(Severity::Success), 1);
    }

    #[test]
    fn test_unexpected_status_returns_none_and_warns() {
        let transport = ScriptedTransport::default().respond(404, r#"{"message":"not found"}"#);
        let (mut gw, reporter) = gateway(&transport);

        let result = gw.execute(RequestOptions::get("users/1").expect(200)).unwrap();

        assert!(result.is_none());
        assert!(gw.last_error().is_none());
        assert!(gw.is_connected());
        let rejection = gw.last_rejection().expect("rejection recorded");
        assert_eq!(rejection.status, 404);
        assert_eq!(rejection.message, "not found");
        assert!(reporter.count(Severity::Warning) > 0);
        assert!(reporter.contains("Status: 404"));
    }

    #[test]
    fn test_unexpected_status_is_fatal_when_requested() {
        let transport = ScriptedTransport::default().respond(500, "internal");
        let (mut gw, _) = gateway(&transport);

        let err = gw
            .execute(RequestOptions::get("/x").expect([200u16, 204]).fatal(true))
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(!err.is_transport());
        assert!(err.to_string().contains("internal"));
    }

    #[test]
    fn test_accept_any_default_treats_503_as_success() {
        let transport = ScriptedTransport::default().respond(503, "unavailable");
        let (mut gw, _) = gateway(&transport);

        let resp = gw.execute(RequestOptions::get("/health")).unwrap();

        assert_eq!(resp.map(|r| r.status), Some(503));
        assert!(gw.last_rejection().is_none());
    }

    #[test]
    fn test_transport_failure_updates_state() {
        let transport = ScriptedTransport::default()
            .fail(TransportError::connect("connection refused"))
            .respond(200, "{}");
        let (mut gw, reporter) = gateway(&transport);

        let result = gw.execute(RequestOptions::get("/users/1").expect(200)).unwrap();
        assert!(result.is_none());
        assert!(!gw.is_connected());
        assert!(gw.has_error());
        assert!(reporter.contains("connection refused"));

        // A later transport success clears the error even if validation fails.
        let result = gw.execute(RequestOptions::get("/users/1").expect(201)).unwrap();
        assert!(result.is_none());
        assert!(gw.is_connected());
        assert!(gw.last_error().is_none());
    }

    #[test]
    fn test_transport_failure_is_fatal_when_requested() {
        let transport = ScriptedTransport::default().fail(TransportError::connect("refused"));
        let (mut gw, _) = gateway(&transport);

        let err = gw
            .execute(RequestOptions::get("/users/1").fatal(true))
            .unwrap_err();

        assert!(err.is_transport());
        assert!(gw.last_error().is_some());
        assert!(!gw.check_connection());
    }

    #[test]
    fn test_quiet_suppresses_non_error_output() {
        let transport = ScriptedTransport::default()
            .respond(200, "{}")
            .respond(404, "{}")
            .fail(TransportError::Timeout(Duration::from_secs(1)));
        let (mut gw, reporter) = gateway(&transport);

        gw.execute(RequestOptions::get("/a").expect(200).quiet(true)).unwrap();
        gw.execute(RequestOptions::get("/b").expect(200).quiet(true)).unwrap();
        assert!(reporter.lines().is_empty());

        gw.execute(RequestOptions::get("/c").quiet(true)).unwrap();
        assert_eq!(reporter.lines().len(), 1);
        assert_eq!(reporter.count(Severity::Error), 1);
    }

    #[test]
    fn test_per_call_header_overrides_default() {
        let transport = ScriptedTransport::default().respond(200, "{}");
        let (mut gw, _) = gateway(&transport);

        gw.execute(
            RequestOptions::get("/me")
                .header("Authorization", "Bearer call")
                .header("X-Extra", "1"),
        )
        .unwrap();

        let sent = &transport.sent()[0];
        assert_eq!(sent.headers.get("Authorization").map(String::as_str), Some("Bearer call"));
        assert_eq!(sent.headers.get("Accept").map(String::as_str), Some("application/json"));
        assert_eq!(sent.headers.get("X-Extra").map(String::as_str), Some("1"));
        assert_eq!(gw.default_headers().get("Authorization").map(String::as_str), Some("Bearer default"));
    }

    #[test]
    fn test_request_forwards_body_query_and_timeout() {
        let transport = ScriptedTransport::default().respond(201, r#"{"id":101}"#);
        let (mut gw, reporter) = gateway(&transport);

        gw.execute(
            RequestOptions::post("/posts")
                .json(json!({"title": "t"}))
                .query("_limit", 5)
                .timeout(Duration::from_secs(3))
                .expect(201),
        )
        .unwrap()
        .expect("created");

        let sent = &transport.sent()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.query_params, vec![("_limit".to_string(), "5".to_string())]);
        assert_eq!(sent.timeout, Duration::from_secs(3));
        assert_eq!(sent.body, Some(RequestBody::Json(json!({"title": "t"}))));
        assert!(reporter.contains("Sending JSON payload"));
    }

    #[test]
    fn test_rate_limit_spaces_consecutive_requests() {
        let delay = Duration::from_millis(120);
        let transport = ScriptedTransport::default().respond(200, "{}").respond(200, "{}");
        let mut gw = Gateway::builder("https://api.example.com")
            .transport(transport.clone())
            .reporter(Arc::new(MemoryReporter::new()))
            .rate_limit(delay)
            .build();

        gw.execute(RequestOptions::get("/a")).unwrap();
        gw.execute(RequestOptions::get("/b")).unwrap();

        let times = transport.sent_at();
        assert_eq!(times.len(), 2);
        assert!(times[1].duration_since(times[0]) >= delay);
    }

    #[test]
    fn test_request_time_stamped_on_every_outcome() {
        let transport = ScriptedTransport::default()
            .fail(TransportError::connect("refused"))
            .respond(404, "{}");
        let (mut gw, _) = gateway(&transport);
        assert!(gw.last_request_time().is_none());

        gw.execute(RequestOptions::get("/a").expect(200)).unwrap();
        let after_failure = gw.last_request_time().expect("stamped after transport failure");

        gw.execute(RequestOptions::get("/b").expect(200)).unwrap();
        let after_rejection = gw.last_request_time().expect("stamped after rejection");

        assert!(after_rejection >= after_failure);
        assert!(gw.last_rejection().is_some());
    }

    #[test]
    fn test_rate_limit_applies_after_transport_failure() {
        let delay = Duration::from_millis(120);
        let transport = ScriptedTransport::default()
            .fail(TransportError::connect("refused"))
            .respond(200, "{}");
        let mut gw = Gateway::builder("https://api.example.com")
            .transport(transport.clone())
            .reporter(Arc::new(MemoryReporter::new()))
            .rate_limit(delay)
            .build();

        assert!(gw.execute(RequestOptions::get("/a")).unwrap().is_none());
        assert!(gw.execute(RequestOptions::get("/b")).unwrap().is_some());

        let times = transport.sent_at();
        assert!(times[1].duration_since(times[0]) >= delay);
    }

    #[test]
    fn test_build_error_keeps_connection_state() {
        let transport = ScriptedTransport::default()
            .respond(200, "{}")
            .fail(TransportError::Build("invalid header name".into()));
        let (mut gw, _) = gateway(&transport);

        gw.execute(RequestOptions::get("/ok")).unwrap();
        assert!(gw.is_connected());

        let result = gw.execute(RequestOptions::get("/bad")).unwrap();
        assert!(result.is_none());
        assert!(gw.is_connected());
        assert!(gw.last_error().map_or(false, TransportError::is_build));
    }

    #[test]
    fn test_raise_exceptions_skips_reporting() {
        let transport = ScriptedTransport::default()
            .respond(409, r#"{"error":"conflict"}"#)
            .fail(TransportError::connect("refused"));
        let (mut gw, reporter) = gateway(&transport);

        let err = gw
            .execute(RequestOptions::put("/items/1").expect(200).raise_exceptions(true))
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(gw.last_rejection().map(|r| r.message.as_str()), Some("conflict"));

        let err = gw
            .execute(RequestOptions::get("/items/1").raise_exceptions(true))
            .unwrap_err();
        assert!(err.is_transport());
        assert!(!gw.is_connected());

        assert_eq!(reporter.count(Severity::Warning), 0);
        assert_eq!(reporter.count(Severity::Error), 0);
    }

    #[test]
    fn test_check_status_code_probes_base_url() {
        let transport = ScriptedTransport::default().respond(200, "ok").respond(401, "no");
        let (mut gw, reporter) = gateway(&transport);

        assert!(gw.check_status_code(200));
        assert!(!gw.check_status_code(200));
        assert_eq!(transport.sent()[0].url, "https://api.example.com/");
        assert!(reporter.lines().is_empty());

        gw.clear_error();
        assert!(gw.last_rejection().is_none());
    }

    #[test]
    fn test_connect_reflects_transport_outcome() {
        let transport = ScriptedTransport::default()
            .respond(500, "")
            .fail(TransportError::connect("down"));
        let (mut gw, _) = gateway(&transport);

        assert!(!gw.check_connection());
        assert!(gw.connect());
        assert!(!gw.connect());
    }

    #[test]
    fn test_error_message_extraction() {
        let resp = HttpResponse::new(400, r#"{"error":"bad input"}"#);
        assert_eq!(extract_error_message(&resp), "bad input");

        let resp = HttpResponse::new(400, r#"{"message":"first","error":"second"}"#);
        assert_eq!(extract_error_message(&resp), "first");

        let resp = HttpResponse::new(502, "Bad Gateway");
        assert_eq!(extract_error_message(&resp), "Bad Gateway");

        let resp = HttpResponse::new(500, "");
        assert_eq!(extract_error_message(&resp), "HTTP 500");

        let resp = HttpResponse::new(409, "[1,2]");
        assert_eq!(extract_error_message(&resp), "HTTP 409");
    }

    #[test]
    fn test_format_response_content() {
        assert_eq!(format_response_content(None), "Null response");
        let resp = HttpResponse::new(200, r#"{"a":1}"#);
        assert_eq!(format_response_content(Some(&resp)), "{\n  \"a\": 1\n}");
        let resp = HttpResponse::new(200, "plain");
        assert_eq!(format_response_content(Some(&resp)), "plain");
    }

    #[test]
    fn test_from_config() {
        let mut config = GatewayConfig::new("https://cfg.example.com/");
        config.rate_limit_delay_ms = Some(5);
        config.quiet = true;
        config
            .default_headers
            .insert("X-Api-Key".to_string(), "k".to_string());

        let gw = Gateway::from_config(&config);
        assert_eq!(gw.base_url(), "https://cfg.example.com/");
        assert_eq!(gw.default_headers().len(), 1);
        assert!(gw.last_request_time().is_none());
    }
}
