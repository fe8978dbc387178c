//! Gateway request metrics
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the host
//! application installs a recorder.

use std::time::Instant;

pub const REQUESTS_TOTAL: &str = "restgate_requests_total";
pub const TRANSPORT_FAILURES_TOTAL: &str = "restgate_transport_failures_total";
pub const STATUS_REJECTIONS_TOTAL: &str = "restgate_status_rejections_total";
pub const REQUEST_DURATION_SECONDS: &str = "restgate_request_duration_seconds";
pub const THROTTLE_WAIT_SECONDS: &str = "restgate_throttle_wait_seconds";

pub struct GatewayMetrics;

impl GatewayMetrics {
    pub fn record_request(method: &str) {
        ::metrics::counter!(REQUESTS_TOTAL, "method" => method.to_string()).increment(1);
    }

    pub fn record_transport_failure() {
        ::metrics::counter!(TRANSPORT_FAILURES_TOTAL).increment(1);
    }

    pub fn record_status_rejection(status: u16) {
        ::metrics::counter!(STATUS_REJECTIONS_TOTAL, "status" => status.to_string()).increment(1);
    }

    pub fn record_throttle_wait(secs: f64) {
        ::metrics::histogram!(THROTTLE_WAIT_SECONDS).record(secs);
    }
}

/// Records the elapsed time into the request duration histogram when dropped.
pub struct TimingGuard {
    start: Instant,
}

impl TimingGuard {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        ::metrics::histogram!(REQUEST_DURATION_SECONDS).record(self.start.elapsed().as_secs_f64());
    }
}
