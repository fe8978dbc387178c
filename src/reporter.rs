//! Output channel for gateway outcomes.
//!
//! The gateway never formats console output itself; it hands a severity, a
//! symbol and a message to a [`Reporter`], which decides how (and whether) to
//! show it.

use std::fmt;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Debug => "🔍",
            Severity::Info => "ℹ️",
            Severity::Success => "✅",
            Severity::Warning => "⚠️",
            Severity::Error => "❌",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

pub trait Reporter: Send + Sync {
    fn report(&self, severity: Severity, symbol: &str, message: &str);

    /// Renders a titled key/value block, one line per entry.
    fn properties(&self, severity: Severity, title: &str, details: &[(String, String)]) {
        self.report(severity, severity.symbol(), title);
        for (key, value) in details {
            self.report(severity, "  ", &format!("{}: {}", key, value));
        }
    }
}

/// Default reporter: forwards every line to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, severity: Severity, symbol: &str, message: &str) {
        match severity {
            Severity::Debug => debug!(symbol, "{}", message),
            Severity::Info => info!(symbol, "{}", message),
            Severity::Success => info!(symbol, outcome = "success", "{}", message),
            Severity::Warning => warn!(symbol, "{}", message),
            Severity::Error => error!(symbol, "{}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedLine {
    pub severity: Severity,
    pub symbol: String,
    pub message: String,
}

/// Keeps every reported line in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<ReportedLine>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<ReportedLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.lines().iter().filter(|l| l.severity == severity).count()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.message.contains(needle))
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, severity: Severity, symbol: &str, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(ReportedLine {
                severity,
                symbol: symbol.to_string(),
                message: message.to_string(),
            });
        }
    }
}
