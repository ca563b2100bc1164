//! Browser-side collaborators the client reports to
//!
//! The client never touches the DOM. Loading overlays, user-visible messages
//! and page navigation are delegated to these traits; `crm-frontend-common`
//! provides the browser implementations.

use std::fmt;
use tracing::{error, info, warn};

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Global busy/loading indicator
pub trait BusyIndicator: Send + Sync {
    fn begin(&self);

    /// Must be idempotent and safe to call without a matching `begin`
    fn end(&self);
}

/// Sink for user-visible messages
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str, severity: Severity);
}

/// Unconditional client-side navigation
pub trait Navigator: Send + Sync {
    fn redirect_to(&self, path: &str);
}

/// Busy indicator that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBusyIndicator;

impl BusyIndicator for NoopBusyIndicator {
    fn begin(&self) {}

    fn end(&self) {}
}

/// Notifier that writes to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!(%title, %message, "Notification"),
            Severity::Warning => warn!(%title, %message, "Notification"),
            Severity::Info | Severity::Success => info!(%title, %message, "Notification"),
        }
    }
}

/// Navigator for headless use; records the redirect in the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn redirect_to(&self, path: &str) {
        info!(%path, "Redirect requested");
    }
}

/// Holds the busy indicator for the lifetime of one network attempt
pub(crate) struct BusyGuard<'a> {
    indicator: &'a dyn BusyIndicator,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn begin(indicator: &'a dyn BusyIndicator) -> Self {
        indicator.begin();
        Self { indicator }
    }

    /// Release the indicator now rather than at end of scope
    pub(crate) fn end(self) {}
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.indicator.end();
    }
}
