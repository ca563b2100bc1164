//! Notifications through `window.alert`

use crm_http::{Notifier, Severity};
use tracing::{error, info, warn};

/// Shows every notification as a blocking browser alert
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!(%title, %message, "Notification"),
            Severity::Warning => warn!(%title, %message, "Notification"),
            Severity::Info | Severity::Success => info!(%title, %message, "Notification"),
        }

        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&format!("{title}: {message}"));
        }
    }
}
