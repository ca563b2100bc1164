//! Page navigation

use crm_http::Navigator;
use tracing::{info, warn};

/// Navigates by assigning `window.location.href`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn redirect_to(&self, path: &str) {
        info!(%path, "Redirecting");
        let Some(window) = web_sys::window() else {
            warn!(%path, "No window to redirect");
            return;
        };
        if let Err(err) = window.location().set_href(path) {
            warn!(%path, error = ?err, "Redirect failed");
        }
    }
}
