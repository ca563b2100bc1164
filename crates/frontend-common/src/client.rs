//! Client construction and logging setup

use crm_core::ClientSettings;
use crm_http::{BuildError, CrmClient, CrmClientBuilder};
use std::sync::Arc;

use crate::{AlertNotifier, LocalStorageTokenStore, LocationNavigator, SpinnerOverlay};

/// Origin of the current page, used as the API base URL
fn get_base_url() -> Result<String, BuildError> {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .filter(|origin| origin.starts_with("http"))
        .ok_or_else(|| BuildError::Configuration("page origin is unavailable".into()))
}

/// Build a client for the page's own origin with the browser adapters
///
/// # Errors
///
/// Fails when the page origin cannot be determined
pub fn browser_client() -> Result<CrmClient, BuildError> {
    browser_client_with(&ClientSettings::default())
}

/// Like [`browser_client`], but with non-default paths
///
/// The settings' `base_url` is ignored; the page origin always wins.
///
/// # Errors
///
/// Fails when the page origin cannot be determined or a path is invalid
pub fn browser_client_with(settings: &ClientSettings) -> Result<CrmClient, BuildError> {
    CrmClientBuilder::from_settings(settings)
        .base_url(get_base_url()?)
        .token_store(Arc::new(LocalStorageTokenStore))
        .busy_indicator(Arc::new(SpinnerOverlay))
        .notifier(Arc::new(AlertNotifier))
        .navigator(Arc::new(LocationNavigator))
        .build()
}

/// Route `log` and `tracing` output to the browser console
pub fn init_logging() {
    wasm_logger::init(wasm_logger::Config::default());
}
