//! Transaction detail page flow
//!
//! The detail page is only reachable from the dashboard: opening a
//! transaction marks the tab's `sessionStorage`, and the page sends visitors
//! without that mark back to the dashboard.

use crm_http::{CrmClient, Navigator, Transaction};
use tracing::{debug, warn};
use web_sys::{Storage, UrlSearchParams};

/// `sessionStorage` key marking navigation from the dashboard
pub const FROM_DASHBOARD_KEY: &str = "from_dashboard";

pub const DASHBOARD_PATH: &str = "/dashboard/";
pub const TRANSACTION_PATH: &str = "/transaction/";

/// What the transaction page should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPage {
    /// Not opened from the dashboard; the browser was sent back there
    RedirectedToDashboard,
    /// The URL carries no usable `id`
    MissingId,
    /// The fetch failed and the user has already been told
    Unavailable,
    Ready(Transaction),
}

fn session_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.session_storage().ok().flatten())
}

/// Open a transaction from the dashboard
pub fn show_transaction(navigator: &dyn Navigator, id: i64) {
    match session_storage() {
        Some(storage) => {
            if let Err(err) = storage.set_item(FROM_DASHBOARD_KEY, "true") {
                warn!(error = ?err, "Failed to mark dashboard navigation");
            }
        }
        None => warn!("sessionStorage unavailable, transaction page will bounce"),
    }
    navigator.redirect_to(&format!("{TRANSACTION_PATH}?id={id}"));
}

/// Whether this tab reached the current page through [`show_transaction`]
pub fn opened_from_dashboard() -> bool {
    session_storage()
        .and_then(|storage| storage.get_item(FROM_DASHBOARD_KEY).ok().flatten())
        .is_some_and(|flag| flag == "true")
}

/// Transaction id from a query string such as `?id=42`
pub fn transaction_id(search: &str) -> Option<i64> {
    UrlSearchParams::new_with_str(search)
        .ok()?
        .get("id")?
        .parse()
        .ok()
}

fn current_search() -> Option<String> {
    web_sys::window().and_then(|w| w.location().search().ok())
}

/// Resolve the transaction page for the current location
pub async fn load_transaction_page(
    client: &CrmClient,
    navigator: &dyn Navigator,
) -> TransactionPage {
    if !opened_from_dashboard() {
        debug!("Transaction page opened directly, returning to dashboard");
        navigator.redirect_to(DASHBOARD_PATH);
        return TransactionPage::RedirectedToDashboard;
    }

    let Some(id) = current_search().as_deref().and_then(transaction_id) else {
        return TransactionPage::MissingId;
    };

    client
        .transaction(id)
        .await
        .map_or(TransactionPage::Unavailable, TransactionPage::Ready)
}
