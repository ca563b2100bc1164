//! Browser adapters for the CRM HTTP client
//!
//! Implements the client's collaborator traits on top of the DOM and wires
//! them into a ready-to-use [`CrmClient`](crm_http::CrmClient).

pub mod client;
pub mod navigation;
pub mod notify;
pub mod spinner;
pub mod storage;
pub mod transaction;

pub use client::{browser_client, init_logging};
pub use navigation::LocationNavigator;
pub use notify::AlertNotifier;
pub use spinner::SpinnerOverlay;
pub use storage::LocalStorageTokenStore;
pub use transaction::{TransactionPage, load_transaction_page, show_transaction};
