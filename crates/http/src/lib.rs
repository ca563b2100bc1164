//! Authenticated HTTP data layer for the CRM web client
//!
//! [`client::CrmClient`] issues bearer-authenticated requests against the CRM
//! REST backend, refreshes an expired access token once per request, and
//! reports failures through pluggable UI collaborators so the crate has no
//! browser dependency of its own.

pub mod client;
pub mod types;

pub use client::error::{BuildError, RequestError};
pub use client::session::{MemoryTokenStore, Session, TokenStore};
pub use client::transaction::{Transaction, TransactionStatus};
pub use client::ui::{BusyIndicator, Navigator, Notifier, Severity};
pub use client::{CrmClient, CrmClientBuilder};
pub use types::{ApiRequest, ApiResponse, RequestMethod};
