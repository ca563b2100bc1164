//! Tracing bootstrap for native consumers of the CRM client
//!
//! Browser builds log through `wasm-logger` instead; see `crm-frontend-common`.

pub mod config;
pub mod init;

pub use config::InstrumentationConfig;
pub use init::{init_default, init_tracing};
