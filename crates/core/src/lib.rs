//! CRM client core types and utilities

pub mod settings;

#[cfg(all(feature = "tracing", not(target_arch = "wasm32")))]
pub mod tracing;

pub use settings::{ClientSettings, SettingsError};
