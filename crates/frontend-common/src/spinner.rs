//! Full-screen loading overlay

use crm_http::BusyIndicator;
use tracing::debug;
use wasm_bindgen::JsValue;
use web_sys::Document;

/// Element id of the overlay
pub const SPINNER_OVERLAY_ID: &str = "spinner-overlay";

const OVERLAY_CLASS: &str =
    "fixed inset-0 z-50 flex items-center justify-center bg-black bg-opacity-25";
const SPINNER_CLASS: &str =
    "w-10 h-10 border-4 border-gray-200 border-t-blue-500 rounded-full animate-spin";

/// Busy indicator that covers the page while a request is in flight
///
/// Only one overlay exists at a time; `begin` replaces any leftover one.
/// Without a document (workers, non-browser hosts) both calls do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinnerOverlay;

fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

impl SpinnerOverlay {
    fn remove_existing(document: &Document) {
        if let Some(existing) = document.get_element_by_id(SPINNER_OVERLAY_ID) {
            existing.remove();
        }
    }

    fn show(document: &Document) -> Result<(), JsValue> {
        let Some(body) = document.body() else {
            return Ok(());
        };

        let overlay = document.create_element("div")?;
        overlay.set_id(SPINNER_OVERLAY_ID);
        overlay.set_class_name(OVERLAY_CLASS);

        let spinner = document.create_element("div")?;
        spinner.set_class_name(SPINNER_CLASS);
        overlay.append_child(&spinner)?;

        body.append_child(&overlay)?;
        Ok(())
    }
}

impl BusyIndicator for SpinnerOverlay {
    fn begin(&self) {
        let Some(document) = document() else {
            return;
        };
        Self::remove_existing(&document);
        if let Err(err) = Self::show(&document) {
            debug!(error = ?err, "Could not show spinner overlay");
        }
    }

    fn end(&self) {
        if let Some(document) = document() {
            Self::remove_existing(&document);
        }
    }
}
