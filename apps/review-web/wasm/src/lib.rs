//! WASM bindings for the environmental review forms
//!
//! All form state lives in Rust inside a [`ReviewSession`]. JavaScript only
//! wires DOM events to session calls and re-renders from `getView()`.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { ReviewSession } from './pkg/review_wasm.js';
//!
//! await init();
//!
//! const session = new ReviewSession("environmental-monitoring");
//! session.setChangeCallback(() => render(session.getView()));
//!
//! session.setField("waterSoilParameters", "waterPh.before", "7.2");
//! session.setSectionStatus("waterSoilParameters", "reported");
//! session.setObservation("waterSoilParameters", "pH fuera de rango");
//!
//! localStorage.setItem("draft", session.saveDraft());
//!
//! if (session.canSubmit()) {
//!     const record = session.submit();
//! }
//! showToast(session.getNotice());
//! ```

pub mod session;
pub mod view;

use wasm_bindgen::prelude::*;

pub use session::ReviewSession;
pub use view::{FieldView, FinalObservationsView, FormView, InputView, SectionView};

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Review forms WASM initialized".into());
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_package() {
        assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
    }
}
