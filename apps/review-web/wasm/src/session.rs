//! Stateful review session
//!
//! Holds the whole form in Rust memory. JavaScript forwards input events and
//! re-renders from [`ReviewSession::get_view`] whenever the change callback
//! fires.

use review_core::{
    forms, DraftSnapshot, FieldPath, FormDefinition, Notice, RegulatoryApproval,
    ReviewDecision, ReviewError, ReviewFormEngine,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::view::FormView;

/// Review session bound to one form definition
#[wasm_bindgen]
pub struct ReviewSession {
    engine: ReviewFormEngine,
    notice: Option<Notice>,
    change_callback: Option<js_sys::Function>,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn builtin_definition(form: &str) -> Result<FormDefinition, String> {
    forms::builtin(form).ok_or_else(|| format!("Unknown form: {}", form))
}

impl ReviewSession {
    fn from_engine(engine: ReviewFormEngine) -> Self {
        Self {
            engine,
            notice: None,
            change_callback: None,
        }
    }

    /// Internal constructor (testable without JsValue)
    pub(crate) fn open(form: &str) -> Result<Self, String> {
        let definition = builtin_definition(form)?;
        let engine = ReviewFormEngine::new(definition).map_err(|e| e.to_string())?;
        Ok(Self::from_engine(engine))
    }

    pub(crate) fn open_toml(toml: &str) -> Result<Self, String> {
        let definition = FormDefinition::from_toml_str(toml).map_err(|e| format!("{:#}", e))?;
        let engine = ReviewFormEngine::new(definition).map_err(|e| e.to_string())?;
        Ok(Self::from_engine(engine))
    }

    pub(crate) fn resume(form: &str, draft_json: &str) -> Result<Self, String> {
        let definition = builtin_definition(form)?;
        let draft = DraftSnapshot::from_json(draft_json)
            .map_err(|e| format!("Invalid draft JSON: {}", e))?;
        if draft.form != definition.name {
            return Err(format!(
                "Draft belongs to form '{}', not '{}'",
                draft.form, definition.name
            ));
        }
        let engine = ReviewFormEngine::from_draft(definition, &draft).map_err(|e| e.to_string())?;
        Ok(Self::from_engine(engine))
    }

    /// Run a mutation, record a notice on failure, and tell JavaScript to
    /// re-render on success.
    fn apply<F>(&mut self, op: F) -> Result<(), String>
    where
        F: FnOnce(&mut ReviewFormEngine) -> Result<(), ReviewError>,
    {
        match op(&mut self.engine) {
            Ok(()) => {
                self.notify_change();
                Ok(())
            }
            Err(err) => {
                let notice = Notice::for_error(&err);
                self.notice = Some(notice);
                Err(err.to_string())
            }
        }
    }

    pub(crate) fn decide(&mut self, section: &str, decision: &str) -> Result<(), String> {
        let decision: ReviewDecision = decision.parse()?;
        self.apply(|engine| engine.set_section_status(section, decision))
    }

    pub(crate) fn edit_field(&mut self, section: &str, path: &str, value: &str) -> Result<(), String> {
        let path: FieldPath = path.parse()?;
        self.apply(|engine| engine.set_field(section, &path, value))
    }

    pub(crate) fn edit_final(&mut self, field: &str, value: &str) -> Result<(), String> {
        self.apply(|engine| engine.set_final_observation_by_name(field, value))
    }

    pub(crate) fn submit_internal(&mut self) -> Result<String, String> {
        match self.engine.submit() {
            Ok(record) => {
                self.notice = Some(Notice::submitted());
                self.notify_change();
                record
                    .to_json()
                    .map_err(|e| format!("Serialization error: {}", e))
            }
            Err(err) => {
                self.notice = Some(Notice::for_error(&err));
                Err(err.to_string())
            }
        }
    }

    pub(crate) fn save_draft_internal(&mut self) -> Result<String, String> {
        let draft = self.engine.save_draft();
        self.notice = Some(Notice::draft_saved());
        draft
            .to_json()
            .map_err(|e| format!("Serialization error: {}", e))
    }

    pub(crate) fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn notify_change(&self) {
        if let Some(ref callback) = self.change_callback {
            let _ = callback.call0(&JsValue::null());
        }
    }
}

#[wasm_bindgen]
impl ReviewSession {
    /// Open a fresh session for a built-in form
    #[wasm_bindgen(constructor)]
    pub fn new(form: &str) -> Result<ReviewSession, JsValue> {
        Self::open(form).map_err(|e| JsValue::from_str(&e))
    }

    /// Open a fresh session for a form described in TOML
    #[wasm_bindgen(js_name = fromDefinition)]
    pub fn from_definition(toml: &str) -> Result<ReviewSession, JsValue> {
        Self::open_toml(toml).map_err(|e| JsValue::from_str(&e))
    }

    /// Resume a built-in form from a draft produced by `saveDraft`
    #[wasm_bindgen(js_name = fromDraft)]
    pub fn from_draft(form: &str, draft_json: &str) -> Result<ReviewSession, JsValue> {
        Self::resume(form, draft_json).map_err(|e| JsValue::from_str(&e))
    }

    /// Set a callback fired after every accepted change
    /// Callback signature: () => void
    #[wasm_bindgen(js_name = setChangeCallback)]
    pub fn set_change_callback(&mut self, callback: js_sys::Function) {
        self.change_callback = Some(callback);
    }

    /// Record a verdict: "approved" or "reported"
    #[wasm_bindgen(js_name = setSectionStatus)]
    pub fn set_section_status(&mut self, section: &str, decision: &str) -> Result<(), JsValue> {
        self.decide(section, decision)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = setObservation)]
    pub fn set_observation(&mut self, section: &str, text: &str) -> Result<(), JsValue> {
        self.apply(|engine| engine.set_observation(section, text))
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Set a field value. Path is "field" or "field.sub", e.g. "waterPh.before"
    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(&mut self, section: &str, path: &str, value: &str) -> Result<(), JsValue> {
        self.edit_field(section, path, value)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Set a closing-block field the form offers: comments, reportDate,
    /// regulatoryApproval, signature, company or position
    #[wasm_bindgen(js_name = setFinalObservation)]
    pub fn set_final_observation(&mut self, field: &str, value: &str) -> Result<(), JsValue> {
        self.edit_final(field, value)
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = toggleExpanded)]
    pub fn toggle_expanded(&mut self, section: &str) -> Result<(), JsValue> {
        self.apply(|engine| engine.toggle_expanded(section))
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = toggleFinalObservations)]
    pub fn toggle_final_observations(&mut self) {
        self.engine.toggle_final_observations_expanded();
        self.notify_change();
    }

    /// Percentage of sections reviewed
    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> u8 {
        self.engine.compute_progress()
    }

    #[wasm_bindgen(js_name = canSubmit)]
    pub fn can_submit(&self) -> bool {
        self.engine.can_submit()
    }

    #[wasm_bindgen(getter, js_name = isSubmitted)]
    pub fn is_submitted(&self) -> bool {
        self.engine.is_submitted()
    }

    #[wasm_bindgen(js_name = getPendingSections)]
    pub fn get_pending_sections(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.pending_sections())
    }

    /// Full render model for the current state
    #[wasm_bindgen(js_name = getView)]
    pub fn get_view(&self) -> Result<JsValue, JsValue> {
        to_js(&FormView::build(&self.engine))
    }

    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.state())
    }

    /// Validate and submit. Returns the submission record as JSON
    pub fn submit(&mut self) -> Result<String, JsValue> {
        self.submit_internal().map_err(|e| JsValue::from_str(&e))
    }

    /// Snapshot the form without validation. Returns the draft as JSON
    #[wasm_bindgen(js_name = saveDraft)]
    pub fn save_draft(&mut self) -> Result<String, JsValue> {
        self.save_draft_internal()
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Latest toast message, or undefined
    #[wasm_bindgen(js_name = getNotice)]
    pub fn get_notice(&self) -> Result<JsValue, JsValue> {
        match &self.notice {
            Some(notice) => to_js(notice),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = dismissNotice)]
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

/// Options for the regulatory approval drop-down as [{ value, label }]
#[wasm_bindgen(js_name = regulatoryApprovalOptions)]
pub fn regulatory_approval_options() -> Result<JsValue, JsValue> {
    #[derive(Serialize)]
    struct Choice {
        value: RegulatoryApproval,
        label: &'static str,
    }

    let choices: Vec<_> = RegulatoryApproval::ALL
        .iter()
        .map(|a| Choice {
            value: *a,
            label: a.label(),
        })
        .collect();
    to_js(&choices)
}

#[wasm_bindgen(js_name = wellStatusOptions)]
pub fn well_status_options() -> Result<JsValue, JsValue> {
    to_js(&forms::WELL_STATUS_OPTIONS)
}

/// Names of the built-in forms
#[wasm_bindgen(js_name = builtinForms)]
pub fn builtin_forms() -> Result<JsValue, JsValue> {
    to_js(&forms::BUILTIN_FORMS)
}


// Browser-only tests for the JsValue surface
#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn change_count() -> f64 {
        js_sys::Reflect::get(&js_sys::global(), &"__reviewChanges".into())
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    #[wasm_bindgen_test]
    fn test_change_callback_fires_on_accepted_edits() {
        let mut session = ReviewSession::new(forms::ENVIRONMENTAL_MONITORING).unwrap();
        session.set_change_callback(js_sys::Function::new_no_args(
            "globalThis.__reviewChanges = (globalThis.__reviewChanges || 0) + 1;",
        ));
        let before = change_count();

        session.set_section_status("generalInfo", "approved").unwrap();
        session.set_observation("generalInfo", "Sin novedades").unwrap();
        assert_eq!(change_count(), before + 2.0);

        assert!(session.set_section_status("nope", "approved").is_err());
        assert_eq!(change_count(), before + 2.0);
    }

    #[wasm_bindgen_test]
    fn test_notice_roundtrip() {
        let mut session = ReviewSession::new(forms::ENVIRONMENTAL_MONITORING).unwrap();
        assert!(session.get_notice().unwrap().is_undefined());

        assert!(session.submit().is_err());
        assert!(session.get_notice().unwrap().is_object());

        session.dismiss_notice();
        assert!(session.get_notice().unwrap().is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_view_serializes() {
        let session = ReviewSession::new(forms::WELL_EVALUATION).unwrap();
        let view = session.get_view().unwrap();
        assert!(view.is_object());
        assert!(regulatory_approval_options().unwrap().is_object());
    }
}
