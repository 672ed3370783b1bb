//! Review/approval form engine
//!
//! This crate holds the state machine behind the well-abandonment review
//! forms: sections that a supervisor approves or reports, nested parameter
//! readings, a closing block of final observations, and the checks that gate
//! submission.
//!
//! It is host-agnostic. The browser front end (`review-wasm`) and the
//! command-line tool (`review-cli`) both drive the same [`ReviewFormEngine`].
//!
//! ```
//! use review_core::{forms, ReviewDecision, ReviewFormEngine};
//!
//! let mut engine = ReviewFormEngine::new(forms::environmental_monitoring()).unwrap();
//! engine.set_field("waterSoilParameters", &("waterPh", "before").into(), "7.1").unwrap();
//! engine.set_section_status("generalInfo", ReviewDecision::Approved).unwrap();
//! assert_eq!(engine.compute_progress(), 25);
//! assert!(!engine.can_submit());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod forms;
pub mod notice;
pub mod progress;
pub mod schema;
pub mod snapshot;
pub mod state;

pub use engine::{FormPhase, ReviewFormEngine, FINAL_OBSERVATIONS_ID};
pub use error::{DefinitionError, Result, ReviewError, ValidationReason};
pub use notice::{Notice, NoticeLevel};
pub use progress::{compute_progress, ProgressBand};
pub use schema::{FieldKind, FieldPath, FieldSchema, FormDefinition, SectionSchema};
pub use snapshot::{DraftSnapshot, SubmissionRecord};
pub use state::{
    FieldValue, FinalField, FinalObservations, FormState, LocationRecord, MitigationRecord,
    ParameterRecord, RegulatoryApproval, ReviewDecision, Section, SectionStatus,
};
