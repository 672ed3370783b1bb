//! Immutable snapshots handed to persistence and display collaborators
//!
//! JSON shape:
//!
//! ```json
//! {
//!   "form": "environmental-monitoring",
//!   "sections": [{ "id": "generalInfo", "status": "approved", "observation": "ok", "fields": {} }],
//!   "finalObservations": { "comments": "", "reportDate": "", "regulatoryApproval": null },
//!   "submittedAt": "2024-06-30T12:00:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{FormState, SectionStatus};

/// Unvalidated copy of the form, produced by "save draft".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    /// Name of the form definition the draft belongs to
    pub form: String,
    pub saved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: FormState,
}

/// Validated, terminal copy of the form, produced by a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub form: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: FormState,
}

impl DraftSnapshot {
    pub fn statuses(&self) -> Vec<(&str, SectionStatus)> {
        self.state.statuses()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl SubmissionRecord {
    pub fn statuses(&self) -> Vec<(&str, SectionStatus)> {
        self.state.statuses()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
