//! Review form engine
//!
//! Owns the [`FormState`] of a single review session. Every mutation goes
//! through the methods here, which resolve section ids and field paths
//! against the [`FormDefinition`] the engine was built from.
//!
//! Lifecycle:
//!
//! ```text
//!   Editing --submit() ok--> Submitted
//! ```
//!
//! Once submitted, every setter fails with
//! [`ReviewError::FormAlreadySubmitted`]; only the expand/collapse toggles and
//! read-only queries (including `save_draft`) remain available.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, ReviewError, ValidationReason};
use crate::progress::{compute_progress, ProgressBand};
use crate::schema::{FieldPath, FormDefinition};
use crate::snapshot::{DraftSnapshot, SubmissionRecord};
use crate::state::{
    FieldValue, FinalField, FinalObservations, FormState, RegulatoryApproval, ReviewDecision,
    Section, SectionStatus,
};

/// Pseudo-section id used when reporting errors on the closing block.
pub const FINAL_OBSERVATIONS_ID: &str = "finalObservations";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitted,
}

#[derive(Debug, Clone)]
pub struct ReviewFormEngine {
    definition: FormDefinition,
    state: FormState,
    submission: Option<SubmissionRecord>,
}

impl ReviewFormEngine {
    /// Start a fresh session: every section pending, every field blank.
    pub fn new(definition: FormDefinition) -> Result<Self> {
        definition.validate()?;
        let state = FormState::from_definition(&definition);
        debug!(form = %definition.name, sections = state.sections.len(), "Created review form");
        Ok(Self {
            definition,
            state,
            submission: None,
        })
    }

    /// Resume a session from a previously saved draft.
    ///
    /// The draft must carry exactly the definition's sections, each once,
    /// and each stored field must exist in the schema with a matching shape.
    /// Fields the draft omits start blank.
    pub fn from_draft(definition: FormDefinition, draft: &DraftSnapshot) -> Result<Self> {
        let mut engine = Self::new(definition)?;

        let mut seen = HashSet::new();
        for stored in &draft.state.sections {
            if !seen.insert(stored.id.as_str()) {
                return Err(ReviewError::DuplicateSection(stored.id.clone()));
            }
            let schema = engine
                .definition
                .find_section(&stored.id)
                .ok_or_else(|| ReviewError::UnknownSection(stored.id.clone()))?;

            for (name, value) in &stored.fields {
                let declared = schema
                    .find_field(name)
                    .ok_or_else(|| ReviewError::unknown_field(&stored.id, name))?;
                if declared.kind != value.kind() {
                    return Err(ReviewError::unknown_field(&stored.id, name));
                }
            }
        }

        for section in &mut engine.state.sections {
            let stored = draft
                .state
                .section(&section.id)
                .ok_or_else(|| ReviewError::UnknownSection(section.id.clone()))?;
            section.status = stored.status;
            section.observation = stored.observation.clone();
            section.expanded = stored.expanded;
            for (name, value) in &stored.fields {
                section.fields.insert(name.clone(), value.clone());
            }
        }
        engine.state.final_observations = draft.state.final_observations.clone();

        info!(
            form = %engine.definition.name,
            reviewed = engine.state.reviewed_count(),
            "Restored review form from draft"
        );
        Ok(engine)
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn phase(&self) -> FormPhase {
        if self.submission.is_some() {
            FormPhase::Submitted
        } else {
            FormPhase::Editing
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }

    /// The record produced by the successful submit, if any.
    pub fn submission(&self) -> Option<&SubmissionRecord> {
        self.submission.as_ref()
    }

    pub fn section(&self, section_id: &str) -> Result<&Section> {
        self.state
            .section(section_id)
            .ok_or_else(|| ReviewError::UnknownSection(section_id.to_string()))
    }

    pub fn section_status(&self, section_id: &str) -> Result<SectionStatus> {
        self.section(section_id).map(|s| s.status)
    }

    pub fn final_observations(&self) -> &FinalObservations {
        &self.state.final_observations
    }

    /// Current value at `path` inside a section.
    pub fn field(&self, section_id: &str, path: &FieldPath) -> Result<&str> {
        let section = self.section(section_id)?;
        self.resolve(section_id, path)?;
        section
            .fields
            .get(path.field())
            .and_then(|value| value.slot(path.subfield()))
            .ok_or_else(|| ReviewError::unknown_field(section_id, path))
    }

    fn ensure_editable(&self, operation: &str) -> Result<()> {
        if self.is_submitted() {
            warn!(form = %self.definition.name, operation, "Rejected edit on submitted form");
            return Err(ReviewError::FormAlreadySubmitted);
        }
        Ok(())
    }

    fn resolve(&self, section_id: &str, path: &FieldPath) -> Result<()> {
        let schema = self
            .definition
            .find_section(section_id)
            .ok_or_else(|| ReviewError::UnknownSection(section_id.to_string()))?;
        schema
            .resolve(path)
            .map(|_| ())
            .ok_or_else(|| ReviewError::unknown_field(section_id, path))
    }

    fn section_mut(&mut self, section_id: &str) -> Result<&mut Section> {
        self.state
            .section_mut(section_id)
            .ok_or_else(|| ReviewError::UnknownSection(section_id.to_string()))
    }

    /// Record a verdict. Leaves the observation untouched; an approved or
    /// reported section may carry an empty observation until submit.
    pub fn set_section_status(&mut self, section_id: &str, decision: ReviewDecision) -> Result<()> {
        self.section(section_id)?;
        self.ensure_editable("set_section_status")?;

        let section = self.section_mut(section_id)?;
        let previous = section.status;
        let current = SectionStatus::from(decision);
        section.status = current;
        debug!(section = section_id, from = %previous, to = %current, "Section status changed");
        Ok(())
    }

    /// Store the observation verbatim, without trimming.
    pub fn set_observation(&mut self, section_id: &str, text: &str) -> Result<()> {
        self.section(section_id)?;
        self.ensure_editable("set_observation")?;

        self.section_mut(section_id)?.observation = text.to_string();
        debug!(section = section_id, len = text.len(), "Observation updated");
        Ok(())
    }

    /// Write a string into the section's field tree. Any string is accepted;
    /// readings are not parsed or range-checked.
    pub fn set_field(&mut self, section_id: &str, path: &FieldPath, value: &str) -> Result<()> {
        self.resolve(section_id, path)?;
        self.ensure_editable("set_field")?;

        let kind = self
            .definition
            .find_section(section_id)
            .and_then(|s| s.find_field(path.field()))
            .map(|f| f.kind)
            .ok_or_else(|| ReviewError::unknown_field(section_id, path))?;

        let section = self.section_mut(section_id)?;
        let slot = section
            .fields
            .entry(path.field().to_string())
            .or_insert_with(|| FieldValue::empty(kind))
            .slot_mut(path.subfield())
            .ok_or_else(|| ReviewError::unknown_field(section_id, path))?;
        *slot = value.to_string();

        debug!(section = section_id, field = %path, "Field updated");
        Ok(())
    }

    /// Set one of the closing block's fields. Fields the form does not offer
    /// are unknown.
    ///
    /// The regulatory approval accepts a canonical name or drop-down label;
    /// an empty value clears it. The signature marker is present for any
    /// non-empty value and cleared by an empty one.
    pub fn set_final_observation(&mut self, field: FinalField, value: &str) -> Result<()> {
        if !self.definition.has_final_field(field) {
            return Err(ReviewError::unknown_field(FINAL_OBSERVATIONS_ID, field));
        }
        self.ensure_editable("set_final_observation")?;

        let approval = match field {
            FinalField::RegulatoryApproval if value.trim().is_empty() => None,
            FinalField::RegulatoryApproval => Some(RegulatoryApproval::parse(value).ok_or_else(
                || ReviewError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                },
            )?),
            _ => None,
        };

        let fin = &mut self.state.final_observations;
        match field {
            FinalField::Comments => fin.comments = value.to_string(),
            FinalField::ReportDate => fin.report_date = value.to_string(),
            FinalField::RegulatoryApproval => fin.regulatory_approval = approval,
            FinalField::Signature if value.is_empty() => fin.signature = None,
            FinalField::Signature => fin.signature = Some(value.to_string()),
            FinalField::Company => fin.company = value.to_string(),
            FinalField::Position => fin.position = value.to_string(),
        }

        debug!(field = %field, "Final observations updated");
        Ok(())
    }

    /// Same as [`Self::set_final_observation`], addressing the field by name.
    pub fn set_final_observation_by_name(&mut self, field: &str, value: &str) -> Result<()> {
        let field: FinalField = field
            .parse()
            .map_err(|name: String| ReviewError::unknown_field(FINAL_OBSERVATIONS_ID, name))?;
        self.set_final_observation(field, value)
    }

    /// Flip a section's expanded flag. Allowed after submission.
    pub fn toggle_expanded(&mut self, section_id: &str) -> Result<()> {
        let section = self.section_mut(section_id)?;
        section.expanded = !section.expanded;
        Ok(())
    }

    pub fn toggle_final_observations_expanded(&mut self) {
        let fin = &mut self.state.final_observations;
        fin.expanded = !fin.expanded;
    }

    /// Ids of required sections still pending, in declaration order.
    pub fn pending_sections(&self) -> Vec<&str> {
        self.state
            .sections
            .iter()
            .filter(|s| !s.status.is_reviewed())
            .map(|s| s.id.as_str())
            .collect()
    }

    /// Ids of reviewed sections whose observation is blank.
    pub fn missing_observations(&self) -> Vec<&str> {
        self.state
            .sections
            .iter()
            .filter(|s| s.status.is_reviewed() && !s.has_observation())
            .map(|s| s.id.as_str())
            .collect()
    }

    /// Required closing fields still blank, in checking order.
    pub fn missing_final_fields(&self) -> Vec<FinalField> {
        let fin = &self.state.final_observations;
        self.definition
            .required_final
            .iter()
            .copied()
            .filter(|f| !fin.is_filled(*f))
            .collect()
    }

    /// Percentage of required sections reviewed.
    pub fn compute_progress(&self) -> u8 {
        compute_progress(self.state.reviewed_count(), self.definition.required_count())
    }

    pub fn progress_band(&self) -> ProgressBand {
        ProgressBand::from_percent(self.compute_progress())
    }

    /// First failing submission check, in evaluation order.
    pub fn validate(&self) -> std::result::Result<(), ValidationReason> {
        if !self.state.sections.iter().all(|s| s.status.is_reviewed()) {
            return Err(ValidationReason::SectionsNotReviewed);
        }
        if self.definition.strict_observations && !self.missing_observations().is_empty() {
            return Err(ValidationReason::ObservationsMissing);
        }
        match self
            .state
            .final_observations
            .first_missing(&self.definition.required_final)
        {
            Some(field) if field.is_approval() => Err(ValidationReason::ApprovalIncomplete),
            Some(_) => Err(ValidationReason::FinalObservationsIncomplete),
            None => Ok(()),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate and freeze the form, stamping the submission with the
    /// current time.
    pub fn submit(&mut self) -> Result<SubmissionRecord> {
        self.submit_at(Utc::now())
    }

    pub fn submit_at(&mut self, now: DateTime<Utc>) -> Result<SubmissionRecord> {
        self.ensure_editable("submit")?;
        if let Err(reason) = self.validate() {
            info!(form = %self.definition.name, %reason, "Submission rejected");
            return Err(ReviewError::ValidationFailed(reason));
        }

        let record = SubmissionRecord {
            id: Uuid::new_v4(),
            form: self.definition.name.clone(),
            submitted_at: now,
            state: self.state.clone(),
        };
        self.submission = Some(record.clone());

        info!(form = %self.definition.name, id = %record.id, "Form submitted");
        Ok(record)
    }

    /// Snapshot the current state without validating it.
    pub fn save_draft(&self) -> DraftSnapshot {
        self.save_draft_at(Utc::now())
    }

    pub fn save_draft_at(&self, now: DateTime<Utc>) -> DraftSnapshot {
        info!(
            form = %self.definition.name,
            progress = self.compute_progress(),
            "Draft saved"
        );
        DraftSnapshot {
            form: self.definition.name.clone(),
            saved_at: now,
            state: self.state.clone(),
        }
    }
}
