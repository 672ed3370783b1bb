//! Form state tree
//!
//! Plain data: every mutation goes through [`crate::engine::ReviewFormEngine`],
//! which resolves paths against the declared schema before touching anything
//! here.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldKind, FormDefinition, SectionSchema};

/// Review outcome of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionStatus {
    #[default]
    Pending,
    Approved,
    Reported,
}

impl SectionStatus {
    pub fn is_reviewed(self) -> bool {
        self != SectionStatus::Pending
    }

    /// Badge text shown by the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            SectionStatus::Pending => "Pendiente",
            SectionStatus::Approved => "Aprobado",
            SectionStatus::Reported => "Reportado",
        }
    }
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionStatus::Pending => "pending",
            SectionStatus::Approved => "approved",
            SectionStatus::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// A reviewer's verdict on a section. `Pending` is not a verdict, so a
/// reviewed section never returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewDecision {
    Approved,
    Reported,
}

impl From<ReviewDecision> for SectionStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => SectionStatus::Approved,
            ReviewDecision::Reported => SectionStatus::Reported,
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "approved" | "Approved" | "approve" => Ok(ReviewDecision::Approved),
            "reported" | "Reported" | "report" => Ok(ReviewDecision::Reported),
            other => Err(format!("Unknown review decision: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub latitude: String,
    pub longitude: String,
}

/// Readings of one parameter at the three abandonment stages. The unit comes
/// from the field schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub before: String,
    pub during: String,
    pub after: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MitigationRecord {
    pub description: String,
    pub implementation_date: String,
}

/// Value stored under one field name.
///
/// Serialized untagged: flat values are JSON strings, records are objects
/// whose keys identify the record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Location(LocationRecord),
    Parameter(ParameterRecord),
    Mitigation(MitigationRecord),
}

impl FieldValue {
    /// Blank value of the given shape.
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Location => FieldValue::Location(LocationRecord::default()),
            FieldKind::Parameter => FieldValue::Parameter(ParameterRecord::default()),
            FieldKind::Mitigation => FieldValue::Mitigation(MitigationRecord::default()),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Location(_) => FieldKind::Location,
            FieldValue::Parameter(_) => FieldKind::Parameter,
            FieldValue::Mitigation(_) => FieldKind::Mitigation,
        }
    }

    /// The string slot addressed by `sub` (`None` for flat values).
    pub fn slot(&self, sub: Option<&str>) -> Option<&str> {
        let slot = match (self, sub) {
            (FieldValue::Text(text), None) => text,
            (FieldValue::Location(loc), Some("latitude")) => &loc.latitude,
            (FieldValue::Location(loc), Some("longitude")) => &loc.longitude,
            (FieldValue::Parameter(p), Some("before")) => &p.before,
            (FieldValue::Parameter(p), Some("during")) => &p.during,
            (FieldValue::Parameter(p), Some("after")) => &p.after,
            (FieldValue::Mitigation(m), Some("description")) => &m.description,
            (FieldValue::Mitigation(m), Some("implementationDate")) => &m.implementation_date,
            _ => return None,
        };
        Some(slot.as_str())
    }

    pub fn slot_mut(&mut self, sub: Option<&str>) -> Option<&mut String> {
        match (self, sub) {
            (FieldValue::Text(text), None) => Some(text),
            (FieldValue::Location(loc), Some("latitude")) => Some(&mut loc.latitude),
            (FieldValue::Location(loc), Some("longitude")) => Some(&mut loc.longitude),
            (FieldValue::Parameter(p), Some("before")) => Some(&mut p.before),
            (FieldValue::Parameter(p), Some("during")) => Some(&mut p.during),
            (FieldValue::Parameter(p), Some("after")) => Some(&mut p.after),
            (FieldValue::Mitigation(m), Some("description")) => Some(&mut m.description),
            (FieldValue::Mitigation(m), Some("implementationDate")) => {
                Some(&mut m.implementation_date)
            }
            _ => None,
        }
    }
}

fn default_expanded() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub status: SectionStatus,
    #[serde(default)]
    pub observation: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    /// Presentation only; never consulted by validation
    #[serde(default = "default_expanded")]
    pub expanded: bool,
}

impl Section {
    /// Fresh pending section with a blank value for every declared field.
    pub fn from_schema(schema: &SectionSchema) -> Self {
        Self {
            id: schema.id.clone(),
            status: SectionStatus::Pending,
            observation: String::new(),
            fields: schema
                .fields
                .iter()
                .map(|f| (f.name.clone(), FieldValue::empty(f.kind)))
                .collect(),
            expanded: true,
        }
    }

    pub fn has_observation(&self) -> bool {
        !self.observation.is_empty()
    }
}

/// Regulator's verdict recorded in the closing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegulatoryApproval {
    Approved,
    Rejected,
    NeedsReview,
}

impl RegulatoryApproval {
    pub const ALL: [RegulatoryApproval; 3] = [
        RegulatoryApproval::Approved,
        RegulatoryApproval::Rejected,
        RegulatoryApproval::NeedsReview,
    ];

    /// Option text shown in the approval drop-down.
    pub fn label(self) -> &'static str {
        match self {
            RegulatoryApproval::Approved => "Aprobado",
            RegulatoryApproval::Rejected => "Rechazado",
            RegulatoryApproval::NeedsReview => "Requiere revisión",
        }
    }

    /// Parse either the canonical name or the drop-down label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "approved" | "Approved" | "Aprobado" => Some(RegulatoryApproval::Approved),
            "rejected" | "Rejected" | "Rechazado" => Some(RegulatoryApproval::Rejected),
            "needsReview" | "NeedsReview" | "needs_review" | "Requiere revisión" => {
                Some(RegulatoryApproval::NeedsReview)
            }
            _ => None,
        }
    }
}

/// Settable fields of the closing block. Which of them a form offers, and
/// which gate submission, is declared on the [`FormDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinalField {
    Comments,
    ReportDate,
    RegulatoryApproval,
    Signature,
    /// Approving company
    Company,
    /// Position of the approving person within the company
    Position,
}

impl FinalField {
    pub fn name(self) -> &'static str {
        match self {
            FinalField::Comments => "comments",
            FinalField::ReportDate => "reportDate",
            FinalField::RegulatoryApproval => "regulatoryApproval",
            FinalField::Signature => "signature",
            FinalField::Company => "company",
            FinalField::Position => "position",
        }
    }

    /// Part of the sign-off block rather than the observations proper.
    pub fn is_approval(self) -> bool {
        matches!(self, FinalField::Company | FinalField::Position)
    }
}

impl fmt::Display for FinalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FinalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comments" => Ok(FinalField::Comments),
            "reportDate" => Ok(FinalField::ReportDate),
            "regulatoryApproval" => Ok(FinalField::RegulatoryApproval),
            "signature" => Ok(FinalField::Signature),
            "company" => Ok(FinalField::Company),
            "position" => Ok(FinalField::Position),
            other => Err(other.to_string()),
        }
    }
}

/// Closing block of the form. Has no review status of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalObservations {
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub report_date: String,
    #[serde(default)]
    pub regulatory_approval: Option<RegulatoryApproval>,
    /// Signature marker; presence only, no image payload
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub position: String,
    #[serde(default = "default_expanded")]
    pub expanded: bool,
}

impl Default for FinalObservations {
    fn default() -> Self {
        Self {
            comments: String::new(),
            report_date: String::new(),
            regulatory_approval: None,
            signature: None,
            company: String::new(),
            position: String::new(),
            expanded: true,
        }
    }
}

impl FinalObservations {
    pub fn is_filled(&self, field: FinalField) -> bool {
        match field {
            FinalField::Comments => !self.comments.is_empty(),
            FinalField::ReportDate => !self.report_date.is_empty(),
            FinalField::RegulatoryApproval => self.regulatory_approval.is_some(),
            FinalField::Signature => self.signature.is_some(),
            FinalField::Company => !self.company.is_empty(),
            FinalField::Position => !self.position.is_empty(),
        }
    }

    /// First of `required` still blank, in the given order.
    pub fn first_missing(&self, required: &[FinalField]) -> Option<FinalField> {
        required.iter().copied().find(|f| !self.is_filled(*f))
    }

    pub fn is_complete(&self, required: &[FinalField]) -> bool {
        self.first_missing(required).is_none()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}

/// Aggregate root: required sections in declaration order plus the closing
/// block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub sections: Vec<Section>,
    #[serde(default)]
    pub final_observations: FinalObservations,
}

impl FormState {
    pub fn from_definition(definition: &FormDefinition) -> Self {
        Self {
            sections: definition.sections.iter().map(Section::from_schema).collect(),
            final_observations: FinalObservations::default(),
        }
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn reviewed_count(&self) -> usize {
        self.sections.iter().filter(|s| s.status.is_reviewed()).count()
    }

    /// Section id -> status, in declaration order.
    pub fn statuses(&self) -> Vec<(&str, SectionStatus)> {
        self.sections
            .iter()
            .map(|s| (s.id.as_str(), s.status))
            .collect()
    }
}
