use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which submission check failed.
///
/// Checks run in a fixed order and only the first failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationReason {
    /// At least one required section is still pending.
    SectionsNotReviewed,
    /// A reviewed section has a blank observation (strict forms only).
    ObservationsMissing,
    /// A required closing-block observation field is empty.
    FinalObservationsIncomplete,
    /// The approving company or position is empty.
    ApprovalIncomplete,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationReason::SectionsNotReviewed => "not every section has been reviewed",
            ValidationReason::ObservationsMissing => "a reviewed section has no observation",
            ValidationReason::FinalObservationsIncomplete => "final observations are incomplete",
            ValidationReason::ApprovalIncomplete => "approval information is incomplete",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Section listed more than once: {0}")]
    DuplicateSection(String),

    #[error("Unknown field '{path}' in section '{section}'")]
    UnknownField { section: String, path: String },

    #[error("Form has already been submitted")]
    FormAlreadySubmitted,

    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationReason),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

impl ReviewError {
    pub(crate) fn unknown_field(section: &str, path: impl fmt::Display) -> Self {
        ReviewError::UnknownField {
            section: section.to_string(),
            path: path.to_string(),
        }
    }
}

/// Problems with a form definition, caught before any engine is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Form '{0}' declares no sections")]
    NoSections(String),

    #[error("Section id must not be empty")]
    EmptySectionId,

    #[error("Duplicate section id: {0}")]
    DuplicateSection(String),

    #[error("Field name must not be empty in section '{0}'")]
    EmptyFieldName(String),

    #[error("Duplicate field '{field}' in section '{section}'")]
    DuplicateField { section: String, field: String },

    #[error("Required closing field '{0}' is not offered by the form")]
    UndeclaredFinalField(String),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
