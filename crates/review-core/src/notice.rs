//! User-facing notifications (the dashboard's toast messages)

use serde::{Deserialize, Serialize};

use crate::error::{ReviewError, ValidationReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.to_string(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn submitted() -> Self {
        Self::success("Formulario enviado con éxito.")
    }

    pub fn draft_saved() -> Self {
        Self::success("Borrador guardado con éxito.")
    }

    pub fn for_error(err: &ReviewError) -> Self {
        match err {
            ReviewError::ValidationFailed(ValidationReason::SectionsNotReviewed) => {
                Self::error("Debe revisar y aprobar o reportar todas las secciones.")
            }
            ReviewError::ValidationFailed(ValidationReason::ObservationsMissing) => {
                Self::error("Debe escribir una observación en cada sección revisada.")
            }
            ReviewError::ValidationFailed(ValidationReason::FinalObservationsIncomplete) => {
                Self::error("Debe completar la información de observaciones finales.")
            }
            ReviewError::ValidationFailed(ValidationReason::ApprovalIncomplete) => {
                Self::error("Debe completar la información de aprobación.")
            }
            ReviewError::FormAlreadySubmitted => {
                Self::error("El formulario ya fue enviado y no admite cambios.")
            }
            other => Self::error(other.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
