//! Plain-text readiness report for a draft

use std::fmt;

use review_core::{FinalField, ProgressBand, ReviewFormEngine, ValidationReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub form: String,
    pub progress: u8,
    pub band: ProgressBand,
    pub pending: Vec<String>,
    pub missing_observations: Vec<String>,
    pub missing_final: Vec<FinalField>,
    pub submitted: bool,
    pub blocker: Option<ValidationReason>,
}

fn owned(ids: Vec<&str>) -> Vec<String> {
    ids.into_iter().map(str::to_string).collect()
}

impl Readiness {
    pub fn of(engine: &ReviewFormEngine) -> Self {
        Self {
            form: engine.definition().name.clone(),
            progress: engine.compute_progress(),
            band: engine.progress_band(),
            pending: owned(engine.pending_sections()),
            missing_observations: owned(engine.missing_observations()),
            missing_final: engine.missing_final_fields(),
            submitted: engine.is_submitted(),
            blocker: engine.validate().err(),
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.submitted && self.blocker.is_none()
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let band = match self.band {
            ProgressBand::Critical => "critical",
            ProgressBand::InProgress => "in progress",
            ProgressBand::Complete => "complete",
        };
        writeln!(f, "Form:      {}", self.form)?;
        writeln!(f, "Progress:  {}% ({})", self.progress, band)?;
        if !self.pending.is_empty() {
            writeln!(f, "Pending:   {}", self.pending.join(", "))?;
        }
        if !self.missing_observations.is_empty() {
            writeln!(f, "No notes:  {}", self.missing_observations.join(", "))?;
        }
        if !self.missing_final.is_empty() {
            let names: Vec<_> = self.missing_final.iter().map(|f| f.name()).collect();
            writeln!(f, "Closing:   {} missing", names.join(", "))?;
        }
        match (self.submitted, self.blocker) {
            (true, _) => writeln!(f, "Status:    already submitted"),
            (false, None) => writeln!(f, "Status:    ready to submit"),
            (false, Some(reason)) => writeln!(f, "Status:    blocked, {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use review_core::forms::environmental_monitoring;
    use review_core::{FinalField, ReviewDecision};

    #[test]
    fn test_fresh_form_is_blocked() {
        let engine = ReviewFormEngine::new(environmental_monitoring()).unwrap();
        let readiness = Readiness::of(&engine);

        assert_eq!(readiness.progress, 0);
        assert_eq!(readiness.band, ProgressBand::Critical);
        assert_eq!(readiness.pending.len(), 4);
        assert_eq!(readiness.blocker, Some(ValidationReason::SectionsNotReviewed));
        assert!(!readiness.is_ready());
        let text = readiness.to_string();
        assert!(text.contains("Progress:  0% (critical)"));
        assert!(text.contains("Closing:   comments, reportDate, regulatoryApproval missing"));
    }

    #[test]
    fn test_form_needs_notes_before_it_is_ready() {
        let mut engine = ReviewFormEngine::new(environmental_monitoring()).unwrap();
        for id in [
            "generalInfo",
            "waterSoilParameters",
            "gasEmissions",
            "mitigationMeasures",
        ] {
            engine
                .set_section_status(id, ReviewDecision::Approved)
                .unwrap();
        }
        engine
            .set_observation("generalInfo", "Sin novedades")
            .unwrap();
        engine
            .set_final_observation(FinalField::Comments, "Cumple")
            .unwrap();
        engine
            .set_final_observation(FinalField::ReportDate, "2024-06-30")
            .unwrap();
        engine
            .set_final_observation(FinalField::RegulatoryApproval, "approved")
            .unwrap();

        let readiness = Readiness::of(&engine);
        assert!(!readiness.is_ready());
        assert_eq!(readiness.blocker, Some(ValidationReason::ObservationsMissing));
        assert_eq!(
            readiness.missing_observations,
            vec!["waterSoilParameters", "gasEmissions", "mitigationMeasures"]
        );
        assert!(readiness.to_string().contains("No notes:  waterSoilParameters"));

        for id in ["waterSoilParameters", "gasEmissions", "mitigationMeasures"] {
            engine.set_observation(id, "Dentro de norma").unwrap();
        }
        let readiness = Readiness::of(&engine);
        assert!(readiness.is_ready());
        assert!(readiness.missing_final.is_empty());
        let text = readiness.to_string();
        assert!(text.contains("ready to submit"));
        assert!(!text.contains("Pending:"));
        assert!(!text.contains("Closing:"));

        engine.submit().unwrap();
        assert!(!Readiness::of(&engine).is_ready());
    }
}
