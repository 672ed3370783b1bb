//! Render-ready view of a review session
//!
//! JavaScript receives one flat structure per render and never has to know
//! the schema or compute labels, badges or progress itself.

use review_core::{FieldKind, FinalField, ReviewFormEngine, SectionStatus};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub name: String,
    pub title: String,
    pub progress: u8,
    /// CSS class for the progress bar colour
    pub progress_class: &'static str,
    pub can_submit: bool,
    pub submitted: bool,
    pub sections: Vec<SectionView>,
    pub final_observations: FinalObservationsView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub id: String,
    pub number: usize,
    pub title: String,
    pub status: SectionStatus,
    pub badge: &'static str,
    pub observation: String,
    /// Observation box is only shown once a verdict exists
    pub show_observation: bool,
    pub expanded: bool,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub unit: Option<String>,
    pub inputs: Vec<InputView>,
}

/// One text input, addressed by the path `setField` expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputView {
    pub path: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalObservationsView {
    pub number: usize,
    /// Closing fields this form shows
    pub fields: Vec<FinalField>,
    /// Closing fields still blank that block submission
    pub missing: Vec<FinalField>,
    pub comments: String,
    pub report_date: String,
    pub regulatory_approval: Option<&'static str>,
    pub signed: bool,
    pub company: String,
    pub position: String,
    pub expanded: bool,
}

impl FormView {
    pub fn build(engine: &ReviewFormEngine) -> Self {
        let definition = engine.definition();
        let sections = definition
            .sections
            .iter()
            .enumerate()
            .filter_map(|(i, schema)| {
                let section = engine.section(&schema.id).ok()?;
                let fields = schema
                    .fields
                    .iter()
                    .map(|field| {
                        let value = section.fields.get(&field.name);
                        let inputs = if field.kind.is_record() {
                            field
                                .kind
                                .subfields()
                                .iter()
                                .map(|sub| InputView {
                                    path: format!("{}.{}", field.name, sub),
                                    value: value
                                        .and_then(|v| v.slot(Some(*sub)))
                                        .unwrap_or_default()
                                        .to_string(),
                                })
                                .collect()
                        } else {
                            vec![InputView {
                                path: field.name.clone(),
                                value: value
                                    .and_then(|v| v.slot(None))
                                    .unwrap_or_default()
                                    .to_string(),
                            }]
                        };
                        FieldView {
                            name: field.name.clone(),
                            label: field.label.clone().unwrap_or_else(|| field.name.clone()),
                            kind: field.kind,
                            unit: field.unit.clone(),
                            inputs,
                        }
                    })
                    .collect();

                Some(SectionView {
                    id: schema.id.clone(),
                    number: i + 1,
                    title: schema.title.clone(),
                    status: section.status,
                    badge: section.status.label(),
                    observation: section.observation.clone(),
                    show_observation: section.status.is_reviewed(),
                    expanded: section.expanded,
                    fields,
                })
            })
            .collect();

        let fin = engine.final_observations();
        let final_observations = FinalObservationsView {
            number: definition.sections.len() + 1,
            fields: definition.final_fields.clone(),
            missing: engine.missing_final_fields(),
            comments: fin.comments.clone(),
            report_date: fin.report_date.clone(),
            regulatory_approval: fin.regulatory_approval.map(|a| a.label()),
            signed: fin.is_signed(),
            company: fin.company.clone(),
            position: fin.position.clone(),
            expanded: fin.expanded,
        };

        Self {
            name: definition.name.clone(),
            title: definition.title.clone(),
            progress: engine.compute_progress(),
            progress_class: engine.progress_band().css_class(),
            can_submit: engine.can_submit(),
            submitted: engine.is_submitted(),
            sections,
            final_observations,
        }
    }
}
