//! Declared form schema
//!
//! A form is described once, up front, as an ordered list of sections and the
//! fields each section carries. The engine resolves every field path against
//! this schema, so callers never index the state tree by arbitrary keys.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::state::FinalField;

/// Shape of a single field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Flat string: identifiers, dates, free text.
    Text,
    /// Coordinates pair.
    Location,
    /// Before/during/after readings of one measured parameter.
    Parameter,
    /// A mitigation measure and the date it was put in place.
    Mitigation,
}

impl FieldKind {
    /// Sub-field names accepted as the second element of a nested path.
    pub fn subfields(self) -> &'static [&'static str] {
        match self {
            FieldKind::Text => &[],
            FieldKind::Location => &["latitude", "longitude"],
            FieldKind::Parameter => &["before", "during", "after"],
            FieldKind::Mitigation => &["description", "implementationDate"],
        }
    }

    pub fn is_record(self) -> bool {
        !self.subfields().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    /// Human-readable label shown next to the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Unit of measure implied by the parameter (e.g. "mg/L")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            unit: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn location(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Location)
    }

    pub fn parameter(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            unit: Some(unit.into()),
            ..Self::new(name, FieldKind::Parameter)
        }
    }

    pub fn mitigation(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Mitigation)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSchema {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl SectionSchema {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSchema>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolve a path to the field it names, or `None` if the path does not
    /// fit this section's schema.
    pub fn resolve(&self, path: &FieldPath) -> Option<&FieldSchema> {
        let field = self.find_field(path.field())?;
        match (path, field.kind.is_record()) {
            (FieldPath::Field(_), false) => Some(field),
            (FieldPath::Nested(_, sub), true) => field
                .kind
                .subfields()
                .contains(&sub.as_str())
                .then_some(field),
            _ => None,
        }
    }
}

fn default_final_fields() -> Vec<FinalField> {
    vec![
        FinalField::Comments,
        FinalField::ReportDate,
        FinalField::RegulatoryApproval,
        FinalField::Signature,
    ]
}

fn default_required_final() -> Vec<FinalField> {
    vec![
        FinalField::Comments,
        FinalField::ReportDate,
        FinalField::RegulatoryApproval,
    ]
}

/// Ordered set of required sections making up one review form, plus the
/// shape of its closing block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub name: String,
    #[serde(default)]
    pub title: String,
    /// Require a non-empty observation on every reviewed section before submit
    #[serde(default)]
    pub strict_observations: bool,
    /// Closing-block fields the form offers
    #[serde(default = "default_final_fields")]
    pub final_fields: Vec<FinalField>,
    /// Closing-block fields that must be filled before submit, checked in order
    #[serde(default = "default_required_final")]
    pub required_final: Vec<FinalField>,
    pub sections: Vec<SectionSchema>,
}

impl FormDefinition {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            strict_observations: false,
            final_fields: default_final_fields(),
            required_final: default_required_final(),
            sections: Vec::new(),
        }
    }

    pub fn section(mut self, section: SectionSchema) -> Self {
        self.sections.push(section);
        self
    }

    pub fn strict_observations(mut self, strict: bool) -> Self {
        self.strict_observations = strict;
        self
    }

    /// Replace the closing block: the fields offered and, of those, the ones
    /// required before submit.
    pub fn closing<F, R>(mut self, fields: F, required: R) -> Self
    where
        F: IntoIterator<Item = FinalField>,
        R: IntoIterator<Item = FinalField>,
    {
        self.final_fields = fields.into_iter().collect();
        self.required_final = required.into_iter().collect();
        self
    }

    pub fn has_final_field(&self, field: FinalField) -> bool {
        self.final_fields.contains(&field)
    }

    pub fn find_section(&self, id: &str) -> Option<&SectionSchema> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn required_count(&self) -> usize {
        self.sections.len()
    }

    /// Check structural soundness: at least one section, non-empty and
    /// unique identifiers, required closing fields that the form offers.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.sections.is_empty() {
            return Err(DefinitionError::NoSections(self.name.clone()));
        }

        if let Some(field) = self
            .required_final
            .iter()
            .find(|f| !self.final_fields.contains(f))
        {
            return Err(DefinitionError::UndeclaredFinalField(field.to_string()));
        }

        let mut ids = HashSet::new();
        for section in &self.sections {
            if section.id.is_empty() {
                return Err(DefinitionError::EmptySectionId);
            }
            if !ids.insert(section.id.as_str()) {
                return Err(DefinitionError::DuplicateSection(section.id.clone()));
            }

            let mut names = HashSet::new();
            for field in &section.fields {
                if field.name.is_empty() {
                    return Err(DefinitionError::EmptyFieldName(section.id.clone()));
                }
                if !names.insert(field.name.as_str()) {
                    return Err(DefinitionError::DuplicateField {
                        section: section.id.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Location of a value inside a section's field tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    /// A flat field, e.g. `wellName`
    Field(String),
    /// A record field and one of its sub-fields, e.g. `waterPh.before`
    Nested(String, String),
}

impl FieldPath {
    pub fn field_name(name: impl Into<String>) -> Self {
        FieldPath::Field(name.into())
    }

    pub fn nested(name: impl Into<String>, sub: impl Into<String>) -> Self {
        FieldPath::Nested(name.into(), sub.into())
    }

    /// The top-level field name.
    pub fn field(&self) -> &str {
        match self {
            FieldPath::Field(name) | FieldPath::Nested(name, _) => name,
        }
    }

    pub fn subfield(&self) -> Option<&str> {
        match self {
            FieldPath::Field(_) => None,
            FieldPath::Nested(_, sub) => Some(sub),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Field(name) => f.write_str(name),
            FieldPath::Nested(name, sub) => write!(f, "{}.{}", name, sub),
        }
    }
}

impl FromStr for FieldPath {
    type Err = String;

    /// Parse `"name"` or `"name.sub"`. Deeper paths are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = s.split('.');
        let name = parts.next().unwrap_or_default();
        let sub = parts.next();
        if parts.next().is_some() {
            return Err(format!("Field path too deep: {}", s));
        }
        match sub {
            _ if name.is_empty() => Err("Field path must not be empty".to_string()),
            None => Ok(FieldPath::field_name(name)),
            Some("") => Err(format!("Missing sub-field in path: {}", s)),
            Some(sub) => Ok(FieldPath::nested(name, sub)),
        }
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        FieldPath::field_name(name)
    }
}

impl From<(&str, &str)> for FieldPath {
    fn from((name, sub): (&str, &str)) -> Self {
        FieldPath::nested(name, sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_section() -> SectionSchema {
        SectionSchema::new("waterSoilParameters", "Water and soil")
            .field(FieldSchema::parameter("waterPh", "pH"))
            .field(FieldSchema::text("notes"))
            .field(FieldSchema::location("location"))
    }

    #[test]
    fn test_parse_flat_path() {
        let path: FieldPath = "wellName".parse().unwrap();
        assert_eq!(path, FieldPath::field_name("wellName"));
        assert_eq!(path.subfield(), None);
    }

    #[test]
    fn test_parse_nested_path() {
        let path: FieldPath = "waterPh.before".parse().unwrap();
        assert_eq!(path, FieldPath::nested("waterPh", "before"));
        assert_eq!(path.to_string(), "waterPh.before");
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        assert!("".parse::<FieldPath>().is_err());
        assert!("a.b.c".parse::<FieldPath>().is_err());
        assert!("waterPh.".parse::<FieldPath>().is_err());
        assert!(".before".parse::<FieldPath>().is_err());
    }

    #[test]
    fn test_resolve_matches_kind() {
        let section = sample_section();
        assert!(section.resolve(&("waterPh", "during").into()).is_some());
        assert!(section.resolve(&"notes".into()).is_some());
        assert!(section.resolve(&("location", "latitude").into()).is_some());

        // Record field addressed as flat, flat field addressed as record
        assert!(section.resolve(&"waterPh".into()).is_none());
        assert!(section.resolve(&("notes", "before").into()).is_none());
        // Sub-field from another kind
        assert!(section.resolve(&("waterPh", "latitude").into()).is_none());
        assert!(section.resolve(&"missing".into()).is_none());
    }

    #[test]
    fn test_validate_rejects_empty_form() {
        let form = FormDefinition::new("empty", "Empty");
        assert_eq!(
            form.validate(),
            Err(DefinitionError::NoSections("empty".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let form = FormDefinition::new("dup", "")
            .section(SectionSchema::new("a", ""))
            .section(SectionSchema::new("a", ""));
        assert_eq!(
            form.validate(),
            Err(DefinitionError::DuplicateSection("a".to_string()))
        );

        let form = FormDefinition::new("dup", "").section(
            SectionSchema::new("a", "")
                .field(FieldSchema::text("x"))
                .field(FieldSchema::mitigation("x")),
        );
        assert!(matches!(
            form.validate(),
            Err(DefinitionError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_ids() {
        let form = FormDefinition::new("f", "").section(SectionSchema::new("", ""));
        assert_eq!(form.validate(), Err(DefinitionError::EmptySectionId));

        let form = FormDefinition::new("f", "")
            .section(SectionSchema::new("a", "").field(FieldSchema::text("")));
        assert_eq!(
            form.validate(),
            Err(DefinitionError::EmptyFieldName("a".to_string()))
        );
    }

    #[test]
    fn test_closing_block_defaults() {
        let form = FormDefinition::new("f", "").section(SectionSchema::new("a", ""));
        assert!(form.has_final_field(FinalField::Signature));
        assert!(!form.has_final_field(FinalField::Company));
        assert_eq!(form.required_final.len(), 3);
        form.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_required_field_not_offered() {
        let form = FormDefinition::new("f", "")
            .section(SectionSchema::new("a", ""))
            .closing([FinalField::Comments], [FinalField::Company]);
        assert_eq!(
            form.validate(),
            Err(DefinitionError::UndeclaredFinalField("company".to_string()))
        );
    }
}
