//! TOML form definitions
//!
//! Lets a deployment describe its own review forms instead of relying on the
//! built-in ones.
//!
//! ```toml
//! name = "site-inspection"
//! title = "Site inspection"
//! strict_observations = true
//! final_fields = ["comments", "company", "position"]
//! required_final = ["company", "position"]
//!
//! [[sections]]
//! id = "access"
//! title = "Access road"
//!
//! [[sections.fields]]
//! name = "gateCode"
//! kind = "text"
//!
//! [[sections.fields]]
//! name = "dust"
//! kind = "parameter"
//! unit = "μg/m3"
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::schema::FormDefinition;

impl FormDefinition {
    /// Load and validate a form definition from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed or a required key is missing
    /// - The definition fails [`FormDefinition::validate`]
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form definition: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid form definition: {}", path.display()))
    }

    /// Parse and validate a form definition from a TOML string
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let definition: FormDefinition =
            toml::from_str(s).context("Failed to parse TOML form definition")?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize form definition")
    }
}
