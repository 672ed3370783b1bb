//! Review progress as shown in the dashboard progress bar

use serde::{Deserialize, Serialize};

/// Percentage of required sections reviewed, rounded half up.
///
/// `required` must be non-zero; form definitions with no sections are
/// rejected before an engine exists.
pub fn compute_progress(reviewed: usize, required: usize) -> u8 {
    if required == 0 {
        return 0;
    }
    let reviewed = reviewed.min(required);
    ((200 * reviewed + required) / (2 * required)) as u8
}

/// Colour band of the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressBand {
    /// Under a third reviewed
    Critical,
    InProgress,
    Complete,
}

impl ProgressBand {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0..=32 => ProgressBand::Critical,
            33..=99 => ProgressBand::InProgress,
            _ => ProgressBand::Complete,
        }
    }

    /// Bootstrap utility class used by the web front end.
    pub fn css_class(self) -> &'static str {
        match self {
            ProgressBand::Critical => "bg-danger",
            ProgressBand::InProgress => "bg-warning",
            ProgressBand::Complete => "bg-success",
        }
    }
}
