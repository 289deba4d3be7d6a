use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::documents::{find_document, parse_json, read_document};
use crate::error::{JourneyError, Result};

/// One scripted step of a user journey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStep {
    /// Positive; filled in from the 1-based position when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_number: Option<u32>,

    #[serde(default)]
    pub step_name: String,

    /// Relative path to open before acting, e.g. "/cart"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_page_route: Option<String>,

    /// Free text such as `Click "Submit"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_action: Option<String>,

    /// Label hint for element selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_component_name: Option<String>,

    /// Text typed by fill actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_value: Option<String>,
}

impl JourneyStep {
    pub fn number(&self) -> u32 {
        self.step_number.unwrap_or(0)
    }
}

/// A journey document: a bare step list or an object carrying `steps`.
/// Other keys on the object (id, name, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JourneyDocument {
    Steps(Vec<JourneyStep>),
    Journey { steps: Vec<JourneyStep> },
}

impl JourneyDocument {
    pub fn into_steps(self) -> Vec<JourneyStep> {
        match self {
            JourneyDocument::Steps(steps) => steps,
            JourneyDocument::Journey { steps } => steps,
        }
    }
}

/// Where a run gets its steps from.
#[derive(Debug, Clone)]
pub enum JourneySource {
    Inline(Vec<JourneyStep>),
    File(PathBuf),
    /// `<dir>/<journey id>.{json,yaml,yml}`
    Store { dir: PathBuf },
}

impl JourneySource {
    /// Parse an inline JSON payload (step list or journey object).
    pub fn from_json(payload: &str) -> Result<Self> {
        let doc: JourneyDocument = parse_json(payload, "inline journey")?;
        Ok(JourneySource::Inline(doc.into_steps()))
    }
}

/// Load the steps for a journey and number them.
pub fn resolve_steps(source: &JourneySource, journey_id: &str) -> Result<Vec<JourneyStep>> {
    let steps = match source {
        JourneySource::Inline(steps) => steps.clone(),
        JourneySource::File(path) => {
            read_document::<JourneyDocument>(path, "journey file")?.into_steps()
        }
        JourneySource::Store { dir } => {
            let path = find_document(dir, journey_id).ok_or_else(|| {
                JourneyError::JourneyNotFound {
                    journey: journey_id.to_string(),
                    dir: dir.clone(),
                }
            })?;
            read_document::<JourneyDocument>(&path, "journey")?.into_steps()
        }
    };
    Ok(normalize_steps(steps))
}

/// Give every step a positive number, defaulting to its 1-based position.
pub fn normalize_steps(steps: Vec<JourneyStep>) -> Vec<JourneyStep> {
    steps
        .into_iter()
        .enumerate()
        .map(|(i, mut step)| {
            let position = u32::try_from(i + 1).unwrap_or(u32::MAX);
            if step.step_number.is_none_or(|n| n == 0) {
                step.step_number = Some(position);
            }
            if step.step_name.trim().is_empty() {
                step.step_name = format!("Step {}", step.number());
            }
            step
        })
        .collect()
}
