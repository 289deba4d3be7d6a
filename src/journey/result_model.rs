use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Pass,
    Partial,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    Pass,
    Fail,
    Skip,
}

/// Pending until the step finishes, then pass or fail for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step_number: u32,
    pub step_name: String,
    pub status: StepStatus,
    pub observation: String,
}

impl StepResult {
    pub fn pending(step_number: u32, step_name: &str) -> Self {
        Self {
            step_number,
            step_name: step_name.to_string(),
            status: StepStatus::Pending,
            observation: String::new(),
        }
    }

    pub fn pass(mut self, observation: impl Into<String>) -> Self {
        self.status = StepStatus::Pass;
        self.observation = observation.into();
        self
    }

    pub fn fail(mut self, observation: impl Into<String>) -> Self {
        self.status = StepStatus::Fail;
        self.observation = observation.into();
        self
    }
}

/// A defect observation. `step_number` 0 marks a setup-level failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub step_number: u32,
    pub step_name: String,
    pub description: String,
    pub url: String,
}

/// Outcome of the login stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub status: LoginStatus,
    pub notes: String,
}

impl LoginOutcome {
    pub fn pass(notes: impl Into<String>) -> Self {
        Self {
            status: LoginStatus::Pass,
            notes: notes.into(),
        }
    }

    pub fn fail(notes: impl Into<String>) -> Self {
        Self {
            status: LoginStatus::Fail,
            notes: notes.into(),
        }
    }

    pub fn skip(notes: impl Into<String>) -> Self {
        Self {
            status: LoginStatus::Skip,
            notes: notes.into(),
        }
    }
}

/// The single output of a journey run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JourneyTestResult {
    pub journey_id: String,
    pub persona_id: String,
    pub base_url: String,
    pub run_id: String,
    pub overall_status: OverallStatus,
    pub login_status: LoginStatus,
    pub login_notes: String,
    pub steps_passed: usize,
    pub steps_failed: usize,
    pub steps_skipped: usize,
    pub step_results: Vec<StepResult>,
    pub issues_found: Vec<Issue>,
    pub screenshots_count: usize,
    pub executed_at: DateTime<Utc>,
}

impl JourneyTestResult {
    pub fn passed(&self) -> bool {
        self.overall_status == OverallStatus::Pass
    }

    /// Issues recorded before any step ran.
    pub fn setup_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues_found.iter().filter(|i| i.step_number == 0)
    }
}
