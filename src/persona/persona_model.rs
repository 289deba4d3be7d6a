use serde::{Deserialize, Serialize};

/// A simulated user type: behavioral traits plus optional test credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonaRecord {
    /// Unique within a session's persona set
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub behavioral: Behavioral,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_data: Option<TestData>,
}

impl PersonaRecord {
    pub fn patience(&self) -> Option<PatienceLevel> {
        self.behavioral.patience_level
    }

    /// Email and password, only when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let data = self.test_data.as_ref()?;
        match (data.email.as_deref(), data.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Behavioral {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patience_level: Option<PatienceLevel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestData {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// How long a persona is willing to wait for the UI.
///
/// Parsed case-insensitively; anything unrecognised counts as medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PatienceLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl From<String> for PatienceLevel {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => PatienceLevel::Low,
            "high" => PatienceLevel::High,
            _ => PatienceLevel::Medium,
        }
    }
}

impl From<PatienceLevel> for String {
    fn from(level: PatienceLevel) -> Self {
        match level {
            PatienceLevel::Low => "low",
            PatienceLevel::Medium => "medium",
            PatienceLevel::High => "high",
        }
        .to_string()
    }
}

/// A session's persona set as stored on disk: a bare list or `{ personas: [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PersonaCollection {
    List(Vec<PersonaRecord>),
    Wrapped { personas: Vec<PersonaRecord> },
}

impl PersonaCollection {
    pub fn into_records(self) -> Vec<PersonaRecord> {
        match self {
            PersonaCollection::List(records) => records,
            PersonaCollection::Wrapped { personas } => personas,
        }
    }
}
