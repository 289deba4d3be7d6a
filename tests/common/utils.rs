use std::path::Path;
use std::time::Duration;

use journey_runner::journey::engine::{EngineSettings, JourneyRequest};
use journey_runner::journey::journey_model::{JourneySource, JourneyStep};
use journey_runner::persona::persona_model::{
    Behavioral, PatienceLevel, PersonaRecord, TestData,
};
use journey_runner::persona::store::PersonaSource;

pub const BASE_URL: &str = "https://shop.test";

/// file:// URL for an HTML fixture under tests/fixtures.
pub fn page(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    let path = base.join("tests").join("fixtures").join(name);

    format!("file://{}", path.display())
}

pub fn persona(id: &str, patience: Option<PatienceLevel>) -> PersonaRecord {
    PersonaRecord {
        id: id.to_string(),
        name: None,
        behavioral: Behavioral {
            patience_level: patience,
        },
        test_data: None,
    }
}

pub fn persona_with_credentials(id: &str, email: &str, password: &str) -> PersonaRecord {
    PersonaRecord {
        test_data: Some(TestData {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }),
        ..persona(id, None)
    }
}

pub fn step(name: &str, action: &str) -> JourneyStep {
    JourneyStep {
        step_name: name.to_string(),
        user_action: Some(action.to_string()),
        ..Default::default()
    }
}

pub fn request(persona: PersonaRecord, steps: Vec<JourneyStep>) -> JourneyRequest {
    let mut request = JourneyRequest::new("session-1", "checkout", &persona.id, BASE_URL);
    request.persona = PersonaSource::Inline(persona);
    request.journey = JourneySource::Inline(steps);
    request.run_id = "run-1".to_string();
    request.base_timeout = Duration::from_millis(10_000);
    request
}

pub fn settings(screenshots: &Path) -> EngineSettings {
    EngineSettings {
        screenshots_dir: screenshots.to_path_buf(),
        ..Default::default()
    }
}
