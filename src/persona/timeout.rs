use std::time::Duration;

use crate::persona::persona_model::PatienceLevel;

pub const DEFAULT_BASE_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Scale the base wait budget by the persona's patience.
///
/// Low halves it, high doubles it, medium or unspecified leaves it alone.
pub fn effective_timeout(base: Duration, patience: Option<PatienceLevel>) -> Duration {
    match patience {
        Some(PatienceLevel::Low) => base / 2,
        Some(PatienceLevel::High) => base * 2,
        Some(PatienceLevel::Medium) | None => base,
    }
}
