use std::path::PathBuf;

use tracing::debug;

use crate::documents::{find_document, read_document};
use crate::error::{JourneyError, Result};
use crate::persona::persona_model::{PersonaCollection, PersonaRecord};

/// Where a run gets its persona from.
#[derive(Debug, Clone)]
pub enum PersonaSource {
    /// Supplied by the caller, used as-is
    Inline(PersonaRecord),

    /// A specific persona file, holding one record or a collection
    File(PathBuf),

    /// Looked up by id in the session's `<session>-personas` collection
    Store { dir: PathBuf },
}

/// Resolve the persona for a run. Never touches anything but the store.
pub fn resolve_persona(
    source: &PersonaSource,
    session_id: &str,
    persona_id: &str,
) -> Result<PersonaRecord> {
    match source {
        PersonaSource::Inline(persona) => Ok(persona.clone()),

        PersonaSource::File(path) => {
            let value: serde_json::Value = read_document(path, "persona file")?;
            let parse_error = |e: serde_json::Error| JourneyError::Parse {
                context: format!("persona file ({})", path.display()),
                message: e.to_string(),
            };

            // A list or a `personas` array is a collection, even next to an `id` key.
            let records = if value.is_array() || value.get("personas").is_some() {
                serde_json::from_value::<PersonaCollection>(value)
                    .map_err(parse_error)?
                    .into_records()
            } else {
                vec![serde_json::from_value::<PersonaRecord>(value).map_err(parse_error)?]
            };
            find_persona(records, session_id, persona_id)
        }

        PersonaSource::Store { dir } => {
            let stem = format!("{}-personas", session_id);
            let path = find_document(dir, &stem).ok_or_else(|| {
                JourneyError::PersonaStoreNotFound {
                    session: session_id.to_string(),
                    dir: dir.clone(),
                }
            })?;
            debug!(path = %path.display(), "loading persona store");

            let collection: PersonaCollection = read_document(&path, "persona store")?;
            find_persona(collection.into_records(), session_id, persona_id)
        }
    }
}

fn find_persona(
    records: Vec<PersonaRecord>,
    session_id: &str,
    persona_id: &str,
) -> Result<PersonaRecord> {
    records
        .into_iter()
        .find(|p| p.id == persona_id)
        .ok_or_else(|| JourneyError::PersonaNotFound {
            persona: persona_id.to_string(),
            session: session_id.to_string(),
        })
}
