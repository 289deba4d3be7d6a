use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, JourneyError>;

#[derive(Debug, Error)]
pub enum JourneyError {
    /// Required invocation input was missing or unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No persona collection exists for the session
    #[error("Persona store not found for session '{session}' (looked in {})", dir.display())]
    PersonaStoreNotFound { session: String, dir: PathBuf },

    /// The persona collection has no entry with the requested id
    #[error("Persona '{persona}' not found in session '{session}'")]
    PersonaNotFound { persona: String, session: String },

    /// No journey definition could be located
    #[error("Journey '{journey}' not found (looked in {})", dir.display())]
    JourneyNotFound { journey: String, dir: PathBuf },

    /// A persona or journey document could not be parsed
    #[error("Failed to parse {context}: {message}")]
    Parse { context: String, message: String },

    /// File system access failed
    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The browser driver subprocess failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the driver process failed
    #[error("Browser session I/O: {0}")]
    SessionIO(String),

    /// The driver answered a command with ok=false
    #[error("Browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    /// A driver response was not valid JSON
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A driver request could not be encoded
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required element could not be located on the page
    #[error("Element '{element}' not found: {context}")]
    ElementNotFound { element: String, context: String },
}
