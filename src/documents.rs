use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{JourneyError, Result};

const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Find `<dir>/<stem>.{json,yaml,yml}`, first existing file wins.
pub fn find_document(dir: &Path, stem: &str) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|path| path.is_file())
}

/// Read a JSON or YAML document, picking the parser from the file extension.
pub fn read_document<T: DeserializeOwned>(path: &Path, context: &str) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| JourneyError::Io {
        context: format!("reading {} from {}", context, path.display()),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .is_some_and(|e| e == "yaml" || e == "yml");

    if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| JourneyError::Parse {
            context: format!("{} ({})", context, path.display()),
            message: e.to_string(),
        })
    } else {
        parse_json(&content, context)
    }
}

pub fn parse_json<T: DeserializeOwned>(content: &str, context: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| JourneyError::Parse {
        context: context.to_string(),
        message: e.to_string(),
    })
}
