use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PersonaError;

/// A persona document as read from disk
#[derive(Debug, Clone)]
pub struct PersonaDocument {
    pub path: PathBuf,
    pub text: String,
}

/// Read a persona document as UTF-8
///
/// No caching: the files may be hand-edited between runs.
pub fn load_document(path: &Path) -> Result<PersonaDocument, PersonaError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            log::debug!("Loaded {} ({} bytes)", path.display(), text.len());
            Ok(PersonaDocument {
                path: path.to_path_buf(),
                text,
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(PersonaError::MissingFile {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(PersonaError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
