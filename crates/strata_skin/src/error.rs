//! Error type for skeleton and skin-binding operations

use std::error::Error;
use std::fmt;

use strata_core::DocumentError;

/// Everything that can go wrong staging or committing a skin
#[derive(Debug)]
pub enum SkinError {
    /// A bone name is not in the reference skeleton and no explicit
    /// transform was supplied for it
    UnknownBone(String),
    /// Staged data is inconsistent with the shape or with itself
    Structural(String),
    /// An underlying document operation failed
    Document(DocumentError),
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
}

impl fmt::Display for SkinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkinError::UnknownBone(name) => {
                write!(f, "Unknown bone: '{}' is not in the reference skeleton", name)
            }
            SkinError::Structural(detail) => write!(f, "Skin structural error: {}", detail),
            SkinError::Document(err) => write!(f, "Skin document error: {}", err),
            SkinError::Io(err) => write!(f, "Skeleton IO error: {}", err),
            SkinError::Parse(err) => write!(f, "Skeleton parse error: {}", err),
            SkinError::Serialize(err) => write!(f, "Skeleton serialize error: {}", err),
        }
    }
}

impl Error for SkinError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SkinError::Document(err) => Some(err),
            SkinError::Io(err) => Some(err),
            SkinError::Parse(err) => Some(err),
            SkinError::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentError> for SkinError {
    fn from(err: DocumentError) -> Self {
        SkinError::Document(err)
    }
}

impl From<std::io::Error> for SkinError {
    fn from(err: std::io::Error) -> Self {
        SkinError::Io(err)
    }
}

impl From<ron::error::SpannedError> for SkinError {
    fn from(err: ron::error::SpannedError) -> Self {
        SkinError::Parse(err)
    }
}

impl From<ron::Error> for SkinError {
    fn from(err: ron::Error) -> Self {
        SkinError::Serialize(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_bone() {
        let err = SkinError::UnknownBone("NPC Wing".to_string());
        assert!(err.to_string().contains("'NPC Wing'"));
    }

    #[test]
    fn test_document_errors_convert() {
        fn fails() -> Result<(), SkinError> {
            Err(DocumentError::Structural("detached".to_string()))?;
            Ok(())
        }
        let err = fails().unwrap_err();
        assert!(matches!(err, SkinError::Document(_)));
        assert!(err.source().is_some());
    }
}
