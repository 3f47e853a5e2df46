//! Document error types
//!
//! One error enum covers every fallible document operation. Optional data
//! that is merely absent (no shader, no skin, no extra data of a kind) is
//! reported through `Option` results, never through these variants.

use crate::block::BlockKind;

/// Errors produced by document operations
#[derive(Debug)]
pub enum DocumentError {
    /// A reference did not resolve to any live block. The payload is the
    /// kind the caller expected to find.
    UnknownBlock(BlockKind),
    /// A reference resolved to a live block of the wrong kind. Reachable
    /// when rebuilding typed references from raw handles.
    TypeMismatch {
        expected: BlockKind,
        found: BlockKind,
    },
    /// The operation would corrupt the document: a parent cycle, misaligned
    /// index-parallel arrays, or a triangle map naming an undeclared id.
    /// The document is left exactly as it was before the call.
    Structural(String),
    /// Underlying file read/write failure
    Io(std::io::Error),
    /// A document file could not be parsed
    Parse(ron::error::SpannedError),
    /// A document could not be serialized
    Serialize(ron::Error),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::UnknownBlock(kind) => {
                write!(f, "Unknown block: no live {} behind this reference", kind)
            }
            DocumentError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            DocumentError::Structural(msg) => write!(f, "Structural error: {}", msg),
            DocumentError::Io(e) => write!(f, "Document IO error: {}", e),
            DocumentError::Parse(e) => write!(f, "Document parse error: {}", e),
            DocumentError::Serialize(e) => write!(f, "Document serialize error: {}", e),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Io(e) => Some(e),
            DocumentError::Parse(e) => Some(e),
            DocumentError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        DocumentError::Io(e)
    }
}

impl From<ron::error::SpannedError> for DocumentError {
    fn from(e: ron::error::SpannedError) -> Self {
        DocumentError::Parse(e)
    }
}

impl From<ron::Error> for DocumentError {
    fn from(e: ron::Error) -> Self {
        DocumentError::Serialize(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unknown_block() {
        let err = DocumentError::UnknownBlock(BlockKind::Shape);
        assert!(err.to_string().contains("Unknown block"));
        assert!(err.to_string().contains("shape"));
    }

    #[test]
    fn test_display_type_mismatch() {
        let err = DocumentError::TypeMismatch {
            expected: BlockKind::Node,
            found: BlockKind::Shader,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected node"), "got: {}", msg);
        assert!(msg.contains("found shader"), "got: {}", msg);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DocumentError = io_err.into();
        assert!(matches!(err, DocumentError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_structural_keeps_message() {
        let err = DocumentError::Structural("triangle map names id 9".to_string());
        assert!(err.to_string().contains("id 9"));
    }
}
