//! Target engine identities and version numbering
//!
//! A document is written for one target runtime generation. The target is
//! passed around as a short symbolic name; it fixes the version numbers
//! stamped into the file and which reference skeleton the skin subsystem
//! loads.

use serde::{Serialize, Deserialize};

/// Supported runtime generations, named by their stream version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineTarget {
    V34,
    V83,
    V100,
    V130,
    V155,
}

impl EngineTarget {
    pub const ALL: [EngineTarget; 5] = [
        EngineTarget::V34,
        EngineTarget::V83,
        EngineTarget::V100,
        EngineTarget::V130,
        EngineTarget::V155,
    ];

    /// Stream version written into document headers
    pub fn stream_version(self) -> u32 {
        match self {
            EngineTarget::V34 => 34,
            EngineTarget::V83 => 83,
            EngineTarget::V100 => 100,
            EngineTarget::V130 => 130,
            EngineTarget::V155 => 155,
        }
    }

    /// User version written into document headers
    pub fn user_version(self) -> u32 {
        match self {
            EngineTarget::V34 => 11,
            _ => 12,
        }
    }

    /// File version quad; identical across supported targets
    pub fn file_version(self) -> [u8; 4] {
        [20, 2, 0, 7]
    }

    /// Full version record for this target
    pub fn format_version(self) -> FormatVersion {
        FormatVersion {
            file: self.file_version(),
            user: self.user_version(),
            stream: self.stream_version(),
        }
    }

    /// File stem of the reference skeleton asset for this target
    pub fn skeleton_stem(self) -> &'static str {
        match self {
            EngineTarget::V34 => "skeleton_v34",
            EngineTarget::V83 => "skeleton_v83",
            EngineTarget::V100 => "skeleton_v100",
            EngineTarget::V130 => "skeleton_v130",
            EngineTarget::V155 => "skeleton_v155",
        }
    }
}

impl std::fmt::Display for EngineTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}", self.stream_version())
    }
}

/// Error returned when a target name is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTargetError(pub String);

impl std::fmt::Display for UnknownTargetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown engine target: {:?}", self.0)
    }
}

impl std::error::Error for UnknownTargetError {}

impl std::str::FromStr for EngineTarget {
    type Err = UnknownTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "V34" => Ok(EngineTarget::V34),
            "V83" => Ok(EngineTarget::V83),
            "V100" => Ok(EngineTarget::V100),
            "V130" => Ok(EngineTarget::V130),
            "V155" => Ok(EngineTarget::V155),
            _ => Err(UnknownTargetError(s.to_string())),
        }
    }
}

/// Version numbers a document carries for its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatVersion {
    pub file: [u8; 4],
    pub user: u32,
    pub stream: u32,
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{} (user {}, stream {})",
            self.file[0], self.file[1], self.file[2], self.file[3], self.user, self.stream
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_version_numbers() {
        assert_eq!(EngineTarget::V34.user_version(), 11);
        assert_eq!(EngineTarget::V34.stream_version(), 34);
        assert_eq!(EngineTarget::V83.user_version(), 12);
        assert_eq!(EngineTarget::V155.stream_version(), 155);
    }

    #[test]
    fn test_format_version_display() {
        let v = EngineTarget::V130.format_version();
        assert_eq!(v.to_string(), "20.2.0.7 (user 12, stream 130)");
    }

    #[test]
    fn test_from_str_round_trip() {
        for target in EngineTarget::ALL {
            let name = target.to_string();
            assert_eq!(EngineTarget::from_str(&name).unwrap(), target);
        }
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(EngineTarget::from_str("v100").unwrap(), EngineTarget::V100);
        assert_eq!(EngineTarget::from_str(" V83 ").unwrap(), EngineTarget::V83);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = EngineTarget::from_str("V999").unwrap_err();
        assert!(err.to_string().contains("V999"));
    }

    #[test]
    fn test_skeleton_stems_are_distinct() {
        let stems: std::collections::HashSet<_> =
            EngineTarget::ALL.iter().map(|t| t.skeleton_stem()).collect();
        assert_eq!(stems.len(), EngineTarget::ALL.len());
    }
}
