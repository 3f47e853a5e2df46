//! Collision shape material identifiers

use serde::{Serialize, Deserialize};

/// Opaque material identifier carried by every collision shape.
///
/// The consuming engine maps the id to surface response and effects; this
/// layer stores and round-trips it without interpretation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeMaterial(pub u32);

impl ShapeMaterial {
    /// Material 0, the conventional "unassigned" value
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ShapeMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "material {}", self.0)
    }
}

impl From<u32> for ShapeMaterial {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_none() {
        assert_eq!(ShapeMaterial::default(), ShapeMaterial::NONE);
    }

    #[test]
    fn test_round_trip_id() {
        let m = ShapeMaterial::new(3);
        assert_eq!(m.id(), 3);
        assert_eq!(ShapeMaterial::from(3), m);
    }

    #[test]
    fn test_display() {
        assert_eq!(ShapeMaterial::new(7).to_string(), "material 7");
    }
}
