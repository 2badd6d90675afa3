//! Coordinate-system tag.

use std::fmt;
use std::str::FromStr;

use crate::error::RklError;

/// Coordinate system of a structured grid.
///
/// | kind        | X1 | X2 | X3 |
/// |-------------|----|----|----|
/// | Cartesian   | x  | y  | z  |
/// | Cylindrical | R  | z  | φ  |
/// | Polar       | R  | φ  | z  |
/// | Spherical   | r  | θ  | φ  |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GeometryKind {
    #[default]
    Cartesian,
    Cylindrical,
    Polar,
    Spherical,
}

impl GeometryKind {
    /// Whether the metric has curvature terms.
    pub fn is_curvilinear(self) -> bool {
        !matches!(self, GeometryKind::Cartesian)
    }

    /// Index (within a vector block of `n_components`) of the azimuthal
    /// component, if the geometry has one that the block carries.
    ///
    /// Polar grids have φ as the second component; cylindrical and spherical
    /// grids only carry φ when all three components are present.
    pub fn azimuthal_component(self, n_components: usize) -> Option<usize> {
        match self {
            GeometryKind::Cartesian => None,
            GeometryKind::Polar if n_components >= 2 => Some(1),
            GeometryKind::Cylindrical | GeometryKind::Spherical if n_components == 3 => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryKind::Cartesian => "cartesian",
            GeometryKind::Cylindrical => "cylindrical",
            GeometryKind::Polar => "polar",
            GeometryKind::Spherical => "spherical",
        };
        f.write_str(name)
    }
}

impl FromStr for GeometryKind {
    type Err = RklError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cartesian" => Ok(GeometryKind::Cartesian),
            "cylindrical" => Ok(GeometryKind::Cylindrical),
            "polar" => Ok(GeometryKind::Polar),
            "spherical" => Ok(GeometryKind::Spherical),
            other => Err(RklError::configuration(format!(
                "unknown geometry '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_azimuthal_component() {
        assert_eq!(GeometryKind::Cartesian.azimuthal_component(3), None);
        assert_eq!(GeometryKind::Polar.azimuthal_component(1), None);
        assert_eq!(GeometryKind::Polar.azimuthal_component(2), Some(1));
        assert_eq!(GeometryKind::Cylindrical.azimuthal_component(2), None);
        assert_eq!(GeometryKind::Cylindrical.azimuthal_component(3), Some(2));
        assert_eq!(GeometryKind::Spherical.azimuthal_component(3), Some(2));
    }

    #[test]
    fn test_parse_round_trip() {
        for kind in [
            GeometryKind::Cartesian,
            GeometryKind::Cylindrical,
            GeometryKind::Polar,
            GeometryKind::Spherical,
        ] {
            assert_eq!(kind.to_string().parse::<GeometryKind>(), Ok(kind));
        }
        assert!("toroidal".parse::<GeometryKind>().is_err());
    }
}
