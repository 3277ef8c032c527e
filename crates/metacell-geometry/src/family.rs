//! Unit-cell parameterization families.
//!
//! Each family fixes how many normalised parameters a cell carries and how
//! they become structure. Parameters are passed as a tensor of shape
//! `(d1, pixelsX, pixelsY, d2)`: `d1` shape parameters (radius, or x/y
//! widths) for each of `d2` structures in the cell.
//!
//! | Family | `(d1, d2)` | Structure |
//! |--------|-----------|-----------|
//! | `rectangular_resonators` | (2, 1) | one diamond-norm post, layer 1 only |
//! | `elliptical_resonators` | (2, 1) | one elliptical post |
//! | `cylindrical_nanoposts` | (1, 1) | one circular post |
//! | `coupled_elliptical_resonators` | (2, 4) | four elliptical posts |
//! | `coupled_rectangular_resonators` | (2, 4) | four super-elliptical posts |
//! | `None` | – | no structure |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::spec::GeometryError;

/// Closed set of cell parameterizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterizationType {
    RectangularResonators,
    EllipticalResonators,
    CylindricalNanoposts,
    CoupledEllipticalResonators,
    CoupledRectangularResonators,
    #[serde(rename = "None")]
    None,
}

/// Which layers a family writes structure into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerCoverage {
    /// No layer carries structure.
    Empty,
    /// Only the given layer index.
    Single(usize),
    /// Every layer, identically.
    All,
}

impl ParameterizationType {
    pub const ALL: [ParameterizationType; 6] = [
        ParameterizationType::RectangularResonators,
        ParameterizationType::EllipticalResonators,
        ParameterizationType::CylindricalNanoposts,
        ParameterizationType::CoupledEllipticalResonators,
        ParameterizationType::CoupledRectangularResonators,
        ParameterizationType::None,
    ];

    /// Identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RectangularResonators => "rectangular_resonators",
            Self::EllipticalResonators => "elliptical_resonators",
            Self::CylindricalNanoposts => "cylindrical_nanoposts",
            Self::CoupledEllipticalResonators => "coupled_elliptical_resonators",
            Self::CoupledRectangularResonators => "coupled_rectangular_resonators",
            Self::None => "None",
        }
    }

    /// Required `(d1, d2)` parameter degrees, or `None` when the family takes
    /// no parameters.
    pub fn cell_shape_degree(&self) -> Option<(usize, usize)> {
        match self {
            Self::RectangularResonators | Self::EllipticalResonators => Some((2, 1)),
            Self::CylindricalNanoposts => Some((1, 1)),
            Self::CoupledEllipticalResonators | Self::CoupledRectangularResonators => Some((2, 4)),
            Self::None => None,
        }
    }

    pub fn layer_coverage(&self) -> LayerCoverage {
        match self {
            Self::RectangularResonators => LayerCoverage::Single(1),
            Self::None => LayerCoverage::Empty,
            _ => LayerCoverage::All,
        }
    }

    /// Check a parameter tensor shape `(d1, pixelsX, pixelsY, d2)` against
    /// this family and the configured pixel grid.
    pub fn check_params(
        &self,
        shape: (usize, usize, usize, usize),
        pixels: (usize, usize),
    ) -> Result<(), GeometryError> {
        let Some((d1, d2)) = self.cell_shape_degree() else {
            return Ok(());
        };
        let (p1, px, py, p2) = shape;
        if (p1, p2) != (d1, d2) || (px, py) != pixels {
            return Err(GeometryError::ParamShape {
                family: *self,
                expected: (d1, pixels.0, pixels.1, d2),
                found: shape,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ParameterizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterizationType {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| GeometryError::UnknownFamily(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for family in ParameterizationType::ALL {
            assert_eq!(family.as_str().parse::<ParameterizationType>().unwrap(), family);
        }
        assert!(matches!(
            "hexagonal_pillars".parse::<ParameterizationType>(),
            Err(GeometryError::UnknownFamily(_))
        ));
    }

    #[test]
    fn test_degree_table() {
        use ParameterizationType::*;
        assert_eq!(RectangularResonators.cell_shape_degree(), Some((2, 1)));
        assert_eq!(EllipticalResonators.cell_shape_degree(), Some((2, 1)));
        assert_eq!(CylindricalNanoposts.cell_shape_degree(), Some((1, 1)));
        assert_eq!(CoupledEllipticalResonators.cell_shape_degree(), Some((2, 4)));
        assert_eq!(CoupledRectangularResonators.cell_shape_degree(), Some((2, 4)));
        assert_eq!(None.cell_shape_degree(), Option::None);
    }

    #[test]
    fn test_param_shape_check() {
        let family = ParameterizationType::CoupledEllipticalResonators;
        assert!(family.check_params((2, 3, 3, 4), (3, 3)).is_ok());
        assert!(family.check_params((2, 3, 3, 1), (3, 3)).is_err());
        assert!(family.check_params((2, 3, 2, 4), (3, 3)).is_err());
        assert!(ParameterizationType::None
            .check_params((7, 1, 1, 7), (3, 3))
            .is_ok());
    }

    #[test]
    fn test_serde_names_match_config_identifiers() {
        #[derive(Deserialize)]
        struct Wrapper {
            family: ParameterizationType,
        }
        let w: Wrapper = toml::from_str("family = \"cylindrical_nanoposts\"").unwrap();
        assert_eq!(w.family, ParameterizationType::CylindricalNanoposts);
        let w: Wrapper = toml::from_str("family = \"None\"").unwrap();
        assert_eq!(w.family, ParameterizationType::None);
    }
}
