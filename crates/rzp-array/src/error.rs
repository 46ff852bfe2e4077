//! Error and warning types of the layout engine

use std::fmt;

use thiserror::Error;

use crate::basis::BasisViolation;

/// Errors that stop a layout before any output is produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `offset` is the signed position relative to the base element
    #[error("Degenerate geometry at element {offset:+}: {detail}")]
    DegenerateGeometry { offset: isize, detail: String },
}

/// What went wrong in a single mirror step
#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    /// The edge used as reflection line has no length
    ZeroLengthEdge { width: f64 },
    /// The frame is no longer a right-handed orthonormal basis
    Basis(BasisViolation),
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::ZeroLengthEdge { width } => {
                write!(f, "edge of width {} has no direction, using world X", width)
            }
            WarningKind::Basis(violation) => write!(f, "not a basis anymore: {}", violation),
        }
    }
}

/// A non-fatal geometry problem, kept alongside the computed elements
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryWarning {
    /// Signed position relative to the base element
    pub offset: isize,
    pub kind: WarningKind,
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element {:+}: {}", self.offset, self.kind)
    }
}

impl From<GeometryWarning> for LayoutError {
    fn from(warning: GeometryWarning) -> Self {
        LayoutError::DegenerateGeometry {
            offset: warning.offset,
            detail: warning.kind.to_string(),
        }
    }
}
