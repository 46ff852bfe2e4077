//! Orthonormal basis checks run after every mirror step

use std::fmt;

use crate::geometry::Frame;

/// Allowed deviation for the pairwise dot products and axis norms
pub const BASIS_TOLERANCE: f64 = 1e-4;

/// Which axis of a [`Frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// The first failing check of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BasisViolation {
    /// Two axes are not orthogonal
    Dot { pair: (Axis, Axis), value: f64 },
    /// An axis is not unit length
    Norm { axis: Axis, value: f64 },
    /// Orthonormal but `(x × y) · z` is negative
    LeftHanded { triple: f64 },
}

impl fmt::Display for BasisViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisViolation::Dot { pair: (a, b), value } => {
                write!(f, "{}·{} = {:.3e} exceeds tolerance {:e}", a, b, value, BASIS_TOLERANCE)
            }
            BasisViolation::Norm { axis, value } => {
                write!(f, "|{}| = {} is not unit length", axis, value)
            }
            BasisViolation::LeftHanded { triple } => {
                write!(f, "frame is left-handed ((x × y)·z = {})", triple)
            }
        }
    }
}

/// Check that `frame` is a right-handed orthonormal basis within [`BASIS_TOLERANCE`]
pub fn check_basis(frame: &Frame) -> Result<(), BasisViolation> {
    let pairs = [
        ((Axis::Z, Axis::Y), frame.z_axis.dot(&frame.y_axis)),
        ((Axis::Z, Axis::X), frame.z_axis.dot(&frame.x_axis)),
        ((Axis::Y, Axis::X), frame.y_axis.dot(&frame.x_axis)),
    ];
    for (pair, value) in pairs {
        if !(value.abs() < BASIS_TOLERANCE) {
            return Err(BasisViolation::Dot { pair, value });
        }
    }

    for (axis, vector) in [(Axis::X, frame.x_axis), (Axis::Y, frame.y_axis), (Axis::Z, frame.z_axis)] {
        let value = vector.norm();
        if !((value - 1.0).abs() < BASIS_TOLERANCE) {
            return Err(BasisViolation::Norm { axis, value });
        }
    }

    let triple = frame.x_axis.cross(&frame.y_axis).dot(&frame.z_axis);
    if triple <= 0.0 {
        return Err(BasisViolation::LeftHanded { triple });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_world_frame_is_basis() {
        assert_eq!(check_basis(&Frame::world()), Ok(()));
    }

    #[test]
    fn test_reference_zoneplate_frame_is_basis() {
        // Unnormalized values from the default parameter table
        let frame = Frame::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.999263, -0.0383878),
            Vector3::new(0.0, 0.0383878, 0.999263),
        );
        assert!(check_basis(&frame).is_ok());
    }

    #[test]
    fn test_negative_dot_is_reported() {
        let frame = Frame::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-0.01, 1.0, 0.0).normalize(),
            Vector3::z(),
        );
        match check_basis(&frame) {
            Err(BasisViolation::Dot { pair, value }) => {
                assert_eq!(pair, (Axis::Y, Axis::X));
                assert!(value < -BASIS_TOLERANCE);
            }
            other => panic!("Expected dot violation, got {:?}", other),
        }
    }

    #[test]
    fn test_scaled_axis_is_reported() {
        let frame = Frame::new(Vector3::x() * 2.0, Vector3::y(), Vector3::z());
        assert!(matches!(
            check_basis(&frame),
            Err(BasisViolation::Norm { axis: Axis::X, .. })
        ));
    }

    #[test]
    fn test_left_handed_is_reported() {
        let frame = Frame::new(Vector3::x(), Vector3::y(), -Vector3::z());
        assert!(matches!(check_basis(&frame), Err(BasisViolation::LeftHanded { .. })));
    }

    #[test]
    fn test_nan_frame_is_reported() {
        let frame = Frame::new(Vector3::new(f64::NAN, 0.0, 0.0), Vector3::y(), Vector3::z());
        assert!(check_basis(&frame).is_err());
    }

    #[test]
    fn test_violation_message_names_axes() {
        let violation = BasisViolation::Dot { pair: (Axis::Z, Axis::X), value: 0.5 };
        assert!(violation.to_string().starts_with("z·x"));
    }
}
