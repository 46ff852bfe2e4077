//! Vector and frame primitives used to mirror elements across their edges

use nalgebra::{Matrix3, Vector3};

/// Local coordinate system of an element in world space.
///
/// `z_axis` is the nominal beam direction, `x_axis` and `y_axis` span the
/// element surface. Every element owns its own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub z_axis: Vector3<f64>,
}

impl Frame {
    pub fn new(x_axis: Vector3<f64>, y_axis: Vector3<f64>, z_axis: Vector3<f64>) -> Self {
        Self { x_axis, y_axis, z_axis }
    }

    /// The world axes
    pub fn world() -> Self {
        Self::new(Vector3::x(), Vector3::y(), Vector3::z())
    }

    pub fn axes(&self) -> [Vector3<f64>; 3] {
        [self.x_axis, self.y_axis, self.z_axis]
    }

    /// Apply `f` to each axis independently
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(&Vector3<f64>) -> Vector3<f64>,
    {
        Self::new(f(&self.x_axis), f(&self.y_axis), f(&self.z_axis))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::world()
    }
}

/// Sense of a rotation about the world Y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSense {
    /// `+1`
    Clockwise,
    /// `-1`, uses the transposed rotation matrix
    CounterClockwise,
}

impl RotationSense {
    pub fn inverse(self) -> Self {
        match self {
            RotationSense::Clockwise => RotationSense::CounterClockwise,
            RotationSense::CounterClockwise => RotationSense::Clockwise,
        }
    }
}

impl TryFrom<i32> for RotationSense {
    type Error = i32;

    fn try_from(sign: i32) -> Result<Self, Self::Error> {
        match sign {
            1 => Ok(RotationSense::Clockwise),
            -1 => Ok(RotationSense::CounterClockwise),
            other => Err(other),
        }
    }
}

/// Rotate every axis of `frame` about the world Y axis by `angle_deg` degrees
pub fn rotate_around_y(frame: &Frame, angle_deg: f64, sense: RotationSense) -> Frame {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let rotation = Matrix3::new(
        cos, 0.0, sin,
        0.0, 1.0, 0.0,
        -sin, 0.0, cos,
    );
    let rotation = match sense {
        RotationSense::Clockwise => rotation,
        RotationSense::CounterClockwise => rotation.transpose(),
    };

    frame.map(|axis| rotation * axis)
}

/// Reflect `point` across the infinite line through `line_point`.
///
/// `line_dir` must be a unit vector. The result is the point on the
/// opposite side of the line at the same distance from it.
pub fn reflect_point_over_line(
    point: &Vector3<f64>,
    line_point: &Vector3<f64>,
    line_dir: &Vector3<f64>,
) -> Vector3<f64> {
    let offset = point - line_point;
    let along = line_dir * offset.dot(line_dir);

    line_point + along * 2.0 - offset
}

/// A unit vector orthogonal to `vector`.
///
/// Built from the cross product with world Y, or world X when `vector` is
/// (nearly) parallel to Y. A zero input yields the zero vector.
pub fn orthogonal_vector(vector: &Vector3<f64>) -> Vector3<f64> {
    let norm = vector.norm();
    let reference = if vector.cross(&Vector3::y()).norm() > 1e-9 * norm {
        Vector3::y()
    } else {
        Vector3::x()
    };

    vector
        .cross(&reference)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Anchor point of the line parallel to (`line_point`, `line_dir`) at `distance`
pub fn parallel_line(distance: f64, line_point: &Vector3<f64>, line_dir: &Vector3<f64>) -> Vector3<f64> {
    line_point + orthogonal_vector(line_dir) * distance
}

/// Angle between two vectors in degrees.
///
/// Rounding can push the cosine slightly past ±1, so it is clamped before
/// `acos`. A zero-length input yields 0.
pub fn angle_between(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let denom = v1.norm() * v2.norm();
    if denom == 0.0 {
        return 0.0;
    }

    (v1.dot(v2) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}
