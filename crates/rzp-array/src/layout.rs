//! Array layout: mirror step, one-sided chains and the assembled two-sided array
//!
//! The array lies in the world XZ plane. Every element is mirrored across
//! the line through the midpoint of its far edge, so a chain advances along
//! world Z and each frame is turned about world Y.

use std::fmt;

use nalgebra::Vector3;
use tracing::{debug, info, warn};

use crate::basis::check_basis;
use crate::error::{GeometryWarning, LayoutError, WarningKind};
use crate::geometry::{
    angle_between, orthogonal_vector, parallel_line, reflect_point_over_line, rotate_around_y,
    Frame, RotationSense,
};
use crate::params::ZoneplateParams;

/// Growth direction of a chain along world Z
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `+1`, towards increasing Z
    Positive,
    /// `-1`, towards decreasing Z
    Negative,
}

impl Direction {
    pub fn sign(self) -> isize {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }

    /// Positive chains turn clockwise, negative ones counter-clockwise
    pub fn rotation_sense(self) -> RotationSense {
        match self {
            Direction::Positive => RotationSense::Clockwise,
            Direction::Negative => RotationSense::CounterClockwise,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Positive => write!(f, "+1"),
            Direction::Negative => write!(f, "-1"),
        }
    }
}

/// A positioned and oriented zoneplate
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub params: ZoneplateParams,
    pub position: Vector3<f64>,
    pub frame: Frame,
}

impl Element {
    /// The base element, placed where its parameter table says
    pub fn base(params: &ZoneplateParams) -> Self {
        let [position, x, y, z] = [
            params.world_position,
            params.world_xdirection,
            params.world_ydirection,
            params.world_zdirection,
        ]
        .map(|[a, b, c]| Vector3::new(a, b, c));

        Self {
            params: params.clone(),
            position,
            frame: Frame::new(x, y, z),
        }
    }

    /// Width of the entry edge
    pub fn width_near(&self) -> f64 {
        self.params.total_width
    }

    /// Width of the exit edge
    pub fn width_far(&self) -> f64 {
        self.params.total_width_b
    }

    pub fn length(&self) -> f64 {
        self.params.total_length
    }

    /// Configured width of the edge a chain growing in `direction` mirrors across
    pub fn edge_width(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Positive => self.width_near(),
            Direction::Negative => self.width_far(),
        }
    }

    /// The two corners of the edge a chain growing in `direction` mirrors across
    fn edge_corners(&self, direction: Direction) -> (Vector3<f64>, Vector3<f64>) {
        let half_width = self.edge_width(direction) / 2.0;
        let edge_z = direction.sign() as f64 * self.length() / 2.0;

        (
            self.position + Vector3::new(-half_width, 0.0, edge_z),
            self.position + Vector3::new(half_width, 0.0, edge_z),
        )
    }
}

/// Result of one mirror step
#[derive(Debug, Clone)]
pub struct MirrorOutcome {
    pub element: Element,
    pub warnings: Vec<GeometryWarning>,
}

/// Mirror `current` across its far edge in `direction`.
///
/// The reflection line runs along the edge, shifted `spacing` away from
/// `current`, so neighbouring edges end up `2 * spacing` apart. `offset` is
/// the signed position of the new element relative to the base and only
/// labels warnings. Problems are reported in the outcome, never as errors.
pub fn mirror_step(current: &Element, offset: isize, direction: Direction, spacing: f64) -> MirrorOutcome {
    let mut warnings = Vec::new();

    let (first, second) = current.edge_corners(direction);
    let midpoint = (first + second) / 2.0;
    let line_dir = match (first - second).try_normalize(f64::EPSILON) {
        Some(dir) => dir,
        None => {
            let warning = GeometryWarning {
                offset,
                kind: WarningKind::ZeroLengthEdge {
                    width: current.edge_width(direction),
                },
            };
            warn!("{}", warning);
            warnings.push(warning);
            -Vector3::x()
        }
    };

    let outward = if orthogonal_vector(&line_dir).dot(&(midpoint - current.position)) < 0.0 {
        -spacing
    } else {
        spacing
    };
    let anchor = parallel_line(outward, &midpoint, &line_dir);

    let position = reflect_point_over_line(&current.position, &anchor, &line_dir);
    let rotation = 2.0 * angle_between(&current.frame.z_axis, &line_dir);
    let frame = rotate_around_y(&current.frame, rotation, direction.rotation_sense());

    if let Err(violation) = check_basis(&frame) {
        let warning = GeometryWarning {
            offset,
            kind: WarningKind::Basis(violation),
        };
        warn!("{}", warning);
        warnings.push(warning);
    }

    debug!(
        "Mirrored element {:+}: position ({:.6}, {:.6}, {:.6}), rotated {:.4} deg",
        offset, position.x, position.y, position.z, rotation
    );

    MirrorOutcome {
        element: Element {
            params: current.params.clone(),
            position,
            frame,
        },
        warnings,
    }
}

/// Largest supported number of elements per side
pub const MAX_ELEMENTS_PER_SIDE: usize = 999;

/// Reject element counts the layout cannot handle
pub fn validate_count(n: usize) -> Result<(), LayoutError> {
    if n == 0 {
        return Err(LayoutError::InvalidConfiguration(
            "at least one element per side is required".to_string(),
        ));
    }
    if n % 2 == 0 {
        return Err(LayoutError::InvalidConfiguration(format!(
            "even element count {} is not supported",
            n
        )));
    }
    if n > MAX_ELEMENTS_PER_SIDE {
        return Err(LayoutError::InvalidConfiguration(format!(
            "{} elements per side exceeds the limit of {}",
            n, MAX_ELEMENTS_PER_SIDE
        )));
    }
    Ok(())
}

/// Elements of one side of the array
#[derive(Debug, Clone, Default)]
pub struct Chain {
    pub elements: Vec<Element>,
    pub warnings: Vec<GeometryWarning>,
}

/// Grow a chain of `n` elements from `base` in `direction`.
///
/// A positive chain starts with `base`. A negative chain leaves `base` out
/// and is returned far end first, so `negative + positive` runs from the far
/// negative end through the base to the far positive end.
pub fn build_chain(n: usize, base: &Element, direction: Direction, spacing: f64) -> Result<Chain, LayoutError> {
    validate_count(n)?;
    debug!("Building {} chain of {} element(s)", direction, n);

    let mut elements = Vec::with_capacity(n);
    let mut warnings = Vec::new();
    elements.push(base.clone());

    for step in 1..n {
        let outcome = mirror_step(&elements[step - 1], direction.sign() * step as isize, direction, spacing);
        warnings.extend(outcome.warnings);
        elements.push(outcome.element);
    }

    if direction == Direction::Negative {
        elements.remove(0);
        elements.reverse();
    }

    Ok(Chain { elements, warnings })
}

/// The assembled two-sided array
#[derive(Debug, Clone)]
pub struct ArrayLayout {
    /// Ordered from the far negative end to the far positive end
    pub elements: Vec<Element>,
    pub warnings: Vec<GeometryWarning>,
}

impl ArrayLayout {
    pub fn center_index(&self) -> usize {
        self.elements.len() / 2
    }

    /// The base element
    pub fn center(&self) -> &Element {
        &self.elements[self.center_index()]
    }

    /// Turn the first recorded warning into an error
    pub fn into_strict(self) -> Result<Self, LayoutError> {
        match self.warnings.first() {
            Some(warning) => Err(warning.clone().into()),
            None => Ok(self),
        }
    }
}

/// Build `2 * num_elements - 1` elements around the base described by `params`
pub fn build_array(num_elements: usize, params: &ZoneplateParams, spacing: f64) -> Result<ArrayLayout, LayoutError> {
    validate_count(num_elements)?;

    let base = Element::base(params);
    let mut warnings = Vec::new();
    if let Err(violation) = check_basis(&base.frame) {
        let warning = GeometryWarning {
            offset: 0,
            kind: WarningKind::Basis(violation),
        };
        warn!("Base {}", warning);
        warnings.push(warning);
    }

    let left = build_chain(num_elements, &base, Direction::Negative, spacing)?;
    let right = build_chain(num_elements, &base, Direction::Positive, spacing)?;

    let mut elements = left.elements;
    elements.extend(right.elements);
    warnings.extend(left.warnings);
    warnings.extend(right.warnings);

    info!(
        "Laid out {} elements ({} per side, spacing {}), {} warning(s)",
        elements.len(),
        num_elements,
        spacing,
        warnings.len()
    );

    Ok(ArrayLayout { elements, warnings })
}
