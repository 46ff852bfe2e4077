//! rzp-array: Lay out mirrored reflection zoneplate arrays for ray tracing
//!
//! This crate provides:
//! - Vector/frame primitives (rotation about world Y, reflection across a line)
//! - The mirror step and chain builder that grow an array around a base element
//! - Basis validation of every computed frame
//! - RML generation of the complete array
//!
//! An array of `n` elements per side has `2n - 1` elements with the base
//! in the middle. Only odd `n` and linear spacing are supported.

pub mod basis;
pub mod codegen;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod params;

pub use basis::{check_basis, BasisViolation, BASIS_TOLERANCE};
pub use codegen::{generate_rml, write_rml};
pub use error::{GeometryWarning, LayoutError, WarningKind};
pub use geometry::{Frame, RotationSense};
pub use layout::{build_array, build_chain, mirror_step, ArrayLayout, Direction, Element};
pub use params::ZoneplateParams;

use anyhow::Result;
use tracing::warn;

/// Main entry point: lay out the array around `base` and render it as RML
pub fn generate(base: &ZoneplateParams, config: &LayoutConfig) -> Result<String> {
    let layout = layout_array(base, config)?;
    let document = generate_rml(&layout)?;
    Ok(document)
}

/// Validate `config` and build the array without rendering it
pub fn layout_array(base: &ZoneplateParams, config: &LayoutConfig) -> Result<ArrayLayout, LayoutError> {
    let spacing = config.validate()?;
    let layout = build_array(config.num_elements, base, spacing)?;

    if config.strict {
        return layout.into_strict();
    }
    for warning in &layout.warnings {
        warn!("Geometry warning kept in output: {}", warning);
    }
    Ok(layout)
}

/// Configuration of an array layout run
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Elements per side, base included (odd)
    pub num_elements: usize,
    /// Extra room between neighbouring elements
    pub spacing: SpacingMode,
    /// Treat geometry warnings as errors
    pub strict: bool,
    /// Output file name without the `.rml` extension
    pub file_name: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            num_elements: 5,
            spacing: SpacingMode::Distance(0.0),
            strict: false,
            file_name: "multi_RZP_test".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Check the configuration before any geometry is computed.
    ///
    /// Returns the reflection line offset in mm.
    pub fn validate(&self) -> Result<f64, LayoutError> {
        layout::validate_count(self.num_elements)?;
        match self.spacing {
            SpacingMode::Distance(mm) if mm.is_finite() && mm >= 0.0 => Ok(mm),
            SpacingMode::Distance(mm) => Err(LayoutError::InvalidConfiguration(format!(
                "spacing must be a finite, non-negative distance, got {}",
                mm
            ))),
            SpacingMode::Angle { radians } => Err(LayoutError::InvalidConfiguration(format!(
                "angular spacing ({} rad) is not implemented",
                radians
            ))),
        }
    }

    /// `<file_name>.rml`
    pub fn output_file(&self) -> String {
        format!("{}.rml", self.file_name)
    }
}

/// How the extra room between elements is given
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpacingMode {
    /// Offset of the reflection line from the edge, in mm
    Distance(f64),
    /// Increased angle between neighbours
    Angle { radians: f64 },
}
