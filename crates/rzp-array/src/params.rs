//! Static parameter table of a reflection zoneplate and its RML parameter listing

use serde::{Deserialize, Serialize};

/// Full parameter set of a single reflection zoneplate.
///
/// Lengths are in mm, angles in degrees, energies in eV. Integer fields are
/// the option codes of the ray-tracing tool. The four `world_*` vectors are
/// only read when the base element is created; mirrored elements carry
/// their own computed position and frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoneplateParams {
    pub name: String,
    #[serde(rename = "type")]
    pub element_type: String,

    // Shape
    pub geometrical_shape: i32,
    pub total_width: f64,
    pub total_width_b: f64,
    pub total_length: f64,

    // Mount
    pub grating_mount: i32,
    pub grazing_inc_angle: f64,
    pub deviation_angle: f64,
    pub distance_preceding: f64,
    pub azimuthal_angle: f64,
    pub element_offset_z_type: i32,
    pub element_offset_z: f64,
    pub meridional_incidence_beam_divergence: f64,
    pub meridional_incidence_focus_distance: f64,
    pub order_diffraction: i32,
    pub beta_diffraction: f64,

    // Design
    pub derivation_method: i32,
    pub coefficients_file: String,
    pub design_energy: f64,
    pub design_order_diffraction: i32,
    pub entrance_arm_length_sag: f64,
    pub entrance_arm_length_mer: f64,
    pub design_alpha_angle: f64,
    pub exit_arm_length_sag: f64,
    pub exit_arm_length_mer: f64,
    pub curvature_type: i32,
    pub long_radius: f64,
    pub short_radius: f64,
    pub design_type: i32,
    #[serde(rename = "FresnelZOffset")]
    pub fresnel_z_offset: f64,
    pub design_beta_angle: f64,
    pub image_type: i32,
    pub stretch_xdirection: i32,
    pub rzp_type: i32,
    pub z_dcalc: f64,
    pub x_dcalc: f64,
    #[serde(rename = "Dz")]
    pub dz: f64,
    #[serde(rename = "Dx")]
    pub dx: f64,

    // Grating efficiency
    pub refrac_method: i32,
    pub additional_order: i32,
    pub line_profile: i32,
    pub full_efficiency: i32,
    pub grating_efficiency: f64,
    pub blaze_angle: f64,
    pub aspect_angle: f64,
    pub groove_depth: f64,
    pub groove_ratio: f64,
    pub multilayer_fourier_coefficients: u32,
    pub multilayer_integration_steps: u32,

    // Substrate and coatings
    pub reflectivity_type: i32,
    pub material_substrate: String,
    pub roughness_substrate: f64,
    pub density_substrate: f64,
    pub surface_coating: i32,
    pub number_layer: u32,
    pub material_coating1: String,
    pub thickness_coating1: f64,
    pub density_coating1: f64,
    pub material_coating2: String,
    pub thickness_coating2: f64,
    pub density_coating2: f64,
    pub material_top_layer: String,
    pub thickness_top_layer: f64,
    pub density_top_layer: f64,
    pub lateral_thickness_gradient_coating1: i32,
    /// `gradientC1B1` .. `gradientC1B8`
    pub gradient_c1: [f64; 8],

    // Alignment errors
    pub alignment_error: i32,
    pub translation_xerror: f64,
    pub translation_yerror: f64,
    pub translation_zerror: f64,
    pub rotation_xerror: f64,
    pub rotation_yerror: f64,
    pub rotation_zerror: f64,

    // Surface errors
    pub slope_error: i32,
    pub profile_kind: i32,
    pub profile_file: String,
    pub slope_error_sag: f64,
    pub slope_error_mer: f64,
    pub thermal_distortion_amp: f64,
    pub thermal_distortion_sigma_x: f64,
    pub thermal_distortion_sigma_z: f64,
    pub cylindrical_bowing_amp: f64,
    pub cylindrical_bowing_radius: f64,

    // Placement of the base element
    pub world_position: [f64; 3],
    pub world_xdirection: [f64; 3],
    pub world_ydirection: [f64; 3],
    pub world_zdirection: [f64; 3],
}

impl Default for ZoneplateParams {
    fn default() -> Self {
        Self {
            name: "Reflection Zoneplate".to_string(),
            element_type: "Reflection Zoneplate".to_string(),
            geometrical_shape: 0,
            total_width: 0.1092372974,
            total_width_b: 0.2567627027,
            total_length: 72.5,
            grating_mount: 1,
            grazing_inc_angle: 2.2,
            deviation_angle: 170.0,
            distance_preceding: 90.0,
            azimuthal_angle: 0.0,
            element_offset_z_type: 1,
            element_offset_z: 0.0,
            meridional_incidence_beam_divergence: 0.0,
            meridional_incidence_focus_distance: 0.0,
            order_diffraction: -1,
            beta_diffraction: 1.0,
            derivation_method: 0,
            coefficients_file: String::new(),
            design_energy: 640.0,
            design_order_diffraction: -1,
            entrance_arm_length_sag: 90.0,
            entrance_arm_length_mer: 90.0,
            design_alpha_angle: 2.2,
            exit_arm_length_sag: 400.0,
            exit_arm_length_mer: 400.0,
            curvature_type: 0,
            long_radius: 0.0,
            short_radius: 0.0,
            design_type: 1,
            fresnel_z_offset: 0.0,
            design_beta_angle: 1.0,
            image_type: 0,
            stretch_xdirection: 1,
            rzp_type: 0,
            z_dcalc: 0.0,
            x_dcalc: 0.0,
            dz: 301.857,
            dx: 0.0,
            refrac_method: 1,
            additional_order: 1,
            line_profile: 2,
            full_efficiency: 0,
            grating_efficiency: 1.0,
            blaze_angle: 4.0,
            aspect_angle: 90.0,
            groove_depth: 10.0,
            groove_ratio: 0.65,
            multilayer_fourier_coefficients: 11,
            multilayer_integration_steps: 50,
            reflectivity_type: 0,
            material_substrate: "Ni".to_string(),
            roughness_substrate: 1.0,
            density_substrate: 8.876,
            surface_coating: 0,
            number_layer: 2,
            material_coating1: String::new(),
            thickness_coating1: 0.0,
            density_coating1: 0.0,
            material_coating2: String::new(),
            thickness_coating2: 0.0,
            density_coating2: 0.0,
            material_top_layer: String::new(),
            thickness_top_layer: 0.0,
            density_top_layer: 0.0,
            lateral_thickness_gradient_coating1: 0,
            gradient_c1: [0.0; 8],
            alignment_error: 1,
            translation_xerror: 0.0,
            translation_yerror: 0.0,
            translation_zerror: 0.0,
            rotation_xerror: 0.0,
            rotation_yerror: 0.0,
            rotation_zerror: 0.0,
            slope_error: 1,
            profile_kind: 2,
            profile_file: String::new(),
            slope_error_sag: 0.0,
            slope_error_mer: 0.0,
            thermal_distortion_amp: 0.0,
            thermal_distortion_sigma_x: 0.0,
            thermal_distortion_sigma_z: 0.0,
            cylindrical_bowing_amp: 0.0,
            cylindrical_bowing_radius: 0.0,
            world_position: [0.0, 0.0, 90.0],
            world_xdirection: [1.0, 0.0, 0.0],
            world_ydirection: [0.0, 0.999263, -0.0383878],
            world_zdirection: [0.0, 0.0383878, 0.999263],
        }
    }
}

/// One tagged `<param>` entry of an RML object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RmlParam {
    pub id: String,
    /// Text content, not yet XML-escaped
    pub value: String,
    pub enabled: bool,
    pub comment: Option<&'static str>,
    pub auto: bool,
    pub relative: bool,
}

impl RmlParam {
    fn new(id: impl Into<String>, value: impl ToString, enabled: bool) -> Self {
        Self {
            id: id.into(),
            value: value.to_string(),
            enabled,
            comment: None,
            auto: false,
            relative: false,
        }
    }

    fn comment(mut self, comment: Option<&'static str>) -> Self {
        self.comment = comment;
        self
    }

    fn auto(mut self) -> Self {
        self.auto = true;
        self
    }

    fn relative(mut self) -> Self {
        self.relative = true;
        self
    }
}

/// Label of an option code, only known for the codes the reference table uses
fn label(code: i32, known: i32, text: &'static str) -> Option<&'static str> {
    (code == known).then_some(text)
}

impl ZoneplateParams {
    /// The non-geometric parameters in the order the ray tracer expects them.
    ///
    /// Identical for every element built from the same table.
    pub fn rml_params(&self) -> Vec<RmlParam> {
        let mut params = vec![
            RmlParam::new("geometricalShape", self.geometrical_shape, true)
                .comment(label(self.geometrical_shape, 0, "rectangle")),
            RmlParam::new("totalWidth", self.total_width, true),
            RmlParam::new("totalWidthB", self.total_width_b, true),
            RmlParam::new("totalLength", self.total_length, true),
            RmlParam::new("gratingMount", self.grating_mount, true)
                .comment(label(self.grating_mount, 1, "constant incidence angle")),
            RmlParam::new("grazingIncAngle", self.grazing_inc_angle, true),
            RmlParam::new("deviationAngle", self.deviation_angle, false),
            RmlParam::new("distancePreceding", self.distance_preceding, true),
            RmlParam::new("azimuthalAngle", self.azimuthal_angle, true),
            RmlParam::new("elementOffsetZType", self.element_offset_z_type, true)
                .comment(label(self.element_offset_z_type, 1, "by beam divergence and distance")),
            RmlParam::new("elementOffsetZ", self.element_offset_z, false),
            RmlParam::new(
                "meridionalIncidenceBeamDivergence",
                self.meridional_incidence_beam_divergence,
                true,
            ),
            RmlParam::new(
                "meridionalIncidenceFocusDistance",
                self.meridional_incidence_focus_distance,
                true,
            ),
            RmlParam::new("orderDiffraction", self.order_diffraction, true),
            RmlParam::new("betaDiffraction", self.beta_diffraction, true),
            RmlParam::new("derivationMethod", self.derivation_method, true)
                .comment(label(self.derivation_method, 0, "Formulas")),
            RmlParam::new("coefficientsFile", &self.coefficients_file, false).relative(),
            RmlParam::new("designEnergy", self.design_energy, true),
            RmlParam::new("designOrderDiffraction", self.design_order_diffraction, true).auto(),
            RmlParam::new("entranceArmLengthSag", self.entrance_arm_length_sag, true),
            RmlParam::new("entranceArmLengthMer", self.entrance_arm_length_mer, true),
            RmlParam::new("designAlphaAngle", self.design_alpha_angle, true),
            RmlParam::new("exitArmLengthSag", self.exit_arm_length_sag, true),
            RmlParam::new("exitArmLengthMer", self.exit_arm_length_mer, true),
            RmlParam::new("curvatureType", self.curvature_type, true)
                .comment(label(self.curvature_type, 0, "planar")),
            RmlParam::new("longRadius", self.long_radius, false),
            RmlParam::new("shortRadius", self.short_radius, false),
            RmlParam::new("designType", self.design_type, true)
                .comment(label(self.design_type, 1, "use Design Angle beta")),
            RmlParam::new("FresnelZOffset", self.fresnel_z_offset, false),
            RmlParam::new("designBetaAngle", self.design_beta_angle, true),
            RmlParam::new("imageType", self.image_type, true)
                .comment(label(self.image_type, 0, "point to point")),
            RmlParam::new("stretchXdirection", self.stretch_xdirection, false),
            RmlParam::new("rzpType", self.rzp_type, true)
                .comment(label(self.rzp_type, 0, "elliptical (standard)")),
            RmlParam::new("zDcalc", self.z_dcalc, true),
            RmlParam::new("xDcalc", self.x_dcalc, true),
            RmlParam::new("Dz", self.dz, true),
            RmlParam::new("Dx", self.dx, true),
            RmlParam::new("refracMethod", self.refrac_method, true)
                .comment(label(self.refrac_method, 1, "2D (new)")),
            RmlParam::new("additionalOrder", self.additional_order, true)
                .comment(label(self.additional_order, 1, "on")),
            RmlParam::new("lineProfile", self.line_profile, true)
                .comment(label(self.line_profile, 2, "laminar")),
            RmlParam::new("fullEfficiency", self.full_efficiency, true)
                .comment(label(self.full_efficiency, 0, "off")),
            RmlParam::new("gratingEfficiency", self.grating_efficiency, false),
            RmlParam::new("blazeAngle", self.blaze_angle, false),
            RmlParam::new("aspectAngle", self.aspect_angle, true),
            RmlParam::new("grooveDepth", self.groove_depth, true),
            RmlParam::new("grooveRatio", self.groove_ratio, true),
            RmlParam::new("multilayerFourierCoefficients", self.multilayer_fourier_coefficients, true).auto(),
            RmlParam::new("multilayerIntegrationSteps", self.multilayer_integration_steps, true).auto(),
            RmlParam::new("reflectivityType", self.reflectivity_type, true)
                .comment(label(self.reflectivity_type, 0, "100%")),
            RmlParam::new("materialSubstrate", &self.material_substrate, false),
            RmlParam::new("roughnessSubstrate", self.roughness_substrate, false),
            RmlParam::new("densitySubstrate", self.density_substrate, false).auto(),
            RmlParam::new("surfaceCoating", self.surface_coating, false)
                .comment(label(self.surface_coating, 0, "Substrate only")),
            RmlParam::new("numberLayer", self.number_layer, false),
            RmlParam::new("materialCoating1", &self.material_coating1, false),
            RmlParam::new("thicknessCoating1", self.thickness_coating1, false),
            RmlParam::new("densityCoating1", self.density_coating1, false).auto(),
            RmlParam::new("materialCoating2", &self.material_coating2, false),
            RmlParam::new("thicknessCoating2", self.thickness_coating2, false),
            RmlParam::new("densityCoating2", self.density_coating2, false).auto(),
            RmlParam::new("materialTopLayer", &self.material_top_layer, false),
            RmlParam::new("thicknessTopLayer", self.thickness_top_layer, false),
            RmlParam::new("densityTopLayer", self.density_top_layer, false).auto(),
            RmlParam::new(
                "lateralThicknessGradientCoating1",
                self.lateral_thickness_gradient_coating1,
                false,
            )
            .comment(label(self.lateral_thickness_gradient_coating1, 0, "No")),
        ];

        params.extend(
            self.gradient_c1
                .iter()
                .enumerate()
                .map(|(i, value)| RmlParam::new(format!("gradientC1B{}", i + 1), value, false)),
        );

        params.extend([
            RmlParam::new("alignmentError", self.alignment_error, true)
                .comment(label(self.alignment_error, 1, "No")),
            RmlParam::new("translationXerror", self.translation_xerror, false),
            RmlParam::new("translationYerror", self.translation_yerror, false),
            RmlParam::new("translationZerror", self.translation_zerror, false),
            RmlParam::new("rotationXerror", self.rotation_xerror, false),
            RmlParam::new("rotationYerror", self.rotation_yerror, false),
            RmlParam::new("rotationZerror", self.rotation_zerror, false),
            RmlParam::new("slopeError", self.slope_error, true)
                .comment(label(self.slope_error, 1, "No")),
            RmlParam::new("profileKind", self.profile_kind, false)
                .comment(label(self.profile_kind, 2, "no Profile")),
            RmlParam::new("profileFile", &self.profile_file, false).relative(),
            RmlParam::new("slopeErrorSag", self.slope_error_sag, false),
            RmlParam::new("slopeErrorMer", self.slope_error_mer, false),
            RmlParam::new("thermalDistortionAmp", self.thermal_distortion_amp, false),
            RmlParam::new("thermalDistortionSigmaX", self.thermal_distortion_sigma_x, false),
            RmlParam::new("thermalDistortionSigmaZ", self.thermal_distortion_sigma_z, false),
            RmlParam::new("cylindricalBowingAmp", self.cylindrical_bowing_amp, false),
            RmlParam::new("cylindricalBowingRadius", self.cylindrical_bowing_radius, false),
        ]);

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(params: &'a [RmlParam], id: &str) -> &'a RmlParam {
        params
            .iter()
            .find(|p| p.id == id)
            .unwrap_or_else(|| panic!("missing param {}", id))
    }

    #[test]
    fn test_param_listing_is_complete() {
        let params = ZoneplateParams::default().rml_params();
        assert_eq!(params.len(), 89);
        assert_eq!(params.first().unwrap().id, "geometricalShape");
        assert_eq!(params.last().unwrap().id, "cylindricalBowingRadius");

        let width_entries = params.iter().filter(|p| p.id == "totalWidth").count();
        assert_eq!(width_entries, 1);
    }

    #[test]
    fn test_values_use_shortest_text() {
        let params = ZoneplateParams::default().rml_params();
        assert_eq!(find(&params, "totalWidth").value, "0.1092372974");
        assert_eq!(find(&params, "distancePreceding").value, "90");
        assert_eq!(find(&params, "orderDiffraction").value, "-1");
        assert_eq!(find(&params, "grooveRatio").value, "0.65");
        assert_eq!(find(&params, "materialSubstrate").value, "Ni");
        assert_eq!(find(&params, "gradientC1B8").value, "0");
    }

    #[test]
    fn test_attributes() {
        let params = ZoneplateParams::default().rml_params();

        let shape = find(&params, "geometricalShape");
        assert!(shape.enabled);
        assert_eq!(shape.comment, Some("rectangle"));

        assert!(!find(&params, "deviationAngle").enabled);
        assert!(find(&params, "densitySubstrate").auto);
        assert!(find(&params, "profileFile").relative);
    }

    #[test]
    fn test_comment_dropped_for_other_codes() {
        let params = ZoneplateParams {
            curvature_type: 3,
            ..Default::default()
        };
        let listing = params.rml_params();
        assert_eq!(find(&listing, "curvatureType").comment, None);
    }

    #[test]
    fn test_partial_json_override() {
        let json = r#"{
            "totalLength": 50.0,
            "Dz": 12.5,
            "materialSubstrate": "Au",
            "gradientC1": [1, 2, 3, 4, 5, 6, 7, 8],
            "worldPosition": [0.0, 0.0, 0.0]
        }"#;

        let params: ZoneplateParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.total_length, 50.0);
        assert_eq!(params.dz, 12.5);
        assert_eq!(params.material_substrate, "Au");
        assert_eq!(params.gradient_c1[7], 8.0);
        assert_eq!(params.world_position, [0.0, 0.0, 0.0]);
        // Untouched fields keep the reference values
        assert_eq!(params.total_width, 0.1092372974);
        assert_eq!(params.world_zdirection, [0.0, 0.0383878, 0.999263]);
    }
}
