//! RML beamline generation for the ray tracer

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use minijinja::{context, Environment};
use nalgebra::Vector3;

use crate::geometry::Frame;
use crate::layout::ArrayLayout;
use crate::params::RmlParam;

const RML_TEMPLATE: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!-- {{ header_comment }} -->
<!-- Generated: {{ timestamp }} -->
<group>
{% for vec in group_placement %}
  <param id="{{ vec.id }}" enabled="F">
    <x>{{ vec.x }}</x>
    <y>{{ vec.y }}</y>
    <z>{{ vec.z }}</z>
  </param>
{% endfor %}
{% for obj in objects %}
  <object name="{{ obj.name }}" type="{{ obj.type }}">
{% for p in obj.params %}
    <param id="{{ p.id }}"{% if p.comment %} comment="{{ p.comment }}"{% endif %}{% if p.relative %} relative=""{% endif %}{% if p.auto %} auto="T"{% endif %} enabled="{{ p.enabled }}">{{ p.value }}</param>
{% endfor %}
{% for vec in obj.placement %}
    <param id="{{ vec.id }}" enabled="F">
      <x>{{ vec.x }}</x>
      <y>{{ vec.y }}</y>
      <z>{{ vec.z }}</z>
    </param>
{% endfor %}
  </object>
{% endfor %}
</group>
"##;

/// Escape text for use in XML content and attribute values
///
/// minijinja only ships HTML escaping, which also rewrites `/` as `&#x2f;`
/// and would mangle the file paths the ray tracer reads back.
pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn flag(value: bool) -> &'static str {
    if value {
        "T"
    } else {
        "F"
    }
}

/// Position followed by the three axes, under the ids the ray tracer reads
fn placement(position: &Vector3<f64>, frame: &Frame) -> Vec<serde_json::Value> {
    [
        ("worldPosition", position),
        ("worldXdirection", &frame.x_axis),
        ("worldYdirection", &frame.y_axis),
        ("worldZdirection", &frame.z_axis),
    ]
    .iter()
    .map(|(id, v)| {
        serde_json::json!({
            "id": id,
            "x": v.x.to_string(),
            "y": v.y.to_string(),
            "z": v.z.to_string(),
        })
    })
    .collect()
}

fn param_entry(param: &RmlParam) -> serde_json::Value {
    serde_json::json!({
        "id": xml_escape(&param.id),
        "value": xml_escape(&param.value),
        "enabled": flag(param.enabled),
        "comment": param.comment.map(xml_escape),
        "auto": param.auto,
        "relative": param.relative,
    })
}

/// Render the array as an RML document
///
/// The group carries the base placement; every element becomes one object
/// with the shared parameter table and its own placement.
pub fn generate_rml(layout: &ArrayLayout) -> Result<String> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("rml", RML_TEMPLATE)?;

    let template = env.get_template("rml")?;

    let base = layout.center();
    let group_placement = placement(&base.position, &base.frame);

    let objects: Vec<_> = layout
        .elements
        .iter()
        .map(|element| {
            let params: Vec<_> = element.params.rml_params().iter().map(param_entry).collect();
            serde_json::json!({
                "name": xml_escape(&element.params.name),
                "type": xml_escape(&element.params.element_type),
                "params": params,
                "placement": placement(&element.position, &element.frame),
            })
        })
        .collect();

    let output = template.render(context! {
        header_comment => format!("Reflection zoneplate array, {} elements", layout.elements.len()),
        timestamp => chrono::Utc::now().to_rfc3339(),
        group_placement => group_placement,
        objects => objects,
    })?;

    Ok(output)
}

/// Write a rendered document to `path`
pub fn write_rml(path: &Path, document: &str) -> Result<()> {
    fs::write(path, document)
        .with_context(|| format!("Failed to write RML file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::build_array;
    use crate::params::ZoneplateParams;

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("plain"), "plain");
        assert_eq!(xml_escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_document_structure() {
        let layout = build_array(3, &ZoneplateParams::default(), 0.0).unwrap();
        let rml = generate_rml(&layout).unwrap();

        assert!(rml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(rml.trim_end().ends_with("</group>"));
        assert_eq!(rml.matches("<object name=\"Reflection Zoneplate\"").count(), 5);
        assert_eq!(rml.matches("</object>").count(), 5);
        // Group placement plus one per element
        assert_eq!(rml.matches("<param id=\"worldPosition\" enabled=\"F\">").count(), 6);
        assert_eq!(rml.matches("<param id=\"worldZdirection\" enabled=\"F\">").count(), 6);
        assert!(!rml.contains("worldXDirection"));
    }

    #[test]
    fn test_param_lines() {
        let layout = build_array(1, &ZoneplateParams::default(), 0.0).unwrap();
        let rml = generate_rml(&layout).unwrap();

        for line in [
            "    <param id=\"geometricalShape\" comment=\"rectangle\" enabled=\"T\">0</param>",
            "    <param id=\"totalWidth\" enabled=\"T\">0.1092372974</param>",
            "    <param id=\"totalLength\" enabled=\"T\">72.5</param>",
            "    <param id=\"designOrderDiffraction\" auto=\"T\" enabled=\"T\">-1</param>",
            "    <param id=\"coefficientsFile\" relative=\"\" enabled=\"F\"></param>",
            "    <param id=\"materialSubstrate\" enabled=\"F\">Ni</param>",
            "      <z>90</z>",
        ] {
            assert!(rml.lines().any(|l| l == line), "missing line: {}", line);
        }
        assert!(!rml.lines().any(|l| l.trim().is_empty()));
    }

    #[test]
    fn test_positions_per_element() {
        let layout = build_array(3, &ZoneplateParams::default(), 0.0).unwrap();
        let rml = generate_rml(&layout).unwrap();

        let z_values: Vec<&str> = rml
            .lines()
            .filter(|l| l.starts_with("      <z>"))
            .collect();
        // Four vectors per element; positions come first
        let positions: Vec<&str> = z_values.iter().step_by(4).copied().collect();
        assert_eq!(
            positions,
            vec![
                "      <z>-55</z>",
                "      <z>17.5</z>",
                "      <z>90</z>",
                "      <z>162.5</z>",
                "      <z>235</z>",
            ]
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let params = ZoneplateParams {
            name: "RZP <left> & right".to_string(),
            material_substrate: "Ni\"x".to_string(),
            ..Default::default()
        };
        let layout = build_array(1, &params, 0.0).unwrap();
        let rml = generate_rml(&layout).unwrap();

        assert!(rml.contains("<object name=\"RZP &lt;left&gt; &amp; right\""));
        assert!(rml.contains(">Ni&quot;x</param>"));
    }

    #[test]
    fn test_file_paths_verbatim() {
        let params = ZoneplateParams {
            profile_file: "data/rzp/profile.dat".to_string(),
            coefficients_file: "../coeffs/b&w.txt".to_string(),
            ..Default::default()
        };
        let layout = build_array(1, &params, 0.0).unwrap();
        let rml = generate_rml(&layout).unwrap();

        assert!(rml.contains(">data/rzp/profile.dat</param>"));
        assert!(rml.contains(">../coeffs/b&amp;w.txt</param>"));
        assert!(!rml.contains("&#x2f;"));
    }

    #[test]
    fn test_write_rml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("array.rml");
        write_rml(&path, "<group/>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<group/>");

        let missing = dir.path().join("no/such/dir/array.rml");
        assert!(write_rml(&missing, "<group/>").is_err());
    }
}
