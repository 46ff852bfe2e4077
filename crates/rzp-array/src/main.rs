//! rzp-array: CLI tool for laying out reflection zoneplate arrays as RML

use anyhow::{Context, Result};
use clap::Parser;
use rzp_array::{generate, write_rml, LayoutConfig, SpacingMode, ZoneplateParams};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rzp-array")]
#[command(about = "Lay out a mirrored reflection zoneplate array and write it as an RML beamline")]
#[command(version)]
struct Args {
    /// Output RML file (defaults to <FILE_NAME>.rml)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file name without extension
    #[arg(long, default_value = "multi_RZP_test")]
    file_name: String,

    /// Elements per side, base included (odd)
    #[arg(short = 'n', long, default_value = "5")]
    elements: usize,

    /// JSON file overriding fields of the default zoneplate parameters
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// Extra distance between elements in mm
    #[arg(short = 's', long, conflicts_with_all = ["radians", "degrees"])]
    spacing: Option<f64>,

    /// Increased angle between elements in radians (not implemented)
    #[arg(short = 'r', long, conflicts_with = "degrees")]
    radians: Option<f64>,

    /// Increased angle between elements in degrees (not implemented)
    #[arg(short = 'd', long)]
    degrees: Option<f64>,

    /// Fail on geometry warnings instead of writing the file
    #[arg(long)]
    strict: bool,

    /// Print generated RML to stdout instead of file
    #[arg(long)]
    stdout: bool,
}

impl Args {
    fn spacing_mode(&self) -> SpacingMode {
        match (self.spacing, self.radians, self.degrees) {
            (_, Some(radians), _) => SpacingMode::Angle { radians },
            (_, _, Some(degrees)) => SpacingMode::Angle {
                radians: degrees.to_radians(),
            },
            (spacing, None, None) => SpacingMode::Distance(spacing.unwrap_or(0.0)),
        }
    }
}

fn load_base(path: &Path) -> Result<ZoneplateParams> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file: {:?}", path))?;
    let params = serde_json::from_str(&json)
        .with_context(|| format!("Invalid parameter file: {:?}", path))?;
    Ok(params)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();

    let base = match &args.base {
        Some(path) => load_base(path)?,
        None => ZoneplateParams::default(),
    };

    let config = LayoutConfig {
        num_elements: args.elements,
        spacing: args.spacing_mode(),
        strict: args.strict,
        file_name: args.file_name.clone(),
    };

    let rml = generate(&base, &config).context("Array layout failed")?;

    if args.stdout {
        println!("{}", rml);
    } else {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(config.output_file()));
        write_rml(&output, &rml)?;
        info!("Generated RML beamline: {:?}", output);
    }

    Ok(())
}
