//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fresnel_export::ExportFormat;
use fresnel_kernel::{
    analyze, generate as generate_mesh, generate_serial, CellReport, LensSpec, Mesh,
};
use serde::Serialize;
use tracing::info;

use crate::config::FileConfig;
use crate::{GenerateArgs, InfoArgs, LensArgs};

const DEFAULT_NAME: &str = "fresnel_lens";

/// Merge file and flags, then validate.
fn resolve_spec(lens: &LensArgs, config: &FileConfig) -> Result<LensSpec> {
    let params = config.lens_with(&lens.to_params());
    params.validate().context("invalid lens parameters")
}

fn resolve_output(
    args: &GenerateArgs,
    config: &FileConfig,
) -> Result<(PathBuf, ExportFormat, String)> {
    let path = args
        .output
        .clone()
        .or_else(|| config.output.path.clone())
        .context("no output file: pass --output or set `path` in [output]")?;

    let format = match (args.format, config.output.format.as_deref()) {
        (Some(f), _) => f,
        (None, Some(s)) => s.parse::<ExportFormat>().context("invalid `format` in [output]")?,
        (None, None) => ExportFormat::from_path(&path)?,
    };

    let name = args
        .name
        .clone()
        .or_else(|| config.output.name.clone())
        .unwrap_or_else(|| solid_name(&path));

    Ok((path, format, name))
}

fn solid_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}

pub fn generate(args: &GenerateArgs) -> Result<()> {
    let config = FileConfig::load_optional(args.lens.config.as_deref())?;
    let spec = resolve_spec(&args.lens, &config)?;
    let (path, format, name) = resolve_output(args, &config)?;

    let mesh = if args.serial {
        generate_serial(&spec)?
    } else {
        generate_mesh(&spec)?
    };

    fresnel_export::save(&mesh, &path, format, &name)
        .with_context(|| format!("writing {}", path.display()))?;

    info!(
        path = %path.display(),
        %format,
        triangles = mesh.num_triangles(),
        volume = mesh.volume(),
        "exported lens"
    );
    println!(
        "Wrote {} triangles to {} ({format})",
        mesh.num_triangles(),
        path.display()
    );
    Ok(())
}

/// Mesh statistics for `info`.
#[derive(Debug, Serialize)]
struct MeshStats {
    triangles: usize,
    volume: f64,
    surface_area: f64,
    min: [f64; 3],
    max: [f64; 3],
}

impl MeshStats {
    fn of(mesh: &Mesh) -> Self {
        let (min, max) = match mesh.bounding_box() {
            Some(b) => ([b.min.x, b.min.y, b.min.z], [b.max.x, b.max.y, b.max.z]),
            None => ([0.0; 3], [0.0; 3]),
        };
        Self {
            triangles: mesh.num_triangles(),
            volume: mesh.volume(),
            surface_area: mesh.surface_area(),
            min,
            max,
        }
    }
}

#[derive(Debug, Serialize)]
struct InfoReport {
    lens: LensSpec,
    cells: Vec<CellReport>,
    mesh: MeshStats,
}

fn build_report(spec: LensSpec) -> Result<InfoReport> {
    let cells = analyze(&spec)?;
    let mesh = generate_mesh(&spec)?;
    Ok(InfoReport {
        lens: spec,
        cells,
        mesh: MeshStats::of(&mesh),
    })
}

pub fn info(args: &InfoArgs) -> Result<()> {
    let config = FileConfig::load_optional(args.lens.config.as_deref())?;
    let report = build_report(resolve_spec(&args.lens, &config)?)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &InfoReport) {
    let s = &report.lens;
    println!(
        "Lens: {} x {} mm, f = {} mm, n = {}, thickness {} mm",
        s.width(),
        s.height(),
        s.focal_length(),
        s.refractive_index(),
        s.thickness()
    );
    println!(
        "Grid: {n} x {n} prisms of {:.4} x {:.4} mm, {} facet(s) each, {} radius",
        s.prism_width(),
        s.prism_height(),
        s.n_facets(),
        s.radius_mode(),
        n = s.n_prisms()
    );
    println!();
    println!(
        "{:>5} {:>5} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "i", "j", "cx", "cy", "r", "delta", "tan_phi", "step"
    );
    for r in &report.cells {
        println!(
            "{:>5} {:>5} {:>10.4} {:>10.4} {:>10.4} {:>10.6} {:>10.6} {:>10.4}",
            r.cell.i,
            r.cell.j,
            r.cell.cx,
            r.cell.cy,
            r.cell.radius,
            r.optics.delta,
            r.optics.tan_phi,
            r.optics.step_height
        );
    }

    let m = &report.mesh;
    println!();
    println!("Triangles:    {}", m.triangles);
    println!("Volume:       {:.3} mm³", m.volume);
    println!("Surface area: {:.3} mm²", m.surface_area);
    println!(
        "Bounds:       ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
        m.min[0], m.min[1], m.min[2], m.max[0], m.max[1], m.max[2]
    );
}
