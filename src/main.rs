use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;

use reporte_pdf::{
    Chart, DEFAULT_HEADER_COLOR, Kpi, RasterImage, RenderOptions, ReportModel, Rgb, TableData,
};

/// Render a JSON report description to a paginated PDF.
#[derive(Parser)]
#[command(name = "reporte-pdf", version, about)]
struct Args {
    /// Report description file (JSON)
    input: PathBuf,

    /// Output PDF path; defaults to `<title>_<date>.pdf` next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Omit the footer (timestamp and page numbers)
    #[arg(long)]
    no_footer: bool,
}

#[derive(Deserialize)]
struct ChartSpec {
    title: String,
    /// Path to the chart bitmap (PNG), relative to the description file.
    png: PathBuf,
}

#[derive(Deserialize)]
struct ReportSpec {
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    /// Header band color as `#rrggbb`.
    #[serde(default)]
    header_color: Option<String>,
    #[serde(default)]
    filters: BTreeMap<String, String>,
    #[serde(default)]
    kpis: Vec<Kpi>,
    #[serde(default)]
    charts: Vec<ChartSpec>,
    #[serde(default)]
    table: Option<TableData>,
}

fn parse_hex_color(s: &str) -> Result<Rgb, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("invalid color '{s}', expected #rrggbb"));
    }
    let mut color = [0u8; 3];
    for (i, chunk) in color.iter_mut().enumerate() {
        *chunk = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|_| format!("invalid color '{s}', expected #rrggbb"))?;
    }
    Ok(color)
}

fn run(args: Args) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&args.input)?;
    let spec: ReportSpec = serde_json::from_str(&raw)?;
    let base_dir = args.input.parent().map(PathBuf::from).unwrap_or_default();

    let header_color = match &spec.header_color {
        Some(s) => parse_hex_color(s)?,
        None => DEFAULT_HEADER_COLOR,
    };

    let mut charts = Vec::with_capacity(spec.charts.len());
    for chart in &spec.charts {
        let bytes = std::fs::read(base_dir.join(&chart.png))?;
        charts.push(Chart {
            title: chart.title.clone(),
            image: RasterImage::from_png(&bytes)?,
        });
    }

    let model = ReportModel {
        filters: spec.filters,
        kpis: spec.kpis,
        charts,
        table: spec.table,
    };

    let options = RenderOptions {
        title: spec.title,
        subtitle: spec.subtitle,
        filename: None,
        header_color,
        include_timestamp: !args.no_footer,
    };

    match args.output {
        Some(path) => {
            let bytes = reporte_pdf::render_report(&model, options)?;
            std::fs::write(&path, &bytes)?;
            Ok(path)
        }
        None => Ok(reporte_pdf::render_report_to_file(
            &model, options, &base_dir,
        )?),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
