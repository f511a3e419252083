mod draw;
mod error;
mod extract;
mod layout;
mod model;
mod pdf;
mod raster;
mod surface;

pub use draw::render_model;
pub use error::Error;
pub use extract::{KpiPatterns, ViewNode, extract_model};
pub use layout::{
    CONTENT_BOTTOM, CONTENT_TOP, CONTENT_WIDTH, Composer, FinishedDocument, Layout, MARGIN,
    PAGE_HEIGHT, PAGE_WIDTH, slice_plan, truncate_cell,
};
pub use model::{
    Chart, DEFAULT_HEADER_COLOR, Kpi, RenderOptions, ReportModel, Rgb, TableData,
};
pub use pdf::PdfSurface;
pub use raster::{MIN_CAPTURE_SCALE, RasterImage, Rasterizer};
pub use surface::{DrawCmd, FontStyle, RecordingSurface, Surface};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Structured mode: render a caller-assembled report model to PDF bytes.
pub fn render_report(model: &ReportModel, options: RenderOptions) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let document = render_model(PdfSurface::new(), model, options)?;
    let t_layout = t0.elapsed();

    let pages = document.page_count();
    let bytes = document.into_bytes();
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, assembly={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages,
        bytes.len(),
    );

    Ok(bytes)
}

/// Structured mode, written to `<out_dir>/<output filename>`. Returns
/// the path of the emitted file.
pub fn render_report_to_file(
    model: &ReportModel,
    options: RenderOptions,
    out_dir: &Path,
) -> Result<PathBuf, Error> {
    let path = out_dir.join(options.output_filename());
    let bytes = render_report(model, options)?;
    std::fs::write(&path, &bytes).map_err(Error::Io)?;
    Ok(path)
}

/// Raster mode: capture a view region as one bitmap and paginate it,
/// slicing across page boundaries as needed. The capture scale is
/// clamped to [`MIN_CAPTURE_SCALE`]. Capture failure aborts the whole
/// generation; no partial file is produced.
pub fn render_view<R: Rasterizer>(
    rasterizer: &mut R,
    region: &str,
    scale: f32,
    options: RenderOptions,
) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let image = rasterizer.capture(region, scale.max(MIN_CAPTURE_SCALE))?;
    if image.is_empty() {
        return Err(Error::Raster(format!("empty capture for region '{region}'")));
    }
    let t_capture = t0.elapsed();

    let (mut composer, layout) = Composer::begin(PdfSurface::new(), options);
    composer.place_image(layout, &image, CONTENT_WIDTH);
    let document = composer.finalize();
    let pages = document.page_count();
    let bytes = document.into_bytes();
    let t_total = t0.elapsed();

    log::info!(
        "Timing: capture={:.1}ms, render={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_capture.as_secs_f64() * 1000.0,
        (t_total - t_capture).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages,
        bytes.len(),
    );

    Ok(bytes)
}
