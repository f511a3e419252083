#![allow(dead_code)]

use reporte_pdf::{DrawCmd, FontStyle, Kpi, RasterImage, RenderOptions, ReportModel, TableData};

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn options(title: &str) -> RenderOptions {
    RenderOptions::new(title)
}

pub fn sample_table(rows: usize) -> TableData {
    TableData {
        headers: vec!["PPU".to_string(), "Fecha".to_string()],
        rows: (0..rows)
            .map(|i| vec![format!("AB{i:04}"), "2025-01-01".to_string()])
            .collect(),
    }
}

pub fn sample_kpis(count: usize) -> Vec<Kpi> {
    (0..count)
        .map(|i| Kpi {
            title: format!("Total {i}"),
            value: format!("{}", 100 + i),
            subtitle: None,
        })
        .collect()
}

pub fn table_only_model(rows: usize) -> ReportModel {
    ReportModel {
        table: Some(sample_table(rows)),
        ..Default::default()
    }
}

/// Bitmap whose every row is tagged with its row index in the red/green
/// channels, so emitted slices can be traced back to source rows.
pub fn row_tagged_image(width: u32, height: u32) -> RasterImage {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for row in 0..height {
        for _ in 0..width {
            pixels.extend_from_slice(&[(row & 0xff) as u8, (row >> 8) as u8, 0x00, 0xff]);
        }
    }
    RasterImage::from_rgba(width, height, pixels).expect("buffer sized to dimensions")
}

pub fn page_texts(page: &[DrawCmd]) -> Vec<&str> {
    page.iter()
        .filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

pub fn bold_texts(page: &[DrawCmd]) -> Vec<&str> {
    page.iter()
        .filter_map(|cmd| match cmd {
            DrawCmd::Text {
                text,
                style: FontStyle::Bold,
                ..
            } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

pub fn page_images(page: &[DrawCmd]) -> Vec<(&RasterImage, f32, f32)> {
    page.iter()
        .filter_map(|cmd| match cmd {
            DrawCmd::Image { image, h, y, .. } => Some((image, *h, *y)),
            _ => None,
        })
        .collect()
}
