use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::raster::RasterImage;

/// RGB color as used throughout the drawing surface.
pub type Rgb = [u8; 3];

pub const DEFAULT_HEADER_COLOR: Rgb = [0x25, 0x63, 0xeb];

/// One titled summary metric, rendered as a fixed-size card.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub title: String,
    pub value: String,
    #[serde(default)]
    pub subtitle: Option<String>,
}

/// A chart already rendered to a bitmap, placed at full content width.
#[derive(Clone, Debug)]
pub struct Chart {
    pub title: String,
    pub image: RasterImage,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Normalized, renderer-agnostic representation of a report.
/// Every section is optional, but at least one must be present for the
/// report to be renderable.
#[derive(Clone, Debug, Default)]
pub struct ReportModel {
    pub filters: BTreeMap<String, String>,
    pub kpis: Vec<Kpi>,
    pub charts: Vec<Chart>,
    pub table: Option<TableData>,
}

impl ReportModel {
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
            && self.kpis.is_empty()
            && self.charts.is_empty()
            && self.table.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub title: String,
    pub subtitle: Option<String>,
    /// Output filename override. When `None`, [`RenderOptions::output_filename`]
    /// derives one from the title and the current date.
    pub filename: Option<String>,
    pub header_color: Rgb,
    /// Gates the whole footer pass: generation timestamp plus page numbers.
    pub include_timestamp: bool,
}

impl RenderOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            filename: None,
            header_color: DEFAULT_HEADER_COLOR,
            include_timestamp: true,
        }
    }

    /// `<title with whitespace runs replaced by _>_<YYYY-MM-DD>.pdf`,
    /// unless an explicit filename was supplied.
    pub fn output_filename(&self) -> String {
        match &self.filename {
            Some(name) => name.clone(),
            None => {
                let slug: String = self.title.split_whitespace().collect::<Vec<_>>().join("_");
                let date = chrono::Local::now().format("%Y-%m-%d");
                format!("{slug}_{date}.pdf")
            }
        }
    }
}
