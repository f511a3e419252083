//! Report data extraction: maps a captured view tree to a
//! [`ReportModel`]. The recognition heuristics live here, away from the
//! layout engine, so they can be tested (and replaced) on their own.
//! Callers that already hold structured data should build a
//! [`ReportModel`] directly and skip this layer.

use crate::model::{Chart, Kpi, ReportModel, TableData};
use crate::raster::RasterImage;

/// A node of the scanned view, already flattened by the capture side.
#[derive(Clone, Debug)]
pub enum ViewNode {
    /// A card-like region with a heading and optional value/note text.
    Card {
        heading: String,
        value: Option<String>,
        note: Option<String>,
    },
    /// A canvas-like region with its rendered bitmap.
    Canvas { title: String, image: RasterImage },
    /// A tabular region.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// A filter form, as resolved label/value pairs.
    FilterForm { fields: Vec<(String, String)> },
}

/// Textual markers that identify a card as a KPI. A card whose heading
/// contains none of the patterns is not guessed at; it is omitted.
#[derive(Clone, Debug)]
pub struct KpiPatterns {
    patterns: Vec<String>,
}

impl KpiPatterns {
    pub fn new<I, T>(patterns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, heading: &str) -> bool {
        self.patterns.iter().any(|p| heading.contains(p.as_str()))
    }
}

impl Default for KpiPatterns {
    fn default() -> Self {
        Self::new(["Total", "Recaudación", "Valor", "Usuarios"])
    }
}

/// Scan a view tree into a report model. Read-only: nothing in the view
/// is consumed or altered. Sections that cannot be confidently
/// identified are left out; an empty result is valid and the caller
/// decides whether that is fatal.
pub fn extract_model(nodes: &[ViewNode], patterns: &KpiPatterns) -> ReportModel {
    let mut model = ReportModel::default();

    for node in nodes {
        match node {
            ViewNode::FilterForm { fields } => {
                for (name, value) in fields {
                    model.filters.insert(name.clone(), value.clone());
                }
            }
            ViewNode::Card {
                heading,
                value,
                note,
            } => {
                if !patterns.matches(heading) {
                    continue;
                }
                let Some(value) = value else {
                    continue; // a heading alone is not a KPI
                };
                model.kpis.push(Kpi {
                    title: heading.clone(),
                    value: value.clone(),
                    subtitle: note.clone(),
                });
            }
            ViewNode::Canvas { title, image } => {
                if image.is_empty() {
                    log::warn!("canvas '{title}' captured empty, skipping chart");
                    continue;
                }
                model.charts.push(Chart {
                    title: title.clone(),
                    image: image.clone(),
                });
            }
            ViewNode::Table { headers, rows } => {
                if headers.is_empty() || model.table.is_some() {
                    continue; // only the first identifiable table is kept
                }
                model.table = Some(TableData {
                    headers: headers.clone(),
                    rows: rows.clone(),
                });
            }
        }
    }

    model
}
