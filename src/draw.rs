//! Structured rendering path: walks a [`ReportModel`] section by section
//! and turns it into layout-engine placements. Each section's height is
//! known before it is drawn; all page-break decisions stay with the
//! [`Composer`].

use std::collections::BTreeMap;

use crate::error::Error;
use crate::layout::{
    CONTENT_BOTTOM, CONTENT_TOP, CONTENT_WIDTH, Composer, FinishedDocument, KPI_CARD_HEIGHT,
    Layout, MARGIN, TABLE_ROW_HEIGHT,
};
use crate::model::{Chart, Kpi, RenderOptions, ReportModel, Rgb, TableData};
use crate::surface::{FontStyle, Surface};

const INK: Rgb = [0x33, 0x33, 0x33];

const HEADING_ADVANCE: f32 = 8.0;
const TITLE_ADVANCE: f32 = 10.0;
const FILTER_LINE: f32 = 5.0;
const SECTION_GAP: f32 = 10.0;

/// Render a report model in section order filters → KPIs → charts →
/// table. An entirely empty model aborts before anything is drawn.
pub fn render_model<S: Surface>(
    surface: S,
    model: &ReportModel,
    options: RenderOptions,
) -> Result<FinishedDocument<S>, Error> {
    if model.is_empty() {
        return Err(Error::EmptyReport);
    }

    let (mut composer, mut layout) = Composer::begin(surface, options);

    if !model.filters.is_empty() {
        layout = filters_section(&mut composer, layout, &model.filters);
    }
    if !model.kpis.is_empty() {
        layout = kpi_section(&mut composer, layout, &model.kpis);
    }
    for chart in &model.charts {
        layout = chart_section(&mut composer, layout, chart);
    }
    if let Some(table) = &model.table {
        table_section(&mut composer, layout, table);
    }

    Ok(composer.finalize())
}

fn filters_section<S: Surface>(
    composer: &mut Composer<S>,
    layout: Layout,
    filters: &BTreeMap<String, String>,
) -> Layout {
    let height = HEADING_ADVANCE + FILTER_LINE * filters.len() as f32 + SECTION_GAP;
    let mut layout = composer.ensure_space(layout, height);

    let surface = composer.surface();
    surface.draw_text(
        "Filtros Aplicados:",
        MARGIN,
        layout.cursor + 4.5,
        12.0,
        FontStyle::Bold,
        INK,
    );
    let mut y = layout.cursor + HEADING_ADVANCE;
    for (name, value) in filters {
        surface.draw_text(
            &format!("• {name}: {value}"),
            MARGIN + 5.0,
            y + 3.5,
            10.0,
            FontStyle::Regular,
            INK,
        );
        y += FILTER_LINE;
    }
    layout.cursor += height;
    layout
}

fn kpi_section<S: Surface>(composer: &mut Composer<S>, layout: Layout, kpis: &[Kpi]) -> Layout {
    // Keep the heading attached to at least the first card row.
    let mut layout = composer.ensure_space(layout, HEADING_ADVANCE + KPI_CARD_HEIGHT);
    composer.surface().draw_text(
        "Resumen:",
        MARGIN,
        layout.cursor + 4.5,
        12.0,
        FontStyle::Bold,
        INK,
    );
    layout.cursor += HEADING_ADVANCE;
    layout = composer.place_kpi_grid(layout, kpis);
    // The grid already advanced past its last row gap.
    layout.cursor += 5.0;
    layout
}

fn chart_section<S: Surface>(composer: &mut Composer<S>, layout: Layout, chart: &Chart) -> Layout {
    if chart.image.is_empty() {
        // Section-level tolerance: a bad chart is dropped, not fatal.
        log::warn!("chart '{}' has no bitmap, skipping", chart.title);
        return layout;
    }
    let scaled_height =
        chart.image.height() as f32 * CONTENT_WIDTH / chart.image.width() as f32;
    // A chart taller than one content region gets sliced by the composer;
    // reserve only the title plus what a single region can hold.
    let reserve =
        TITLE_ADVANCE + scaled_height.min(CONTENT_BOTTOM - CONTENT_TOP - TITLE_ADVANCE);
    let mut layout = composer.ensure_space(layout, reserve);
    composer.surface().draw_text(
        &chart.title,
        MARGIN,
        layout.cursor + 4.0,
        11.0,
        FontStyle::Bold,
        INK,
    );
    layout.cursor += TITLE_ADVANCE;
    layout = composer.place_image(layout, &chart.image, CONTENT_WIDTH);
    layout.cursor += SECTION_GAP;
    layout
}

fn table_section<S: Surface>(
    composer: &mut Composer<S>,
    layout: Layout,
    table: &TableData,
) -> Layout {
    // Heading plus header row plus one data row must fit together.
    let mut layout = composer.ensure_space(layout, TITLE_ADVANCE + TABLE_ROW_HEIGHT * 2.0);
    composer.surface().draw_text(
        "Datos Detallados:",
        MARGIN,
        layout.cursor + 4.5,
        12.0,
        FontStyle::Bold,
        INK,
    );
    layout.cursor += TITLE_ADVANCE;
    composer.place_table(layout, table)
}
