//! Page layout engine: vertical cursor tracking, page-break decisions,
//! lossless image slicing, and the second-pass footer.
//!
//! All arithmetic is in millimetres on A4 portrait with a top-left
//! origin; the [`Surface`] implementation owns the conversion to its
//! native coordinates.

use crate::model::{Kpi, RenderOptions, Rgb, TableData};
use crate::raster::RasterImage;
use crate::surface::{FontStyle, Surface};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 20.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const HEADER_BAND: f32 = 40.0;
const HEADER_RULE_Y: f32 = 42.0;
const FOOTER_RESERVE: f32 = 20.0;

/// First writable cursor position below the header band.
pub const CONTENT_TOP: f32 = 55.0;
/// Last writable cursor position above the footer band.
pub const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - MARGIN - FOOTER_RESERVE;

pub(crate) const TABLE_ROW_HEIGHT: f32 = 8.0;
const KPI_COLUMNS: usize = 3;
pub(crate) const KPI_CARD_HEIGHT: f32 = 25.0;
const KPI_GAP_X: f32 = 10.0;
const KPI_GAP_Y: f32 = 5.0;
const CELL_MAX_CHARS: usize = 20;

const WHITE: Rgb = [0xff, 0xff, 0xff];
const RULE: Rgb = [0xe5, 0xe7, 0xeb];
const BORDER: Rgb = [0xde, 0xe2, 0xe6];
const PANEL_FILL: Rgb = [0xf8, 0xf9, 0xfa];
const INK: Rgb = [0x33, 0x33, 0x33];
const INK_MUTED: Rgb = [0x66, 0x66, 0x66];
const INK_FAINT: Rgb = [0x99, 0x99, 0x99];
const FOOTER_INK: Rgb = [0x6b, 0x72, 0x80];

/// Explicit layout position, threaded through every placement call and
/// returned updated. Valid only for the page it names: a page break
/// resets the cursor to [`CONTENT_TOP`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    /// Vertical write position in mm from the page top. Monotonically
    /// increasing while a page is being written.
    pub cursor: f32,
    /// 0-based index of the page being written.
    pub page_index: usize,
}

/// Slice heights for paginating a scaled image: first slice limited by
/// the space left on the current page, every later slice by a full
/// content region. The heights sum exactly to `scaled_height`.
pub fn slice_plan(scaled_height: f32, first_available: f32, page_available: f32) -> Vec<f32> {
    debug_assert!(page_available > 0.0);
    let mut plan = Vec::new();
    let mut remaining = scaled_height;
    let mut available = first_available;
    while remaining > 0.0 {
        let slice = remaining.min(available);
        plan.push(slice);
        remaining -= slice;
        available = page_available;
    }
    plan
}

/// Table cell display text: longer than 20 chars becomes 17 chars + `...`.
pub fn truncate_cell(text: &str) -> String {
    if text.chars().count() > CELL_MAX_CHARS {
        let head: String = text.chars().take(CELL_MAX_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Composes a document on a [`Surface`]: owns the page-break decisions
/// and the repeated header band. Created via [`Composer::begin`] (which
/// draws the page-1 header), consumed by [`Composer::finalize`] (which
/// draws the footers now that the page count is known).
pub struct Composer<S: Surface> {
    surface: S,
    options: RenderOptions,
}

impl<S: Surface> Composer<S> {
    /// Open the document: page 1 with its header band. The returned
    /// [`Layout`] sits just below the header.
    pub fn begin(mut surface: S, options: RenderOptions) -> (Self, Layout) {
        surface.new_page();
        draw_header(&mut surface, &options);
        (
            Self { surface, options },
            Layout {
                cursor: CONTENT_TOP,
                page_index: 0,
            },
        )
    }

    pub fn surface(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Guarantee the next draw of `height` mm fits on the current page,
    /// breaking to a fresh page (with repeated header) if it would not.
    pub fn ensure_space(&mut self, layout: Layout, height: f32) -> Layout {
        if layout.cursor + height > CONTENT_BOTTOM {
            self.break_page(layout)
        } else {
            layout
        }
    }

    fn break_page(&mut self, layout: Layout) -> Layout {
        log::debug!(
            "page break: page={} cursor={:.1}",
            layout.page_index + 1,
            layout.cursor
        );
        self.surface.new_page();
        draw_header(&mut self.surface, &self.options);
        Layout {
            cursor: CONTENT_TOP,
            page_index: layout.page_index + 1,
        }
    }

    /// Place an image at the left margin, scaled to `target_width`.
    /// When the scaled height exceeds the space left on the page, the
    /// image is cut into pixel-exact row slices across as many pages as
    /// needed. Slices partition the source rows: nothing is skipped or
    /// drawn twice.
    pub fn place_image(
        &mut self,
        mut layout: Layout,
        image: &RasterImage,
        target_width: f32,
    ) -> Layout {
        if image.is_empty() {
            log::warn!("skipping empty image");
            return layout;
        }
        let scaled_height = image.height() as f32 * target_width / image.width() as f32;

        let mut first_available = CONTENT_BOTTOM - layout.cursor;
        if first_available < 1.0 {
            layout = self.break_page(layout);
            first_available = CONTENT_BOTTOM - layout.cursor;
        }

        let plan = slice_plan(scaled_height, first_available, CONTENT_BOTTOM - CONTENT_TOP);
        if plan.len() == 1 {
            self.surface
                .draw_image(image, MARGIN, layout.cursor, target_width, scaled_height);
            layout.cursor += scaled_height;
            return layout;
        }

        let mut src_row = 0u32;
        let mut consumed = 0.0f32;
        for (i, &slice_height) in plan.iter().enumerate() {
            if i > 0 {
                layout = self.break_page(layout);
            }
            consumed += slice_height;
            // Row boundaries come from the cumulative height, so per-slice
            // rounding can neither exhaust the source early nor overrun it.
            let src_end = if i + 1 == plan.len() {
                image.height()
            } else {
                ((consumed / scaled_height * image.height() as f32).round() as u32)
                    .min(image.height())
            };
            if src_end > src_row {
                let slice = image.crop_rows(src_row, src_end - src_row);
                self.surface
                    .draw_image(&slice, MARGIN, layout.cursor, target_width, slice_height);
            }
            src_row = src_end;
            layout.cursor += slice_height;
        }
        layout
    }

    /// Place a table: header row, then data rows with a break check
    /// before each. On every mid-table page break the header row is
    /// drawn again before data rows resume.
    pub fn place_table(&mut self, mut layout: Layout, table: &TableData) -> Layout {
        let ncols = table.headers.len();
        if ncols == 0 {
            return layout;
        }
        let col_width = CONTENT_WIDTH / ncols as f32;

        // Never leave the header row alone at the bottom of a page.
        layout = self.ensure_space(layout, TABLE_ROW_HEIGHT * 2.0);
        layout = self.draw_table_header(layout, &table.headers, col_width);

        for row in &table.rows {
            let page_before = layout.page_index;
            layout = self.ensure_space(layout, TABLE_ROW_HEIGHT);
            if layout.page_index != page_before {
                layout = self.draw_table_header(layout, &table.headers, col_width);
            }

            for (i, cell) in row.iter().enumerate().take(ncols) {
                let x = MARGIN + i as f32 * col_width;
                self.surface
                    .stroke_rect(x, layout.cursor, col_width, TABLE_ROW_HEIGHT, BORDER, 0.1);
                self.surface.draw_text(
                    &truncate_cell(cell),
                    x + 2.0,
                    layout.cursor + 5.5,
                    8.0,
                    FontStyle::Regular,
                    INK,
                );
            }
            layout.cursor += TABLE_ROW_HEIGHT;
        }
        layout
    }

    fn draw_table_header(&mut self, mut layout: Layout, headers: &[String], col_width: f32) -> Layout {
        self.surface.fill_rect(
            MARGIN,
            layout.cursor,
            CONTENT_WIDTH,
            TABLE_ROW_HEIGHT,
            PANEL_FILL,
        );
        for (i, header) in headers.iter().enumerate() {
            let x = MARGIN + i as f32 * col_width;
            self.surface
                .stroke_rect(x, layout.cursor, col_width, TABLE_ROW_HEIGHT, BORDER, 0.1);
            self.surface.draw_text(
                header,
                x + 2.0,
                layout.cursor + 5.5,
                9.0,
                FontStyle::Bold,
                INK,
            );
        }
        layout.cursor += TABLE_ROW_HEIGHT;
        layout
    }

    /// Lay KPI cards out in a fixed 3-column grid of fixed-height cards,
    /// checking space once per grid row.
    pub fn place_kpi_grid(&mut self, mut layout: Layout, kpis: &[Kpi]) -> Layout {
        let card_width = (CONTENT_WIDTH - KPI_GAP_X * (KPI_COLUMNS - 1) as f32) / KPI_COLUMNS as f32;

        for row in kpis.chunks(KPI_COLUMNS) {
            layout = self.ensure_space(layout, KPI_CARD_HEIGHT);
            for (i, kpi) in row.iter().enumerate() {
                let x = MARGIN + i as f32 * (card_width + KPI_GAP_X);
                let y = layout.cursor;
                self.surface
                    .fill_rect(x, y, card_width, KPI_CARD_HEIGHT, PANEL_FILL);
                self.surface
                    .stroke_rect(x, y, card_width, KPI_CARD_HEIGHT, BORDER, 0.1);
                self.surface
                    .draw_text(&kpi.title, x + 2.0, y + 5.0, 9.0, FontStyle::Bold, INK_MUTED);
                self.surface
                    .draw_text(&kpi.value, x + 2.0, y + 13.0, 14.0, FontStyle::Bold, INK);
                if let Some(subtitle) = &kpi.subtitle {
                    self.surface.draw_text(
                        subtitle,
                        x + 2.0,
                        y + 20.0,
                        8.0,
                        FontStyle::Regular,
                        INK_FAINT,
                    );
                }
            }
            layout.cursor += KPI_CARD_HEIGHT + KPI_GAP_Y;
        }
        layout
    }

    /// Close the document. Runs the footer pass over every page now that
    /// the final count is known; afterwards the document is immutable.
    pub fn finalize(mut self) -> FinishedDocument<S> {
        let total = self.surface.page_count();
        if self.options.include_timestamp {
            let stamp = chrono::Local::now().format("%d-%m-%Y %H:%M:%S");
            let generated = format!("Generado: {stamp}");
            for i in 0..total {
                self.surface.select_page(i);
                self.surface.draw_line(
                    MARGIN,
                    PAGE_HEIGHT - FOOTER_RESERVE,
                    PAGE_WIDTH - MARGIN,
                    PAGE_HEIGHT - FOOTER_RESERVE,
                    RULE,
                    0.5,
                );
                self.surface.draw_text(
                    &generated,
                    MARGIN,
                    PAGE_HEIGHT - 10.0,
                    8.0,
                    FontStyle::Regular,
                    FOOTER_INK,
                );
                let page_text = format!("Página {} de {}", i + 1, total);
                let width = self
                    .surface
                    .text_width(&page_text, 8.0, FontStyle::Regular);
                self.surface.draw_text(
                    &page_text,
                    PAGE_WIDTH - MARGIN - width,
                    PAGE_HEIGHT - 10.0,
                    8.0,
                    FontStyle::Regular,
                    FOOTER_INK,
                );
            }
        }
        FinishedDocument {
            surface: self.surface,
            pages: total,
        }
    }
}

fn draw_header<S: Surface>(surface: &mut S, options: &RenderOptions) {
    surface.fill_rect(0.0, 0.0, PAGE_WIDTH, HEADER_BAND, options.header_color);
    surface.draw_text(&options.title, MARGIN, 25.0, 18.0, FontStyle::Bold, WHITE);
    if let Some(subtitle) = &options.subtitle {
        surface.draw_text(subtitle, MARGIN, 35.0, 12.0, FontStyle::Regular, WHITE);
    }
    surface.draw_line(
        MARGIN,
        HEADER_RULE_Y,
        PAGE_WIDTH - MARGIN,
        HEADER_RULE_Y,
        RULE,
        0.5,
    );
}

/// A finalized, immutable document ready to emit.
pub struct FinishedDocument<S> {
    surface: S,
    pages: usize,
}

impl<S> FinishedDocument<S> {
    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

impl FinishedDocument<crate::pdf::PdfSurface> {
    pub fn into_bytes(self) -> Vec<u8> {
        self.surface.finish()
    }

    pub fn save(self, path: &std::path::Path) -> Result<(), crate::error::Error> {
        std::fs::write(path, self.into_bytes()).map_err(crate::error::Error::Io)
    }
}
