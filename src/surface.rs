use crate::model::Rgb;
use crate::pdf::fonts;
use crate::raster::RasterImage;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// Drawing capability the layout engine renders against.
///
/// Coordinates are millimetres with the origin at the top-left of the
/// page; `y` for text is the baseline. Implementations own the page list
/// and the notion of a current page: drawing calls apply to the page
/// selected by the last `new_page`/`select_page`.
pub trait Surface {
    fn new_page(&mut self);

    /// Re-target drawing at an existing page (0-based). Used by the
    /// footer pass once the final page count is known.
    fn select_page(&mut self, index: usize);

    fn page_count(&self) -> usize;

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, line_width: f32);

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb, line_width: f32);

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, style: FontStyle, color: Rgb);

    fn draw_image(&mut self, image: &RasterImage, x: f32, y: f32, w: f32, h: f32);

    /// Width of `text` at `size` points, in millimetres.
    fn text_width(&self, text: &str, size: f32, _style: FontStyle) -> f32 {
        fonts::text_width_mm(text, size)
    }
}

/// One recorded drawing call, in surface coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        line_width: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        color: Rgb,
    },
    Image {
        image: RasterImage,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
}

/// Surface that records draw calls per page instead of producing output.
/// The test suites assert pagination behavior against it; callers can
/// also use it to inspect a layout without emitting a PDF.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pages: Vec<Vec<DrawCmd>>,
    current: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Vec<DrawCmd>] {
        &self.pages
    }
}

impl Surface for RecordingSurface {
    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.current = self.pages.len() - 1;
    }

    fn select_page(&mut self, index: usize) {
        debug_assert!(index < self.pages.len());
        self.current = index;
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.pages[self.current].push(DrawCmd::FillRect { x, y, w, h, color });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, line_width: f32) {
        self.pages[self.current].push(DrawCmd::StrokeRect {
            x,
            y,
            w,
            h,
            color,
            line_width,
        });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb, line_width: f32) {
        self.pages[self.current].push(DrawCmd::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            line_width,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, style: FontStyle, color: Rgb) {
        self.pages[self.current].push(DrawCmd::Text {
            text: text.to_string(),
            x,
            y,
            size,
            style,
            color,
        });
    }

    fn draw_image(&mut self, image: &RasterImage, x: f32, y: f32, w: f32, h: f32) {
        self.pages[self.current].push(DrawCmd::Image {
            image: image.clone(),
            x,
            y,
            w,
            h,
        });
    }
}
