pub(crate) mod fonts;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::layout::{PAGE_HEIGHT, PAGE_WIDTH};
use crate::model::Rgb;
use crate::raster::RasterImage;
use crate::surface::{FontStyle, Surface};

use fonts::to_winansi_bytes;

pub(crate) const MM_TO_PT: f32 = 72.0 / 25.4;
pub(crate) const MM_PER_PT: f32 = 25.4 / 72.0;

fn pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// Flip from top-left mm coordinates to the PDF's bottom-left point origin.
fn pt_y(y_mm: f32) -> f32 {
    (PAGE_HEIGHT - y_mm) * MM_TO_PT
}

fn rgb_components(color: Rgb) -> (f32, f32, f32) {
    (
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
    )
}

/// PDF-backed drawing surface.
///
/// Pages accumulate as independent `Content` streams so the footer pass
/// can re-open any page; `finish` assembles the document: compressed
/// streams, page tree, and per-page resources with the two base-14
/// Helvetica fonts plus every image XObject.
pub struct PdfSurface {
    pdf: Pdf,
    contents: Vec<Content>,
    current: usize,
    images: Vec<(String, Ref)>,
    next_id: i32,
}

impl PdfSurface {
    pub fn new() -> Self {
        Self {
            pdf: Pdf::new(),
            contents: Vec::new(),
            current: 0,
            images: Vec::new(),
            next_id: 1,
        }
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    /// Embed an RGBA bitmap as a FlateDecode image XObject, with an SMask
    /// carrying the alpha channel when one is present.
    fn embed_image(&mut self, image: &RasterImage) -> String {
        let xobj_ref = self.alloc();
        let smask_ref = if image.has_alpha() {
            Some(self.alloc())
        } else {
            None
        };
        let pdf_name = format!("Im{}", self.images.len() + 1);

        let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&image.rgb_bytes(), 6);
        {
            let mut xobj = self.pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(image.width() as i32);
            xobj.height(image.height() as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }

        if let Some(mask_ref) = smask_ref {
            let compressed_alpha =
                miniz_oxide::deflate::compress_to_vec_zlib(&image.alpha_bytes(), 6);
            let mut mask = self.pdf.image_xobject(mask_ref, &compressed_alpha);
            mask.filter(Filter::FlateDecode);
            mask.width(image.width() as i32);
            mask.height(image.height() as i32);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
        }

        self.images.push((pdf_name.clone(), xobj_ref));
        pdf_name
    }

    /// Assemble the final PDF bytes.
    pub fn finish(self) -> Vec<u8> {
        let mut pdf = self.pdf;
        let mut next_id = self.next_id;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let regular_id = alloc();
        let bold_id = alloc();

        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let n = self.contents.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (i, c) in self.contents.into_iter().enumerate() {
            let raw = c.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            pdf.stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, pt(PAGE_WIDTH), pt(PAGE_HEIGHT)))
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            {
                let mut font_dict = resources.fonts();
                font_dict.pair(Name(b"F1"), regular_id);
                font_dict.pair(Name(b"F2"), bold_id);
            }
            if !self.images.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, xobj_ref) in &self.images {
                    xobjects.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
        }

        pdf.finish()
    }
}

impl Default for PdfSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for PdfSurface {
    fn new_page(&mut self) {
        self.contents.push(Content::new());
        self.current = self.contents.len() - 1;
    }

    fn select_page(&mut self, index: usize) {
        debug_assert!(index < self.contents.len());
        self.current = index;
    }

    fn page_count(&self) -> usize {
        self.contents.len()
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let (r, g, b) = rgb_components(color);
        let c = &mut self.contents[self.current];
        c.save_state();
        c.set_fill_rgb(r, g, b);
        c.rect(pt(x), pt_y(y + h), pt(w), pt(h));
        c.fill_nonzero();
        c.restore_state();
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, line_width: f32) {
        let (r, g, b) = rgb_components(color);
        let c = &mut self.contents[self.current];
        c.save_state();
        c.set_stroke_rgb(r, g, b);
        c.set_line_width(pt(line_width));
        c.rect(pt(x), pt_y(y + h), pt(w), pt(h));
        c.stroke();
        c.restore_state();
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb, line_width: f32) {
        let (r, g, b) = rgb_components(color);
        let c = &mut self.contents[self.current];
        c.save_state();
        c.set_stroke_rgb(r, g, b);
        c.set_line_width(pt(line_width));
        c.move_to(pt(x1), pt_y(y1));
        c.line_to(pt(x2), pt_y(y2));
        c.stroke();
        c.restore_state();
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, style: FontStyle, color: Rgb) {
        let font: &[u8] = match style {
            FontStyle::Regular => b"F1",
            FontStyle::Bold => b"F2",
        };
        let bytes = to_winansi_bytes(text);
        let (r, g, b) = rgb_components(color);
        let c = &mut self.contents[self.current];
        c.save_state();
        c.set_fill_rgb(r, g, b);
        c.begin_text();
        c.set_font(Name(font), size);
        c.next_line(pt(x), pt_y(y));
        c.show(Str(&bytes));
        c.end_text();
        c.restore_state();
    }

    fn draw_image(&mut self, image: &RasterImage, x: f32, y: f32, w: f32, h: f32) {
        if image.is_empty() {
            return;
        }
        let pdf_name = self.embed_image(image);
        let c = &mut self.contents[self.current];
        c.save_state();
        c.transform([pt(w), 0.0, 0.0, pt(h), pt(x), pt_y(y + h)]);
        c.x_object(Name(pdf_name.as_bytes()));
        c.restore_state();
    }
}
