use crate::error::Error;

/// Capture scale below which text in captured bitmaps becomes illegible
/// in print. [`crate::render_view`] clamps to this floor.
pub const MIN_CAPTURE_SCALE: f32 = 1.5;

/// An RGBA8 bitmap. The layout engine treats this purely as a
/// `{width, height, pixels}` value and has no knowledge of how it was
/// produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, Error> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(Error::Image(format!(
                "pixel buffer is {} bytes, expected {expected} for {width}x{height} RGBA",
                pixels.len(),
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_png(bytes: &[u8]) -> Result<Self, Error> {
        let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| Error::Image(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel-exact horizontal slice: rows `start..start + rows`, clamped
    /// to the image bounds. Used by the pagination slicing loop.
    pub fn crop_rows(&self, start: u32, rows: u32) -> RasterImage {
        let start = start.min(self.height);
        let end = start.saturating_add(rows).min(self.height);
        let stride = self.width as usize * 4;
        let pixels = self.pixels[start as usize * stride..end as usize * stride].to_vec();
        RasterImage {
            width: self.width,
            height: end - start,
            pixels,
        }
    }

    pub(crate) fn has_alpha(&self) -> bool {
        self.pixels.chunks_exact(4).any(|p| p[3] < 255)
    }

    pub(crate) fn rgb_bytes(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect()
    }

    pub(crate) fn alpha_bytes(&self) -> Vec<u8> {
        self.pixels.chunks_exact(4).map(|p| p[3]).collect()
    }
}

/// External capture capability: renders a visual region into a bitmap at
/// the given scale. Implementations are expected to be cross-origin-safe
/// and to report a missing region as [`Error::ViewNotFound`].
pub trait Rasterizer {
    fn capture(&mut self, region: &str, scale: f32) -> Result<RasterImage, Error>;
}
