use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// The report model has no renderable section at all.
    EmptyReport,
    /// The requested view region does not exist on the capture side.
    ViewNotFound(String),
    /// Bitmap capture failed or produced an unusable bitmap.
    Raster(String),
    /// Image data could not be decoded or constructed.
    Image(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyReport => write!(f, "report has no renderable content"),
            Error::ViewNotFound(region) => write!(f, "view region not found: {region}"),
            Error::Raster(msg) => write!(f, "rasterization failed: {msg}"),
            Error::Image(msg) => write!(f, "invalid image data: {msg}"),
            Error::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
