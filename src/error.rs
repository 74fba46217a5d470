// src/error.rs

use std::fmt;

/// Everything that can go wrong between reading the correlation table and
/// writing the rendered network.
#[derive(Debug)]
pub enum NetworkError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    Image(image::ImageError),
    Svg(resvg::usvg::Error),
    /// The input table lacks a required column.
    MissingColumn(String),
    /// A correlation cell could not be read as a number.
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    InvalidConfig(String),
}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        NetworkError::Io(e)
    }
}
impl From<csv::Error> for NetworkError {
    fn from(e: csv::Error) -> Self {
        NetworkError::Csv(e)
    }
}
impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        NetworkError::Json(e)
    }
}
impl From<image::ImageError> for NetworkError {
    fn from(e: image::ImageError) -> Self {
        NetworkError::Image(e)
    }
}

impl From<resvg::usvg::Error> for NetworkError {
    fn from(e: resvg::usvg::Error) -> Self {
        NetworkError::Svg(e)
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Io(e) => write!(f, "I/O error: {}", e),
            NetworkError::Csv(e) => write!(f, "CSV error: {}", e),
            NetworkError::Json(e) => write!(f, "JSON error: {}", e),
            NetworkError::Image(e) => write!(f, "image error: {}", e),
            NetworkError::Svg(e) => write!(f, "SVG rasterization error: {}", e),
            NetworkError::MissingColumn(name) => {
                write!(f, "input table has no column named '{}'", name)
            }
            NetworkError::InvalidValue { row, column, value } => write!(
                f,
                "row {}: column '{}' holds '{}', which is not a number",
                row, column, value
            ),
            NetworkError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Io(e) => Some(e),
            NetworkError::Csv(e) => Some(e),
            NetworkError::Json(e) => Some(e),
            NetworkError::Image(e) => Some(e),
            NetworkError::Svg(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
