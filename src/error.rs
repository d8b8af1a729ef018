use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid color {0:?}: expected 6 hex digits with an optional leading '#'")]
    InvalidColor(String),

    #[error("palette must contain at least one color")]
    EmptyPalette,

    #[error("pattern grid must have at least one row and one column")]
    EmptyGrid,

    #[error("row {row} has {len} cells, expected {width}")]
    RaggedRow { row: usize, len: usize, width: usize },

    #[error("grid dimensions cannot be zero, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    #[error("grid of {width}x{height} cells is too large")]
    DimensionOverflow { width: usize, height: usize },

    #[error("sample buffer holds {len} pixels, expected {width}x{height}")]
    SampleCountMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("cell ({row}, {col}) is outside a {width}x{height} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("cell size must be at least 1 pixel")]
    InvalidCellSize,

    #[error("a {width}x{height} grid at {cell_size}px per cell is too large to render")]
    RenderTooLarge {
        width: usize,
        height: usize,
        cell_size: u32,
    },

    #[error("invalid crop window: {0}")]
    InvalidCropWindow(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PatternError>;
