use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Drawing error: {0}")]
    Draw(String),

    #[error("No usable font: {0}")]
    Font(String),

    #[error("Correlation matrix is empty")]
    EmptyMatrix,

    #[error("Matrix is not square: {rows} rows, {cols} columns")]
    NonSquare { rows: usize, cols: usize },

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedTable {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{column}' already exists")]
    DuplicateColumn { column: String },

    #[error("Invalid resolution: {dpi} dpi x {width_in}x{height_in} in does not give whole pixels")]
    InvalidResolution {
        dpi: f64,
        width_in: f64,
        height_in: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChartError {
    /// Wrap a plotting backend failure. The backend error types are generic
    /// over the drawing target, so only the message is kept.
    pub fn draw<E: std::fmt::Display>(err: E) -> Self {
        Self::Draw(err.to_string())
    }
}

pub type ChartResult<T> = Result<T, ChartError>;
