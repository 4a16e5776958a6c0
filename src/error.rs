use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("vertex {vertex} out of range: graph has {vertices} vertices")]
    VertexOutOfRange { vertex: i64, vertices: usize },
    #[error("intensity buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image decoding failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image has no pixels")]
    Empty,
    #[error("Pixel buffer size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
