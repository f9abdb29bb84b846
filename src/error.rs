use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, SphereMaskError>;

#[derive(Debug, Display, From)]
pub enum SphereMaskError {
    /// Radius is negative, NaN, or larger than the grid side.
    #[display("radius cannot be > array size (radius {radius}, size {size})")]
    #[from(ignore)]
    InvalidRadius { radius: f64, size: usize },

    #[display("invalid shape: {_0}")]
    #[from(ignore)]
    InvalidShape(String),

    /// Naive and vectorized masks disagree beyond the relative tolerance.
    #[display(
        "masks differ: {mismatched}/{total} elements outside tolerance, first at {first_index:?}"
    )]
    #[from(ignore)]
    EquivalenceMismatch {
        mismatched: usize,
        total: usize,
        first_index: Vec<usize>,
    },

    #[display("cannot save {_0}d data")]
    #[from(ignore)]
    UnsupportedDimensionality(usize),

    #[display("{_0}")]
    Io(std::io::Error),

    #[display("{_0}")]
    Image(image::ImageError),
}

impl std::error::Error for SphereMaskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SphereMaskError::Io(e) => Some(e),
            SphereMaskError::Image(e) => Some(e),
            _ => None,
        }
    }
}
