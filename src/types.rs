use ndarray::ArrayD;

/// Scalar used for coordinates, distances and radii.
pub type Value = f64;

/// Integer grid coordinate along one axis.
pub type Coord = usize;

/// Mask produced by the vectorized builder; entries are `0.0` or `1.0`.
pub type Mask = ArrayD<f32>;

/// Mask produced by the naive builder, stored at full `f64` width.
pub type NaiveMask = ArrayD<f64>;
