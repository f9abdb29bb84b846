//! Reference builder: visits every grid coordinate one at a time.

use ndarray::ArrayD;

use crate::{
    distance::{distance, inside},
    error::Result,
    grid::GridSpec,
    types::{NaiveMask, Value},
};

/// Builds a sphere mask by walking every coordinate of the grid.
///
/// ```text
/// for idx in [0, size)^n_dims:
///     mask[idx] = 1  if radius - |center - idx| >= 0
/// ```
///
/// Costs `O(size^n_dims × n_dims)`. Kept as the correctness reference for
/// [`vectorized::sphere`](crate::vectorized::sphere).
///
/// Returns [`SphereMaskError::InvalidRadius`](crate::error::SphereMaskError::InvalidRadius)
/// if `radius > size`, before allocating anything.
pub fn sphere(radius: Value, size: usize, n_dims: usize) -> Result<NaiveMask> {
    let spec = GridSpec::new(radius, size, n_dims)?;
    Ok(sphere_from_spec(&spec))
}

/// Like [`sphere`], for an already validated [`GridSpec`].
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(radius = spec.radius(), size = spec.size(), n_dims = spec.n_dims())
)]
pub fn sphere_from_spec(spec: &GridSpec) -> NaiveMask {
    let mut mask = ArrayD::<f64>::zeros(spec.shape());
    let center = spec.center();
    let radius = spec.radius();

    let mut filled = 0_usize;
    spec.for_each_index(|idx| {
        if inside(radius, distance(idx, center)) {
            mask[idx] = 1.0;
            filled += 1;
        }
    });

    tracing::debug!(filled, total = spec.len(), "naive mask built");
    mask
}
