//! Bulk builder: computes the whole distance field with array arithmetic.

use crate::{
    distance::inside,
    error::Result,
    grid::GridSpec,
    interp::linspace,
    mesh::{Indexing, MeshGrid},
    types::{Mask, Value},
};

/// Builds a sphere mask from a broadcast coordinate mesh.
///
/// ```text
/// 1. linspace(0, size-1, size)            →  per-axis coordinates
/// 2. MeshGrid (n_dims copies, Xy)         →  n_dims full-size arrays
/// 3. sqrt(Σ (mesh - center)²)             →  distance field
/// 4. radius - distance >= 0               →  f32 mask
/// ```
///
/// Materializes `n_dims` full meshes, so memory is `O(n_dims × size^n_dims)`
/// in exchange for avoiding the per-coordinate loop of
/// [`naive::sphere`](crate::naive::sphere). The result is elementwise equal to it.
///
/// Returns [`SphereMaskError::InvalidRadius`](crate::error::SphereMaskError::InvalidRadius)
/// if `radius > size`.
pub fn sphere(radius: Value, size: usize, n_dims: usize) -> Result<Mask> {
    sphere_with_indexing(radius, size, n_dims, Indexing::Xy)
}

/// Like [`sphere`] with an explicit mesh [`Indexing`].
///
/// The sphere is symmetric under axis permutation, so both orderings give the
/// same mask.
pub fn sphere_with_indexing(
    radius: Value,
    size: usize,
    n_dims: usize,
    indexing: Indexing,
) -> Result<Mask> {
    let spec = GridSpec::new(radius, size, n_dims)?;
    sphere_from_spec(&spec, indexing)
}

#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(radius = spec.radius(), size = spec.size(), n_dims = spec.n_dims())
)]
pub fn sphere_from_spec(spec: &GridSpec, indexing: Indexing) -> Result<Mask> {
    let size = spec.size();
    let axis = linspace(0.0, (size - 1) as Value, size);
    let axes = vec![axis; spec.n_dims()];
    let mesh = MeshGrid::new(&axes, indexing)?;

    let center = spec.center() as Value;
    let radius = spec.radius();

    let distance_field = mesh.fold_sum(|m| (m - center).powi(2)).mapv_into(Value::sqrt);
    let mask = distance_field.mapv(|d| if inside(radius, d) { 1.0_f32 } else { 0.0 });

    tracing::debug!(shape = ?mask.shape(), "vectorized mask built");
    Ok(mask)
}
