use ndarray::{Array1, ArrayD, IxDyn};

use crate::{
    error::{Result, SphereMaskError},
    types::Value,
};

/// Axis ordering of a [`MeshGrid`].
///
/// `Xy` is the Cartesian convention: the first two output axes are swapped
/// relative to the input sequences, so for 2-D input `(xs, ys)` every mesh has
/// shape `(ys.len(), xs.len())`. `Ij` is matrix indexing: mesh `k` varies
/// along output axis `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indexing {
    #[default]
    Xy,
    Ij,
}

/// Full N-dimensional expansion of per-axis coordinate sequences.
///
/// Holds one array per input sequence, each materialized to the full grid
/// shape. For `n` sequences of length `s` this stores `n × sᴺ` values:
///
/// ```text
/// xs = [0, 1, 2]            meshes[0]      meshes[1]
/// ys = [0, 1]       Xy →    [[0, 1, 2],    [[0, 0, 0],
///                            [0, 1, 2]]     [1, 1, 1]]
/// ```
#[derive(Debug, Clone)]
pub struct MeshGrid {
    /// One array per input axis, all of the same shape.
    pub meshes: Vec<ArrayD<Value>>,
}

impl MeshGrid {
    /// Broadcasts each of `axes` across the full grid.
    ///
    /// Returns [`SphereMaskError::InvalidShape`] if `axes` is empty.
    pub fn new(axes: &[Array1<Value>], indexing: Indexing) -> Result<Self> {
        if axes.is_empty() {
            return Err(SphereMaskError::InvalidShape(
                "mesh grid needs at least one axis".into(),
            ));
        }
        let n = axes.len();

        // position of input axis k in the output
        let out_axis = |k: usize| match (indexing, k) {
            (Indexing::Xy, 0) if n > 1 => 1,
            (Indexing::Xy, 1) if n > 1 => 0,
            _ => k,
        };

        let mut shape = vec![0; n];
        for (k, a) in axes.iter().enumerate() {
            shape[out_axis(k)] = a.len();
        }

        let mut meshes = Vec::with_capacity(n);
        for (k, a) in axes.iter().enumerate() {
            // reshape to length-1 on every axis but its own, then broadcast
            let mut view_shape = vec![1; n];
            view_shape[out_axis(k)] = a.len();
            let column = a
                .view()
                .into_shape_with_order(IxDyn(&view_shape))
                .map_err(|e| SphereMaskError::InvalidShape(e.to_string()))?;
            let full = column
                .broadcast(IxDyn(&shape))
                .ok_or_else(|| SphereMaskError::InvalidShape("cannot broadcast axis".into()))?
                .to_owned();
            meshes.push(full);
        }

        Ok(Self { meshes })
    }

    /// Shape shared by every mesh array.
    pub fn shape(&self) -> &[usize] {
        self.meshes[0].shape()
    }

    pub fn n_dims(&self) -> usize {
        self.meshes.len()
    }

    /// Sums `f(mesh)` elementwise over every mesh array.
    pub fn fold_sum<F>(&self, f: F) -> ArrayD<Value>
    where
        F: Fn(Value) -> Value,
    {
        let mut acc = ArrayD::<Value>::zeros(self.meshes[0].raw_dim());
        for mesh in &self.meshes {
            acc.zip_mut_with(mesh, |a, &m| *a += f(m));
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn xy_swaps_first_two_axes() {
        let xs = array![0.0, 1.0, 2.0];
        let ys = array![10.0, 20.0];
        let grid = MeshGrid::new(&[xs, ys], Indexing::Xy).unwrap();
        assert_eq!(grid.shape(), &[2, 3]);
        assert_eq!(grid.meshes[0][[1, 2]], 2.0);
        assert_eq!(grid.meshes[1][[1, 2]], 20.0);
    }

    #[test]
    fn ij_keeps_axis_order() {
        let xs = array![0.0, 1.0, 2.0];
        let ys = array![10.0, 20.0];
        let grid = MeshGrid::new(&[xs, ys], Indexing::Ij).unwrap();
        assert_eq!(grid.shape(), &[3, 2]);
        assert_eq!(grid.meshes[0][[2, 1]], 2.0);
        assert_eq!(grid.meshes[1][[2, 1]], 20.0);
    }

    #[test]
    fn three_axes_are_fully_materialized() {
        let a = array![0.0, 1.0];
        let grid = MeshGrid::new(&[a.clone(), a.clone(), a], Indexing::Xy).unwrap();
        assert_eq!(grid.n_dims(), 3);
        for mesh in &grid.meshes {
            assert_eq!(mesh.shape(), &[2, 2, 2]);
            assert!(mesh.is_standard_layout());
        }
        // Xy: mesh 0 varies along output axis 1, mesh 2 along axis 2
        assert_eq!(grid.meshes[0][[0, 1, 0]], 1.0);
        assert_eq!(grid.meshes[2][[0, 0, 1]], 1.0);
    }

    #[test]
    fn single_axis_is_unchanged() {
        let grid = MeshGrid::new(&[array![3.0, 4.0]], Indexing::Xy).unwrap();
        assert_eq!(grid.meshes[0].as_slice().unwrap(), &[3.0, 4.0]);
    }

    #[test]
    fn fold_sum_squares() {
        let a = array![0.0, 1.0, 2.0];
        let grid = MeshGrid::new(&[a.clone(), a], Indexing::Ij).unwrap();
        let sum = grid.fold_sum(|m| m * m);
        assert_eq!(sum[[2, 1]], 5.0);
    }

    #[test]
    fn empty_axes_rejected() {
        assert!(MeshGrid::new(&[], Indexing::Xy).is_err());
    }
}
