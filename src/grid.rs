use ndarray::{Dimension, IxDyn};

use crate::{
    error::{Result, SphereMaskError},
    types::{Coord, Value},
};

/// A validated request for a sphere mask on an N-dimensional cubic grid.
///
/// The grid has side `size` on every axis and is indexed by tuples in
/// `[0, size)^n_dims`. The sphere is centred on [`center`](GridSpec::center)
/// and has the given `radius`.
///
/// Construction fails when `radius > size`, so both builders can assume a
/// valid `GridSpec` and never re-check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    radius: Value,
    size: usize,
    n_dims: usize,
}

impl GridSpec {
    /// Validates and creates a grid spec.
    ///
    /// Returns [`SphereMaskError::InvalidRadius`] if `radius > size`, is negative or NaN,
    /// and [`SphereMaskError::InvalidShape`] if `size` or `n_dims` is zero.
    pub fn new(radius: Value, size: usize, n_dims: usize) -> Result<Self> {
        if radius.is_nan() || radius < 0.0 || radius > size as Value {
            return Err(SphereMaskError::InvalidRadius { radius, size });
        }
        if size == 0 || n_dims == 0 {
            return Err(SphereMaskError::InvalidShape(format!(
                "size ({size}) and n_dims ({n_dims}) must both be positive"
            )));
        }
        Ok(Self {
            radius,
            size,
            n_dims,
        })
    }

    pub fn radius(&self) -> Value {
        self.radius
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn n_dims(&self) -> usize {
        self.n_dims
    }

    /// Center index `floor(size / 2)`, shared by every axis.
    pub fn center(&self) -> Coord {
        self.size / 2
    }

    /// The center as a full coordinate tuple.
    pub fn center_coord(&self) -> Vec<Coord> {
        vec![self.center(); self.n_dims]
    }

    /// `(size,) * n_dims`
    pub fn shape(&self) -> IxDyn {
        IxDyn(&vec![self.size; self.n_dims])
    }

    /// Total number of grid points, `size^n_dims`.
    pub fn len(&self) -> usize {
        self.shape().size()
    }

    /// Iterates every coordinate of the grid in row-major order (last axis fastest).
    ///
    /// ```text
    /// size = 2, n_dims = 2:  [0,0] → [0,1] → [1,0] → [1,1]
    /// ```
    pub fn indices(&self) -> GridIndices {
        GridIndices {
            size: self.size,
            next: Some(vec![0; self.n_dims]),
        }
    }

    /// Calls `f(coord)` for every coordinate in the grid, in [`indices`](GridSpec::indices) order.
    pub fn for_each_index<F>(&self, mut f: F)
    where
        F: FnMut(&[Coord]),
    {
        for idx in self.indices() {
            f(&idx);
        }
    }
}

/// Iterator over every coordinate of a cubic grid. See [`GridSpec::indices`].
#[derive(Debug, Clone)]
pub struct GridIndices {
    size: usize,
    next: Option<Vec<Coord>>,
}

impl Iterator for GridIndices {
    type Item = Vec<Coord>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        // odometer increment, last axis first
        let mut following = current.clone();
        let mut axis = following.len();
        let mut carried = true;
        while carried && axis > 0 {
            axis -= 1;
            following[axis] += 1;
            if following[axis] == self.size {
                following[axis] = 0;
            } else {
                carried = false;
            }
        }
        if !carried {
            self.next = Some(following);
        }

        Some(current)
    }
}
