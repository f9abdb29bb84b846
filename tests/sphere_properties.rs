//! Property-based tests for the sphere builders.
//!
//! Checks agreement between the naive and vectorized builders and the
//! geometric invariants of the mask across random small grids.

use proptest::prelude::*;
use sphere_mask::{
    GridSpec, SphereMaskError,
    compare::{DEFAULT_RTOL, allclose},
    naive, vectorized,
};

/// `(radius, size, n_dims)` with `radius <= size`, kept small enough for the naive builder.
fn valid_case() -> impl Strategy<Value = (f64, usize, usize)> {
    (1usize..=12, 1usize..=3)
        .prop_flat_map(|(size, n_dims)| (0.0..=size as f64, Just(size), Just(n_dims)))
}

/// Reflects `idx[axis]` about `center`, if the image stays on the grid.
fn reflect(idx: &[usize], axis: usize, center: usize, size: usize) -> Option<Vec<usize>> {
    let mirrored = (2 * center).checked_sub(idx[axis])?;
    (mirrored < size).then(|| {
        let mut out = idx.to_vec();
        out[axis] = mirrored;
        out
    })
}

proptest! {
    #[test]
    fn prop_builders_agree((radius, size, n_dims) in valid_case()) {
        let slow = naive::sphere(radius, size, n_dims).unwrap();
        let fast = vectorized::sphere(radius, size, n_dims).unwrap();
        prop_assert!(allclose(&slow, &fast, DEFAULT_RTOL, 0.0));
    }

    #[test]
    fn prop_oversized_radius_rejected(
        size in 1usize..=50,
        extra in 0.001f64..100.0,
        n_dims in 1usize..=3,
    ) {
        let radius = size as f64 + extra;
        let slow = naive::sphere(radius, size, n_dims);
        prop_assert!(
            matches!(slow, Err(SphereMaskError::InvalidRadius { .. })),
            "naive builder accepted radius {} > size {}", radius, size
        );
        let fast = vectorized::sphere(radius, size, n_dims);
        prop_assert!(
            matches!(fast, Err(SphereMaskError::InvalidRadius { .. })),
            "vectorized builder accepted radius {} > size {}", radius, size
        );
    }

    #[test]
    fn prop_center_always_inside((radius, size, n_dims) in valid_case()) {
        let spec = GridSpec::new(radius, size, n_dims).unwrap();
        let mask = vectorized::sphere(radius, size, n_dims).unwrap();
        prop_assert_eq!(mask[spec.center_coord().as_slice()], 1.0);
    }

    #[test]
    fn prop_reflection_symmetry((radius, size, n_dims) in valid_case(), axis_seed in 0usize..3) {
        // Even sizes put the center right of middle, so only the window
        // [0, 2 * center] mirrors onto the grid; index 0 has no partner there.
        let spec = GridSpec::new(radius, size, n_dims).unwrap();
        let axis = axis_seed % n_dims;
        let mask = naive::sphere(radius, size, n_dims).unwrap();
        for idx in spec.indices() {
            if let Some(image) = reflect(&idx, axis, spec.center(), size) {
                prop_assert_eq!(mask[idx.as_slice()], mask[image.as_slice()]);
            }
        }
    }

    #[test]
    fn prop_monotone_in_radius((radius, size, n_dims) in valid_case(), grow in 0.0f64..1.0) {
        let larger = radius + grow * (size as f64 - radius);
        let small = vectorized::sphere(radius, size, n_dims).unwrap();
        let big = vectorized::sphere(larger, size, n_dims).unwrap();
        for (&s, &b) in small.iter().zip(big.iter()) {
            prop_assert!(s <= b);
        }
    }
}

#[test]
fn even_grid_edge_has_no_mirror() {
    // size 6: center 3, index 0 would mirror to 6 which is off the grid
    let mask = naive::sphere(3.0, 6, 1).unwrap();
    assert_eq!(mask.iter().copied().collect::<Vec<_>>(), vec![1.0; 6]);
    let mask = naive::sphere(2.0, 6, 1).unwrap();
    assert_eq!(
        mask.iter().copied().collect::<Vec<_>>(),
        vec![0.0, 1.0, 1.0, 1.0, 1.0, 1.0]
    );
}

#[test]
fn default_harness_cases_agree_on_small_grids() {
    // same radius/size ratios as the fixed cases, scaled down
    for (radius, size, n_dims) in [(1.0, 50, 2), (25.0, 50, 2), (1.0, 10, 3), (10.0, 26, 3)] {
        let slow = naive::sphere(radius, size, n_dims).unwrap();
        let fast = vectorized::sphere(radius, size, n_dims).unwrap();
        assert!(allclose(&slow, &fast, DEFAULT_RTOL, 0.0));
    }
}
