use crate::types::{Coord, Value};

/// Squared Euclidean distance from `coord` to the scalar `center` on every axis.
///
/// Computed in exact integer arithmetic:
/// ```text
///  Σ (center - coord[i])²
/// ```
#[inline]
pub fn squared_distance(coord: &[Coord], center: Coord) -> u64 {
    coord
        .iter()
        .map(|&c| {
            let d = center.abs_diff(c) as u64;
            d * d
        })
        .sum()
}

/// Euclidean distance from `coord` to the grid center.
#[inline]
pub fn distance(coord: &[Coord], center: Coord) -> Value {
    (squared_distance(coord, center) as Value).sqrt()
}

/// Sphere membership: a point at `distance` from the center is inside when
/// `radius - distance >= 0`.
///
/// Both builders go through this test so the boundary is shared exactly.
#[inline]
pub fn inside(radius: Value, distance: Value) -> bool {
    radius - distance >= 0.0
}
