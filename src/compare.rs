use ndarray::{ArrayD, Dimension, Zip};

use crate::error::{Result, SphereMaskError};

/// Relative tolerance used when comparing naive and vectorized masks.
pub const DEFAULT_RTOL: f64 = 1e-5;

/// `true` when every element satisfies `|actual - desired| <= atol + rtol × |desired|`
/// and the shapes are identical.
pub fn allclose<A, B>(actual: &ArrayD<A>, desired: &ArrayD<B>, rtol: f64, atol: f64) -> bool
where
    A: Copy + Into<f64>,
    B: Copy + Into<f64>,
{
    assert_allclose(actual, desired, rtol, atol).is_ok()
}

/// Checks two arrays for elementwise closeness.
///
/// Returns [`SphereMaskError::InvalidShape`] if the shapes differ and
/// [`SphereMaskError::EquivalenceMismatch`] if any element is outside tolerance.
/// The error reports how many elements failed and the first failing index in
/// row-major order.
pub fn assert_allclose<A, B>(
    actual: &ArrayD<A>,
    desired: &ArrayD<B>,
    rtol: f64,
    atol: f64,
) -> Result<()>
where
    A: Copy + Into<f64>,
    B: Copy + Into<f64>,
{
    if actual.shape() != desired.shape() {
        return Err(SphereMaskError::InvalidShape(format!(
            "shape mismatch: {:?} vs {:?}",
            actual.shape(),
            desired.shape()
        )));
    }

    let close = |a: A, d: B| {
        let (a, d): (f64, f64) = (a.into(), d.into());
        (a - d).abs() <= atol + rtol * d.abs()
    };

    let mismatched = Zip::from(actual)
        .and(desired)
        .fold(0_usize, |n, &a, &d| if close(a, d) { n } else { n + 1 });

    if mismatched == 0 {
        return Ok(());
    }

    let first_index = actual
        .indexed_iter()
        .zip(desired.iter())
        .find(|((_, a), d)| !close(**a, **d))
        .map(|((idx, _), _)| idx.slice().to_vec())
        .unwrap_or_default();

    Err(SphereMaskError::EquivalenceMismatch {
        mismatched,
        total: actual.len(),
        first_index,
    })
}
