use ndarray::Array1;

use crate::types::Value;

// linearly map a number from one range to another
pub fn remap(s: Value, range_in: [Value; 2], range_out: [Value; 2]) -> Value {
    range_out[0] + (s - range_in[0]) * (range_out[1] - range_out[0]) / (range_in[1] - range_in[0])
}

/// `num` evenly spaced samples over the closed interval `[start, end]`.
///
/// Both endpoints are included and exact. With `num == 1` the single sample
/// is `start`; with `num == 0` the result is empty.
///
/// ```text
/// linspace(0, 4, 5)  →  [0, 1, 2, 3, 4]
/// ```
pub fn linspace(start: Value, end: Value, num: usize) -> Array1<Value> {
    match num {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => {
            let last = (num - 1) as Value;
            Array1::from_shape_fn(num, |i| {
                if i == num - 1 {
                    end
                } else {
                    remap(i as Value, [0.0, last], [start, end])
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linspace_integer_grid() {
        let xs = linspace(0.0, 499.0, 500);
        assert_eq!(xs.len(), 500);
        for (i, &x) in xs.iter().enumerate() {
            assert_eq!(x, i as Value);
        }
    }

    #[test]
    fn linspace_degenerate_lengths() {
        assert!(linspace(0.0, 10.0, 0).is_empty());
        assert_eq!(linspace(0.0, 0.0, 1).to_vec(), vec![0.0]);
    }

    #[test]
    fn linspace_fractional_step() {
        let xs = linspace(0.0, 1.0, 5);
        assert_abs_diff_eq!(xs[1], 0.25, epsilon = 1e-12);
        assert_eq!(xs[4], 1.0);
    }

    #[test]
    fn remap_midpoint() {
        assert_abs_diff_eq!(remap(0.5, [0.0, 1.0], [2.0, 6.0]), 4.0);
    }
}
