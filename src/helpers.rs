use crate::error::{Error, Result};
use crate::math::Matrix;

/// Step used by every finite difference derivative in the crate.
pub const DERIVATIVE_STEP: f64 = 1e-6;

/// Column vector of length `len` where every entry is `val`.
pub fn col_vector_filled(val: f64, len: usize) -> Matrix {
    Matrix::filled(len, 1, val)
}

/// Builds the "plot" of two vectors, like the area of a plot of land.
///
/// The output is an `n x m` matrix where `n` is the length of `vertical`,
/// `m` the length of `horizontal` and entry `(row, col)` is `horizontal[col] * vertical[row]`.
/// Orientation of the inputs doesn't matter. Feeding the previous layer's activations as
/// `horizontal` and a layer's error as `vertical` yields that layer's weight gradient.
pub fn plot(horizontal: &Matrix, vertical: &Matrix) -> Result<Matrix> {
    if !horizontal.is_vector() && !horizontal.is_empty() {
        return Err(Error::mismatch("plot", horizontal.dims(), vertical.dims()));
    }
    if !vertical.is_vector() && !vertical.is_empty() {
        return Err(Error::mismatch("plot", horizontal.dims(), vertical.dims()));
    }
    let h = horizontal.as_slice();
    let v = vertical.as_slice();
    Ok(Matrix::from_fn(v.len(), h.len(), |row, col| h[col] * v[row]))
}

/// Forward difference approximation of `f'(x)` using [DERIVATIVE_STEP].
pub fn forward_difference<F>(mut f: F, x: f64) -> f64
where
    F: FnMut(f64) -> f64,
{
    (f(x + DERIVATIVE_STEP) - f(x)) / DERIVATIVE_STEP
}

/// Parses a single number, surrounding whitespace is ignored.
pub fn parse_number(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    trimmed.parse::<f64>().map_err(|source| Error::Parse {
        input: trimmed.to_owned(),
        source,
    })
}

/// Parses a comma separated list of numbers such as `"1.5, -2, 3e4"`.
pub fn parse_vector(input: &str) -> Result<Vec<f64>> {
    input.split(',').map(parse_number).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_layout() {
        let h = Matrix::col_vector(&[1., 2., 3.]);
        let v = Matrix::row_vector(&[10., 20.]);
        let p = plot(&h, &v).unwrap();
        assert_eq!(
            p,
            Matrix::from_rows(&[[10., 20., 30.], [20., 40., 60.]]).unwrap()
        );
    }

    #[test]
    fn plot_rejects_matrices() {
        let h = Matrix::zeros(2, 2);
        let v = Matrix::col_vector(&[1.]);
        assert!(plot(&h, &v).is_err());
    }

    #[test]
    fn forward_difference_of_square() {
        let d = forward_difference(|x| x * x, 3.);
        assert!((d - 6.).abs() < 1e-4, "{}", d);
    }

    #[test]
    fn parse_ok() {
        assert_eq!(parse_vector("1, -2.5,3e1").unwrap(), vec![1., -2.5, 30.]);
    }

    #[test]
    fn parse_error() {
        match parse_vector("1, two, 3") {
            Err(Error::Parse { input, .. }) => assert_eq!(input, "two"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
