use crate::error::{Dims, Error, Result};

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display};

/// Dense, row-major matrix of `f64`s.
///
/// The dimensions are fixed at construction. Every operation returns a new matrix,
/// with the exception of [fill](Matrix::fill), [zero](Matrix::zero) and [set](Matrix::set).
/// Binary operations require both operands to have identical dimensions and return
/// [Error::DimensionMismatch] otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// Unchecked form of a [Matrix] as it appears in serialized data.
#[derive(Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = Error;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        Matrix::from_vec(raw.rows, raw.cols, raw.data)
    }
}

impl Matrix {
    /// Constructs a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.)
    }

    /// Constructs a matrix where every entry is `val`.
    pub fn filled(rows: usize, cols: usize, val: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![val; rows * cols],
        }
    }

    /// Constructs a matrix by evaluating `func(row, col)` for every entry.
    pub fn from_fn<F>(rows: usize, cols: usize, mut func: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(func(row, col));
            }
        }
        Self { rows, cols, data }
    }

    /// Wraps row-major data. Fails if `data` doesn't hold exactly `rows * cols` values.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::mismatch(
                "Matrix::from_vec",
                Dims::Matrix(rows, cols),
                Dims::Vector(data.len()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix out of rows which must all have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::mismatch(
                    "Matrix::from_rows",
                    Dims::Vector(cols),
                    Dims::Vector(row.len()),
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// `n x 1` matrix.
    pub fn col_vector(data: &[f64]) -> Self {
        Self {
            rows: data.len(),
            cols: 1,
            data: data.to_vec(),
        }
    }

    /// `1 x n` matrix.
    pub fn row_vector(data: &[f64]) -> Self {
        Self {
            rows: 1,
            cols: data.len(),
            data: data.to_vec(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> Dims {
        Dims::Matrix(self.rows, self.cols)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_vector(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }

    /// Row-major view of the entries. For vectors this is simply the vector.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Entry at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, val: f64) -> Result<()> {
        if row >= self.rows {
            return Err(Error::IndexOutOfBounds {
                index: row,
                len: self.rows,
            });
        }
        if col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                index: col,
                len: self.cols,
            });
        }
        self.data[row * self.cols + col] = val;
        Ok(())
    }

    /// Overwrites every entry with `val`.
    pub fn fill(&mut self, val: f64) {
        self.data.iter_mut().for_each(|x| *x = val);
    }

    pub fn zero(&mut self) {
        self.fill(0.)
    }

    /// Extracts row `i` as a `1 x cols` matrix.
    pub fn row(&self, i: usize) -> Result<Matrix> {
        if i >= self.rows {
            return Err(Error::IndexOutOfBounds {
                index: i,
                len: self.rows,
            });
        }
        Ok(Matrix::row_vector(
            &self.data[i * self.cols..(i + 1) * self.cols],
        ))
    }

    /// Extracts column `j` as a `rows x 1` matrix.
    pub fn column(&self, j: usize) -> Result<Matrix> {
        if j >= self.cols {
            return Err(Error::IndexOutOfBounds {
                index: j,
                len: self.cols,
            });
        }
        let data = (0..self.rows)
            .map(|i| self.data[i * self.cols + j])
            .collect::<Vec<_>>();
        Ok(Matrix::col_vector(&data))
    }

    fn check_same(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            Err(Error::mismatch(op, self.dims(), other.dims()))
        } else {
            Ok(())
        }
    }

    /// Combines two equally shaped matrices entry by entry.
    pub fn zip_with<F>(&self, other: &Matrix, op: &'static str, mut func: F) -> Result<Matrix>
    where
        F: FnMut(f64, f64) -> f64,
    {
        self.check_same(other, op)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| func(*a, *b))
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    pub fn plus(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "plus", |a, b| a + b)
    }

    pub fn minus(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "minus", |a, b| a - b)
    }

    /// Entrywise (Hadamard) product.
    pub fn element_mult(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "element_mult", |a, b| a * b)
    }

    pub fn scale(&self, scalar: f64) -> Matrix {
        self.map(|x| x * scalar)
    }

    /// Divides every entry by `val`. Division by zero yields infinities or NaNs as usual.
    pub fn divide(&self, val: f64) -> Matrix {
        self.map(|x| x / val)
    }

    pub fn transpose(&self) -> Matrix {
        Matrix::from_fn(self.cols, self.rows, |row, col| {
            self.data[col * self.cols + row]
        })
    }

    /// Matrix product `self * other`.
    pub fn mult(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(Error::mismatch("mult", self.dims(), other.dims()));
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            let lhs = &self.data[i * self.cols..(i + 1) * self.cols];
            let dst = &mut out.data[i * other.cols..(i + 1) * other.cols];
            for (k, a) in lhs.iter().enumerate() {
                let rhs = &other.data[k * other.cols..(k + 1) * other.cols];
                for (d, b) in dst.iter_mut().zip(rhs) {
                    *d += a * b;
                }
            }
        }
        Ok(out)
    }

    /// Dot product of two vectors with the same number of entries, regardless of orientation.
    pub fn dot(&self, other: &Matrix) -> Result<f64> {
        if !self.is_vector() || !other.is_vector() || self.len() != other.len() {
            return Err(Error::mismatch("dot", self.dims(), other.dims()));
        }
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum())
    }

    /// Applies `func` to every entry.
    pub fn map<F>(&self, mut func: F) -> Matrix
    where
        F: FnMut(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|x| func(*x)).collect(),
        }
    }

    /// Folds over every entry in row-major order.
    pub fn fold<B, F>(&self, init: B, func: F) -> B
    where
        F: FnMut(B, &f64) -> B,
    {
        self.data.iter().fold(init, func)
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_vector() {
            f.write_str("<")?;
            for (i, x) in self.data.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", x)?;
            }
            f.write_str(">")?;
        } else {
            for row in self.data.chunks(self.cols.max(1)) {
                f.write_str("[")?;
                for (i, x) in row.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", x)?;
                }
                f.write_str("]")?;
            }
        }
        write!(f, " ({}x{})", self.rows, self.cols)
    }
}
