use std::fmt;

use crate::error::{DspError, Result};

/// Dense row-major real matrix
///
/// Element access follows the same lenient policy as [`super::Vector`].
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero matrix with `rows` x `cols` elements
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col]
        } else {
            0.0
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = value;
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// `value` on the diagonal, 0 elsewhere
    pub fn identity(&mut self, value: f64) {
        for r in 0..self.rows {
            for c in 0..self.cols {
                self.data[r * self.cols + c] = if r == c { value } else { 0.0 };
            }
        }
    }

    /// Exchange rows `i` and `j`; out-of-range rows are ignored
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j || i >= self.rows || j >= self.rows {
            return;
        }
        for c in 0..self.cols {
            self.data.swap(i * self.cols + c, j * self.cols + c);
        }
    }

    /// Matrix product `self * rhs`
    ///
    /// # Errors
    /// Returns `DspError::DimensionMismatch` when `self.cols() != rhs.rows()`
    pub fn mul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(DspError::DimensionMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: rhs.rows,
                right_cols: rhs.cols,
            });
        }
        let mut out = Matrix::new(self.rows, rhs.cols);
        for i in 0..self.rows {
            for j in 0..rhs.cols {
                out.data[i * rhs.cols + j] = (0..self.cols)
                    .map(|k| self.data[i * self.cols + k] * rhs.data[k * rhs.cols + j])
                    .sum();
            }
        }
        Ok(out)
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        out
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                write!(f, "{}\t", self.get(r, c))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
