//! Arbitrary-precision integer matrix used as the lattice basis
//!
//! Row-major; one row per shift-polynomial, one column per coefficient
//! degree. Basis vectors stay exact integers throughout reduction.

use crate::core::error::{AttackError, Result};
use rug::Integer;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntMatrix {
    data: Vec<Vec<Integer>>,
    rows: usize,
    cols: usize,
}

impl IntMatrix {
    /// Create a matrix from row vectors, validating rectangularity
    pub fn new(data: Vec<Vec<Integer>>) -> Result<Self> {
        if data.is_empty() {
            return Err(AttackError::invalid_parameters("Matrix must have at least one row"));
        }

        let rows = data.len();
        let cols = data[0].len();
        if cols == 0 {
            return Err(AttackError::invalid_parameters("Matrix must have at least one column"));
        }
        for row in &data {
            if row.len() != cols {
                return Err(AttackError::invalid_dimensions((rows, cols), (rows, row.len())));
            }
        }
        Ok(IntMatrix { data, rows, cols })
    }

    /// Create a zero matrix with the given dimensions
    pub fn zeros(rows: usize, cols: usize) -> Self {
        IntMatrix {
            data: vec![vec![Integer::new(); cols]; rows],
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get a reference to a specific element
    pub fn get(&self, row: usize, col: usize) -> Option<&Integer> {
        self.data.get(row)?.get(col)
    }

    /// Set a specific element
    pub fn set(&mut self, row: usize, col: usize, value: Integer) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(AttackError::invalid_dimensions((self.rows, self.cols), (row, col)));
        }
        self.data[row][col] = value;
        Ok(())
    }

    /// Borrow a row as a slice
    pub fn row(&self, row: usize) -> Result<&[Integer]> {
        self.data
            .get(row)
            .map(|r| r.as_slice())
            .ok_or_else(|| AttackError::invalid_dimensions((self.rows, self.cols), (row, self.cols)))
    }

    /// Get a row as an owned vector
    pub fn get_row(&self, row: usize) -> Result<Vec<Integer>> {
        self.row(row).map(|r| r.to_vec())
    }

    /// Swap two rows in place
    pub fn swap_rows(&mut self, i: usize, j: usize) -> Result<()> {
        if i >= self.rows || j >= self.rows {
            return Err(AttackError::invalid_parameters(format!(
                "Row indices {} and {} out of bounds for {} rows",
                i, j, self.rows
            )));
        }
        self.data.swap(i, j);
        Ok(())
    }

    /// In-place row operation: row_k -= q * row_j (the LLL size-reduction step)
    pub fn row_sub_scaled(&mut self, k: usize, j: usize, q: &Integer) -> Result<()> {
        if k >= self.rows || j >= self.rows || k == j {
            return Err(AttackError::invalid_parameters(format!(
                "Row indices {} and {} invalid for {} rows",
                k, j, self.rows
            )));
        }
        for col in 0..self.cols {
            let sub = Integer::from(q * &self.data[j][col]);
            self.data[k][col] -= sub;
        }
        Ok(())
    }

    /// Euclidean norm of a row, computed in floating point
    pub fn row_norm(&self, row: usize) -> Result<f64> {
        let r = self.row(row)?;
        Ok(r.iter().map(|v| v.to_f64().powi(2)).sum::<f64>().sqrt())
    }

    /// True if every entry of the row is zero
    pub fn row_is_zero(&self, row: usize) -> Result<bool> {
        Ok(self.row(row)?.iter().all(|v| v.is_zero()))
    }

    /// Convert rows to f64 vectors for floating-point orthogonalization.
    /// Precision is lost beyond 2^53; acceptable for the projection table
    /// since basis vectors themselves stay exact.
    pub fn to_f64_rows(&self) -> Vec<Vec<f64>> {
        self.data
            .iter()
            .map(|row| row.iter().map(|v| v.to_f64()).collect())
            .collect()
    }
}

impl fmt::Display for IntMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IntMatrix {}x{}:", self.rows, self.cols)?;
        for row in &self.data {
            write!(f, "[")?;
            for (i, v) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
