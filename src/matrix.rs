//! Core dense 2-D matrix type and operations.
//!
//! This module defines [`Matrix`], a rectangular grid of `f64` cells stored
//! flat in row-major order, together with its arithmetic, region-copy,
//! reshape, and convolution operations.
//!
//! ## Design highlights
//!
//! - Client-facing cell access is 1-based, matching the mathematical
//!   convention; out-of-range access fails with [`MatrixError::Index`].
//! - Every in-place operation (`*_in_place`, `fill_*`, `rebuild`, `to_1d`)
//!   mutates the receiver and returns it again so calls can be chained.
//!   Non-mutating counterparts clone the receiver first and delegate.
//! - A matrix never shares backing storage with another matrix; `clone` and
//!   every derived matrix get their own buffer.
//! - The row loops of `conv`, `dis_conv`, and `matmul` are parallelized with
//!   [`rayon`](https://docs.rs/rayon).
//!
//! ## Example
//!
//! ```rust
//! use convmat::matrix;
//!
//! let input = matrix![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
//! let core = matrix![[1.0, 0.0], [0.0, 1.0]];
//! let out = input.conv(&core).unwrap();
//! assert_eq!(out, matrix![[6.0, 8.0], [12.0, 14.0]]);
//! ```

use crate::error::{MatrixError, Result};
use rand::Rng;
use rayon::prelude::*;

/// A dense 2-D matrix of `f64` cells in row-major order.
///
/// The shape is fixed by construction (`rows * cols == data.len()` always
/// holds) but individual cells are freely mutable. A matrix with zero rows
/// has zero columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a matrix from nested row vectors.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] if the rows have differing lengths.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in &rows {
            if row.len() != n_cols {
                return Err(MatrixError::Shape {
                    expected: format!("rows of length {n_cols}"),
                    actual: format!("a row of length {}", row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self::from_raw(n_rows, n_cols, data))
    }

    /// Creates a matrix from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MatrixError::Shape {
                expected: format!("{rows}x{cols} ({} cells)", rows * cols),
                actual: format!("{} cells", data.len()),
            });
        }
        Ok(Self::from_raw(rows, cols, data))
    }

    /// Creates a zero-filled matrix of the given shape.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_raw(rows, cols, vec![0.0; rows * cols])
    }

    /// Internal constructor for shapes already known to be consistent.
    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(rows * cols, data.len());
        // zero rows collapse to a 0x0 matrix
        let cols = if rows == 0 { 0 } else { cols };
        Self { rows, cols, data }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns (0 when there are no rows).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the cells as a flat row-major slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn dims(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    fn index_of(&self, i: usize, j: usize) -> Result<usize> {
        if i == 0 || i > self.rows || j == 0 || j > self.cols {
            return Err(MatrixError::Index {
                row: i,
                col: j,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok((i - 1) * self.cols + (j - 1))
    }

    fn ensure_same_shape(&self, other: &Matrix) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MatrixError::Shape {
                expected: self.dims(),
                actual: other.dims(),
            });
        }
        Ok(())
    }

    /// Returns the cell at 1-based position `(i, j)`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Index`] when `(i, j)` lies outside
    /// `[1, rows] x [1, cols]`.
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        Ok(self.data[self.index_of(i, j)?])
    }

    /// Overwrites the cell at 1-based position `(i, j)` and returns the
    /// stored value.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Index`] when `(i, j)` is out of range.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<f64> {
        let idx = self.index_of(i, j)?;
        self.data[idx] = value;
        Ok(value)
    }

    /// Sums every cell, accumulating in row-major encounter order.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Sums the square of every cell.
    #[must_use]
    pub fn square_sum(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum()
    }

    /// Sets every cell to 0.
    pub fn fill_zeros(&mut self) -> &mut Self {
        self.data.fill(0.0);
        self
    }

    /// Sets every cell to 1.
    pub fn fill_ones(&mut self) -> &mut Self {
        self.data.fill(1.0);
        self
    }

    /// Squares every cell in place.
    pub fn square_in_place(&mut self) -> &mut Self {
        for v in &mut self.data {
            *v *= *v;
        }
        self
    }

    /// Thresholds every cell in place: strictly positive cells become 1,
    /// the rest become 0.
    pub fn to_bool_in_place(&mut self) -> &mut Self {
        for v in &mut self.data {
            *v = if *v > 0.0 { 1.0 } else { 0.0 };
        }
        self
    }

    /// Returns a thresholded copy; see [`Matrix::to_bool_in_place`].
    #[must_use]
    pub fn to_bool(&self) -> Matrix {
        let mut out = self.clone();
        out.to_bool_in_place();
        out
    }

    /// Affinely rescales all cells in place so the current extrema map to
    /// `[min, max]`. When every cell holds the same value the scale factor
    /// is 0 and every cell maps to `min`. An empty matrix is left untouched.
    pub fn min_max_in_place(&mut self, min: f64, max: f64) -> &mut Self {
        let Some(&first) = self.data.first() else {
            return self;
        };
        let mut lo = first;
        let mut hi = first;
        for &v in &self.data {
            lo = if v < lo { v } else { lo };
            hi = if v > hi { v } else { hi };
        }
        let k = if hi - lo > 0.0 { (max - min) / (hi - lo) } else { 0.0 };
        let b = min - k * lo;
        for v in &mut self.data {
            *v = k * *v + b;
        }
        self
    }

    /// Returns a rescaled copy; see [`Matrix::min_max_in_place`].
    #[must_use]
    pub fn min_max(&self, min: f64, max: f64) -> Matrix {
        let mut out = self.clone();
        out.min_max_in_place(min, max);
        out
    }

    /// Clamps every cell into `[min, max]` in place.
    pub fn hard_cut_in_place(&mut self, min: f64, max: f64) -> &mut Self {
        for v in &mut self.data {
            *v = if *v < min {
                min
            } else if *v > max {
                max
            } else {
                *v
            };
        }
        self
    }

    /// Returns a clamped copy; see [`Matrix::hard_cut_in_place`].
    #[must_use]
    pub fn hard_cut(&self, min: f64, max: f64) -> Matrix {
        let mut out = self.clone();
        out.hard_cut_in_place(min, max);
        out
    }

    /// Fills every cell with an independent uniform draw from `[min, max)`
    /// using the given generator. Equal bounds fill with `min`.
    pub fn fill_random_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        min: f64,
        max: f64,
    ) -> &mut Self {
        for v in &mut self.data {
            *v = if max > min {
                rng.random_range(min..max)
            } else {
                min
            };
        }
        self
    }

    /// Fills every cell with an independent uniform draw from `[min, max)`.
    pub fn fill_random(&mut self, min: f64, max: f64) -> &mut Self {
        let mut rng = rand::rng();
        self.fill_random_with(&mut rng, min, max)
    }

    /// Returns a copy of this matrix's shape filled with uniform draws from
    /// `[min, max)`.
    #[must_use]
    pub fn random(&self, min: f64, max: f64) -> Matrix {
        let mut out = self.clone();
        out.fill_random(min, max);
        out
    }

    /// Adds `other` cell-wise into `self`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the shapes differ.
    pub fn add_in_place(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.ensure_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += *b;
        }
        Ok(self)
    }

    /// Returns `self + other` as a new matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the shapes differ.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        let mut out = self.clone();
        out.add_in_place(other)?;
        Ok(out)
    }

    /// Subtracts `other` cell-wise from `self`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the shapes differ.
    pub fn sub_in_place(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.ensure_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= *b;
        }
        Ok(self)
    }

    /// Returns `self - other` as a new matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the shapes differ.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        let mut out = self.clone();
        out.sub_in_place(other)?;
        Ok(out)
    }

    /// Multiplies `self` by `other` cell-wise (Hadamard product) in place.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the shapes differ.
    pub fn hadamard_product_in_place(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.ensure_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a *= *b;
        }
        Ok(self)
    }

    /// Returns the Hadamard (cell-wise) product as a new matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the shapes differ.
    pub fn hadamard_product(&self, other: &Matrix) -> Result<Matrix> {
        let mut out = self.clone();
        out.hadamard_product_in_place(other)?;
        Ok(out)
    }

    /// Multiplies every cell by the scalar `a` in place.
    pub fn scale_in_place(&mut self, a: f64) -> &mut Self {
        for v in &mut self.data {
            *v *= a;
        }
        self
    }

    /// Returns a copy with every cell multiplied by the scalar `a`.
    #[must_use]
    pub fn scale(&self, a: f64) -> Matrix {
        let mut out = self.clone();
        out.scale_in_place(a);
        out
    }

    /// Matrix product `self * other` with cell
    /// `(i, j) = sum_k self(i, k) * other(k, j)`.
    ///
    /// The shape precondition is deliberately stricter than the textbook
    /// rule: `self.rows == other.cols` and `self.cols == other.rows` must
    /// both hold, restricting the product to transpose-compatible pairs.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the precondition fails.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.cols || self.cols != other.rows {
            return Err(MatrixError::Shape {
                expected: format!("{}x{}", self.cols, self.rows),
                actual: other.dims(),
            });
        }
        let m = self.rows;
        let k = self.cols;
        let n = other.cols;
        let mut out = vec![0.0; m * n];
        out.par_chunks_mut(n.max(1))
            .enumerate()
            .for_each(|(i, row)| {
                for (j, cell) in row.iter_mut().enumerate() {
                    let mut acc = 0.0;
                    for l in 0..k {
                        acc += self.data[i * k + l] * other.data[l * n + j];
                    }
                    *cell = acc;
                }
            });
        Ok(Matrix::from_raw(m, n, out))
    }

    /// Extracts a `height x width` sub-region whose top-left corner sits at
    /// the 1-based position `(i0, j0)`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Index`] when any read falls outside the
    /// matrix.
    pub fn copy_region(
        &self,
        i0: usize,
        j0: usize,
        width: usize,
        height: usize,
    ) -> Result<Matrix> {
        let mut data = Vec::with_capacity(width * height);
        for i in 0..height {
            for j in 0..width {
                data.push(self.get(i + i0, j + j0)?);
            }
        }
        Ok(Matrix::from_raw(height, width, data))
    }

    /// Overwrites this matrix's cells from a region of `other` starting at
    /// the 1-based position `(i0, j0)`; the receiver's own shape is kept.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Index`] when the region does not fit inside
    /// `other`.
    pub fn copy_from(&mut self, other: &Matrix, i0: usize, j0: usize) -> Result<&mut Self> {
        let region = other.copy_region(i0, j0, self.cols, self.rows)?;
        self.data.copy_from_slice(&region.data);
        Ok(self)
    }

    /// Flattens the matrix in place into a single row, row-major.
    pub fn to_1d(&mut self) -> &mut Self {
        self.rows = 1;
        self.cols = self.data.len();
        self
    }

    /// Re-partitions the row-major cell sequence into `rows x cols` in
    /// place.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the element count would change.
    pub fn reshape_in_place(&mut self, rows: usize, cols: usize) -> Result<&mut Self> {
        if rows * cols != self.data.len() {
            return Err(MatrixError::Shape {
                expected: format!("{} cells", self.data.len()),
                actual: format!("{rows}x{cols} ({} cells)", rows * cols),
            });
        }
        self.rows = rows;
        self.cols = if rows == 0 { 0 } else { cols };
        Ok(self)
    }

    /// Returns a reshaped copy; see [`Matrix::reshape_in_place`].
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the element count would change.
    pub fn reshape(&self, rows: usize, cols: usize) -> Result<Matrix> {
        let mut out = self.clone();
        out.reshape_in_place(rows, cols)?;
        Ok(out)
    }

    /// Discards all content and reinitializes to a zero-filled
    /// `rows x cols` matrix.
    pub fn rebuild(&mut self, rows: usize, cols: usize) -> &mut Self {
        self.rows = rows;
        self.cols = if rows == 0 { 0 } else { cols };
        self.data = vec![0.0; self.rows * self.cols];
        self
    }

    /// Valid (non-padded) 2-D cross-correlation of `self` with `core`,
    /// stride 1.
    ///
    /// Output cell `(i, j)` is the cell-wise product-then-sum of the
    /// `core.rows x core.cols` window of `self` whose top-left corner sits
    /// at the 1-based position `(i, j)` with `core`. The output shape is
    /// `(rows - core.rows + 1) x (cols - core.cols + 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when `core` exceeds `self` in either
    /// dimension.
    pub fn conv(&self, core: &Matrix) -> Result<Matrix> {
        if core.rows > self.rows || core.cols > self.cols {
            return Err(MatrixError::Shape {
                expected: format!("a core no larger than {}", self.dims()),
                actual: core.dims(),
            });
        }
        let out_rows = self.rows - core.rows + 1;
        let out_cols = self.cols - core.cols + 1;
        let mut out = vec![0.0; out_rows * out_cols];
        out.par_chunks_mut(out_cols.max(1))
            .enumerate()
            .for_each(|(i, row)| {
                for (j, cell) in row.iter_mut().enumerate() {
                    let mut acc = 0.0;
                    for n in 0..core.rows {
                        let in_off = (i + n) * self.cols + j;
                        let core_off = n * core.cols;
                        for m in 0..core.cols {
                            acc += self.data[in_off + m] * core.data[core_off + m];
                        }
                    }
                    *cell = acc;
                }
            });
        Ok(Matrix::from_raw(out_rows, out_cols, out))
    }

    /// Full correlation transpose of [`Matrix::conv`], the adjoint of the
    /// convolution with respect to its input.
    ///
    /// Every input cell `(i, j)` scatters `core(n, m) * self(i, j)` into
    /// output cell `(i + n, j + m)`; the zero-initialized output has shape
    /// `(rows + core.rows - 1) x (cols + core.cols - 1)`. There is no shape
    /// precondition, the core may exceed the input. Used to push a gradient
    /// backwards through a convolution.
    #[must_use]
    pub fn dis_conv(&self, core: &Matrix) -> Matrix {
        let out_rows = (self.rows + core.rows).saturating_sub(1);
        let out_cols = (self.cols + core.cols).saturating_sub(1);
        let mut out = vec![0.0; out_rows * out_cols];
        // gather form of the scatter above, so rows stay independent
        out.par_chunks_mut(out_cols.max(1))
            .enumerate()
            .for_each(|(r, row)| {
                let n_lo = (r + 1).saturating_sub(self.rows);
                let n_hi = core.rows.min(r + 1);
                for (c, cell) in row.iter_mut().enumerate() {
                    let m_lo = (c + 1).saturating_sub(self.cols);
                    let m_hi = core.cols.min(c + 1);
                    let mut acc = 0.0;
                    for n in n_lo..n_hi {
                        let in_off = (r - n) * self.cols + c;
                        let core_off = n * core.cols;
                        for m in m_lo..m_hi {
                            acc += core.data[core_off + m] * self.data[in_off - m];
                        }
                    }
                    *cell = acc;
                }
            });
        Matrix::from_raw(out_rows, out_cols, out)
    }
}

/// Builds a [`Matrix`] from a 2-D literal.
///
/// Integer literals are accepted and widened to `f64`.
///
/// # Panics
///
/// Panics when the literal rows have mismatched lengths.
///
/// # Example
///
/// ```
/// use convmat::matrix;
/// let m = matrix![[1.0, 2.0], [3.0, 4.0]];
/// assert_eq!(m.rows(), 2);
/// assert_eq!(m.cols(), 2);
/// ```
#[macro_export]
macro_rules! matrix {
    ( $( [ $( $v:expr ),* $(,)? ] ),* $(,)? ) => {{
        let rows: ::std::vec::Vec<::std::vec::Vec<f64>> =
            ::std::vec![ $( ::std::vec![ $( ($v) as f64 ),* ] ),* ];
        $crate::matrix::Matrix::from_rows(rows)
            .expect("matrix! literal rows must all have the same length")
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rows_collapse_cols() {
        let m = Matrix::from_rows(vec![]).unwrap();
        assert_eq!(m.rows(), 0);
        assert_eq!(m.cols(), 0);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, MatrixError::Shape { .. }));
    }

    #[test]
    fn one_based_access() {
        let mut m = matrix![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(m.get(1, 1).unwrap(), 1.0);
        assert_eq!(m.get(2, 2).unwrap(), 4.0);
        assert!(matches!(m.get(0, 1), Err(MatrixError::Index { .. })));
        assert!(matches!(m.get(1, 3), Err(MatrixError::Index { .. })));
        assert_eq!(m.set(2, 1, 9.5).unwrap(), 9.5);
        assert_eq!(m.get(2, 1).unwrap(), 9.5);
    }

    #[test]
    fn min_max_degenerate_maps_to_min() {
        let mut m = matrix![[4.0, 4.0], [4.0, 4.0]];
        m.min_max_in_place(-1.0, 1.0);
        assert_eq!(m.as_slice(), &[-1.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn chained_in_place_ops() {
        let mut m = matrix![[-2.0, 0.5], [3.0, -0.1]];
        let sum = m
            .hard_cut_in_place(-1.0, 1.0)
            .to_bool_in_place()
            .sum();
        assert_eq!(sum, 2.0);

        let mut n = matrix![[-3.0, 2.0]];
        assert_eq!(n.square_in_place().sum(), 13.0);
        assert_eq!(n.as_slice(), &[9.0, 4.0]);
    }

    #[test]
    fn fill_random_equal_bounds() {
        let mut m = Matrix::zeros(2, 2);
        m.fill_random(0.5, 0.5);
        assert_eq!(m.as_slice(), &[0.5; 4]);
    }
}
