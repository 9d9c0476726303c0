//! Content fingerprinting for matrices.
//!
//! A matrix digests to a fixed-size token covering its shape and every cell
//! in row-major order. Windowed digests (`hash_conv`) produce a
//! [`HashMatrix`], a string-cell matrix with the same window geometry as a
//! valid convolution. Iterating `hash_conv` on its own output until the
//! matrix shrinks below the window yields a multi-scale "hash cloud", a map
//! from token to the depth at which it first appeared, usable for
//! approximate structural matching across scales.
//!
//! The digest is SHA-256 over the string `"{rows}x{cols}"` followed by
//! `",{cell}"` for each cell, numeric cells rendered in `f64`'s shortest
//! `Display` form. Equal shape and content always produce equal tokens; any
//! single-cell change produces a different token with overwhelming
//! probability.

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::{Display, Write as _};

/// Digest of one `height x width` window of a row-major cell buffer whose
/// top-left corner sits at 0-based `(i, j)`.
fn window_digest<T: Display>(
    cells: &[T],
    stride: usize,
    i: usize,
    j: usize,
    height: usize,
    width: usize,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{height}x{width}").as_bytes());
    let mut line = String::new();
    for n in 0..height {
        let off = (i + n) * stride + j;
        for m in 0..width {
            line.clear();
            let _ = write!(line, ",{}", cells[off + m]);
            hasher.update(line.as_bytes());
        }
    }
    let mut hex = String::with_capacity(64);
    for byte in hasher.finalize() {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Windowed digest pass shared by the numeric and token matrices.
///
/// Callers must already have checked `height <= rows && width <= cols`.
fn hash_conv_cells<T: Display + Sync>(
    rows: usize,
    cols: usize,
    cells: &[T],
    height: usize,
    width: usize,
) -> (usize, usize, Vec<String>) {
    let out_rows = rows - height + 1;
    let out_cols = cols - width + 1;
    let mut out = vec![String::new(); out_rows * out_cols];
    out.par_chunks_mut(out_cols.max(1))
        .enumerate()
        .for_each(|(i, row)| {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = window_digest(cells, cols, i, j, height, width);
            }
        });
    (out_rows, out_cols, out)
}

/// A matrix of hash tokens, produced by [`Matrix::hash_conv`].
///
/// Supports shape queries, 1-based cell access, and further hashing, but no
/// arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMatrix {
    rows: usize,
    cols: usize,
    data: Vec<String>,
}

impl HashMatrix {
    /// Returns the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the token at 1-based position `(i, j)`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Index`] when `(i, j)` is out of range.
    pub fn get(&self, i: usize, j: usize) -> Result<&str> {
        if i == 0 || i > self.rows || j == 0 || j > self.cols {
            return Err(MatrixError::Index {
                row: i,
                col: j,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(&self.data[(i - 1) * self.cols + (j - 1)])
    }

    /// Digests the whole token matrix, shape included.
    #[must_use]
    pub fn hash(&self) -> String {
        window_digest(&self.data, self.cols.max(1), 0, 0, self.rows, self.cols)
    }

    /// Windowed digest of this token matrix; same geometry as
    /// [`Matrix::conv`].
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the window exceeds the matrix in
    /// either dimension.
    pub fn hash_conv(&self, core_rows: usize, core_cols: usize) -> Result<HashMatrix> {
        if core_rows > self.rows || core_cols > self.cols {
            return Err(MatrixError::Shape {
                expected: format!("a window no larger than {}x{}", self.rows, self.cols),
                actual: format!("{core_rows}x{core_cols}"),
            });
        }
        let (rows, cols, data) =
            hash_conv_cells(self.rows, self.cols, &self.data, core_rows, core_cols);
        Ok(HashMatrix { rows, cols, data })
    }
}

impl Matrix {
    /// Digests the whole matrix, shape included, into a hex token.
    #[must_use]
    pub fn hash(&self) -> String {
        window_digest(
            self.as_slice(),
            self.cols().max(1),
            0,
            0,
            self.rows(),
            self.cols(),
        )
    }

    /// Fingerprints each `core_rows x core_cols` window of this matrix into
    /// a [`HashMatrix`] cell; window geometry matches [`Matrix::conv`].
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Shape`] when the window exceeds the matrix in
    /// either dimension.
    pub fn hash_conv(&self, core_rows: usize, core_cols: usize) -> Result<HashMatrix> {
        if core_rows > self.rows() || core_cols > self.cols() {
            return Err(MatrixError::Shape {
                expected: format!("a window no larger than {}x{}", self.rows(), self.cols()),
                actual: format!("{core_rows}x{core_cols}"),
            });
        }
        let (rows, cols, data) = hash_conv_cells(
            self.rows(),
            self.cols(),
            self.as_slice(),
            core_rows,
            core_cols,
        );
        Ok(HashMatrix { rows, cols, data })
    }

    /// Multi-scale fingerprint of this matrix.
    ///
    /// Applies `hash_conv` with a fixed `core_rows x core_cols` window to
    /// the previous hash output repeatedly, shrinking the matrix each pass,
    /// until either dimension drops below the window. Each token maps to the
    /// 1-based depth at which it was first observed; recurrences at deeper
    /// layers keep the original depth. A matrix smaller than the window in
    /// either dimension (or a zero-sized window) yields an empty map.
    #[must_use]
    pub fn hash_cloud(&self, core_rows: usize, core_cols: usize) -> HashMap<String, usize> {
        let mut cloud = HashMap::new();
        if core_rows == 0 || core_cols == 0 {
            return cloud;
        }
        let mut rows = self.rows();
        let mut cols = self.cols();
        let mut cells: Option<Vec<String>> = None;
        let mut depth = 0;
        while rows >= core_rows && cols >= core_cols {
            depth += 1;
            let (r, c, next) = match &cells {
                None => hash_conv_cells(rows, cols, self.as_slice(), core_rows, core_cols),
                Some(tokens) => hash_conv_cells(rows, cols, tokens, core_rows, core_cols),
            };
            rows = r;
            cols = c;
            for token in &next {
                cloud.entry(token.clone()).or_insert(depth);
            }
            cells = Some(next);
        }
        cloud
    }

    /// [`Matrix::hash_cloud`] with the conventional 3x3 window.
    #[must_use]
    pub fn hash_cloud_default(&self) -> HashMap<String, usize> {
        self.hash_cloud(3, 3)
    }
}
