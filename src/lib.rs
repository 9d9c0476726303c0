//! convmat: a dense 2-D matrix library with convolution and hashing.
//!
//! Small in-memory matrices of real numbers, typically derived from images,
//! audio samples, or synthetic data, with the operators needed to convolve
//! them, fingerprint them, and fit a convolution kernel by gradient descent.
//!
//! # Features
//!
//! - 1-based cell access, chainable in-place mutation, copy-on-construct
//!   ownership (matrices never alias each other's storage).
//! - Valid 2-D cross-correlation (`conv`), its input adjoint (`dis_conv`),
//!   and the arithmetic around them.
//! - SHA-256 region fingerprinting: whole-matrix `hash`, windowed
//!   `hash_conv`, and the multi-scale `hash_cloud`.
//! - A stateless one-kernel trainer driven by caller-side epochs.
//! - Feature-gated grayscale PNG/JPEG and fixed-header WAV adapters that map
//!   files to and from matrices.
//!
//! # Goals
//!
//! - Prioritize correctness and explicitness: fallible operations return
//!   `Result`, shape rules are enforced, nothing panics in library code.
//! - Keep the numeric core free of I/O; the adapters only produce and
//!   consume matrices.
//!
//! # Modules
//!
//! - [`matrix`] — the core [`Matrix`] type and its operations.
//! - [`hash`] — content fingerprinting and the [`HashMatrix`] token matrix.
//! - [`train`] — gradient-descent convolution-kernel fitting.
//! - [`error`] — the shared [`MatrixError`] type.
//! - [`approx`] — float comparison helpers for tests.
//! - [`image_io`], [`wave`] — the file adapters (features `image`, `wave`).
//!
//! # Example
//!
//! ```rust
//! use convmat::{matrix, train::train_conv_core};
//!
//! let input = matrix![[1.0, 2.0, 3.0], [1.0, 2.0, 3.0], [1.0, 2.0, 3.0]];
//! let target = input.conv(&matrix![[1.0, 2.0], [2.0, 1.0]]).unwrap();
//! let mut core = matrix![[0.0, 0.0], [0.0, 0.0]];
//! for _ in 0..100 {
//!     train_conv_core(&mut core, std::slice::from_ref(&input),
//!                     std::slice::from_ref(&target), 0.01).unwrap();
//! }
//! ```

pub mod approx;
pub mod error;
pub mod hash;
pub mod matrix;
pub mod train;

#[cfg(feature = "image")]
pub mod image_io;

#[cfg(feature = "wave")]
pub mod wave;

pub use error::MatrixError;
pub use hash::HashMatrix;
pub use matrix::Matrix;
