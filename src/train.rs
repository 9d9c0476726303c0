//! Gradient-descent fitting of a single convolution kernel.
//!
//! Stateless procedures over [`Matrix`] values. One full pass over the
//! sample set updates the kernel in place; there is no convergence check and
//! no early stop, repeated epochs are driven by the caller.
//!
//! For each index `n` the update is
//!
//! ```text
//! diff = inputs[n].conv(core) - outputs[n]
//! fix  = inputs[n].conv(diff)
//! core = core - fix * step
//! ```
//!
//! where `step` is `alpha` scaled per [`AlphaMode`]. `fix` is the gradient
//! of `0.5 * sum(diff^2)` with respect to the kernel, so the pass walks the
//! kernel down the squared-error surface.

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// How the learning rate is applied to each per-sample correction.
///
/// Two scalings survive from the library's history; both are kept as
/// explicit modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
    /// Divide `alpha` by the element count of the first target, so the step
    /// size is independent of the output resolution.
    PerElement,
    /// Apply `alpha` as given.
    Flat,
}

fn ensure_parallel(inputs: usize, targets: usize) -> Result<()> {
    if inputs != targets {
        return Err(MatrixError::Shape {
            expected: format!("{inputs} target matrices"),
            actual: format!("{targets}"),
        });
    }
    Ok(())
}

fn step_size(alpha: f64, mode: AlphaMode, first_target: &Matrix) -> f64 {
    match mode {
        AlphaMode::PerElement => alpha / (first_target.rows() * first_target.cols()) as f64,
        AlphaMode::Flat => alpha,
    }
}

/// One training pass over index-aligned `inputs` and expected `outputs`,
/// updating `core` in place with [`AlphaMode::PerElement`] scaling.
///
/// # Errors
///
/// Returns [`MatrixError::Shape`] when the sequences have different lengths,
/// when a core is too large for an input, or when a convolution output does
/// not match the shape of its target.
pub fn train_conv_core(
    core: &mut Matrix,
    inputs: &[Matrix],
    outputs: &[Matrix],
    alpha: f64,
) -> Result<()> {
    train_conv_core_with(core, inputs, outputs, alpha, AlphaMode::PerElement)
}

/// [`train_conv_core`] with an explicit [`AlphaMode`].
///
/// # Errors
///
/// Same conditions as [`train_conv_core`].
pub fn train_conv_core_with(
    core: &mut Matrix,
    inputs: &[Matrix],
    outputs: &[Matrix],
    alpha: f64,
    mode: AlphaMode,
) -> Result<()> {
    ensure_parallel(inputs.len(), outputs.len())?;
    let Some(first) = outputs.first() else {
        return Ok(());
    };
    let step = step_size(alpha, mode, first);
    for (input, target) in inputs.iter().zip(outputs) {
        let mut diff = input.conv(core)?;
        diff.sub_in_place(target)?;
        let mut fix = input.conv(&diff)?;
        fix.scale_in_place(step);
        core.sub_in_place(&fix)?;
    }
    Ok(())
}

/// One training pass from caller-supplied per-sample gradients in place of
/// internally computed differences, normalized by the element count of
/// `gradients[0]`.
///
/// # Errors
///
/// Returns [`MatrixError::Shape`] when the sequences have different lengths,
/// when a gradient is too large to convolve an input with, or when a
/// correction does not match the kernel shape.
pub fn train_conv_core_from_gradients(
    core: &mut Matrix,
    inputs: &[Matrix],
    gradients: &[Matrix],
    alpha: f64,
) -> Result<()> {
    ensure_parallel(inputs.len(), gradients.len())?;
    let Some(first) = gradients.first() else {
        return Ok(());
    };
    let step = step_size(alpha, AlphaMode::PerElement, first);
    for (input, gradient) in inputs.iter().zip(gradients) {
        let mut fix = input.conv(gradient)?;
        fix.scale_in_place(step);
        core.sub_in_place(&fix)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix;

    #[test]
    fn empty_sample_set_is_a_no_op() {
        let mut core = matrix![[1.0, 2.0], [2.0, 1.0]];
        let before = core.clone();
        train_conv_core(&mut core, &[], &[], 0.01).unwrap();
        assert_eq!(core, before);
    }

    #[test]
    fn length_mismatch_is_a_shape_error() {
        let mut core = matrix![[1.0]];
        let input = matrix![[1.0, 2.0], [3.0, 4.0]];
        let err = train_conv_core(&mut core, &[input], &[], 0.01).unwrap_err();
        assert!(matches!(err, MatrixError::Shape { .. }));
    }

    #[test]
    fn flat_mode_takes_a_proportionally_larger_step() {
        let input = matrix![[1.0, 2.0, 3.0], [1.0, 2.0, 3.0], [1.0, 2.0, 3.0]];
        let target = matrix![[0.0, 0.0], [0.0, 0.0]];

        let mut flat = matrix![[1.0, 1.0], [1.0, 1.0]];
        train_conv_core_with(
            &mut flat,
            std::slice::from_ref(&input),
            std::slice::from_ref(&target),
            0.01,
            AlphaMode::Flat,
        )
        .unwrap();

        let mut scaled = matrix![[1.0, 1.0], [1.0, 1.0]];
        train_conv_core(
            &mut scaled,
            std::slice::from_ref(&input),
            std::slice::from_ref(&target),
            0.01,
        )
        .unwrap();

        // the flat update is exactly (target elements) times the scaled one
        let start = matrix![[1.0, 1.0], [1.0, 1.0]];
        let flat_delta = start.sub(&flat).unwrap();
        let scaled_delta = start.sub(&scaled).unwrap();
        assert_eq!(flat_delta, scaled_delta.scale(4.0));
    }
}
