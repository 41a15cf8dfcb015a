use std::cmp::Ordering;

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use thiserror::Error;
use tokviz_types::PROJECTED_DIM;

#[derive(Debug, Error, PartialEq)]
pub enum ReduceError {
    #[error("non-finite value in {stage}")]
    NonFinite { stage: &'static str },
    #[error("row {row} has {actual} components; expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Fit PCA on `rows` and project them onto the top three principal axes.
///
/// Columns come out in decreasing explained variance. Each axis is
/// sign-normalized so its largest-magnitude entry is positive. Axes past the
/// numerical rank of the centered data (at most `min(n - 1, d)`) are
/// zero-padded, so fewer than two rows project to the origin.
pub fn project(rows: &[Vec<f64>]) -> Result<Vec<[f64; PROJECTED_DIM]>, ReduceError> {
    let n = rows.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let d = rows[0].len();
    for (row, r) in rows.iter().enumerate() {
        if r.len() != d {
            return Err(ReduceError::Shape {
                row,
                expected: d,
                actual: r.len(),
            });
        }
    }
    if rows.iter().flatten().any(|x| !x.is_finite()) {
        return Err(ReduceError::NonFinite { stage: "input" });
    }

    let data = DMatrix::from_fn(n, d, |r, c| rows[r][c]);
    let mean: Vec<f64> = (0..d).map(|c| data.column(c).mean()).collect();
    let mut centered = data;
    for r in 0..n {
        for c in 0..d {
            centered[(r, c)] -= mean[c];
        }
    }

    let axes = principal_axes(&centered)?;

    let mut projected = Vec::with_capacity(n);
    for r in 0..n {
        let row = centered.row(r);
        let mut point = [0.0_f64; PROJECTED_DIM];
        for (k, axis) in axes.iter().enumerate() {
            if let Some(axis) = axis {
                point[k] = row.iter().zip(axis.iter()).map(|(a, b)| a * b).sum::<f64>();
            }
        }
        if point.iter().any(|x| !x.is_finite()) {
            return Err(ReduceError::NonFinite { stage: "projection" });
        }
        projected.push(point);
    }
    Ok(projected)
}

/// Top principal axes of already-centered data; `None` marks a zero-padded axis.
fn principal_axes(
    centered: &DMatrix<f64>,
) -> Result<[Option<DVector<f64>>; PROJECTED_DIM], ReduceError> {
    let (n, d) = centered.shape();
    let mut axes: [Option<DVector<f64>>; PROJECTED_DIM] = Default::default();
    if n < 2 || d == 0 {
        return Ok(axes);
    }

    let cov = (centered.transpose() * centered) / (n as f64 - 1.0);
    let eigen = SymmetricEigen::new(cov);
    if eigen.eigenvalues.iter().any(|v| !v.is_finite()) {
        return Err(ReduceError::NonFinite { stage: "eigendecomposition" });
    }

    let mut pairs: Vec<(f64, usize)> = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();
    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let lambda_max = pairs[0].0.max(0.0);
    let tol = lambda_max * d as f64 * f64::EPSILON;
    let rank = (n - 1).min(d);

    for (k, &(lambda, idx)) in pairs.iter().take(rank.min(PROJECTED_DIM)).enumerate() {
        if lambda <= tol {
            break;
        }
        let mut axis = eigen.eigenvectors.column(idx).into_owned();
        let pivot = axis
            .iter()
            .copied()
            .max_by(|a, b| a.abs().partial_cmp(&b.abs()).unwrap_or(Ordering::Equal))
            .unwrap_or(0.0);
        if pivot < 0.0 {
            axis = -axis;
        }
        axes[k] = Some(axis);
    }
    Ok(axes)
}
