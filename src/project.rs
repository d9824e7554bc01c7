//! Projection engine: 3-component principal-axis projection of the embedding
//! matrix.
//!
//! Each embedding dimension is standardized (zero mean, unit variance), the
//! covariance matrix of the standardized data is formed, and the top three
//! eigenvectors are extracted by power iteration with deflation. Every
//! vocabulary word is then projected onto those axes.
//!
//! The computation is deterministic for a given matrix: the iteration starts
//! from a fixed (index-derived) vector, so repeated calls return identical
//! coordinates. The *sign* of a principal axis is still an arbitrary
//! convention — eigenvectors are defined up to sign — and callers (and tests)
//! must not rely on it beyond consistency within one crate version.

use serde::Serialize;
use tracing::debug;

use crate::embedding::EmbeddingMatrix;
use crate::error::{Error, Result};

/// A vocabulary word positioned in the 3-component projection space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    /// Vocabulary word.
    pub word: String,
    /// Coordinate on the first principal axis.
    pub pc1: f32,
    /// Coordinate on the second principal axis.
    pub pc2: f32,
    /// Coordinate on the third principal axis.
    pub pc3: f32,
}

/// Power iteration sweep count per component.
const POWER_ITERATIONS: usize = 300;

/// Variance below this is treated as a constant dimension.
const VARIANCE_FLOOR: f64 = 1e-12;

/// Project every row of `matrix` onto its top 3 principal axes.
///
/// # Errors
///
/// [`Error::DegenerateInput`] when the matrix has fewer than 3 rows or fewer
/// than 3 dimensions with non-zero variance — there is no meaningful
/// 3-component structure to extract.
pub fn project(matrix: &EmbeddingMatrix) -> Result<Vec<ProjectedPoint>> {
    let n = matrix.len();
    let d = matrix.dim();

    if n < 3 {
        return Err(Error::DegenerateInput {
            reason: "fewer than 3 vocabulary words",
        });
    }

    // Standardize: zero mean, unit variance per dimension. Constant
    // dimensions are centered but left unscaled.
    let mut means = vec![0.0f64; d];
    for row in matrix.vectors() {
        for (m, &v) in means.iter_mut().zip(row.iter()) {
            *m += f64::from(v);
        }
    }
    for m in &mut means {
        *m /= n as f64;
    }

    let mut variances = vec![0.0f64; d];
    for row in matrix.vectors() {
        for j in 0..d {
            let dev = f64::from(row[j]) - means[j];
            variances[j] += dev * dev;
        }
    }
    for v in &mut variances {
        *v /= (n - 1) as f64;
    }

    let live_dims = variances.iter().filter(|&&v| v > VARIANCE_FLOOR).count();
    if live_dims < 3 {
        return Err(Error::DegenerateInput {
            reason: "fewer than 3 non-zero-variance dimensions",
        });
    }

    let standardized: Vec<Vec<f64>> = matrix
        .vectors()
        .iter()
        .map(|row| {
            (0..d)
                .map(|j| {
                    let centered = f64::from(row[j]) - means[j];
                    if variances[j] > VARIANCE_FLOOR {
                        centered / variances[j].sqrt()
                    } else {
                        centered
                    }
                })
                .collect()
        })
        .collect();

    // Covariance of the standardized data.
    let mut cov = vec![vec![0.0f64; d]; d];
    for row in &standardized {
        for i in 0..d {
            for j in i..d {
                cov[i][j] += row[i] * row[j];
            }
        }
    }
    let denom = (n - 1) as f64;
    for i in 0..d {
        for j in i..d {
            cov[i][j] /= denom;
            cov[j][i] = cov[i][j];
        }
    }

    // Top 3 eigenvectors by power iteration with deflation.
    let mut axes: Vec<Vec<f64>> = Vec::with_capacity(3);
    for c in 0..3 {
        let axis = dominant_eigenvector(&cov, &axes, c);
        let lambda = quadratic_form(&cov, &axis);
        deflate(&mut cov, &axis, lambda);
        debug!(component = c + 1, eigenvalue = lambda, "extracted principal axis");
        axes.push(axis);
    }

    Ok(matrix
        .words()
        .iter()
        .zip(standardized.iter())
        .map(|(word, row)| ProjectedPoint {
            word: word.clone(),
            pc1: dot(row, &axes[0]) as f32,
            pc2: dot(row, &axes[1]) as f32,
            pc3: dot(row, &axes[2]) as f32,
        })
        .collect())
}

/// Power iteration for the dominant eigenvector of `cov`, kept orthogonal to
/// the already-extracted axes.
///
/// The starting vector is derived from the component index, not an RNG, so
/// the whole projection is reproducible without seed plumbing.
fn dominant_eigenvector(cov: &[Vec<f64>], previous: &[Vec<f64>], component: usize) -> Vec<f64> {
    let d = cov.len();

    let mut v: Vec<f64> = (0..d)
        .map(|i| 1.0 + ((i + 7 * component + 1) as f64 * 0.123).sin())
        .collect();
    orthogonalize(&mut v, previous);
    if !normalize(&mut v) {
        // Degenerate start (orthogonal complement hit exactly); fall back to a
        // unit basis vector outside the span of the previous axes.
        v = vec![0.0; d];
        v[component.min(d - 1)] = 1.0;
        orthogonalize(&mut v, previous);
        normalize(&mut v);
    }

    for _ in 0..POWER_ITERATIONS {
        let mut next = mat_vec(cov, &v);
        // Re-orthogonalize each sweep so deflation round-off cannot drift the
        // iterate back toward an earlier axis.
        orthogonalize(&mut next, previous);
        if !normalize(&mut next) {
            // cov annihilates the remaining subspace (rank-deficient input);
            // the current orthonormal iterate is as good an axis as any.
            break;
        }
        let converged = dot(&next, &v).abs() > 1.0 - 1e-12;
        v = next;
        if converged {
            break;
        }
    }

    v
}

fn mat_vec(m: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    m.iter().map(|row| dot(row, v)).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn quadratic_form(m: &[Vec<f64>], v: &[f64]) -> f64 {
    dot(v, &mat_vec(m, v))
}

/// Remove the components of `v` along each of `axes`.
fn orthogonalize(v: &mut [f64], axes: &[Vec<f64>]) {
    for axis in axes {
        let overlap = dot(v, axis);
        for (x, &a) in v.iter_mut().zip(axis.iter()) {
            *x -= overlap * a;
        }
    }
}

/// Scale `v` to unit length. Returns false (leaving `v` untouched) when its
/// norm is numerically zero.
fn normalize(v: &mut [f64]) -> bool {
    let norm = dot(v, v).sqrt();
    if norm < 1e-12 {
        return false;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
    true
}

/// Subtract `lambda * v v^T` from `m` (matrix deflation).
fn deflate(m: &mut [Vec<f64>], v: &[f64], lambda: f64) {
    let d = m.len();
    for i in 0..d {
        for j in 0..d {
            m[i][j] -= lambda * v[i] * v[j];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<(&str, Vec<f32>)>) -> EmbeddingMatrix {
        EmbeddingMatrix::new(
            rows.into_iter()
                .map(|(w, v)| (w.to_string(), v))
                .collect(),
        )
        .unwrap()
    }

    fn spread_matrix() -> EmbeddingMatrix {
        // Variance mostly along the first input dimension, then the second,
        // then the third; the fourth is constant.
        matrix(vec![
            ("a", vec![-9.0, 1.0, 0.2, 5.0]),
            ("b", vec![-3.0, -1.5, -0.1, 5.0]),
            ("c", vec![2.0, 0.5, 0.3, 5.0]),
            ("d", vec![4.0, -2.0, -0.4, 5.0]),
            ("e", vec![9.0, 2.0, 0.1, 5.0]),
            ("f", vec![-5.0, 1.2, -0.2, 5.0]),
        ])
    }

    #[test]
    fn test_project_deterministic() {
        let m = spread_matrix();
        let a = project(&m).unwrap();
        let b = project(&m).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_project_point_per_word() {
        let m = spread_matrix();
        let points = project(&m).unwrap();
        assert_eq!(points.len(), m.len());
        for (point, word) in points.iter().zip(m.words()) {
            assert_eq!(&point.word, word);
        }
    }

    #[test]
    fn test_project_axis_variance_ordering() {
        let points = project(&spread_matrix()).unwrap();
        let n = points.len() as f32;

        let var = |f: &dyn Fn(&ProjectedPoint) -> f32| {
            let mean: f32 = points.iter().map(|p| f(p)).sum::<f32>() / n;
            points.iter().map(|p| (f(p) - mean).powi(2)).sum::<f32>() / n
        };

        let v1 = var(&|p: &ProjectedPoint| p.pc1);
        let v2 = var(&|p: &ProjectedPoint| p.pc2);
        let v3 = var(&|p: &ProjectedPoint| p.pc3);

        assert!(v1 >= v2 - 1e-4);
        assert!(v2 >= v3 - 1e-4);
        assert!(v1 > 0.0);
    }

    #[test]
    fn test_project_separated_groups_stay_separated() {
        // Two tight groups far apart stay far apart in projection space.
        let m = matrix(vec![
            ("a", vec![0.0, 0.0, 0.1, 0.3]),
            ("b", vec![0.1, 0.1, 0.0, 0.2]),
            ("c", vec![10.0, 10.0, 9.9, 10.3]),
            ("d", vec![10.1, 9.9, 10.1, 10.1]),
        ]);
        let points = project(&m).unwrap();

        let dist = |a: &ProjectedPoint, b: &ProjectedPoint| {
            ((a.pc1 - b.pc1).powi(2) + (a.pc2 - b.pc2).powi(2) + (a.pc3 - b.pc3).powi(2)).sqrt()
        };

        let within = dist(&points[0], &points[1]).max(dist(&points[2], &points[3]));
        let between = dist(&points[0], &points[2]);
        assert!(between > within * 3.0);
    }

    #[test]
    fn test_project_too_few_rows() {
        let m = matrix(vec![
            ("a", vec![0.0, 1.0, 2.0]),
            ("b", vec![1.0, 0.0, 2.0]),
        ]);
        assert!(matches!(project(&m), Err(Error::DegenerateInput { .. })));
    }

    #[test]
    fn test_project_too_few_live_dimensions() {
        // Only two dimensions vary.
        let m = matrix(vec![
            ("a", vec![0.0, 1.0, 7.0]),
            ("b", vec![1.0, 0.0, 7.0]),
            ("c", vec![2.0, 3.0, 7.0]),
            ("d", vec![3.0, 2.0, 7.0]),
        ]);
        assert!(matches!(
            project(&m),
            Err(Error::DegenerateInput {
                reason: "fewer than 3 non-zero-variance dimensions"
            })
        ));
    }
}
