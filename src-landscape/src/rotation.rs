//! Random plane rotations of the peak field
//!
//! A change draws a fresh permutation of the dimension indices and pairs them
//! up; each pair spans a plane in which the peaks are rotated by `theta`.
//! The result is a rigid rotation: distances between peaks are preserved.

use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;

/// Random permutation of `0..dim`, truncated to an even length
///
/// Consecutive entries `(r[2k], r[2k+1])` form the rotation planes. When `dim`
/// is odd the last permuted index is dropped.
pub fn pair_permutation<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Vec<usize> {
    let mut r: Vec<usize> = (0..dim).collect();
    r.shuffle(rng);
    r.truncate(dim - dim % 2);
    r
}

/// Identity matrix with one 2x2 rotation block per index pair
pub fn rotation_matrix(dim: usize, theta: f64, pairs: &[usize]) -> Array2<f64> {
    let (sin, cos) = theta.sin_cos();
    let mut m = Array2::eye(dim);
    for pair in pairs.chunks_exact(2) {
        let (i, j) = (pair[0], pair[1]);
        m[[i, i]] = cos;
        m[[j, j]] = cos;
        m[[i, j]] = -sin;
        m[[j, i]] = sin;
    }
    m
}

/// Right-multiply the positions (peaks x dims) by a freshly drawn rotation
pub fn rotate_positions<R: Rng + ?Sized>(positions: &Array2<f64>, theta: f64, rng: &mut R) -> Array2<f64> {
    let dim = positions.ncols();
    let pairs = pair_permutation(dim, rng);
    positions.dot(&rotation_matrix(dim, theta, &pairs))
}
