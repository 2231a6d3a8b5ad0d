//! 3x3 matrices for RGB↔XYZ transforms and chromatic adaptation.
//!
//! All arithmetic is f64. Element access is row-major: `m[row][col]`.

use std::ops::{Index, Mul};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3x3 {
    pub m: [[f64; 3]; 3],
}

/// Determinants below this magnitude are treated as singular
const SINGULAR_EPSILON: f64 = 1e-12;

impl Matrix3x3 {
    pub const IDENTITY: Self = Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    #[inline]
    pub const fn new(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    /// Build from three column vectors, as colorant XYZ values are stored
    pub const fn from_columns(c0: [f64; 3], c1: [f64; 3], c2: [f64; 3]) -> Self {
        Self::new([
            [c0[0], c1[0], c2[0]],
            [c0[1], c1[1], c2[1]],
            [c0[2], c1[2], c2[2]],
        ])
    }

    #[inline]
    pub const fn diagonal(d: [f64; 3]) -> Self {
        Self::new([[d[0], 0.0, 0.0], [0.0, d[1], 0.0], [0.0, 0.0, d[2]]])
    }

    /// `M × v`
    #[inline]
    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        std::array::from_fn(|r| self.m[r][0] * v[0] + self.m[r][1] * v[1] + self.m[r][2] * v[2])
    }

    /// `self × rhs`
    pub fn multiply(&self, rhs: &Self) -> Self {
        Self::new(std::array::from_fn(|r| {
            std::array::from_fn(|c| (0..3).map(|k| self.m[r][k] * rhs.m[k][c]).sum())
        }))
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse by cofactors, or `None` when the matrix is singular
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let m = &self.m;
        // cofactor(r, c) of the transposed matrix gives the adjugate directly
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        let adj = [
            [cof(1, 2, 1, 2), -cof(0, 2, 1, 2), cof(0, 1, 1, 2)],
            [-cof(1, 2, 0, 2), cof(0, 2, 0, 2), -cof(0, 1, 0, 2)],
            [cof(1, 2, 0, 1), -cof(0, 2, 0, 1), cof(0, 1, 0, 1)],
        ];
        Some(Self::new(adj.map(|row| row.map(|v| v / det))))
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for Matrix3x3 {
    type Output = [f64; 3];

    fn index(&self, row: usize) -> &Self::Output {
        &self.m[row]
    }
}

impl Mul for Matrix3x3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl Mul<[f64; 3]> for Matrix3x3 {
    type Output = [f64; 3];

    fn mul(self, rhs: [f64; 3]) -> Self::Output {
        self.apply(rhs)
    }
}
