// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Connection Matrix
// ─────────────────────────────────────────────────────────────────────
//! Symmetric N×N affinity table stored as a flat row-major buffer.
//!
//! Invariants maintained by every mutator:
//!   - entries in [0, 1] (NaN maps to 0, Inf to the nearest bound)
//!   - `conn[i][j] == conn[j][i]`
//!   - zero diagonal

use serde::{Deserialize, Serialize};

use crate::error::AffinityError;

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_unit(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_unit: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        return if value > 0.0 { hi } else { lo };
    }
    value.clamp(lo, hi)
}

/// Pairwise affinity between agents, n×n row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<f64>>", try_from = "Vec<Vec<f64>>")]
pub struct ConnectionMatrix {
    n: usize,
    data: Vec<f64>,
}

impl ConnectionMatrix {
    /// All-zero matrix for `n` agents.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Number of agents (rows).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Write `value` to both `[i][j]` and `[j][i]`, clamped to [0, 1].
    ///
    /// Writes to the diagonal are ignored.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        if i == j {
            return;
        }
        let v = clamp_unit(value, 0.0, 1.0);
        self.data[i * self.n + j] = v;
        self.data[j * self.n + i] = v;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Raw row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Number of unordered pairs with affinity strictly above `threshold`.
    pub fn link_count(&self, threshold: f64) -> usize {
        let n = self.n;
        let mut count = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                if self.data[i * n + j] > threshold {
                    count += 1;
                }
            }
        }
        count
    }

    /// Mean of the upper-triangle entries (0 when n < 2).
    pub fn mean_off_diagonal(&self) -> f64 {
        let n = self.n;
        if n < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                sum += self.data[i * n + j];
            }
        }
        sum / (n * (n - 1) / 2) as f64
    }

    /// Check range, symmetry and zero diagonal within `tol`.
    pub fn is_valid(&self, tol: f64) -> bool {
        let n = self.n;
        for i in 0..n {
            if self.data[i * n + i].abs() > tol {
                return false;
            }
            for j in (i + 1)..n {
                let a = self.data[i * n + j];
                let b = self.data[j * n + i];
                if (a - b).abs() > tol || !(-tol..=1.0 + tol).contains(&a) {
                    return false;
                }
            }
        }
        true
    }

    /// Largest absolute entry-wise difference to `other`.
    ///
    /// Returns `None` when the sizes differ.
    pub fn max_abs_diff(&self, other: &Self) -> Option<f64> {
        if self.n != other.n {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(other.data.iter())
                .fold(0.0f64, |m, (a, b)| m.max((a - b).abs())),
        )
    }
}

impl From<ConnectionMatrix> for Vec<Vec<f64>> {
    fn from(m: ConnectionMatrix) -> Self {
        if m.n == 0 {
            return Vec::new();
        }
        m.data.chunks(m.n).map(<[f64]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for ConnectionMatrix {
    type Error = AffinityError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        let n = rows.len();
        let mut m = Self::zeros(n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(AffinityError::dimension(
                    format!("connection row {i}"),
                    n,
                    row.len(),
                ));
            }
            for (j, &v) in row.iter().enumerate() {
                if i != j {
                    m.data[i * n + j] = clamp_unit(v, 0.0, 1.0);
                }
            }
        }
        if !m.is_valid(1e-9) {
            return Err(AffinityError::Validation(
                "connection matrix is not symmetric".to_string(),
            ));
        }
        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_symmetric_and_clamped() {
        let mut m = ConnectionMatrix::zeros(3);
        m.set(0, 2, 1.7);
        m.set(1, 0, -0.4);
        assert_eq!(m.get(0, 2), 1.0);
        assert_eq!(m.get(2, 0), 1.0);
        assert_eq!(m.get(0, 1), 0.0);
        assert!(m.is_valid(1e-12));
    }

    #[test]
    fn test_diagonal_stays_zero() {
        let mut m = ConnectionMatrix::zeros(2);
        m.set(1, 1, 0.9);
        assert_eq!(m.get(1, 1), 0.0);
    }

    #[test]
    fn test_nan_clamps_to_zero() {
        let mut m = ConnectionMatrix::zeros(2);
        m.set(0, 1, f64::NAN);
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn test_link_count_strict() {
        let mut m = ConnectionMatrix::zeros(3);
        m.set(0, 1, 0.5);
        m.set(1, 2, 0.3);
        assert_eq!(m.link_count(0.3), 1);
        assert_eq!(m.link_count(0.29), 2);
        assert_eq!(m.link_count(0.5), 0);
    }

    #[test]
    fn test_mean_off_diagonal() {
        let mut m = ConnectionMatrix::zeros(3);
        m.set(0, 1, 0.6);
        m.set(0, 2, 0.3);
        assert!((m.mean_off_diagonal() - 0.3).abs() < 1e-12);
        assert_eq!(ConnectionMatrix::zeros(1).mean_off_diagonal(), 0.0);
    }

    #[test]
    fn test_serde_nested_rows() {
        let mut m = ConnectionMatrix::zeros(2);
        m.set(0, 1, 0.25);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "[[0.0,0.25],[0.25,0.0]]");
        let back: ConnectionMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_deserialize_rejects_ragged() {
        let err = serde_json::from_str::<ConnectionMatrix>("[[0.0,0.1],[0.1]]");
        assert!(err.is_err());
    }

    #[test]
    fn test_deserialize_rejects_asymmetric() {
        let err = serde_json::from_str::<ConnectionMatrix>("[[0.0,0.1],[0.4,0.0]]");
        assert!(err.is_err());
    }
}
