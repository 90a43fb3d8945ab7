// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Affinity Kernel failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AffinityError {
    /// Malformed input: empty populations, zero counts, out-of-range values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Two vectors that must share a dimension do not.
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in input vectors).
    #[error("numerical error: {0}")]
    Numerical(String),

    /// A cycle-boundary checkpoint requested termination.
    #[error("simulation cancelled after {completed_cycles} cycles")]
    Cancelled { completed_cycles: usize },
}

impl AffinityError {
    /// Shorthand for [`AffinityError::DimensionMismatch`].
    pub fn dimension(context: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            found,
        }
    }
}

pub type AffinityResult<T> = Result<T, AffinityError>;

/// Check that every vector in `vectors` has length `dimension` and only
/// finite coordinates.
///
/// `label` names the collection in error messages ("agent", "topic", ...).
pub fn check_vectors<'a, I>(vectors: I, dimension: usize, label: &str) -> AffinityResult<()>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    for (idx, v) in vectors.into_iter().enumerate() {
        if v.len() != dimension {
            return Err(AffinityError::dimension(
                format!("{label} {idx}"),
                dimension,
                v.len(),
            ));
        }
        if v.iter().any(|x| !x.is_finite()) {
            return Err(AffinityError::Numerical(format!(
                "{label} {idx} contains NaN or Inf"
            )));
        }
    }
    Ok(())
}
