//! Element-wise result checks with a fixed absolute tolerance.

use std::fmt;

/// Largest absolute difference still treated as equal.
pub const TOLERANCE: f64 = 1e-6;

/// The first element that failed a check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub index: usize,
    pub actual: f64,
    pub expected: f64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mismatch at index {}: {} vs {} (tolerance {:e})",
            self.index, self.actual, self.expected, TOLERANCE
        )
    }
}

#[inline]
fn within(actual: f64, expected: f64) -> bool {
    // NaN fails this comparison, which is what we want.
    (actual - expected).abs() <= TOLERANCE
}

/// Compare two result buffers element by element.
///
/// A length difference counts as a mismatch at the first index past the
/// shorter buffer, reported as NaN on the missing side.
pub fn verify_pair(actual: &[f64], expected: &[f64]) -> Result<(), Mismatch> {
    if let Some((index, (&a, &e))) = actual
        .iter()
        .zip(expected)
        .enumerate()
        .find(|(_, (a, e))| !within(**a, **e))
    {
        return Err(Mismatch {
            index,
            actual: a,
            expected: e,
        });
    }

    if actual.len() != expected.len() {
        let index = actual.len().min(expected.len());
        return Err(Mismatch {
            index,
            actual: actual.get(index).copied().unwrap_or(f64::NAN),
            expected: expected.get(index).copied().unwrap_or(f64::NAN),
        });
    }
    Ok(())
}

/// Check that every element equals `expected`.
pub fn verify_scalar(actual: &[f64], expected: f64) -> Result<(), Mismatch> {
    match actual.iter().position(|&a| !within(a, expected)) {
        Some(index) => Err(Mismatch {
            index,
            actual: actual[index],
            expected,
        }),
        None => Ok(()),
    }
}
