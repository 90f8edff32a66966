//! Dash pattern configuration.
//!
//! A validated list of dash/gap pairs, buildable from lengths or parsed from
//! an SVG `stroke-dasharray` value, and applied to a dash generator with
//! [`VcgenDash::set_pattern`](crate::vcgen_dash::VcgenDash::set_pattern).

use core::str::FromStr;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Maximum number of dash/gap pairs a dash generator holds.
pub const MAX_DASH_PAIRS: usize = 32;

#[non_exhaustive]
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum DashPatternError {
    #[error("Dash pattern is empty.")]
    Empty,
    #[error("Dash length {value} at index {index} is negative.")]
    Negative { index: usize, value: f64 },
    #[error("Dash length at index {index} is not finite.")]
    NotFinite { index: usize },
    #[error("Dash pattern has a total length of zero.")]
    ZeroLength,
    #[error("Dash pattern has {count} dash/gap pairs, at most 32 are supported.")]
    TooManyDashes { count: usize },
    #[error("Expected number, got {src:?}.")]
    Number { src: String },
}

/// An ordered list of `(dash, gap)` lengths.
///
/// Every length is finite and non-negative and there are at most
/// [`MAX_DASH_PAIRS`] pairs, so applying a pattern never hits the
/// generator's silent capacity limit.
///
/// Patterns built by [`from_lengths`](Self::from_lengths), parsing or
/// deserialization also have a strictly positive total length. One built
/// up with [`new`](Self::new) and [`push`](Self::push) may still be empty
/// or all zero; a dash generator given such a pattern emits nothing.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serialization",
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct DashPattern {
    pairs: Vec<(f64, f64)>,
}

impl DashPattern {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Build a pattern from alternating dash and gap lengths.
    ///
    /// Follows SVG `stroke-dasharray`: a list with an odd number of values
    /// is repeated once to make it even, so `[5, 3, 2]` means
    /// `5 3 2 5 3 2`.
    pub fn from_lengths(lengths: &[f64]) -> Result<Self, DashPatternError> {
        if lengths.is_empty() {
            return Err(DashPatternError::Empty);
        }
        for (index, &value) in lengths.iter().enumerate() {
            check_length(index, value)?;
        }

        let repeated;
        let lengths = if lengths.len() % 2 == 1 {
            repeated = [lengths, lengths].concat();
            &repeated[..]
        } else {
            lengths
        };

        let count = lengths.len() / 2;
        if count > MAX_DASH_PAIRS {
            return Err(DashPatternError::TooManyDashes { count });
        }

        let pattern = Self {
            pairs: lengths.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
        };
        if pattern.total_len() <= 0.0 {
            return Err(DashPatternError::ZeroLength);
        }
        Ok(pattern)
    }

    /// Append one dash/gap pair. Zero lengths are accepted here, check
    /// [`total_len`](Self::total_len) before relying on the result.
    pub fn push(&mut self, dash_len: f64, gap_len: f64) -> Result<(), DashPatternError> {
        if self.pairs.len() >= MAX_DASH_PAIRS {
            return Err(DashPatternError::TooManyDashes {
                count: self.pairs.len() + 1,
            });
        }
        let index = self.pairs.len() * 2;
        check_length(index, dash_len)?;
        check_length(index + 1, gap_len)?;
        self.pairs.push((dash_len, gap_len));
        Ok(())
    }

    pub fn pairs(&self) -> &[(f64, f64)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Length of one full period of the pattern.
    pub fn total_len(&self) -> f64 {
        self.pairs.iter().map(|&(d, g)| d + g).sum()
    }
}

fn check_length(index: usize, value: f64) -> Result<(), DashPatternError> {
    if !value.is_finite() {
        return Err(DashPatternError::NotFinite { index });
    }
    if value < 0.0 {
        return Err(DashPatternError::Negative { index, value });
    }
    Ok(())
}

impl FromStr for DashPattern {
    type Err = DashPatternError;

    /// Parse a comma and/or whitespace separated list of lengths.
    fn from_str(src: &str) -> Result<Self, DashPatternError> {
        let lengths = src
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<f64>().map_err(|_| DashPatternError::Number {
                    src: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        Self::from_lengths(&lengths)
    }
}

impl TryFrom<Vec<f64>> for DashPattern {
    type Error = DashPatternError;

    fn try_from(lengths: Vec<f64>) -> Result<Self, DashPatternError> {
        Self::from_lengths(&lengths)
    }
}

impl From<DashPattern> for Vec<f64> {
    fn from(pattern: DashPattern) -> Vec<f64> {
        pattern.pairs.iter().flat_map(|&(d, g)| [d, g]).collect()
    }
}
