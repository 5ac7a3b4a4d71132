//! File size predicate, `[+-]<digits><unit>`.

use crate::size::{self, SizeError};
use std::str::FromStr;

/// Comparison applied against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeOp {
    /// `-`: value at most the threshold.
    AtMost,
    /// No sign: value equal to the threshold.
    Exact,
    /// `+`: value at least the threshold.
    AtLeast,
}

/// A signed size comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePredicate {
    /// Comparison mode.
    pub op: SizeOp,

    /// Threshold in bytes.
    pub threshold: u64,
}

impl SizePredicate {
    /// Creates a predicate.
    pub fn new(op: SizeOp, threshold: u64) -> Self {
        Self { op, threshold }
    }

    /// Applies the predicate to a size in bytes.
    pub fn matches(&self, value: u64) -> bool {
        match self.op {
            SizeOp::AtMost => value <= self.threshold,
            SizeOp::Exact => value == self.threshold,
            SizeOp::AtLeast => value >= self.threshold,
        }
    }
}

impl FromStr for SizePredicate {
    type Err = SizeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (op, rest) = if let Some(rest) = input.strip_prefix('+') {
            (SizeOp::AtLeast, rest)
        } else if let Some(rest) = input.strip_prefix('-') {
            (SizeOp::AtMost, rest)
        } else {
            (SizeOp::Exact, input)
        };

        Ok(Self::new(op, size::parse(rest)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact() {
        let p = SizePredicate::new(SizeOp::Exact, 1024);
        assert!(!p.matches(1023));
        assert!(p.matches(1024));
        assert!(!p.matches(1025));
    }

    #[test]
    fn at_most() {
        let p = SizePredicate::new(SizeOp::AtMost, 1024);
        assert!(p.matches(1023));
        assert!(p.matches(1024));
        assert!(!p.matches(1025));
    }

    #[test]
    fn at_least() {
        let p = SizePredicate::new(SizeOp::AtLeast, 1024);
        assert!(!p.matches(1023));
        assert!(p.matches(1024));
        assert!(p.matches(1025));
    }

    #[test]
    fn parses_sign_and_unit() {
        let cases = [
            ("1k", SizePredicate::new(SizeOp::Exact, 1000)),
            ("+1ki", SizePredicate::new(SizeOp::AtLeast, 1024)),
            ("-500mb", SizePredicate::new(SizeOp::AtMost, 500_000_000)),
            ("+0", SizePredicate::new(SizeOp::AtLeast, 0)),
        ];
        for (input, expected) in cases {
            assert_eq!(input.parse::<SizePredicate>().unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn rejects_double_sign_and_garbage() {
        assert!("+-5".parse::<SizePredicate>().is_err());
        assert!("5 parsecs".parse::<SizePredicate>().is_err());
    }
}
