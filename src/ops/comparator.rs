//! Ordering predicates for top-k reductions
//!
//! A [`Comparator`] decides whether one position along the reduction axis ranks
//! ahead of another. Each position is presented as a tuple with one [`Scalar`]
//! per co-indexed operand, in operand order.
//!
//! The predicate must be a strict order (irreflexive and transitive) and must
//! not have side effects: it is called concurrently from independent windows.
//! Neither property is checked.

use crate::dtype::Scalar;
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Strict "ranks ahead of" predicate over operand tuples
///
/// Any `Fn(&[Scalar], &[Scalar]) -> bool + Sync` closure is a comparator:
///
/// ```
/// # use numr_approx_topk::dtype::Scalar;
/// # use numr_approx_topk::ops::Comparator;
/// let by_abs = |a: &[Scalar], b: &[Scalar]| a[0].to_f64().abs() > b[0].to_f64().abs();
/// assert!(by_abs.greater(&[Scalar::F32(-3.0)], &[Scalar::F32(2.0)]));
/// ```
pub trait Comparator: Sync {
    /// Returns true if `lhs` ranks strictly ahead of `rhs`.
    fn greater(&self, lhs: &[Scalar], rhs: &[Scalar]) -> bool;

    /// Check that the comparator can read tuples of `num_operands` scalars.
    ///
    /// Called once before any reduction work. Closures are trusted.
    fn validate(&self, num_operands: usize) -> Result<()> {
        let _ = num_operands;
        Ok(())
    }

    /// Total order derived from [`Self::greater`]: `Less` means `lhs` ranks first.
    ///
    /// Tuples that neither side ranks ahead of compare `Equal`.
    fn rank_order(&self, lhs: &[Scalar], rhs: &[Scalar]) -> Ordering {
        if self.greater(lhs, rhs) {
            Ordering::Less
        } else if self.greater(rhs, lhs) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl<F> Comparator for F
where
    F: Fn(&[Scalar], &[Scalar]) -> bool + Sync,
{
    #[inline]
    fn greater(&self, lhs: &[Scalar], rhs: &[Scalar]) -> bool {
        self(lhs, rhs)
    }
}

fn check_operand(operand: usize, num_operands: usize) -> Result<()> {
    if operand >= num_operands {
        return Err(Error::invalid_argument(
            "comparator",
            format!("operand {operand} is out of range for {num_operands} operands"),
        ));
    }
    Ok(())
}

/// Numeric greater-than on one operand (top-k of the largest values)
///
/// NaN never ranks ahead of anything and nothing ranks ahead of NaN.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Greater {
    operand: usize,
}

impl Greater {
    /// Order by the values of operand `operand`
    pub fn new(operand: usize) -> Self {
        Self { operand }
    }
}

impl Comparator for Greater {
    fn validate(&self, num_operands: usize) -> Result<()> {
        check_operand(self.operand, num_operands)
    }

    #[inline]
    fn greater(&self, lhs: &[Scalar], rhs: &[Scalar]) -> bool {
        lhs[self.operand].compare(&rhs[self.operand]) == Some(Ordering::Greater)
    }
}

/// Numeric less-than on one operand (top-k of the smallest values)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Less {
    operand: usize,
}

impl Less {
    /// Order by the values of operand `operand`
    pub fn new(operand: usize) -> Self {
        Self { operand }
    }
}

impl Comparator for Less {
    fn validate(&self, num_operands: usize) -> Result<()> {
        check_operand(self.operand, num_operands)
    }

    #[inline]
    fn greater(&self, lhs: &[Scalar], rhs: &[Scalar]) -> bool {
        lhs[self.operand].compare(&rhs[self.operand]) == Some(Ordering::Less)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greater_uses_selected_operand() {
        let cmp = Greater::new(1);
        let a = [Scalar::F32(0.0), Scalar::I32(5)];
        let b = [Scalar::F32(9.0), Scalar::I32(4)];
        assert!(cmp.greater(&a, &b));
        assert!(!cmp.greater(&b, &a));
    }

    #[test]
    fn test_less_prefers_smaller() {
        let cmp = Less::default();
        assert!(cmp.greater(&[Scalar::F64(-1.0)], &[Scalar::F64(2.0)]));
        assert!(!cmp.greater(&[Scalar::F64(2.0)], &[Scalar::F64(2.0)]));
    }

    #[test]
    fn test_nan_is_never_greater() {
        let cmp = Greater::default();
        let nan = [Scalar::F32(f32::NAN)];
        let one = [Scalar::F32(1.0)];
        assert!(!cmp.greater(&nan, &one));
        assert!(!cmp.greater(&one, &nan));
        assert_eq!(cmp.rank_order(&nan, &one), Ordering::Equal);
    }

    #[test]
    fn test_rank_order() {
        let cmp = Greater::default();
        let hi = [Scalar::I64(10)];
        let lo = [Scalar::I64(-10)];
        assert_eq!(cmp.rank_order(&hi, &lo), Ordering::Less);
        assert_eq!(cmp.rank_order(&lo, &hi), Ordering::Greater);
        assert_eq!(cmp.rank_order(&hi, &hi), Ordering::Equal);
    }

    #[test]
    fn test_validate_operand_range() {
        assert!(Greater::new(1).validate(2).is_ok());
        assert!(Greater::new(1).validate(1).unwrap_err().is_invalid_argument());
        assert!(Less::new(0).validate(1).is_ok());
        assert!(Less::new(3).validate(3).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_closure_comparator_skips_validation() {
        let first = |a: &[Scalar], b: &[Scalar]| a[0].compare(&b[0]) == Some(Ordering::Greater);
        assert!(first.validate(0).is_ok());
    }

    #[test]
    fn test_closure_comparator() {
        let lexicographic = |a: &[Scalar], b: &[Scalar]| match a[0].compare(&b[0]) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => a[1].compare(&b[1]) == Some(Ordering::Less),
            _ => false,
        };
        let a = [Scalar::F32(1.0), Scalar::I64(3)];
        let b = [Scalar::F32(1.0), Scalar::I64(7)];
        assert!(lexicographic.greater(&a, &b));
        assert!(!lexicographic.greater(&b, &a));
    }
}
