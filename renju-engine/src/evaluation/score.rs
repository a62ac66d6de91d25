//! `Evaluation`: a signed search score with asymmetric bounds (so negating
//! the minimum never overflows) and mate-distance-aware `Display`.

use std::fmt;
use std::ops::{Add, Neg, Sub};

pub const WIN_SCORE: i32 = 1_000_000;
pub const INF: i32 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Evaluation(i32);

impl Evaluation {
    pub fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> i32 {
        self.0
    }

    /// The smallest representable score. One above `i32::MIN`'s negation
    /// headroom would still overflow on `Neg`, so this is capped at `-INF`
    /// instead of `i32::MIN`.
    pub fn min_val() -> Self {
        Self(-INF)
    }

    pub fn max_val() -> Self {
        Self(INF)
    }

    /// True for a forced win, at any mate distance.
    pub fn is_positive_mate(self) -> bool {
        self.0 >= WIN_SCORE - 1000
    }

    pub fn is_negative_mate(self) -> bool {
        self.0 <= -WIN_SCORE + 1000
    }

    /// A win score adjusted so that a shorter path to it searches as
    /// strictly better than a longer one.
    pub fn win_in(ply: i32) -> Self {
        Self(WIN_SCORE - ply)
    }

    pub fn loss_in(ply: i32) -> Self {
        Self(-WIN_SCORE + ply)
    }
}

impl Neg for Evaluation {
    type Output = Evaluation;
    fn neg(self) -> Evaluation {
        Evaluation(-self.0)
    }
}

impl Add<i32> for Evaluation {
    type Output = Evaluation;
    fn add(self, rhs: i32) -> Evaluation {
        Evaluation(self.0 + rhs)
    }
}

impl Sub<i32> for Evaluation {
    type Output = Evaluation;
    fn sub(self, rhs: i32) -> Evaluation {
        Evaluation(self.0 - rhs)
    }
}

impl PartialEq<i32> for Evaluation {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<i32> for Evaluation {
    fn partial_cmp(&self, other: &i32) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive_mate() {
            write!(f, "M{}", WIN_SCORE - self.0)
        } else if self.is_negative_mate() {
            write!(f, "-M{}", WIN_SCORE + self.0)
        } else {
            write!(f, "{:+.2}", self.0 as f32 / 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negating_min_val_does_not_overflow() {
        let min = Evaluation::min_val();
        let negated = -min;
        assert_eq!(negated, Evaluation::max_val());
    }

    #[test]
    fn mate_scores_format_with_mate_marker() {
        let win = Evaluation::win_in(3);
        assert_eq!(format!("{win}"), "M3");
        let loss = Evaluation::loss_in(3);
        assert_eq!(format!("{loss}"), "-M3");
    }

    #[test]
    fn ordinary_scores_format_as_scaled_signed_decimal() {
        assert_eq!(format!("{}", Evaluation::new(340)), "+3.40");
        assert_eq!(format!("{}", Evaluation::new(-120)), "-1.20");
        assert_eq!(format!("{}", Evaluation::new(0)), "+0.00");
    }
}
