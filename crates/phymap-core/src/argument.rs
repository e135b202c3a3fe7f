//! Positions in the coordinate space of a mapping
//!
//! An [`Argument`] is a point: a time value plus values for any number of
//! other dimensions, kept sorted by dimension id.
//!
//! ## Ordering
//!
//! Arguments are ordered like multi-digit numbers whose most significant digit
//! is the dimension with the highest id and whose least significant digit is
//! time:
//!
//! ```text
//!   (t=5, f=1)  <  (t=0, f=2)      frequency decides first
//!   (t=0, f=2)  <  (t=1, f=2)      equal frequency, time decides
//! ```
//!
//! This is exactly the order in which a mapping iterator visits key points:
//! all time entries for one setting of the outer axes before the next outer
//! key. A dimension present in only one of the compared arguments does not
//! discriminate; see [`Argument::compare`].

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

use crate::dimension::{Dimension, DimensionSet};

/// Simulation time in seconds
pub type SimTime = f64;

/// The largest representable time strictly before `t`.
///
/// This is the smallest step a mapping can resolve, used to place the
/// second key of a discontinuity directly in front of `t`.
pub fn pre(t: SimTime) -> SimTime {
    -post(-t)
}

/// The smallest representable time strictly after `t`.
pub fn post(t: SimTime) -> SimTime {
    if t.is_nan() || t == f64::INFINITY {
        return t;
    }
    if t == 0.0 {
        return f64::from_bits(1);
    }
    let bits = t.to_bits();
    if t > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

fn ordering_of(diff: f64) -> Ordering {
    if diff < 0.0 {
        Ordering::Less
    } else if diff > 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// A point in the coordinate space: a time plus per-dimension values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Argument {
    time: SimTime,
    values: SmallVec<[(Dimension, f64); 4]>,
}

impl Argument {
    /// Argument defined over time only.
    pub fn new(time: SimTime) -> Self {
        Self {
            time,
            values: SmallVec::new(),
        }
    }

    /// Argument with every non-time dimension of `dims` set to zero.
    pub fn with_domain(dims: &DimensionSet, time: SimTime) -> Self {
        Self {
            time,
            values: dims
                .iter()
                .filter(|d| !d.is_time())
                .map(|d| (d, 0.0))
                .collect(),
        }
    }

    /// Builder style variant of [`set_arg_value`](Self::set_arg_value).
    pub fn with_value(mut self, dim: Dimension, value: f64) -> Self {
        self.set_arg_value(dim, value);
        self
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn set_time(&mut self, time: SimTime) {
        self.time = time;
    }

    /// True if a value for `dim` is defined. Time is always defined.
    pub fn has_arg_value(&self, dim: Dimension) -> bool {
        dim.is_time() || self.find(dim).is_some()
    }

    /// Value for `dim`, or `0.0` if this argument has none.
    pub fn arg_value(&self, dim: Dimension) -> f64 {
        if dim.is_time() {
            return self.time;
        }
        self.find(dim).map(|i| self.values[i].1).unwrap_or(0.0)
    }

    /// Set the value for `dim`, adding the dimension if it is new.
    pub fn set_arg_value(&mut self, dim: Dimension, value: f64) {
        if dim.is_time() {
            self.time = value;
            return;
        }
        self.insert_value(0, dim, value, false);
    }

    /// Take over time and dimension values of `other`.
    ///
    /// With `ignore_unknown` only dimensions already defined in `self` are
    /// updated; otherwise dimensions new to `self` are added.
    pub fn set_arg_values(&mut self, other: &Argument, ignore_unknown: bool) {
        self.time = other.time;
        let mut pos = 0;
        for &(dim, value) in &other.values {
            pos = self.insert_value(pos, dim, value, ignore_unknown);
        }
    }

    /// Number of non-time dimensions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Non-time `(dimension, value)` pairs in ascending dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.values.iter().copied()
    }

    /// The dimensions this argument is defined over, time included.
    pub fn dimensions(&self) -> DimensionSet {
        let mut dims = DimensionSet::time_domain();
        for &(dim, _) in &self.values {
            dims.add_dimension(dim);
        }
        dims
    }

    /// True if every dimension of `other` exists in `self` with an equal
    /// value (and the times are equal).
    ///
    /// Unlike `==`, the dimensions of `other` may be a subset of the
    /// dimensions of `self`.
    pub fn is_same_position(&self, other: &Argument) -> bool {
        if self.values.len() < other.values.len() || self.time != other.time {
            return false;
        }
        if other.values.is_empty() {
            return true;
        }

        let mut it = 0;
        let mut it_o = 0;
        while it < self.values.len() {
            let (dim, value) = self.values[it];
            let (dim_o, value_o) = other.values[it_o];
            if dim_o < dim {
                break;
            } else if dim < dim_o {
                it += 1;
            } else {
                if value != value_o {
                    break;
                }
                it += 1;
                it_o += 1;
            }
            if it_o == other.values.len() {
                return true;
            }
        }
        false
    }

    /// Same dimensions and no value differs by more than `epsilon`.
    pub fn is_close(&self, other: &Argument, epsilon: f64) -> bool {
        if self.values.len() != other.values.len() || (self.time - other.time).abs() > epsilon {
            return false;
        }
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(a, b)| a.0 == b.0 && (a.1 - b.1).abs() <= epsilon)
    }

    /// Compare with `other` in the dimensions of `dims`, highest id first.
    ///
    /// The walk stops at the time dimension, which is compared last. A
    /// dimension defined in only one of the two arguments is treated as equal
    /// and skipped; once either argument has no dimension left at or below
    /// the current one, the times decide.
    pub fn compare(&self, other: &Argument, dims: &DimensionSet) -> Ordering {
        // candidate counts: values[..ind] holds dimensions <= the current one
        let mut ind = self.values.len();
        let mut ind_o = other.values.len();

        for dim in dims.iter().rev() {
            if dim.is_time() {
                return ordering_of(self.time - other.time);
            }
            while ind > 0 && dim < self.values[ind - 1].0 {
                ind -= 1;
            }
            while ind_o > 0 && dim < other.values[ind_o - 1].0 {
                ind_o -= 1;
            }
            if ind == 0 || ind_o == 0 {
                return ordering_of(self.time - other.time);
            }

            let (d, v) = self.values[ind - 1];
            let (d_o, v_o) = other.values[ind_o - 1];
            if d == dim && d_o == dim {
                let diff = v - v_o;
                if diff != 0.0 {
                    return ordering_of(diff);
                }
            }
        }
        Ordering::Equal
    }

    /// Strict ordering over the dimensions of `self`.
    pub fn is_before(&self, other: &Argument) -> bool {
        self.compare(other, &self.dimensions()) == Ordering::Less
    }

    fn find(&self, dim: Dimension) -> Option<usize> {
        self.values
            .iter()
            .take_while(|(d, _)| *d <= dim)
            .position(|(d, _)| *d == dim)
    }

    /// Insert or update `dim`, scanning from `start`. Returns the index the
    /// scan stopped at, which is a valid start for the next larger dimension.
    fn insert_value(&mut self, start: usize, dim: Dimension, value: f64, ignore_unknown: bool) -> usize {
        let mut pos = start;
        while pos < self.values.len() && !(dim < self.values[pos].0) {
            if self.values[pos].0 == dim {
                self.values[pos].1 = value;
                return pos;
            }
            pos += 1;
        }
        if !ignore_unknown {
            self.values.insert(pos, (dim, value));
        }
        pos
    }
}

impl From<SimTime> for Argument {
    fn from(time: SimTime) -> Self {
        Argument::new(time)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.time)?;
        for (_, value) in &self.values {
            write!(f, ", {}", value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq() -> Dimension {
        Dimension::new("frequency")
    }

    #[test]
    fn test_time_value() {
        let mut a = Argument::new(1.0);
        a.set_time(-4.2);
        assert_eq!(a.time(), -4.2);
        assert_eq!(a.arg_value(Dimension::time()), -4.2);
        assert!(a.has_arg_value(Dimension::time()));
    }

    #[test]
    fn test_missing_dimension_defaults_to_zero() {
        let a = Argument::new(2.0);
        assert!(!a.has_arg_value(freq()));
        assert_eq!(a.arg_value(freq()), 0.0);
    }

    #[test]
    fn test_set_arg_value_keeps_order() {
        let space = Dimension::new("argument_test_space");
        let channel = Dimension::new("argument_test_channel");
        let mut a = Argument::new(0.0);
        a.set_arg_value(channel, 3.0);
        a.set_arg_value(freq(), 1.0);
        a.set_arg_value(space, 2.0);
        let dims: Vec<_> = a.iter().map(|(d, _)| d).collect();
        let mut sorted = dims.clone();
        sorted.sort();
        assert_eq!(dims, sorted);
        assert_eq!(a.len(), 3);

        a.set_arg_value(space, 5.0);
        assert_eq!(a.len(), 3);
        assert_eq!(a.arg_value(space), 5.0);
    }

    #[test]
    fn test_set_arg_values_ignore_unknown() {
        let space = Dimension::new("argument_test_space");
        let mut a = Argument::new(1.0).with_value(freq(), 2.0);
        let b = Argument::new(3.0).with_value(freq(), 4.0).with_value(space, 5.0);

        let mut ignoring = a.clone();
        ignoring.set_arg_values(&b, true);
        assert_eq!(ignoring.time(), 3.0);
        assert_eq!(ignoring.arg_value(freq()), 4.0);
        assert!(!ignoring.has_arg_value(space));

        a.set_arg_values(&b, false);
        assert_eq!(a.arg_value(space), 5.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_time_ordering() {
        let a1 = Argument::new(-4.2);
        let a2 = Argument::new(-5.0);
        assert!(a2.is_before(&a1));
        assert!(!a1.is_before(&a2));
        assert_eq!(a1.compare(&a1.clone(), &a1.dimensions()), Ordering::Equal);
    }

    #[test]
    fn test_outer_dimension_dominates() {
        let a1 = Argument::new(5.0).with_value(freq(), 1.0);
        let a2 = Argument::new(0.0).with_value(freq(), 2.0);
        assert!(a1.is_before(&a2));
        assert!(!a2.is_before(&a1));
        assert_eq!(a2.compare(&a1, &a2.dimensions()), Ordering::Greater);

        let a3 = Argument::new(1.0).with_value(freq(), 2.0);
        assert!(a2.is_before(&a3));
    }

    #[test]
    fn test_missing_dimension_compares_equal() {
        let a1 = Argument::new(1.0).with_value(freq(), 2.5);
        let a2 = Argument::new(1.0);
        // a2 lacks frequency: only time decides
        assert_eq!(a1.compare(&a2, &a1.dimensions()), Ordering::Equal);
        assert!(a1.is_same_position(&a2));
        assert!(!a2.is_same_position(&a1));

        let a3 = Argument::new(2.0);
        assert_eq!(a1.compare(&a3, &a1.dimensions()), Ordering::Less);
        assert_eq!(a3.compare(&a1, &a1.dimensions()), Ordering::Greater);
    }

    #[test]
    fn test_same_position() {
        let space = Dimension::new("argument_test_space");
        let full = Argument::new(1.0).with_value(freq(), 2.0).with_value(space, 3.0);
        let partial = Argument::new(1.0).with_value(space, 3.0);
        assert!(full.is_same_position(&partial));
        assert!(!full.is_same_position(&partial.clone().with_value(space, 4.0)));
        assert!(!full.is_same_position(&Argument::new(1.5)));
    }

    #[test]
    fn test_is_close() {
        let a = Argument::new(1.0).with_value(freq(), 2.0);
        let b = Argument::new(1.0 + 1e-9).with_value(freq(), 2.0 - 1e-9);
        assert!(a.is_close(&b, 1e-6));
        assert!(!a.is_close(&b, 1e-12));
        assert_ne!(a, b);
    }

    #[test]
    fn test_with_domain_and_display() {
        let dims = DimensionSet::from_dimensions([Dimension::time(), freq()]);
        let a = Argument::with_domain(&dims, 0.5);
        assert!(a.has_arg_value(freq()));
        assert_eq!(a.dimensions(), dims);
        assert_eq!(format!("{}", a), "(0.5, 0)");
    }

    #[test]
    fn test_pre_and_post() {
        let t = 2.0;
        assert!(pre(t) < t);
        assert!(post(t) > t);
        assert_eq!(post(pre(t)), t);
        assert_eq!(pre(post(t)), t);
        assert!(pre(0.0) < 0.0);
        assert!(post(0.0) > 0.0);
        assert!(pre(-1.0) < -1.0);
    }
}
