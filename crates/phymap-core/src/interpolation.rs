//! # Interpolation Strategies
//!
//! Policies that compute a value at an arbitrary key from a sorted sequence
//! of `(key, value)` entries:
//!
//! | Method    | Between keys              | Before first key | After last key |
//! |-----------|---------------------------|------------------|----------------|
//! | `Steps`   | value of next smaller key | first value      | last value     |
//! | `Nearest` | value of closer key       | first value      | last value     |
//! | `Linear`  | `v0 + (v1-v0)*(t-t0)/(t1-t0)` | first value  | last value     |
//!
//! If an out-of-range value is configured it replaces the boundary values in
//! the table above, except for `Steps` after the last key, which always holds
//! the last value. An empty sequence yields the out-of-range value, or zero.
//!
//! A query that hits a stored key exactly always returns the stored value
//! unchanged and is flagged as not interpolated.
//!
//! The strategy itself never touches values. [`Interpolator::locate`]
//! resolves a query to a [`Lookup`] describing which entries contribute, so
//! the same policy serves plain `f64` containers as well as containers of
//! nested sub-mappings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interpolation method used between the key points of a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Step function: the value of the next smaller key
    Steps,
    /// The value of the nearest key
    Nearest,
    /// Linear interpolation between the two neighbouring keys
    #[default]
    Linear,
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationMethod::Steps => write!(f, "steps"),
            InterpolationMethod::Nearest => write!(f, "nearest"),
            InterpolationMethod::Linear => write!(f, "linear"),
        }
    }
}

impl FromStr for InterpolationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "steps" | "step" | "next_smaller" => Ok(InterpolationMethod::Steps),
            "nearest" => Ok(InterpolationMethod::Nearest),
            "linear" => Ok(InterpolationMethod::Linear),
            other => Err(format!("unknown interpolation method '{}'", other)),
        }
    }
}

/// A value together with the information whether it was interpolated or
/// read from a stored key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolated<V> {
    pub value: V,
    pub is_interpolated: bool,
}

impl<V> Interpolated<V> {
    /// Value stored exactly at the queried key.
    pub fn exact(value: V) -> Self {
        Self {
            value,
            is_interpolated: false,
        }
    }

    /// Value computed from (or borrowed from) neighbouring keys.
    pub fn interpolated(value: V) -> Self {
        Self {
            value,
            is_interpolated: true,
        }
    }
}

/// Result of resolving a query key against sorted entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    /// No entries and no out-of-range value.
    Empty,
    /// The configured out-of-range value applies.
    OutOfRange,
    /// The value of a single entry applies. `exact` is set if the query hit
    /// the key of that entry.
    Entry { index: usize, exact: bool },
    /// Linear blend: `left + (right - left) * factor`.
    Between { left: usize, right: usize, factor: f64 },
}

impl Lookup {
    /// True unless the lookup hit a stored key exactly.
    pub fn is_interpolated(&self) -> bool {
        !matches!(self, Lookup::Entry { exact: true, .. })
    }

    /// Resolve against plain values.
    pub fn resolve(&self, entries: &[(f64, f64)], out_of_range: Option<f64>) -> Interpolated<f64> {
        match *self {
            Lookup::Empty => Interpolated::interpolated(0.0),
            Lookup::OutOfRange => Interpolated::interpolated(out_of_range.unwrap_or(0.0)),
            Lookup::Entry { index, exact } => Interpolated {
                value: entries[index].1,
                is_interpolated: !exact,
            },
            Lookup::Between {
                left,
                right,
                factor,
            } => Interpolated::interpolated(blend(entries[left].1, entries[right].1, factor)),
        }
    }
}

/// Relative position of `t` between `t0` and `t1`.
#[inline]
pub fn linear_factor(t: f64, t0: f64, t1: f64) -> f64 {
    (t - t0) / (t1 - t0)
}

/// `v0 + (v1 - v0) * factor`
#[inline]
pub fn blend(v0: f64, v1: f64, factor: f64) -> f64 {
    v0 + (v1 - v0) * factor
}

/// Index of the first entry whose key is greater than `pos`.
pub fn upper_bound<V>(entries: &[(f64, V)], pos: f64) -> usize {
    entries.partition_point(|(k, _)| *k <= pos)
}

/// An interpolation method plus an optional out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interpolator {
    method: InterpolationMethod,
    out_of_range: Option<f64>,
}

impl Interpolator {
    pub fn new(method: InterpolationMethod) -> Self {
        Self {
            method,
            out_of_range: None,
        }
    }

    pub fn with_out_of_range(method: InterpolationMethod, out_of_range: f64) -> Self {
        Self {
            method,
            out_of_range: Some(out_of_range),
        }
    }

    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    pub fn out_of_range(&self) -> Option<f64> {
        self.out_of_range
    }

    /// Resolve `pos` against `entries` (sorted by key).
    pub fn locate<V>(&self, entries: &[(f64, V)], pos: f64) -> Lookup {
        self.locate_with_upper(entries, pos, upper_bound(entries, pos))
    }

    /// Like [`locate`](Self::locate) with a precomputed upper bound, the
    /// index of the first entry whose key is greater than `pos`.
    pub fn locate_with_upper<V>(&self, entries: &[(f64, V)], pos: f64, upper: usize) -> Lookup {
        let boundary = |index| match self.out_of_range {
            Some(_) => Lookup::OutOfRange,
            None => Lookup::Entry { index, exact: false },
        };

        if entries.is_empty() {
            return match self.out_of_range {
                Some(_) => Lookup::OutOfRange,
                None => Lookup::Empty,
            };
        }
        if upper == 0 {
            return boundary(0);
        }

        let left = upper - 1;
        if entries[left].0 == pos {
            return Lookup::Entry {
                index: left,
                exact: true,
            };
        }

        match self.method {
            InterpolationMethod::Steps => Lookup::Entry {
                index: left,
                exact: false,
            },
            _ if upper == entries.len() => boundary(left),
            InterpolationMethod::Nearest => {
                let to_left = pos - entries[left].0;
                let to_right = entries[upper].0 - pos;
                let index = if to_right < to_left { upper } else { left };
                Lookup::Entry { index, exact: false }
            }
            InterpolationMethod::Linear => Lookup::Between {
                left,
                right: upper,
                factor: linear_factor(pos, entries[left].0, entries[upper].0),
            },
        }
    }

    /// Interpolated value at `pos` over plain values.
    pub fn value(&self, entries: &[(f64, f64)], pos: f64) -> Interpolated<f64> {
        self.locate(entries, pos).resolve(entries, self.out_of_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn entries() -> Vec<(f64, f64)> {
        vec![(1.0, 10.0), (2.0, 20.0), (4.0, 0.0)]
    }

    #[test]
    fn test_empty() {
        let e: Vec<(f64, f64)> = Vec::new();
        for method in [InterpolationMethod::Steps, InterpolationMethod::Nearest, InterpolationMethod::Linear] {
            assert_eq!(Interpolator::new(method).value(&e, 3.0).value, 0.0);
            assert_eq!(Interpolator::with_out_of_range(method, -7.0).value(&e, 3.0).value, -7.0);
        }
    }

    #[test]
    fn test_exact_hit() {
        let e = entries();
        for method in [InterpolationMethod::Steps, InterpolationMethod::Nearest, InterpolationMethod::Linear] {
            let v = Interpolator::new(method).value(&e, 2.0);
            assert_eq!(v, Interpolated::exact(20.0));
        }
    }

    #[test]
    fn test_steps() {
        let e = entries();
        let intpl = Interpolator::new(InterpolationMethod::Steps);
        assert_eq!(intpl.value(&e, 1.9).value, 10.0);
        assert!(intpl.value(&e, 1.9).is_interpolated);
        assert_eq!(intpl.value(&e, 0.0).value, 10.0);
        assert_eq!(intpl.value(&e, 9.0).value, 0.0);

        // out-of-range only applies before the first key
        let intpl = Interpolator::with_out_of_range(InterpolationMethod::Steps, 5.0);
        assert_eq!(intpl.value(&e, 0.0).value, 5.0);
        assert_eq!(intpl.value(&e, 9.0).value, 0.0);
    }

    #[test]
    fn test_nearest() {
        let e = entries();
        let intpl = Interpolator::new(InterpolationMethod::Nearest);
        assert_eq!(intpl.value(&e, 1.4).value, 10.0);
        assert_eq!(intpl.value(&e, 1.6).value, 20.0);
        // tie resolves to the smaller key
        assert_eq!(intpl.value(&e, 1.5).value, 10.0);
        assert_eq!(intpl.value(&e, 3.0).value, 20.0);
        assert_eq!(intpl.value(&e, 8.0).value, 0.0);

        let intpl = Interpolator::with_out_of_range(InterpolationMethod::Nearest, 5.0);
        assert_eq!(intpl.value(&e, 0.5).value, 5.0);
        assert_eq!(intpl.value(&e, 8.0).value, 5.0);
    }

    #[test]
    fn test_linear() {
        let e = entries();
        let intpl = Interpolator::new(InterpolationMethod::Linear);
        assert_relative_eq!(intpl.value(&e, 1.5).value, 15.0);
        assert_relative_eq!(intpl.value(&e, 3.0).value, 10.0);
        assert_relative_eq!(intpl.value(&e, 1.25).value, 12.5);
        assert_eq!(intpl.value(&e, -3.0).value, 10.0);
        assert_eq!(intpl.value(&e, 5.0).value, 0.0);

        let intpl = Interpolator::with_out_of_range(InterpolationMethod::Linear, 1.0);
        assert_eq!(intpl.value(&e, -3.0).value, 1.0);
        assert_eq!(intpl.value(&e, 5.0).value, 1.0);
        assert_relative_eq!(intpl.value(&e, 3.0).value, 10.0);
    }

    #[test]
    fn test_linear_law() {
        let (t0, t1, v0, v1) = (0.3, 1.7, -2.0, 6.5);
        let e = vec![(t0, v0), (t1, v1)];
        let intpl = Interpolator::new(InterpolationMethod::Linear);
        for i in 1..10 {
            let t = t0 + (t1 - t0) * i as f64 / 10.0;
            let expected = v0 + (v1 - v0) * (t - t0) / (t1 - t0);
            assert_relative_eq!(intpl.value(&e, t).value, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_locate_between() {
        let e = entries();
        let intpl = Interpolator::new(InterpolationMethod::Linear);
        match intpl.locate(&e, 3.0) {
            Lookup::Between { left, right, factor } => {
                assert_eq!((left, right), (1, 2));
                assert_relative_eq!(factor, 0.5);
            }
            other => panic!("unexpected lookup {:?}", other),
        }
        assert!(!intpl.locate(&e, 4.0).is_interpolated());
    }

    #[test]
    fn test_method_parse_and_serde() {
        assert_eq!("Linear".parse::<InterpolationMethod>(), Ok(InterpolationMethod::Linear));
        assert_eq!("steps".parse::<InterpolationMethod>(), Ok(InterpolationMethod::Steps));
        assert!("cubic".parse::<InterpolationMethod>().is_err());

        let method: InterpolationMethod = serde_yaml::from_str("nearest").unwrap();
        assert_eq!(method, InterpolationMethod::Nearest);
        assert_eq!(InterpolationMethod::default(), InterpolationMethod::Linear);
        assert_eq!(InterpolationMethod::Steps.to_string(), "steps");
    }
}
