//! Constant mappings
//!
//! [`ConstantMapping`] returns the same value everywhere. It has no
//! interpolation and no stored values, only an optional list of key
//! entries its iterators walk: none, one or two explicit positions, or a
//! regular grid spanning `[min, max]` with a step per dimension.
//!
//! [`KeyEntryIterator`] is the iterator over such a key list. It reads the
//! value of its mapping directly at every position, so it suits any mapping
//! whose `value` is cheap.

use std::cmp::Ordering;

use crate::argument::Argument;
use crate::dimension::{Dimension, DimensionSet};
use crate::error::{MappingError, MappingResult};
use crate::mapping::{ConstMapping, ConstMappingIterator};

/// Grid axes stop this close to `max`, which then gets its own entry.
const GRID_EPSILON: f64 = 1e-4;

/// Mapping with the same value at every position.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantMapping {
    dimensions: DimensionSet,
    value: f64,
    keys: Vec<Argument>,
}

impl ConstantMapping {
    /// Constant mapping without key entries.
    pub fn new(dimensions: DimensionSet, value: f64) -> MappingResult<Self> {
        Self::with_keys(dimensions, value, Vec::new())
    }

    /// Constant mapping with a single key entry at `key`.
    pub fn with_key(dimensions: DimensionSet, value: f64, key: Argument) -> MappingResult<Self> {
        Self::with_keys(dimensions, value, vec![key])
    }

    /// Constant mapping iterated over `keys`, in any order.
    pub fn with_keys(dimensions: DimensionSet, value: f64, mut keys: Vec<Argument>) -> MappingResult<Self> {
        if !dimensions.has_time() {
            return Err(MappingError::MissingTimeDimension(dimensions));
        }
        keys.sort_by(|a, b| a.compare(b, &dimensions));
        keys.dedup_by(|a, b| a.compare(b, &dimensions) == Ordering::Equal);
        Ok(Self {
            dimensions,
            value,
            keys,
        })
    }

    /// Constant mapping with a key entry at every grid point from `min` to
    /// `max` (both inclusive), stepping by `interval` in each dimension.
    ///
    /// A dimension with a non-positive step contributes `max` only.
    pub fn with_grid(
        dimensions: DimensionSet,
        value: f64,
        min: &Argument,
        max: &Argument,
        interval: &Argument,
    ) -> MappingResult<Self> {
        let axes: Vec<Dimension> = dimensions.iter().rev().collect();
        let mut keys = Vec::new();
        let mut pos = min.clone();
        fill_grid(&axes, min, max, interval, &mut pos, &mut keys);
        Self::with_keys(dimensions, value, keys)
    }

    pub fn constant(&self) -> f64 {
        self.value
    }

    pub fn set_constant(&mut self, value: f64) {
        self.value = value;
    }

    /// Key entries in iteration order.
    pub fn keys(&self) -> &[Argument] {
        &self.keys
    }
}

fn axis_values(from: f64, to: f64, step: f64) -> Vec<f64> {
    let mut values = Vec::new();
    if step > 0.0 && from.is_finite() && to.is_finite() {
        let mut v = from;
        while v - to < -GRID_EPSILON {
            values.push(v);
            v += step;
        }
    }
    values.push(to);
    values
}

/// Walk `axes` (outermost first, time last) and collect every grid point.
fn fill_grid(
    axes: &[Dimension],
    min: &Argument,
    max: &Argument,
    interval: &Argument,
    pos: &mut Argument,
    keys: &mut Vec<Argument>,
) {
    let Some((&axis, inner)) = axes.split_first() else {
        return;
    };
    for v in axis_values(min.arg_value(axis), max.arg_value(axis), interval.arg_value(axis)) {
        pos.set_arg_value(axis, v);
        if inner.is_empty() {
            keys.push(pos.clone());
        } else {
            fill_grid(inner, min, max, interval, pos, keys);
        }
    }
}

impl ConstMapping for ConstantMapping {
    fn dimension_set(&self) -> &DimensionSet {
        &self.dimensions
    }

    fn value(&self, _pos: &Argument) -> f64 {
        self.value
    }

    fn create_const_iterator(&self) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(KeyEntryIterator::new(self, &self.keys))
    }

    fn create_const_iterator_at(&self, pos: &Argument) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(KeyEntryIterator::at(self, &self.keys, pos))
    }

    fn const_clone(&self) -> Box<dyn ConstMapping> {
        Box::new(self.clone())
    }
}

/// Iterator over a sorted list of key entries, reading values from the
/// mapping at each position.
pub struct KeyEntryIterator<'a> {
    mapping: &'a dyn ConstMapping,
    keys: &'a [Argument],
    /// First key after `position`
    next: usize,
    position: Argument,
}

impl<'a> KeyEntryIterator<'a> {
    /// Iterator at the first key entry. `keys` must be sorted in the order
    /// of [`Argument::compare`] over the mapping's domain.
    pub fn new(mapping: &'a dyn ConstMapping, keys: &'a [Argument]) -> Self {
        let mut it = Self {
            mapping,
            keys,
            next: 0,
            position: Argument::with_domain(mapping.dimension_set(), 0.0),
        };
        it.jump_to_begin();
        it
    }

    pub fn at(mapping: &'a dyn ConstMapping, keys: &'a [Argument], pos: &Argument) -> Self {
        let mut it = Self {
            mapping,
            keys,
            next: 0,
            position: pos.clone(),
        };
        it.next = it.upper_bound(pos);
        it
    }

    fn upper_bound(&self, pos: &Argument) -> usize {
        let dims = self.mapping.dimension_set();
        self.keys
            .partition_point(|key| pos.compare(key, dims) != Ordering::Less)
    }
}

impl ConstMappingIterator for KeyEntryIterator<'_> {
    fn position(&self) -> &Argument {
        &self.position
    }

    fn next_position(&self) -> MappingResult<&Argument> {
        self.keys.get(self.next).ok_or(MappingError::NoNextPosition)
    }

    fn value(&self) -> f64 {
        self.mapping.value(&self.position)
    }

    fn jump_to(&mut self, pos: &Argument) {
        self.position = pos.clone();
        self.next = self.upper_bound(pos);
    }

    fn iterate_to(&mut self, pos: &Argument) {
        let dims = self.mapping.dimension_set();
        while self.next < self.keys.len() && pos.compare(&self.keys[self.next], dims) != Ordering::Less {
            self.next += 1;
        }
        self.position = pos.clone();
    }

    fn jump_to_begin(&mut self) {
        if let Some(first) = self.keys.first() {
            self.position = first.clone();
            self.next = 1;
        } else {
            self.next = 0;
        }
    }

    fn next(&mut self) -> MappingResult<()> {
        let key = self.keys.get(self.next).ok_or(MappingError::NoNextPosition)?;
        self.position = key.clone();
        self.next += 1;
        Ok(())
    }

    fn in_range(&self) -> bool {
        let dims = self.mapping.dimension_set();
        match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => {
                self.position.compare(first, dims) != Ordering::Less
                    && last.compare(&self.position, dims) != Ordering::Less
            }
            _ => false,
        }
    }

    fn has_next(&self) -> bool {
        self.next < self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::KeyPoints;

    fn freq() -> Dimension {
        Dimension::new("frequency")
    }

    fn domain() -> DimensionSet {
        DimensionSet::time_domain().with(freq())
    }

    #[test]
    fn test_value_everywhere() {
        let mut m = ConstantMapping::new(domain(), 2.5).unwrap();
        assert_eq!(m.value(&Argument::new(-100.0)), 2.5);
        assert_eq!(m.value(&Argument::new(3.0).with_value(freq(), 7.0)), 2.5);
        m.set_constant(1.0);
        assert_eq!(m.constant(), 1.0);
        assert_eq!(m.const_clone().value(&Argument::new(0.0)), 1.0);

        let no_time = DimensionSet::from_dimensions([freq()]);
        assert!(ConstantMapping::new(no_time, 1.0).is_err());
    }

    #[test]
    fn test_iterator_without_keys() {
        let m = ConstantMapping::new(DimensionSet::time_domain(), 3.0).unwrap();
        let mut it = m.create_const_iterator();
        assert!(!it.in_range());
        assert!(!it.has_next());
        assert_eq!(it.next(), Err(MappingError::NoNextPosition));
        assert_eq!(it.value(), 3.0);
        assert_eq!(KeyPoints::of(&m).count(), 0);
    }

    #[test]
    fn test_two_keys() {
        let keys = vec![Argument::new(4.0), Argument::new(1.0)];
        let m = ConstantMapping::with_keys(DimensionSet::time_domain(), 3.0, keys).unwrap();
        let points: Vec<_> = KeyPoints::of(&m).map(|(p, v)| (p.time(), v)).collect();
        assert_eq!(points, vec![(1.0, 3.0), (4.0, 3.0)]);

        let mut it = m.create_const_iterator_at(&Argument::new(2.0));
        assert!(it.in_range());
        assert_eq!(it.next_position().unwrap().time(), 4.0);
        it.iterate_to(&Argument::new(5.0));
        assert!(!it.in_range());
        assert!(!it.has_next());
        it.jump_to_begin();
        assert_eq!(it.position().time(), 1.0);
    }

    #[test]
    fn test_grid() {
        let min = Argument::new(0.0).with_value(freq(), 0.0);
        let max = Argument::new(1.0).with_value(freq(), 2.0);
        let interval = Argument::new(0.5).with_value(freq(), 1.0);
        let m = ConstantMapping::with_grid(domain(), 1.0, &min, &max, &interval).unwrap();
        assert_eq!(m.keys().len(), 9);

        let points: Vec<_> = KeyPoints::of(&m)
            .map(|(p, _)| (p.time(), p.arg_value(freq())))
            .collect();
        assert_eq!(points[..4], [(0.0, 0.0), (0.5, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(points[8], (1.0, 2.0));
    }

    #[test]
    fn test_grid_without_step() {
        let min = Argument::new(0.0);
        let max = Argument::new(2.0);
        let m = ConstantMapping::with_grid(DimensionSet::time_domain(), 1.0, &min, &max, &Argument::new(0.0))
            .unwrap();
        assert_eq!(m.keys(), &[Argument::new(2.0)]);
    }
}
