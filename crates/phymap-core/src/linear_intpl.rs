//! Linear interpolation between two sibling mappings
//!
//! When a [`MultiDimMapping`](crate::multi_dim::MultiDimMapping) is queried
//! between two keys of its own axis, the result is the blend of the two
//! neighbouring sub-mappings at a fixed factor. [`LinearIntplMapping`]
//! represents that blend for the duration of a query.
//!
//! An interpolated mapping has no key points of its own, so it has no first
//! position and no next one. Its iterator, [`LinearIntplIterator`], therefore
//! only offers `value`, `position`, `jump_to` and `iterate_to`.

use crate::argument::Argument;
use crate::dimension::DimensionSet;
use crate::interpolation::blend;
use crate::mapping::{ConstMapping, ConstMappingIterator, MappingCursor};

/// Blend `left + (right - left) * factor` of two borrowed mappings.
#[derive(Debug, Clone, Copy)]
pub struct LinearIntplMapping<'a> {
    left: &'a dyn ConstMapping,
    right: &'a dyn ConstMapping,
    factor: f64,
}

impl<'a> LinearIntplMapping<'a> {
    pub fn new(left: &'a dyn ConstMapping, right: &'a dyn ConstMapping, factor: f64) -> Self {
        Self {
            left,
            right,
            factor,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn dimension_set(&self) -> &DimensionSet {
        self.left.dimension_set()
    }

    pub fn value(&self, pos: &Argument) -> f64 {
        blend(self.left.value(pos), self.right.value(pos), self.factor)
    }

    /// Cursor positioned at `pos`.
    pub fn create_iterator(&self, pos: &Argument) -> LinearIntplIterator<'a> {
        LinearIntplIterator {
            left: self.left.create_const_iterator_at(pos),
            right: self.right.create_const_iterator_at(pos),
            factor: self.factor,
        }
    }
}

/// Position-and-value cursor over a [`LinearIntplMapping`].
pub struct LinearIntplIterator<'a> {
    left: Box<dyn ConstMappingIterator + 'a>,
    right: Box<dyn ConstMappingIterator + 'a>,
    factor: f64,
}

impl<'a> LinearIntplIterator<'a> {
    pub fn value(&self) -> f64 {
        blend(self.left.value(), self.right.value(), self.factor)
    }

    pub fn position(&self) -> &Argument {
        self.left.position()
    }

    pub fn jump_to(&mut self, pos: &Argument) {
        self.left.jump_to(pos);
        self.right.jump_to(pos);
    }

    pub fn iterate_to(&mut self, pos: &Argument) {
        self.left.iterate_to(pos);
        self.right.iterate_to(pos);
    }
}

/// Cursor form of [`LinearIntplIterator`] for use inside mapping cursors,
/// where the two mappings are passed in on each call.
#[derive(Debug, Clone)]
pub(crate) struct LinearIntplCursor<C> {
    left: C,
    right: C,
    factor: f64,
}

impl<C: MappingCursor> LinearIntplCursor<C> {
    pub(crate) fn at(left: &C::Target, right: &C::Target, factor: f64, pos: &Argument) -> Self {
        Self {
            left: C::at(left, pos),
            right: C::at(right, pos),
            factor,
        }
    }

    pub(crate) fn value(&self, left: &C::Target, right: &C::Target) -> f64 {
        blend(self.left.value(left), self.right.value(right), self.factor)
    }

    pub(crate) fn position(&self) -> &Argument {
        self.left.position()
    }

    pub(crate) fn jump_to(&mut self, left: &C::Target, right: &C::Target, pos: &Argument) {
        self.left.jump_to(left, pos);
        self.right.jump_to(right, pos);
    }

    pub(crate) fn iterate_to(&mut self, left: &C::Target, right: &C::Target, pos: &Argument) {
        self.left.iterate_to(left, pos);
        self.right.iterate_to(right, pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::InterpolationMethod;
    use crate::mapping::Mapping;
    use crate::time_mapping::{TimeCursor, TimeMapping};
    use approx::assert_relative_eq;

    fn pair() -> (TimeMapping, TimeMapping) {
        let mut a = TimeMapping::new(InterpolationMethod::Linear);
        let mut b = TimeMapping::new(InterpolationMethod::Linear);
        a.set_value(&Argument::new(0.0), 0.0);
        a.set_value(&Argument::new(1.0), 10.0);
        b.set_value(&Argument::new(0.0), 100.0);
        b.set_value(&Argument::new(1.0), 100.0);
        (a, b)
    }

    #[test]
    fn test_blended_value() {
        let (a, b) = pair();
        let m = LinearIntplMapping::new(&a, &b, 0.25);
        // 5 + (100 - 5) * 0.25
        assert_relative_eq!(m.value(&Argument::new(0.5)), 28.75);
        assert_eq!(m.factor(), 0.25);
        assert!(m.dimension_set().has_time());
    }

    #[test]
    fn test_iterator() {
        let (a, b) = pair();
        let m = LinearIntplMapping::new(&a, &b, 0.5);
        let mut it = m.create_iterator(&Argument::new(0.0));
        assert_relative_eq!(it.value(), 50.0);
        it.iterate_to(&Argument::new(1.0));
        assert_relative_eq!(it.value(), 55.0);
        assert_eq!(it.position().time(), 1.0);
        it.jump_to(&Argument::new(0.5));
        assert_relative_eq!(it.value(), m.value(&Argument::new(0.5)));
    }

    #[test]
    fn test_cursor() {
        let (a, b) = pair();
        let mut cursor: LinearIntplCursor<TimeCursor> =
            LinearIntplCursor::at(&a, &b, 0.5, &Argument::new(0.0));
        assert_relative_eq!(cursor.value(&a, &b), 50.0);
        cursor.iterate_to(&a, &b, &Argument::new(0.5));
        assert_relative_eq!(cursor.value(&a, &b), 52.5);
        cursor.jump_to(&a, &b, &Argument::new(1.0));
        assert_eq!(cursor.position().time(), 1.0);
    }
}
