//! One-dimensional mappings over time
//!
//! [`TimeMapping`] is the leaf of every mapping tree: a sorted list of
//! `time -> value` entries with an interpolation policy.
//!
//! A mapping created with [`InterpolationMethod::Steps`] is a step function.
//! Its iterators visit an extra position directly before every key (at
//! [`pre`]`(key)`), where the value is still that of the previous step:
//!
//! ```text
//!   keys:       1 -> 5          2 -> 9
//!   visited:    1 (5)   pre(2) (5)   2 (9)
//! ```
//!
//! Combining a step function with another mapping element-wise therefore
//! keeps the step sharp in the (linearly interpolated) result.

use crate::argument::{pre, Argument};
use crate::dimension::DimensionSet;
use crate::interpolation::{InterpolationMethod, Interpolator};
use crate::intpl_map::{InterpolatingMap, KeyCursor};
use crate::mapping::{
    ConstMapping, ConstMappingIterator, CursorIterator, Mapping, MappingCursor, MappingIterator,
};

/// Mapping from time to value.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMapping {
    dimensions: DimensionSet,
    entries: InterpolatingMap<f64>,
    step: bool,
}

impl TimeMapping {
    pub fn new(method: InterpolationMethod) -> Self {
        Self::with_interpolator(Interpolator::new(method))
    }

    /// Mapping returning `out_of_range` outside of its key range.
    pub fn with_out_of_range(method: InterpolationMethod, out_of_range: f64) -> Self {
        Self::with_interpolator(Interpolator::with_out_of_range(method, out_of_range))
    }

    pub(crate) fn with_interpolator(interpolator: Interpolator) -> Self {
        Self {
            dimensions: DimensionSet::time_domain(),
            entries: InterpolatingMap::new(interpolator),
            step: interpolator.method() == InterpolationMethod::Steps,
        }
    }

    pub fn method(&self) -> InterpolationMethod {
        self.entries.method()
    }

    pub fn out_of_range(&self) -> Option<f64> {
        self.entries.interpolator().out_of_range()
    }

    /// True if iterators stop directly before every key.
    pub fn is_step_mapping(&self) -> bool {
        self.step
    }

    /// Number of key points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &InterpolatingMap<f64> {
        &self.entries
    }
}

impl Default for TimeMapping {
    fn default() -> Self {
        Self::new(InterpolationMethod::default())
    }
}

/// Cursor over a [`TimeMapping`].
#[derive(Debug, Clone)]
pub struct TimeCursor {
    key: KeyCursor,
    at_pre_step: bool,
    position: Argument,
    next_position: Argument,
}

impl TimeCursor {
    fn from_key(m: &TimeMapping, key: KeyCursor) -> Self {
        let position = Argument::new(key.position());
        let mut cursor = Self {
            key,
            at_pre_step: false,
            next_position: position.clone(),
            position,
        };
        cursor.update_next_position(m);
        cursor
    }

    fn update_next_position(&mut self, m: &TimeMapping) {
        let mut t = self.key.next_position(&m.entries);
        if m.step && !self.at_pre_step && self.key.has_next(&m.entries) {
            let before = pre(t);
            if before > self.position.time() {
                t = before;
            } else {
                // already directly in front of the next key
                self.at_pre_step = true;
            }
        }
        self.next_position.set_time(t);
    }
}

impl MappingCursor for TimeCursor {
    type Target = TimeMapping;

    fn begin(m: &TimeMapping) -> Self {
        Self::from_key(m, KeyCursor::begin(&m.entries))
    }

    fn at(m: &TimeMapping, pos: &Argument) -> Self {
        Self::from_key(m, KeyCursor::at(&m.entries, pos.time()))
    }

    fn position(&self) -> &Argument {
        &self.position
    }

    fn peek_next(&self) -> &Argument {
        &self.next_position
    }

    fn has_next(&self, m: &TimeMapping) -> bool {
        self.key.has_next(&m.entries)
    }

    fn in_range(&self, m: &TimeMapping) -> bool {
        self.key.in_range(&m.entries)
    }

    fn value(&self, m: &TimeMapping) -> f64 {
        m.entries.cursor_value(&self.key).value
    }

    fn jump_to(&mut self, m: &TimeMapping, pos: &Argument) {
        self.at_pre_step = false;
        self.key.jump_to(&m.entries, pos.time());
        self.position.set_time(pos.time());
        self.update_next_position(m);
    }

    fn iterate_to(&mut self, m: &TimeMapping, pos: &Argument) {
        self.at_pre_step = false;
        self.key.iterate_to(&m.entries, pos.time());
        self.position.set_time(pos.time());
        self.update_next_position(m);
    }

    fn jump_to_begin(&mut self, m: &TimeMapping) {
        self.at_pre_step = false;
        self.key.jump_to_begin(&m.entries);
        self.position.set_time(self.key.position());
        self.update_next_position(m);
    }

    fn advance(&mut self, m: &TimeMapping) {
        if m.step && !self.at_pre_step {
            self.key.iterate_to(&m.entries, self.next_position.time());
            self.at_pre_step = true;
        } else {
            self.key.next(&m.entries);
            self.at_pre_step = false;
        }
        self.position.set_time(self.key.position());
        self.update_next_position(m);
    }

    fn set_value(&mut self, m: &mut TimeMapping, value: f64) {
        self.key.set_value(&mut m.entries, value);
        self.update_next_position(m);
    }
}

/// Iterator over a [`TimeMapping`].
pub type TimeMappingIterator<M> = CursorIterator<M, TimeCursor>;

impl ConstMapping for TimeMapping {
    fn dimension_set(&self) -> &DimensionSet {
        &self.dimensions
    }

    fn value(&self, pos: &Argument) -> f64 {
        self.entries.intpl_value(pos.time()).value
    }

    fn create_const_iterator(&self) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(TimeMappingIterator::new(self))
    }

    fn create_const_iterator_at(&self, pos: &Argument) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(TimeMappingIterator::at(self, pos))
    }

    fn const_clone(&self) -> Box<dyn ConstMapping> {
        Box::new(self.clone())
    }
}

impl Mapping for TimeMapping {
    fn set_value(&mut self, pos: &Argument, value: f64) {
        self.entries.set(pos.time(), value);
    }

    fn append_value(&mut self, pos: &Argument, value: f64) {
        self.entries.append(pos.time(), value);
    }

    fn create_iterator(&mut self) -> Box<dyn MappingIterator + '_> {
        Box::new(TimeMappingIterator::new(self))
    }

    fn create_iterator_at(&mut self, pos: &Argument) -> Box<dyn MappingIterator + '_> {
        Box::new(TimeMappingIterator::at(self, pos))
    }

    fn clone_mapping(&self) -> Box<dyn Mapping> {
        Box::new(self.clone())
    }
}
