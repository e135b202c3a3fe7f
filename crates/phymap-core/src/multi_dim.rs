//! # Multi-Dimensional Mappings
//!
//! A [`MultiDimMapping`] maps the value of its own axis (the highest
//! dimension it is responsible for) to a sub-mapping over the remaining,
//! lower dimensions. The recursion ends in a [`TimeMapping`] leaf:
//!
//! ```text
//!   MultiDimMapping(channel)
//!     ├─ 0.0 -> MultiDimMapping(frequency)
//!     │           ├─ 2.40e9 -> TimeMapping { 0.0 -> 1.0, 1.0 -> 2.0 }
//!     │           └─ 2.45e9 -> TimeMapping { ... }
//!     └─ 1.0 -> MultiDimMapping(frequency) ...
//! ```
//!
//! Sub-mappings are owned through [`KeyedMapping`], so a mapping tree has a
//! single owner and `clone()` copies it deeply.
//!
//! ## Lookup
//!
//! Between two keys of an axis, the interpolation method of the mapping
//! selects a sub-mapping (`Steps`, `Nearest`) or blends the two neighbours
//! through a temporary [`LinearIntplMapping`] (`Linear`). Outside the key
//! range the configured out-of-range value applies, or the boundary
//! sub-mapping if there is none.
//!
//! ## Iteration
//!
//! Iterators visit positions in the order defined by
//! [`Argument::compare`]: all time keys of one sub-mapping before the next
//! key of an outer axis. `next()` is delegated to the sub-iterator first and
//! moves the own axis only once the sub-iterator is exhausted.
//!
//! ## Example
//!
//! ```rust
//! use phymap_core::prelude::*;
//!
//! let freq = Dimension::new("frequency");
//! let domain = DimensionSet::time_domain().with(freq);
//! let mut m = MultiDimMapping::new(domain, InterpolationMethod::Linear).unwrap();
//!
//! m.set_value(&Argument::new(0.0).with_value(freq, 0.0), 10.0);
//! m.set_value(&Argument::new(0.0).with_value(freq, 1.0), 30.0);
//!
//! assert_eq!(m.value(&Argument::new(0.0).with_value(freq, 0.5)), 20.0);
//! ```

use crate::argument::Argument;
use crate::dimension::{Dimension, DimensionSet};
use crate::error::{MappingError, MappingResult};
use crate::interpolation::{InterpolationMethod, Interpolator, Lookup};
use crate::intpl_map::{InterpolatingMap, KeyCursor};
use crate::linear_intpl::{LinearIntplCursor, LinearIntplMapping};
use crate::mapping::{
    ConstMapping, ConstMappingIterator, CursorIterator, Mapping, MappingCursor, MappingIterator,
};
use crate::time_mapping::{TimeCursor, TimeMapping};

/// An owned mapping of any dimensionality: a time leaf or a nested level.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyedMapping {
    Time(TimeMapping),
    MultiDim(MultiDimMapping),
}

impl KeyedMapping {
    /// Mapping over `domain`: a [`TimeMapping`] for the pure time domain,
    /// a [`MultiDimMapping`] otherwise.
    pub fn new(domain: &DimensionSet, interpolator: Interpolator) -> MappingResult<Self> {
        if !domain.has_time() {
            return Err(MappingError::MissingTimeDimension(domain.clone()));
        }
        match domain.first() {
            Some(axis) if !axis.is_time() => Ok(Self::for_axis(domain, axis, interpolator)),
            _ => Ok(KeyedMapping::Time(TimeMapping::with_interpolator(interpolator))),
        }
    }

    /// Mapping responsible for `axis` and every dimension of `domain` below.
    pub(crate) fn for_axis(domain: &DimensionSet, axis: Dimension, interpolator: Interpolator) -> Self {
        if axis.is_time() {
            KeyedMapping::Time(TimeMapping::with_interpolator(interpolator))
        } else {
            KeyedMapping::MultiDim(MultiDimMapping::for_axis(domain.clone(), axis, interpolator))
        }
    }

    pub fn method(&self) -> InterpolationMethod {
        match self {
            KeyedMapping::Time(m) => m.method(),
            KeyedMapping::MultiDim(m) => m.method(),
        }
    }

    pub fn out_of_range(&self) -> Option<f64> {
        match self {
            KeyedMapping::Time(m) => m.out_of_range(),
            KeyedMapping::MultiDim(m) => m.out_of_range(),
        }
    }

    /// Number of entries on the outermost axis.
    pub fn len(&self) -> usize {
        match self {
            KeyedMapping::Time(m) => m.len(),
            KeyedMapping::MultiDim(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_time(&self) -> Option<&TimeMapping> {
        match self {
            KeyedMapping::Time(m) => Some(m),
            KeyedMapping::MultiDim(_) => None,
        }
    }

    pub fn as_multi_dim(&self) -> Option<&MultiDimMapping> {
        match self {
            KeyedMapping::MultiDim(m) => Some(m),
            KeyedMapping::Time(_) => None,
        }
    }
}

impl From<TimeMapping> for KeyedMapping {
    fn from(m: TimeMapping) -> Self {
        KeyedMapping::Time(m)
    }
}

impl From<MultiDimMapping> for KeyedMapping {
    fn from(m: MultiDimMapping) -> Self {
        KeyedMapping::MultiDim(m)
    }
}

/// Mapping over time and at least one further dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiDimMapping {
    dimensions: DimensionSet,
    dimension: Dimension,
    entries: InterpolatingMap<KeyedMapping>,
}

impl MultiDimMapping {
    /// Mapping over `dimensions`, which must contain time and at least one
    /// other dimension.
    pub fn new(dimensions: DimensionSet, method: InterpolationMethod) -> MappingResult<Self> {
        Self::checked(dimensions, Interpolator::new(method))
    }

    /// Mapping returning `out_of_range` outside of its key ranges.
    pub fn with_out_of_range(
        dimensions: DimensionSet,
        method: InterpolationMethod,
        out_of_range: f64,
    ) -> MappingResult<Self> {
        Self::checked(dimensions, Interpolator::with_out_of_range(method, out_of_range))
    }

    fn checked(dimensions: DimensionSet, interpolator: Interpolator) -> MappingResult<Self> {
        if !dimensions.has_time() {
            return Err(MappingError::MissingTimeDimension(dimensions));
        }
        match dimensions.first() {
            Some(axis) if !axis.is_time() => Ok(Self::for_axis(dimensions, axis, interpolator)),
            _ => Err(MappingError::NoOuterDimension(dimensions)),
        }
    }

    pub(crate) fn for_axis(dimensions: DimensionSet, dimension: Dimension, interpolator: Interpolator) -> Self {
        Self {
            dimensions,
            dimension,
            entries: InterpolatingMap::new(interpolator),
        }
    }

    /// The axis this level is responsible for.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn method(&self) -> InterpolationMethod {
        self.entries.method()
    }

    pub fn out_of_range(&self) -> Option<f64> {
        self.entries.interpolator().out_of_range()
    }

    /// Number of sub-mappings on this axis.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sub-mapping stored exactly at `key` of this axis.
    pub fn sub_mapping(&self, key: f64) -> Option<&KeyedMapping> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> &InterpolatingMap<KeyedMapping> {
        &self.entries
    }

    /// Store a prebuilt sub-mapping at `key`, replacing any existing one.
    /// `sub` must cover the next inner axis.
    pub(crate) fn insert_sub_mapping(&mut self, key: f64, sub: KeyedMapping) {
        self.entries.append(key, sub);
    }

    /// Empty sub-mapping for the next inner axis, inheriting interpolation
    /// method and out-of-range value.
    fn create_sub_mapping(&self) -> KeyedMapping {
        KeyedMapping::for_axis(
            &self.dimensions,
            self.dimensions.next_inner(self.dimension),
            *self.entries.interpolator(),
        )
    }

    fn sub_value(&self, lookup: Lookup, pos: &Argument) -> f64 {
        match lookup {
            Lookup::Empty => 0.0,
            Lookup::OutOfRange => self.out_of_range().unwrap_or(0.0),
            Lookup::Entry { index, .. } => self.entries.value_at(index).value(pos),
            Lookup::Between {
                left,
                right,
                factor,
            } => LinearIntplMapping::new(self.entries.value_at(left), self.entries.value_at(right), factor)
                .value(pos),
        }
    }
}

impl ConstMapping for MultiDimMapping {
    fn dimension_set(&self) -> &DimensionSet {
        &self.dimensions
    }

    fn value(&self, pos: &Argument) -> f64 {
        self.sub_value(self.entries.lookup(pos.arg_value(self.dimension)), pos)
    }

    fn create_const_iterator(&self) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(MultiDimMappingIterator::new(self))
    }

    fn create_const_iterator_at(&self, pos: &Argument) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(MultiDimMappingIterator::at(self, pos))
    }

    fn const_clone(&self) -> Box<dyn ConstMapping> {
        Box::new(self.clone())
    }
}

impl Mapping for MultiDimMapping {
    fn set_value(&mut self, pos: &Argument, value: f64) {
        let key = pos.arg_value(self.dimension);
        let index = match self.entries.find(key) {
            Some(index) => index,
            None => {
                let sub = self.create_sub_mapping();
                self.entries.set(key, sub)
            }
        };
        self.entries.value_at_mut(index).set_value(pos, value);
    }

    fn append_value(&mut self, pos: &Argument, value: f64) {
        let key = pos.arg_value(self.dimension);
        let index = match self.entries.last_key() {
            Some(last) if last == key => self.entries.len() - 1,
            Some(last) if last > key => return self.set_value(pos, value),
            _ => {
                let sub = self.create_sub_mapping();
                self.entries.append(key, sub)
            }
        };
        self.entries.value_at_mut(index).append_value(pos, value);
    }

    fn create_iterator(&mut self) -> Box<dyn MappingIterator + '_> {
        Box::new(MultiDimMappingIterator::new(self))
    }

    fn create_iterator_at(&mut self, pos: &Argument) -> Box<dyn MappingIterator + '_> {
        Box::new(MultiDimMappingIterator::at(self, pos))
    }

    fn clone_mapping(&self) -> Box<dyn Mapping> {
        Box::new(self.clone())
    }
}

impl ConstMapping for KeyedMapping {
    fn dimension_set(&self) -> &DimensionSet {
        match self {
            KeyedMapping::Time(m) => m.dimension_set(),
            KeyedMapping::MultiDim(m) => m.dimension_set(),
        }
    }

    fn value(&self, pos: &Argument) -> f64 {
        match self {
            KeyedMapping::Time(m) => m.value(pos),
            KeyedMapping::MultiDim(m) => m.value(pos),
        }
    }

    fn create_const_iterator(&self) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(KeyedMappingIterator::new(self))
    }

    fn create_const_iterator_at(&self, pos: &Argument) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(KeyedMappingIterator::at(self, pos))
    }

    fn const_clone(&self) -> Box<dyn ConstMapping> {
        Box::new(self.clone())
    }
}

impl Mapping for KeyedMapping {
    fn set_value(&mut self, pos: &Argument, value: f64) {
        match self {
            KeyedMapping::Time(m) => m.set_value(pos, value),
            KeyedMapping::MultiDim(m) => m.set_value(pos, value),
        }
    }

    fn append_value(&mut self, pos: &Argument, value: f64) {
        match self {
            KeyedMapping::Time(m) => m.append_value(pos, value),
            KeyedMapping::MultiDim(m) => m.append_value(pos, value),
        }
    }

    fn create_iterator(&mut self) -> Box<dyn MappingIterator + '_> {
        Box::new(KeyedMappingIterator::new(self))
    }

    fn create_iterator_at(&mut self, pos: &Argument) -> Box<dyn MappingIterator + '_> {
        Box::new(KeyedMappingIterator::at(self, pos))
    }

    fn clone_mapping(&self) -> Box<dyn Mapping> {
        Box::new(self.clone())
    }
}

/// Cursor into the sub-mapping selected at the current key position.
#[derive(Debug, Clone)]
enum SubCursor {
    /// Empty axis without out-of-range value
    Missing,
    /// Out-of-range value
    Constant(f64),
    Stored {
        index: usize,
        exact: bool,
        cursor: Box<KeyedCursor>,
    },
    Blend {
        left: usize,
        right: usize,
        cursor: Box<LinearIntplCursor<KeyedCursor>>,
    },
}

impl SubCursor {
    /// Sub-cursor for `lookup`, positioned at `pos`. With `from_begin` an
    /// exactly hit sub-mapping is entered at its first key instead.
    fn create(m: &MultiDimMapping, lookup: Lookup, pos: &Argument, from_begin: bool) -> Self {
        match lookup {
            Lookup::Empty => SubCursor::Missing,
            Lookup::OutOfRange => SubCursor::Constant(m.out_of_range().unwrap_or(0.0)),
            Lookup::Entry { index, exact } => {
                let sub = m.entries.value_at(index);
                let cursor = if exact && from_begin {
                    KeyedCursor::begin(sub)
                } else {
                    KeyedCursor::at(sub, pos)
                };
                SubCursor::Stored {
                    index,
                    exact,
                    cursor: Box::new(cursor),
                }
            }
            Lookup::Between {
                left,
                right,
                factor,
            } => SubCursor::Blend {
                left,
                right,
                cursor: Box::new(LinearIntplCursor::at(
                    m.entries.value_at(left),
                    m.entries.value_at(right),
                    factor,
                    pos,
                )),
            },
        }
    }

    /// True if `lookup` selects the sub-mapping this cursor already walks.
    /// Blends are never reused.
    fn matches(&self, lookup: &Lookup) -> bool {
        match (self, lookup) {
            (SubCursor::Missing, Lookup::Empty) => true,
            (SubCursor::Constant(_), Lookup::OutOfRange) => true,
            (SubCursor::Stored { index, exact, .. }, Lookup::Entry { index: i, exact: e }) => {
                index == i && exact == e
            }
            _ => false,
        }
    }

    fn is_interpolated(&self) -> bool {
        !matches!(self, SubCursor::Stored { exact: true, .. })
    }

    fn position(&self) -> Option<&Argument> {
        match self {
            SubCursor::Stored { cursor, .. } => Some(cursor.position()),
            SubCursor::Blend { cursor, .. } => Some(cursor.position()),
            _ => None,
        }
    }

    fn peek_next(&self) -> Option<&Argument> {
        match self {
            SubCursor::Stored { cursor, .. } => Some(cursor.peek_next()),
            _ => None,
        }
    }

    fn value(&self, m: &MultiDimMapping) -> f64 {
        match self {
            SubCursor::Missing => 0.0,
            SubCursor::Constant(v) => *v,
            SubCursor::Stored { index, cursor, .. } => cursor.value(m.entries.value_at(*index)),
            SubCursor::Blend { left, right, cursor } => {
                cursor.value(m.entries.value_at(*left), m.entries.value_at(*right))
            }
        }
    }

    fn in_range(&self, m: &MultiDimMapping) -> bool {
        match self {
            SubCursor::Stored { index, cursor, .. } => cursor.in_range(m.entries.value_at(*index)),
            _ => false,
        }
    }

    fn has_next(&self, m: &MultiDimMapping) -> bool {
        match self {
            SubCursor::Stored { index, cursor, .. } => cursor.has_next(m.entries.value_at(*index)),
            _ => false,
        }
    }

    fn jump_to(&mut self, m: &MultiDimMapping, pos: &Argument) {
        match self {
            SubCursor::Stored { index, cursor, .. } => cursor.jump_to(m.entries.value_at(*index), pos),
            SubCursor::Blend { left, right, cursor } => {
                cursor.jump_to(m.entries.value_at(*left), m.entries.value_at(*right), pos)
            }
            _ => {}
        }
    }

    fn iterate_to(&mut self, m: &MultiDimMapping, pos: &Argument) {
        match self {
            SubCursor::Stored { index, cursor, .. } => cursor.iterate_to(m.entries.value_at(*index), pos),
            SubCursor::Blend { left, right, cursor } => {
                cursor.iterate_to(m.entries.value_at(*left), m.entries.value_at(*right), pos)
            }
            _ => {}
        }
    }

    fn jump_to_begin(&mut self, m: &MultiDimMapping) {
        if let SubCursor::Stored { index, cursor, .. } = self {
            cursor.jump_to_begin(m.entries.value_at(*index));
        }
    }

    fn advance(&mut self, m: &MultiDimMapping) {
        if let SubCursor::Stored { index, cursor, .. } = self {
            cursor.advance(m.entries.value_at(*index));
        }
    }
}

/// Cursor over a [`MultiDimMapping`].
#[derive(Debug, Clone)]
pub struct MultiDimCursor {
    keys: KeyCursor,
    sub: SubCursor,
    position: Argument,
    next_position: Argument,
}

impl MultiDimCursor {
    fn with_sub(m: &MultiDimMapping, keys: KeyCursor, sub: SubCursor, mut position: Argument) -> Self {
        if let Some(p) = sub.position() {
            position.set_arg_values(p, false);
        }
        position.set_arg_value(m.dimension, keys.position());
        let mut cursor = Self {
            keys,
            sub,
            next_position: position.clone(),
            position,
        };
        cursor.update_next_position(m);
        cursor
    }

    /// Re-select the sub-cursor after the key position changed and move it
    /// to `pos`.
    fn update_sub(&mut self, m: &MultiDimMapping, pos: &Argument) {
        let lookup = self.keys.lookup(&m.entries);
        if self.sub.matches(&lookup) {
            self.sub.jump_to(m, pos);
        } else {
            self.sub = SubCursor::create(m, lookup, pos, false);
        }
    }

    /// Re-select the sub-cursor after the key position changed and move it
    /// to the first key of the new sub-mapping.
    fn update_sub_begin(&mut self, m: &MultiDimMapping) {
        let lookup = self.keys.lookup(&m.entries);
        if self.sub.matches(&lookup) {
            self.sub.jump_to_begin(m);
        } else {
            self.sub = SubCursor::create(m, lookup, &self.position, true);
        }
    }

    fn update_next_position(&mut self, m: &MultiDimMapping) {
        let sub_next = if self.sub.is_interpolated() || !self.sub.has_next(m) {
            None
        } else {
            self.sub.peek_next()
        };

        self.next_position = self.position.clone();
        match sub_next {
            Some(next) => self.next_position.set_arg_values(next, false),
            None => {
                if let Some(index) = self.keys.next_index(&m.entries) {
                    let begin = KeyedCursor::begin(m.entries.value_at(index));
                    self.next_position.set_arg_values(begin.position(), false);
                }
                self.next_position
                    .set_arg_value(m.dimension, self.keys.next_position(&m.entries));
            }
        }
    }

    fn merge_sub_position(&mut self, m: &MultiDimMapping) {
        if let Some(p) = self.sub.position() {
            self.position.set_arg_values(p, false);
        }
        self.position.set_arg_value(m.dimension, self.keys.position());
    }
}

impl MappingCursor for MultiDimCursor {
    type Target = MultiDimMapping;

    fn begin(m: &MultiDimMapping) -> Self {
        let keys = KeyCursor::begin(&m.entries);
        let position = Argument::with_domain(&m.dimensions, 0.0);
        let sub = SubCursor::create(m, keys.lookup(&m.entries), &position, true);
        Self::with_sub(m, keys, sub, position)
    }

    fn at(m: &MultiDimMapping, pos: &Argument) -> Self {
        let mut position = Argument::with_domain(&m.dimensions, pos.time());
        position.set_arg_values(pos, true);
        let keys = KeyCursor::at(&m.entries, position.arg_value(m.dimension));
        let sub = SubCursor::create(m, keys.lookup(&m.entries), &position, false);
        Self::with_sub(m, keys, sub, position)
    }

    fn position(&self) -> &Argument {
        &self.position
    }

    fn peek_next(&self) -> &Argument {
        &self.next_position
    }

    fn has_next(&self, m: &MultiDimMapping) -> bool {
        self.keys.has_next(&m.entries) || (self.sub.has_next(m) && self.keys.in_range(&m.entries))
    }

    fn in_range(&self, m: &MultiDimMapping) -> bool {
        self.keys.in_range(&m.entries) && (self.sub.is_interpolated() || self.sub.in_range(m))
    }

    fn value(&self, m: &MultiDimMapping) -> f64 {
        self.sub.value(m)
    }

    fn jump_to(&mut self, m: &MultiDimMapping, pos: &Argument) {
        self.position.set_arg_values(pos, true);
        let target = self.position.clone();
        let key = target.arg_value(m.dimension);
        if key != self.keys.position() {
            self.keys.jump_to(&m.entries, key);
            self.update_sub(m, &target);
        } else {
            self.sub.jump_to(m, &target);
        }
        self.update_next_position(m);
    }

    fn iterate_to(&mut self, m: &MultiDimMapping, pos: &Argument) {
        self.position.set_arg_values(pos, true);
        let target = self.position.clone();
        let key = target.arg_value(m.dimension);
        if key != self.keys.position() {
            self.keys.iterate_to(&m.entries, key);
            self.update_sub(m, &target);
        } else {
            self.sub.iterate_to(m, &target);
        }
        self.update_next_position(m);
    }

    fn jump_to_begin(&mut self, m: &MultiDimMapping) {
        self.keys.jump_to_begin(&m.entries);
        self.update_sub_begin(m);
        self.merge_sub_position(m);
        self.update_next_position(m);
    }

    fn advance(&mut self, m: &MultiDimMapping) {
        if !self.sub.is_interpolated() && self.sub.has_next(m) {
            self.sub.advance(m);
        } else {
            self.keys.next(&m.entries);
            self.update_sub_begin(m);
        }
        self.merge_sub_position(m);
        self.update_next_position(m);
    }

    fn set_value(&mut self, m: &mut MultiDimMapping, value: f64) {
        if self.sub.is_interpolated() {
            // no sub-mapping at this key yet
            let sub = m.create_sub_mapping();
            self.keys.set_value(&mut m.entries, sub);
            self.sub = SubCursor::Missing;
            let target = self.position.clone();
            self.update_sub(m, &target);
        }
        if let SubCursor::Stored { index, cursor, .. } = &mut self.sub {
            cursor.set_value(m.entries.value_at_mut(*index), value);
        }
        self.update_next_position(m);
    }
}

/// Cursor over a [`KeyedMapping`].
#[derive(Debug, Clone)]
pub enum KeyedCursor {
    Time(TimeCursor),
    MultiDim(MultiDimCursor),
}

macro_rules! dispatch {
    ($cursor:expr, $mapping:expr, |$c:ident, $m:ident| $body:expr) => {
        match ($cursor, $mapping) {
            (KeyedCursor::Time($c), KeyedMapping::Time($m)) => $body,
            (KeyedCursor::MultiDim($c), KeyedMapping::MultiDim($m)) => $body,
            _ => unreachable!("cursor used with a mapping of another kind"),
        }
    };
}

impl MappingCursor for KeyedCursor {
    type Target = KeyedMapping;

    fn begin(m: &KeyedMapping) -> Self {
        match m {
            KeyedMapping::Time(m) => KeyedCursor::Time(TimeCursor::begin(m)),
            KeyedMapping::MultiDim(m) => KeyedCursor::MultiDim(MultiDimCursor::begin(m)),
        }
    }

    fn at(m: &KeyedMapping, pos: &Argument) -> Self {
        match m {
            KeyedMapping::Time(m) => KeyedCursor::Time(TimeCursor::at(m, pos)),
            KeyedMapping::MultiDim(m) => KeyedCursor::MultiDim(MultiDimCursor::at(m, pos)),
        }
    }

    fn position(&self) -> &Argument {
        match self {
            KeyedCursor::Time(c) => c.position(),
            KeyedCursor::MultiDim(c) => c.position(),
        }
    }

    fn peek_next(&self) -> &Argument {
        match self {
            KeyedCursor::Time(c) => c.peek_next(),
            KeyedCursor::MultiDim(c) => c.peek_next(),
        }
    }

    fn has_next(&self, m: &KeyedMapping) -> bool {
        dispatch!(self, m, |c, m| c.has_next(m))
    }

    fn in_range(&self, m: &KeyedMapping) -> bool {
        dispatch!(self, m, |c, m| c.in_range(m))
    }

    fn value(&self, m: &KeyedMapping) -> f64 {
        dispatch!(self, m, |c, m| c.value(m))
    }

    fn jump_to(&mut self, m: &KeyedMapping, pos: &Argument) {
        dispatch!(self, m, |c, m| c.jump_to(m, pos))
    }

    fn iterate_to(&mut self, m: &KeyedMapping, pos: &Argument) {
        dispatch!(self, m, |c, m| c.iterate_to(m, pos))
    }

    fn jump_to_begin(&mut self, m: &KeyedMapping) {
        dispatch!(self, m, |c, m| c.jump_to_begin(m))
    }

    fn advance(&mut self, m: &KeyedMapping) {
        dispatch!(self, m, |c, m| c.advance(m))
    }

    fn set_value(&mut self, m: &mut KeyedMapping, value: f64) {
        dispatch!(self, m, |c, m| c.set_value(m, value))
    }
}

/// Iterator over a [`MultiDimMapping`].
pub type MultiDimMappingIterator<M> = CursorIterator<M, MultiDimCursor>;

/// Iterator over a [`KeyedMapping`].
pub type KeyedMappingIterator<M> = CursorIterator<M, KeyedCursor>;
