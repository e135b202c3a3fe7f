//! Time-shifted mappings
//!
//! [`DelayedMapping`] moves a wrapped mapping along the time axis, which is
//! how a signal's power mapping is placed at the receiver after the
//! propagation delay. A query at `t` reads the wrapped mapping at
//! `t - delay`; iterator positions are reported shifted by `+delay`.

use crate::argument::{Argument, SimTime};
use crate::dimension::DimensionSet;
use crate::error::{MappingError, MappingResult};
use crate::mapping::{ConstMapping, ConstMappingIterator, Mapping, MappingIterator};

/// A mapping shifted by `delay` in time.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayedMapping<M> {
    mapping: M,
    delay: SimTime,
}

impl<M> DelayedMapping<M> {
    pub fn new(mapping: M, delay: SimTime) -> Self {
        Self { mapping, delay }
    }

    pub fn delay(&self) -> SimTime {
        self.delay
    }

    pub fn set_delay(&mut self, delay: SimTime) {
        self.delay = delay;
    }

    /// The undelayed mapping.
    pub fn inner(&self) -> &M {
        &self.mapping
    }

    pub fn into_inner(self) -> M {
        self.mapping
    }

    fn undelay(&self, pos: &Argument) -> Argument {
        shifted(pos, -self.delay)
    }
}

fn shifted(pos: &Argument, by: SimTime) -> Argument {
    let mut res = pos.clone();
    res.set_time(pos.time() + by);
    res
}

impl<M: ConstMapping + Clone + 'static> ConstMapping for DelayedMapping<M> {
    fn dimension_set(&self) -> &DimensionSet {
        self.mapping.dimension_set()
    }

    fn value(&self, pos: &Argument) -> f64 {
        self.mapping.value(&self.undelay(pos))
    }

    fn create_const_iterator(&self) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(DelayedMappingIterator::new(self.mapping.create_const_iterator(), self.delay))
    }

    fn create_const_iterator_at(&self, pos: &Argument) -> Box<dyn ConstMappingIterator + '_> {
        let it = self.mapping.create_const_iterator_at(&self.undelay(pos));
        Box::new(DelayedMappingIterator::new(it, self.delay))
    }

    fn const_clone(&self) -> Box<dyn ConstMapping> {
        Box::new(self.clone())
    }
}

impl<M: Mapping + Clone + 'static> Mapping for DelayedMapping<M> {
    fn set_value(&mut self, pos: &Argument, value: f64) {
        let pos = self.undelay(pos);
        self.mapping.set_value(&pos, value);
    }

    fn append_value(&mut self, pos: &Argument, value: f64) {
        let pos = self.undelay(pos);
        self.mapping.append_value(&pos, value);
    }

    fn create_iterator(&mut self) -> Box<dyn MappingIterator + '_> {
        let delay = self.delay;
        Box::new(DelayedMappingIterator::new(self.mapping.create_iterator(), delay))
    }

    fn create_iterator_at(&mut self, pos: &Argument) -> Box<dyn MappingIterator + '_> {
        let (delay, pos) = (self.delay, self.undelay(pos));
        Box::new(DelayedMappingIterator::new(self.mapping.create_iterator_at(&pos), delay))
    }

    fn clone_mapping(&self) -> Box<dyn Mapping> {
        Box::new(self.clone())
    }
}

/// Iterator over a [`DelayedMapping`], wrapping an iterator over the
/// undelayed mapping.
#[derive(Debug)]
pub struct DelayedMappingIterator<I> {
    inner: I,
    delay: SimTime,
    position: Argument,
    next_position: Option<Argument>,
}

impl<I: ConstMappingIterator> DelayedMappingIterator<I> {
    pub fn new(inner: I, delay: SimTime) -> Self {
        let mut it = Self {
            position: Argument::default(),
            next_position: None,
            inner,
            delay,
        };
        it.update_position();
        it
    }

    fn update_position(&mut self) {
        self.position = shifted(self.inner.position(), self.delay);
        self.next_position = self
            .inner
            .next_position()
            .ok()
            .map(|next| shifted(next, self.delay));
    }

    fn undelay(&self, pos: &Argument) -> Argument {
        shifted(pos, -self.delay)
    }
}

impl<I: ConstMappingIterator> ConstMappingIterator for DelayedMappingIterator<I> {
    fn position(&self) -> &Argument {
        &self.position
    }

    fn next_position(&self) -> MappingResult<&Argument> {
        self.next_position.as_ref().ok_or(MappingError::NoNextPosition)
    }

    fn value(&self) -> f64 {
        self.inner.value()
    }

    fn jump_to(&mut self, pos: &Argument) {
        let pos = self.undelay(pos);
        self.inner.jump_to(&pos);
        self.update_position();
    }

    fn iterate_to(&mut self, pos: &Argument) {
        let pos = self.undelay(pos);
        self.inner.iterate_to(&pos);
        self.update_position();
    }

    fn jump_to_begin(&mut self) {
        self.inner.jump_to_begin();
        self.update_position();
    }

    fn next(&mut self) -> MappingResult<()> {
        self.inner.next()?;
        self.update_position();
        Ok(())
    }

    fn in_range(&self) -> bool {
        self.inner.in_range()
    }

    fn has_next(&self) -> bool {
        self.inner.has_next()
    }
}

impl<I: MappingIterator> MappingIterator for DelayedMappingIterator<I> {
    fn set_value(&mut self, value: f64) {
        self.inner.set_value(value);
        self.update_position();
    }
}
