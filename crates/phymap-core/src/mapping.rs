//! # Mapping Abstraction
//!
//! A mapping is a function from an [`Argument`] to an `f64`, defined by a
//! set of key points and an interpolation policy between them.
//!
//! - [`ConstMapping`]: read access and const iterators
//! - [`Mapping`]: additionally `set_value` and mutable iterators
//!
//! ## Iterators
//!
//! An iterator is always positioned. It starts at the first key point (or
//! at a requested position) and moves with `next`, `jump_to` or
//! `iterate_to`. Once it moves past the last key point, `in_range` turns
//! false. Only `jump_to` and `jump_to_begin` bring it back.
//!
//! ```text
//!   jump_to_begin ──► [Positioned] ──next/iterate_to──► [Positioned]
//!                          │                                 │
//!                          └───── past last key ─────► in_range() == false
//! ```
//!
//! The value reported by an iterator at a position always equals
//! `mapping.value(position)`.
//!
//! Iterators borrow their mapping. Mutating a mapping while one of its
//! iterators is alive is therefore rejected by the compiler; use
//! [`MappingIterator::set_value`] to write through an iterator instead.
//!
//! ## Cursors
//!
//! The concrete mappings keep their iteration state in a [`MappingCursor`],
//! a plain value that receives the mapping as an argument on every call.
//! [`CursorIterator`] pairs a cursor with a (borrowed or owned) mapping and
//! implements the iterator traits on top of it.

use std::borrow::{Borrow, BorrowMut};
use std::fmt;

use crate::argument::Argument;
use crate::dimension::DimensionSet;
use crate::error::{MappingError, MappingResult};

/// Read access to a position inside a mapping.
pub trait ConstMappingIterator {
    /// Current position.
    fn position(&self) -> &Argument;

    /// Position a call to [`next`](Self::next) would move to.
    ///
    /// Fails with [`MappingError::NoNextPosition`] if `has_next()` is false.
    fn next_position(&self) -> MappingResult<&Argument>;

    /// Value of the mapping at the current position.
    fn value(&self) -> f64;

    /// Move to an arbitrary position.
    fn jump_to(&mut self, pos: &Argument);

    /// Move forward to `pos`, which must not lie before the current
    /// position. Cheap if `pos` is close.
    fn iterate_to(&mut self, pos: &Argument);

    /// Move to the first key point.
    fn jump_to_begin(&mut self);

    /// Move to the next key point.
    ///
    /// Fails with [`MappingError::NoNextPosition`] if `has_next()` is false.
    fn next(&mut self) -> MappingResult<()>;

    /// True while the position lies within the key range of the mapping.
    fn in_range(&self) -> bool;

    /// True if there is a further key point [`next`](Self::next) can move to.
    fn has_next(&self) -> bool;
}

/// Iterator that can also write at its current position.
pub trait MappingIterator: ConstMappingIterator {
    /// Store `value` at the current position.
    fn set_value(&mut self, value: f64);
}

impl<T: ConstMappingIterator + ?Sized> ConstMappingIterator for Box<T> {
    fn position(&self) -> &Argument {
        (**self).position()
    }

    fn next_position(&self) -> MappingResult<&Argument> {
        (**self).next_position()
    }

    fn value(&self) -> f64 {
        (**self).value()
    }

    fn jump_to(&mut self, pos: &Argument) {
        (**self).jump_to(pos)
    }

    fn iterate_to(&mut self, pos: &Argument) {
        (**self).iterate_to(pos)
    }

    fn jump_to_begin(&mut self) {
        (**self).jump_to_begin()
    }

    fn next(&mut self) -> MappingResult<()> {
        (**self).next()
    }

    fn in_range(&self) -> bool {
        (**self).in_range()
    }

    fn has_next(&self) -> bool {
        (**self).has_next()
    }
}

impl<T: MappingIterator + ?Sized> MappingIterator for Box<T> {
    fn set_value(&mut self, value: f64) {
        (**self).set_value(value)
    }
}

/// Read-only function from [`Argument`] to `f64`.
pub trait ConstMapping: fmt::Debug {
    /// Domain of this mapping.
    fn dimension_set(&self) -> &DimensionSet;

    /// Value at `pos`. Dimensions of `pos` outside the domain are ignored,
    /// missing ones read as zero.
    fn value(&self, pos: &Argument) -> f64;

    /// Iterator positioned at the first key point.
    fn create_const_iterator(&self) -> Box<dyn ConstMappingIterator + '_>;

    /// Iterator positioned at `pos`.
    fn create_const_iterator_at(&self, pos: &Argument) -> Box<dyn ConstMappingIterator + '_>;

    /// Independent deep copy.
    fn const_clone(&self) -> Box<dyn ConstMapping>;
}

/// A [`ConstMapping`] that can be changed.
pub trait Mapping: ConstMapping {
    /// Store `value` at `pos`. A subsequent `value(pos)` returns exactly
    /// `value`.
    fn set_value(&mut self, pos: &Argument, value: f64);

    /// Like [`set_value`](Self::set_value) for a `pos` that lies after every
    /// existing key point.
    fn append_value(&mut self, pos: &Argument, value: f64) {
        self.set_value(pos, value)
    }

    fn create_iterator(&mut self) -> Box<dyn MappingIterator + '_>;

    fn create_iterator_at(&mut self, pos: &Argument) -> Box<dyn MappingIterator + '_>;

    /// Independent deep copy.
    fn clone_mapping(&self) -> Box<dyn Mapping>;
}

/// Iteration state over a mapping of type `Target`.
///
/// A cursor never holds a reference to its mapping; the mapping is passed in
/// on each call and must be the one the cursor was created for.
pub trait MappingCursor: Clone + fmt::Debug {
    type Target: ?Sized;

    /// Cursor at the first key point of `m`.
    fn begin(m: &Self::Target) -> Self;

    /// Cursor at `pos`.
    fn at(m: &Self::Target, pos: &Argument) -> Self;

    fn position(&self) -> &Argument;

    /// Position [`advance`](Self::advance) would move to. Meaningless if
    /// `has_next` is false.
    fn peek_next(&self) -> &Argument;

    fn has_next(&self, m: &Self::Target) -> bool;

    fn in_range(&self, m: &Self::Target) -> bool;

    fn value(&self, m: &Self::Target) -> f64;

    fn jump_to(&mut self, m: &Self::Target, pos: &Argument);

    fn iterate_to(&mut self, m: &Self::Target, pos: &Argument);

    fn jump_to_begin(&mut self, m: &Self::Target);

    /// Move to the next position without checking `has_next`.
    fn advance(&mut self, m: &Self::Target);

    fn set_value(&mut self, m: &mut Self::Target, value: f64);
}

/// A mapping (borrowed or owned) together with a cursor into it.
///
/// With `M = &T` this is a const iterator, with `M = &mut T` a mutable one,
/// and with `M = T` an iterator that owns its mapping.
#[derive(Debug, Clone)]
pub struct CursorIterator<M, C> {
    mapping: M,
    cursor: C,
}

impl<M, C> CursorIterator<M, C>
where
    C: MappingCursor,
    M: Borrow<C::Target>,
{
    /// Iterator at the first key point.
    pub fn new(mapping: M) -> Self {
        let cursor = C::begin(mapping.borrow());
        Self { mapping, cursor }
    }

    /// Iterator at `pos`.
    pub fn at(mapping: M, pos: &Argument) -> Self {
        let cursor = C::at(mapping.borrow(), pos);
        Self { mapping, cursor }
    }

    pub fn mapping(&self) -> &C::Target {
        self.mapping.borrow()
    }

    pub fn into_mapping(self) -> M {
        self.mapping
    }
}

impl<M, C> ConstMappingIterator for CursorIterator<M, C>
where
    C: MappingCursor,
    M: Borrow<C::Target>,
{
    fn position(&self) -> &Argument {
        self.cursor.position()
    }

    fn next_position(&self) -> MappingResult<&Argument> {
        if !self.has_next() {
            return Err(MappingError::NoNextPosition);
        }
        Ok(self.cursor.peek_next())
    }

    fn value(&self) -> f64 {
        self.cursor.value(self.mapping.borrow())
    }

    fn jump_to(&mut self, pos: &Argument) {
        self.cursor.jump_to(self.mapping.borrow(), pos)
    }

    fn iterate_to(&mut self, pos: &Argument) {
        self.cursor.iterate_to(self.mapping.borrow(), pos)
    }

    fn jump_to_begin(&mut self) {
        self.cursor.jump_to_begin(self.mapping.borrow())
    }

    fn next(&mut self) -> MappingResult<()> {
        if !self.has_next() {
            return Err(MappingError::NoNextPosition);
        }
        self.cursor.advance(self.mapping.borrow());
        Ok(())
    }

    fn in_range(&self) -> bool {
        self.cursor.in_range(self.mapping.borrow())
    }

    fn has_next(&self) -> bool {
        self.cursor.has_next(self.mapping.borrow())
    }
}

impl<M, C> MappingIterator for CursorIterator<M, C>
where
    C: MappingCursor,
    M: BorrowMut<C::Target>,
{
    fn set_value(&mut self, value: f64) {
        self.cursor.set_value(self.mapping.borrow_mut(), value)
    }
}

/// Adapts a mapping iterator to a std [`Iterator`] over `(position, value)`
/// of every in-range position it visits.
pub struct KeyPoints<I> {
    it: I,
    started: bool,
    finished: bool,
}

impl<I: ConstMappingIterator> KeyPoints<I> {
    pub fn new(it: I) -> Self {
        Self {
            it,
            started: false,
            finished: false,
        }
    }
}

impl<'a> KeyPoints<Box<dyn ConstMappingIterator + 'a>> {
    /// Key points of `mapping`, starting at the first one.
    pub fn of(mapping: &'a dyn ConstMapping) -> Self {
        Self::new(mapping.create_const_iterator())
    }
}

impl<I: ConstMappingIterator> Iterator for KeyPoints<I> {
    type Item = (Argument, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.started && self.it.next().is_err() {
            self.finished = true;
            return None;
        }
        self.started = true;

        if !self.it.in_range() {
            self.finished = true;
            return None;
        }
        Some((self.it.position().clone(), self.it.value()))
    }
}
