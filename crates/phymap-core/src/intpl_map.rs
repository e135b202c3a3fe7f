//! # Interpolating Ordered Container
//!
//! [`InterpolatingMap`] is a sorted `key -> value` store paired with an
//! [`Interpolator`]. Entries live in a `Vec` sorted by key, which keeps
//! sequential access cache friendly and makes appending at the end cheap.
//!
//! [`KeyCursor`] is the matching cursor. It holds a logical position (which
//! need not be a stored key) and the index of the first entry after it, so
//! that interpolated lookups at the cursor cost O(1):
//!
//! ```text
//!   keys:      1.0     2.0     4.0
//!                  ^ position 1.5
//!                          ^ right = 1
//! ```
//!
//! The cursor does not borrow the container. Every operation takes the
//! container as an argument, which lets mapping iterators own a cursor and a
//! reference to their mapping side by side.

use crate::interpolation::{upper_bound, InterpolationMethod, Interpolated, Interpolator, Lookup};

/// Sorted key/value entries with an interpolation policy.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatingMap<V> {
    entries: Vec<(f64, V)>,
    interpolator: Interpolator,
}

impl<V> InterpolatingMap<V> {
    pub fn new(interpolator: Interpolator) -> Self {
        Self {
            entries: Vec::new(),
            interpolator,
        }
    }

    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }

    pub fn method(&self) -> InterpolationMethod {
        self.interpolator.method()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by key.
    pub fn entries(&self) -> &[(f64, V)] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn first_key(&self) -> Option<f64> {
        self.entries.first().map(|(k, _)| *k)
    }

    pub fn last_key(&self) -> Option<f64> {
        self.entries.last().map(|(k, _)| *k)
    }

    /// Index of the entry stored exactly at `key`.
    pub fn find(&self, key: f64) -> Option<usize> {
        let index = self.entries.partition_point(|(k, _)| *k < key);
        match self.entries.get(index) {
            Some((k, _)) if *k == key => Some(index),
            _ => None,
        }
    }

    pub fn get(&self, key: f64) -> Option<&V> {
        self.find(key).map(|i| &self.entries[i].1)
    }

    pub fn value_at(&self, index: usize) -> &V {
        &self.entries[index].1
    }

    pub fn value_at_mut(&mut self, index: usize) -> &mut V {
        &mut self.entries[index].1
    }

    /// Insert or overwrite the entry at `key`. Returns its index.
    pub fn set(&mut self, key: f64, value: V) -> usize {
        let index = self.entries.partition_point(|(k, _)| *k < key);
        match self.entries.get_mut(index) {
            Some(entry) if entry.0 == key => entry.1 = value,
            _ => self.entries.insert(index, (key, value)),
        }
        index
    }

    /// Like [`set`](Self::set), cheap when `key` is past the last key.
    pub fn append(&mut self, key: f64, value: V) -> usize {
        match self.last_key() {
            Some(last) if last >= key => self.set(key, value),
            _ => {
                self.entries.push((key, value));
                self.entries.len() - 1
            }
        }
    }

    /// Resolve `pos` with the configured interpolation method.
    pub fn lookup(&self, pos: f64) -> Lookup {
        self.interpolator.locate(&self.entries, pos)
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<(f64, V)> {
        &mut self.entries
    }
}

impl InterpolatingMap<f64> {
    /// Interpolated value at `pos`.
    pub fn intpl_value(&self, pos: f64) -> Interpolated<f64> {
        self.interpolator.value(&self.entries, pos)
    }
}

/// Position inside an [`InterpolatingMap`].
///
/// `right` is the index of the first entry with a key greater than
/// `position`, or the entry count if there is none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyCursor {
    position: f64,
    right: usize,
}

impl KeyCursor {
    /// Cursor at an arbitrary position.
    pub fn at<V>(map: &InterpolatingMap<V>, position: f64) -> Self {
        Self {
            position,
            right: upper_bound(map.entries(), position),
        }
    }

    /// Cursor at the first key (or at zero for an empty map).
    pub fn begin<V>(map: &InterpolatingMap<V>) -> Self {
        match map.first_key() {
            Some(first) => Self {
                position: first,
                right: 1,
            },
            None => Self {
                position: 0.0,
                right: 0,
            },
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Reposition anywhere, in logarithmic time.
    pub fn jump_to<V>(&mut self, map: &InterpolatingMap<V>, position: f64) {
        if position == self.position {
            return;
        }
        self.position = position;
        self.right = upper_bound(map.entries(), position);
    }

    pub fn jump_to_begin<V>(&mut self, map: &InterpolatingMap<V>) {
        *self = Self::begin(map);
    }

    /// Move forward to `position`, scanning entries from the current one.
    ///
    /// `position` must not be smaller than the current position.
    pub fn iterate_to<V>(&mut self, map: &InterpolatingMap<V>, position: f64) {
        let entries = map.entries();
        self.position = position;
        while self.right < entries.len() && entries[self.right].0 <= position {
            self.right += 1;
        }
    }

    /// Advance to the next key. Past the last key the position moves on by
    /// one unit without a backing entry.
    pub fn next<V>(&mut self, map: &InterpolatingMap<V>) {
        match map.entries().get(self.right) {
            Some((key, _)) => {
                self.position = *key;
                self.right += 1;
            }
            None => self.position += 1.0,
        }
    }

    /// Position [`next`](Self::next) would move to.
    pub fn next_position<V>(&self, map: &InterpolatingMap<V>) -> f64 {
        map.entries()
            .get(self.right)
            .map(|(k, _)| *k)
            .unwrap_or(self.position + 1.0)
    }

    /// Index of the entry [`next`](Self::next) would move to.
    pub fn next_index<V>(&self, map: &InterpolatingMap<V>) -> Option<usize> {
        (self.right < map.len()).then_some(self.right)
    }

    pub fn has_next<V>(&self, map: &InterpolatingMap<V>) -> bool {
        self.right < map.len()
    }

    /// True if the position lies within `[first key, last key]`.
    pub fn in_range<V>(&self, map: &InterpolatingMap<V>) -> bool {
        match (map.first_key(), map.last_key()) {
            (Some(first), Some(last)) => first <= self.position && self.position <= last,
            _ => false,
        }
    }

    /// Resolve the current position.
    pub fn lookup<V>(&self, map: &InterpolatingMap<V>) -> Lookup {
        map.interpolator()
            .locate_with_upper(map.entries(), self.position, self.right)
    }

    /// Store `value` at the current position, overwriting an entry that sits
    /// exactly there or inserting a new one.
    pub fn set_value<V>(&mut self, map: &mut InterpolatingMap<V>, value: V) {
        let position = self.position;
        let entries = map.entries_mut();
        if self.right > 0 && entries[self.right - 1].0 == position {
            entries[self.right - 1].1 = value;
        } else {
            entries.insert(self.right, (position, value));
            self.right += 1;
        }
    }
}

impl InterpolatingMap<f64> {
    /// Value at the cursor position.
    pub fn cursor_value(&self, cursor: &KeyCursor) -> Interpolated<f64> {
        cursor
            .lookup(self)
            .resolve(self.entries(), self.interpolator().out_of_range())
    }
}
