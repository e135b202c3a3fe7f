//! Coordinate axes and domains
//!
//! A [`Dimension`] is a named coordinate axis such as `time` or `frequency`.
//! Names are interned in a process-wide registry on first use and mapped to a
//! small integer id. Ids are handed out in order of first registration and
//! never change afterwards, so the order in which dimensions are first created
//! defines their ordering. Only `time` has a fixed id: it is always `0`, the
//! smallest, which makes it the innermost axis of every mapping.
//!
//! A [`DimensionSet`] is the domain of a mapping: an ordered set of dimensions
//! sorted by id. Every mapping domain must contain `time`; constructors that
//! build mappings check this and report [`MappingError::MissingTimeDimension`].
//!
//! ```text
//!   id:    0        1           2
//!        time   frequency   channel
//!        ^ innermost          ^ outermost axis of a MultiDimMapping
//! ```
//!
//! [`MappingError::MissingTimeDimension`]: crate::error::MappingError::MissingTimeDimension

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Name of the mandatory time dimension
pub const TIME_DIMENSION_NAME: &str = "time";

#[derive(Debug)]
struct DimensionRegistry {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl DimensionRegistry {
    fn new() -> Self {
        let mut ids = HashMap::new();
        ids.insert(TIME_DIMENSION_NAME.to_string(), 0);
        Self {
            ids,
            names: vec![TIME_DIMENSION_NAME.to_string()],
        }
    }
}

static REGISTRY: OnceLock<RwLock<DimensionRegistry>> = OnceLock::new();

fn registry() -> &'static RwLock<DimensionRegistry> {
    REGISTRY.get_or_init(|| RwLock::new(DimensionRegistry::new()))
}

/// Look up (or register) the dimension with the given name.
///
/// Idempotent: equal names always yield the same dimension.
pub fn dimension_for(name: &str) -> Dimension {
    {
        let reg = registry().read().unwrap_or_else(PoisonError::into_inner);
        if let Some(&id) = reg.ids.get(name) {
            return Dimension(id);
        }
    }

    let mut reg = registry().write().unwrap_or_else(PoisonError::into_inner);
    // Another caller may have registered the name between the two locks
    if let Some(&id) = reg.ids.get(name) {
        return Dimension(id);
    }
    let id = reg.names.len() as u32;
    reg.ids.insert(name.to_string(), id);
    reg.names.push(name.to_string());
    tracing::debug!(dimension = name, id, "registered dimension");
    Dimension(id)
}

/// A named coordinate axis, identified by its interned id.
///
/// Dimensions are ordered by id; `time` is always the smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dimension(u32);

impl Dimension {
    /// The time dimension (id `0`).
    pub const fn time() -> Self {
        Dimension(0)
    }

    /// Dimension with the passed name, registering it if necessary.
    pub fn new(name: &str) -> Self {
        dimension_for(name)
    }

    /// Unique id of this dimension.
    pub fn id(&self) -> u32 {
        self.0
    }

    /// Returns true for the time dimension.
    pub fn is_time(&self) -> bool {
        self.0 == 0
    }

    /// Registered name of this dimension.
    pub fn name(&self) -> String {
        let reg = registry().read().unwrap_or_else(PoisonError::into_inner);
        reg.names
            .get(self.0 as usize)
            .cloned()
            .unwrap_or_else(|| format!("dim{}", self.0))
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::time()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

/// An ordered set of dimensions describing the domain of a mapping.
///
/// Unlike an [`Argument`](crate::argument::Argument), a set does not contain
/// `time` implicitly. Use [`DimensionSet::time_domain`] or add it explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DimensionSet {
    dims: BTreeSet<Dimension>,
}

impl DimensionSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The one-dimensional time domain.
    pub fn time_domain() -> Self {
        Self::from_dimensions([Dimension::time()])
    }

    /// Set containing the passed dimensions.
    pub fn from_dimensions(dims: impl IntoIterator<Item = Dimension>) -> Self {
        Self {
            dims: dims.into_iter().collect(),
        }
    }

    /// Builder style variant of [`add_dimension`](Self::add_dimension).
    pub fn with(mut self, dim: Dimension) -> Self {
        self.dims.insert(dim);
        self
    }

    pub fn add_dimension(&mut self, dim: Dimension) {
        self.dims.insert(dim);
    }

    pub fn has_dimension(&self, dim: Dimension) -> bool {
        self.dims.contains(&dim)
    }

    pub fn has_time(&self) -> bool {
        self.has_dimension(Dimension::time())
    }

    pub fn len(&self) -> usize {
        self.dims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Dimensions in ascending id order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Dimension> + '_ {
        self.dims.iter().copied()
    }

    /// The dimension with the highest id (the outermost axis).
    pub fn first(&self) -> Option<Dimension> {
        self.dims.last().copied()
    }

    /// The next smaller dimension after `dim`.
    ///
    /// Returns `dim` itself for time, for a dimension not in the set, and for
    /// the smallest dimension of the set.
    pub fn next_inner(&self, dim: Dimension) -> Dimension {
        if dim.is_time() || !self.has_dimension(dim) {
            return dim;
        }
        self.dims.range(..dim).next_back().copied().unwrap_or(dim)
    }

    /// True if every dimension of `self` is also in `other`.
    pub fn is_subset(&self, other: &DimensionSet) -> bool {
        self.dims.is_subset(&other.dims)
    }

    /// True if `self` is a subset of `other` and `other` has at least one
    /// dimension more.
    pub fn is_proper_subset(&self, other: &DimensionSet) -> bool {
        self.len() < other.len() && self.is_subset(other)
    }

    /// True if `self` is a proper subset of `other` and the dimensions
    /// missing from `self` are exactly the highest ones of `other`.
    ///
    /// Values of a simple subset can be broadcast to `other` by repeating
    /// whole sub-mappings along the missing outer axes.
    pub fn is_simple_subset(&self, other: &DimensionSet) -> bool {
        if !self.is_proper_subset(other) {
            return false;
        }
        match self.first() {
            None => true,
            Some(highest) => other
                .iter()
                .filter(|d| !self.has_dimension(*d))
                .all(|missing| missing > highest),
        }
    }
}

impl From<Dimension> for DimensionSet {
    fn from(dim: Dimension) -> Self {
        Self::from_dimensions([dim])
    }
}

impl FromIterator<Dimension> for DimensionSet {
    fn from_iter<I: IntoIterator<Item = Dimension>>(iter: I) -> Self {
        Self::from_dimensions(iter)
    }
}

impl fmt::Display for DimensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", dim)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_is_smallest() {
        let time = Dimension::new("time");
        let freq = Dimension::new("frequency");
        assert_eq!(time, Dimension::time());
        assert_eq!(time.id(), 0);
        assert!(time < freq);
        assert_eq!(time.name(), "time");
        assert_eq!(freq.name(), "frequency");
    }

    #[test]
    fn test_registry_is_idempotent() {
        let a = dimension_for("dimension_test_axis");
        let b = Dimension::new("dimension_test_axis");
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
        assert_eq!(format!("{}", a), format!("dimension_test_axis({})", a.id()));
    }

    #[test]
    fn test_first_and_next_inner() {
        let freq = Dimension::new("frequency");
        let space = Dimension::new("dimension_test_space");
        let dims = DimensionSet::from_dimensions([Dimension::time(), freq]);
        assert_eq!(dims.first(), Some(freq));
        assert_eq!(dims.next_inner(freq), Dimension::time());
        assert_eq!(dims.next_inner(Dimension::time()), Dimension::time());

        let dims = dims.with(space);
        assert_eq!(dims.first(), Some(space));
        assert_eq!(dims.next_inner(space), freq);
        // not part of the set
        let other = Dimension::new("dimension_test_other");
        assert_eq!(dims.next_inner(other), other);
    }

    #[test]
    fn test_subsets() {
        let freq = Dimension::new("frequency");
        let space = Dimension::new("dimension_test_space");
        let time_only = DimensionSet::time_domain();
        let time_freq = DimensionSet::from_dimensions([Dimension::time(), freq]);
        let all = time_freq.clone().with(space);

        assert!(time_only.is_subset(&time_freq));
        assert!(time_only.is_proper_subset(&time_freq));
        assert!(time_freq.is_subset(&time_freq));
        assert!(!time_freq.is_proper_subset(&time_freq));
        assert!(!all.is_subset(&time_freq));

        assert!(time_freq.is_simple_subset(&all));
        assert!(time_only.is_simple_subset(&all));
        // space is present but frequency (lower than space) is missing
        let time_space = DimensionSet::from_dimensions([Dimension::time(), space]);
        assert!(!time_space.is_simple_subset(&all));
    }

    #[test]
    fn test_time_domain() {
        let dims = DimensionSet::time_domain();
        assert!(dims.has_time());
        assert_eq!(dims.len(), 1);
        assert!(!DimensionSet::new().has_time());
    }
}
