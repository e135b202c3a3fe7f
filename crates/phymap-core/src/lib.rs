//! # Multi-Dimensional Interpolating Mappings
//!
//! This crate models physical-layer quantities such as transmission power,
//! attenuation or bit rate as functions over time and further coordinate
//! axes (frequency, channel, antenna, ...). Values are stored at discrete
//! key points and interpolated in between.
//!
//! ## Overview
//!
//! - **Dimensions**: named axes, interned with a stable ordering; `time` is
//!   always the innermost axis
//! - **Mappings**: [`TimeMapping`] leaves and nested [`MultiDimMapping`]s
//!   with stepwise, nearest or linear interpolation
//! - **Iterators**: ordered traversal of key points with incremental
//!   `iterate_to` for sequential access
//! - **Utilities**: factory, element-wise algebra with domain broadcast,
//!   extremum search and discontinuities
//! - **Decorators**: [`DelayedMapping`], [`ConcatConstMapping`],
//!   [`ConstantMapping`]
//!
//! ## Domain Layout
//!
//! ```text
//! (time, frequency, channel)
//!   channel ─┬─ frequency ─┬─ time   (TimeMapping)
//!            │             └─ time
//!            └─ frequency ─── time
//! ```
//!
//! ## Example
//!
//! ```rust
//! use phymap_core::prelude::*;
//! use phymap_core::utils;
//!
//! let mut power = TimeMapping::new(InterpolationMethod::Linear);
//! power.set_value(&Argument::new(0.0), 100.0);
//! power.set_value(&Argument::new(1.0), 200.0);
//!
//! let mut loss = TimeMapping::new(InterpolationMethod::Steps);
//! loss.set_value(&Argument::new(0.0), 0.5);
//!
//! let received = utils::multiply(&power, &loss).unwrap();
//! assert_eq!(received.value(&Argument::new(0.5)), 75.0);
//! assert_eq!(utils::find_max(&received, 0.0), 100.0);
//! ```

pub mod argument;
pub mod concat;
pub mod config;
pub mod constant;
pub mod delayed;
pub mod dimension;
pub mod error;
pub mod interpolation;
pub mod intpl_map;
pub mod linear_intpl;
pub mod mapping;
pub mod multi_dim;
pub mod observe;
pub mod time_mapping;
pub mod utils;

// Re-export main types
pub use argument::{post, pre, Argument, SimTime};
pub use concat::ConcatConstMapping;
pub use config::{ConfigError, MappingFactory, PhymapConfig};
pub use constant::{ConstantMapping, KeyEntryIterator};
pub use delayed::{DelayedMapping, DelayedMappingIterator};
pub use dimension::{Dimension, DimensionSet};
pub use error::{MappingError, MappingResult};
pub use interpolation::{InterpolationMethod, Interpolator};
pub use intpl_map::InterpolatingMap;
pub use linear_intpl::{LinearIntplIterator, LinearIntplMapping};
pub use mapping::{ConstMapping, ConstMappingIterator, KeyPoints, Mapping, MappingIterator};
pub use multi_dim::{KeyedMapping, MultiDimMapping};
pub use time_mapping::TimeMapping;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::argument::{Argument, SimTime};
    pub use crate::dimension::{Dimension, DimensionSet};
    pub use crate::error::{MappingError, MappingResult};
    pub use crate::interpolation::InterpolationMethod;
    pub use crate::mapping::{ConstMapping, ConstMappingIterator, KeyPoints, Mapping, MappingIterator};
    pub use crate::multi_dim::{KeyedMapping, MultiDimMapping};
    pub use crate::time_mapping::TimeMapping;
}
