//! Concatenated mappings
//!
//! A [`ConcatConstMapping`] combines a reference mapping with any number of
//! further mappings through a binary operator, e.g. the running product of
//! a transmission power and several attenuations.
//!
//! Point queries reduce over all operands directly. Iterators need the key
//! points of the combination, so each iterator materializes the result with
//! [`apply_element_wise`] and owns it for its lifetime.

use std::fmt;

use tracing::warn;

use crate::argument::Argument;
use crate::dimension::DimensionSet;
use crate::error::{MappingError, MappingResult};
use crate::interpolation::InterpolationMethod;
use crate::mapping::{ConstMapping, ConstMappingIterator, KeyPoints, Mapping};
use crate::multi_dim::{KeyedMapping, KeyedMappingIterator};
use crate::utils::{apply_element_wise, create_mapping};

/// Reference mapping combined with further mappings by `op`.
pub struct ConcatConstMapping<F> {
    reference: Box<dyn ConstMapping>,
    mappings: Vec<Box<dyn ConstMapping>>,
    op: F,
}

impl<F> ConcatConstMapping<F>
where
    F: Fn(f64, f64) -> f64 + Clone + 'static,
{
    /// Combine `reference` with `other`.
    pub fn new(reference: Box<dyn ConstMapping>, other: Box<dyn ConstMapping>, op: F) -> MappingResult<Self> {
        Self::from_mappings(reference, [other], op)
    }

    /// Combine `reference` with every mapping of `others`, in order.
    pub fn from_mappings(
        reference: Box<dyn ConstMapping>,
        others: impl IntoIterator<Item = Box<dyn ConstMapping>>,
        op: F,
    ) -> MappingResult<Self> {
        let mut concat = Self {
            reference,
            mappings: Vec::new(),
            op,
        };
        for m in others {
            concat.add_mapping(m)?;
        }
        Ok(concat)
    }

    /// Append another operand. Its domain must equal the reference domain
    /// or be a simple subset of it.
    pub fn add_mapping(&mut self, m: Box<dyn ConstMapping>) -> MappingResult<()> {
        let domain = self.reference.dimension_set();
        let other = m.dimension_set();
        if other != domain && !other.is_simple_subset(domain) {
            return Err(MappingError::DomainMismatch {
                expected: domain.clone(),
                found: other.clone(),
            });
        }
        self.mappings.push(m);
        Ok(())
    }

    pub fn reference(&self) -> &dyn ConstMapping {
        self.reference.as_ref()
    }

    /// Number of operands besides the reference.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Materialize the combination as a linearly interpolated mapping.
    pub fn concatenated(&self) -> MappingResult<KeyedMapping> {
        let mut operands = self.mappings.iter();
        let Some(first) = operands.next() else {
            let mut copy = create_mapping(self.reference.dimension_set(), InterpolationMethod::Linear)?;
            for (pos, value) in KeyPoints::of(self.reference.as_ref()) {
                copy.append_value(&pos, value);
            }
            return Ok(copy);
        };

        let mut result = apply_element_wise(self.reference.as_ref(), first.as_ref(), &self.op, None)?;
        for m in operands {
            result = apply_element_wise(&result, m.as_ref(), &self.op, None)?;
        }
        Ok(result)
    }

    fn materialized(&self) -> KeyedMapping {
        self.concatenated().unwrap_or_else(|err| {
            warn!(%err, "failed to concatenate mappings");
            KeyedMapping::Time(Default::default())
        })
    }
}

impl<F> fmt::Debug for ConcatConstMapping<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatConstMapping")
            .field("reference", &self.reference)
            .field("mappings", &self.mappings)
            .finish_non_exhaustive()
    }
}

impl<F> ConstMapping for ConcatConstMapping<F>
where
    F: Fn(f64, f64) -> f64 + Clone + 'static,
{
    fn dimension_set(&self) -> &DimensionSet {
        self.reference.dimension_set()
    }

    fn value(&self, pos: &Argument) -> f64 {
        self.mappings
            .iter()
            .fold(self.reference.value(pos), |acc, m| (self.op)(acc, m.value(pos)))
    }

    fn create_const_iterator(&self) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(KeyedMappingIterator::new(self.materialized()))
    }

    fn create_const_iterator_at(&self, pos: &Argument) -> Box<dyn ConstMappingIterator + '_> {
        Box::new(KeyedMappingIterator::at(self.materialized(), pos))
    }

    fn const_clone(&self) -> Box<dyn ConstMapping> {
        Box::new(Self {
            reference: self.reference.const_clone(),
            mappings: self.mappings.iter().map(|m| m.const_clone()).collect(),
            op: self.op.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::ConstantMapping;
    use crate::dimension::Dimension;
    use crate::time_mapping::TimeMapping;
    use approx::assert_relative_eq;

    fn at(t: f64) -> Argument {
        Argument::new(t)
    }

    fn time_mapping(points: &[(f64, f64)]) -> Box<dyn ConstMapping> {
        let mut m = TimeMapping::new(InterpolationMethod::Linear);
        for &(t, v) in points {
            m.set_value(&at(t), v);
        }
        Box::new(m)
    }

    fn product() -> ConcatConstMapping<fn(f64, f64) -> f64> {
        let power = time_mapping(&[(0.0, 10.0), (2.0, 10.0)]);
        let loss = time_mapping(&[(0.0, 0.5), (1.0, 0.25)]);
        ConcatConstMapping::new(power, loss, (|a, b| a * b) as fn(f64, f64) -> f64).unwrap()
    }

    #[test]
    fn test_value_reduces_all_operands() {
        let mut concat = product();
        assert_eq!(concat.value(&at(0.0)), 5.0);
        concat.add_mapping(time_mapping(&[(0.0, 2.0)])).unwrap();
        assert_eq!(concat.len(), 2);
        assert_eq!(concat.value(&at(0.0)), 10.0);
        assert_relative_eq!(concat.value(&at(0.5)), 7.5);
        assert_eq!(concat.reference().value(&at(0.5)), 10.0);
    }

    #[test]
    fn test_iterator_walks_materialized_result() {
        let concat = product();
        let points: Vec<_> = KeyPoints::of(&concat).map(|(p, v)| (p.time(), v)).collect();
        assert_eq!(points, vec![(0.0, 5.0), (1.0, 2.5), (2.0, 2.5)]);

        let mut it = concat.create_const_iterator_at(&at(0.5));
        assert_relative_eq!(it.value(), concat.value(&at(0.5)));
        it.next().unwrap();
        assert_eq!(it.position().time(), 1.0);
    }

    #[test]
    fn test_domain_check() {
        let freq = Dimension::new("frequency");
        let wide: Box<dyn ConstMapping> =
            Box::new(ConstantMapping::new(DimensionSet::time_domain().with(freq), 1.0).unwrap());
        let mut concat = product();
        assert!(matches!(
            concat.add_mapping(wide),
            Err(MappingError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn test_reference_only() {
        let concat = ConcatConstMapping::from_mappings(
            time_mapping(&[(1.0, 3.0), (2.0, 4.0)]),
            Vec::new(),
            |a: f64, b: f64| a + b,
        )
        .unwrap();
        assert!(concat.is_empty());
        let values: Vec<_> = KeyPoints::of(&concat).map(|(_, v)| v).collect();
        assert_eq!(values, vec![3.0, 4.0]);
    }

    #[test]
    fn test_clone_is_independent() {
        let concat = product();
        let copy = concat.const_clone();
        assert_eq!(copy.value(&at(1.0)), 2.5);
        assert_eq!(copy.dimension_set(), &DimensionSet::time_domain());
    }
}
