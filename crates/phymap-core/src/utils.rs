//! # Mapping Utilities
//!
//! Factory, element-wise algebra and queries over [`ConstMapping`]s.
//!
//! ## Element-wise algebra
//!
//! [`apply_element_wise`] walks both operands in lock-step. At every step
//! the operand whose next key point comes first advances and the other one
//! follows to the same position, so the result has a key point wherever
//! either operand has one:
//!
//! ```text
//!   f1 keys:   0 ─────── 2 ─────────── 5
//!   f2 keys:   0 ─── 1 ──────── 3
//!   result:    0 ─── 1 ─ 2 ──── 3 ──── 5
//! ```
//!
//! If the second operand lacks some outer dimensions of the first one (its
//! domain is a simple subset), it is first broadcast to the full domain with
//! [`create_compatible`].
//!
//! ## Discontinuities
//!
//! A mapping stores one value per key point, so an instantaneous change is
//! written as two key points one representable time step apart, see
//! [`add_discontinuity`] and [`pre`](crate::argument::pre).

use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Sub};

use tracing::{debug, warn};

use crate::argument::{Argument, SimTime};
use crate::dimension::{Dimension, DimensionSet};
use crate::error::{MappingError, MappingResult};
use crate::interpolation::{InterpolationMethod, Interpolator};
use crate::mapping::{ConstMapping, ConstMappingIterator, KeyPoints, Mapping};
use crate::multi_dim::{KeyedMapping, MultiDimMapping};

/// Create an empty mapping over `domain`: a [`TimeMapping`] for the pure
/// time domain, a [`MultiDimMapping`] otherwise.
///
/// [`TimeMapping`]: crate::time_mapping::TimeMapping
pub fn create_mapping(domain: &DimensionSet, method: InterpolationMethod) -> MappingResult<KeyedMapping> {
    let mapping = KeyedMapping::new(domain, Interpolator::new(method))?;
    debug!(domain = %domain, %method, "created mapping");
    Ok(mapping)
}

/// Like [`create_mapping`], returning `out_of_range` outside of the key
/// range instead of the boundary values.
pub fn create_mapping_with_out_of_range(
    domain: &DimensionSet,
    method: InterpolationMethod,
    out_of_range: f64,
) -> MappingResult<KeyedMapping> {
    let mapping = KeyedMapping::new(domain, Interpolator::with_out_of_range(method, out_of_range))?;
    debug!(domain = %domain, %method, out_of_range, "created mapping");
    Ok(mapping)
}

/// Broadcast `src` to the domain of `dst`.
///
/// Returns `None` if both domains are equal and `src` can be used as is.
/// Otherwise the domain of `src` must be a simple subset of the domain of
/// `dst`: the result repeats a linear copy of `src` at every value the
/// missing dimensions take in the key points of `dst`. The copy holds the
/// key points of `src` plus `src` sampled at every key point of `dst`.
pub fn create_compatible(src: &dyn ConstMapping, dst: &dyn ConstMapping) -> MappingResult<Option<KeyedMapping>> {
    let src_dims = src.dimension_set();
    let dst_dims = dst.dimension_set();
    if src_dims == dst_dims {
        return Ok(None);
    }
    if !src_dims.is_simple_subset(dst_dims) {
        return Err(MappingError::DomainMismatch {
            expected: dst_dims.clone(),
            found: src_dims.clone(),
        });
    }

    // ascending, all above the highest dimension of src
    let missing: Vec<Dimension> = dst_dims.iter().filter(|d| !src_dims.has_dimension(*d)).collect();
    let mut keys: Vec<Vec<f64>> = vec![Vec::new(); missing.len()];
    let mut samples = Vec::new();
    for (pos, _) in KeyPoints::of(dst) {
        for (dim, dim_keys) in missing.iter().zip(keys.iter_mut()) {
            dim_keys.push(pos.arg_value(*dim));
        }
        samples.push(pos);
    }

    let linear = Interpolator::new(InterpolationMethod::Linear);
    let axis = src_dims.first().unwrap_or(Dimension::time());
    let mut filled = KeyedMapping::for_axis(dst_dims, axis, linear);
    for (pos, value) in KeyPoints::of(src) {
        filled.set_value(&pos, value);
    }
    for pos in &samples {
        filled.set_value(pos, src.value(pos));
    }

    for (dim, mut dim_keys) in missing.into_iter().zip(keys) {
        dim_keys.sort_by(f64::total_cmp);
        dim_keys.dedup();
        if dim_keys.is_empty() {
            dim_keys.push(0.0);
        }
        let mut level = MultiDimMapping::for_axis(dst_dims.clone(), dim, linear);
        for key in dim_keys {
            level.insert_sub_mapping(key, filled.clone());
        }
        filled = KeyedMapping::MultiDim(level);
    }

    debug!(from = %src_dims, to = %dst_dims, samples = samples.len(), "broadcast mapping");
    Ok(Some(filled))
}

/// Move whichever iterator has the nearer next key point and let the other
/// one follow. Returns false if neither has a next key point.
fn iterate_to_next<A, B>(it1: &mut A, it2: &mut B) -> MappingResult<bool>
where
    A: ConstMappingIterator + ?Sized,
    B: ConstMappingIterator + ?Sized,
{
    let first_moves = match (it1.has_next(), it2.has_next()) {
        (false, false) => return Ok(false),
        (true, false) => true,
        (false, true) => false,
        (true, true) => it1.next_position()?.is_before(it2.next_position()?),
    };

    if first_moves {
        it1.next()?;
        it2.iterate_to(it1.position());
    } else {
        it2.next()?;
        it1.iterate_to(it2.position());
    }
    Ok(true)
}

/// Combine `f1` and `f2` with `op` at the union of their key points.
///
/// The result is a linearly interpolated mapping over the domain of `f1`.
/// `f2` must have the same domain or a simple subset of it.
pub fn apply_element_wise<F>(
    f1: &dyn ConstMapping,
    f2: &dyn ConstMapping,
    op: F,
    out_of_range: Option<f64>,
) -> MappingResult<KeyedMapping>
where
    F: Fn(f64, f64) -> f64,
{
    let domain = f1.dimension_set();
    let compatible = create_compatible(f2, f1)?;
    let f2: &dyn ConstMapping = match &compatible {
        Some(filled) => filled,
        None => f2,
    };

    let mut result = match out_of_range {
        Some(value) => create_mapping_with_out_of_range(domain, InterpolationMethod::Linear, value)?,
        None => create_mapping(domain, InterpolationMethod::Linear)?,
    };

    let mut it1 = f1.create_const_iterator();
    let mut it2 = f2.create_const_iterator();
    if !it1.in_range() && !it2.in_range() {
        warn!(domain = %domain, "element-wise operation on two empty mappings");
        return Ok(result);
    }

    if it1.in_range() && (!it2.in_range() || it1.position().is_before(it2.position())) {
        it2.jump_to(it1.position());
    } else {
        it1.jump_to(it2.position());
    }

    let mut steps = 0usize;
    {
        let mut res_it = result.create_iterator_at(it1.position());
        while it1.in_range() || it2.in_range() {
            res_it.set_value(op(it1.value(), it2.value()));
            steps += 1;
            if !iterate_to_next(&mut it1, &mut it2)? {
                break;
            }
            res_it.iterate_to(it1.position());
        }
    }

    debug!(domain = %domain, key_points = steps, "applied element-wise operation");
    Ok(result)
}

pub fn add(f1: &dyn ConstMapping, f2: &dyn ConstMapping) -> MappingResult<KeyedMapping> {
    apply_element_wise(f1, f2, |a, b| a + b, None)
}

pub fn subtract(f1: &dyn ConstMapping, f2: &dyn ConstMapping) -> MappingResult<KeyedMapping> {
    apply_element_wise(f1, f2, |a, b| a - b, None)
}

pub fn multiply(f1: &dyn ConstMapping, f2: &dyn ConstMapping) -> MappingResult<KeyedMapping> {
    apply_element_wise(f1, f2, |a, b| a * b, None)
}

pub fn divide(f1: &dyn ConstMapping, f2: &dyn ConstMapping) -> MappingResult<KeyedMapping> {
    apply_element_wise(f1, f2, |a, b| a / b, None)
}

pub fn add_with_out_of_range(
    f1: &dyn ConstMapping,
    f2: &dyn ConstMapping,
    out_of_range: f64,
) -> MappingResult<KeyedMapping> {
    apply_element_wise(f1, f2, |a, b| a + b, Some(out_of_range))
}

pub fn subtract_with_out_of_range(
    f1: &dyn ConstMapping,
    f2: &dyn ConstMapping,
    out_of_range: f64,
) -> MappingResult<KeyedMapping> {
    apply_element_wise(f1, f2, |a, b| a - b, Some(out_of_range))
}

pub fn multiply_with_out_of_range(
    f1: &dyn ConstMapping,
    f2: &dyn ConstMapping,
    out_of_range: f64,
) -> MappingResult<KeyedMapping> {
    apply_element_wise(f1, f2, |a, b| a * b, Some(out_of_range))
}

pub fn divide_with_out_of_range(
    f1: &dyn ConstMapping,
    f2: &dyn ConstMapping,
    out_of_range: f64,
) -> MappingResult<KeyedMapping> {
    apply_element_wise(f1, f2, |a, b| a / b, Some(out_of_range))
}

fn fold_key_points(m: &dyn ConstMapping, not_found: f64, pick: fn(f64, f64) -> f64) -> f64 {
    KeyPoints::of(m).map(|(_, v)| v).reduce(pick).unwrap_or(not_found)
}

/// Largest value at any key point of `m`, or `not_found` if it has none.
pub fn find_max(m: &dyn ConstMapping, not_found: f64) -> f64 {
    fold_key_points(m, not_found, f64::max)
}

/// Smallest value at any key point of `m`, or `not_found` if it has none.
pub fn find_min(m: &dyn ConstMapping, not_found: f64) -> f64 {
    fold_key_points(m, not_found, f64::min)
}

/// True if `pos` lies within `[from, to]` in every dimension both bounds
/// define.
fn within(pos: &Argument, from: &Argument, to: &Argument) -> bool {
    let time = from.time() <= pos.time() && pos.time() <= to.time();
    time && pos.iter().all(|(dim, v)| {
        (!from.has_arg_value(dim) || from.arg_value(dim) <= v) && (!to.has_arg_value(dim) || v <= to.arg_value(dim))
    })
}

fn fold_range(m: &dyn ConstMapping, from: &Argument, to: &Argument, not_found: f64, pick: fn(f64, f64) -> f64) -> f64 {
    let dims = m.dimension_set();
    let mut result: Option<f64> = None;
    let mut take = |v: f64| result = Some(result.map_or(v, |r| pick(r, v)));

    let mut it = m.create_const_iterator_at(from);
    if it.in_range() {
        take(it.value());
    }
    while let Ok(next) = it.next_position() {
        if next.compare(to, dims) != Ordering::Less || it.next().is_err() {
            break;
        }
        if within(it.position(), from, to) {
            take(it.value());
        }
    }
    it.iterate_to(to);
    if it.in_range() {
        take(it.value());
    }
    result.unwrap_or(not_found)
}

/// Largest value of `m` in the range `[from, to]`: the values at both
/// bounds and at every key point in between. `not_found` if the range does
/// not intersect the key range of `m`.
pub fn find_max_in(m: &dyn ConstMapping, from: &Argument, to: &Argument, not_found: f64) -> f64 {
    fold_range(m, from, to, not_found, f64::max)
}

/// Smallest value of `m` in the range `[from, to]`, see [`find_max_in`].
pub fn find_min_in(m: &dyn ConstMapping, from: &Argument, to: &Argument, not_found: f64) -> f64 {
    fold_range(m, from, to, not_found, f64::min)
}

/// Write a discontinuity: `value` at `pos` and `limit_value` at the same
/// position with time `limit_time`.
///
/// `limit_time` is usually [`pre`](crate::argument::pre)`(pos.time())` for a
/// change at `pos` or [`post`](crate::argument::post)`(pos.time())` for a
/// change right after it. Queries should then stay strictly before or after
/// the discontinuity.
pub fn add_discontinuity(
    m: &mut dyn Mapping,
    pos: &Argument,
    value: f64,
    limit_time: SimTime,
    limit_value: f64,
) -> MappingResult<()> {
    if limit_time == pos.time() {
        return Err(MappingError::InvalidDiscontinuity(limit_time));
    }
    m.set_value(pos, value);
    let mut limit = pos.clone();
    limit.set_time(limit_time);
    m.set_value(&limit, limit_value);
    Ok(())
}

macro_rules! impl_element_wise_op {
    ($trait:ident, $method:ident, $func:path) => {
        impl $trait<&KeyedMapping> for &KeyedMapping {
            type Output = MappingResult<KeyedMapping>;

            fn $method(self, rhs: &KeyedMapping) -> Self::Output {
                $func(self, rhs)
            }
        }
    };
}

impl_element_wise_op!(Add, add, crate::utils::add);
impl_element_wise_op!(Sub, sub, crate::utils::subtract);
impl_element_wise_op!(Mul, mul, crate::utils::multiply);
impl_element_wise_op!(Div, div, crate::utils::divide);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::pre;
    use crate::constant::ConstantMapping;
    use crate::time_mapping::TimeMapping;
    use approx::assert_relative_eq;

    fn freq() -> Dimension {
        Dimension::new("frequency")
    }

    fn at(t: f64) -> Argument {
        Argument::new(t)
    }

    fn tf(t: f64, f: f64) -> Argument {
        Argument::new(t).with_value(freq(), f)
    }

    fn time_mapping(points: &[(f64, f64)]) -> KeyedMapping {
        let mut m = create_mapping(&DimensionSet::time_domain(), InterpolationMethod::Linear).unwrap();
        for &(t, v) in points {
            m.set_value(&at(t), v);
        }
        m
    }

    fn grid() -> KeyedMapping {
        let domain = DimensionSet::time_domain().with(freq());
        let mut m = create_mapping(&domain, InterpolationMethod::Linear).unwrap();
        m.set_value(&tf(0.0, 0.0), 10.0);
        m.set_value(&tf(1.0, 0.0), 20.0);
        m.set_value(&tf(0.0, 1.0), 30.0);
        m.set_value(&tf(1.0, 1.0), 40.0);
        m
    }

    #[test]
    fn test_factory() {
        let m = create_mapping(&DimensionSet::time_domain(), InterpolationMethod::Steps).unwrap();
        assert!(m.as_time().is_some());
        assert_eq!(m.method(), InterpolationMethod::Steps);

        let domain = DimensionSet::time_domain().with(freq());
        let m = create_mapping_with_out_of_range(&domain, InterpolationMethod::Nearest, -1.0).unwrap();
        assert!(m.as_multi_dim().is_some());
        assert_eq!(m.out_of_range(), Some(-1.0));
        assert_eq!(m.value(&tf(3.0, 3.0)), -1.0);

        let no_time = DimensionSet::from_dimensions([freq()]);
        assert!(matches!(
            create_mapping(&no_time, InterpolationMethod::Linear),
            Err(MappingError::MissingTimeDimension(_))
        ));
    }

    #[test]
    fn test_key_point_union() {
        let f1 = time_mapping(&[(0.0, 1.0), (2.0, 3.0), (5.0, 3.0)]);
        let f2 = time_mapping(&[(0.0, 2.0), (1.0, 2.0), (3.0, 4.0)]);
        let sum = add(&f1, &f2).unwrap();
        let keys: Vec<_> = KeyPoints::of(&sum).map(|(p, _)| p.time()).collect();
        assert_eq!(keys, vec![0.0, 1.0, 2.0, 3.0, 5.0]);
        for t in [0.0, 1.0, 2.0, 3.0, 5.0] {
            assert_relative_eq!(sum.value(&at(t)), f1.value(&at(t)) + f2.value(&at(t)));
        }
    }

    #[test]
    fn test_algebra_consistency() {
        let f1 = time_mapping(&[(0.0, 1.0), (1.0, 4.0), (2.5, -2.0)]);
        let f2 = time_mapping(&[(0.5, 2.0), (1.0, 0.5), (3.0, 8.0)]);
        let ops: [(fn(&dyn ConstMapping, &dyn ConstMapping) -> MappingResult<KeyedMapping>, fn(f64, f64) -> f64); 4] = [
            (add, |a, b| a + b),
            (subtract, |a, b| a - b),
            (multiply, |a, b| a * b),
            (divide, |a, b| a / b),
        ];
        for (combine, op) in ops {
            let result = combine(&f1, &f2).unwrap();
            for (p, v) in KeyPoints::of(&result) {
                assert_relative_eq!(v, op(f1.value(&p), f2.value(&p)), max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_operator_sugar() {
        let f1 = time_mapping(&[(0.0, 2.0), (1.0, 4.0)]);
        let f2 = time_mapping(&[(0.0, 3.0), (1.0, 5.0)]);
        let product = (&f1 * &f2).unwrap();
        assert_eq!(product.value(&at(1.0)), 20.0);
        assert_eq!((&f1 - &f2).unwrap().value(&at(0.0)), -1.0);
        assert_eq!((&f1 + &f2).unwrap().value(&at(0.0)), 5.0);
        assert_eq!((&f2 / &f1).unwrap().value(&at(1.0)), 1.25);
    }

    #[test]
    fn test_out_of_range_result() {
        let f1 = time_mapping(&[(1.0, 2.0), (2.0, 2.0)]);
        let f2 = time_mapping(&[(1.0, 3.0), (2.0, 3.0)]);
        let product = multiply_with_out_of_range(&f1, &f2, 0.0).unwrap();
        assert_eq!(product.value(&at(1.5)), 6.0);
        assert_eq!(product.value(&at(0.0)), 0.0);
        assert_eq!(product.value(&at(3.0)), 0.0);
        assert_eq!(multiply(&f1, &f2).unwrap().value(&at(3.0)), 6.0);
    }

    #[test]
    fn test_step_operand_stays_sharp() {
        let mut steps = create_mapping(&DimensionSet::time_domain(), InterpolationMethod::Steps).unwrap();
        steps.set_value(&at(0.0), 1.0);
        steps.set_value(&at(2.0), 3.0);
        let linear = time_mapping(&[(0.0, 2.0), (4.0, 2.0)]);

        let product = multiply(&steps, &linear).unwrap();
        assert_eq!(product.value(&at(1.0)), 2.0);
        assert_eq!(product.value(&at(pre(2.0))), 2.0);
        assert_eq!(product.value(&at(2.0)), 6.0);
        assert_eq!(product.value(&at(3.0)), 6.0);
    }

    #[test]
    fn test_two_dimensional_algebra() {
        let f1 = grid();
        let mut f2 = grid();
        f2.set_value(&tf(0.5, 0.5), 1.0);
        let product = multiply(&f1, &f2).unwrap();
        for (p, v) in KeyPoints::of(&product) {
            assert_relative_eq!(v, f1.value(&p) * f2.value(&p));
        }
        assert_relative_eq!(product.value(&tf(0.5, 0.5)), 25.0);
        assert_eq!(product.value(&tf(1.0, 1.0)), 1600.0);
    }

    #[test]
    fn test_broadcast() {
        let f1 = grid();
        let f2 = time_mapping(&[(0.0, 2.0), (0.5, 4.0)]);

        let filled = create_compatible(&f2, &f1).unwrap().unwrap();
        assert_eq!(filled.dimension_set(), f1.dimension_set());
        assert_eq!(filled.as_multi_dim().map(|m| m.len()), Some(2));

        let product = multiply(&f1, &f2).unwrap();
        for (p, _) in KeyPoints::of(&f1) {
            assert_relative_eq!(product.value(&p), f1.value(&p) * f2.value(&at(p.time())));
        }

        assert!(create_compatible(&f1, &f1).unwrap().is_none());
        assert!(matches!(
            multiply(&f2, &f1),
            Err(MappingError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn test_broadcast_constant() {
        let noise = ConstantMapping::with_keys(DimensionSet::time_domain(), 0.5, vec![at(0.0), at(1.0)]).unwrap();
        let sum = add(&grid(), &noise).unwrap();
        assert_eq!(sum.value(&tf(1.0, 1.0)), 40.5);
        assert_eq!(sum.value(&tf(0.0, 0.0)), 10.5);

        let domain = DimensionSet::time_domain().with(freq());
        let wide = ConstantMapping::with_key(domain, 0.5, at(0.0)).unwrap();
        let signal = time_mapping(&[(0.0, 4.0), (1.0, 8.0)]);
        assert!(matches!(add(&signal, &wide), Err(MappingError::DomainMismatch { .. })));
    }

    #[test]
    fn test_find_extrema() {
        let m = time_mapping(&[(0.0, 1.0), (1.0, 7.0), (2.0, -3.0), (3.0, 2.0)]);
        assert_eq!(find_max(&m, f64::NAN), 7.0);
        assert_eq!(find_min(&m, f64::NAN), -3.0);

        let empty = time_mapping(&[]);
        assert_eq!(find_max(&empty, -1.0), -1.0);
        assert_eq!(find_min(&empty, 99.0), 99.0);
    }

    #[test]
    fn test_find_extrema_in_range() {
        let m = time_mapping(&[(0.0, 1.0), (1.0, 7.0), (2.0, -3.0), (3.0, 2.0)]);
        // bounds are evaluated by interpolation
        assert_relative_eq!(find_max_in(&m, &at(1.5), &at(2.5), f64::NAN), 2.0);
        assert_eq!(find_min_in(&m, &at(1.5), &at(2.5), f64::NAN), -3.0);
        assert_eq!(find_max_in(&m, &at(0.0), &at(3.0), f64::NAN), 7.0);
        assert_relative_eq!(find_min_in(&m, &at(0.25), &at(0.75), f64::NAN), 2.5);

        // brute force over the key points in range plus both bounds
        let (from, to) = (at(0.5), at(2.0));
        let expected = KeyPoints::of(&m)
            .filter(|(p, _)| p.time() >= from.time() && p.time() <= to.time())
            .map(|(_, v)| v)
            .chain([m.value(&from), m.value(&to)])
            .fold(f64::MIN, f64::max);
        assert_eq!(find_max_in(&m, &from, &to, f64::NAN), expected);

        assert_eq!(find_max_in(&m, &at(5.0), &at(6.0), -1.0), -1.0);
    }

    #[test]
    fn test_step_discontinuity() {
        let mut m = TimeMapping::new(InterpolationMethod::Steps);
        m.set_value(&at(1.0), 5.0);
        m.set_value(&at(2.0), 9.0);
        assert_eq!(m.value(&at(1.5)), 5.0);

        add_discontinuity(&mut m, &at(2.0), 9.0, pre(2.0), 5.0).unwrap();
        assert_eq!(m.value(&at(pre(2.0))), 5.0);
        assert_eq!(m.value(&at(2.0)), 9.0);
        assert_eq!(m.value(&at(1.5)), 5.0);

        assert_eq!(
            add_discontinuity(&mut m, &at(2.0), 9.0, 2.0, 5.0),
            Err(MappingError::InvalidDiscontinuity(2.0))
        );
    }

    #[test]
    fn test_linear_discontinuity() {
        let mut m = TimeMapping::new(InterpolationMethod::Linear);
        m.set_value(&at(0.0), 0.0);
        m.set_value(&at(4.0), 0.0);
        add_discontinuity(&mut m, &at(1.0), 10.0, pre(1.0), 0.0).unwrap();
        assert_eq!(m.value(&at(0.5)), 0.0);
        assert_eq!(m.value(&at(1.0)), 10.0);
        assert_relative_eq!(m.value(&at(2.5)), 5.0);
    }
}
