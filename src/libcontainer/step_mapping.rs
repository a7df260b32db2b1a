// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step functions over an integer domain.
//!
//! A [`StepFunctionMapping`] is a total function from the integers of type `P` to `f64`, stored as the sorted set of its breakpoints. Two sentinel breakpoints sit at `P::min_value()` and `P::max_value()`, so every position has a breakpoint at or before it and queries never need to special-case the ends of the domain. The sentinels are never removed, only their values may change.
//!
//! The breakpoints are interpreted either as the starts of constant steps or as the vertices of a piecewise linear function, see [`Interpolation`].
//!
//! # Examples
//!
//! ```rust
//! use container::StepFunctionMapping;
//!
//! let mut capacity: StepFunctionMapping = StepFunctionMapping::new();
//! capacity.increase(0, 10, 2.0).unwrap();
//! capacity.increase(5, 15, 1.0).unwrap();
//! assert_eq!(capacity.get(-1), 0.0);
//! assert_eq!(capacity.get(7), 3.0);
//! assert_eq!(capacity.get(12), 1.0);
//!
//! let total = capacity.integral();
//! assert_eq!(total.get(10), 25.0);
//! assert_eq!(total.get(15), 30.0);
//! ```

use crate::error::{Error, Result};
use crate::ops::Position;
use gcollections::ops::Empty;
use log::trace;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Bound::{Excluded, Unbounded};
use std::ops::{Add, Mul, Sub, SubAssign};

/// How the values between two breakpoints are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpolation
{
  /// The value at `x` is the value of the greatest breakpoint at or before `x`.
  PiecewiseConstant,
  /// The value at `x` is interpolated on the line between the breakpoints surrounding `x`, past the last breakpoint the last segment is extended.
  PiecewiseLinear
}

impl Default for Interpolation
{
  fn default() -> Interpolation {
    Interpolation::PiecewiseConstant
  }
}

/// A position of the domain together with the value the mapping takes there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint<P>
{
  position: P,
  value: f64
}

impl<P: Position> Breakpoint<P>
{
  pub fn new(position: P, value: f64) -> Breakpoint<P> {
    Breakpoint { position, value }
  }

  pub fn position(&self) -> P {
    self.position
  }

  pub fn value(&self) -> f64 {
    self.value
  }

  /// `true` for the breakpoints at both ends of the domain.
  pub fn is_sentinel(&self) -> bool {
    self.position == P::min_value() || self.position == P::max_value()
  }

  fn from_entry((position, value): (&P, &f64)) -> Breakpoint<P> {
    Breakpoint::new(*position, *value)
  }
}

impl<P: Position> fmt::Display for Breakpoint<P>
{
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    write!(formatter, "{} = {}", self.position, self.value)
  }
}

/// A function from the integers of type `P` to `f64`, defined everywhere by its breakpoints.
#[derive(Debug, Clone)]
pub struct StepFunctionMapping<P = i32>
{
  breakpoints: BTreeMap<P, f64>,
  interpolation: Interpolation
}

impl<P: Position> StepFunctionMapping<P>
{
  /// The piecewise constant function mapping everything to zero. Runtime O(1).
  pub fn new() -> StepFunctionMapping<P> {
    StepFunctionMapping::with_interpolation(Interpolation::PiecewiseConstant)
  }

  /// The piecewise linear function mapping everything to zero. Runtime O(1).
  pub fn piecewise_linear() -> StepFunctionMapping<P> {
    StepFunctionMapping::with_interpolation(Interpolation::PiecewiseLinear)
  }

  pub fn with_interpolation(interpolation: Interpolation) -> StepFunctionMapping<P> {
    let mut breakpoints = BTreeMap::new();
    breakpoints.insert(P::min_value(), 0.0);
    breakpoints.insert(P::max_value(), 0.0);
    StepFunctionMapping { breakpoints, interpolation }
  }

  /// Builds a mapping by setting every breakpoint in turn, later breakpoints overwrite earlier ones at the same position. Sentinels not given keep the value zero.
  pub fn from_breakpoints<I>(interpolation: Interpolation, breakpoints: I) -> StepFunctionMapping<P> where
   I: IntoIterator<Item=Breakpoint<P>>
  {
    let mut mapping = StepFunctionMapping::with_interpolation(interpolation);
    for breakpoint in breakpoints {
      mapping.set(breakpoint.position, breakpoint.value);
    }
    mapping
  }

  pub fn interpolation(&self) -> Interpolation {
    self.interpolation
  }

  pub fn is_piecewise_linear(&self) -> bool {
    self.interpolation == Interpolation::PiecewiseLinear
  }

  /// Number of breakpoints, sentinels included. Never less than two.
  pub fn len(&self) -> usize {
    self.breakpoints.len()
  }

  /// Breakpoints in increasing order of position, sentinels included.
  pub fn iter<'a>(&'a self) -> impl DoubleEndedIterator<Item=Breakpoint<P>> + 'a {
    self.breakpoints.iter().map(Breakpoint::from_entry)
  }

  /// Greatest breakpoint at or before `position`. Always exists thanks to the lower sentinel.
  pub fn floor(&self, position: P) -> Option<Breakpoint<P>> {
    self.breakpoints.range(..=position).next_back().map(Breakpoint::from_entry)
  }

  /// Smallest breakpoint at or after `position`. Always exists thanks to the upper sentinel.
  pub fn ceiling(&self, position: P) -> Option<Breakpoint<P>> {
    self.breakpoints.range(position..).next().map(Breakpoint::from_entry)
  }

  /// Greatest breakpoint strictly before `position`.
  pub fn lower(&self, position: P) -> Option<Breakpoint<P>> {
    self.breakpoints.range(..position).next_back().map(Breakpoint::from_entry)
  }

  /// Smallest breakpoint strictly after `position`.
  pub fn higher(&self, position: P) -> Option<Breakpoint<P>> {
    self.breakpoints.range((Excluded(position), Unbounded)).next().map(Breakpoint::from_entry)
  }

  /// First breakpoint that is not a sentinel.
  pub fn first(&self) -> Option<Breakpoint<P>> {
    self.higher(P::min_value()).filter(|b| !b.is_sentinel())
  }

  /// Last breakpoint that is not a sentinel.
  pub fn last(&self) -> Option<Breakpoint<P>> {
    self.lower(P::max_value()).filter(|b| !b.is_sentinel())
  }

  /// Value of the breakpoint just before the upper sentinel, the value the function settles on.
  pub fn last_value(&self) -> f64 {
    self.step_before(P::max_value()).value
  }

  /// Value of the function at `position`. Runtime O(log(number of breakpoints)).
  ///
  /// A piecewise linear mapping extrapolates past its last breakpoint with the slope of its last segment, the upper sentinel does not take part in the interpolation.
  pub fn get(&self, position: P) -> f64 {
    let floor = self.step_at(position);
    if self.interpolation == Interpolation::PiecewiseConstant || floor.position == position {
      return floor.value;
    }
    let slope = |lower: Breakpoint<P>, upper: Breakpoint<P>|
      (upper.value - lower.value) / P::distance(lower.position, upper.position);
    let ascent = match (self.higher(position), self.lower(floor.position)) {
      (Some(ceiling), Some(basement)) if ceiling.position == P::max_value() =>
        slope(basement, floor),
      (Some(ceiling), _) => slope(floor, ceiling),
      (None, Some(basement)) => slope(basement, floor),
      (None, None) => 0.0
    };
    floor.value + ascent * P::distance(floor.position, position)
  }

  /// Maps `position` to `value`, overwriting the breakpoint at `position` if there is one. Runtime O(log(number of breakpoints)).
  pub fn set(&mut self, position: P, value: f64) {
    self.breakpoints.insert(position, value);
  }

  /// Adds `amount` to the value of every position in `[from, to)`.
  ///
  /// The step boundaries at `from` and `to` are made explicit before the update. Afterwards a boundary whose step has the same value as the step before it is merged away, at `to` as well as at `from`: the boundary at `to` does not survive when the update makes it redundant, so range updates alone always leave the minimal set of breakpoints. Runtime O(log(number of breakpoints) + number of breakpoints in the range).
  ///
  /// Fails with `Error::InvalidRange` without modifying the mapping if `to <= from`.
  pub fn increase(&mut self, from: P, to: P, amount: f64) -> Result<()> {
    if to <= from {
      return Err(Error::invalid_range(from, to));
    }
    trace!("increasing [{}, {}) by {}", from, to, amount);
    self.raise(from, to, amount);
    Ok(())
  }

  /// Equivalent to `increase(position, position + 1, amount)`. Fails if `position + 1` is not representable.
  pub fn increase_at(&mut self, position: P, amount: f64) -> Result<()> {
    match position.checked_add(&P::one()) {
      Some(next) => self.increase(position, next, amount),
      None => Err(Error::InvalidRange {
        from: position.to_wide(),
        to: position.to_wide() + 1
      })
    }
  }

  /// Equivalent to `increase(from, to, -amount)`.
  pub fn decrease(&mut self, from: P, to: P, amount: f64) -> Result<()> {
    self.increase(from, to, -amount)
  }

  /// Equivalent to `increase_at(position, -amount)`.
  pub fn decrease_at(&mut self, position: P, amount: f64) -> Result<()> {
    self.increase_at(position, -amount)
  }

  // Precondition: `from < to`.
  fn raise(&mut self, from: P, to: P, amount: f64) {
    debug_assert!(from < to);
    let before_to = self.step_before(to).value;
    self.breakpoints.entry(to).or_insert(before_to);
    let before_from = self.step_at(from).value;
    self.breakpoints.entry(from).or_insert(before_from);
    for (_, value) in self.breakpoints.range_mut(from..to) {
      *value += amount;
    }
    self.merge_with_previous_step(to);
    self.merge_with_previous_step(from);
  }

  // Removes the breakpoint at `position` if it does not change the value, sentinels stay.
  fn merge_with_previous_step(&mut self, position: P) {
    if position == P::min_value() || position == P::max_value() {
      return;
    }
    let previous = self.step_before(position).value;
    if self.breakpoints.get(&position) == Some(&previous) {
      self.breakpoints.remove(&position);
    }
  }

  fn step_at(&self, position: P) -> Breakpoint<P> {
    self.floor(position).expect("the lower sentinel precedes every position")
  }

  // Precondition: `position` is greater than the lower sentinel.
  fn step_before(&self, position: P) -> Breakpoint<P> {
    self.lower(position).expect("the lower sentinel precedes every position but itself")
  }

  /// Pointwise sum of both mappings.
  ///
  /// The result has a breakpoint at every position where one of the operands has one, carrying the sum of both values there. It is piecewise linear if one of the operands is. Runtime O(n log n) with n the total number of breakpoints.
  pub fn add_mapping(&self, other: &StepFunctionMapping<P>) -> StepFunctionMapping<P> {
    let interpolation =
      if self.is_piecewise_linear() || other.is_piecewise_linear() {
        Interpolation::PiecewiseLinear
      }
      else {
        Interpolation::PiecewiseConstant
      };
    let breakpoints = self.breakpoints.keys()
      .chain(other.breakpoints.keys())
      .map(|&position| (position, self.get(position) + other.get(position)))
      .collect();
    StepFunctionMapping { breakpoints, interpolation }
  }

  /// Subtracts `other` from this mapping, `other` being read as a step function.
  ///
  /// For every two consecutive breakpoints `(a, v)` and `(b, _)` of `other`, the range `[a, b)` of this mapping is decreased by `v`.
  pub fn subtract_in_place(&mut self, other: &StepFunctionMapping<P>) {
    let steps = other.breakpoints.iter().zip(other.breakpoints.keys().skip(1));
    for ((&from, &amount), &to) in steps {
      self.raise(from, to, -amount);
    }
  }

  pub fn add_scalar(&self, scalar: f64) -> StepFunctionMapping<P> {
    self.map_values(|value| value + scalar)
  }

  pub fn subtract_scalar(&self, scalar: f64) -> StepFunctionMapping<P> {
    self.add_scalar(-scalar)
  }

  pub fn multiply(&self, scalar: f64) -> StepFunctionMapping<P> {
    self.map_values(|value| value * scalar)
  }

  pub fn divide(&self, scalar: f64) -> Result<StepFunctionMapping<P>> {
    if scalar == 0.0 {
      Err(Error::DivisionByZero)
    }
    else {
      Ok(self.map_values(|value| value / scalar))
    }
  }

  // Sentinel values are transformed too.
  fn map_values<F>(&self, f: F) -> StepFunctionMapping<P> where
   F: Fn(f64) -> f64
  {
    StepFunctionMapping {
      breakpoints: self.breakpoints.iter()
        .map(|(&position, &value)| (position, f(value)))
        .collect(),
      interpolation: self.interpolation
    }
  }

  /// Translates every breakpoint but the sentinels by `amount`.
  ///
  /// Breakpoints pushed onto or beyond a sentinel position are dropped, the sentinels keep their values.
  pub fn shift(&self, amount: P) -> StepFunctionMapping<P> {
    let mut result = StepFunctionMapping::with_interpolation(self.interpolation);
    for breakpoint in self.iter() {
      if breakpoint.is_sentinel() {
        result.set(breakpoint.position, breakpoint.value);
      }
      else if let Some(position) = breakpoint.position.checked_add(&amount) {
        if position != P::min_value() && position != P::max_value() {
          result.set(position, breakpoint.value);
        }
      }
    }
    result
  }

  /// Swaps positions and values: every breakpoint `(p, v)` becomes `(round(v), p)`, and `(0, 0)` is always added last.
  ///
  /// The result is the inverse function only if this mapping is monotonic. Otherwise the result is unspecified: when several breakpoints round to the same position, the one with the greatest original position wins.
  pub fn invert(&self) -> StepFunctionMapping<P> {
    let mut result = StepFunctionMapping::with_interpolation(self.interpolation);
    for breakpoint in self.iter() {
      result.set(P::from_real(breakpoint.value), breakpoint.position.to_real());
    }
    result.set(P::zero(), 0.0);
    result
  }

  /// Discrete antiderivative of this mapping read as a step function.
  ///
  /// The result is piecewise linear and is zero up to the first breakpoint after the lower sentinel. Every following breakpoint carries the sum of `width * value` over the steps before it. One more breakpoint right after the last one fixes the slope of the last step, which then extends to the end of the domain.
  pub fn integral(&self) -> StepFunctionMapping<P> {
    let mut result = StepFunctionMapping::piecewise_linear();
    let mut sum = 0.0;
    let mut previous: Option<Breakpoint<P>> = None;
    for breakpoint in self.iter().filter(|b| !b.is_sentinel()) {
      if let Some(step) = previous {
        sum += P::distance(step.position, breakpoint.position) * step.value;
      }
      result.set(breakpoint.position, sum);
      previous = Some(breakpoint);
    }
    if let Some(last) = previous {
      let upper = P::max_value();
      result.set(last.position + P::one(), sum + last.value);
      result.set(upper, sum + P::distance(last.position, upper) * last.value);
    }
    result
  }
}

impl<P: Position> Default for StepFunctionMapping<P>
{
  fn default() -> StepFunctionMapping<P> {
    StepFunctionMapping::new()
  }
}

impl<P: Position> Empty for StepFunctionMapping<P>
{
  fn empty() -> StepFunctionMapping<P> {
    StepFunctionMapping::new()
  }
}

/// Two mappings are equal if they have the same breakpoints, whatever their interpolation.
impl<P: Position> PartialEq for StepFunctionMapping<P>
{
  fn eq(&self, other: &StepFunctionMapping<P>) -> bool {
    self.breakpoints == other.breakpoints
  }
}

impl<P: Position> Hash for StepFunctionMapping<P>
{
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write_usize(self.breakpoints.len());
    for (position, &value) in &self.breakpoints {
      position.hash(state);
      // `0.0 == -0.0`, they must hash alike.
      let bits = if value == 0.0 { 0 } else { value.to_bits() };
      state.write_u64(bits);
    }
  }
}

/// Lists the breakpoints as `[position = value, ...]`. The sentinels are left out while they carry zero.
impl<P: Position> fmt::Display for StepFunctionMapping<P>
{
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    formatter.write_str("[")?;
    let shown = self.iter().filter(|b| !(b.is_sentinel() && b.value == 0.0));
    for (i, breakpoint) in shown.enumerate() {
      if i > 0 {
        formatter.write_str(", ")?;
      }
      write!(formatter, "{}", breakpoint)?;
    }
    formatter.write_str("]")
  }
}

forward_mapping_binop!(Add, add, add_mapping);
forward_scalar_binop!(Add, add, add_scalar);
forward_scalar_binop!(Sub, sub, subtract_scalar);
forward_scalar_binop!(Mul, mul, multiply);

impl<'a, P: Position> SubAssign<&'a StepFunctionMapping<P>> for StepFunctionMapping<P>
{
  fn sub_assign(&mut self, other: &'a StepFunctionMapping<P>) {
    self.subtract_in_place(other);
  }
}

impl<P: Position + Serialize> Serialize for Breakpoint<P>
{
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where
   S: Serializer
  {
    (self.position, self.value).serialize(serializer)
  }
}

impl<'de, P: Position + Deserialize<'de>> Deserialize<'de> for Breakpoint<P>
{
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where
   D: Deserializer<'de>
  {
    let (position, value) = <(P, f64)>::deserialize(deserializer)?;
    Ok(Breakpoint::new(position, value))
  }
}

/// Serialized as `(piecewise_linear, [(position, value), ...])`, sentinels included.
impl<P: Position + Serialize> Serialize for StepFunctionMapping<P>
{
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where
   S: Serializer
  {
    let breakpoints: Vec<Breakpoint<P>> = self.iter().collect();
    (self.is_piecewise_linear(), breakpoints).serialize(serializer)
  }
}

/// Missing sentinels are restored with the value zero.
impl<'de, P: Position + Deserialize<'de>> Deserialize<'de> for StepFunctionMapping<P>
{
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where
   D: Deserializer<'de>
  {
    let (linear, breakpoints) = <(bool, Vec<Breakpoint<P>>)>::deserialize(deserializer)?;
    let interpolation =
      if linear { Interpolation::PiecewiseLinear }
      else { Interpolation::PiecewiseConstant };
    Ok(StepFunctionMapping::from_breakpoints(interpolation, breakpoints))
  }
}

#[allow(non_upper_case_globals)]
#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;
  use serde_test::{assert_de_tokens, assert_tokens, Token};
  use std::collections::hash_map::DefaultHasher;

  const min: i32 = i32::min_value();
  const max: i32 = i32::max_value();

  // Breakpoints without the sentinels.
  fn steps(mapping: &StepFunctionMapping<i32>) -> Vec<(i32, f64)> {
    mapping.iter()
      .filter(|b| !b.is_sentinel())
      .map(|b| (b.position(), b.value()))
      .collect()
  }

  fn all_breakpoints(mapping: &StepFunctionMapping<i32>) -> Vec<(i32, f64)> {
    mapping.iter().map(|b| (b.position(), b.value())).collect()
  }

  fn make_mapping(increases: Vec<(i32, i32, f64)>) -> StepFunctionMapping<i32> {
    let mut mapping = StepFunctionMapping::new();
    for (from, to, amount) in increases {
      mapping.increase(from, to, amount).unwrap();
    }
    mapping
  }

  fn hash_of(mapping: &StepFunctionMapping<i32>) -> u64 {
    let mut hasher = DefaultHasher::new();
    mapping.hash(&mut hasher);
    hasher.finish()
  }

  #[test]
  fn new_mapping_is_zero_everywhere() {
    let mapping: StepFunctionMapping = StepFunctionMapping::new();
    for &x in &[min, -5, 0, 5, max] {
      assert_eq!(mapping.get(x), 0.0);
    }
    assert_eq!(mapping.len(), 2);
    assert_eq!(all_breakpoints(&mapping), vec![(min, 0.0), (max, 0.0)]);
    assert!(!mapping.is_piecewise_linear());
    assert_eq!(StepFunctionMapping::<i32>::empty(), mapping);
  }

  #[test]
  fn set_then_get() {
    let cases = vec![(0, 1.5), (-7, -2.0), (min, 3.0), (max, 4.0), (0, 8.0)];
    let mut constant = StepFunctionMapping::new();
    let mut linear = StepFunctionMapping::piecewise_linear();
    for (x, v) in cases {
      constant.set(x, v);
      linear.set(x, v);
      assert_eq!(constant.get(x), v);
      assert_eq!(linear.get(x), v);
    }
    assert_eq!(constant.len(), 4);
  }

  #[test]
  fn piecewise_constant_get() {
    let mut mapping = StepFunctionMapping::new();
    mapping.set(0, 1.0);
    mapping.set(10, 3.0);
    let cases = vec![
      (min, 0.0), (-1, 0.0), (0, 1.0), (9, 1.0), (10, 3.0), (max - 1, 3.0), (max, 0.0)
    ];
    for (x, expected) in cases {
      assert_eq!(mapping.get(x), expected, "value at {}", x);
    }
  }

  #[test]
  fn piecewise_linear_get() {
    let mut mapping = StepFunctionMapping::piecewise_linear();
    mapping.set(0, 0.0);
    mapping.set(10, 10.0);
    mapping.set(20, 0.0);
    let cases = vec![
      (-5, 0.0), (0, 0.0), (3, 3.0), (5, 5.0), (10, 10.0), (15, 5.0), (18, 2.0), (20, 0.0),
      (25, -5.0), (30, -10.0)
    ];
    for (x, expected) in cases {
      assert_eq!(mapping.get(x), expected, "value at {}", x);
    }
  }

  #[test]
  fn piecewise_linear_extrapolates_last_segment() {
    let mut mapping = StepFunctionMapping::piecewise_linear();
    assert_eq!(mapping.get(42), 0.0);
    mapping.set(0, 0.0);
    mapping.set(10, 10.0);
    let cases = vec![(-1, 0.0), (11, 11.0), (20, 20.0), (1000, 1000.0)];
    for (x, expected) in cases {
      assert_eq!(mapping.get(x), expected, "value at {}", x);
    }
    mapping.set(max, -3.0);
    assert_eq!(mapping.get(20), 20.0);
  }

  #[test]
  fn increase_splits_and_merges_steps() {
    let mut mapping = make_mapping(vec![(0, 10, 2.0)]);
    assert_eq!(all_breakpoints(&mapping), vec![(min, 0.0), (0, 2.0), (10, 0.0), (max, 0.0)]);
    mapping.increase(3, 5, 1.0).unwrap();
    assert_eq!(steps(&mapping), vec![(0, 2.0), (3, 3.0), (5, 2.0), (10, 0.0)]);
    mapping.increase(3, 5, -1.0).unwrap();
    assert_eq!(steps(&mapping), vec![(0, 2.0), (10, 0.0)]);
  }

  #[test]
  fn redundant_end_boundary_is_merged() {
    let mut mapping = make_mapping(vec![(0, 10, 1.0)]);
    mapping.increase(0, 10, -1.0).unwrap();
    assert_eq!(all_breakpoints(&mapping), vec![(min, 0.0), (max, 0.0)]);
    assert_eq!(mapping, StepFunctionMapping::new());
    assert_eq!(mapping.to_string(), "[]");

    let mut mapping = make_mapping(vec![(0, 10, 1.0), (10, 20, 2.0)]);
    mapping.increase(10, 20, -2.0).unwrap();
    assert_eq!(steps(&mapping), vec![(0, 1.0), (20, 0.0)]);
  }

  #[test]
  fn increase() {
    // Note: the first number is the test id, so it should be easy to identify which test has failed.
    let cases = vec![
      (1, vec![(0, 5, 1.0), (5, 10, 1.0)], vec![(0, 1.0), (10, 0.0)]),
      (2, vec![(5, 10, 1.0), (0, 5, 1.0)], vec![(0, 1.0), (10, 0.0)]),
      (3, vec![(0, 10, 1.0), (5, 15, 1.0)], vec![(0, 1.0), (5, 2.0), (10, 1.0), (15, 0.0)]),
      (4, vec![(5, 10, 1.0), (0, 15, 1.0)], vec![(0, 1.0), (5, 2.0), (10, 1.0), (15, 0.0)]),
      (5, vec![(0, 10, 1.0), (0, 10, -1.0)], vec![]),
      (6, vec![(0, 10, 1.0), (2, 4, -1.0)], vec![(0, 1.0), (2, 0.0), (4, 1.0), (10, 0.0)]),
      (7, vec![(0, 10, 1.0), (0, 10, 0.0)], vec![(0, 1.0), (10, 0.0)]),
      (8, vec![(0, 10, 1.0), (10, 20, -1.0)], vec![(0, 1.0), (10, -1.0), (20, 0.0)]),
      (9, vec![(0, max, 1.0)], vec![(0, 1.0)]),
    ];
    for (id, increases, expected) in cases {
      let mapping = make_mapping(increases);
      assert_eq!(steps(&mapping), expected, "test #{} of increase", id);
    }
  }

  #[test]
  fn increase_sentinel_ranges() {
    let mut mapping = make_mapping(vec![(0, max, 1.0)]);
    assert_eq!(mapping.get(max - 1), 1.0);
    assert_eq!(mapping.get(max), 0.0);
    mapping.increase(min, 0, 2.0).unwrap();
    assert_eq!(all_breakpoints(&mapping), vec![(min, 2.0), (0, 1.0), (max, 0.0)]);
    assert_eq!(mapping.get(min), 2.0);
    assert_eq!(mapping.get(-1), 2.0);
  }

  #[test]
  fn increase_rejects_invalid_ranges() {
    let mut mapping = make_mapping(vec![(0, 10, 2.0)]);
    let before = mapping.clone();
    assert_eq!(mapping.increase(5, 5, 1.0), Err(Error::InvalidRange { from: 5, to: 5 }));
    assert_eq!(mapping.increase(6, 5, 1.0), Err(Error::InvalidRange { from: 6, to: 5 }));
    assert_eq!(mapping.decrease(6, 5, 1.0), Err(Error::InvalidRange { from: 6, to: 5 }));
    assert_eq!(mapping.increase_at(max, 1.0),
      Err(Error::InvalidRange { from: max as i128, to: max as i128 + 1 }));
    assert_eq!(mapping, before);
  }

  #[test]
  fn single_point_updates() {
    let mut mapping = StepFunctionMapping::new();
    mapping.increase_at(3, 2.0).unwrap();
    assert_eq!(steps(&mapping), vec![(3, 2.0), (4, 0.0)]);
    mapping.decrease(3, 4, 0.5).unwrap();
    assert_eq!(steps(&mapping), vec![(3, 1.5), (4, 0.0)]);
    mapping.decrease_at(3, 1.5).unwrap();
    assert_eq!(steps(&mapping), vec![]);
    assert_eq!(mapping, StepFunctionMapping::new());
  }

  #[test]
  fn first_last() {
    let mut mapping = StepFunctionMapping::new();
    assert_eq!(mapping.first(), None);
    assert_eq!(mapping.last(), None);
    assert_eq!(mapping.last_value(), 0.0);
    mapping.increase(0, 10, 2.0).unwrap();
    assert_eq!(mapping.first(), Some(Breakpoint::new(0, 2.0)));
    assert_eq!(mapping.last(), Some(Breakpoint::new(10, 0.0)));
    mapping.set(20, 5.0);
    assert_eq!(mapping.last(), Some(Breakpoint::new(20, 5.0)));
    assert_eq!(mapping.last_value(), 5.0);
  }

  #[test]
  fn directional_queries() {
    let mut mapping = StepFunctionMapping::new();
    mapping.set(0, 1.0);
    mapping.set(10, 3.0);
    let b0 = Some(Breakpoint::new(0, 1.0));
    let b10 = Some(Breakpoint::new(10, 3.0));
    assert_eq!(mapping.floor(5), b0);
    assert_eq!(mapping.floor(10), b10);
    assert_eq!(mapping.ceiling(5), b10);
    assert_eq!(mapping.ceiling(0), b0);
    assert_eq!(mapping.lower(10), b0);
    assert_eq!(mapping.higher(0), b10);
    assert_eq!(mapping.floor(-1), Some(Breakpoint::new(min, 0.0)));
    assert_eq!(mapping.ceiling(11), Some(Breakpoint::new(max, 0.0)));
    assert_eq!(mapping.lower(min), None);
    assert_eq!(mapping.higher(max), None);
  }

  #[test]
  fn add_mapping() {
    let a = make_mapping(vec![(0, 10, 1.0)]);
    let b = make_mapping(vec![(5, 15, 2.0)]);
    let sum = a.add_mapping(&b);
    assert_eq!(steps(&sum), vec![(0, 1.0), (5, 3.0), (10, 2.0), (15, 0.0)]);
    assert!(!sum.is_piecewise_linear());
    assert_eq!(&a + &b, sum);
    assert_eq!(a.clone() + b.clone(), sum);

    let mut linear = StepFunctionMapping::piecewise_linear();
    linear.set(0, 0.0);
    linear.set(10, 10.0);
    assert!(a.add_mapping(&linear).is_piecewise_linear());
    assert!(linear.add_mapping(&a).is_piecewise_linear());
  }

  #[test]
  fn add_mapping_keeps_union_of_positions() {
    let a = make_mapping(vec![(0, 10, 1.0)]);
    let b = make_mapping(vec![(0, 10, -1.0)]);
    let sum = &a + &b;
    assert_eq!(steps(&sum), vec![(0, 0.0), (10, 0.0)]);
    for &x in &[-1, 0, 5, 10] {
      assert_eq!(sum.get(x), 0.0);
    }
  }

  #[test]
  fn subtract_in_place() {
    let mut a = make_mapping(vec![(0, 10, 3.0)]);
    let b = make_mapping(vec![(5, 15, 1.0)]);
    a.subtract_in_place(&b);
    assert_eq!(steps(&a), vec![(0, 3.0), (5, 2.0), (10, -1.0), (15, 0.0)]);

    let mut c = make_mapping(vec![(0, 10, 3.0)]);
    c -= &make_mapping(vec![(0, 10, 3.0)]);
    assert_eq!(c, StepFunctionMapping::new());
  }

  #[test]
  fn scalar_operations() {
    let mapping = make_mapping(vec![(0, 10, 2.0)]);
    assert_eq!(all_breakpoints(&mapping.add_scalar(1.0)),
      vec![(min, 1.0), (0, 3.0), (10, 1.0), (max, 1.0)]);
    assert_eq!(mapping.add_scalar(1.0).get(-100), 1.0);
    assert_eq!(steps(&mapping.subtract_scalar(2.0)), vec![(0, 0.0), (10, -2.0)]);
    assert_eq!(steps(&mapping.multiply(3.0)), vec![(0, 6.0), (10, 0.0)]);
    assert_eq!(steps(&mapping.divide(2.0).unwrap()), vec![(0, 1.0), (10, 0.0)]);
    assert_eq!(mapping.divide(0.0), Err(Error::DivisionByZero));
    assert_eq!(&mapping + 1.0, mapping.add_scalar(1.0));
    assert_eq!(&mapping - 1.0, mapping.subtract_scalar(1.0));
    assert_eq!(mapping.clone() * 3.0, mapping.multiply(3.0));

    let linear = StepFunctionMapping::<i32>::piecewise_linear();
    assert!(linear.multiply(2.0).is_piecewise_linear());
  }

  #[test]
  fn shift() {
    let mapping = make_mapping(vec![(0, 10, 2.0)]);
    let shifted = mapping.shift(5);
    assert_eq!(steps(&shifted), vec![(5, 2.0), (15, 0.0)]);
    assert_eq!(shifted.shift(-5), mapping);

    let mut edge = StepFunctionMapping::new();
    edge.set(max - 1, 4.0);
    edge.set(min + 1, 3.0);
    assert_eq!(steps(&edge.shift(1)), vec![(min + 2, 3.0)]);
    assert_eq!(steps(&edge.shift(-1)), vec![(max - 2, 4.0)]);
    assert_eq!(all_breakpoints(&edge.shift(max)), vec![(min, 0.0), (0, 3.0), (max, 0.0)]);
  }

  #[test]
  fn invert() {
    let mut mapping = StepFunctionMapping::new();
    mapping.set(1, 2.0);
    mapping.set(2, 4.0);
    mapping.set(3, 6.4);
    let inverse = mapping.invert();
    assert_eq!(steps(&inverse), vec![(0, 0.0), (2, 1.0), (4, 2.0), (6, 3.0)]);
    assert!(!inverse.is_piecewise_linear());

    let mut flat = StepFunctionMapping::new();
    flat.set(1, 5.0);
    flat.set(2, 5.0);
    assert_eq!(steps(&flat.invert()), vec![(0, 0.0), (5, 2.0)]);
  }

  #[test]
  fn integral() {
    let mapping = make_mapping(vec![(0, 10, 2.0), (5, 15, 1.0)]);
    let integral = mapping.integral();
    assert!(integral.is_piecewise_linear());
    assert_eq!(steps(&integral), vec![(0, 0.0), (5, 10.0), (10, 25.0), (15, 30.0), (16, 30.0)]);
    let cases = vec![(-100, 0.0), (0, 0.0), (2, 4.0), (5, 10.0), (7, 16.0), (12, 27.0), (15, 30.0), (1000, 30.0)];
    for (x, expected) in cases {
      assert_eq!(integral.get(x), expected, "integral at {}", x);
    }
  }

  #[test]
  fn integral_of_constant_step_is_linear() {
    let integral = make_mapping(vec![(10, 20, 3.0)]).integral();
    for i in 0..=10 {
      assert_eq!(integral.get(10 + i), 3.0 * i as f64);
    }
    assert_eq!(integral.get(25), 30.0);
    assert_eq!(integral.get(100_000), 30.0);
  }

  #[test]
  fn integral_keeps_last_slope() {
    let integral = make_mapping(vec![(0, max, 2.0)]).integral();
    assert_eq!(steps(&integral), vec![(0, 0.0), (1, 2.0)]);
    assert_eq!(integral.get(50), 100.0);
    assert_eq!(integral.get(max), 2.0 * max as f64);
    assert_eq!(StepFunctionMapping::<i32>::new().integral(), StepFunctionMapping::new());
  }

  #[test]
  fn equality_hash_and_clone() {
    let mapping = make_mapping(vec![(0, 10, 2.0)]);
    let mut clone = mapping.clone();
    assert_eq!(clone, mapping);
    assert_eq!(hash_of(&clone), hash_of(&mapping));
    clone.increase(3, 4, 1.0).unwrap();
    assert_ne!(clone, mapping);
    assert_eq!(steps(&mapping), vec![(0, 2.0), (10, 0.0)]);

    let linear = StepFunctionMapping::from_breakpoints(Interpolation::PiecewiseLinear, mapping.iter());
    assert_eq!(linear, mapping);
    assert!(linear.is_piecewise_linear());

    let mut zero = StepFunctionMapping::new();
    zero.set(5, 0.0);
    let mut negative_zero = StepFunctionMapping::new();
    negative_zero.set(5, -0.0);
    assert_eq!(zero, negative_zero);
    assert_eq!(hash_of(&zero), hash_of(&negative_zero));
  }

  #[test]
  fn from_breakpoints_restores_sentinels() {
    let mapping = StepFunctionMapping::from_breakpoints(Interpolation::PiecewiseConstant,
      vec![Breakpoint::new(0, 1.0), Breakpoint::new(4, 2.0), Breakpoint::new(0, 3.0)]);
    assert_eq!(all_breakpoints(&mapping), vec![(min, 0.0), (0, 3.0), (4, 2.0), (max, 0.0)]);
  }

  #[test]
  fn display() {
    let mut mapping = StepFunctionMapping::new();
    assert_eq!(mapping.to_string(), "[]");
    mapping.increase(0, 10, 2.0).unwrap();
    assert_eq!(mapping.to_string(), "[0 = 2, 10 = 0]");
    mapping.set(5, 2.5);
    assert_eq!(mapping.to_string(), "[0 = 2, 5 = 2.5, 10 = 0]");
    assert_eq!(make_mapping(vec![(0, 10, 2.0)]).add_scalar(1.0).to_string(),
      "[-2147483648 = 1, 0 = 3, 10 = 1, 2147483647 = 1]");
  }

  #[test]
  fn serde() {
    assert_tokens(&Breakpoint::new(3, 1.5), &[
      Token::Tuple { len: 2 },
      Token::I32(3),
      Token::F64(1.5),
      Token::TupleEnd
    ]);

    let mut mapping = StepFunctionMapping::new();
    mapping.set(4, 1.5);
    assert_tokens(&mapping, &[
      Token::Tuple { len: 2 },
      Token::Bool(false),
      Token::Seq { len: Some(3) },
      Token::Tuple { len: 2 }, Token::I32(min), Token::F64(0.0), Token::TupleEnd,
      Token::Tuple { len: 2 }, Token::I32(4), Token::F64(1.5), Token::TupleEnd,
      Token::Tuple { len: 2 }, Token::I32(max), Token::F64(0.0), Token::TupleEnd,
      Token::SeqEnd,
      Token::TupleEnd
    ]);

    assert_de_tokens(&mapping, &[
      Token::Tuple { len: 2 },
      Token::Bool(true),
      Token::Seq { len: Some(1) },
      Token::Tuple { len: 2 }, Token::I32(4), Token::F64(1.5), Token::TupleEnd,
      Token::SeqEnd,
      Token::TupleEnd
    ]);
  }

  fn increases() -> impl Strategy<Value=Vec<(i32, i32, i32)>> {
    prop::collection::vec((-1000i32..1000, 1i32..200, -50i32..50), 0..12)
  }

  fn build(increases: &[(i32, i32, i32)]) -> StepFunctionMapping<i32> {
    let mut mapping = StepFunctionMapping::new();
    for &(from, width, amount) in increases {
      mapping.increase(from, from + width, amount as f64).unwrap();
    }
    mapping
  }

  proptest! {
    #[test]
    fn get_after_set(increases in increases(), x in any::<i32>(), v in -1e6f64..1e6) {
      let mut mapping = build(&increases);
      mapping.set(x, v);
      prop_assert_eq!(mapping.get(x), v);
    }

    #[test]
    fn disjoint_increases_commute(
      cuts in prop::collection::btree_set(-1000i32..1000, 2..12),
      amounts in prop::collection::vec(-20i32..20, 11))
    {
      let cuts: Vec<i32> = cuts.into_iter().collect();
      let ranges: Vec<(i32, i32, f64)> = cuts.windows(2)
        .zip(amounts.iter())
        .map(|(w, &amount)| (w[0], w[1], amount as f64))
        .collect();
      let forward = make_mapping(ranges.clone());
      let backward = make_mapping(ranges.into_iter().rev().collect());
      for &cut in &cuts {
        prop_assert_eq!(forward.get(cut - 1), backward.get(cut - 1));
        prop_assert_eq!(forward.get(cut), backward.get(cut));
      }
      prop_assert_eq!(forward, backward);
    }

    #[test]
    fn increase_then_decrease_restores(increases in increases(), a in -1000i32..1000, width in 1i32..300, v in -50i32..50) {
      let original = build(&increases);
      let mut mapping = original.clone();
      mapping.increase(a, a + width, v as f64).unwrap();
      mapping.increase(a, a + width, -v as f64).unwrap();
      for x in a..a + width {
        prop_assert_eq!(mapping.get(x), original.get(x));
      }
    }

    #[test]
    fn add_is_pointwise(left in increases(), right in increases(), x in -1300i32..1300) {
      let a = build(&left);
      let b = build(&right);
      prop_assert_eq!((&a + &b).get(x), a.get(x) + b.get(x));
    }

    #[test]
    fn shift_back_and_forth(increases in increases(), d in -10000i32..10000) {
      let mapping = build(&increases);
      prop_assert_eq!(steps(&mapping.shift(d).shift(-d)), steps(&mapping));
    }

    #[test]
    fn clone_is_independent(increases in increases(), x in -1000i32..1000) {
      let original = build(&increases);
      let before = original.get(x);
      let mut clone = original.clone();
      prop_assert_eq!(&clone, &original);
      clone.increase_at(x, 1.0).unwrap();
      prop_assert_eq!(original.get(x), before);
      prop_assert_eq!(clone.get(x), before + 1.0);
    }
  }
}
