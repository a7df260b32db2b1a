// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Domain traits shared by the containers.

use num_traits::PrimInt;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Integer type usable as the domain of a [`StepFunctionMapping`](../step_mapping/struct.StepFunctionMapping.html).
///
/// The bounds `min_value()` and `max_value()` (from `num_traits::Bounded`) are the positions of the two sentinel breakpoints, they stand for minus and plus infinity.
pub trait Position : PrimInt + Hash + Debug + Display
{
  /// Converts the position into the value domain. Exact for positions of at most 53 significant bits.
  fn to_real(self) -> f64;

  /// Rounds `value` to the nearest position (halfway cases away from zero). Values outside of the domain saturate at its bounds and `NaN` maps to zero.
  fn from_real(value: f64) -> Self;

  /// Widening conversion used to report positions in errors.
  fn to_wide(self) -> i128;

  /// Distance `upper - lower` as a real, it cannot overflow even between the two sentinels.
  fn distance(lower: Self, upper: Self) -> f64 {
    upper.to_real() - lower.to_real()
  }
}

macro_rules! position_impl
{
  ( $( $t: ty ),* ) =>
  {$(
    impl Position for $t
    {
      fn to_real(self) -> f64 {
        self as f64
      }

      fn from_real(value: f64) -> $t {
        value.round() as $t
      }

      fn to_wide(self) -> i128 {
        self as i128
      }
    }
  )*}
}

position_impl!(i8,i16,i32,i64,isize,u8,u16,u32,u64,usize);

/// Objects referenced by a dense integer identifier.
///
/// The id must stay stable while the object is stored in an [`IdIndexedSet`](../id_set/struct.IdIndexedSet.html), and must be unique among the objects stored in the same set. Negative ids are allowed by this trait but such objects are never stored.
pub trait Identifiable
{
  fn id(&self) -> isize;
}
