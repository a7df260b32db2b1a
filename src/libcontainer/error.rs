// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors reported by the containers.
//!
//! Only invalid input is an error. Looking up an absent element yields `None` and adding an element whose id is out of range yields `false`, both are expected outcomes.

use crate::ops::Position;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error
{
  /// A range update `[from, to)` with `to <= from`, or whose end is not representable.
  #[error("invalid range [{from}, {to}): the end must be greater than the start")]
  InvalidRange {
    from: i128,
    to: i128
  },

  /// An element handed to a view constructor does not sit in the slot of its id.
  #[error("element with id {id} cannot be stored in slot {slot}")]
  SlotMismatch {
    slot: usize,
    id: isize
  },

  #[error("division of a mapping by zero")]
  DivisionByZero
}

impl Error
{
  pub(crate) fn invalid_range<P: Position>(from: P, to: P) -> Error {
    Error::InvalidRange {
      from: from.to_wide(),
      to: to.to_wide()
    }
  }
}
