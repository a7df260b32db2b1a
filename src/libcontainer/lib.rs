// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This library proposes two containers for scheduling and resource models. The first is a step function over an integer domain, typically the capacity or the load of a resource over time, supporting range updates and pointwise algebra. The second is a set of identifiable objects stored in the slot given by their id, with constant-time membership and ordered navigation.
//!
//! # Examples
//!
//! For examples see the [step_mapping module](step_mapping/index.html) or the [id_set module](id_set/index.html).
//!
//! Both containers implement the collection traits of [gcollections](https://docs.rs/gcollections) where they apply.

#[macro_use]
mod macros;

pub mod error;
pub mod ops;
pub mod step_mapping;
pub mod id_set;

pub use error::{Error, Result};
pub use ops::{Identifiable, Position};
pub use step_mapping::{Breakpoint, Interpolation, StepFunctionMapping};
pub use id_set::IdIndexedSet;
