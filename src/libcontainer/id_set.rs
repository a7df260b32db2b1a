// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sets of identifiable objects stored by id.
//!
//! An [`IdIndexedSet`] keeps every element in the slot given by its id, in a vector whose length (the capacity) is one more than the greatest id it accepts. Membership tests, insertion and removal are O(1). The elements are ordered by id, and the ordered queries (`first`, `last`, `predecessor`, `successor`) scan the slots from the relevant end or element until they meet an occupied one: their cost grows with the distance travelled, not with the number of elements.
//!
//! Elements are shared handles (`Rc<E>`), an element may be stored in several sets and other structures at once. Membership is decided by identity of the handle, not by id: a different object that merely shares the id of a stored one is not contained.
//!
//! # Examples
//!
//! ```rust
//! use std::rc::Rc;
//! use container::{IdIndexedSet, Identifiable};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Node(isize);
//!
//! impl Identifiable for Node {
//!   fn id(&self) -> isize { self.0 }
//! }
//!
//! let mut nodes = IdIndexedSet::new(10);
//! let (a, b) = (Rc::new(Node(2)), Rc::new(Node(5)));
//! assert!(nodes.add(a.clone()));
//! assert!(nodes.add(b.clone()));
//! assert!(!nodes.add(Rc::new(Node(10))));
//! assert_eq!(nodes.successor(&a), Some(&b));
//! assert!(!nodes.contains(&Rc::new(Node(2))));
//! ```

use crate::error::{Error, Result};
use crate::ops::Identifiable;
use bit_set::BitSet;
use gcollections::kind::Collection;
use gcollections::ops::{Cardinality, Contains, Empty};
use log::{debug, trace};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::slice;

#[derive(Debug)]
pub struct IdIndexedSet<E>
{
  slots: Vec<Option<Rc<E>>>,
  size: usize
}

impl<E: Identifiable> IdIndexedSet<E>
{
  /// An empty set accepting the ids `0..capacity`.
  pub fn new(capacity: usize) -> IdIndexedSet<E> {
    IdIndexedSet {
      slots: vec![None; capacity],
      size: 0
    }
  }

  /// A full set over `elements`, the element of id `i` being at index `i`.
  ///
  /// Fails with `Error::SlotMismatch` if an element is not at the index of its id.
  pub fn from_elements(elements: Vec<Rc<E>>) -> Result<IdIndexedSet<E>> {
    IdIndexedSet::from_slots(elements.into_iter().map(Some).collect())
  }

  /// A set over caller-prepared slots, `None` marking an empty slot.
  ///
  /// The vector becomes the storage of the set as is, without copy: the set owns it exclusively from now on. Fails with `Error::SlotMismatch` if an element is not in the slot of its id, in which case nothing is built.
  pub fn from_slots(slots: Vec<Option<Rc<E>>>) -> Result<IdIndexedSet<E>> {
    let mut size = 0;
    for (slot, element) in slots.iter().enumerate() {
      if let Some(element) = element {
        if element.id() != slot as isize {
          return Err(Error::SlotMismatch { slot, id: element.id() });
        }
        size += 1;
      }
    }
    trace!("id-indexed set over {} slots with {} elements", slots.len(), size);
    Ok(IdIndexedSet { slots, size })
  }

  /// One more than the greatest accepted id.
  pub fn capacity(&self) -> usize {
    self.slots.len()
  }

  /// Number of stored elements. Runtime O(1).
  pub fn len(&self) -> usize {
    self.size
  }

  pub fn is_empty(&self) -> bool {
    self.size == 0
  }

  fn slot_of(&self, id: isize) -> Option<usize> {
    if id >= 0 && (id as usize) < self.slots.len() {
      Some(id as usize)
    }
    else {
      None
    }
  }

  /// Stores `element` in the slot of its id, replacing the current occupant if any.
  ///
  /// Returns `false`, leaving the set untouched, if the id is negative or not below the capacity.
  pub fn add(&mut self, element: Rc<E>) -> bool {
    match self.slot_of(element.id()) {
      Some(slot) => {
        if self.slots[slot].replace(element).is_none() {
          self.size += 1;
        }
        true
      }
      None => false
    }
  }

  /// Removes the element stored under the id of `element`, which need not be `element` itself.
  pub fn remove(&mut self, element: &E) -> Option<Rc<E>> {
    self.remove_id(element.id())
  }

  pub fn remove_id(&mut self, id: isize) -> Option<Rc<E>> {
    let slot = self.slot_of(id)?;
    let removed = self.slots[slot].take();
    if removed.is_some() {
      self.size -= 1;
    }
    removed
  }

  /// Removes and returns the element with the greatest id. Runtime O(capacity - id of that element).
  pub fn remove_last(&mut self) -> Option<Rc<E>> {
    let slot = self.slots.iter().rposition(Option::is_some)?;
    self.size -= 1;
    self.slots[slot].take()
  }

  /// `true` if this very handle is stored in the set. Runtime O(1).
  pub fn contains(&self, element: &Rc<E>) -> bool {
    self.slot_of(element.id())
      .and_then(|slot| self.slots[slot].as_ref())
      .map_or(false, |stored| Rc::ptr_eq(stored, element))
  }

  /// The element stored under `id`, if any.
  pub fn get(&self, id: isize) -> Option<&Rc<E>> {
    self.slot_of(id).and_then(|slot| self.slots[slot].as_ref())
  }

  /// Element with the smallest id. Runtime O(its id).
  pub fn first(&self) -> Option<&Rc<E>> {
    self.slots.iter().find_map(Option::as_ref)
  }

  /// Element with the greatest id. Runtime O(capacity - its id).
  pub fn last(&self) -> Option<&Rc<E>> {
    self.slots.iter().rev().find_map(Option::as_ref)
  }

  /// Element with the greatest id smaller than the id of `element`.
  ///
  /// `None` if `element` is the first one or is not contained in the set. Runtime O(id of `element`).
  pub fn predecessor(&self, element: &Rc<E>) -> Option<&Rc<E>> {
    if !self.contains(element) {
      return None;
    }
    let slot = element.id() as usize;
    self.slots[..slot].iter().rev().find_map(Option::as_ref)
  }

  /// Element with the smallest id greater than the id of `element`.
  ///
  /// `None` if `element` is the last one or is not contained in the set. Runtime O(capacity - id of `element`).
  pub fn successor(&self, element: &Rc<E>) -> Option<&Rc<E>> {
    if !self.contains(element) {
      return None;
    }
    let slot = element.id() as usize;
    self.slots[slot + 1..].iter().find_map(Option::as_ref)
  }

  /// Reallocates the slots to accept the ids `0..capacity`.
  ///
  /// Elements with an id not below the new capacity are dropped from the set. Every call costs O(capacity), this is not a growable vector: size the set once at construction and avoid repeated resizing.
  pub fn set_capacity(&mut self, capacity: usize) {
    if capacity < self.slots.len() {
      let dropped = self.slots[capacity..].iter().filter(|slot| slot.is_some()).count();
      if dropped > 0 {
        debug!("shrinking id-indexed set from {} to {} slots drops {} elements",
          self.slots.len(), capacity, dropped);
      }
      self.size -= dropped;
    }
    self.slots.resize(capacity, None);
    self.slots.shrink_to_fit();
  }

  pub fn clear(&mut self) {
    for slot in self.slots.iter_mut() {
      *slot = None;
    }
    self.size = 0;
  }

  /// Ids of the stored elements.
  pub fn ids(&self) -> BitSet {
    let mut ids = BitSet::with_capacity(self.slots.len());
    for (slot, element) in self.slots.iter().enumerate() {
      if element.is_some() {
        ids.insert(slot);
      }
    }
    ids
  }
}

impl<E> IdIndexedSet<E>
{
  /// Elements in increasing order of id.
  pub fn iter(&self) -> Iter<E> {
    Iter {
      slots: self.slots.iter()
    }
  }
}

pub struct Iter<'a, E>
{
  slots: slice::Iter<'a, Option<Rc<E>>>
}

impl<'a, E> Iterator for Iter<'a, E>
{
  type Item = &'a Rc<E>;

  fn next(&mut self) -> Option<&'a Rc<E>> {
    self.slots.find_map(Option::as_ref)
  }
}

impl<'a, E> DoubleEndedIterator for Iter<'a, E>
{
  fn next_back(&mut self) -> Option<&'a Rc<E>> {
    self.slots.by_ref().rev().find_map(Option::as_ref)
  }
}

impl<'a, E> IntoIterator for &'a IdIndexedSet<E>
{
  type Item = &'a Rc<E>;
  type IntoIter = Iter<'a, E>;

  fn into_iter(self) -> Iter<'a, E> {
    self.iter()
  }
}

/// Copies every element, the clone shares nothing with this set.
impl<E: Clone> Clone for IdIndexedSet<E>
{
  fn clone(&self) -> IdIndexedSet<E> {
    IdIndexedSet {
      slots: self.slots.iter()
        .map(|slot| slot.as_ref().map(|element| Rc::new(E::clone(element))))
        .collect(),
      size: self.size
    }
  }
}

/// Two sets are equal if they have the same size and their elements, taken in increasing order of id, are pairwise equal.
impl<E: PartialEq> PartialEq for IdIndexedSet<E>
{
  fn eq(&self, other: &IdIndexedSet<E>) -> bool {
    self.size == other.size &&
      self.iter().zip(other.iter()).all(|(a, b)| **a == **b)
  }
}

impl<E: Eq> Eq for IdIndexedSet<E> {}

/// Sum of the element hashes, each divided by the size of the set.
///
/// Equal sets hash alike, but the hash is weak: it ignores the order of elements and the division drops low bits. Do not rely on it where collisions matter.
impl<E: Hash> Hash for IdIndexedSet<E>
{
  fn hash<H: Hasher>(&self, state: &mut H) {
    let mut sum: u64 = 0;
    for element in self.iter() {
      let mut hasher = DefaultHasher::new();
      element.hash(&mut hasher);
      sum = sum.wrapping_add(hasher.finish() / self.size as u64);
    }
    state.write_u64(sum);
  }
}

/// Lists the ids of the stored elements as `[2 5 9]`.
impl<E: Identifiable> fmt::Display for IdIndexedSet<E>
{
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    formatter.write_str("[")?;
    for (i, element) in self.iter().enumerate() {
      if i > 0 {
        formatter.write_str(" ")?;
      }
      write!(formatter, "{}", element.id())?;
    }
    formatter.write_str("]")
  }
}

impl<E> Collection for IdIndexedSet<E>
{
  type Item = Rc<E>;
}

impl<E> Cardinality for IdIndexedSet<E>
{
  type Size = usize;

  fn size(&self) -> usize {
    self.size
  }
}

impl<E: Identifiable> Contains for IdIndexedSet<E>
{
  fn contains(&self, value: &Rc<E>) -> bool {
    IdIndexedSet::contains(self, value)
  }
}

/// A set of capacity zero, see `set_capacity`.
impl<E: Identifiable> Empty for IdIndexedSet<E>
{
  fn empty() -> IdIndexedSet<E> {
    IdIndexedSet::new(0)
  }
}
