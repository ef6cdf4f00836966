//! Building blocks shared by the combinators that subscribe several sources
//! at once (`merge`, `combine_latest`, `with_latest_from`, `zip`).
//!
//! Every source is subscribed with a [`SourceObserver`] that tags its
//! notifications with the source index and forwards them to one state value
//! owned by the combinator's subscription.
use crate::{
  observer::Observer,
  ops::map::MapOp,
  prelude::*,
  rc::{MutRc, RcDerefMut},
  subscription::LocalSubscription,
};
use log::trace;
use std::collections::VecDeque;

/// The per-subscription state of a combinator, receiving the notifications
/// of every source together with the index of the source.
///
/// A source notifying while another notification of the same combinator is
/// still being delivered violates the serial notification contract and
/// panics.
#[doc(hidden)]
pub trait SourceState<Item, Err> {
  fn next(&mut self, index: usize, value: Item);
  fn error(&mut self, index: usize, err: Err);
  fn complete(&mut self, index: usize);
  fn is_finished(&self) -> bool;
}

pub struct SourceObserver<St> {
  index: usize,
  state: MutRc<St>,
}

impl<St> SourceObserver<St> {
  #[inline]
  pub(crate) fn new(index: usize, state: MutRc<St>) -> Self {
    SourceObserver { index, state }
  }
}

impl<Item, Err, St> Observer<Item, Err> for SourceObserver<St>
where
  St: SourceState<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) {
    self.state.rc_deref_mut().next(self.index, value)
  }

  #[inline]
  fn error(self, err: Err) { self.state.rc_deref_mut().error(self.index, err) }

  #[inline]
  fn complete(self) { self.state.rc_deref_mut().complete(self.index) }

  fn is_finished(&self) -> bool {
    // Only borrowed while a notification of this combinator is in flight,
    // which means it is still live.
    self
      .state
      .try_rc_deref_mut()
      .map_or(false, |state| state.is_finished())
  }
}

/// Subscribes `source` as index 0 and `others` as indexes 1.., adding every
/// subscription to `group`. Stops subscribing once the state reached a
/// terminal notification.
pub(crate) fn subscribe_sources<Item, Err, St, S, SO>(
  state: &MutRc<St>,
  group: &LocalSubscription,
  source: S,
  others: Vec<SO>,
) where
  St: SourceState<Item, Err>,
  S: Observable<Item, Err, SourceObserver<St>>,
  SO: Observable<Item, Err, SourceObserver<St>>,
{
  group.add(source.actual_subscribe(SourceObserver::new(0, state.clone())));
  for (idx, other) in others.into_iter().enumerate() {
    if state_finished::<Item, Err, _>(state) {
      break;
    }
    let observer = SourceObserver::new(idx + 1, state.clone());
    group.add(other.actual_subscribe(observer));
  }
}

pub(crate) fn state_finished<Item, Err, St>(state: &MutRc<St>) -> bool
where
  St: SourceState<Item, Err>,
{
  state.try_rc_deref_mut().map_or(false, |state| state.is_finished())
}

/// Counts completions of a fixed number of sources.
#[derive(Debug)]
pub struct GroupComplete {
  remaining: usize,
}

impl GroupComplete {
  pub fn new(total: usize) -> Self { GroupComplete { remaining: total } }

  /// Records one completion. Returns `true` exactly once, for the completion
  /// of the last source.
  pub fn complete_one(&mut self) -> bool {
    if self.remaining == 0 {
      return false;
    }
    self.remaining -= 1;
    trace!("source completed, {} remaining", self.remaining);
    self.remaining == 0
  }
}

/// The latest value of every source, by source index.
#[derive(Debug)]
pub struct ValueCache<Item> {
  values: Vec<Option<Item>>,
  received: usize,
}

impl<Item> ValueCache<Item> {
  pub fn new(len: usize) -> Self {
    ValueCache { values: (0..len).map(|_| None).collect(), received: 0 }
  }

  pub fn set(&mut self, index: usize, value: Item) {
    let slot = &mut self.values[index];
    if slot.is_none() {
      self.received += 1;
    }
    *slot = Some(value);
  }

  /// Every source delivered at least one value.
  #[inline]
  pub fn is_ready(&self) -> bool { self.received == self.values.len() }

  /// Clones the cached values in source order, skipping sources that have
  /// no value yet.
  pub fn snapshot(&self) -> Vec<Item>
  where
    Item: Clone,
  {
    self.values.iter().flatten().cloned().collect()
  }
}

/// Pending zip slots. A value of source `i` lands in the earliest slot that
/// has no value of source `i` yet; the front slot is always the first to be
/// filled.
#[derive(Debug)]
pub struct ZipBuffer<Item> {
  slots: VecDeque<Vec<Option<Item>>>,
  buffered: Vec<usize>,
  completed: Vec<bool>,
}

impl<Item> ZipBuffer<Item> {
  pub fn new(sources: usize) -> Self {
    ZipBuffer {
      slots: VecDeque::new(),
      buffered: vec![0; sources],
      completed: vec![false; sources],
    }
  }

  /// Stores `value` of source `index` and returns the front slot's values
  /// when it became full.
  pub fn push(&mut self, index: usize, value: Item) -> Option<Vec<Item>> {
    let position = self.buffered[index];
    if position == self.slots.len() {
      let width = self.buffered.len();
      self.slots.push_back((0..width).map(|_| None).collect());
    }
    self.slots[position][index] = Some(value);
    self.buffered[index] += 1;

    let full = self
      .slots
      .front()
      .map_or(false, |slot| slot.iter().all(Option::is_some));
    if !full {
      return None;
    }
    let slot = self.slots.pop_front()?;
    self.buffered.iter_mut().for_each(|count| *count -= 1);
    Some(slot.into_iter().flatten().collect())
  }

  /// Marks source `index` completed and returns whether it is exhausted.
  pub fn mark_completed(&mut self, index: usize) -> bool {
    self.completed[index] = true;
    self.is_exhausted(index)
  }

  /// A source is exhausted once it completed and all of its values were
  /// paired, no further slot can be filled.
  #[inline]
  pub fn is_exhausted(&self, index: usize) -> bool {
    self.completed[index] && self.buffered[index] == 0
  }

  pub fn any_exhausted(&self) -> bool {
    (0..self.completed.len()).any(|idx| self.is_exhausted(idx))
  }

  /// Number of slots waiting for values.
  #[inline]
  pub fn pending(&self) -> usize { self.slots.len() }
}

/// Tags the values of the two sources of a binary combinator so they can
/// share one item type.
#[derive(Clone, Debug, PartialEq)]
pub enum CombineItem<A, B> {
  ItemA(A),
  ItemB(B),
}

/// Unpacks the two-source output of a binary combinator.
pub fn into_pair<A, B>(items: Vec<CombineItem<A, B>>) -> (A, B) {
  let mut items = items.into_iter();
  match (items.next(), items.next()) {
    (Some(CombineItem::ItemA(a)), Some(CombineItem::ItemB(b))) => (a, b),
    _ => unreachable!("binary combinators emit the first source, then the second"),
  }
}

/// The first source of a binary combinator, tagged.
pub type TaggedA<S, A, B> = MapOp<S, fn(A) -> CombineItem<A, B>, A>;

/// The second source of a binary combinator, tagged.
pub type TaggedB<S, A, B> = MapOp<S, fn(B) -> CombineItem<A, B>, B>;

/// A binary combinator whose output is unpacked into a tuple.
pub type Paired<Op, A, B> = MapOp<
  Op,
  fn(Vec<CombineItem<A, B>>) -> (A, B),
  Vec<CombineItem<A, B>>,
>;

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn group_complete_fires_once() {
    let mut group = GroupComplete::new(3);
    assert!(!group.complete_one());
    assert!(!group.complete_one());
    assert!(group.complete_one());
    assert!(!group.complete_one());
  }

  #[test]
  fn value_cache_ready_after_every_source() {
    let mut cache = ValueCache::new(2);
    cache.set(1, "b");
    assert!(!cache.is_ready());
    assert_eq!(cache.snapshot(), vec!["b"]);
    cache.set(1, "bb");
    assert!(!cache.is_ready());
    cache.set(0, "a");
    assert!(cache.is_ready());
    assert_eq!(cache.snapshot(), vec!["a", "bb"]);
  }

  #[test]
  fn zip_buffer_pairs_in_order() {
    let mut buffer = ZipBuffer::new(2);
    assert_eq!(buffer.push(0, 1), None);
    assert_eq!(buffer.push(0, 2), None);
    assert_eq!(buffer.push(0, 3), None);
    assert_eq!(buffer.pending(), 3);
    assert_eq!(buffer.push(1, 10), Some(vec![1, 10]));
    assert_eq!(buffer.push(1, 20), Some(vec![2, 20]));
    assert_eq!(buffer.pending(), 1);
  }

  #[test]
  fn zip_buffer_exhaustion() {
    let mut buffer = ZipBuffer::new(2);
    buffer.push(0, 1);
    assert!(!buffer.mark_completed(0));
    assert!(!buffer.any_exhausted());
    assert_eq!(buffer.push(1, 2), Some(vec![1, 2]));
    assert!(buffer.any_exhausted());
    assert!(buffer.is_exhausted(0));
    assert!(!buffer.is_exhausted(1));
  }

  #[test]
  fn zip_buffer_three_sources() {
    let mut buffer = ZipBuffer::new(3);
    assert_eq!(buffer.push(2, 'c'), None);
    assert_eq!(buffer.push(0, 'a'), None);
    assert_eq!(buffer.push(2, 'f'), None);
    assert_eq!(buffer.push(1, 'b'), Some(vec!['a', 'b', 'c']));
    assert_eq!(buffer.push(1, 'e'), None);
    assert_eq!(buffer.push(0, 'd'), Some(vec!['d', 'e', 'f']));
    assert_eq!(buffer.pending(), 0);
  }

  #[test]
  fn pair_unpacking() {
    let items = vec![CombineItem::ItemA(1), CombineItem::ItemB("a")];
    assert_eq!(into_pair(items), (1, "a"));
  }
}
