use crate::{observer::Observer, prelude::*};
use std::collections::VecDeque;

/// Emits only the last `count` values of the source, in order, once the
/// source completes. An error discards the buffered values.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::from_iter(1..=4).take_last(2).subscribe(|v| out.push(v));
/// assert_eq!(out, vec![3, 4]);
/// ```
#[derive(Clone)]
pub struct TakeLastOp<S> {
  source: S,
  count: usize,
}

impl<S> TakeLastOp<S> {
  #[inline]
  pub(crate) fn new(source: S, count: usize) -> Self {
    TakeLastOp { source, count }
  }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for TakeLastOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, TakeLastObserver<O, Item>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let observer = TakeLastObserver {
      observer,
      count: self.count,
      queue: VecDeque::with_capacity(self.count),
    };
    self.source.actual_subscribe(observer)
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for TakeLastOp<S> where
  S: ObservableExt<Item, Err>
{
}

pub struct TakeLastObserver<O, Item> {
  observer: O,
  count: usize,
  queue: VecDeque<Item>,
}

impl<Item, Err, O> Observer<Item, Err> for TakeLastObserver<O, Item>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.count == 0 {
      return;
    }
    if self.queue.len() == self.count {
      self.queue.pop_front();
    }
    self.queue.push_back(value);
  }

  #[inline]
  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(mut self) {
    for value in self.queue.drain(..) {
      if self.observer.is_finished() {
        break;
      }
      self.observer.next(value);
    }
    self.observer.complete();
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
