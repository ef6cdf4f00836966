use crate::{
  observer::{observer_proxy_impl, Observer},
  prelude::*,
};

/// Ignores the first `count` values of the source.
#[derive(Clone)]
pub struct SkipOp<S> {
  source: S,
  count: usize,
}

impl<S> SkipOp<S> {
  #[inline]
  pub(crate) fn new(source: S, count: usize) -> Self { SkipOp { source, count } }
}

impl<Item, Err, O, S> Observable<Item, Err, O> for SkipOp<S>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, SkipObserver<O>>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let observer = SkipObserver { observer, count: self.count, hits: 0 };
    self.source.actual_subscribe(observer)
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for SkipOp<S> where
  S: ObservableExt<Item, Err>
{
}

pub struct SkipObserver<O> {
  observer: O,
  count: usize,
  hits: usize,
}

impl<Item, Err, O> Observer<Item, Err> for SkipObserver<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if self.hits < self.count {
      self.hits += 1;
    } else {
      self.observer.next(value);
    }
  }

  observer_proxy_impl!(Err, observer);
}
