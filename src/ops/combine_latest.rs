use crate::{
  observer::Observer,
  ops::multi_source::{
    subscribe_sources, GroupComplete, SourceObserver, SourceState, ValueCache,
  },
  prelude::*,
  rc::MutRc,
  subscription::LocalSubscription,
};

/// Emits the latest value of every source, in source order, each time any
/// source emits, once every source emitted at least once.
///
/// Completes once every source completed; any error is forwarded
/// immediately.
///
/// ```
/// use rxlite::prelude::*;
///
/// let mut out = vec![];
/// observable::from_iter([1, 2])
///   .combine_latest_with(observable::from_iter(["a", "b"]))
///   .subscribe(|v| out.push(v));
/// assert_eq!(out, vec![(2, "a"), (2, "b")]);
/// ```
#[derive(Clone)]
pub struct CombineLatestOp<S, SO> {
  source: S,
  others: Vec<SO>,
}

impl<S, SO> CombineLatestOp<S, SO> {
  #[inline]
  pub(crate) fn new(source: S, others: Vec<SO>) -> Self {
    CombineLatestOp { source, others }
  }
}

impl<Item, Err, O, S, SO> Observable<Vec<Item>, Err, O>
  for CombineLatestOp<S, SO>
where
  O: Observer<Vec<Item>, Err>,
  S: Observable<Item, Err, SourceObserver<CombineLatestState<O, Item>>>,
  SO: Observable<Item, Err, SourceObserver<CombineLatestState<O, Item>>>,
  Item: Clone,
{
  type Unsub = LocalSubscription;

  fn actual_subscribe(self, observer: O) -> Self::Unsub {
    let sources = self.others.len() + 1;
    let group = LocalSubscription::default();
    let state = MutRc::own(CombineLatestState {
      observer: Some(observer),
      group: group.clone(),
      cache: ValueCache::new(sources),
      completed: GroupComplete::new(sources),
    });
    subscribe_sources::<Item, Err, _, _, _>(
      &state,
      &group,
      self.source,
      self.others,
    );
    group
  }
}

impl<Item, Err, S, SO> ObservableExt<Vec<Item>, Err> for CombineLatestOp<S, SO>
where
  S: ObservableExt<Item, Err>,
  SO: ObservableExt<Item, Err>,
  Item: Clone,
{
}

pub struct CombineLatestState<O, Item> {
  observer: Option<O>,
  group: LocalSubscription,
  cache: ValueCache<Item>,
  completed: GroupComplete,
}

impl<Item, Err, O> SourceState<Item, Err> for CombineLatestState<O, Item>
where
  O: Observer<Vec<Item>, Err>,
  Item: Clone,
{
  fn next(&mut self, index: usize, value: Item) {
    if self.observer.is_none() {
      return;
    }
    self.cache.set(index, value);
    if self.cache.is_ready() {
      if let Some(observer) = self.observer.as_mut() {
        observer.next(self.cache.snapshot());
      }
    }
  }

  fn error(&mut self, _: usize, err: Err) {
    if let Some(observer) = self.observer.take() {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self, _: usize) {
    if self.completed.complete_one() {
      if let Some(observer) = self.observer.take() {
        observer.complete();
        self.group.unsubscribe();
      }
    }
  }

  fn is_finished(&self) -> bool {
    self.observer.as_ref().map_or(true, |o| o.is_finished())
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use futures::{channel::mpsc, executor::LocalPool};
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn waits_for_every_source() {
    let (a_tx, a_rx) = mpsc::unbounded();
    let (b_tx, b_rx) = mpsc::unbounded();
    let mut pool = LocalPool::new();
    let out = Rc::new(RefCell::new(vec![]));

    let c_out = out.clone();
    let _subscription = observable::from_stream(a_rx, pool.spawner())
      .combine_latest_with(observable::from_stream(b_rx, pool.spawner()))
      .subscribe(move |v| c_out.borrow_mut().push(v));

    a_tx.unbounded_send(1).unwrap();
    pool.run_until_stalled();
    assert!(out.borrow().is_empty());

    b_tx.unbounded_send("a").unwrap();
    pool.run_until_stalled();
    a_tx.unbounded_send(2).unwrap();
    pool.run_until_stalled();
    b_tx.unbounded_send("b").unwrap();
    pool.run_until_stalled();

    assert_eq!(*out.borrow(), vec![(1, "a"), (2, "a"), (2, "b")]);
  }

  #[test]
  fn completes_when_all_complete() {
    let mut values = vec![];
    let mut completed = 0;
    observable::from_iter(0..2)
      .combine_latest_with_all(vec![
        observable::from_iter(10..12),
        observable::from_iter(20..21),
      ])
      .subscribe_complete(|v| values.push(v), || completed += 1);
    // Sources run one after another, so only the last source's value
    // completes the cache.
    assert_eq!(values, vec![vec![1, 11, 20]]);
    assert_eq!(completed, 1);
  }

  #[test]
  fn error_terminates() {
    let mut values = vec![];
    let mut error = None;
    observable::of(1)
      .map_err(|e| match e {})
      .combine_latest_with(observable::throw("boom"))
      .subscribe_err(|v: (i32, i32)| values.push(v), |e| error = Some(e));
    assert!(values.is_empty());
    assert_eq!(error, Some("boom"));
  }

  #[test]
  fn independent_caches_per_subscription() {
    let mut out = vec![];
    let combined = observable::of(1).combine_latest_with(observable::of(2));
    combined.clone().subscribe(|v| out.push(v));
    combined.subscribe(|v| out.push(v));
    assert_eq!(out, vec![(1, 2), (1, 2)]);
  }
}
